use sea_orm::sea_query::LikeExpr;

/// 转义 LIKE 模式中的通配符
///
/// 搜索词中的 `%` `_` 按字面匹配，配合 `ColumnTrait::contains` 使用。
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `%term%` 形式的 LIKE 模式，反斜杠作为转义符
///
/// `term` 需先经过 `escape_like_pattern`。
pub fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{term}%")).escape('\\')
}

/// 去掉空白后为空的搜索词视为未提供，否则返回已转义的搜索词
pub fn search_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(escape_like_pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("CS_101"), "CS\\_101");
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
        assert_eq!(escape_like_pattern("Data Structures"), "Data Structures");
    }

    #[test]
    fn test_search_term() {
        assert_eq!(search_term(None), None);
        assert_eq!(search_term(Some("   ")), None);
        assert_eq!(search_term(Some(" 2025 ")).as_deref(), Some("2025"));
    }
}
