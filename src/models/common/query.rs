//! 查询参数的类型转换
//!
//! 查询字符串里的值都是字符串，这里统一把 `"42"`、`"true"`、`"8.5"` 转成目标类型。

use serde::Deserialize;
use serde::de::{Deserializer, Error, Visitor};
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;

struct FromStrVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for FromStrVisitor<T>
where
    T: FromStr,
    T::Err: Display,
{
    type Value = Option<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a value or a string containing one")
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        value
            .parse()
            .map(Some)
            .map_err(|e| E::custom(format!("invalid value '{value}': {e}")))
    }

    fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
        self.visit_str(&value.to_string())
    }

    fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
        self.visit_str(&value.to_string())
    }

    fn visit_f64<E: Error>(self, value: f64) -> Result<Self::Value, E> {
        self.visit_str(&value.to_string())
    }

    fn visit_bool<E: Error>(self, value: bool) -> Result<Self::Value, E> {
        self.visit_str(&value.to_string())
    }

    fn visit_none<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

/// 把字符串或原生值解析为 `Option<T>`，空字符串视为缺省
///
/// 用法：`#[serde(default, deserialize_with = "flexible")]`
pub fn flexible<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    deserializer.deserialize_any(FromStrVisitor(PhantomData))
}

/// `?include=relations`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludeQuery {
    pub include: Option<String>,
}

impl IncludeQuery {
    pub fn with_relations(&self) -> bool {
        self.include.as_deref() == Some("relations")
    }
}

/// `?force=true` 时执行硬删除
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub force: Option<bool>,
}

impl DeleteQuery {
    pub fn is_forced(&self) -> bool {
        self.force.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Filter {
        #[serde(default, deserialize_with = "flexible")]
        college_id: Option<i64>,
        #[serde(default, deserialize_with = "flexible")]
        is_active: Option<bool>,
        #[serde(default, deserialize_with = "flexible")]
        min_spi: Option<f64>,
    }

    #[test]
    fn test_query_string_coercion() {
        let f = Query::<Filter>::from_query("collegeId=7&isActive=true&minSpi=8.5")
            .unwrap()
            .into_inner();
        assert_eq!(f.college_id, Some(7));
        assert_eq!(f.is_active, Some(true));
        assert_eq!(f.min_spi, Some(8.5));
    }

    #[test]
    fn test_missing_and_empty_values() {
        let f = Query::<Filter>::from_query("isActive=").unwrap().into_inner();
        assert_eq!(f.college_id, None);
        assert_eq!(f.is_active, None);
    }

    #[test]
    fn test_bad_boolean_is_rejected() {
        assert!(Query::<Filter>::from_query("isActive=yes").is_err());
    }

    #[test]
    fn test_force_and_include_flags() {
        let q = Query::<DeleteQuery>::from_query("force=true").unwrap();
        assert!(q.is_forced());
        assert!(!DeleteQuery::default().is_forced());
        let i = Query::<IncludeQuery>::from_query("include=relations").unwrap();
        assert!(i.with_relations());
    }

    #[test]
    fn test_json_numbers_are_accepted() {
        let f: Filter = serde_json::from_str(r#"{"collegeId": 3, "isActive": false}"#).unwrap();
        assert_eq!(f.college_id, Some(3));
        assert_eq!(f.is_active, Some(false));
    }
}
