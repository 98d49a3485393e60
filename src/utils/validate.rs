use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, TrackademyError};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static ACADEMIC_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{4}$").expect("Invalid academic year regex"));

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 请求体/查询参数的结构校验
///
/// 由 `ValidatedJson` / `ValidatedQuery` 提取器在进入处理器之前调用。
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 字段错误收集器：把所有违规字段合并成一条消息
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// 条件不成立时记录错误
    pub fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn require_text(&mut self, field: &'static str, value: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.add(field, "must not be empty");
        } else if value.chars().count() > max_len {
            self.add(field, format!("must be at most {max_len} characters"));
        }
    }

    pub fn optional_text(&mut self, field: &'static str, value: Option<&str>, max_len: usize) {
        if let Some(value) = value {
            self.require_text(field, value, max_len);
        }
    }

    pub fn positive_id(&mut self, field: &'static str, value: i64) {
        self.check(value > 0, field, "must be a valid id");
    }

    pub fn date(&mut self, field: &'static str, value: &str) -> Option<NaiveDate> {
        let parsed = parse_date(value);
        if parsed.is_none() {
            self.add(field, "must be a date in YYYY-MM-DD format");
        }
        parsed
    }

    pub fn limit(&mut self, value: Option<u64>) {
        if let Some(limit) = value {
            self.check(
                (1..=100).contains(&limit),
                "limit",
                "Limit must be between 1 and 100",
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let joined = self
            .errors
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join(", ");
        Err(TrackademyError::validation(format!(
            "Validation failed: {joined}"
        )))
    }
}

pub fn validate_email(email: &str) -> std::result::Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 学年标签格式：YYYY-YYYY
pub fn is_academic_year_label(year: &str) -> bool {
    ACADEMIC_YEAR_RE.is_match(year)
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_are_aggregated() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", "  ", 255);
        errors.check(false, "spi", "must be between 0 and 10");
        let err = errors.into_result().unwrap_err();
        assert_eq!(
            err.message(),
            "Validation failed: name: must not be empty, spi: must be between 0 and 10"
        );
    }

    #[test]
    fn test_no_errors_is_ok() {
        let mut errors = FieldErrors::new();
        errors.require_text("title", "Lab report", 255);
        errors.limit(Some(20));
        assert!(errors.is_empty());
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn test_text_length_limit() {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &"x".repeat(256), 255);
        assert!(
            errors
                .into_result()
                .unwrap_err()
                .message()
                .contains("at most 255")
        );
    }

    #[test]
    fn test_academic_year_label() {
        assert!(is_academic_year_label("2025-2026"));
        assert!(!is_academic_year_label("2025/2026"));
        assert!(!is_academic_year_label("25-26"));
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-02-28").is_some());
        assert!(parse_date("2025-02-30").is_none());
        assert!(parse_date("28/02/2025").is_none());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("student@college.edu").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_limit_bounds() {
        let mut errors = FieldErrors::new();
        errors.limit(Some(0));
        errors.limit(Some(101));
        let message = errors.into_result().unwrap_err().message().to_string();
        assert_eq!(message.matches("Limit must be between 1 and 100").count(), 2);
    }
}
