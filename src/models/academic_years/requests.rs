use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate, is_academic_year_label};

const YEAR_FORMAT_MESSAGE: &str = "Year must be in YYYY-YYYY format (e.g., 2023-2024)";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAcademicYearRequest {
    pub year: String,
    pub college_id: i64,
    #[serde(default)]
    pub is_active: bool,
}

impl Validate for CreateAcademicYearRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(is_academic_year_label(&self.year), "year", YEAR_FORMAT_MESSAGE);
        errors.positive_id("collegeId", self.college_id);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAcademicYearRequest {
    pub year: Option<String>,
    pub college_id: Option<i64>,
    pub is_active: Option<bool>,
}

impl Validate for UpdateAcademicYearRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(
            self.year.is_some() || self.college_id.is_some() || self.is_active.is_some(),
            "body",
            "At least one field must be provided for update",
        );
        if let Some(year) = &self.year {
            errors.check(is_academic_year_label(year), "year", YEAR_FORMAT_MESSAGE);
        }
        if let Some(id) = self.college_id {
            errors.positive_id("collegeId", id);
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearListQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub college_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub is_active: Option<bool>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub include_deleted: Option<bool>,
}

impl Validate for AcademicYearListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAcademicYearQuery {
    #[serde(default, deserialize_with = "flexible")]
    pub college_id: Option<i64>,
}

impl Validate for ActiveAcademicYearQuery {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        match self.college_id {
            Some(id) => errors.positive_id("collegeId", id),
            None => errors.add("collegeId", "is required"),
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearSearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, deserialize_with = "flexible")]
    pub college_id: Option<i64>,
    #[serde(default, deserialize_with = "flexible")]
    pub limit: Option<u64>,
}

impl Validate for AcademicYearSearchQuery {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.check(!self.q.trim().is_empty(), "q", "Search query is required");
        errors.limit(self.limit);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_format() {
        let ok = CreateAcademicYearRequest {
            year: "2025-2026".into(),
            college_id: 1,
            is_active: true,
        };
        assert!(ok.validate().is_ok());

        let bad = CreateAcademicYearRequest {
            year: "2025".into(),
            ..ok
        };
        assert!(bad.validate().unwrap_err().message().contains(YEAR_FORMAT_MESSAGE));
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(UpdateAcademicYearRequest::default().validate().is_err());
        let patch = UpdateAcademicYearRequest {
            is_active: Some(true),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_search_requires_query() {
        let q = AcademicYearSearchQuery {
            q: " ".into(),
            college_id: None,
            limit: Some(500),
        };
        let message = q.validate().unwrap_err().message().to_string();
        assert!(message.contains("q: Search query is required"));
        assert!(message.contains("Limit must be between 1 and 100"));
    }
}
