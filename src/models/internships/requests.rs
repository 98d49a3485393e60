use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::enums::InternshipStatus;
use crate::utils::validate::{FieldErrors, Validate};

const NAME_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 1000;
const PATH_MAX: usize = 1024;
const STIPEND_MAX: f64 = 1_000_000.0;

pub const END_BEFORE_START: &str = "End date must be after start date";

fn check_stipend(errors: &mut FieldErrors, stipend: Option<f64>) {
    if let Some(stipend) = stipend {
        errors.check(
            stipend.is_finite() && (0.0..=STIPEND_MAX).contains(&stipend),
            "stipend",
            "must be between 0 and 1000000",
        );
    }
}

fn check_period(errors: &mut FieldErrors, start: Option<NaiveDate>, end: Option<NaiveDate>) {
    if let (Some(start), Some(end)) = (start, end) {
        errors.check(end > start, "endDate", END_BEFORE_START);
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInternshipRequest {
    pub company_name: String,
    pub role: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub status: Option<InternshipStatus>,
    pub stipend: Option<f64>,
    pub location: Option<String>,
    pub offer_letter_path: Option<String>,
}

impl Validate for CreateInternshipRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("companyName", &self.company_name, NAME_MAX);
        errors.require_text("role", &self.role, NAME_MAX);
        errors.optional_text("description", self.description.as_deref(), DESCRIPTION_MAX);
        let start = errors.date("startDate", &self.start_date);
        let end = self
            .end_date
            .as_deref()
            .and_then(|value| errors.date("endDate", value));
        check_period(&mut errors, start, end);
        check_stipend(&mut errors, self.stipend);
        errors.optional_text("location", self.location.as_deref(), NAME_MAX);
        errors.optional_text(
            "offerLetterPath",
            self.offer_letter_path.as_deref(),
            PATH_MAX,
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateInternshipRequest {
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<InternshipStatus>,
    pub stipend: Option<f64>,
    pub location: Option<String>,
    pub offer_letter_path: Option<String>,
    pub noc_path: Option<String>,
    pub completion_certificate_path: Option<String>,
}

impl Validate for UpdateInternshipRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.optional_text("companyName", self.company_name.as_deref(), NAME_MAX);
        errors.optional_text("role", self.role.as_deref(), NAME_MAX);
        errors.optional_text("description", self.description.as_deref(), DESCRIPTION_MAX);
        let start = self
            .start_date
            .as_deref()
            .and_then(|value| errors.date("startDate", value));
        let end = self
            .end_date
            .as_deref()
            .and_then(|value| errors.date("endDate", value));
        check_period(&mut errors, start, end);
        check_stipend(&mut errors, self.stipend);
        errors.optional_text("location", self.location.as_deref(), NAME_MAX);
        for (field, value) in [
            ("offerLetterPath", &self.offer_letter_path),
            ("nocPath", &self.noc_path),
            ("completionCertificatePath", &self.completion_certificate_path),
        ] {
            errors.optional_text(field, value.as_deref(), PATH_MAX);
        }
        errors.into_result()
    }
}

/// 统计可按院系过滤
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InternshipStatsQuery {
    pub department_id: Option<i64>,
}

impl Validate for InternshipStatsQuery {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Some(id) = self.department_id {
            errors.positive_id("departmentId", id);
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateInternshipRequest {
        CreateInternshipRequest {
            company_name: "Infosys".into(),
            role: "Backend Intern".into(),
            description: None,
            start_date: "2024-06-01".into(),
            end_date: Some("2024-08-31".into()),
            status: None,
            stipend: Some(15000.0),
            location: Some("Pune".into()),
            offer_letter_path: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_end_must_follow_start() {
        let mut req = request();
        req.end_date = Some("2024-06-01".into());
        let message = req.validate().unwrap_err().message().to_string();
        assert!(message.contains(END_BEFORE_START));
    }

    #[test]
    fn test_stipend_and_lengths() {
        let mut req = request();
        req.stipend = Some(-1.0);
        req.company_name = "x".repeat(101);
        let message = req.validate().unwrap_err().message().to_string();
        assert!(message.contains("stipend: must be between 0 and 1000000"));
        assert!(message.contains("companyName: must be at most 100 characters"));
    }

    #[test]
    fn test_status_parses_from_json() {
        let req: UpdateInternshipRequest =
            serde_json::from_str(r#"{"status":"ONGOING","nocPath":"trackademy/noc.pdf"}"#)
                .unwrap();
        assert_eq!(req.status, Some(InternshipStatus::Ongoing));
        assert!(req.validate().is_ok());
    }
}
