use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::Result;
use crate::utils::validate::{FieldErrors, Validate};

fn check_issue_date(errors: &mut FieldErrors, value: &str) {
    if let Some(date) = errors.date("issueDate", value) {
        let today: NaiveDate = Utc::now().date_naive();
        errors.check(date <= today, "issueDate", "cannot be in the future");
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificateRequest {
    pub title: String,
    pub issuing_organization: String,
    pub issue_date: String,
    pub description: Option<String>,
    #[serde(default)]
    pub certificate_path: String,
}

impl Validate for CreateCertificateRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("title", &self.title, 255);
        errors.require_text("issuingOrganization", &self.issuing_organization, 255);
        check_issue_date(&mut errors, &self.issue_date);
        errors.optional_text("description", self.description.as_deref(), 2000);
        errors.require_text("certificatePath", &self.certificate_path, 1024);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCertificateRequest {
    pub title: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<String>,
    pub description: Option<String>,
}

impl Validate for UpdateCertificateRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.optional_text("title", self.title.as_deref(), 255);
        errors.optional_text(
            "issuingOrganization",
            self.issuing_organization.as_deref(),
            255,
        );
        if let Some(date) = &self.issue_date {
            check_issue_date(&mut errors, date);
        }
        errors.optional_text("description", self.description.as_deref(), 2000);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_issue_date_rejected() {
        let tomorrow = (Utc::now().date_naive() + chrono::Days::new(1))
            .format("%Y-%m-%d")
            .to_string();
        let request = CreateCertificateRequest {
            title: "AWS Cloud Practitioner".into(),
            issuing_organization: "Amazon".into(),
            issue_date: tomorrow,
            description: None,
            certificate_path: "trackademy/certificates/1/cert.pdf".into(),
        };
        let message = request.validate().unwrap_err().message().to_string();
        assert!(message.contains("issueDate: cannot be in the future"));
    }

    #[test]
    fn test_blank_fields_rejected() {
        let request = CreateCertificateRequest {
            title: " ".into(),
            issuing_organization: "".into(),
            issue_date: "2024-05-01".into(),
            description: None,
            certificate_path: "x".into(),
        };
        let message = request.validate().unwrap_err().message().to_string();
        assert!(message.contains("title: must not be empty"));
        assert!(message.contains("issuingOrganization: must not be empty"));
    }
}
