use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::query::flexible;
use crate::utils::validate::{FieldErrors, Validate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollegeRequest {
    pub name: String,
    pub abbreviation: String,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl Validate for CreateCollegeRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, 255);
        errors.require_text("abbreviation", &self.abbreviation, 50);
        errors.optional_text("website", self.website.as_deref(), 255);
        errors.optional_text("address", self.address.as_deref(), 1000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCollegeRequest {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
}

impl Validate for UpdateCollegeRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        errors.optional_text("name", self.name.as_deref(), 255);
        errors.optional_text("abbreviation", self.abbreviation.as_deref(), 50);
        errors.optional_text("website", self.website.as_deref(), 255);
        errors.optional_text("address", self.address.as_deref(), 1000);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeListQuery {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "flexible")]
    pub include_deleted: Option<bool>,
}

impl Validate for CollegeListQuery {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
