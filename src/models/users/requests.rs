use serde::Deserialize;

use crate::errors::Result;
use crate::models::common::enums::UserRole;
use crate::utils::validate::{FieldErrors, Validate, validate_email};

// 创建账号（不含密码，登录由外部身份服务负责）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        if let Err(msg) = validate_email(&self.email) {
            errors.add("email", msg);
        }
        errors.optional_text("fullName", self.full_name.as_deref(), 255);
        errors.into_result()
    }
}
