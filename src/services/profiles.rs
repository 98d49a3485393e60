//! 调用者档案查找
//!
//! 归属校验都以档案 id 为准，而不是账号 id。

use crate::errors::{Result, TrackademyError};
use crate::models::{
    faculty::entities::Faculty, students::entities::Student, users::entities::Identity,
};
use crate::storage::Storage;

pub(crate) const STUDENT_RECORD_NOT_FOUND: &str = "Student record not found.";
pub(crate) const FACULTY_RECORD_NOT_FOUND: &str = "Faculty record not found.";

pub(crate) async fn student_profile(storage: &dyn Storage, identity: &Identity) -> Result<Student> {
    storage
        .get_student_by_user_id(identity.user_id)
        .await?
        .ok_or_else(|| TrackademyError::not_found(STUDENT_RECORD_NOT_FOUND))
}

pub(crate) async fn faculty_profile(storage: &dyn Storage, identity: &Identity) -> Result<Faculty> {
    storage
        .get_faculty_by_user_id(identity.user_id)
        .await?
        .ok_or_else(|| TrackademyError::not_found(FACULTY_RECORD_NOT_FOUND))
}
