use tracing::info;

use super::{CODE_TAKEN, SUBJECT_NOT_FOUND, SubjectService};
use crate::errors::{Result, TrackademyError};
use crate::models::subjects::{entities::Subject, requests::UpdateSubjectRequest};

pub async fn update_subject(
    service: &SubjectService,
    id: i64,
    req: UpdateSubjectRequest,
) -> Result<Subject> {
    let storage = service.storage();
    let current = storage
        .get_subject(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(SUBJECT_NOT_FOUND))?;

    let department_id = req.department_id.unwrap_or(current.department_id);
    let semester_id = req.semester_id.unwrap_or(current.semester_id);
    if department_id != current.department_id
        && storage.get_department(department_id, false).await?.is_none()
    {
        return Err(TrackademyError::bad_request("Department not found."));
    }
    if semester_id != current.semester_id && storage.get_semester(semester_id, false).await?.is_none()
    {
        return Err(TrackademyError::bad_request("Semester not found."));
    }

    let code = req.code.as_deref().unwrap_or(&current.code);
    // 已软删除的记录仍占用唯一键
    if let Some(other) = storage
        .find_subject_by_code(code, department_id, semester_id)
        .await?
        && other.id != id
    {
        return Err(TrackademyError::conflict(CODE_TAKEN));
    }

    let subject = storage
        .update_subject(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(SUBJECT_NOT_FOUND))?;
    info!("Subject {} updated", subject.id);
    Ok(subject)
}
