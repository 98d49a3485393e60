use chrono::{DateTime, Utc};
use tracing::info;

use super::{ASSIGNMENT_NOT_FOUND, AssignmentService};
use crate::errors::{Result, TrackademyError};
use crate::models::assignments::{
    entities::Assignment,
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
};
use crate::models::users::entities::Identity;
use crate::services::courses::COURSE_NOT_FOUND;
use crate::services::profiles::faculty_profile;
use crate::storage::Storage;

fn check_due_date(due_date: DateTime<Utc>) -> Result<()> {
    if due_date <= Utc::now() {
        return Err(TrackademyError::bad_request("Due date must be in the future."));
    }
    Ok(())
}

fn check_total_marks(total_marks: f64) -> Result<()> {
    if total_marks.is_nan() || total_marks <= 0.0 {
        return Err(TrackademyError::bad_request(
            "Total marks must be greater than 0.",
        ));
    }
    Ok(())
}

// 调用者必须是该课程的任课教师
async fn ensure_course_owner(
    storage: &dyn Storage,
    identity: &Identity,
    course_id: i64,
    denied: &'static str,
) -> Result<()> {
    let faculty = faculty_profile(storage, identity).await?;
    let course = storage
        .get_course(course_id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(COURSE_NOT_FOUND))?;
    if course.faculty_id != faculty.id {
        return Err(TrackademyError::forbidden(denied));
    }
    Ok(())
}

async fn owned_assignment(
    service: &AssignmentService,
    identity: &Identity,
    id: i64,
    denied: &'static str,
) -> Result<Assignment> {
    let assignment = service
        .storage()
        .get_assignment(id)
        .await?
        .ok_or_else(|| TrackademyError::not_found(ASSIGNMENT_NOT_FOUND))?;
    ensure_course_owner(service.storage(), identity, assignment.course_id, denied).await?;
    Ok(assignment)
}

pub async fn create_assignment(
    service: &AssignmentService,
    identity: Identity,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    check_total_marks(req.total_marks)?;
    check_due_date(req.due_date)?;
    ensure_course_owner(
        service.storage(),
        &identity,
        req.course_id,
        "You are not authorized to create assignments for this course.",
    )
    .await?;

    let assignment = service.storage().create_assignment(req).await?;
    info!(
        "Assignment '{}' created for course {} by user {}",
        assignment.title, assignment.course_id, identity.user_id
    );
    Ok(assignment)
}

pub async fn update_assignment(
    service: &AssignmentService,
    identity: Identity,
    id: i64,
    req: UpdateAssignmentRequest,
) -> Result<Assignment> {
    owned_assignment(
        service,
        &identity,
        id,
        "You are not authorized to update this assignment.",
    )
    .await?;
    if let Some(total_marks) = req.total_marks {
        check_total_marks(total_marks)?;
    }
    if let Some(due_date) = req.due_date {
        check_due_date(due_date)?;
    }

    service
        .storage()
        .update_assignment(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(ASSIGNMENT_NOT_FOUND))
}

pub async fn delete_assignment(service: &AssignmentService, identity: Identity, id: i64) -> Result<()> {
    owned_assignment(
        service,
        &identity,
        id,
        "You are not authorized to delete this assignment.",
    )
    .await?;

    service.storage().set_assignment_deleted(id, true).await?;
    info!("Assignment {} deleted by user {}", id, identity.user_id);
    Ok(())
}
