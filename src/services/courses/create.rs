use tracing::info;

use super::CourseService;
use crate::errors::{Result, TrackademyError};
use crate::models::courses::{entities::Course, requests::CreateCourseRequest};

pub async fn create_course(service: &CourseService, req: CreateCourseRequest) -> Result<Course> {
    let storage = service.storage();

    if storage.get_subject(req.subject_id, false).await?.is_none() {
        return Err(TrackademyError::not_found("Subject not found."));
    }
    if storage.get_faculty(req.faculty_id).await?.is_none() {
        return Err(TrackademyError::not_found("Faculty not found."));
    }
    if storage.get_semester(req.semester_id, false).await?.is_none() {
        return Err(TrackademyError::not_found("Semester not found."));
    }
    if storage.get_division(req.division_id, false).await?.is_none() {
        return Err(TrackademyError::not_found("Division not found."));
    }

    if let Some(existing) = storage.find_course_allocation(&req).await?
        && !existing.is_deleted
    {
        return Err(TrackademyError::conflict(
            "This exact course allocation already exists.",
        ));
    }

    let course = storage.create_course(req).await?;
    info!(
        "Course {} allocated: subject {} to faculty {}",
        course.id, course.subject_id, course.faculty_id
    );
    Ok(course)
}
