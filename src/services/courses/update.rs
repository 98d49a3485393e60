use tracing::info;

use super::{COURSE_NOT_FOUND, CourseService};
use crate::errors::{Result, TrackademyError};
use crate::models::courses::{entities::Course, requests::UpdateCourseRequest};
use crate::utils::validate::Validate;

pub async fn update_course(
    service: &CourseService,
    id: i64,
    req: UpdateCourseRequest,
) -> Result<Course> {
    let storage = service.storage();
    let current = service.get_course(id).await?;

    if let Some(subject_id) = req.subject_id
        && storage.get_subject(subject_id, false).await?.is_none()
    {
        return Err(TrackademyError::not_found("Subject not found."));
    }
    if let Some(faculty_id) = req.faculty_id
        && storage.get_faculty(faculty_id).await?.is_none()
    {
        return Err(TrackademyError::not_found("Faculty not found."));
    }
    if let Some(semester_id) = req.semester_id
        && storage.get_semester(semester_id, false).await?.is_none()
    {
        return Err(TrackademyError::not_found("Semester not found."));
    }
    if let Some(division_id) = req.division_id
        && storage.get_division(division_id, false).await?.is_none()
    {
        return Err(TrackademyError::not_found("Division not found."));
    }

    let allocation = req.merge_into(&current);
    allocation.validate()?;

    // 已软删除的分配同样占用自然键
    if let Some(other) = storage.find_course_allocation(&allocation).await?
        && other.id != id
    {
        return Err(TrackademyError::conflict(
            "This exact course allocation already exists.",
        ));
    }

    let course = storage
        .update_course(id, allocation)
        .await?
        .ok_or_else(|| TrackademyError::not_found(COURSE_NOT_FOUND))?;
    info!(
        "Course {} reallocated: subject {} to faculty {}",
        course.id, course.subject_id, course.faculty_id
    );
    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LectureType;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::testing::{Fixture, faculty, subject};

    #[tokio::test]
    async fn test_reassign_faculty_and_batch() {
        let fx = Fixture::new().await;
        let service = CourseService::new(fx.shared());
        let s = subject(&fx, "3150710").await;
        let first = faculty(&fx, "hetal@college.edu", "Hetal Shah").await;
        let second = faculty(&fx, "vijay@college.edu", "Vijay Pandya").await;

        let base = CreateCourseRequest {
            subject_id: s.id,
            faculty_id: first.id,
            semester_id: fx.semester.id,
            division_id: fx.division.id,
            lecture_type: LectureType::Practical,
            batch: Some("A1".into()),
        };
        let a1 = service.create_course(base.clone()).await.unwrap();
        let a2 = service
            .create_course(CreateCourseRequest {
                batch: Some("A2".into()),
                ..base
            })
            .await
            .unwrap();

        let moved = service
            .update_course(
                a1.id,
                UpdateCourseRequest {
                    faculty_id: Some(second.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.faculty_id, second.id);
        assert_eq!(moved.batch.as_deref(), Some("A1"));

        // 与另一条分配撞键
        let err = service
            .update_course(
                a2.id,
                UpdateCourseRequest {
                    faculty_id: Some(second.id),
                    batch: Some("A1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        let theory = service
            .update_course(
                a2.id,
                UpdateCourseRequest {
                    lecture_type: Some(LectureType::Theory),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(theory.lecture_type, LectureType::Theory);
        assert_eq!(theory.batch, None);
    }

    #[tokio::test]
    async fn test_missing_references() {
        let fx = Fixture::new().await;
        let service = CourseService::new(fx.shared());
        let s = subject(&fx, "3150711").await;
        let f = faculty(&fx, "rina@college.edu", "Rina Dave").await;
        let course = service
            .create_course(CreateCourseRequest {
                subject_id: s.id,
                faculty_id: f.id,
                semester_id: fx.semester.id,
                division_id: fx.division.id,
                lecture_type: LectureType::Theory,
                batch: None,
            })
            .await
            .unwrap();

        let err = service
            .update_course(
                course.id,
                UpdateCourseRequest {
                    faculty_id: Some(4242),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Faculty not found.");

        // 理论课不能带批次
        let err = service
            .update_course(
                course.id,
                UpdateCourseRequest {
                    batch: Some("B1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E001");

        let err = service
            .update_course(
                777,
                UpdateCourseRequest {
                    faculty_id: Some(f.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), COURSE_NOT_FOUND);
    }
}
