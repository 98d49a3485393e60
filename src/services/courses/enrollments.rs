use tracing::info;

use super::CourseService;
use crate::errors::{Result, TrackademyError};
use crate::models::courses::responses::EnrollmentResult;

/// 批量选课，重复提交不会产生重复记录
pub async fn enroll_students(
    service: &CourseService,
    course_id: i64,
    mut student_ids: Vec<i64>,
) -> Result<EnrollmentResult> {
    let storage = service.storage();
    service.get_course(course_id).await?;

    student_ids.sort_unstable();
    student_ids.dedup();
    for id in &student_ids {
        if storage.get_student(*id).await?.is_none() {
            return Err(TrackademyError::bad_request(format!(
                "Student not found: {id}"
            )));
        }
    }

    let enrolled_count = storage.enroll_students(course_id, student_ids).await?;
    info!("Enrolled {} new students in course {}", enrolled_count, course_id);
    Ok(EnrollmentResult {
        course_id,
        enrolled_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, course, faculty, student, subject};

    #[tokio::test]
    async fn test_enrollment_is_idempotent() {
        let fx = Fixture::new().await;
        let service = CourseService::new(fx.shared());
        let s = subject(&fx, "3150704").await;
        let f = faculty(&fx, "anil@college.edu", "Anil Mehta").await;
        let c = course(&fx, s.id, f.id).await;
        let a = student(&fx, "CE301", "Aarav Shah").await;
        let b = student(&fx, "CE302", "Bhavya Jain").await;

        let first = service
            .enroll_students(c.id, vec![a.id, b.id, a.id])
            .await
            .unwrap();
        assert_eq!(first.enrolled_count, 2);
        let second = service.enroll_students(c.id, vec![a.id]).await.unwrap();
        assert_eq!(second.enrolled_count, 0);

        let roster = service.course_students(c.id).await.unwrap();
        assert_eq!(roster.len(), 2);

        let err = service.enroll_students(c.id, vec![9999]).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        let err = service.enroll_students(777, vec![a.id]).await.unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
