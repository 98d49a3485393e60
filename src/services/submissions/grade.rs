use tracing::info;

use super::{SUBMISSION_NOT_FOUND, SubmissionService};
use crate::errors::{Result, TrackademyError};
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::{
    entities::Submission,
    requests::{GradeSubmissionRequest, SubmissionFilter, SubmissionListQuery},
    responses::SubmissionStatistics,
};
use crate::models::users::entities::Identity;

// 管理员不受限，教师必须任教该课程
async fn managed_assignment(
    service: &SubmissionService,
    identity: &Identity,
    assignment_id: i64,
    denied: &'static str,
) -> Result<Assignment> {
    let assignment = service.assignment(assignment_id).await?;
    if !identity.is_admin() {
        service
            .ensure_assignment_faculty(identity, &assignment, denied)
            .await?;
    }
    Ok(assignment)
}

/// 评分不受截止时间限制
pub async fn grade_submission(
    service: &SubmissionService,
    identity: Identity,
    id: i64,
    req: GradeSubmissionRequest,
) -> Result<Submission> {
    let submission = service.submission(id).await?;
    let assignment = managed_assignment(
        service,
        &identity,
        submission.assignment_id,
        "You are not authorized to grade this submission.",
    )
    .await?;

    if !(0.0..=assignment.total_marks).contains(&req.marks_awarded) {
        return Err(TrackademyError::bad_request(format!(
            "Marks must be between 0 and {}.",
            assignment.total_marks
        )));
    }

    let graded = service
        .storage()
        .grade_submission(id, req.marks_awarded, req.feedback)
        .await?
        .ok_or_else(|| TrackademyError::not_found(SUBMISSION_NOT_FOUND))?;
    info!(
        "Submission {} graded {}/{} by user {}",
        id, req.marks_awarded, assignment.total_marks, identity.user_id
    );
    Ok(graded)
}

pub async fn assignment_submissions(
    service: &SubmissionService,
    identity: Identity,
    assignment_id: i64,
    query: SubmissionListQuery,
) -> Result<Vec<Submission>> {
    managed_assignment(
        service,
        &identity,
        assignment_id,
        "You are not authorized to view submissions for this assignment.",
    )
    .await?;
    service
        .storage()
        .list_submissions(SubmissionFilter {
            assignment_id: Some(assignment_id),
            status: query.status,
            ..Default::default()
        })
        .await
}

pub async fn assignment_statistics(
    service: &SubmissionService,
    identity: Identity,
    assignment_id: i64,
) -> Result<SubmissionStatistics> {
    let assignment = managed_assignment(
        service,
        &identity,
        assignment_id,
        "You are not authorized to view statistics for this assignment.",
    )
    .await?;
    service.storage().submission_statistics(&assignment).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::models::submissions::requests::UpdateSubmissionRequest;
    use crate::services::submissions::tests::{class, text};
    use crate::testing::{faculty, identity};
    use chrono::Duration;

    fn marks(marks_awarded: f64) -> GradeSubmissionRequest {
        GradeSubmissionRequest {
            marks_awarded,
            feedback: Some("Well structured".into()),
        }
    }

    #[tokio::test]
    async fn test_graded_submission_is_locked() {
        let class = class(Duration::days(2)).await;
        let me = identity(class.student_user, UserRole::Student);
        let instructor = identity(class.faculty_user, UserRole::Faculty);
        let submission = class
            .service
            .create_submission(me, text(class.assignment.id, "answer"))
            .await
            .unwrap();

        let graded = class
            .service
            .grade_submission(instructor, submission.id, marks(8.0))
            .await
            .unwrap();
        assert!(graded.is_graded());
        assert_eq!(graded.marks_awarded, Some(8.0));
        assert!(graded.graded_at.is_some());

        let err = class
            .service
            .update_submission(
                me,
                submission.id,
                UpdateSubmissionRequest {
                    content: Some("edited".into()),
                    file_path: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Cannot update a graded submission.");

        let err = class
            .service
            .delete_submission(me, submission.id)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Cannot delete a graded submission.");
    }

    #[tokio::test]
    async fn test_marks_out_of_range() {
        let class = class(Duration::days(2)).await;
        let submission = class
            .service
            .create_submission(
                identity(class.student_user, UserRole::Student),
                text(class.assignment.id, "answer"),
            )
            .await
            .unwrap();

        let err = class
            .service
            .grade_submission(
                identity(class.faculty_user, UserRole::Faculty),
                submission.id,
                marks(15.0),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
        assert!(err.message().contains("between 0 and 10"));

        // 管理员不需要任教
        let graded = class
            .service
            .grade_submission(identity(1, UserRole::Admin), submission.id, marks(10.0))
            .await
            .unwrap();
        assert_eq!(graded.marks_awarded, Some(10.0));
    }

    #[tokio::test]
    async fn test_only_course_faculty_sees_assignment_data() {
        let class = class(Duration::days(2)).await;
        class
            .service
            .create_submission(
                identity(class.student_user, UserRole::Student),
                text(class.assignment.id, "answer"),
            )
            .await
            .unwrap();

        let outsider = faculty(&class.fx, "visiting@college.edu", "Visiting").await;
        let err = class
            .service
            .assignment_statistics(
                identity(outsider.user_id, UserRole::Faculty),
                class.assignment.id,
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.message(),
            "You are not authorized to view statistics for this assignment."
        );

        let instructor = identity(class.faculty_user, UserRole::Faculty);
        let listed = class
            .service
            .assignment_submissions(instructor, class.assignment.id, SubmissionListQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        let stats = class
            .service
            .assignment_statistics(instructor, class.assignment.id)
            .await
            .unwrap();
        assert_eq!(stats.total_submissions, 1);
        assert_eq!(stats.total_enrolled, 1);
        assert_eq!(stats.submission_rate, "100.0%");
        assert_eq!(stats.total_marks, 10.0);
    }
}
