use chrono::Utc;
use tracing::info;

use super::{CONTENT_REQUIRED, DEADLINE_PASSED, SubmissionService};
use crate::errors::{Result, TrackademyError};
use crate::models::SubmissionStatus;
use crate::models::assignments::entities::Assignment;
use crate::models::students::entities::Student;
use crate::models::submissions::{
    entities::Submission,
    requests::{CreateSubmissionRequest, UpdateSubmissionRequest},
};
use crate::models::users::entities::Identity;
use crate::services::profiles::student_profile;
use crate::services::uploads::{UploadForm, store_upload};
use crate::storage::NewSubmission;
use crate::utils::validate::Validate;

const UPLOAD_FOLDER: &str = "submissions";
const UPLOAD_PREFIX: &str = "submission";

fn has_body(content: Option<&str>, file_path: Option<&str>) -> bool {
    let present = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
    present(content) || present(file_path)
}

fn check_deadline(assignment: &Assignment) -> Result<()> {
    if assignment.is_past_due(Utc::now()) {
        return Err(TrackademyError::bad_request(DEADLINE_PASSED));
    }
    Ok(())
}

// 提交前的校验：已选课、未过截止、未重复提交
async fn check_can_submit(
    service: &SubmissionService,
    identity: &Identity,
    assignment_id: i64,
) -> Result<(Student, Assignment)> {
    let storage = service.storage();
    let student = student_profile(storage, identity).await?;
    let assignment = service.assignment(assignment_id).await?;

    if !storage
        .is_student_enrolled(student.id, assignment.course_id)
        .await?
    {
        return Err(TrackademyError::forbidden(
            "You are not enrolled in this course.",
        ));
    }
    check_deadline(&assignment)?;

    let existing = storage
        .find_student_submission(assignment.id, student.id)
        .await?;
    if existing.is_some_and(|s| !s.is_deleted) {
        return Err(TrackademyError::conflict(
            "You have already submitted this assignment.",
        ));
    }
    Ok((student, assignment))
}

async fn insert(
    service: &SubmissionService,
    student: &Student,
    assignment: &Assignment,
    content: Option<String>,
    file_path: Option<String>,
) -> Result<Submission> {
    let submission = service
        .storage()
        .create_submission(NewSubmission {
            assignment_id: assignment.id,
            student_id: student.id,
            content,
            file_path,
            status: SubmissionStatus::Submitted,
        })
        .await?;
    info!(
        "Student {} submitted assignment {} (submission {})",
        student.id, assignment.id, submission.id
    );
    Ok(submission)
}

pub async fn create_submission(
    service: &SubmissionService,
    identity: Identity,
    req: CreateSubmissionRequest,
) -> Result<Submission> {
    let (student, assignment) = check_can_submit(service, &identity, req.assignment_id).await?;
    if !has_body(req.content.as_deref(), req.file_path.as_deref()) {
        return Err(TrackademyError::bad_request(CONTENT_REQUIRED));
    }
    insert(service, &student, &assignment, req.content, req.file_path).await
}

/// multipart 提交：文件字段 `file`，文本字段 `assignmentId`、`content`
pub async fn create_submission_upload(
    service: &SubmissionService,
    identity: Identity,
    mut form: UploadForm,
) -> Result<Submission> {
    let req = CreateSubmissionRequest {
        assignment_id: form
            .text("assignmentId")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default(),
        content: form.text("content"),
        file_path: None,
    };
    req.validate()?;

    let (student, assignment) = check_can_submit(service, &identity, req.assignment_id).await?;
    let file_path = match form.file.take() {
        Some(file) => Some(
            store_upload(
                service.object_store(),
                UPLOAD_FOLDER,
                UPLOAD_PREFIX,
                identity.user_id,
                file,
            )
            .await?,
        ),
        None => None,
    };
    if !has_body(req.content.as_deref(), file_path.as_deref()) {
        return Err(TrackademyError::bad_request(CONTENT_REQUIRED));
    }
    insert(service, &student, &assignment, req.content, file_path).await
}

// 学生本人、未评分、未过截止
async fn editable_submission(
    service: &SubmissionService,
    identity: &Identity,
    id: i64,
    denied: &'static str,
    graded: &'static str,
) -> Result<Submission> {
    let student = student_profile(service.storage(), identity).await?;
    let submission = service.submission(id).await?;
    if submission.student_id != student.id {
        return Err(TrackademyError::forbidden(denied));
    }
    if submission.is_graded() {
        return Err(TrackademyError::state_violation(graded));
    }
    let assignment = service.assignment(submission.assignment_id).await?;
    check_deadline(&assignment)?;
    Ok(submission)
}

pub async fn update_submission(
    service: &SubmissionService,
    identity: Identity,
    id: i64,
    req: UpdateSubmissionRequest,
) -> Result<Submission> {
    editable_submission(
        service,
        &identity,
        id,
        "You are not authorized to update this submission.",
        "Cannot update a graded submission.",
    )
    .await?;
    if !has_body(req.content.as_deref(), req.file_path.as_deref()) {
        return Err(TrackademyError::bad_request(CONTENT_REQUIRED));
    }

    service
        .storage()
        .update_submission_content(id, req.content, req.file_path)
        .await?
        .ok_or_else(|| TrackademyError::not_found(super::SUBMISSION_NOT_FOUND))
}

pub async fn delete_submission(
    service: &SubmissionService,
    identity: Identity,
    id: i64,
) -> Result<()> {
    editable_submission(
        service,
        &identity,
        id,
        "You are not authorized to delete this submission.",
        "Cannot delete a graded submission.",
    )
    .await?;
    service.storage().set_submission_deleted(id, true).await?;
    info!("Submission {} withdrawn by user {}", id, identity.user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::models::assignments::requests::UpdateAssignmentRequest;
    use crate::models::submissions::requests::GradeSubmissionRequest;
    use crate::services::submissions::tests::{class, text};
    use crate::services::uploads::UploadedFile;
    use crate::testing::identity;
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_rules() {
        let class = class(Duration::days(2)).await;
        let me = identity(class.student_user, UserRole::Student);

        let err = class
            .service
            .create_submission(
                me,
                CreateSubmissionRequest {
                    assignment_id: class.assignment.id,
                    content: Some("  ".into()),
                    file_path: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), CONTENT_REQUIRED);

        let submission = class
            .service
            .create_submission(me, text(class.assignment.id, "first"))
            .await
            .unwrap();
        assert_eq!(submission.status, SubmissionStatus::Submitted);

        let err = class
            .service
            .create_submission(me, text(class.assignment.id, "again"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        // 撤回后可以重新提交
        class.service.delete_submission(me, submission.id).await.unwrap();
        let again = class
            .service
            .create_submission(me, text(class.assignment.id, "second"))
            .await
            .unwrap();
        assert_eq!(again.content.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_unenrolled_student_is_forbidden() {
        let class = class(Duration::days(2)).await;
        let stranger = crate::testing::student(&class.fx, "CE499", "Not Enrolled").await;
        let err = class
            .service
            .create_submission(
                identity(stranger.user_id, UserRole::Student),
                text(class.assignment.id, "answer"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "You are not enrolled in this course.");
    }

    #[tokio::test]
    async fn test_deadline_blocks_student_but_not_grading() {
        let class = class(Duration::days(2)).await;
        let me = identity(class.student_user, UserRole::Student);
        let submission = class
            .service
            .create_submission(me, text(class.assignment.id, "on time"))
            .await
            .unwrap();

        let late = crate::testing::assignment(
            &class.fx,
            class.assignment.course_id,
            Utc::now() - Duration::hours(1),
            10.0,
        )
        .await;
        let err = class
            .service
            .create_submission(me, text(late.id, "too late"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), DEADLINE_PASSED);

        // 截止时间提前到过去
        class
            .fx
            .storage
            .update_assignment(
                class.assignment.id,
                UpdateAssignmentRequest {
                    due_date: Some(Utc::now() - Duration::minutes(5)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = class
            .service
            .update_submission(
                me,
                submission.id,
                UpdateSubmissionRequest {
                    content: Some("revised".into()),
                    file_path: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), DEADLINE_PASSED);

        // 截止之后任课教师仍可评分
        let graded = class
            .service
            .grade_submission(
                identity(class.faculty_user, UserRole::Faculty),
                submission.id,
                GradeSubmissionRequest {
                    marks_awarded: 9.0,
                    feedback: None,
                },
            )
            .await
            .unwrap();
        assert!(graded.is_graded());
        assert_eq!(graded.marks_awarded, Some(9.0));
    }

    #[tokio::test]
    async fn test_upload_stores_file() {
        let class = class(Duration::days(2)).await;
        let mut form = UploadForm::default();
        form.fields
            .insert("assignmentId".into(), class.assignment.id.to_string());
        form.file = Some(UploadedFile {
            file_name: "answer.pdf".into(),
            extension: ".pdf".into(),
            bytes: b"%PDF-1.4 answer".to_vec(),
        });

        let submission = class
            .service
            .create_submission_upload(identity(class.student_user, UserRole::Student), form)
            .await
            .unwrap();
        let key = submission.file_path.unwrap();
        assert!(key.starts_with(&format!(
            "trackademy/submissions/{}/submission_",
            class.student_user
        )));
        assert!(class.upload_dir.join(&key).exists());
        let _ = std::fs::remove_dir_all(&class.upload_dir);
    }

    #[tokio::test]
    async fn test_upload_without_file_or_content() {
        let class = class(Duration::days(2)).await;
        let mut form = UploadForm::default();
        form.fields
            .insert("assignmentId".into(), class.assignment.id.to_string());
        let err = class
            .service
            .create_submission_upload(identity(class.student_user, UserRole::Student), form)
            .await
            .unwrap_err();
        assert_eq!(err.message(), CONTENT_REQUIRED);
    }
}
