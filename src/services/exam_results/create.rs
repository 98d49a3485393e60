use tracing::info;

use super::ExamResultService;
use crate::errors::{Result, TrackademyError};
use crate::models::exam_results::{entities::ExamResult, requests::CreateExamResultRequest};

pub async fn create_result(
    service: &ExamResultService,
    req: CreateExamResultRequest,
) -> Result<ExamResult> {
    let storage = service.storage();

    if storage.get_exam(req.exam_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("Exam not found."));
    }

    // 关联学生档案时学号必须一致
    if let Some(student_id) = req.student_id {
        let student = storage
            .get_student(student_id)
            .await?
            .ok_or_else(|| TrackademyError::bad_request("Student not found."))?;
        if student.enrollment_number != req.student_enrollment_number {
            return Err(TrackademyError::bad_request(
                "Student enrollment number mismatch.",
            ));
        }
    }

    if storage
        .find_exam_result(req.exam_id, &req.student_enrollment_number)
        .await?
        .is_some()
    {
        return Err(TrackademyError::conflict(format!(
            "Exam result already exists for student {} in this exam.",
            req.student_enrollment_number
        )));
    }

    let result = storage.create_exam_result(req).await?;
    info!(
        "Exam result recorded for {} in exam {} ({} subjects)",
        result.student_enrollment_number,
        result.exam_id,
        result.subject_results.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam_results::requests::SubjectResultInput;
    use crate::models::exams::requests::CreateExamRequest;
    use crate::models::{ExamType, ResultStatus};
    use crate::testing::{Fixture, student, subject};

    async fn exam_id(fx: &Fixture) -> i64 {
        fx.storage
            .create_exam(CreateExamRequest {
                name: "Winter 2024".into(),
                exam_type: ExamType::Final,
                semester_id: fx.semester.id,
                description: None,
                max_marks: None,
                passing_marks: None,
                exam_date: None,
                duration: None,
                is_published: true,
            })
            .await
            .unwrap()
            .id
    }

    fn request(exam_id: i64, student_id: Option<i64>, enrollment: &str) -> CreateExamResultRequest {
        CreateExamResultRequest {
            exam_id,
            student_id,
            student_enrollment_number: enrollment.into(),
            spi: 8.4,
            cpi: 8.1,
            status: ResultStatus::Pass,
            results: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_with_line_items() {
        let fx = Fixture::new().await;
        let service = ExamResultService::new(fx.shared());
        let exam = exam_id(&fx).await;
        let s = student(&fx, "22CE001", "Kavya Shah").await;
        let os = subject(&fx, "3140702").await;

        let mut req = request(exam, Some(s.id), "22CE001");
        req.results = vec![SubjectResultInput {
            subject_id: os.id,
            grade: "AA".into(),
            credits: 4,
        }];
        let created = service.create_result(req).await.unwrap();
        assert_eq!(created.subject_results.len(), 1);
        assert_eq!(created.student_id, Some(s.id));

        let err = service
            .create_result(request(exam, None, "22CE001"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert_eq!(
            err.message(),
            "Exam result already exists for student 22CE001 in this exam."
        );
    }

    #[tokio::test]
    async fn test_enrollment_mismatch_and_missing_exam() {
        let fx = Fixture::new().await;
        let service = ExamResultService::new(fx.shared());
        let exam = exam_id(&fx).await;
        let s = student(&fx, "22CE002", "Dev Patel").await;

        let err = service
            .create_result(request(exam, Some(s.id), "22CE999"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Student enrollment number mismatch.");

        let err = service
            .create_result(request(exam + 100, None, "22CE002"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
        assert_eq!(err.message(), "Exam not found.");
    }
}
