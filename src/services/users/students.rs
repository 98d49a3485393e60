use tracing::info;

use super::{EMAIL_TAKEN, UserService};
use crate::errors::{Result, TrackademyError};
use crate::models::students::{
    entities::Student,
    requests::{CreateStudentRequest, UpdateStudentRequest},
};

pub const STUDENT_NOT_FOUND: &str = "Student not found.";

pub async fn create_student(service: &UserService, req: CreateStudentRequest) -> Result<Student> {
    let storage = service.storage();

    if storage.get_user_by_email(&req.email).await?.is_some() {
        return Err(TrackademyError::conflict(EMAIL_TAKEN));
    }
    if storage
        .get_student_by_enrollment_number(&req.enrollment_number)
        .await?
        .is_some()
    {
        return Err(TrackademyError::conflict(
            "A student with this enrollment number already exists.",
        ));
    }

    // 档案引用的院系、学期、分班必须存在
    if storage.get_department(req.department_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("Department not found."));
    }
    if storage.get_semester(req.semester_id, false).await?.is_none() {
        return Err(TrackademyError::bad_request("Semester not found."));
    }
    let division = storage
        .get_division(req.division_id, false)
        .await?
        .ok_or_else(|| TrackademyError::bad_request("Division not found."))?;
    if division.semester_id != req.semester_id {
        return Err(TrackademyError::bad_request(
            "Division does not belong to the given semester.",
        ));
    }

    let student = storage.create_student(req).await?;
    info!(
        "Student {} ({}) created",
        student.enrollment_number, student.full_name
    );
    Ok(student)
}

pub async fn get_student(service: &UserService, id: i64) -> Result<Student> {
    service
        .storage()
        .get_student(id)
        .await?
        .ok_or_else(|| TrackademyError::not_found(STUDENT_NOT_FOUND))
}

pub async fn update_student(
    service: &UserService,
    id: i64,
    req: UpdateStudentRequest,
) -> Result<Student> {
    let storage = service.storage();
    let existing = get_student(service, id).await?;

    if let Some(department_id) = req.department_id
        && storage.get_department(department_id, false).await?.is_none()
    {
        return Err(TrackademyError::bad_request("Department not found."));
    }
    if let Some(semester_id) = req.semester_id
        && storage.get_semester(semester_id, false).await?.is_none()
    {
        return Err(TrackademyError::bad_request("Semester not found."));
    }

    // 学期或分班变化后，分班仍须属于最终的学期
    if req.semester_id.is_some() || req.division_id.is_some() {
        let semester_id = req.semester_id.unwrap_or(existing.semester_id);
        let division_id = req.division_id.unwrap_or(existing.division_id);
        let division = storage
            .get_division(division_id, false)
            .await?
            .ok_or_else(|| TrackademyError::bad_request("Division not found."))?;
        if division.semester_id != semester_id {
            return Err(TrackademyError::bad_request(
                "Division does not belong to the given semester.",
            ));
        }
    }

    let student = storage
        .update_student(id, req)
        .await?
        .ok_or_else(|| TrackademyError::not_found(STUDENT_NOT_FOUND))?;
    info!("Student {} updated", student.enrollment_number);
    Ok(student)
}

pub async fn delete_student(service: &UserService, id: i64) -> Result<()> {
    get_student(service, id).await?;
    service.storage().set_student_deleted(id, true).await?;
    info!("Student {} deleted", id);
    Ok(())
}

pub async fn restore_student(service: &UserService, id: i64) -> Result<Student> {
    let student = service
        .storage()
        .set_student_deleted(id, false)
        .await?
        .ok_or_else(|| TrackademyError::not_found(STUDENT_NOT_FOUND))?;
    info!("Student {} restored", id);
    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::models::students::requests::StudentListQuery;
    use crate::testing::Fixture;

    fn request(fx: &Fixture, enrollment: &str, email: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            email: email.into(),
            full_name: "Meera Joshi".into(),
            enrollment_number: enrollment.into(),
            department_id: fx.department.id,
            semester_id: fx.semester.id,
            division_id: fx.division.id,
            batch: Some("A1".into()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_students() {
        let fx = Fixture::new().await;
        let service = UserService::new(fx.shared(), create_cache());

        let created = service
            .create_student(request(&fx, "CE101", "meera@students.test"))
            .await
            .unwrap();
        assert_eq!(service.get_student(created.id).await.unwrap().id, created.id);

        let listed = service
            .list_students(StudentListQuery {
                division_id: Some(fx.division.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].enrollment_number, "CE101");
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_and_email() {
        let fx = Fixture::new().await;
        let service = UserService::new(fx.shared(), create_cache());
        service
            .create_student(request(&fx, "CE102", "one@students.test"))
            .await
            .unwrap();

        let err = service
            .create_student(request(&fx, "CE102", "two@students.test"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("enrollment number"));

        let err = service
            .create_student(request(&fx, "CE103", "one@students.test"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), EMAIL_TAKEN);
    }

    #[tokio::test]
    async fn test_unknown_division_is_rejected() {
        let fx = Fixture::new().await;
        let service = UserService::new(fx.shared(), create_cache());
        let mut req = request(&fx, "CE104", "x@students.test");
        req.division_id = 4040;

        let err = service.create_student(req).await.unwrap_err();
        assert_eq!(err.code(), "E007");
        assert_eq!(err.message(), "Division not found.");
        assert_eq!(
            service.get_student(4040).await.unwrap_err().message(),
            STUDENT_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_update_moves_division_within_semester() {
        let fx = Fixture::new().await;
        let service = UserService::new(fx.shared(), create_cache());
        let created = service
            .create_student(request(&fx, "CE105", "move@students.test"))
            .await
            .unwrap();
        let division_b = fx
            .storage
            .create_division(crate::models::divisions::requests::CreateDivisionRequest {
                name: "B".into(),
                semester_id: fx.semester.id,
            })
            .await
            .unwrap();

        let moved = service
            .update_student(
                created.id,
                UpdateStudentRequest {
                    division_id: Some(division_b.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.division_id, division_b.id);

        let err = service
            .update_student(
                created.id,
                UpdateStudentRequest {
                    department_id: Some(9090),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
        assert_eq!(err.message(), "Department not found.");

        let err = service
            .update_student(
                created.id,
                UpdateStudentRequest {
                    division_id: Some(9191),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Division not found.");
    }

    #[tokio::test]
    async fn test_delete_and_restore() {
        let fx = Fixture::new().await;
        let service = UserService::new(fx.shared(), create_cache());
        let created = service
            .create_student(request(&fx, "CE106", "gone@students.test"))
            .await
            .unwrap();

        service.delete_student(created.id).await.unwrap();
        assert_eq!(
            service.get_student(created.id).await.unwrap_err().code(),
            "E004"
        );
        assert_eq!(
            service.delete_student(created.id).await.unwrap_err().code(),
            "E004"
        );
        let listed = service
            .list_students(StudentListQuery::default())
            .await
            .unwrap();
        assert!(listed.iter().all(|s| s.id != created.id));

        let restored = service.restore_student(created.id).await.unwrap();
        assert!(!restored.is_deleted);
        assert_eq!(service.get_student(created.id).await.unwrap().id, created.id);
        assert_eq!(
            service.restore_student(8080).await.unwrap_err().message(),
            STUDENT_NOT_FOUND
        );
    }
}
