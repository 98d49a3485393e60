//! 测试夹具：内存 SQLite 上预置学院 → 院系 → 学年 → 学期 → 分班

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    LectureType, SemesterType, SubjectType, UserRole,
    academic_years::{entities::AcademicYear, requests::CreateAcademicYearRequest},
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    colleges::{entities::College, requests::CreateCollegeRequest},
    courses::{entities::Course, requests::CreateCourseRequest},
    departments::{entities::Department, requests::CreateDepartmentRequest},
    divisions::{entities::Division, requests::CreateDivisionRequest},
    faculty::{entities::Faculty, requests::CreateFacultyRequest},
    semesters::{entities::Semester, requests::CreateSemesterRequest},
    students::{entities::Student, requests::CreateStudentRequest},
    subjects::{entities::Subject, requests::CreateSubjectRequest},
    users::entities::Identity,
};
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::storage::Storage;

pub struct Fixture {
    pub storage: Arc<dyn Storage>,
    pub college: College,
    pub department: Department,
    pub academic_year: AcademicYear,
    pub semester: Semester,
    pub division: Division,
}

impl Fixture {
    pub async fn new() -> Self {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());

        let college = storage
            .create_college(CreateCollegeRequest {
                name: "L. D. College of Engineering".into(),
                abbreviation: "LDCE".into(),
                website: None,
                address: None,
            })
            .await
            .unwrap();
        let department = storage
            .create_department(CreateDepartmentRequest {
                name: "Computer Engineering".into(),
                abbreviation: "CE".into(),
                college_id: college.id,
            })
            .await
            .unwrap();
        let academic_year = storage
            .create_academic_year(CreateAcademicYearRequest {
                year: "2024-2025".into(),
                college_id: college.id,
                is_active: true,
            })
            .await
            .unwrap();
        let semester = storage
            .create_semester(CreateSemesterRequest {
                semester_number: 1,
                semester_type: SemesterType::Odd,
                department_id: department.id,
                academic_year_id: academic_year.id,
            })
            .await
            .unwrap();
        let division = storage
            .create_division(CreateDivisionRequest {
                name: "A".into(),
                semester_id: semester.id,
            })
            .await
            .unwrap();

        Self {
            storage,
            college,
            department,
            academic_year,
            semester,
            division,
        }
    }

    pub fn shared(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }
}

pub fn identity(user_id: i64, role: UserRole) -> Identity {
    Identity { user_id, role }
}

pub async fn student(fx: &Fixture, enrollment: &str, name: &str) -> Student {
    fx.storage
        .create_student(CreateStudentRequest {
            email: format!("{}@students.test", enrollment.to_lowercase()),
            full_name: name.into(),
            enrollment_number: enrollment.into(),
            department_id: fx.department.id,
            semester_id: fx.semester.id,
            division_id: fx.division.id,
            batch: None,
        })
        .await
        .unwrap()
}

pub async fn faculty(fx: &Fixture, email: &str, name: &str) -> Faculty {
    fx.storage
        .create_faculty(CreateFacultyRequest {
            email: email.into(),
            full_name: name.into(),
            designation: Some("Assistant Professor".into()),
            department_id: fx.department.id,
        })
        .await
        .unwrap()
}

pub async fn subject(fx: &Fixture, code: &str) -> Subject {
    fx.storage
        .create_subject(CreateSubjectRequest {
            name: format!("Subject {code}"),
            abbreviation: None,
            code: code.into(),
            subject_type: SubjectType::Mandatory,
            department_id: fx.department.id,
            semester_id: fx.semester.id,
        })
        .await
        .unwrap()
}

pub async fn course(fx: &Fixture, subject_id: i64, faculty_id: i64) -> Course {
    fx.storage
        .create_course(CreateCourseRequest {
            subject_id,
            faculty_id,
            semester_id: fx.semester.id,
            division_id: fx.division.id,
            lecture_type: LectureType::Theory,
            batch: None,
        })
        .await
        .unwrap()
}

pub async fn assignment(
    fx: &Fixture,
    course_id: i64,
    due_date: DateTime<Utc>,
    total_marks: f64,
) -> Assignment {
    fx.storage
        .create_assignment(CreateAssignmentRequest {
            course_id,
            title: "Process scheduling".into(),
            description: None,
            due_date,
            total_marks,
        })
        .await
        .unwrap()
}
