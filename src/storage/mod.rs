//! 数据存储层
//!
//! `Storage` 由按资源拆分的子 trait 组成，服务层只依赖 `Arc<dyn Storage>`。
//! 约定：
//! - `get_*` 默认只返回未软删除的记录，`include_deleted` 为真时放开
//! - `find_*_by_*` 按自然键查找，包含已软删除的记录，供冲突检查与复活使用
//! - `set_*_deleted` 同时用于软删除与恢复，记录不存在时返回 `None`

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::Result;
use crate::models::{
    AttendanceStatus, SubmissionStatus,
    academic_years::{
        entities::AcademicYear,
        requests::{
            AcademicYearListQuery, AcademicYearSearchQuery, CreateAcademicYearRequest,
            UpdateAcademicYearRequest,
        },
    },
    assignments::{
        entities::Assignment,
        requests::{AssignmentFilter, CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    attendance::{
        entities::Attendance,
        requests::AttendanceRecordInput,
        responses::{AttendanceEntry, AttendanceSummary},
    },
    certificates::{
        entities::Certificate,
        requests::{CreateCertificateRequest, UpdateCertificateRequest},
        responses::CertificateStatistics,
    },
    colleges::{
        entities::College,
        requests::{CollegeListQuery, CreateCollegeRequest, UpdateCollegeRequest},
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
        responses::CourseOverview,
    },
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest},
    },
    divisions::{
        entities::Division,
        requests::{CreateDivisionRequest, DivisionListQuery},
    },
    exam_results::{
        entities::ExamResult,
        requests::{
            CreateExamResultRequest, ExamResultFilter, RankField, UpdateExamResultRequest,
        },
        responses::ExamResultStatistics,
    },
    exams::{
        entities::Exam,
        requests::{CreateExamRequest, ExamListQuery, ExamSearchQuery, UpdateExamRequest},
    },
    faculty::{
        entities::Faculty,
        requests::{CreateFacultyRequest, FacultyListQuery, UpdateFacultyRequest},
    },
    internships::{
        entities::Internship,
        requests::{CreateInternshipRequest, UpdateInternshipRequest},
        responses::InternshipStatistics,
    },
    semesters::{
        entities::Semester,
        requests::{CreateSemesterRequest, SemesterListQuery, UpdateSemesterRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
    },
    submissions::{
        entities::Submission,
        requests::SubmissionFilter,
        responses::SubmissionStatistics,
    },
    users::{entities::User, requests::CreateUserRequest},
};

pub mod object_store;
pub mod sea_orm_storage;

/// 用户账号与身份档案
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 包含已删除的账号，由调用方判断 is_deleted
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn count_users(&self) -> Result<u64>;
    async fn set_user_deleted(&self, id: i64, deleted: bool) -> Result<Option<User>>;

    // 账号与学生档案在同一事务中创建
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_student_by_enrollment_number(&self, enrollment: &str)
    -> Result<Option<Student>>;
    async fn list_students(&self, query: StudentListQuery) -> Result<Vec<Student>>;
    // 改名时账号上的姓名同步更新
    async fn update_student(&self, id: i64, req: UpdateStudentRequest)
    -> Result<Option<Student>>;
    async fn set_student_deleted(&self, id: i64, deleted: bool) -> Result<Option<Student>>;

    // 账号与教师档案在同一事务中创建
    async fn create_faculty(&self, req: CreateFacultyRequest) -> Result<Faculty>;
    async fn get_faculty(&self, id: i64) -> Result<Option<Faculty>>;
    async fn get_faculty_by_user_id(&self, user_id: i64) -> Result<Option<Faculty>>;
    async fn list_faculty(&self, query: FacultyListQuery) -> Result<Vec<Faculty>>;
    async fn update_faculty(&self, id: i64, req: UpdateFacultyRequest)
    -> Result<Option<Faculty>>;
    async fn set_faculty_deleted(&self, id: i64, deleted: bool) -> Result<Option<Faculty>>;
}

#[async_trait]
pub trait CollegeStorage: Send + Sync {
    async fn create_college(&self, req: CreateCollegeRequest) -> Result<College>;
    async fn get_college(&self, id: i64, include_deleted: bool) -> Result<Option<College>>;
    async fn find_college_by_name(&self, name: &str) -> Result<Option<College>>;
    async fn find_college_by_abbreviation(&self, abbreviation: &str) -> Result<Option<College>>;
    async fn list_colleges(&self, query: CollegeListQuery) -> Result<Vec<College>>;
    async fn update_college(&self, id: i64, req: UpdateCollegeRequest)
    -> Result<Option<College>>;
    async fn set_college_deleted(&self, id: i64, deleted: bool) -> Result<Option<College>>;
    async fn count_college_departments(&self, college_id: i64) -> Result<u64>;
}

#[async_trait]
pub trait DepartmentStorage: Send + Sync {
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department>;
    async fn get_department(&self, id: i64, include_deleted: bool)
    -> Result<Option<Department>>;
    async fn find_department_by_name(
        &self,
        college_id: i64,
        name: &str,
    ) -> Result<Option<Department>>;
    async fn list_departments(&self, query: DepartmentListQuery) -> Result<Vec<Department>>;
    async fn count_departments(&self, query: DepartmentListQuery) -> Result<u64>;
    async fn update_department(
        &self,
        id: i64,
        req: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    async fn set_department_deleted(&self, id: i64, deleted: bool)
    -> Result<Option<Department>>;
    async fn hard_delete_department(&self, id: i64) -> Result<bool>;
    // 未删除的科目、教师、学期、学生数量之和
    async fn count_department_dependents(&self, id: i64) -> Result<u64>;
}

#[async_trait]
pub trait AcademicYearStorage: Send + Sync {
    // is_active 为真时在同一事务内先停用同学院的其他学年
    async fn create_academic_year(&self, req: CreateAcademicYearRequest) -> Result<AcademicYear>;
    async fn get_academic_year(
        &self,
        id: i64,
        include_deleted: bool,
    ) -> Result<Option<AcademicYear>>;
    async fn find_academic_year_by_label(&self, year: &str) -> Result<Option<AcademicYear>>;
    async fn list_academic_years(&self, query: AcademicYearListQuery)
    -> Result<Vec<AcademicYear>>;
    async fn count_academic_years(&self, query: AcademicYearListQuery) -> Result<u64>;
    async fn get_active_academic_year(&self, college_id: i64) -> Result<Option<AcademicYear>>;
    async fn search_academic_years(
        &self,
        query: AcademicYearSearchQuery,
    ) -> Result<Vec<AcademicYear>>;
    async fn update_academic_year(
        &self,
        id: i64,
        req: UpdateAcademicYearRequest,
    ) -> Result<Option<AcademicYear>>;
    async fn set_academic_year_active(&self, id: i64, active: bool)
    -> Result<Option<AcademicYear>>;
    // 软删除同时清除 is_active
    async fn set_academic_year_deleted(
        &self,
        id: i64,
        deleted: bool,
    ) -> Result<Option<AcademicYear>>;
    async fn hard_delete_academic_year(&self, id: i64) -> Result<bool>;
    async fn count_academic_year_semesters(&self, id: i64) -> Result<u64>;
}

#[async_trait]
pub trait SemesterStorage: Send + Sync {
    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester>;
    async fn get_semester(&self, id: i64, include_deleted: bool) -> Result<Option<Semester>>;
    async fn find_semester(
        &self,
        department_id: i64,
        academic_year_id: i64,
        semester_number: i32,
    ) -> Result<Option<Semester>>;
    async fn list_semesters(&self, query: SemesterListQuery) -> Result<Vec<Semester>>;
    async fn update_semester(
        &self,
        id: i64,
        req: UpdateSemesterRequest,
    ) -> Result<Option<Semester>>;
    async fn set_semester_deleted(&self, id: i64, deleted: bool) -> Result<Option<Semester>>;
    // 未删除的分班、开课、学生、考试数量之和
    async fn count_semester_dependents(&self, id: i64) -> Result<u64>;
}

#[async_trait]
pub trait SubjectStorage: Send + Sync {
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject(&self, id: i64, include_deleted: bool) -> Result<Option<Subject>>;
    async fn find_subject_by_code(
        &self,
        code: &str,
        department_id: i64,
        semester_id: i64,
    ) -> Result<Option<Subject>>;
    async fn list_subjects(&self, query: SubjectListQuery) -> Result<Vec<Subject>>;
    async fn count_subjects(&self, query: SubjectListQuery) -> Result<u64>;
    async fn update_subject(&self, id: i64, req: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn set_subject_deleted(&self, id: i64, deleted: bool) -> Result<Option<Subject>>;
}

#[async_trait]
pub trait DivisionStorage: Send + Sync {
    async fn create_division(&self, req: CreateDivisionRequest) -> Result<Division>;
    async fn get_division(&self, id: i64, include_deleted: bool) -> Result<Option<Division>>;
    async fn find_division_by_name(
        &self,
        semester_id: i64,
        name: &str,
    ) -> Result<Option<Division>>;
    async fn list_divisions(&self, query: DivisionListQuery) -> Result<Vec<Division>>;
    async fn rename_division(&self, id: i64, name: String) -> Result<Option<Division>>;
    async fn set_division_deleted(&self, id: i64, deleted: bool) -> Result<Option<Division>>;
}

#[async_trait]
pub trait CourseStorage: Send + Sync {
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course(&self, id: i64, include_deleted: bool) -> Result<Option<Course>>;
    async fn find_course_allocation(&self, req: &CreateCourseRequest) -> Result<Option<Course>>;
    async fn list_courses(&self, query: CourseListQuery) -> Result<Vec<Course>>;
    // 整体替换分配键
    async fn update_course(
        &self,
        id: i64,
        allocation: CreateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn set_course_deleted(&self, id: i64, deleted: bool) -> Result<Option<Course>>;
    // 已选的学生跳过，返回新增数量
    async fn enroll_students(&self, course_id: i64, student_ids: Vec<i64>) -> Result<u64>;
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<Student>>;
    async fn is_student_enrolled(&self, student_id: i64, course_id: i64) -> Result<bool>;
    async fn list_student_course_ids(&self, student_id: i64) -> Result<Vec<i64>>;
    async fn list_faculty_course_overviews(&self, faculty_id: i64)
    -> Result<Vec<CourseOverview>>;
}

#[async_trait]
pub trait AssignmentStorage: Send + Sync {
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments(&self, filter: AssignmentFilter) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        req: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn set_assignment_deleted(&self, id: i64, deleted: bool)
    -> Result<Option<Assignment>>;
}

#[async_trait]
pub trait ExamStorage: Send + Sync {
    async fn create_exam(&self, req: CreateExamRequest) -> Result<Exam>;
    async fn get_exam(&self, id: i64, include_deleted: bool) -> Result<Option<Exam>>;
    async fn find_exam_by_type(&self, semester_id: i64, exam_type: &str) -> Result<Option<Exam>>;
    async fn list_exams(&self, query: ExamListQuery) -> Result<Vec<Exam>>;
    async fn count_exams(&self, query: ExamListQuery) -> Result<u64>;
    async fn search_exams(&self, query: ExamSearchQuery) -> Result<Vec<Exam>>;
    async fn update_exam(&self, id: i64, req: UpdateExamRequest) -> Result<Option<Exam>>;
    async fn set_exam_published(&self, id: i64, published: bool) -> Result<Option<Exam>>;
    async fn set_exam_deleted(&self, id: i64, deleted: bool) -> Result<Option<Exam>>;
    async fn hard_delete_exam(&self, id: i64) -> Result<bool>;
    async fn count_exam_results(&self, exam_id: i64) -> Result<u64>;
}

#[async_trait]
pub trait ExamResultStorage: Send + Sync {
    // 成绩与单科成绩在同一事务中写入
    async fn create_exam_result(&self, req: CreateExamResultRequest) -> Result<ExamResult>;
    async fn get_exam_result(&self, id: i64) -> Result<Option<ExamResult>>;
    async fn find_exam_result(
        &self,
        exam_id: i64,
        enrollment_number: &str,
    ) -> Result<Option<ExamResult>>;
    async fn list_exam_results(&self, filter: ExamResultFilter) -> Result<Vec<ExamResult>>;
    async fn update_exam_result(
        &self,
        id: i64,
        req: UpdateExamResultRequest,
    ) -> Result<Option<ExamResult>>;
    async fn delete_exam_result(&self, id: i64) -> Result<bool>;
    async fn exam_result_statistics(&self, filter: ExamResultFilter)
    -> Result<ExamResultStatistics>;
    async fn top_performers(
        &self,
        exam_id: Option<i64>,
        limit: u64,
        by: RankField,
    ) -> Result<Vec<ExamResult>>;
}

#[async_trait]
pub trait AttendanceStorage: Send + Sync {
    // 事务内删除该课程当天的旧记录再写入
    async fn replace_attendance(
        &self,
        course_id: i64,
        date: NaiveDate,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<Vec<Attendance>>;
    async fn list_attendance(&self, course_id: i64, date: NaiveDate)
    -> Result<Vec<AttendanceEntry>>;
    async fn get_attendance(&self, id: i64) -> Result<Option<Attendance>>;
    async fn update_attendance_status(
        &self,
        id: i64,
        status: AttendanceStatus,
    ) -> Result<Option<Attendance>>;
    async fn attendance_summary(
        &self,
        student_id: i64,
        semester_id: Option<i64>,
    ) -> Result<Vec<AttendanceSummary>>;
}

/// 新建提交所需字段
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub file_path: Option<String>,
    pub status: SubmissionStatus,
}

#[async_trait]
pub trait SubmissionStorage: Send + Sync {
    // 同一学生已软删除的提交会被复用
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission(&self, id: i64) -> Result<Option<Submission>>;
    async fn find_student_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions(&self, filter: SubmissionFilter) -> Result<Vec<Submission>>;
    async fn update_submission_content(
        &self,
        id: i64,
        content: Option<String>,
        file_path: Option<String>,
    ) -> Result<Option<Submission>>;
    async fn grade_submission(
        &self,
        id: i64,
        marks_awarded: f64,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;
    async fn set_submission_deleted(&self, id: i64, deleted: bool)
    -> Result<Option<Submission>>;
    async fn submission_statistics(&self, assignment: &Assignment)
    -> Result<SubmissionStatistics>;
}

#[async_trait]
pub trait CertificateStorage: Send + Sync {
    async fn create_certificate(
        &self,
        student_id: i64,
        req: CreateCertificateRequest,
    ) -> Result<Certificate>;
    async fn get_certificate(&self, id: i64) -> Result<Option<Certificate>>;
    async fn list_student_certificates(&self, student_id: i64) -> Result<Vec<Certificate>>;
    async fn update_certificate(
        &self,
        id: i64,
        req: UpdateCertificateRequest,
    ) -> Result<Option<Certificate>>;
    async fn set_certificate_deleted(&self, id: i64, deleted: bool)
    -> Result<Option<Certificate>>;
    async fn certificate_statistics(&self, now: DateTime<Utc>) -> Result<CertificateStatistics>;
}

#[async_trait]
pub trait InternshipStorage: Send + Sync {
    async fn create_internship(
        &self,
        student_id: i64,
        req: CreateInternshipRequest,
    ) -> Result<Internship>;
    async fn get_internship(&self, id: i64) -> Result<Option<Internship>>;
    // 按开始日期倒序
    async fn list_student_internships(&self, student_id: i64) -> Result<Vec<Internship>>;
    async fn update_internship(
        &self,
        id: i64,
        req: UpdateInternshipRequest,
    ) -> Result<Option<Internship>>;
    async fn set_internship_deleted(&self, id: i64, deleted: bool)
    -> Result<Option<Internship>>;
    /// 月度趋势只统计开始日期不早于 `since` 的记录
    async fn internship_statistics(
        &self,
        since: NaiveDate,
        department_id: Option<i64>,
    ) -> Result<InternshipStatistics>;
}

pub trait Storage:
    UserStorage
    + CollegeStorage
    + DepartmentStorage
    + AcademicYearStorage
    + SemesterStorage
    + SubjectStorage
    + DivisionStorage
    + CourseStorage
    + AssignmentStorage
    + ExamStorage
    + ExamResultStorage
    + AttendanceStorage
    + SubmissionStorage
    + CertificateStorage
    + InternshipStorage
{
}

impl<T> Storage for T where
    T: UserStorage
        + CollegeStorage
        + DepartmentStorage
        + AcademicYearStorage
        + SemesterStorage
        + SubjectStorage
        + DivisionStorage
        + CourseStorage
        + AssignmentStorage
        + ExamStorage
        + ExamResultStorage
        + AttendanceStorage
        + SubmissionStorage
        + CertificateStorage
    + InternshipStorage
{
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
