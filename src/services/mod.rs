//! 业务逻辑层
//!
//! 每个资源一个服务结构体，持有 `Arc<dyn Storage>`，启动时构造一次并作为 `web::Data` 注入。
//! 服务只返回领域结果或 `TrackademyError`，响应封装由路由层负责。

pub mod academic_years;
pub mod assignments;
pub mod attendance;
pub mod certificates;
pub mod colleges;
pub mod courses;
pub mod departments;
pub mod divisions;
pub mod exam_results;
pub mod exams;
pub mod internships;
pub mod semesters;
pub mod subjects;
pub mod submissions;
pub mod uploads;
pub mod users;

mod profiles;

use std::sync::Arc;

pub use academic_years::AcademicYearService;
pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use certificates::CertificateService;
pub use colleges::CollegeService;
pub use courses::CourseService;
pub use departments::DepartmentService;
pub use divisions::DivisionService;
pub use exam_results::ExamResultService;
pub use exams::ExamService;
pub use internships::InternshipService;
pub use semesters::SemesterService;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
pub use users::UserService;

use crate::cache::ObjectCache;
use crate::storage::Storage;
use crate::storage::object_store::ObjectStore;

/// 启动时构造的全部服务
#[derive(Clone)]
pub struct Services {
    pub users: Arc<UserService>,
    pub colleges: Arc<CollegeService>,
    pub departments: Arc<DepartmentService>,
    pub academic_years: Arc<AcademicYearService>,
    pub semesters: Arc<SemesterService>,
    pub subjects: Arc<SubjectService>,
    pub divisions: Arc<DivisionService>,
    pub courses: Arc<CourseService>,
    pub assignments: Arc<AssignmentService>,
    pub exams: Arc<ExamService>,
    pub exam_results: Arc<ExamResultService>,
    pub attendance: Arc<AttendanceService>,
    pub submissions: Arc<SubmissionService>,
    pub certificates: Arc<CertificateService>,
    pub internships: Arc<InternshipService>,
}

impl Services {
    pub fn new(
        storage: Arc<dyn Storage>,
        cache: Arc<dyn ObjectCache>,
        object_store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(storage.clone(), cache)),
            colleges: Arc::new(CollegeService::new(storage.clone())),
            departments: Arc::new(DepartmentService::new(storage.clone())),
            academic_years: Arc::new(AcademicYearService::new(storage.clone())),
            semesters: Arc::new(SemesterService::new(storage.clone())),
            subjects: Arc::new(SubjectService::new(storage.clone())),
            divisions: Arc::new(DivisionService::new(storage.clone())),
            courses: Arc::new(CourseService::new(storage.clone())),
            assignments: Arc::new(AssignmentService::new(storage.clone())),
            exams: Arc::new(ExamService::new(storage.clone())),
            exam_results: Arc::new(ExamResultService::new(storage.clone())),
            attendance: Arc::new(AttendanceService::new(storage.clone())),
            submissions: Arc::new(SubmissionService::new(
                storage.clone(),
                object_store.clone(),
            )),
            certificates: Arc::new(CertificateService::new(storage.clone(), object_store)),
            internships: Arc::new(InternshipService::new(storage)),
        }
    }

    /// 注册为 `web::Data`，路由处理器按类型取用
    pub fn register(&self, cfg: &mut actix_web::web::ServiceConfig) {
        use actix_web::web::Data;

        cfg.app_data(Data::from(self.users.clone()))
            .app_data(Data::from(self.colleges.clone()))
            .app_data(Data::from(self.departments.clone()))
            .app_data(Data::from(self.academic_years.clone()))
            .app_data(Data::from(self.semesters.clone()))
            .app_data(Data::from(self.subjects.clone()))
            .app_data(Data::from(self.divisions.clone()))
            .app_data(Data::from(self.courses.clone()))
            .app_data(Data::from(self.assignments.clone()))
            .app_data(Data::from(self.exams.clone()))
            .app_data(Data::from(self.exam_results.clone()))
            .app_data(Data::from(self.attendance.clone()))
            .app_data(Data::from(self.submissions.clone()))
            .app_data(Data::from(self.certificates.clone()))
            .app_data(Data::from(self.internships.clone()));
    }
}
