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

pub mod users;


pub use academic_years::configure_academic_year_routes;
pub use assignments::configure_assignment_routes;
pub use attendance::configure_attendance_routes;
pub use certificates::configure_certificate_routes;
pub use colleges::configure_college_routes;
pub use courses::configure_course_routes;
pub use departments::configure_department_routes;
pub use divisions::configure_division_routes;
pub use exam_results::configure_exam_result_routes;
pub use exams::configure_exam_routes;
pub use internships::configure_internship_routes;
pub use semesters::configure_semester_routes;
pub use subjects::configure_subject_routes;
pub use submissions::configure_submission_routes;
pub use users::configure_user_routes;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.configure(configure_user_routes)
        .configure(configure_college_routes)
        .configure(configure_department_routes)
        .configure(configure_academic_year_routes)
        .configure(configure_semester_routes)
        .configure(configure_subject_routes)
        .configure(configure_division_routes)
        .configure(configure_course_routes)
        .configure(configure_assignment_routes)
        .configure(configure_exam_routes)
        .configure(configure_exam_result_routes)
        .configure(configure_attendance_routes)
        .configure(configure_submission_routes)
        .configure(configure_certificate_routes)
        .configure(configure_internship_routes);
}
