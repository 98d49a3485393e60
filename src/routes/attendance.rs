use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::attendance::requests::{
    AttendanceQuery, BulkAttendanceRequest, UpdateAttendanceRequest,
};
use crate::models::users::entities::Identity;
use crate::models::{ApiResponse, UserRole};
use crate::services::AttendanceService;
use crate::services::attendance::AttendanceView;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn view_attendance(
    service: web::Data<AttendanceService>,
    identity: Identity,
    query: ValidatedQuery<AttendanceQuery>,
) -> ActixResult<HttpResponse> {
    let response = match service.view_attendance(identity, query.into_inner()).await? {
        AttendanceView::Records(records) => {
            HttpResponse::Ok().json(ApiResponse::list("attendance", records))
        }
        AttendanceView::Summary(summary) => {
            HttpResponse::Ok().json(ApiResponse::list("attendance", summary))
        }
    };
    Ok(response)
}

pub async fn take_attendance(
    service: web::Data<AttendanceService>,
    identity: Identity,
    body: ValidatedJson<BulkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    let records = service.take_attendance(identity, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::list("attendance", records)))
}

pub async fn update_attendance(
    service: web::Data<AttendanceService>,
    identity: Identity,
    id: SafeIdI64,
    body: ValidatedJson<UpdateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    let record = service
        .update_attendance(identity, id.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("attendance", record)))
}

pub async fn faculty_courses(
    service: web::Data<AttendanceService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    let courses = service.faculty_courses(identity).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("courses", courses)))
}

pub async fn course_students(
    service: web::Data<AttendanceService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let students = service.course_students(identity, id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("students", students)))
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    let staff = || RequireRole::new_any(UserRole::staff_roles());
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    // 学生拿到的是按课程汇总
                    .route(web::get().to(view_attendance))
                    .route(web::post().to(take_attendance).wrap(staff())),
            )
            .route(
                "/faculty-courses",
                web::get()
                    .to(faculty_courses)
                    .wrap(RequireRole::new(&UserRole::Faculty)),
            )
            .route(
                "/courses/{id}/students",
                web::get().to(course_students).wrap(staff()),
            )
            .route("/{id}", web::patch().to(update_attendance).wrap(staff())),
    );
}
