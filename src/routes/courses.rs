use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::courses::requests::{
    CourseListQuery, CreateCourseRequest, EnrollStudentsRequest, UpdateCourseRequest,
};
use crate::models::{ApiResponse, UserRole};
use crate::services::CourseService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_course(
    service: web::Data<CourseService>,
    body: ValidatedJson<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    let course = service.create_course(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("course", course)))
}

pub async fn list_courses(
    service: web::Data<CourseService>,
    query: ValidatedQuery<CourseListQuery>,
) -> ActixResult<HttpResponse> {
    let courses = service.list_courses(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("courses", courses)))
}

pub async fn get_course(
    service: web::Data<CourseService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let course = service.get_course(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("course", course)))
}

pub async fn update_course(
    service: web::Data<CourseService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    let course = service.update_course(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("course", course)))
}

pub async fn delete_course(
    service: web::Data<CourseService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_course(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_course(
    service: web::Data<CourseService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let course = service.restore_course(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("course", course)))
}

pub async fn enroll_students(
    service: web::Data<CourseService>,
    id: SafeIdI64,
    body: ValidatedJson<EnrollStudentsRequest>,
) -> ActixResult<HttpResponse> {
    let enrollment = service
        .enroll_students(id.0, body.into_inner().student_ids)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("enrollment", enrollment)))
}

pub async fn course_students(
    service: web::Data<CourseService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let students = service.course_students(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("students", students)))
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_courses))
                    .route(web::post().to(create_course).wrap(admin())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    .route(web::patch().to(update_course).wrap(admin()))
                    .route(web::delete().to(delete_course).wrap(admin())),
            )
            .route("/{id}/restore", web::patch().to(restore_course).wrap(admin()))
            // 重复选课会被忽略
            .route(
                "/{id}/enrollments",
                web::post().to(enroll_students).wrap(admin()),
            )
            .route(
                "/{id}/students",
                web::get()
                    .to(course_students)
                    .wrap(RequireRole::new_any(UserRole::staff_roles())),
            ),
    );
}
