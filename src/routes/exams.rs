use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::errors::TrackademyError;
use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::common::query::IncludeQuery;
use crate::models::exams::requests::{
    CreateExamRequest, ExamListQuery, ExamSearchQuery, UpdateExamRequest,
};
use crate::models::{ApiResponse, ExamType, UserRole};
use crate::services::ExamService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_exam(
    service: web::Data<ExamService>,
    body: ValidatedJson<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    let exam = service.create_exam(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("exam", exam)))
}

pub async fn list_exams(
    service: web::Data<ExamService>,
    query: ValidatedQuery<ExamListQuery>,
) -> ActixResult<HttpResponse> {
    let exams = service.list_exams(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("exams", exams)))
}

pub async fn count_exams(
    service: web::Data<ExamService>,
    query: ValidatedQuery<ExamListQuery>,
) -> ActixResult<HttpResponse> {
    let count = service.count_exams(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("count", count)))
}

pub async fn search_exams(
    service: web::Data<ExamService>,
    query: ValidatedQuery<ExamSearchQuery>,
) -> ActixResult<HttpResponse> {
    let exams = service.search_exams(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("exams", exams)))
}

pub async fn published_exams(service: web::Data<ExamService>) -> ActixResult<HttpResponse> {
    let exams = service.published_exams().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("exams", exams)))
}

pub async fn exams_by_type(
    service: web::Data<ExamService>,
    exam_type: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let exam_type = exam_type
        .parse::<ExamType>()
        .map_err(TrackademyError::bad_request)?;
    let exams = service.exams_by_type(exam_type).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("exams", exams)))
}

pub async fn exams_by_semester(
    service: web::Data<ExamService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let exams = service.exams_by_semester(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("exams", exams)))
}

pub async fn exams_by_department(
    service: web::Data<ExamService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let exams = service.exams_by_department(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("exams", exams)))
}

pub async fn get_exam(
    service: web::Data<ExamService>,
    id: SafeIdI64,
    include: web::Query<IncludeQuery>,
) -> ActixResult<HttpResponse> {
    let exam = service.get_exam(id.0, include.with_relations()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("exam", exam)))
}

pub async fn update_exam(
    service: web::Data<ExamService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateExamRequest>,
) -> ActixResult<HttpResponse> {
    let exam = service.update_exam(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("exam", exam)))
}

pub async fn publish_exam(
    service: web::Data<ExamService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let exam = service.set_published(id.0, true).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("exam", exam)))
}

pub async fn unpublish_exam(
    service: web::Data<ExamService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let exam = service.set_published(id.0, false).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("exam", exam)))
}

pub async fn delete_exam(
    service: web::Data<ExamService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_exam(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn hard_delete_exam(
    service: web::Data<ExamService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.hard_delete_exam(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_exam(
    service: web::Data<ExamService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let exam = service.restore_exam(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("exam", exam)))
}

// 配置路由
pub fn configure_exam_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_exams))
                    .route(web::post().to(create_exam).wrap(admin())),
            )
            // 固定路径要先于 /{id} 注册
            .route("/published", web::get().to(published_exams))
            .route("/search", web::get().to(search_exams))
            .route("/count", web::get().to(count_exams))
            .route("/type/{exam_type}", web::get().to(exams_by_type))
            .route("/semester/{id}", web::get().to(exams_by_semester))
            .route("/department/{id}", web::get().to(exams_by_department))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_exam))
                    .route(web::patch().to(update_exam).wrap(admin()))
                    .route(web::delete().to(delete_exam).wrap(admin())),
            )
            .route("/{id}/hard", web::delete().to(hard_delete_exam).wrap(admin()))
            .route("/{id}/publish", web::patch().to(publish_exam).wrap(admin()))
            .route(
                "/{id}/unpublish",
                web::patch().to(unpublish_exam).wrap(admin()),
            )
            .route("/{id}/restore", web::patch().to(restore_exam).wrap(admin())),
    );
}
