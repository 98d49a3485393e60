use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::common::query::IncludeQuery;
use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest,
};
use crate::models::{ApiResponse, UserRole};
use crate::services::SubjectService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_subject(
    service: web::Data<SubjectService>,
    body: ValidatedJson<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    let subject = service.create_subject(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("subject", subject)))
}

pub async fn list_subjects(
    service: web::Data<SubjectService>,
    query: ValidatedQuery<SubjectListQuery>,
) -> ActixResult<HttpResponse> {
    let subjects = service.list_subjects(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("subjects", subjects)))
}

pub async fn count_subjects(
    service: web::Data<SubjectService>,
    query: ValidatedQuery<SubjectListQuery>,
) -> ActixResult<HttpResponse> {
    let count = service.count_subjects(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("count", count)))
}

pub async fn get_subject(
    service: web::Data<SubjectService>,
    id: SafeIdI64,
    include: web::Query<IncludeQuery>,
) -> ActixResult<HttpResponse> {
    let subject = service.get_subject(id.0, include.with_relations()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("subject", subject)))
}

pub async fn update_subject(
    service: web::Data<SubjectService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    let subject = service.update_subject(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("subject", subject)))
}

pub async fn delete_subject(
    service: web::Data<SubjectService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_subject(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_subject(
    service: web::Data<SubjectService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let subject = service.restore_subject(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("subject", subject)))
}

// 配置路由
pub fn configure_subject_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_subjects))
                    .route(web::post().to(create_subject).wrap(admin())),
            )
            .route("/count", web::get().to(count_subjects))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_subject))
                    .route(web::patch().to(update_subject).wrap(admin()))
                    .route(web::delete().to(delete_subject).wrap(admin())),
            )
            .route("/{id}/restore", web::patch().to(restore_subject).wrap(admin())),
    );
}
