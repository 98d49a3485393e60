use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::exam_results::requests::{
    CreateExamResultRequest, ExamResultFilter, ExamResultListQuery, TopPerformersQuery,
    UpdateExamResultRequest,
};
use crate::models::users::entities::Identity;
use crate::models::{ApiResponse, UserRole};
use crate::services::ExamResultService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn list_results(
    service: web::Data<ExamResultService>,
    identity: Identity,
    query: ValidatedQuery<ExamResultListQuery>,
) -> ActixResult<HttpResponse> {
    let results = service.list_results(identity, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("results", results)))
}

pub async fn create_result(
    service: web::Data<ExamResultService>,
    body: ValidatedJson<CreateExamResultRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.create_result(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("result", result)))
}

pub async fn result_statistics(
    service: web::Data<ExamResultService>,
    filter: ValidatedQuery<ExamResultFilter>,
) -> ActixResult<HttpResponse> {
    let statistics = service.statistics(filter.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("statistics", statistics)))
}

pub async fn top_performers(
    service: web::Data<ExamResultService>,
    query: ValidatedQuery<TopPerformersQuery>,
) -> ActixResult<HttpResponse> {
    let results = service.top_performers(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("topPerformers", results)))
}

pub async fn search_results(
    service: web::Data<ExamResultService>,
    filter: ValidatedQuery<ExamResultFilter>,
) -> ActixResult<HttpResponse> {
    let results = service.search_results(filter.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("results", results)))
}

pub async fn get_result(
    service: web::Data<ExamResultService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let result = service.get_result(identity, id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("result", result)))
}

pub async fn update_result(
    service: web::Data<ExamResultService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateExamResultRequest>,
) -> ActixResult<HttpResponse> {
    let result = service.update_result(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("result", result)))
}

pub async fn delete_result(
    service: web::Data<ExamResultService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_result(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

// 配置路由
pub fn configure_exam_result_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    let staff = || RequireRole::new_any(UserRole::staff_roles());
    cfg.service(
        web::scope("/api/v1/exam-results")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_results))
                    .route(web::post().to(create_result).wrap(admin())),
            )
            .route("/statistics", web::get().to(result_statistics).wrap(staff()))
            .route("/top-performers", web::get().to(top_performers).wrap(staff()))
            .route("/search", web::get().to(search_results).wrap(staff()))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_result))
                    .route(web::patch().to(update_result).wrap(admin()))
                    .route(web::delete().to(delete_result).wrap(admin())),
            ),
    );
}
