use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::colleges::requests::{
    CollegeListQuery, CreateCollegeRequest, UpdateCollegeRequest,
};
use crate::models::{ApiResponse, UserRole};
use crate::services::CollegeService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_college(
    service: web::Data<CollegeService>,
    body: ValidatedJson<CreateCollegeRequest>,
) -> ActixResult<HttpResponse> {
    let college = service.create_college(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("college", college)))
}

pub async fn list_colleges(
    service: web::Data<CollegeService>,
    query: ValidatedQuery<CollegeListQuery>,
) -> ActixResult<HttpResponse> {
    let colleges = service.list_colleges(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("colleges", colleges)))
}

pub async fn get_college(
    service: web::Data<CollegeService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let college = service.get_college(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("college", college)))
}

pub async fn update_college(
    service: web::Data<CollegeService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateCollegeRequest>,
) -> ActixResult<HttpResponse> {
    let college = service.update_college(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("college", college)))
}

pub async fn delete_college(
    service: web::Data<CollegeService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_college(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_college(
    service: web::Data<CollegeService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let college = service.restore_college(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("college", college)))
}

// 配置路由
pub fn configure_college_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    cfg.service(
        web::scope("/api/v1/colleges")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_colleges))
                    .route(web::post().to(create_college).wrap(admin())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_college))
                    .route(web::patch().to(update_college).wrap(admin()))
                    .route(web::delete().to(delete_college).wrap(admin())),
            )
            .route("/{id}/restore", web::patch().to(restore_college).wrap(admin())),
    );
}
