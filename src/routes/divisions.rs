use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::divisions::requests::{
    CreateDivisionRequest, DivisionListQuery, UpdateDivisionRequest,
};
use crate::models::{ApiResponse, UserRole};
use crate::services::DivisionService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_division(
    service: web::Data<DivisionService>,
    body: ValidatedJson<CreateDivisionRequest>,
) -> ActixResult<HttpResponse> {
    let division = service.create_division(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("division", division)))
}

pub async fn list_divisions(
    service: web::Data<DivisionService>,
    query: ValidatedQuery<DivisionListQuery>,
) -> ActixResult<HttpResponse> {
    let divisions = service.list_divisions(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("divisions", divisions)))
}

pub async fn get_division(
    service: web::Data<DivisionService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let division = service.get_division(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("division", division)))
}

pub async fn update_division(
    service: web::Data<DivisionService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateDivisionRequest>,
) -> ActixResult<HttpResponse> {
    let division = service.update_division(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("division", division)))
}

pub async fn delete_division(
    service: web::Data<DivisionService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_division(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_division(
    service: web::Data<DivisionService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let division = service.restore_division(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("division", division)))
}

// 配置路由
pub fn configure_division_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    cfg.service(
        web::scope("/api/v1/divisions")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_divisions))
                    .route(web::post().to(create_division).wrap(admin())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_division))
                    .route(web::patch().to(update_division).wrap(admin()))
                    .route(web::delete().to(delete_division).wrap(admin())),
            )
            .route("/{id}/restore", web::patch().to(restore_division).wrap(admin())),
    );
}
