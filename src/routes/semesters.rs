use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::semesters::requests::{
    CreateSemesterRequest, SemesterListQuery, UpdateSemesterRequest,
};
use crate::models::{ApiResponse, UserRole};
use crate::services::SemesterService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_semester(
    service: web::Data<SemesterService>,
    body: ValidatedJson<CreateSemesterRequest>,
) -> ActixResult<HttpResponse> {
    let semester = service.create_semester(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("semester", semester)))
}

pub async fn list_semesters(
    service: web::Data<SemesterService>,
    query: ValidatedQuery<SemesterListQuery>,
) -> ActixResult<HttpResponse> {
    let semesters = service.list_semesters(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("semesters", semesters)))
}

pub async fn get_semester(
    service: web::Data<SemesterService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let semester = service.get_semester(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("semester", semester)))
}

pub async fn update_semester(
    service: web::Data<SemesterService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateSemesterRequest>,
) -> ActixResult<HttpResponse> {
    let semester = service.update_semester(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("semester", semester)))
}

pub async fn delete_semester(
    service: web::Data<SemesterService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_semester(id.0).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_semester(
    service: web::Data<SemesterService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let semester = service.restore_semester(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("semester", semester)))
}

// 配置路由
pub fn configure_semester_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    cfg.service(
        web::scope("/api/v1/semesters")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_semesters))
                    .route(web::post().to(create_semester).wrap(admin())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_semester))
                    .route(web::patch().to(update_semester).wrap(admin()))
                    .route(web::delete().to(delete_semester).wrap(admin())),
            )
            .route("/{id}/restore", web::patch().to(restore_semester).wrap(admin())),
    );
}
