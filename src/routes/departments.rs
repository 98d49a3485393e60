use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::common::query::{DeleteQuery, IncludeQuery};
use crate::models::departments::requests::{
    CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest,
};
use crate::models::{ApiResponse, UserRole};
use crate::services::DepartmentService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_department(
    service: web::Data<DepartmentService>,
    body: ValidatedJson<CreateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    let department = service.create_department(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("department", department)))
}

pub async fn list_departments(
    service: web::Data<DepartmentService>,
    query: ValidatedQuery<DepartmentListQuery>,
) -> ActixResult<HttpResponse> {
    let departments = service.list_departments(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("departments", departments)))
}

pub async fn count_departments(
    service: web::Data<DepartmentService>,
    query: ValidatedQuery<DepartmentListQuery>,
) -> ActixResult<HttpResponse> {
    let count = service.count_departments(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("count", count)))
}

pub async fn get_department(
    service: web::Data<DepartmentService>,
    id: SafeIdI64,
    include: web::Query<IncludeQuery>,
) -> ActixResult<HttpResponse> {
    let department = service
        .get_department(id.0, include.with_relations())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("department", department)))
}

pub async fn update_department(
    service: web::Data<DepartmentService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    let department = service.update_department(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("department", department)))
}

pub async fn delete_department(
    service: web::Data<DepartmentService>,
    id: SafeIdI64,
    query: web::Query<DeleteQuery>,
) -> ActixResult<HttpResponse> {
    service.delete_department(id.0, query.is_forced()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_department(
    service: web::Data<DepartmentService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let department = service.restore_department(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("department", department)))
}

// 配置路由
pub fn configure_department_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    cfg.service(
        web::scope("/api/v1/departments")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_departments))
                    .route(web::post().to(create_department).wrap(admin())),
            )
            .route("/count", web::get().to(count_departments))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_department))
                    .route(web::patch().to(update_department).wrap(admin()))
                    // force=true 时硬删除
                    .route(web::delete().to(delete_department).wrap(admin())),
            )
            .route(
                "/{id}/restore",
                web::patch().to(restore_department).wrap(admin()),
            ),
    );
}
