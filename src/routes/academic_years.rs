use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::errors::TrackademyError;
use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::academic_years::requests::{
    AcademicYearListQuery, AcademicYearSearchQuery, ActiveAcademicYearQuery,
    CreateAcademicYearRequest, UpdateAcademicYearRequest,
};
use crate::models::common::query::{DeleteQuery, IncludeQuery};
use crate::models::{ApiResponse, UserRole};
use crate::services::AcademicYearService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_academic_year(
    service: web::Data<AcademicYearService>,
    body: ValidatedJson<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    let year = service.create_academic_year(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("academicYear", year)))
}

pub async fn list_academic_years(
    service: web::Data<AcademicYearService>,
    query: ValidatedQuery<AcademicYearListQuery>,
) -> ActixResult<HttpResponse> {
    let years = service.list_academic_years(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("academicYears", years)))
}

pub async fn count_academic_years(
    service: web::Data<AcademicYearService>,
    query: ValidatedQuery<AcademicYearListQuery>,
) -> ActixResult<HttpResponse> {
    let count = service.count_academic_years(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("count", count)))
}

pub async fn active_academic_year(
    service: web::Data<AcademicYearService>,
    query: ValidatedQuery<ActiveAcademicYearQuery>,
) -> ActixResult<HttpResponse> {
    let college_id = query
        .college_id
        .ok_or_else(|| TrackademyError::validation("Validation failed: collegeId: is required"))?;
    let year = service.active_academic_year(college_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("academicYear", year)))
}

pub async fn search_academic_years(
    service: web::Data<AcademicYearService>,
    query: ValidatedQuery<AcademicYearSearchQuery>,
) -> ActixResult<HttpResponse> {
    let years = service.search_academic_years(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list("academicYears", years)))
}

pub async fn get_academic_year(
    service: web::Data<AcademicYearService>,
    id: SafeIdI64,
    include: web::Query<IncludeQuery>,
) -> ActixResult<HttpResponse> {
    let year = service
        .get_academic_year(id.0, include.with_relations())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("academicYear", year)))
}

pub async fn update_academic_year(
    service: web::Data<AcademicYearService>,
    id: SafeIdI64,
    body: ValidatedJson<UpdateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    let year = service.update_academic_year(id.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("academicYear", year)))
}

pub async fn activate_academic_year(
    service: web::Data<AcademicYearService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let year = service.set_active(id.0, true).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("academicYear", year)))
}

pub async fn deactivate_academic_year(
    service: web::Data<AcademicYearService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let year = service.set_active(id.0, false).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("academicYear", year)))
}

pub async fn delete_academic_year(
    service: web::Data<AcademicYearService>,
    id: SafeIdI64,
    query: web::Query<DeleteQuery>,
) -> ActixResult<HttpResponse> {
    service.delete_academic_year(id.0, query.is_forced()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn restore_academic_year(
    service: web::Data<AcademicYearService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let year = service.restore_academic_year(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("academicYear", year)))
}

// 配置路由
pub fn configure_academic_year_routes(cfg: &mut web::ServiceConfig) {
    let admin = || RequireRole::new(&UserRole::Admin);
    cfg.service(
        web::scope("/api/v1/academic-years")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_academic_years))
                    .route(web::post().to(create_academic_year).wrap(admin())),
            )
            .route("/count", web::get().to(count_academic_years))
            .route("/active", web::get().to(active_academic_year))
            .route("/search", web::get().to(search_academic_years))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_academic_year))
                    .route(web::patch().to(update_academic_year).wrap(admin()))
                    .route(web::delete().to(delete_academic_year).wrap(admin())),
            )
            .route(
                "/{id}/activate",
                web::patch().to(activate_academic_year).wrap(admin()),
            )
            .route(
                "/{id}/deactivate",
                web::patch().to(deactivate_academic_year).wrap(admin()),
            )
            .route(
                "/{id}/restore",
                web::patch().to(restore_academic_year).wrap(admin()),
            ),
    );
}
