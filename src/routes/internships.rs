use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::internships::requests::{
    CreateInternshipRequest, InternshipStatsQuery, UpdateInternshipRequest,
};
use crate::models::users::entities::Identity;
use crate::models::{ApiMessageResponse, UserRole};
use crate::services::InternshipService;
use crate::utils::{SafeIdI64, ValidatedJson, ValidatedQuery};

pub async fn create_internship(
    service: web::Data<InternshipService>,
    identity: Identity,
    body: ValidatedJson<CreateInternshipRequest>,
) -> ActixResult<HttpResponse> {
    let internship = service.create_internship(identity, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiMessageResponse::success(
        internship,
        "Internship created successfully",
    )))
}

pub async fn my_internships(
    service: web::Data<InternshipService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    let internships = service.my_internships(identity).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::list(
        internships,
        "Internships retrieved successfully",
    )))
}

pub async fn internship_statistics(
    service: web::Data<InternshipService>,
    query: ValidatedQuery<InternshipStatsQuery>,
) -> ActixResult<HttpResponse> {
    let statistics = service.statistics(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::success(
        statistics,
        "Internship statistics retrieved successfully",
    )))
}

pub async fn student_internships(
    service: web::Data<InternshipService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let internships = service.student_internships(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::list(
        internships,
        "Student internships retrieved successfully",
    )))
}

pub async fn get_internship(
    service: web::Data<InternshipService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let internship = service.get_internship(identity, id.0).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::success(
        internship,
        "Internship retrieved successfully",
    )))
}

pub async fn update_internship(
    service: web::Data<InternshipService>,
    identity: Identity,
    id: SafeIdI64,
    body: ValidatedJson<UpdateInternshipRequest>,
) -> ActixResult<HttpResponse> {
    let internship = service
        .update_internship(identity, id.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::success(
        internship,
        "Internship updated successfully",
    )))
}

pub async fn delete_internship(
    service: web::Data<InternshipService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_internship(identity, id.0).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::success(
        (),
        "Internship deleted successfully",
    )))
}

// 配置路由
pub fn configure_internship_routes(cfg: &mut web::ServiceConfig) {
    let student = || RequireRole::new(&UserRole::Student);
    let staff = || RequireRole::new_any(UserRole::staff_roles());
    cfg.service(
        web::scope("/api/v1/internships")
            .wrap(RequireJWT)
            .service(
                web::resource("")
                    .route(web::post().to(create_internship).wrap(student()))
                    .route(web::get().to(my_internships).wrap(student())),
            )
            .route("/stats", web::get().to(internship_statistics).wrap(staff()))
            .route(
                "/student/{id}",
                web::get().to(student_internships).wrap(staff()),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_internship))
                    .route(web::patch().to(update_internship).wrap(student()))
                    .route(web::delete().to(delete_internship).wrap(student())),
            ),
    );
}
