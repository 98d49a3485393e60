use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::certificates::requests::{CreateCertificateRequest, UpdateCertificateRequest};
use crate::models::users::entities::Identity;
use crate::models::{ApiMessageResponse, UserRole};
use crate::services::CertificateService;
use crate::services::certificates::CERTIFICATE_FILE_FIELD;
use crate::services::uploads::read_upload_form;
use crate::utils::{SafeIdI64, ValidatedJson};

pub async fn create_certificate(
    service: web::Data<CertificateService>,
    identity: Identity,
    body: ValidatedJson<CreateCertificateRequest>,
) -> ActixResult<HttpResponse> {
    let certificate = service
        .create_certificate(identity, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiMessageResponse::success(
        certificate,
        "Certificate created successfully",
    )))
}

pub async fn upload_certificate(
    service: web::Data<CertificateService>,
    identity: Identity,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let form = read_upload_form(payload, CERTIFICATE_FILE_FIELD).await?;
    let certificate = service.create_certificate_upload(identity, form).await?;
    Ok(HttpResponse::Created().json(ApiMessageResponse::success(
        certificate,
        "Certificate created successfully with file upload",
    )))
}

pub async fn my_certificates(
    service: web::Data<CertificateService>,
    identity: Identity,
) -> ActixResult<HttpResponse> {
    let certificates = service.my_certificates(identity).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::list(
        certificates,
        "Certificates retrieved successfully",
    )))
}

pub async fn certificate_statistics(
    service: web::Data<CertificateService>,
) -> ActixResult<HttpResponse> {
    let statistics = service.statistics().await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::success(
        statistics,
        "Certificate statistics retrieved successfully",
    )))
}

pub async fn student_certificates(
    service: web::Data<CertificateService>,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let certificates = service.student_certificates(id.0).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::list(
        certificates,
        "Student certificates retrieved successfully",
    )))
}

pub async fn get_certificate(
    service: web::Data<CertificateService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    let certificate = service.get_certificate(identity, id.0).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::success(
        certificate,
        "Certificate retrieved successfully",
    )))
}

pub async fn update_certificate(
    service: web::Data<CertificateService>,
    identity: Identity,
    id: SafeIdI64,
    body: ValidatedJson<UpdateCertificateRequest>,
) -> ActixResult<HttpResponse> {
    let certificate = service
        .update_certificate(identity, id.0, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::success(
        certificate,
        "Certificate updated successfully",
    )))
}

pub async fn delete_certificate(
    service: web::Data<CertificateService>,
    identity: Identity,
    id: SafeIdI64,
) -> ActixResult<HttpResponse> {
    service.delete_certificate(identity, id.0).await?;
    Ok(HttpResponse::Ok().json(ApiMessageResponse::success(
        (),
        "Certificate deleted successfully",
    )))
}

// 配置路由
pub fn configure_certificate_routes(cfg: &mut web::ServiceConfig) {
    let student = || RequireRole::new(&UserRole::Student);
    let staff = || RequireRole::new_any(UserRole::staff_roles());
    cfg.service(
        web::scope("/api/v1/certificates")
            .wrap(RequireJWT)
            .route("", web::post().to(create_certificate).wrap(student()))
            .route("/upload", web::post().to(upload_certificate).wrap(student()))
            .route("/me", web::get().to(my_certificates).wrap(student()))
            .route("/stats", web::get().to(certificate_statistics).wrap(staff()))
            .route(
                "/student/{id}",
                web::get().to(student_certificates).wrap(staff()),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_certificate))
                    .route(web::patch().to(update_certificate).wrap(student()))
                    .route(web::delete().to(delete_certificate).wrap(student())),
            ),
    );
}
