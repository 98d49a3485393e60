//! 学生证书
//!
//! 学生维护自己的证书，教师与管理员可以按学生查看并获取统计。

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::errors::{Result, TrackademyError};
use crate::models::certificates::{
    entities::Certificate,
    requests::{CreateCertificateRequest, UpdateCertificateRequest},
    responses::CertificateStatistics,
};
use crate::models::users::entities::Identity;
use crate::services::profiles::student_profile;
use crate::services::uploads::{UploadForm, store_upload};
use crate::services::users::students::STUDENT_NOT_FOUND;
use crate::storage::object_store::ObjectStore;
use crate::storage::Storage;
use crate::utils::validate::Validate;

pub const CERTIFICATE_NOT_FOUND: &str = "Certificate not found";
pub const CERTIFICATE_FILE_FIELD: &str = "certificate";
const UPLOAD_FOLDER: &str = "certificates";
const UPLOAD_PREFIX: &str = "certificate";

pub struct CertificateService {
    storage: Arc<dyn Storage>,
    object_store: Arc<dyn ObjectStore>,
}

impl CertificateService {
    pub fn new(storage: Arc<dyn Storage>, object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            storage,
            object_store,
        }
    }

    async fn certificate(&self, id: i64) -> Result<Certificate> {
        self.storage
            .get_certificate(id)
            .await?
            .ok_or_else(|| TrackademyError::not_found(CERTIFICATE_NOT_FOUND))
    }

    // 证书必须属于调用者本人
    async fn owned_certificate(
        &self,
        identity: &Identity,
        id: i64,
        denied: &'static str,
    ) -> Result<Certificate> {
        let student = student_profile(self.storage.as_ref(), identity).await?;
        let certificate = self.certificate(id).await?;
        if certificate.student_id != student.id {
            return Err(TrackademyError::forbidden(denied));
        }
        Ok(certificate)
    }

    pub async fn create_certificate(
        &self,
        identity: Identity,
        req: CreateCertificateRequest,
    ) -> Result<Certificate> {
        let student = student_profile(self.storage.as_ref(), &identity).await?;
        let certificate = self.storage.create_certificate(student.id, req).await?;
        info!(
            "Certificate {} added for student {}",
            certificate.id, student.id
        );
        Ok(certificate)
    }

    /// multipart 上传：文件字段 `certificate`，其余为文本字段
    pub async fn create_certificate_upload(
        &self,
        identity: Identity,
        mut form: UploadForm,
    ) -> Result<Certificate> {
        let student = student_profile(self.storage.as_ref(), &identity).await?;
        let file = form.require_file(CERTIFICATE_FILE_FIELD)?;

        // 文件名先占位，写入后替换为对象键
        let mut req = CreateCertificateRequest {
            title: form.text("title").unwrap_or_default(),
            issuing_organization: form.text("issuingOrganization").unwrap_or_default(),
            issue_date: form.text("issueDate").unwrap_or_default(),
            description: form.text("description"),
            certificate_path: file.file_name.clone(),
        };
        req.validate()?;

        req.certificate_path = store_upload(
            self.object_store.as_ref(),
            UPLOAD_FOLDER,
            UPLOAD_PREFIX,
            identity.user_id,
            file,
        )
        .await?;
        let certificate = self.storage.create_certificate(student.id, req).await?;
        info!(
            "Certificate {} uploaded for student {}",
            certificate.id, student.id
        );
        Ok(certificate)
    }

    pub async fn my_certificates(&self, identity: Identity) -> Result<Vec<Certificate>> {
        let student = student_profile(self.storage.as_ref(), &identity).await?;
        self.storage.list_student_certificates(student.id).await
    }

    pub async fn student_certificates(&self, student_id: i64) -> Result<Vec<Certificate>> {
        self.storage
            .get_student(student_id)
            .await?
            .ok_or_else(|| TrackademyError::not_found(STUDENT_NOT_FOUND))?;
        self.storage.list_student_certificates(student_id).await
    }

    pub async fn statistics(&self) -> Result<CertificateStatistics> {
        self.storage.certificate_statistics(Utc::now()).await
    }

    pub async fn get_certificate(&self, identity: Identity, id: i64) -> Result<Certificate> {
        if identity.is_student() {
            return self
                .owned_certificate(&identity, id, "You can only view your own certificates")
                .await;
        }
        self.certificate(id).await
    }

    pub async fn update_certificate(
        &self,
        identity: Identity,
        id: i64,
        req: UpdateCertificateRequest,
    ) -> Result<Certificate> {
        self.owned_certificate(&identity, id, "You can only update your own certificates")
            .await?;
        self.storage
            .update_certificate(id, req)
            .await?
            .ok_or_else(|| TrackademyError::not_found(CERTIFICATE_NOT_FOUND))
    }

    pub async fn delete_certificate(&self, identity: Identity, id: i64) -> Result<()> {
        self.owned_certificate(&identity, id, "You can only delete your own certificates")
            .await?;
        self.storage.set_certificate_deleted(id, true).await?;
        info!("Certificate {} deleted by user {}", id, identity.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::services::uploads::UploadedFile;
    use crate::storage::object_store::LocalObjectStore;
    use crate::testing::{Fixture, identity, student};

    fn service(fx: &Fixture) -> (CertificateService, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "trackademy-certificates-{}",
            uuid::Uuid::new_v4()
        ));
        let service =
            CertificateService::new(fx.shared(), Arc::new(LocalObjectStore::new(dir.clone())));
        (service, dir)
    }

    fn request(title: &str) -> CreateCertificateRequest {
        CreateCertificateRequest {
            title: title.into(),
            issuing_organization: "Coursera".into(),
            issue_date: "2024-06-01".into(),
            description: None,
            certificate_path: "trackademy/certificates/1/certificate_1_1.pdf".into(),
        }
    }

    #[tokio::test]
    async fn test_owner_only_mutations() {
        let fx = Fixture::new().await;
        let (service, _) = service(&fx);
        let owner = student(&fx, "CE301", "Isha Patel").await;
        let other = student(&fx, "CE302", "Rohan Mehta").await;
        let owner_id = identity(owner.user_id, UserRole::Student);
        let other_id = identity(other.user_id, UserRole::Student);

        let cert = service
            .create_certificate(owner_id, request("Machine Learning"))
            .await
            .unwrap();
        assert_eq!(cert.student_id, owner.id);

        let err = service.get_certificate(other_id, cert.id).await.unwrap_err();
        assert_eq!(err.message(), "You can only view your own certificates");

        let err = service
            .update_certificate(
                other_id,
                cert.id,
                UpdateCertificateRequest {
                    title: Some("Stolen".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E003");

        let err = service.delete_certificate(other_id, cert.id).await.unwrap_err();
        assert_eq!(err.message(), "You can only delete your own certificates");

        // 教师可以查看任意学生的证书
        let faculty_view = service
            .get_certificate(identity(99, UserRole::Faculty), cert.id)
            .await
            .unwrap();
        assert_eq!(faculty_view.title, "Machine Learning");

        service.delete_certificate(owner_id, cert.id).await.unwrap();
        let err = service.get_certificate(owner_id, cert.id).await.unwrap_err();
        assert_eq!(err.message(), CERTIFICATE_NOT_FOUND);
        assert!(service.my_certificates(owner_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_statistics_and_student_listing() {
        let fx = Fixture::new().await;
        let (service, _) = service(&fx);
        let a = student(&fx, "CE311", "Anaya Joshi").await;
        let b = student(&fx, "CE312", "Dev Kapoor").await;
        for (who, title) in [(&a, "Cloud"), (&a, "Security"), (&b, "Databases")] {
            service
                .create_certificate(identity(who.user_id, UserRole::Student), request(title))
                .await
                .unwrap();
        }

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.total_certificates, 3);
        assert_eq!(stats.students_with_certificates, 2);
        assert_eq!(stats.top_issuing_organizations[0].count, 3);

        assert_eq!(service.student_certificates(a.id).await.unwrap().len(), 2);
        let err = service.student_certificates(9999).await.unwrap_err();
        assert_eq!(err.code(), "E004");
    }

    #[tokio::test]
    async fn test_upload_creates_certificate() {
        let fx = Fixture::new().await;
        let (service, dir) = service(&fx);
        let owner = student(&fx, "CE321", "Tara Sen").await;

        let mut form = UploadForm::default();
        for (k, v) in [
            ("title", "Kubernetes Basics"),
            ("issuingOrganization", "CNCF"),
            ("issueDate", "2024-02-10"),
        ] {
            form.fields.insert(k.into(), v.into());
        }
        form.file = Some(UploadedFile {
            file_name: "k8s.png".into(),
            extension: ".png".into(),
            bytes: vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00],
        });

        let cert = service
            .create_certificate_upload(identity(owner.user_id, UserRole::Student), form)
            .await
            .unwrap();
        assert!(cert.certificate_path.starts_with(&format!(
            "trackademy/certificates/{}/certificate_",
            owner.user_id
        )));
        assert!(cert.certificate_path.ends_with(".png"));
        assert!(dir.join(&cert.certificate_path).exists());
        let _ = std::fs::remove_dir_all(&dir);

        let err = service
            .create_certificate_upload(
                identity(owner.user_id, UserRole::Student),
                UploadForm::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "File field 'certificate' is required.");
    }
}
