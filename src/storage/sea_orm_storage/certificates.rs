//! 证书存储操作

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use sea_orm::sea_query::Order;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::soft_delete::SoftDeletable;
use super::{SeaOrmStorage, now_ts};
use crate::entity::certificates::{ActiveModel, Column, Entity as Certificates};
use crate::entity::students;
use crate::errors::Result;
use crate::models::certificates::{
    entities::Certificate,
    requests::{CreateCertificateRequest, UpdateCertificateRequest},
    responses::{CertificateStatistics, OrganizationCount},
};
use crate::storage::CertificateStorage;

const TOP_ORGANIZATIONS: u64 = 5;

fn month_start(now: DateTime<Utc>) -> i64 {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .map(|start| start.timestamp())
        .unwrap_or_default()
}

#[async_trait]
impl CertificateStorage for SeaOrmStorage {
    async fn create_certificate(
        &self,
        student_id: i64,
        req: CreateCertificateRequest,
    ) -> Result<Certificate> {
        let now = now_ts();
        let model = ActiveModel {
            student_id: Set(student_id),
            title: Set(req.title),
            issuing_organization: Set(req.issuing_organization),
            issue_date: Set(req.issue_date),
            description: Set(req.description),
            certificate_path: Set(req.certificate_path),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.into_certificate())
    }

    async fn get_certificate(&self, id: i64) -> Result<Option<Certificate>> {
        let model = self.find_live::<Certificates>(id, false).await?;
        Ok(model.map(|m| m.into_certificate()))
    }

    async fn list_student_certificates(&self, student_id: i64) -> Result<Vec<Certificate>> {
        let models = Certificates::find_visible(false)
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::IssueDate)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_certificate()).collect())
    }

    async fn update_certificate(
        &self,
        id: i64,
        req: UpdateCertificateRequest,
    ) -> Result<Option<Certificate>> {
        let Some(existing) = self.find_live::<Certificates>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(title) = req.title {
            model.title = Set(title);
        }
        if let Some(organization) = req.issuing_organization {
            model.issuing_organization = Set(organization);
        }
        if let Some(issue_date) = req.issue_date {
            model.issue_date = Set(issue_date);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        model.updated_at = Set(now_ts());
        Ok(Some(model.update(&self.db).await?.into_certificate()))
    }

    async fn set_certificate_deleted(
        &self,
        id: i64,
        deleted: bool,
    ) -> Result<Option<Certificate>> {
        let model = self.set_deleted::<Certificates>(id, deleted).await?;
        Ok(model.map(|m| m.into_certificate()))
    }

    async fn certificate_statistics(&self, now: DateTime<Utc>) -> Result<CertificateStatistics> {
        let total_certificates = Certificates::find_visible(false).count(&self.db).await?;
        let certificates_this_month = Certificates::find_visible(false)
            .filter(Column::CreatedAt.gte(month_start(now)))
            .count(&self.db)
            .await?;

        let top_issuing_organizations = Certificates::find_visible(false)
            .select_only()
            .column(Column::IssuingOrganization)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::IssuingOrganization)
            .order_by(Column::Id.count(), Order::Desc)
            .order_by_asc(Column::IssuingOrganization)
            .limit(TOP_ORGANIZATIONS)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(issuing_organization, count)| OrganizationCount {
                issuing_organization,
                count: count.max(0) as u64,
            })
            .collect();

        let holder_ids: Vec<i64> = Certificates::find_visible(false)
            .select_only()
            .column(Column::StudentId)
            .distinct()
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;
        let students_with_certificates = if holder_ids.is_empty() {
            0
        } else {
            students::Entity::find()
                .filter(students::Column::Id.is_in(holder_ids))
                .filter(students::Column::IsDeleted.eq(false))
                .count(&self.db)
                .await?
        };

        Ok(CertificateStatistics {
            total_certificates,
            certificates_this_month,
            top_issuing_organizations,
            students_with_certificates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, Fixture};

    fn certificate(title: &str, organization: &str) -> CreateCertificateRequest {
        CreateCertificateRequest {
            title: title.into(),
            issuing_organization: organization.into(),
            issue_date: "2024-05-01".into(),
            description: None,
            certificate_path: "trackademy/certificates/1/cert.pdf".into(),
        }
    }

    #[test]
    fn test_month_start() {
        let now = Utc.with_ymd_and_hms(2024, 9, 17, 13, 5, 0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();
        assert_eq!(month_start(now), start.timestamp());
    }

    #[tokio::test]
    async fn test_statistics() {
        let fx = Fixture::new().await;
        let aarav = testing::student(&fx, "22CE001", "Aarav Patel").await;
        let diya = testing::student(&fx, "22CE002", "Diya Mehta").await;

        for (student, title, organization) in [
            (aarav.id, "Cloud Practitioner", "Amazon"),
            (aarav.id, "Solutions Architect", "Amazon"),
            (diya.id, "Data Analytics", "Google"),
        ] {
            fx.storage
                .create_certificate(student, certificate(title, organization))
                .await
                .unwrap();
        }
        let removed = fx
            .storage
            .create_certificate(diya.id, certificate("Old", "Coursera"))
            .await
            .unwrap();
        fx.storage
            .set_certificate_deleted(removed.id, true)
            .await
            .unwrap();

        let stats = fx.storage.certificate_statistics(Utc::now()).await.unwrap();
        assert_eq!(stats.total_certificates, 3);
        assert_eq!(stats.certificates_this_month, 3);
        assert_eq!(stats.students_with_certificates, 2);
        assert_eq!(stats.top_issuing_organizations.len(), 2);
        assert_eq!(stats.top_issuing_organizations[0].issuing_organization, "Amazon");
        assert_eq!(stats.top_issuing_organizations[0].count, 2);

        let mine = fx.storage.list_student_certificates(diya.id).await.unwrap();
        assert_eq!(mine.len(), 1);
    }
}
