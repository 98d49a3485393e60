//! 学生实习记录
//!
//! 学生登记并维护自己的实习，教师与管理员可以按学生查看并获取统计。

use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use tracing::info;

use crate::errors::{Result, TrackademyError};
use crate::models::internships::{
    entities::Internship,
    requests::{
        CreateInternshipRequest, END_BEFORE_START, InternshipStatsQuery, UpdateInternshipRequest,
    },
    responses::{InternshipListItem, InternshipStatistics, InternshipStudent},
};
use crate::models::students::entities::Student;
use crate::models::users::entities::Identity;
use crate::services::profiles::student_profile;
use crate::services::users::students::STUDENT_NOT_FOUND;
use crate::storage::Storage;
use crate::utils::validate::parse_date;

pub const INTERNSHIP_NOT_FOUND: &str = "Internship not found";
const TREND_MONTHS: u32 = 12;

fn list_items(student: &Student, internships: Vec<Internship>) -> Vec<InternshipListItem> {
    internships
        .into_iter()
        .map(|internship| InternshipListItem {
            internship,
            student: InternshipStudent {
                id: student.id,
                full_name: student.full_name.clone(),
                enrollment_number: student.enrollment_number.clone(),
            },
        })
        .collect()
}

pub struct InternshipService {
    storage: Arc<dyn Storage>,
}

impl InternshipService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn internship(&self, id: i64) -> Result<Internship> {
        self.storage
            .get_internship(id)
            .await?
            .ok_or_else(|| TrackademyError::not_found(INTERNSHIP_NOT_FOUND))
    }

    // 实习记录必须属于调用者本人
    async fn owned_internship(
        &self,
        identity: &Identity,
        id: i64,
        denied: &'static str,
    ) -> Result<Internship> {
        let student = student_profile(self.storage.as_ref(), identity).await?;
        let internship = self.internship(id).await?;
        if internship.student_id != student.id {
            return Err(TrackademyError::forbidden(denied));
        }
        Ok(internship)
    }

    pub async fn create_internship(
        &self,
        identity: Identity,
        req: CreateInternshipRequest,
    ) -> Result<Internship> {
        let student = student_profile(self.storage.as_ref(), &identity).await?;
        let internship = self.storage.create_internship(student.id, req).await?;
        info!(
            "Internship {} at {} added for student {}",
            internship.id, internship.company_name, student.id
        );
        Ok(internship)
    }

    pub async fn my_internships(&self, identity: Identity) -> Result<Vec<InternshipListItem>> {
        let student = student_profile(self.storage.as_ref(), &identity).await?;
        let internships = self.storage.list_student_internships(student.id).await?;
        Ok(list_items(&student, internships))
    }

    pub async fn student_internships(&self, student_id: i64) -> Result<Vec<InternshipListItem>> {
        let student = self
            .storage
            .get_student(student_id)
            .await?
            .ok_or_else(|| TrackademyError::not_found(STUDENT_NOT_FOUND))?;
        let internships = self.storage.list_student_internships(student.id).await?;
        Ok(list_items(&student, internships))
    }

    pub async fn statistics(&self, query: InternshipStatsQuery) -> Result<InternshipStatistics> {
        let today = Utc::now().date_naive();
        let since = today
            .checked_sub_months(Months::new(TREND_MONTHS))
            .unwrap_or(NaiveDate::MIN);
        self.storage
            .internship_statistics(since, query.department_id)
            .await
    }

    pub async fn get_internship(&self, identity: Identity, id: i64) -> Result<Internship> {
        if identity.is_student() {
            return self
                .owned_internship(&identity, id, "You can only view your own internships")
                .await;
        }
        self.internship(id).await
    }

    pub async fn update_internship(
        &self,
        identity: Identity,
        id: i64,
        req: UpdateInternshipRequest,
    ) -> Result<Internship> {
        let existing = self
            .owned_internship(&identity, id, "You can only update your own internships")
            .await?;

        // 只改一端时，与已存的另一端比较
        let start = req.start_date.as_deref().unwrap_or(&existing.start_date);
        let end = req.end_date.as_deref().or(existing.end_date.as_deref());
        if let (Some(start), Some(end)) = (parse_date(start), end.and_then(parse_date))
            && end <= start
        {
            return Err(TrackademyError::bad_request(END_BEFORE_START));
        }

        self.storage
            .update_internship(id, req)
            .await?
            .ok_or_else(|| TrackademyError::not_found(INTERNSHIP_NOT_FOUND))
    }

    pub async fn delete_internship(&self, identity: Identity, id: i64) -> Result<()> {
        self.owned_internship(&identity, id, "You can only delete your own internships")
            .await?;
        self.storage.set_internship_deleted(id, true).await?;
        info!("Internship {} deleted by user {}", id, identity.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InternshipStatus, UserRole};
    use crate::testing::{Fixture, identity, student};

    fn request(company: &str, start: &str, end: Option<&str>) -> CreateInternshipRequest {
        CreateInternshipRequest {
            company_name: company.into(),
            role: "Data Engineering Intern".into(),
            description: Some("ETL pipelines".into()),
            start_date: start.into(),
            end_date: end.map(Into::into),
            status: None,
            stipend: Some(20000.0),
            location: Some("Ahmedabad".into()),
            offer_letter_path: None,
        }
    }

    #[tokio::test]
    async fn test_owner_only_mutations() {
        let fx = Fixture::new().await;
        let service = InternshipService::new(fx.shared());
        let owner = student(&fx, "IT401", "Kavya Desai").await;
        let other = student(&fx, "IT402", "Arjun Nair").await;
        let owner_id = identity(owner.user_id, UserRole::Student);
        let other_id = identity(other.user_id, UserRole::Student);

        let internship = service
            .create_internship(owner_id, request("Zoho", "2025-05-01", Some("2025-07-31")))
            .await
            .unwrap();
        assert_eq!(internship.status, InternshipStatus::Applied);

        let err = service.get_internship(other_id, internship.id).await.unwrap_err();
        assert_eq!(err.message(), "You can only view your own internships");
        let err = service
            .update_internship(
                other_id,
                internship.id,
                UpdateInternshipRequest {
                    status: Some(InternshipStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "You can only update your own internships");
        let err = service
            .delete_internship(other_id, internship.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E003");

        let staff_view = service
            .get_internship(identity(77, UserRole::Admin), internship.id)
            .await
            .unwrap();
        assert_eq!(staff_view.company_name, "Zoho");

        let updated = service
            .update_internship(
                owner_id,
                internship.id,
                UpdateInternshipRequest {
                    status: Some(InternshipStatus::Ongoing),
                    noc_path: Some("trackademy/internships/noc.pdf".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, InternshipStatus::Ongoing);
        assert_eq!(updated.noc_path.as_deref(), Some("trackademy/internships/noc.pdf"));

        service.delete_internship(owner_id, internship.id).await.unwrap();
        let err = service.get_internship(owner_id, internship.id).await.unwrap_err();
        assert_eq!(err.message(), INTERNSHIP_NOT_FOUND);
        assert!(service.my_internships(owner_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_checks_dates_against_stored_period() {
        let fx = Fixture::new().await;
        let service = InternshipService::new(fx.shared());
        let owner = student(&fx, "IT411", "Meera Iyer").await;
        let owner_id = identity(owner.user_id, UserRole::Student);
        let internship = service
            .create_internship(owner_id, request("Infosys", "2025-06-01", Some("2025-08-31")))
            .await
            .unwrap();

        let err = service
            .update_internship(
                owner_id,
                internship.id,
                UpdateInternshipRequest {
                    start_date: Some("2025-09-01".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
        assert_eq!(err.message(), END_BEFORE_START);

        let moved = service
            .update_internship(
                owner_id,
                internship.id,
                UpdateInternshipRequest {
                    end_date: Some("2025-9-30".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.end_date.as_deref(), Some("2025-09-30"));
    }

    #[tokio::test]
    async fn test_listing_carries_student_and_statistics() {
        let fx = Fixture::new().await;
        let service = InternshipService::new(fx.shared());
        let a = student(&fx, "IT421", "Nisha Verma").await;
        let b = student(&fx, "IT422", "Om Prakash").await;
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        for (who, company) in [(&a, "Google"), (&a, "Amazon"), (&b, "Flipkart")] {
            service
                .create_internship(
                    identity(who.user_id, UserRole::Student),
                    request(company, &today, None),
                )
                .await
                .unwrap();
        }

        let listed = service.student_internships(a.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].student.enrollment_number, "IT421");
        let json = serde_json::to_value(&listed[0]).unwrap();
        assert!(json.get("companyName").is_some());
        assert_eq!(json["student"]["fullName"], "Nisha Verma");

        let err = service.student_internships(9999).await.unwrap_err();
        assert_eq!(err.code(), "E004");

        let stats = service
            .statistics(InternshipStatsQuery::default())
            .await
            .unwrap();
        assert_eq!(stats.total_internships, 3);
        assert_eq!(stats.status_breakdown[0].count, 3);
        assert_eq!(stats.monthly_trends.len(), 1);
        assert_eq!(stats.monthly_trends[0].count, 3);
    }

    #[tokio::test]
    async fn test_missing_profile() {
        let fx = Fixture::new().await;
        let service = InternshipService::new(fx.shared());
        let err = service
            .my_internships(identity(4242, UserRole::Student))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
