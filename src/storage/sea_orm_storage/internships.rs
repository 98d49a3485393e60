//! 实习存储操作

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::Order;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set,
};

use super::soft_delete::SoftDeletable;
use super::{SeaOrmStorage, now_ts};
use crate::entity::internships::{ActiveModel, Column, Entity as Internships};
use crate::entity::students;
use crate::errors::Result;
use crate::models::InternshipStatus;
use crate::models::internships::{
    entities::Internship,
    requests::{CreateInternshipRequest, UpdateInternshipRequest},
    responses::{InternshipStatistics, MonthlyCount, StatusCount},
};
use crate::storage::InternshipStorage;
use crate::utils::validate::{DATE_FORMAT, parse_date};

// 补零后按字符串排序即按日期排序
fn date_key(value: &str) -> String {
    parse_date(value)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| value.to_string())
}

impl SeaOrmStorage {
    async fn visible_internships(&self, department_id: Option<i64>) -> Result<Select<Internships>> {
        let select = Internships::find_visible(false);
        let Some(department_id) = department_id else {
            return Ok(select);
        };
        let student_ids: Vec<i64> = students::Entity::find()
            .select_only()
            .column(students::Column::Id)
            .filter(students::Column::DepartmentId.eq(department_id))
            .filter(students::Column::IsDeleted.eq(false))
            .into_tuple::<i64>()
            .all(&self.db)
            .await?;
        Ok(select.filter(Column::StudentId.is_in(student_ids)))
    }
}

#[async_trait]
impl InternshipStorage for SeaOrmStorage {
    async fn create_internship(
        &self,
        student_id: i64,
        req: CreateInternshipRequest,
    ) -> Result<Internship> {
        let now = now_ts();
        let model = ActiveModel {
            student_id: Set(student_id),
            company_name: Set(req.company_name),
            role: Set(req.role),
            description: Set(req.description),
            start_date: Set(date_key(&req.start_date)),
            end_date: Set(req.end_date.as_deref().map(date_key)),
            status: Set(req
                .status
                .unwrap_or(InternshipStatus::Applied)
                .as_str()
                .to_string()),
            stipend: Set(req.stipend),
            location: Set(req.location),
            offer_letter_path: Set(req.offer_letter_path),
            noc_path: Set(None),
            completion_certificate_path: Set(None),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.into_internship())
    }

    async fn get_internship(&self, id: i64) -> Result<Option<Internship>> {
        let model = self.find_live::<Internships>(id, false).await?;
        Ok(model.map(|m| m.into_internship()))
    }

    async fn list_student_internships(&self, student_id: i64) -> Result<Vec<Internship>> {
        let models = Internships::find_visible(false)
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::StartDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.into_internship()).collect())
    }

    async fn update_internship(
        &self,
        id: i64,
        req: UpdateInternshipRequest,
    ) -> Result<Option<Internship>> {
        let Some(existing) = self.find_live::<Internships>(id, false).await? else {
            return Ok(None);
        };

        let mut model = ActiveModel::from(existing);
        if let Some(company_name) = req.company_name {
            model.company_name = Set(company_name);
        }
        if let Some(role) = req.role {
            model.role = Set(role);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(start_date) = req.start_date {
            model.start_date = Set(date_key(&start_date));
        }
        if let Some(end_date) = req.end_date {
            model.end_date = Set(Some(date_key(&end_date)));
        }
        if let Some(status) = req.status {
            model.status = Set(status.as_str().to_string());
        }
        if let Some(stipend) = req.stipend {
            model.stipend = Set(Some(stipend));
        }
        if let Some(location) = req.location {
            model.location = Set(Some(location));
        }
        if let Some(path) = req.offer_letter_path {
            model.offer_letter_path = Set(Some(path));
        }
        if let Some(path) = req.noc_path {
            model.noc_path = Set(Some(path));
        }
        if let Some(path) = req.completion_certificate_path {
            model.completion_certificate_path = Set(Some(path));
        }
        model.updated_at = Set(now_ts());
        Ok(Some(model.update(&self.db).await?.into_internship()))
    }

    async fn set_internship_deleted(
        &self,
        id: i64,
        deleted: bool,
    ) -> Result<Option<Internship>> {
        let model = self.set_deleted::<Internships>(id, deleted).await?;
        Ok(model.map(|m| m.into_internship()))
    }

    async fn internship_statistics(
        &self,
        since: NaiveDate,
        department_id: Option<i64>,
    ) -> Result<InternshipStatistics> {
        let total_internships = self
            .visible_internships(department_id)
            .await?
            .count(&self.db)
            .await?;

        let status_breakdown = self
            .visible_internships(department_id)
            .await?
            .select_only()
            .column(Column::Status)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Status)
            .order_by(Column::Id.count(), Order::Desc)
            .order_by_asc(Column::Status)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(status, count)| {
                let status = status.parse::<InternshipStatus>().ok()?;
                Some(StatusCount {
                    status,
                    count: count.max(0) as u64,
                })
            })
            .collect();

        let start_dates: Vec<String> = self
            .visible_internships(department_id)
            .await?
            .select_only()
            .column(Column::StartDate)
            .filter(Column::StartDate.gte(since.format(DATE_FORMAT).to_string()))
            .into_tuple::<String>()
            .all(&self.db)
            .await?;
        let mut months: BTreeMap<String, u64> = BTreeMap::new();
        for date in start_dates {
            let month = date.get(..7).unwrap_or(&date).to_string();
            *months.entry(month).or_default() += 1;
        }
        let monthly_trends = months
            .into_iter()
            .map(|(month, count)| MonthlyCount { month, count })
            .collect();

        Ok(InternshipStatistics {
            total_internships,
            status_breakdown,
            monthly_trends,
        })
    }
}
