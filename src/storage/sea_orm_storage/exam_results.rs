//! 考试成绩存储操作
//!
//! 成绩与单科明细同事务写入；成绩本身不做软删除。

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{SeaOrmStorage, now_ts};
use crate::entity::exam_results::{ActiveModel, Column, Entity as ExamResults, Model};
use crate::entity::{exam_subject_results, exams};
use crate::errors::{Result, TrackademyError};
use crate::models::{
    ResultStatus,
    exam_results::{
        entities::ExamResult,
        requests::{
            CreateExamResultRequest, ExamResultFilter, RankField, SubjectResultInput,
            UpdateExamResultRequest,
        },
        responses::ExamResultStatistics,
    },
};
use crate::storage::ExamResultStorage;
use crate::utils::sql::{contains_pattern, search_term};

fn rank_column(by: RankField) -> Column {
    match by {
        RankField::Spi => Column::Spi,
        RankField::Cpi => Column::Cpi,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn insert_subject_results<C: ConnectionTrait>(
    db: &C,
    exam_result_id: i64,
    items: Vec<SubjectResultInput>,
) -> Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    let models = items.into_iter().map(|item| exam_subject_results::ActiveModel {
        exam_result_id: Set(exam_result_id),
        subject_id: Set(item.subject_id),
        grade: Set(item.grade),
        credits: Set(item.credits),
        ..Default::default()
    });
    exam_subject_results::Entity::insert_many(models)
        .exec(db)
        .await?;
    Ok(())
}

impl SeaOrmStorage {
    /// 批量加载单科明细并组装业务实体
    async fn attach_subject_results(&self, models: Vec<Model>) -> Result<Vec<ExamResult>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut grouped: HashMap<i64, Vec<exam_subject_results::Model>> = HashMap::new();
        for item in exam_subject_results::Entity::find()
            .filter(exam_subject_results::Column::ExamResultId.is_in(ids))
            .order_by_asc(exam_subject_results::Column::Id)
            .all(&self.db)
            .await?
        {
            grouped.entry(item.exam_result_id).or_default().push(item);
        }

        Ok(models
            .into_iter()
            .map(|m| {
                let items = grouped.remove(&m.id).unwrap_or_default();
                m.into_exam_result(items)
            })
            .collect())
    }

    async fn load_exam_result(&self, model: Option<Model>) -> Result<Option<ExamResult>> {
        let Some(model) = model else {
            return Ok(None);
        };
        Ok(self.attach_subject_results(vec![model]).await?.pop())
    }

    async fn exam_result_condition(&self, filter: &ExamResultFilter) -> Result<Condition> {
        let mut condition = Condition::all();
        if let Some(exam_id) = filter.exam_id {
            condition = condition.add(Column::ExamId.eq(exam_id));
        }

        // 学期/院系/学年经由考试圈定
        let mut semester_ids = self
            .scoped_semester_ids(filter.department_id, filter.academic_year_id)
            .await?;
        if let Some(semester_id) = filter.semester_id {
            semester_ids = Some(match semester_ids {
                Some(ids) => ids.into_iter().filter(|id| *id == semester_id).collect(),
                None => vec![semester_id],
            });
        }
        if let Some(semester_ids) = semester_ids {
            let exam_ids: Vec<i64> = exams::Entity::find()
                .select_only()
                .column(exams::Column::Id)
                .filter(exams::Column::SemesterId.is_in(semester_ids))
                .into_tuple::<i64>()
                .all(&self.db)
                .await?;
            condition = condition.add(Column::ExamId.is_in(exam_ids));
        }

        if let Some(student_id) = filter.student_id {
            condition = condition.add(Column::StudentId.eq(student_id));
        }
        if let Some(enrollment) = &filter.enrollment_number {
            condition = condition.add(Column::StudentEnrollmentNumber.eq(enrollment.as_str()));
        }
        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status.as_str()));
        }
        if let Some(term) = search_term(filter.search.as_deref()) {
            condition = condition.add(Column::StudentEnrollmentNumber.like(contains_pattern(&term)));
        }
        if let Some(min) = filter.min_spi {
            condition = condition.add(Column::Spi.gte(min));
        }
        if let Some(max) = filter.max_spi {
            condition = condition.add(Column::Spi.lte(max));
        }
        if let Some(min) = filter.min_cpi {
            condition = condition.add(Column::Cpi.gte(min));
        }
        if let Some(max) = filter.max_cpi {
            condition = condition.add(Column::Cpi.lte(max));
        }
        Ok(condition)
    }

    async fn top_result(&self, condition: Condition, by: RankField) -> Result<Option<ExamResult>> {
        let model = ExamResults::find()
            .filter(condition)
            .order_by_desc(rank_column(by))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await?;
        self.load_exam_result(model).await
    }
}

#[async_trait]
impl ExamResultStorage for SeaOrmStorage {
    async fn create_exam_result(&self, req: CreateExamResultRequest) -> Result<ExamResult> {
        let txn = self.db.begin().await?;

        let now = now_ts();
        let saved = ActiveModel {
            exam_id: Set(req.exam_id),
            student_id: Set(req.student_id),
            student_enrollment_number: Set(req.student_enrollment_number),
            spi: Set(req.spi),
            cpi: Set(req.cpi),
            status: Set(req.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        insert_subject_results(&txn, saved.id, req.results).await?;

        txn.commit().await?;

        self.load_exam_result(Some(saved))
            .await?
            .ok_or_else(|| TrackademyError::internal("Exam result missing after insert"))
    }

    async fn get_exam_result(&self, id: i64) -> Result<Option<ExamResult>> {
        let model = ExamResults::find_by_id(id).one(&self.db).await?;
        self.load_exam_result(model).await
    }

    async fn find_exam_result(
        &self,
        exam_id: i64,
        enrollment_number: &str,
    ) -> Result<Option<ExamResult>> {
        let model = ExamResults::find()
            .filter(Column::ExamId.eq(exam_id))
            .filter(Column::StudentEnrollmentNumber.eq(enrollment_number))
            .one(&self.db)
            .await?;
        self.load_exam_result(model).await
    }

    async fn list_exam_results(&self, filter: ExamResultFilter) -> Result<Vec<ExamResult>> {
        let models = ExamResults::find()
            .filter(self.exam_result_condition(&filter).await?)
            .order_by_desc(Column::Spi)
            .order_by_asc(Column::StudentEnrollmentNumber)
            .all(&self.db)
            .await?;
        self.attach_subject_results(models).await
    }

    async fn update_exam_result(
        &self,
        id: i64,
        req: UpdateExamResultRequest,
    ) -> Result<Option<ExamResult>> {
        let Some(existing) = ExamResults::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let txn = self.db.begin().await?;
        let mut model = ActiveModel::from(existing);
        if let Some(student_id) = req.student_id {
            model.student_id = Set(Some(student_id));
        }
        if let Some(spi) = req.spi {
            model.spi = Set(spi);
        }
        if let Some(cpi) = req.cpi {
            model.cpi = Set(cpi);
        }
        if let Some(status) = req.status {
            model.status = Set(status.as_str().to_string());
        }
        model.updated_at = Set(now_ts());
        let saved = model.update(&txn).await?;

        if let Some(items) = req.results {
            exam_subject_results::Entity::delete_many()
                .filter(exam_subject_results::Column::ExamResultId.eq(id))
                .exec(&txn)
                .await?;
            insert_subject_results(&txn, id, items).await?;
        }
        txn.commit().await?;

        self.load_exam_result(Some(saved)).await
    }

    async fn delete_exam_result(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;
        exam_subject_results::Entity::delete_many()
            .filter(exam_subject_results::Column::ExamResultId.eq(id))
            .exec(&txn)
            .await?;
        let result = ExamResults::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    async fn exam_result_statistics(
        &self,
        filter: ExamResultFilter,
    ) -> Result<ExamResultStatistics> {
        let condition = self.exam_result_condition(&filter).await?;

        let (total, average_spi, average_cpi, highest_spi, lowest_spi) = ExamResults::find()
            .select_only()
            .column_as(Column::Id.count(), "total")
            .column_as(SimpleExpr::from(Func::avg(Expr::col(Column::Spi))), "average_spi")
            .column_as(SimpleExpr::from(Func::avg(Expr::col(Column::Cpi))), "average_cpi")
            .column_as(Column::Spi.max(), "highest_spi")
            .column_as(Column::Spi.min(), "lowest_spi")
            .filter(condition.clone())
            .into_tuple::<(i64, Option<f64>, Option<f64>, Option<f64>, Option<f64>)>()
            .one(&self.db)
            .await?
            .unwrap_or_default();

        let total_results = total.max(0) as u64;
        if total_results == 0 {
            return Ok(ExamResultStatistics::default());
        }

        let pass_count = ExamResults::find()
            .filter(condition.clone())
            .filter(Column::Status.eq(ResultStatus::Pass.as_str()))
            .count(&self.db)
            .await?;
        let fail_count = total_results.saturating_sub(pass_count);
        let percentage = |count: u64| round2(count as f64 / total_results as f64 * 100.0);

        Ok(ExamResultStatistics {
            total_results,
            pass_count,
            fail_count,
            pass_percentage: percentage(pass_count),
            fail_percentage: percentage(fail_count),
            average_spi: round2(average_spi.unwrap_or_default()),
            average_cpi: round2(average_cpi.unwrap_or_default()),
            highest_spi: highest_spi.unwrap_or_default(),
            lowest_spi: lowest_spi.unwrap_or_default(),
            top_spi_result: self.top_result(condition.clone(), RankField::Spi).await?,
            top_cpi_result: self.top_result(condition, RankField::Cpi).await?,
        })
    }

    async fn top_performers(
        &self,
        exam_id: Option<i64>,
        limit: u64,
        by: RankField,
    ) -> Result<Vec<ExamResult>> {
        let mut select = ExamResults::find();
        if let Some(exam_id) = exam_id {
            select = select.filter(Column::ExamId.eq(exam_id));
        }
        let models = select
            .order_by_desc(rank_column(by))
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        self.attach_subject_results(models).await
    }
}
