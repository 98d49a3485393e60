//! 软删除通用操作
//!
//! 所有带 `is_deleted` 列的实体共享查找、软删除/恢复和物理删除逻辑。

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Select};

use super::{SeaOrmStorage, now_ts};
use crate::entity;
use crate::errors::Result;

pub(crate) trait SoftDeletable: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;

    /// 默认排除已删除记录
    fn find_visible(include_deleted: bool) -> Select<Self> {
        let select = Self::find();
        if include_deleted {
            select
        } else {
            select.filter(Self::deleted_column().eq(false))
        }
    }
}

macro_rules! impl_soft_deletable {
    ($($module:ident),* $(,)?) => {
        $(
            impl SoftDeletable for entity::$module::Entity {
                fn id_column() -> Self::Column {
                    entity::$module::Column::Id
                }

                fn deleted_column() -> Self::Column {
                    entity::$module::Column::IsDeleted
                }

                fn updated_at_column() -> Self::Column {
                    entity::$module::Column::UpdatedAt
                }
            }
        )*
    };
}

impl_soft_deletable!(
    users,
    colleges,
    departments,
    academic_years,
    semesters,
    subjects,
    divisions,
    faculties,
    students,
    courses,
    exams,
    assignments,
    submissions,
    certificates,
    internships,
);

/// 在给定连接（可以是事务）上切换删除标记
///
/// 已处于目标状态的记录不会被更新，updated_at 保持不变。
pub(crate) async fn mark_deleted<E, C>(db: &C, id: i64, deleted: bool) -> Result<()>
where
    E: SoftDeletable,
    C: ConnectionTrait,
{
    E::update_many()
        .col_expr(E::deleted_column(), Expr::value(deleted))
        .col_expr(E::updated_at_column(), Expr::value(now_ts()))
        .filter(E::id_column().eq(id))
        .filter(E::deleted_column().ne(deleted))
        .exec(db)
        .await?;
    Ok(())
}

impl SeaOrmStorage {
    pub(crate) async fn find_live<E>(&self, id: i64, include_deleted: bool) -> Result<Option<E::Model>>
    where
        E: SoftDeletable,
        E::Model: Send + Sync,
    {
        Ok(E::find_visible(include_deleted)
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await?)
    }

    /// 设置删除标记并返回最新记录；恢复未删除的记录时原样返回
    pub(crate) async fn set_deleted<E>(&self, id: i64, deleted: bool) -> Result<Option<E::Model>>
    where
        E: SoftDeletable,
        E::Model: Send + Sync,
    {
        mark_deleted::<E, _>(&self.db, id, deleted).await?;
        self.find_live::<E>(id, true).await
    }

    pub(crate) async fn hard_delete<E>(&self, id: i64) -> Result<bool>
    where
        E: SoftDeletable,
    {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
