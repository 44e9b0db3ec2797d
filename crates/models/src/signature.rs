//! `signatures` table: one row per accepted petition signature.
//!
//! Rows are insert-only. The unique key on `national_id` is what keeps a
//! person from signing twice, so inserts report that case separately.
use sea_orm::{entity::prelude::*, ConnectionTrait, NotSet, PaginatorTrait, QueryOrder, QuerySelect, Set, SqlErr};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "signatures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(unique)]
    pub national_id: String,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub anonymous: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A signature that already went through validation and sanitization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSignature {
    pub name: String,
    pub national_id: String,
    pub comment: String,
    pub anonymous: bool,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewSignature) -> Result<Model, errors::ModelError> {
    if new.national_id.is_empty() {
        return Err(errors::ModelError::Validation("national_id required".into()));
    }
    let national_id = new.national_id.clone();
    let am = ActiveModel {
        id: NotSet,
        name: Set(new.name),
        national_id: Set(new.national_id),
        comment: Set(new.comment),
        anonymous: Set(new.anonymous),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| map_insert_err(e, &national_id))
}

/// Rows in insertion order, starting at row `offset`.
pub async fn page<C: ConnectionTrait>(db: &C, offset: u64, limit: u64) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, errors::ModelError> {
    Entity::find().count(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

fn map_insert_err(e: DbErr, national_id: &str) -> errors::ModelError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => errors::ModelError::Duplicate(national_id.to_string()),
        _ => errors::ModelError::Db(e.to_string()),
    }
}
