use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a009_behavior::aggregate::{Behavior, BehaviorId};
use contracts::enums::breeding_status::BreedingStatus;
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{EntityTrait, QueryOrder, Set, TransactionTrait};

use crate::shared::data::db::get_connection;
use crate::shared::data::reference_store::ReferenceStore;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a009_behavior")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub label: String,
    pub breeding_status: Option<String>,
    pub owner_id: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Behavior {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            owner_id: m.owner_id,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        let breeding_status = m
            .breeding_status
            .as_ref()
            .and_then(|code| BreedingStatus::from_code(code));

        Behavior {
            base: BaseAggregate::with_metadata(BehaviorId(uuid), metadata),
            code: m.code,
            label: m.label,
            breeding_status,
        }
    }
}

fn to_active_model(aggregate: &Behavior) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.code.clone()),
        label: Set(aggregate.label.clone()),
        breeding_status: Set(aggregate.breeding_status.map(|s| s.code().to_string())),
        owner_id: Set(aggregate.base.metadata.owner_id.clone()),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<Behavior>> {
    let items = Entity::find()
        .order_by_asc(Column::Code)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Пакетная вставка в одной транзакции
pub async fn insert_many(items: &[Behavior], chunk_size: usize) -> anyhow::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    let txn = conn().begin().await?;
    for chunk in items.chunks(chunk_size.max(1)) {
        Entity::insert_many(chunk.iter().map(to_active_model))
            .exec_without_returning(&txn)
            .await?;
    }
    txn.commit().await?;
    Ok(())
}

/// Хранилище справочника поверх SQLite
pub struct BehaviorStore {
    chunk_size: usize,
}

impl BehaviorStore {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }
}

#[async_trait]
impl ReferenceStore<Behavior> for BehaviorStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Behavior>> {
        list_all().await
    }

    async fn insert_many(&self, items: Vec<Behavior>) -> anyhow::Result<Vec<Behavior>> {
        insert_many(&items, self.chunk_size).await?;
        Ok(items)
    }
}
