use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a007_species_class::aggregate::SpeciesClassId;
use contracts::domain::a013_species::aggregate::{Species, SpeciesId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{EntityTrait, QueryOrder, Set, TransactionTrait};

use crate::shared::data::db::get_connection;
use crate::shared::data::reference_store::ReferenceStore;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a013_species")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub class_id: String,
    pub code: String,
    pub common_name: String,
    pub scientific_name: String,
    pub owner_id: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Species {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            owner_id: m.owner_id,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let class_uuid = Uuid::parse_str(&m.class_id).unwrap_or_else(|_| Uuid::nil());

        Species {
            base: BaseAggregate::with_metadata(SpeciesId(uuid), metadata),
            class_id: SpeciesClassId(class_uuid),
            code: m.code,
            common_name: m.common_name,
            scientific_name: m.scientific_name,
        }
    }
}

fn to_active_model(aggregate: &Species) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        class_id: Set(aggregate.class_id.value().to_string()),
        code: Set(aggregate.code.clone()),
        common_name: Set(aggregate.common_name.clone()),
        scientific_name: Set(aggregate.scientific_name.clone()),
        owner_id: Set(aggregate.base.metadata.owner_id.clone()),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<Species>> {
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
pub async fn insert_many(items: &[Species], chunk_size: usize) -> anyhow::Result<()> {
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
pub struct SpeciesStore {
    chunk_size: usize,
}

impl SpeciesStore {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }
}

#[async_trait]
impl ReferenceStore<Species> for SpeciesStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Species>> {
        list_all().await
    }

    async fn insert_many(&self, items: Vec<Species>) -> anyhow::Result<Vec<Species>> {
        insert_many(&items, self.chunk_size).await?;
        Ok(items)
    }
}
