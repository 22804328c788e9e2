use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a011_town::aggregate::TownId;
use contracts::domain::a012_locality::aggregate::{Locality, LocalityId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{EntityTrait, QueryOrder, Set, TransactionTrait};

use crate::shared::data::db::get_connection;
use crate::shared::data::reference_store::ReferenceStore;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a012_locality")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub town_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: i32,
    pub owner_id: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Locality {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            owner_id: m.owner_id,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let town_uuid = Uuid::parse_str(&m.town_id).unwrap_or_else(|_| Uuid::nil());

        Locality {
            base: BaseAggregate::with_metadata(LocalityId(uuid), metadata),
            town_id: TownId(town_uuid),
            name: m.name,
            latitude: m.latitude,
            longitude: m.longitude,
            altitude: m.altitude,
        }
    }
}

fn to_active_model(aggregate: &Locality) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        town_id: Set(aggregate.town_id.value().to_string()),
        name: Set(aggregate.name.clone()),
        latitude: Set(aggregate.latitude),
        longitude: Set(aggregate.longitude),
        altitude: Set(aggregate.altitude),
        owner_id: Set(aggregate.base.metadata.owner_id.clone()),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<Locality>> {
    let items = Entity::find()
        .order_by_asc(Column::TownId)
        .order_by_asc(Column::Name)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Пакетная вставка в одной транзакции
pub async fn insert_many(items: &[Locality], chunk_size: usize) -> anyhow::Result<()> {
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
pub struct LocalityStore {
    chunk_size: usize,
}

impl LocalityStore {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }
}

#[async_trait]
impl ReferenceStore<Locality> for LocalityStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Locality>> {
        list_all().await
    }

    async fn insert_many(&self, items: Vec<Locality>) -> anyhow::Result<Vec<Locality>> {
        insert_many(&items, self.chunk_size).await?;
        Ok(items)
    }
}
