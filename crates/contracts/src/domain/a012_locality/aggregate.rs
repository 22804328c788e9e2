use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use crate::domain::a011_town::TownId;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор записи справочника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalityId(pub Uuid);

impl LocalityId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Лье-дит: именованное место наблюдения внутри коммуны
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    #[serde(flatten)]
    pub base: BaseAggregate<LocalityId>,

    #[serde(rename = "townId")]
    pub town_id: TownId,

    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Высота над уровнем моря, м
    pub altitude: i32,
}

impl Locality {
    /// Создать новую запись для вставки в БД
    pub fn new_for_insert(
        town_id: TownId,
        name: String,
        latitude: f64,
        longitude: f64,
        altitude: i32,
    ) -> Self {
        Self {
            base: BaseAggregate::new(LocalityId::new_v4()),
            town_id,
            name,
            latitude,
            longitude,
            altitude,
        }
    }
}

impl AggregateRoot for Locality {
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn element_name() -> &'static str {
        "Locality"
    }
}
