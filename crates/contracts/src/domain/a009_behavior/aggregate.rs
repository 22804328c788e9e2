use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::breeding_status::BreedingStatus;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор записи справочника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BehaviorId(pub Uuid);

impl BehaviorId {
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

/// Поведение особи (с опциональным статусом гнездования)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    #[serde(flatten)]
    pub base: BaseAggregate<BehaviorId>,

    pub code: String,
    pub label: String,

    #[serde(rename = "breedingStatus")]
    pub breeding_status: Option<BreedingStatus>,
}

impl Behavior {
    /// Создать новую запись для вставки в БД
    pub fn new_for_insert(
        code: String,
        label: String,
        breeding_status: Option<BreedingStatus>,
    ) -> Self {
        Self {
            base: BaseAggregate::new(BehaviorId::new_v4()),
            code,
            label,
            breeding_status,
        }
    }
}

impl AggregateRoot for Behavior {
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn element_name() -> &'static str {
        "Behavior"
    }
}
