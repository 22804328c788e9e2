use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор записи справочника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgeId(pub Uuid);

impl AgeId {
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

/// Возраст особи
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Age {
    #[serde(flatten)]
    pub base: BaseAggregate<AgeId>,

    pub label: String,
}

impl Age {
    /// Создать новую запись для вставки в БД
    pub fn new_for_insert(label: String) -> Self {
        Self {
            base: BaseAggregate::new(AgeId::new_v4()),
            label,
        }
    }
}

impl AggregateRoot for Age {
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn element_name() -> &'static str {
        "Age"
    }
}
