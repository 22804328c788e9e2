use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор наблюдателя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub Uuid);

impl ObserverId {
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

/// Наблюдатель
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    #[serde(flatten)]
    pub base: BaseAggregate<ObserverId>,

    pub label: String,
}

impl Observer {
    /// Создать новую запись для вставки в БД
    pub fn new_for_insert(label: String) -> Self {
        Self {
            base: BaseAggregate::new(ObserverId::new_v4()),
            label,
        }
    }
}

impl AggregateRoot for Observer {
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn element_name() -> &'static str {
        "Observer"
    }
}
