use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор записи справочника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberEstimateId(pub Uuid);

impl NumberEstimateId {
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

/// Оценка численности ("~10", "не подсчитано"...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberEstimate {
    #[serde(flatten)]
    pub base: BaseAggregate<NumberEstimateId>,

    pub label: String,

    /// Особи не подсчитывались (количество в наблюдении не указывается)
    #[serde(rename = "nonCounted")]
    pub non_counted: bool,
}

impl NumberEstimate {
    /// Создать новую запись для вставки в БД
    pub fn new_for_insert(label: String, non_counted: bool) -> Self {
        Self {
            base: BaseAggregate::new(NumberEstimateId::new_v4()),
            label,
            non_counted,
        }
    }
}

impl AggregateRoot for NumberEstimate {
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn element_name() -> &'static str {
        "Number estimate"
    }
}
