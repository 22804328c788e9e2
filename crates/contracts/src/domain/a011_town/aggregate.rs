use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use crate::domain::a010_department::DepartmentId;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор записи справочника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TownId(pub Uuid);

impl TownId {
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

/// Коммуна (населенный пункт внутри департамента)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Town {
    #[serde(flatten)]
    pub base: BaseAggregate<TownId>,

    #[serde(rename = "departmentId")]
    pub department_id: DepartmentId,

    /// Код коммуны (INSEE), уникален внутри департамента
    pub code: i32,
    pub name: String,
}

impl Town {
    /// Создать новую запись для вставки в БД
    pub fn new_for_insert(department_id: DepartmentId, code: i32, name: String) -> Self {
        Self {
            base: BaseAggregate::new(TownId::new_v4()),
            department_id,
            code,
            name,
        }
    }
}

impl AggregateRoot for Town {
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn element_name() -> &'static str {
        "Town"
    }
}
