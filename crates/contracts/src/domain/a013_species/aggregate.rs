use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::{AggregateRoot, BaseAggregate, EntityMetadata};
use crate::domain::a007_species_class::SpeciesClassId;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор записи справочника
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeciesId(pub Uuid);

impl SpeciesId {
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

/// Вид
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    #[serde(flatten)]
    pub base: BaseAggregate<SpeciesId>,

    #[serde(rename = "classId")]
    pub class_id: SpeciesClassId,

    pub code: String,

    #[serde(rename = "commonName")]
    pub common_name: String,

    #[serde(rename = "scientificName")]
    pub scientific_name: String,
}

impl Species {
    /// Создать новую запись для вставки в БД
    pub fn new_for_insert(
        class_id: SpeciesClassId,
        code: String,
        common_name: String,
        scientific_name: String,
    ) -> Self {
        Self {
            base: BaseAggregate::new(SpeciesId::new_v4()),
            class_id,
            code,
            common_name,
            scientific_name,
        }
    }
}

impl AggregateRoot for Species {
    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn element_name() -> &'static str {
        "Species"
    }
}
