use std::marker::PhantomData;
use std::sync::Arc;

use contracts::domain::a001_observer::Observer;
use contracts::domain::a002_sex::Sex;
use contracts::domain::a003_age::Age;
use contracts::domain::a004_weather::Weather;
use contracts::domain::a006_distance_estimate::DistanceEstimate;
use contracts::domain::a007_species_class::SpeciesClass;
use contracts::domain::common::AggregateRoot;
use contracts::usecases::u501_import_from_file::ImportEntityKind;

use super::cell;
use crate::shared::data::reference_store::ReferenceStore;
use crate::usecases::u501_import_from_file::catalog::ReferenceCatalog;
use crate::usecases::u501_import_from_file::field_validators::{check_label, LABEL_MAX_LEN};
use crate::usecases::u501_import_from_file::importer::ImportProcessor;
use crate::usecases::u501_import_from_file::working_set::NaturalKey;

/// Справочник, у которого единственное поле - наименование
pub trait LabelledEntity: AggregateRoot + Clone + Send + Sync + 'static {
    const KIND: ImportEntityKind;

    fn label(&self) -> &str;

    fn from_label(label: String) -> Self;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Self>>;
}

/// Импорт справочника из одной колонки `label`
pub struct LabelProcessor<E> {
    _entity: PhantomData<fn() -> E>,
}

impl<E> Default for LabelProcessor<E> {
    fn default() -> Self {
        Self {
            _entity: PhantomData,
        }
    }
}

impl<E: LabelledEntity> ImportProcessor for LabelProcessor<E> {
    type Entity = E;

    const KIND: ImportEntityKind = E::KIND;
    const COLUMNS: usize = 1;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<E>> {
        E::store(catalog)
    }

    fn build(&self, cells: &[String]) -> Result<E, String> {
        let label = check_label("Label", &cell(cells, 0), LABEL_MAX_LEN)?;
        Ok(E::from_label(label))
    }

    fn natural_keys(entity: &E) -> Vec<NaturalKey> {
        vec![NaturalKey::new("label", entity.label())]
    }
}

macro_rules! labelled_entity {
    ($entity:ty, $kind:expr, $store:ident) => {
        impl LabelledEntity for $entity {
            const KIND: ImportEntityKind = $kind;

            fn label(&self) -> &str {
                &self.label
            }

            fn from_label(label: String) -> Self {
                <$entity>::new_for_insert(label)
            }

            fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Self>> {
                catalog.$store.clone()
            }
        }
    };
}

labelled_entity!(Observer, ImportEntityKind::Observer, observers);
labelled_entity!(Sex, ImportEntityKind::Sex, sexes);
labelled_entity!(Age, ImportEntityKind::Age, ages);
labelled_entity!(Weather, ImportEntityKind::Weather, weathers);
labelled_entity!(
    DistanceEstimate,
    ImportEntityKind::DistanceEstimate,
    distance_estimates
);
labelled_entity!(SpeciesClass, ImportEntityKind::SpeciesClass, species_classes);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_from_file::processors::row;

    #[test]
    fn test_label_is_trimmed() {
        let processor = LabelProcessor::<SpeciesClass>::default();
        let class = processor.build(&row(&["  Aves "])).unwrap();
        assert_eq!(class.label, "Aves");
    }

    #[test]
    fn test_label_checks() {
        let processor = LabelProcessor::<DistanceEstimate>::default();
        assert_eq!(
            processor.build(&row(&[""])).unwrap_err(),
            "Label must not be empty"
        );
        let long = "x".repeat(LABEL_MAX_LEN + 1);
        assert_eq!(
            processor.build(&row(&[&long])).unwrap_err(),
            "Label must be at most 100 characters"
        );
    }
}
