use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::a007_species_class::SpeciesClassId;
use contracts::domain::a013_species::Species;
use contracts::usecases::u501_import_from_file::ImportEntityKind;

use super::cell;
use crate::shared::data::reference_store::ReferenceStore;
use crate::usecases::u501_import_from_file::catalog::ReferenceCatalog;
use crate::usecases::u501_import_from_file::field_validators::{
    check_label, CODE_MAX_LEN, LABEL_MAX_LEN,
};
use crate::usecases::u501_import_from_file::importer::ImportProcessor;
use crate::usecases::u501_import_from_file::working_set::{normalize, NaturalKey};

/// Колонки: species_class; code; common_name; scientific_name
#[derive(Default)]
pub struct SpeciesProcessor {
    /// Нормализованное наименование класса -> id
    classes: HashMap<String, SpeciesClassId>,
}

#[async_trait]
impl ImportProcessor for SpeciesProcessor {
    type Entity = Species;

    const KIND: ImportEntityKind = ImportEntityKind::Species;
    const COLUMNS: usize = 4;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Species>> {
        catalog.species.clone()
    }

    async fn load(&mut self, catalog: &ReferenceCatalog) -> anyhow::Result<Vec<Species>> {
        self.classes = catalog
            .species_classes
            .find_all()
            .await?
            .into_iter()
            .map(|c| (normalize(&c.label), c.base.id))
            .collect();
        catalog.species.find_all().await
    }

    fn build(&self, cells: &[String]) -> Result<Species, String> {
        let class = check_label("Species class", &cell(cells, 0), LABEL_MAX_LEN)?;
        let code = check_label("Code", &cell(cells, 1), CODE_MAX_LEN)?;
        let common_name = check_label("Common name", &cell(cells, 2), LABEL_MAX_LEN)?;
        let scientific_name = check_label("Scientific name", &cell(cells, 3), LABEL_MAX_LEN)?;

        let class_id = self
            .classes
            .get(&normalize(&class))
            .copied()
            .ok_or_else(|| format!("Species class \"{}\" does not exist", class))?;

        Ok(Species::new_for_insert(
            class_id,
            code,
            common_name,
            scientific_name,
        ))
    }

    fn natural_keys(entity: &Species) -> Vec<NaturalKey> {
        vec![
            NaturalKey::new("code", entity.code.clone()),
            NaturalKey::new("common name", entity.common_name.clone()),
            NaturalKey::new("scientific name", entity.scientific_name.clone()),
        ]
    }
}
