use std::sync::Arc;

use contracts::domain::a008_environment::Environment;
use contracts::usecases::u501_import_from_file::ImportEntityKind;

use super::cell;
use crate::shared::data::reference_store::ReferenceStore;
use crate::usecases::u501_import_from_file::catalog::ReferenceCatalog;
use crate::usecases::u501_import_from_file::field_validators::{
    check_label, CODE_MAX_LEN, LABEL_MAX_LEN,
};
use crate::usecases::u501_import_from_file::importer::ImportProcessor;
use crate::usecases::u501_import_from_file::working_set::NaturalKey;

/// Колонки: code; label
#[derive(Default)]
pub struct EnvironmentProcessor;

impl ImportProcessor for EnvironmentProcessor {
    type Entity = Environment;

    const KIND: ImportEntityKind = ImportEntityKind::Environment;
    const COLUMNS: usize = 2;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Environment>> {
        catalog.environments.clone()
    }

    fn build(&self, cells: &[String]) -> Result<Environment, String> {
        let code = check_label("Code", &cell(cells, 0), CODE_MAX_LEN)?;
        let label = check_label("Label", &cell(cells, 1), LABEL_MAX_LEN)?;
        Ok(Environment::new_for_insert(code, label))
    }

    fn natural_keys(entity: &Environment) -> Vec<NaturalKey> {
        vec![
            NaturalKey::new("code", entity.code.clone()),
            NaturalKey::new("label", entity.label.clone()),
        ]
    }
}
