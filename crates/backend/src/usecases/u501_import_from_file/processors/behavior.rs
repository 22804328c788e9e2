use std::sync::Arc;

use contracts::domain::a009_behavior::Behavior;
use contracts::usecases::u501_import_from_file::ImportEntityKind;

use super::cell;
use crate::shared::data::reference_store::ReferenceStore;
use crate::usecases::u501_import_from_file::catalog::ReferenceCatalog;
use crate::usecases::u501_import_from_file::field_validators::{
    check_label, parse_breeding_status, CODE_MAX_LEN, LABEL_MAX_LEN,
};
use crate::usecases::u501_import_from_file::importer::ImportProcessor;
use crate::usecases::u501_import_from_file::working_set::NaturalKey;

/// Колонки: code; label; breeding_status (может быть пустым)
#[derive(Default)]
pub struct BehaviorProcessor;

impl ImportProcessor for BehaviorProcessor {
    type Entity = Behavior;

    const KIND: ImportEntityKind = ImportEntityKind::Behavior;
    const COLUMNS: usize = 3;
    const REQUIRED_COLUMNS: usize = 2;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Behavior>> {
        catalog.behaviors.clone()
    }

    fn build(&self, cells: &[String]) -> Result<Behavior, String> {
        let code = check_label("Code", &cell(cells, 0), CODE_MAX_LEN)?;
        let label = check_label("Label", &cell(cells, 1), LABEL_MAX_LEN)?;
        let breeding_status = parse_breeding_status(&cell(cells, 2))?;
        Ok(Behavior::new_for_insert(code, label, breeding_status))
    }

    fn natural_keys(entity: &Behavior) -> Vec<NaturalKey> {
        vec![
            NaturalKey::new("code", entity.code.clone()),
            NaturalKey::new("label", entity.label.clone()),
        ]
    }
}
