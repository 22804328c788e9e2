use std::sync::Arc;

use contracts::domain::a010_department::Department;
use contracts::usecases::u501_import_from_file::ImportEntityKind;

use super::cell;
use crate::shared::data::reference_store::ReferenceStore;
use crate::usecases::u501_import_from_file::catalog::ReferenceCatalog;
use crate::usecases::u501_import_from_file::field_validators::{check_label, LABEL_MAX_LEN};
use crate::usecases::u501_import_from_file::importer::ImportProcessor;
use crate::usecases::u501_import_from_file::working_set::NaturalKey;

/// Колонки: code
#[derive(Default)]
pub struct DepartmentProcessor;

impl ImportProcessor for DepartmentProcessor {
    type Entity = Department;

    const KIND: ImportEntityKind = ImportEntityKind::Department;
    const COLUMNS: usize = 1;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Department>> {
        catalog.departments.clone()
    }

    fn build(&self, cells: &[String]) -> Result<Department, String> {
        let code = check_label("Code", &cell(cells, 0), LABEL_MAX_LEN)?;
        Ok(Department::new_for_insert(code))
    }

    fn natural_keys(entity: &Department) -> Vec<NaturalKey> {
        vec![NaturalKey::new("code", entity.code.clone())]
    }
}
