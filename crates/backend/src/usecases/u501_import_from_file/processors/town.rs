use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::a010_department::DepartmentId;
use contracts::domain::a011_town::Town;
use contracts::usecases::u501_import_from_file::ImportEntityKind;

use super::cell;
use crate::shared::data::reference_store::ReferenceStore;
use crate::usecases::u501_import_from_file::catalog::ReferenceCatalog;
use crate::usecases::u501_import_from_file::field_validators::{
    check_label, check_town_code, LABEL_MAX_LEN,
};
use crate::usecases::u501_import_from_file::importer::ImportProcessor;
use crate::usecases::u501_import_from_file::working_set::{normalize, NaturalKey};

/// Колонки: department_code; code; name
#[derive(Default)]
pub struct TownProcessor {
    /// Нормализованный код департамента -> id
    departments: HashMap<String, DepartmentId>,
}

#[async_trait]
impl ImportProcessor for TownProcessor {
    type Entity = Town;

    const KIND: ImportEntityKind = ImportEntityKind::Town;
    const COLUMNS: usize = 3;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Town>> {
        catalog.towns.clone()
    }

    async fn load(&mut self, catalog: &ReferenceCatalog) -> anyhow::Result<Vec<Town>> {
        self.departments = catalog
            .departments
            .find_all()
            .await?
            .into_iter()
            .map(|d| (normalize(&d.code), d.base.id))
            .collect();
        catalog.towns.find_all().await
    }

    fn build(&self, cells: &[String]) -> Result<Town, String> {
        let department_code = check_label("Department code", &cell(cells, 0), LABEL_MAX_LEN)?;
        let code = check_town_code(&cell(cells, 1))?;
        let name = check_label("Name", &cell(cells, 2), LABEL_MAX_LEN)?;

        let department_id = self
            .departments
            .get(&normalize(&department_code))
            .copied()
            .ok_or_else(|| format!("Department \"{}\" does not exist", department_code))?;

        Ok(Town::new_for_insert(department_id, code, name))
    }

    fn natural_keys(entity: &Town) -> Vec<NaturalKey> {
        let scope = entity.department_id.value().to_string();
        vec![
            NaturalKey::scoped("code", &scope, entity.code.to_string()),
            NaturalKey::scoped("name", &scope, entity.name.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_from_file::catalog::memory::MemoryStore;
    use crate::usecases::u501_import_from_file::importer::{Importer, RowImporter, RowOutcome};
    use crate::usecases::u501_import_from_file::processors::row;
    use contracts::domain::a010_department::Department;

    fn catalog() -> ReferenceCatalog {
        let mut catalog = ReferenceCatalog::in_memory();
        catalog.departments = Arc::new(MemoryStore::with_items(vec![
            Department::new_for_insert("33".into()),
            Department::new_for_insert("2A".into()),
        ]));
        catalog
    }

    #[tokio::test]
    async fn test_department_must_exist() {
        let catalog = catalog();
        let mut importer = Importer::<TownProcessor>::new();
        importer.init(&catalog).await.unwrap();

        assert_eq!(
            importer
                .validate_and_stage(1, &row(&["2a", "4", "Ajaccio"]))
                .unwrap(),
            RowOutcome::Staged
        );
        assert_eq!(
            importer
                .validate_and_stage(2, &row(&["99", "1", "Nowhere"]))
                .unwrap(),
            RowOutcome::Rejected("Department \"99\" does not exist".into())
        );
    }

    #[tokio::test]
    async fn test_code_is_compared_by_value_within_department() {
        let catalog = catalog();
        let mut importer = Importer::<TownProcessor>::new();
        importer.init(&catalog).await.unwrap();

        importer
            .validate_and_stage(1, &row(&["33", "63", "Bordeaux"]))
            .unwrap();
        assert_eq!(
            importer
                .validate_and_stage(2, &row(&["33", "063", "Bègles"]))
                .unwrap(),
            RowOutcome::Rejected("Town with code \"63\" duplicates row 1".into())
        );
        // Тот же код в другом департаменте допустим
        assert_eq!(
            importer
                .validate_and_stage(3, &row(&["2A", "63", "Bordeaux"]))
                .unwrap(),
            RowOutcome::Staged
        );
    }

    #[tokio::test]
    async fn test_field_checks_come_before_lookup() {
        let catalog = catalog();
        let mut importer = Importer::<TownProcessor>::new();
        importer.init(&catalog).await.unwrap();

        assert_eq!(
            importer
                .validate_and_stage(1, &row(&["99", "70000", "Nowhere"]))
                .unwrap(),
            RowOutcome::Rejected("Town code must be an integer between 0 and 65535".into())
        );
    }
}
