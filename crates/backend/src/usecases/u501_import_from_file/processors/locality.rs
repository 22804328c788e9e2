use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::a010_department::DepartmentId;
use contracts::domain::a011_town::TownId;
use contracts::domain::a012_locality::Locality;
use contracts::usecases::u501_import_from_file::ImportEntityKind;

use super::cell;
use crate::shared::data::reference_store::ReferenceStore;
use crate::usecases::u501_import_from_file::catalog::ReferenceCatalog;
use crate::usecases::u501_import_from_file::field_validators::{
    check_altitude, check_label, check_latitude, check_longitude, LABEL_MAX_LEN,
};
use crate::usecases::u501_import_from_file::importer::ImportProcessor;
use crate::usecases::u501_import_from_file::working_set::{normalize, NaturalKey};

/// Строка файла лье-дитов до преобразования чисел
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedLocality {
    pub department_code: String,
    /// Код коммуны или ее название
    pub town: String,
    pub name: String,
    pub latitude: String,
    pub longitude: String,
    pub altitude: String,
}

impl ImportedLocality {
    pub fn from_cells(cells: &[String]) -> Self {
        Self {
            department_code: cell(cells, 0),
            town: cell(cells, 1),
            name: cell(cells, 2),
            latitude: cell(cells, 3),
            longitude: cell(cells, 4),
            altitude: cell(cells, 5),
        }
    }
}

/// Колонки: department_code; town (code or name); name; latitude; longitude; altitude
#[derive(Default)]
pub struct LocalityProcessor {
    departments: HashMap<String, DepartmentId>,
    towns_by_code: HashMap<(DepartmentId, i32), TownId>,
    towns_by_name: HashMap<(DepartmentId, String), TownId>,
}

impl LocalityProcessor {
    /// Коммуна внутри департамента: сначала по коду, затем по названию
    fn resolve_town(&self, department_id: DepartmentId, town: &str) -> Option<TownId> {
        town.parse::<i32>()
            .ok()
            .and_then(|code| self.towns_by_code.get(&(department_id, code)))
            .or_else(|| self.towns_by_name.get(&(department_id, normalize(town))))
            .copied()
    }
}

#[async_trait]
impl ImportProcessor for LocalityProcessor {
    type Entity = Locality;

    const KIND: ImportEntityKind = ImportEntityKind::Locality;
    const COLUMNS: usize = 6;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Locality>> {
        catalog.localities.clone()
    }

    async fn load(&mut self, catalog: &ReferenceCatalog) -> anyhow::Result<Vec<Locality>> {
        self.departments = catalog
            .departments
            .find_all()
            .await?
            .into_iter()
            .map(|d| (normalize(&d.code), d.base.id))
            .collect();

        let towns = catalog.towns.find_all().await?;
        self.towns_by_code = towns
            .iter()
            .map(|t| ((t.department_id, t.code), t.base.id))
            .collect();
        self.towns_by_name = towns
            .iter()
            .map(|t| ((t.department_id, normalize(&t.name)), t.base.id))
            .collect();

        catalog.localities.find_all().await
    }

    fn build(&self, cells: &[String]) -> Result<Locality, String> {
        let row = ImportedLocality::from_cells(cells);

        let department_code = check_label("Department code", &row.department_code, LABEL_MAX_LEN)?;
        if row.town.is_empty() {
            return Err("Town must not be empty".to_string());
        }

        let name = check_label("Name", &row.name, LABEL_MAX_LEN)?;
        let latitude = check_latitude(&row.latitude)?;
        let longitude = check_longitude(&row.longitude)?;
        let altitude = check_altitude(&row.altitude)?;

        let department_id = self
            .departments
            .get(&normalize(&department_code))
            .copied()
            .ok_or_else(|| format!("Department \"{}\" does not exist", department_code))?;
        let town_id = self.resolve_town(department_id, &row.town).ok_or_else(|| {
            format!(
                "Town \"{}\" does not exist in department \"{}\"",
                row.town, department_code
            )
        })?;

        Ok(Locality::new_for_insert(
            town_id, name, latitude, longitude, altitude,
        ))
    }

    fn natural_keys(entity: &Locality) -> Vec<NaturalKey> {
        vec![NaturalKey::scoped(
            "name",
            &entity.town_id.value().to_string(),
            entity.name.clone(),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_from_file::catalog::memory::MemoryStore;
    use crate::usecases::u501_import_from_file::importer::{Importer, RowImporter, RowOutcome};
    use crate::usecases::u501_import_from_file::processors::row;
    use contracts::domain::a010_department::Department;
    use contracts::domain::a011_town::Town;

    fn catalog() -> (ReferenceCatalog, TownId) {
        let department = Department::new_for_insert("33".into());
        let town = Town::new_for_insert(department.base.id, 63, "Bordeaux".into());
        let town_id = town.base.id;

        let mut catalog = ReferenceCatalog::in_memory();
        catalog.departments = Arc::new(MemoryStore::with_items(vec![department]));
        catalog.towns = Arc::new(MemoryStore::with_items(vec![town]));
        (catalog, town_id)
    }

    #[tokio::test]
    async fn test_town_by_code_or_name() {
        let (catalog, town_id) = catalog();
        let mut processor = LocalityProcessor::default();
        processor.load(&catalog).await.unwrap();

        let by_code = processor
            .build(&row(&["33", "63", "Le Lac", "44.88", "-0.56", "5"]))
            .unwrap();
        assert_eq!(by_code.town_id, town_id);

        let by_name = processor
            .build(&row(&["33", "bordeaux", "Le Lac", "44.88", "-0.56", "5"]))
            .unwrap();
        assert_eq!(by_name.town_id, town_id);
        assert_eq!(by_name.altitude, 5);
    }

    #[tokio::test]
    async fn test_unknown_town() {
        let (catalog, _) = catalog();
        let mut processor = LocalityProcessor::default();
        processor.load(&catalog).await.unwrap();

        assert_eq!(
            processor
                .build(&row(&["33", "Pessac", "Le Lac", "44.88", "-0.56", "5"]))
                .unwrap_err(),
            "Town \"Pessac\" does not exist in department \"33\""
        );
    }

    #[tokio::test]
    async fn test_coordinates_are_validated() {
        let (catalog, _) = catalog();
        let mut processor = LocalityProcessor::default();
        processor.load(&catalog).await.unwrap();

        assert_eq!(
            processor
                .build(&row(&["33", "63", "Le Lac", "95", "-0.56", "5"]))
                .unwrap_err(),
            "Latitude must be a number between -90 and 90"
        );
        assert_eq!(
            processor
                .build(&row(&["33", "63", "Le Lac", "44.88", "-0.56", "12.5"]))
                .unwrap_err(),
            "Altitude must be an integer"
        );
    }

    #[tokio::test]
    async fn test_field_checks_come_before_lookup() {
        let processor = LocalityProcessor::default();

        assert_eq!(
            processor
                .build(&row(&["40", "1", "Dune", "north", "-1.2", "12.5"]))
                .unwrap_err(),
            "Latitude must be a number"
        );
        assert_eq!(
            processor
                .build(&row(&["40", "1", "Dune", "44.5", "-1.2", "12.5"]))
                .unwrap_err(),
            "Altitude must be an integer"
        );
        assert_eq!(
            processor
                .build(&row(&["40", "1", "Dune", "44.5", "-1.2", "50"]))
                .unwrap_err(),
            "Department \"40\" does not exist"
        );
    }

    #[tokio::test]
    async fn test_three_row_file() {
        let (catalog, _) = catalog();
        let mut importer = Importer::<LocalityProcessor>::new();
        importer.init(&catalog).await.unwrap();

        assert_eq!(
            importer
                .validate_and_stage(1, &row(&["33", "63", "Le Lac", "44.88", "-0.56", "5"]))
                .unwrap(),
            RowOutcome::Staged
        );
        assert_eq!(
            importer
                .validate_and_stage(2, &row(&["33", "63", "LE LAC ", "44.9", "-0.5", "7"]))
                .unwrap(),
            RowOutcome::Rejected("Locality with name \"LE LAC\" duplicates row 1".into())
        );
        assert_eq!(
            importer
                .validate_and_stage(3, &row(&["40", "1", "Dune", "44.5", "-1.2", "50"]))
                .unwrap(),
            RowOutcome::Rejected("Department \"40\" does not exist".into())
        );
    }
}
