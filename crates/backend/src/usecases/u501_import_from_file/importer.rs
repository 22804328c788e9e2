use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use contracts::domain::common::AggregateRoot;
use contracts::usecases::u501_import_from_file::ImportEntityKind;
use thiserror::Error;

use super::catalog::ReferenceCatalog;
use super::csv_reader::normalize_columns;
use super::processors::{
    behavior::BehaviorProcessor, department::DepartmentProcessor,
    environment::EnvironmentProcessor, label::LabelProcessor, locality::LocalityProcessor,
    number_estimate::NumberEstimateProcessor, species::SpeciesProcessor, town::TownProcessor,
};
use super::working_set::{duplicate_message, KeyOrigin, NaturalKey, WorkingSet};
use crate::shared::data::reference_store::ReferenceStore;
use contracts::domain::a001_observer::Observer;
use contracts::domain::a002_sex::Sex;
use contracts::domain::a003_age::Age;
use contracts::domain::a004_weather::Weather;
use contracts::domain::a006_distance_estimate::DistanceEstimate;
use contracts::domain::a007_species_class::SpeciesClass;

/// Набор возможностей одного вида справочника для общего импортера
#[async_trait]
pub trait ImportProcessor: Default + Send + Sync + 'static {
    type Entity: AggregateRoot + Clone + Send + Sync + 'static;

    const KIND: ImportEntityKind;
    /// Число колонок в строке файла
    const COLUMNS: usize;
    /// Обязательные колонки; остальные хвостовые можно опустить
    const REQUIRED_COLUMNS: usize = Self::COLUMNS;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<Self::Entity>>;

    /// Загрузить существующие записи (и справочники-родители, если нужны)
    async fn load(&mut self, catalog: &ReferenceCatalog) -> anyhow::Result<Vec<Self::Entity>> {
        Self::store(catalog).find_all().await
    }

    /// Разбор строки: поля, затем ссылки на родителей. Ошибка - первая найденная
    fn build(&self, cells: &[String]) -> Result<Self::Entity, String>;

    fn natural_keys(entity: &Self::Entity) -> Vec<NaturalKey>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImporterState {
    Uninitialized,
    Initialized,
    Processing,
    Done,
}

#[derive(Debug, Error)]
#[error("Cannot {operation} while importer is {state:?}")]
pub struct ImporterStateError {
    operation: &'static str,
    state: ImporterState,
}

/// Результат обработки одной строки
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Staged,
    Rejected(String),
}

/// Импортер строк одного вида справочника, не зависящий от типа записи
#[async_trait]
pub trait RowImporter: Send {
    fn kind(&self) -> ImportEntityKind;

    async fn init(&mut self, catalog: &ReferenceCatalog) -> anyhow::Result<()>;

    fn validate_and_stage(
        &mut self,
        row_number: u32,
        cells: &[String],
    ) -> Result<RowOutcome, ImporterStateError>;

    /// Записать принятые строки; возвращает число вставленных записей
    async fn persist(&mut self, catalog: &ReferenceCatalog, owner_id: &str)
        -> anyhow::Result<usize>;
}

/// Общий импортер: рабочий набор ключей + буфер записей к вставке
pub struct Importer<P: ImportProcessor> {
    processor: P,
    state: ImporterState,
    working_set: WorkingSet,
    to_insert: Vec<P::Entity>,
}

impl<P: ImportProcessor> Importer<P> {
    pub fn new() -> Self {
        Self {
            processor: P::default(),
            state: ImporterState::Uninitialized,
            working_set: WorkingSet::new(),
            to_insert: Vec::new(),
        }
    }

    pub fn state(&self) -> ImporterState {
        self.state
    }

    pub fn staged(&self) -> &[P::Entity] {
        &self.to_insert
    }

    /// Записать буфер с владельцем `owner_id`, вернуть сохраненные записи
    pub async fn persist_entities(
        &mut self,
        catalog: &ReferenceCatalog,
        owner_id: &str,
    ) -> anyhow::Result<Vec<P::Entity>> {
        match self.state {
            ImporterState::Initialized | ImporterState::Processing => {}
            state => {
                return Err(ImporterStateError {
                    operation: "persist",
                    state,
                }
                .into())
            }
        }
        self.state = ImporterState::Done;

        let mut items = std::mem::take(&mut self.to_insert);
        if items.is_empty() {
            return Ok(items);
        }
        for item in items.iter_mut() {
            let metadata = item.metadata_mut();
            metadata.owner_id = Some(owner_id.to_string());
            metadata.touch();
        }

        let count = items.len();
        let persisted = P::store(catalog)
            .insert_many(items)
            .await
            .with_context(|| format!("Failed to insert {} {} record(s)", count, P::KIND))?;
        Ok(persisted)
    }
}

impl<P: ImportProcessor> Default for Importer<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<P: ImportProcessor> RowImporter for Importer<P> {
    fn kind(&self) -> ImportEntityKind {
        P::KIND
    }

    async fn init(&mut self, catalog: &ReferenceCatalog) -> anyhow::Result<()> {
        match self.state {
            ImporterState::Uninitialized | ImporterState::Initialized => {}
            state => {
                return Err(ImporterStateError {
                    operation: "init",
                    state,
                }
                .into())
            }
        }

        let persisted = self
            .processor
            .load(catalog)
            .await
            .with_context(|| format!("Failed to load existing {} records", P::KIND))?;

        self.working_set.clear();
        self.to_insert.clear();
        for entity in &persisted {
            self.working_set
                .register(P::natural_keys(entity), KeyOrigin::Persisted);
        }
        tracing::debug!(
            "Importer {} initialized: {} persisted record(s), {} key(s)",
            P::KIND,
            persisted.len(),
            self.working_set.len()
        );

        self.state = ImporterState::Initialized;
        Ok(())
    }

    fn validate_and_stage(
        &mut self,
        row_number: u32,
        cells: &[String],
    ) -> Result<RowOutcome, ImporterStateError> {
        match self.state {
            ImporterState::Initialized | ImporterState::Processing => {}
            state => {
                return Err(ImporterStateError {
                    operation: "validate rows",
                    state,
                })
            }
        }
        self.state = ImporterState::Processing;

        let cells = match normalize_columns(cells, P::REQUIRED_COLUMNS, P::COLUMNS) {
            Ok(cells) => cells,
            Err(e) => return Ok(RowOutcome::Rejected(e.to_string())),
        };

        let entity = match self.processor.build(cells) {
            Ok(entity) => entity,
            Err(message) => return Ok(RowOutcome::Rejected(message)),
        };

        let keys = P::natural_keys(&entity);
        if let Some((key, origin)) = self.working_set.find_conflict(&keys) {
            return Ok(RowOutcome::Rejected(duplicate_message(
                <P::Entity as AggregateRoot>::element_name(),
                key,
                origin,
            )));
        }

        self.working_set
            .register(keys, KeyOrigin::Staged { row_number });
        self.to_insert.push(entity);
        Ok(RowOutcome::Staged)
    }

    async fn persist(
        &mut self,
        catalog: &ReferenceCatalog,
        owner_id: &str,
    ) -> anyhow::Result<usize> {
        let persisted = self.persist_entities(catalog, owner_id).await?;
        Ok(persisted.len())
    }
}

/// Свежий импортер для вида справочника (один на задачу)
pub fn create_importer(kind: ImportEntityKind) -> Box<dyn RowImporter> {
    match kind {
        ImportEntityKind::Observer => Box::new(Importer::<LabelProcessor<Observer>>::new()),
        ImportEntityKind::Sex => Box::new(Importer::<LabelProcessor<Sex>>::new()),
        ImportEntityKind::Age => Box::new(Importer::<LabelProcessor<Age>>::new()),
        ImportEntityKind::Weather => Box::new(Importer::<LabelProcessor<Weather>>::new()),
        ImportEntityKind::NumberEstimate => Box::new(Importer::<NumberEstimateProcessor>::new()),
        ImportEntityKind::DistanceEstimate => {
            Box::new(Importer::<LabelProcessor<DistanceEstimate>>::new())
        }
        ImportEntityKind::SpeciesClass => {
            Box::new(Importer::<LabelProcessor<SpeciesClass>>::new())
        }
        ImportEntityKind::Environment => Box::new(Importer::<EnvironmentProcessor>::new()),
        ImportEntityKind::Behavior => Box::new(Importer::<BehaviorProcessor>::new()),
        ImportEntityKind::Department => Box::new(Importer::<DepartmentProcessor>::new()),
        ImportEntityKind::Town => Box::new(Importer::<TownProcessor>::new()),
        ImportEntityKind::Locality => Box::new(Importer::<LocalityProcessor>::new()),
        ImportEntityKind::Species => Box::new(Importer::<SpeciesProcessor>::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_from_file::catalog::memory::MemoryStore;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_calls_out_of_order_are_errors() {
        let catalog = ReferenceCatalog::in_memory();
        let mut importer = Importer::<LabelProcessor<Observer>>::new();

        assert!(importer.validate_and_stage(1, &row(&["A"])).is_err());
        assert!(importer.persist(&catalog, "user-1").await.is_err());

        importer.init(&catalog).await.unwrap();
        assert_eq!(importer.state(), ImporterState::Initialized);
        importer.persist(&catalog, "user-1").await.unwrap();
        assert_eq!(importer.state(), ImporterState::Done);

        assert!(importer.init(&catalog).await.is_err());
        assert!(importer.validate_and_stage(1, &row(&["A"])).is_err());
    }

    #[tokio::test]
    async fn test_first_occurrence_wins() {
        let catalog = ReferenceCatalog::in_memory();
        let mut importer = Importer::<LabelProcessor<Observer>>::new();
        importer.init(&catalog).await.unwrap();

        assert_eq!(
            importer.validate_and_stage(1, &row(&["Jean Dupont"])).unwrap(),
            RowOutcome::Staged
        );
        assert_eq!(
            importer.validate_and_stage(2, &row(&[" jean DUPONT "])).unwrap(),
            RowOutcome::Rejected("Observer with label \"jean DUPONT\" duplicates row 1".into())
        );
        assert_eq!(importer.staged().len(), 1);
        assert_eq!(importer.staged()[0].label, "Jean Dupont");
    }

    #[tokio::test]
    async fn test_persisted_records_are_duplicates() {
        let mut catalog = ReferenceCatalog::in_memory();
        catalog.sexes = Arc::new(MemoryStore::with_items(vec![Sex::new_for_insert(
            "Male".into(),
        )]));
        let mut importer = Importer::<LabelProcessor<Sex>>::new();
        importer.init(&catalog).await.unwrap();

        assert_eq!(
            importer.validate_and_stage(1, &row(&["MALE"])).unwrap(),
            RowOutcome::Rejected("Sex with label \"MALE\" already exists".into())
        );
    }

    #[tokio::test]
    async fn test_rejected_rows_do_not_change_the_working_set() {
        let catalog = ReferenceCatalog::in_memory();
        let mut importer = Importer::<LabelProcessor<Age>>::new();
        importer.init(&catalog).await.unwrap();

        let outcome = importer.validate_and_stage(1, &row(&["Adult", "extra"])).unwrap();
        assert_eq!(
            outcome,
            RowOutcome::Rejected("Row has 2 column(s), expected 1".into())
        );
        // Пустые хвостовые ячейки отбрасываются
        assert_eq!(
            importer.validate_and_stage(2, &row(&["Adult", ""])).unwrap(),
            RowOutcome::Staged
        );
    }

    #[tokio::test]
    async fn test_persist_sets_owner() {
        let store = Arc::new(MemoryStore::<Weather>::new());
        let mut catalog = ReferenceCatalog::in_memory();
        catalog.weathers = store.clone();

        let mut importer = Importer::<LabelProcessor<Weather>>::new();
        importer.init(&catalog).await.unwrap();
        importer.validate_and_stage(1, &row(&["Sunny"])).unwrap();
        importer.validate_and_stage(2, &row(&["Rain"])).unwrap();

        let persisted = importer.persist_entities(&catalog, "user-7").await.unwrap();
        assert_eq!(persisted.len(), 2);

        let stored = store.snapshot();
        assert_eq!(stored.len(), 2);
        assert!(stored
            .iter()
            .all(|w| w.base.metadata.owner_id.as_deref() == Some("user-7")));
    }

    #[tokio::test]
    async fn test_init_reloads_persisted_state() {
        let store = Arc::new(MemoryStore::<Observer>::new());
        let mut catalog = ReferenceCatalog::in_memory();
        catalog.observers = store.clone();

        let mut first = Importer::<LabelProcessor<Observer>>::new();
        first.init(&catalog).await.unwrap();
        first.validate_and_stage(1, &row(&["Alice"])).unwrap();
        assert_eq!(first.persist(&catalog, "u").await.unwrap(), 1);

        let mut second = Importer::<LabelProcessor<Observer>>::new();
        second.init(&catalog).await.unwrap();
        assert_eq!(
            second.validate_and_stage(1, &row(&["alice"])).unwrap(),
            RowOutcome::Rejected("Observer with label \"alice\" already exists".into())
        );
    }

    #[test]
    fn test_factory_covers_every_kind() {
        for kind in ImportEntityKind::all() {
            assert_eq!(create_importer(kind).kind(), kind);
        }
    }
}
