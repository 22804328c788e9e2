use std::sync::Arc;

use contracts::domain::a001_observer::Observer;
use contracts::domain::a002_sex::Sex;
use contracts::domain::a003_age::Age;
use contracts::domain::a004_weather::Weather;
use contracts::domain::a005_number_estimate::NumberEstimate;
use contracts::domain::a006_distance_estimate::DistanceEstimate;
use contracts::domain::a007_species_class::SpeciesClass;
use contracts::domain::a008_environment::Environment;
use contracts::domain::a009_behavior::Behavior;
use contracts::domain::a010_department::Department;
use contracts::domain::a011_town::Town;
use contracts::domain::a012_locality::Locality;
use contracts::domain::a013_species::Species;

use crate::domain::{
    a001_observer, a002_sex, a003_age, a004_weather, a005_number_estimate,
    a006_distance_estimate, a007_species_class, a008_environment, a009_behavior,
    a010_department, a011_town, a012_locality, a013_species,
};
use crate::shared::data::reference_store::ReferenceStore;

/// Набор хранилищ справочников, с которыми работают импортеры
#[derive(Clone)]
pub struct ReferenceCatalog {
    pub observers: Arc<dyn ReferenceStore<Observer>>,
    pub sexes: Arc<dyn ReferenceStore<Sex>>,
    pub ages: Arc<dyn ReferenceStore<Age>>,
    pub weathers: Arc<dyn ReferenceStore<Weather>>,
    pub number_estimates: Arc<dyn ReferenceStore<NumberEstimate>>,
    pub distance_estimates: Arc<dyn ReferenceStore<DistanceEstimate>>,
    pub species_classes: Arc<dyn ReferenceStore<SpeciesClass>>,
    pub environments: Arc<dyn ReferenceStore<Environment>>,
    pub behaviors: Arc<dyn ReferenceStore<Behavior>>,
    pub departments: Arc<dyn ReferenceStore<Department>>,
    pub towns: Arc<dyn ReferenceStore<Town>>,
    pub localities: Arc<dyn ReferenceStore<Locality>>,
    pub species: Arc<dyn ReferenceStore<Species>>,
}

impl ReferenceCatalog {
    /// Справочники в SQLite; вставка пачками по `chunk_size` строк
    pub fn database(chunk_size: usize) -> Self {
        Self {
            observers: Arc::new(a001_observer::repository::ObserverStore::new(chunk_size)),
            sexes: Arc::new(a002_sex::repository::SexStore::new(chunk_size)),
            ages: Arc::new(a003_age::repository::AgeStore::new(chunk_size)),
            weathers: Arc::new(a004_weather::repository::WeatherStore::new(chunk_size)),
            number_estimates: Arc::new(
                a005_number_estimate::repository::NumberEstimateStore::new(chunk_size),
            ),
            distance_estimates: Arc::new(
                a006_distance_estimate::repository::DistanceEstimateStore::new(chunk_size),
            ),
            species_classes: Arc::new(
                a007_species_class::repository::SpeciesClassStore::new(chunk_size),
            ),
            environments: Arc::new(a008_environment::repository::EnvironmentStore::new(
                chunk_size,
            )),
            behaviors: Arc::new(a009_behavior::repository::BehaviorStore::new(chunk_size)),
            departments: Arc::new(a010_department::repository::DepartmentStore::new(
                chunk_size,
            )),
            towns: Arc::new(a011_town::repository::TownStore::new(chunk_size)),
            localities: Arc::new(a012_locality::repository::LocalityStore::new(chunk_size)),
            species: Arc::new(a013_species::repository::SpeciesStore::new(chunk_size)),
        }
    }
}
