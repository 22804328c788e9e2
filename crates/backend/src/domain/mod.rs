pub mod a001_observer;
pub mod a002_sex;
pub mod a003_age;
pub mod a004_weather;
pub mod a005_number_estimate;
pub mod a006_distance_estimate;
pub mod a007_species_class;
pub mod a008_environment;
pub mod a009_behavior;
pub mod a010_department;
pub mod a011_town;
pub mod a012_locality;
pub mod a013_species;
