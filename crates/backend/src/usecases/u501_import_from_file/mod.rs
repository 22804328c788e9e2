pub mod catalog;
pub mod csv_reader;
pub mod dispatcher;
pub mod executor;
pub mod field_validators;
pub mod importer;
pub mod processors;
pub mod progress_tracker;
pub mod settings;
pub mod working_set;
pub mod worker;

pub use catalog::ReferenceCatalog;
pub use dispatcher::{ImportDispatcher, ImportStartError};
pub use executor::{run_import, ImportJob};
pub use progress_tracker::{ImportStatusStore, ProgressSink};
pub use settings::ImportSettings;
pub use worker::{run_status_cleanup, ImportWorker};
