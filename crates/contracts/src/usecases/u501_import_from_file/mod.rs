pub mod entity_kind;
pub mod progress;
pub mod response;

pub use entity_kind::ImportEntityKind;
pub use progress::{ImportPhase, ImportProgress, ImportStatus, ImportSummary, RowErrorEntry};
pub use response::ImportResponse;

use crate::usecases::common::UseCaseMetadata;

pub struct ImportFromFile;

impl UseCaseMetadata for ImportFromFile {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_from_file"
    }

    fn display_name() -> &'static str {
        "Import from file"
    }

    fn description() -> &'static str {
        "Загрузка справочников из CSV файла с построчной валидацией"
    }
}
