use serde::{Deserialize, Serialize};

/// Вид справочника, доступный для импорта из файла
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportEntityKind {
    Observer,
    Sex,
    Age,
    Weather,
    NumberEstimate,
    DistanceEstimate,
    SpeciesClass,
    Environment,
    Behavior,
    Department,
    Town,
    Locality,
    Species,
}

impl ImportEntityKind {
    /// Код вида (совпадает с сегментом пути `/api/import/{kind}`)
    pub fn code(&self) -> &'static str {
        match self {
            ImportEntityKind::Observer => "observer",
            ImportEntityKind::Sex => "sex",
            ImportEntityKind::Age => "age",
            ImportEntityKind::Weather => "weather",
            ImportEntityKind::NumberEstimate => "number-estimate",
            ImportEntityKind::DistanceEstimate => "distance-estimate",
            ImportEntityKind::SpeciesClass => "species-class",
            ImportEntityKind::Environment => "environment",
            ImportEntityKind::Behavior => "behavior",
            ImportEntityKind::Department => "department",
            ImportEntityKind::Town => "town",
            ImportEntityKind::Locality => "locality",
            ImportEntityKind::Species => "species",
        }
    }

    /// Получить все виды
    pub fn all() -> Vec<ImportEntityKind> {
        vec![
            ImportEntityKind::Observer,
            ImportEntityKind::Sex,
            ImportEntityKind::Age,
            ImportEntityKind::Weather,
            ImportEntityKind::NumberEstimate,
            ImportEntityKind::DistanceEstimate,
            ImportEntityKind::SpeciesClass,
            ImportEntityKind::Environment,
            ImportEntityKind::Behavior,
            ImportEntityKind::Department,
            ImportEntityKind::Town,
            ImportEntityKind::Locality,
            ImportEntityKind::Species,
        ]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.code() == code)
    }
}

impl std::fmt::Display for ImportEntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
