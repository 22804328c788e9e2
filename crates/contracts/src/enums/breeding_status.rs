use serde::{Deserialize, Serialize};

/// Статус гнездования, связанный с поведением особи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreedingStatus {
    Possible,
    Probable,
    Certain,
}

impl BreedingStatus {
    /// Получить код статуса
    pub fn code(&self) -> &'static str {
        match self {
            BreedingStatus::Possible => "possible",
            BreedingStatus::Probable => "probable",
            BreedingStatus::Certain => "certain",
        }
    }

    /// Получить все статусы
    pub fn all() -> Vec<BreedingStatus> {
        vec![
            BreedingStatus::Possible,
            BreedingStatus::Probable,
            BreedingStatus::Certain,
        ]
    }

    /// Парсинг из строки (без учета регистра и пробелов по краям)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "possible" => Some(BreedingStatus::Possible),
            "probable" => Some(BreedingStatus::Probable),
            "certain" => Some(BreedingStatus::Certain),
            _ => None,
        }
    }
}

impl std::fmt::Display for BreedingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
