use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ImportEntityKind;

/// Текущий прогресс импорта (снимок, который воркер публикует в хранилище статусов)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgress {
    pub import_id: String,
    pub entity_kind: ImportEntityKind,
    pub owner_id: String,
    pub status: ImportStatus,

    /// Этап обработки, пока статус `ongoing`
    pub phase: Option<ImportPhase>,

    /// Количество строк в файле (если уже посчитано)
    pub total_rows: Option<u32>,
    pub processed_rows: u32,
    pub valid_rows: u32,

    /// Ошибки по строкам
    pub errors: Vec<RowErrorEntry>,

    /// Итог, заполняется при статусе `complete`
    pub summary: Option<ImportSummary>,

    /// Причина провала, заполняется при статусе `failed`
    pub failure: Option<String>,

    pub created_at: DateTime<Utc>,
    /// Последнее обновление прогресса
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Задача поставлена в очередь, воркер еще не начал
    NotStarted,

    /// Импорт выполняется
    Ongoing,

    /// Импорт провален (ошибка инфраструктуры)
    Failed,

    /// Импорт завершен (возможно, с ошибками в отдельных строках)
    Complete,
}

impl ImportStatus {
    /// Терминальный статус: дальнейших обновлений не будет
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStatus::Failed | ImportStatus::Complete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    /// Загрузка существующих записей справочников
    RetrievingData,
    /// Построчная валидация файла
    ValidatingRows,
    /// Запись принятых строк в БД
    InsertingRows,
}

/// Ошибка в конкретной строке файла
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowErrorEntry {
    /// Номер строки данных (с 1)
    pub row_number: u32,
    pub cells: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub inserted: u32,
    pub rejected: u32,
}

impl ImportProgress {
    pub fn new(import_id: String, entity_kind: ImportEntityKind, owner_id: String) -> Self {
        let now = Utc::now();
        Self {
            import_id,
            entity_kind,
            owner_id,
            status: ImportStatus::NotStarted,
            phase: None,
            total_rows: None,
            processed_rows: 0,
            valid_rows: 0,
            errors: Vec::new(),
            summary: None,
            failure: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Перейти к этапу обработки
    pub fn enter_phase(&mut self, phase: ImportPhase) {
        self.status = ImportStatus::Ongoing;
        self.phase = Some(phase);
        self.updated_at = Utc::now();
    }

    pub fn add_error(&mut self, row_number: u32, cells: Vec<String>, message: String) {
        self.errors.push(RowErrorEntry {
            row_number,
            cells,
            message,
        });
        self.updated_at = Utc::now();
    }

    /// Завершить импорт с итогом
    pub fn complete(&mut self, inserted: u32) {
        let now = Utc::now();
        self.status = ImportStatus::Complete;
        self.phase = None;
        self.summary = Some(ImportSummary {
            inserted,
            rejected: self.errors.len() as u32,
        });
        self.completed_at = Some(now);
        self.updated_at = now;
    }

    /// Отметить импорт как проваленный
    pub fn fail(&mut self, reason: String) {
        let now = Utc::now();
        self.status = ImportStatus::Failed;
        self.phase = None;
        self.failure = Some(reason);
        self.completed_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_to_complete() {
        let mut progress =
            ImportProgress::new("id-1".into(), ImportEntityKind::Observer, "user-1".into());
        assert_eq!(progress.status, ImportStatus::NotStarted);
        assert!(!progress.status.is_terminal());

        progress.enter_phase(ImportPhase::ValidatingRows);
        assert_eq!(progress.status, ImportStatus::Ongoing);
        progress.add_error(2, vec!["x".into()], "bad".into());
        progress.complete(5);

        assert!(progress.status.is_terminal());
        assert_eq!(progress.phase, None);
        assert_eq!(
            progress.summary,
            Some(ImportSummary {
                inserted: 5,
                rejected: 1
            })
        );
        assert!(progress.completed_at.is_some());
    }

    #[test]
    fn test_serialized_shape() {
        let mut progress =
            ImportProgress::new("id-1".into(), ImportEntityKind::NumberEstimate, "u".into());
        progress.fail("storage unavailable".into());
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["entityKind"], "number-estimate");
        assert_eq!(json["failure"], "storage unavailable");
        assert_eq!(json["processedRows"], 0);
    }
}
