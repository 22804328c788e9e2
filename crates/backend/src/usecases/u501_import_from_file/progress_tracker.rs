use contracts::usecases::u501_import_from_file::progress::ImportProgress;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Получатель снимков прогресса от воркера
pub trait ProgressSink: Send + Sync {
    fn publish(&self, progress: ImportProgress);
}

/// Хранилище статусов импорта (in-memory, опрашивается клиентом)
#[derive(Clone, Default)]
pub struct ImportStatusStore {
    statuses: Arc<RwLock<HashMap<String, ImportProgress>>>,
}

impl ImportStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зарегистрировать новую задачу
    pub fn create(&self, progress: ImportProgress) {
        let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);
        statuses.insert(progress.import_id.clone(), progress);
    }

    /// Перезаписать статус задачи (последняя запись побеждает)
    pub fn write(&self, progress: ImportProgress) {
        let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);
        statuses.insert(progress.import_id.clone(), progress);
    }

    pub fn get(&self, import_id: &str) -> Option<ImportProgress> {
        let statuses = self.statuses.read().unwrap_or_else(PoisonError::into_inner);
        statuses.get(import_id).cloned()
    }

    pub fn remove(&self, import_id: &str) {
        let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);
        statuses.remove(import_id);
    }

    /// Удалить завершенные задачи старше `max_age_hours`. Возвращает число удаленных
    pub fn cleanup_expired(&self, max_age_hours: i64) -> usize {
        let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);
        let before = statuses.len();
        let now = chrono::Utc::now();
        statuses.retain(|_, progress| {
            match progress.completed_at {
                Some(completed_at) if progress.status.is_terminal() => {
                    (now - completed_at).num_hours() < max_age_hours
                }
                _ => true, // Активные задачи не удаляем
            }
        });
        before - statuses.len()
    }
}

impl ProgressSink for ImportStatusStore {
    fn publish(&self, progress: ImportProgress) {
        self.write(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u501_import_from_file::{ImportEntityKind, ImportStatus};

    fn progress(id: &str) -> ImportProgress {
        ImportProgress::new(id.into(), ImportEntityKind::Age, "user-1".into())
    }

    #[test]
    fn test_last_write_wins() {
        let store = ImportStatusStore::new();
        store.create(progress("a"));
        assert_eq!(store.get("a").unwrap().status, ImportStatus::NotStarted);

        let mut update = progress("a");
        update.processed_rows = 3;
        store.publish(update);
        assert_eq!(store.get("a").unwrap().processed_rows, 3);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_cleanup_removes_only_expired_terminal_statuses() {
        let store = ImportStatusStore::new();

        let mut old = progress("old");
        old.complete(1);
        old.completed_at = Some(chrono::Utc::now() - chrono::Duration::hours(30));
        store.write(old);

        let mut recent = progress("recent");
        recent.fail("boom".into());
        store.write(recent);

        store.create(progress("pending"));

        assert_eq!(store.cleanup_expired(24), 1);
        assert!(store.get("old").is_none());
        assert!(store.get("recent").is_some());
        assert!(store.get("pending").is_some());
    }
}
