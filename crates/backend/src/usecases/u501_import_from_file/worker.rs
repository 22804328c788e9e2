use std::sync::Arc;

use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_import_from_file::ImportFromFile;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinError;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use super::catalog::ReferenceCatalog;
use super::executor::{run_import, ImportJob};
use super::progress_tracker::{ImportStatusStore, ProgressSink};
use super::settings::ImportSettings;

/// Фоновый воркер: забирает задачи из очереди и выполняет их параллельно
/// (не больше `settings.workers` одновременно)
pub struct ImportWorker {
    receiver: mpsc::Receiver<ImportJob>,
    catalog: ReferenceCatalog,
    statuses: ImportStatusStore,
    settings: Arc<ImportSettings>,
    permits: Arc<Semaphore>,
}

impl ImportWorker {
    pub fn new(
        receiver: mpsc::Receiver<ImportJob>,
        catalog: ReferenceCatalog,
        statuses: ImportStatusStore,
        settings: Arc<ImportSettings>,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(settings.workers.max(1)));
        Self {
            receiver,
            catalog,
            statuses,
            settings,
            permits,
        }
    }

    /// Цикл обработки очереди; завершается, когда очередь закрыта
    pub async fn run_loop(mut self) {
        info!(
            "{} worker started with {} concurrent job(s)",
            ImportFromFile::full_name(),
            self.settings.workers
        );

        while let Some(job) = self.receiver.recv().await {
            let permit = match self.permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    warn!("Import worker semaphore closed, stopping");
                    break;
                }
            };

            let catalog = self.catalog.clone();
            let statuses = self.statuses.clone();
            let settings = Arc::clone(&self.settings);
            tokio::spawn(async move {
                let _permit = permit;
                let import_id = job.import_id.clone();
                let sink = statuses.clone();
                let task = tokio::spawn(async move {
                    run_import(job, &catalog, &sink, &settings).await;
                });
                if let Err(e) = task.await {
                    mark_aborted(&statuses, &import_id, &e);
                }
            });
        }

        info!("{} worker stopped: queue closed", ImportFromFile::full_name());
    }
}

/// Задача импорта упала (паника или отмена): статус переводится в `failed`,
/// иначе он остался бы `ongoing` и не попал бы под очистку
fn mark_aborted(statuses: &ImportStatusStore, import_id: &str, e: &JoinError) {
    error!("Import {} aborted: {}", import_id, e);
    match statuses.get(import_id) {
        Some(mut progress) if !progress.status.is_terminal() => {
            progress.fail(format!("Import task aborted: {}", e));
            statuses.publish(progress);
        }
        Some(_) => {}
        None => warn!("Import {} status is gone, nothing to mark as failed", import_id),
    }
}

/// Периодически удаляет завершенные статусы старше TTL
pub async fn run_status_cleanup(statuses: ImportStatusStore, settings: Arc<ImportSettings>) {
    let mut interval = time::interval(time::Duration::from_secs(
        settings.cleanup_interval_seconds,
    ));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        let removed = statuses.cleanup_expired(settings.status_ttl_hours);
        if removed > 0 {
            info!("Removed {} expired import status(es)", removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_from_file::catalog::memory::MemoryStore;
    use crate::usecases::u501_import_from_file::dispatcher::ImportDispatcher;
    use axum::body::Bytes;
    use contracts::domain::a002_sex::Sex;
    use contracts::domain::a003_age::Age;
    use contracts::system::auth::TokenClaims;
    use contracts::usecases::u501_import_from_file::{ImportEntityKind, ImportStatus};

    fn user() -> TokenClaims {
        TokenClaims {
            sub: "user-1".into(),
            username: "user".into(),
            is_admin: false,
            permissions: vec!["import".into()],
            exp: 0,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn test_jobs_run_to_completion() {
        let statuses = ImportStatusStore::new();
        let (dispatcher, receiver) = ImportDispatcher::new(8, statuses.clone());

        let sexes = Arc::new(MemoryStore::<Sex>::new());
        let mut catalog = ReferenceCatalog::in_memory();
        catalog.sexes = sexes.clone();

        let worker = ImportWorker::new(
            receiver,
            catalog,
            statuses.clone(),
            Arc::new(ImportSettings::default()),
        );
        let handle = tokio::spawn(worker.run_loop());

        let user = user();
        let first = dispatcher
            .create_import_job(Bytes::from_static(b"Male\nFemale\n"), ImportEntityKind::Sex, &user)
            .unwrap();
        let second = dispatcher
            .create_import_job(Bytes::from_static(b"Unknown\n"), ImportEntityKind::Sex, &user)
            .unwrap();

        let mut done = false;
        for _ in 0..100 {
            let finished = [&first, &second].iter().all(|id| {
                statuses
                    .get(id)
                    .map(|p| p.status.is_terminal())
                    .unwrap_or(false)
            });
            if finished {
                done = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(done, "import jobs did not finish");

        assert_eq!(statuses.get(&first).unwrap().status, ImportStatus::Complete);
        assert_eq!(statuses.get(&second).unwrap().status, ImportStatus::Complete);
        assert_eq!(sexes.snapshot().len(), 3);

        drop(dispatcher);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_panicking_job_is_marked_failed() {
        let statuses = ImportStatusStore::new();
        let (dispatcher, receiver) = ImportDispatcher::new(8, statuses.clone());

        let mut catalog = ReferenceCatalog::in_memory();
        catalog.ages = Arc::new(MemoryStore::<Age>::panicking());

        let worker = ImportWorker::new(
            receiver,
            catalog,
            statuses.clone(),
            Arc::new(ImportSettings::default()),
        );
        let handle = tokio::spawn(worker.run_loop());

        let id = dispatcher
            .create_import_job(Bytes::from_static(b"Adult\n"), ImportEntityKind::Age, &user())
            .unwrap();
        let created_at = statuses.get(&id).unwrap().created_at;

        let mut status = None;
        for _ in 0..100 {
            status = statuses.get(&id).filter(|p| p.status.is_terminal());
            if status.is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let status = status.expect("panicked import stayed non-terminal");

        assert_eq!(status.status, ImportStatus::Failed);
        assert!(status.failure.unwrap().contains("aborted"));
        assert_eq!(status.created_at, created_at);

        drop(dispatcher);
        handle.await.unwrap();
    }
}
