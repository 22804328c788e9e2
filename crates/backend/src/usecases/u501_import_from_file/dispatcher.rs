use axum::body::Bytes;
use contracts::system::auth::TokenClaims;
use contracts::usecases::u501_import_from_file::{ImportEntityKind, ImportProgress};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::executor::ImportJob;
use super::progress_tracker::ImportStatusStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportStartError {
    #[error("Import queue is closed")]
    QueueClosed,

    #[error("Import queue is full")]
    QueueFull,
}

/// Принимает загруженные файлы и ставит задачи в очередь воркера
#[derive(Clone)]
pub struct ImportDispatcher {
    sender: mpsc::Sender<ImportJob>,
    statuses: ImportStatusStore,
}

impl ImportDispatcher {
    /// Диспетчер и приемный конец очереди для `ImportWorker`
    pub fn new(
        queue_capacity: usize,
        statuses: ImportStatusStore,
    ) -> (Self, mpsc::Receiver<ImportJob>) {
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));
        (Self { sender, statuses }, receiver)
    }

    /// Поставить файл в очередь; возвращает id задачи, не дожидаясь обработки
    pub fn create_import_job(
        &self,
        file: Bytes,
        entity_kind: ImportEntityKind,
        user: &TokenClaims,
    ) -> Result<String, ImportStartError> {
        let import_id = Uuid::new_v4().to_string();
        let progress = ImportProgress::new(import_id.clone(), entity_kind, user.sub.clone());
        let created_at = progress.created_at;
        self.statuses.create(progress);

        let job = ImportJob {
            import_id: import_id.clone(),
            entity_kind,
            owner_id: user.sub.clone(),
            file,
            created_at,
        };

        if let Err(e) = self.sender.try_send(job) {
            self.statuses.remove(&import_id);
            return Err(match e {
                mpsc::error::TrySendError::Full(_) => ImportStartError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => ImportStartError::QueueClosed,
            });
        }

        tracing::info!(
            "Import {} queued: kind={}, user={}",
            import_id,
            entity_kind,
            user.username
        );
        Ok(import_id)
    }

    /// Статус задачи; чужие задачи видны только пользователю с правом просмотра всех
    pub fn get_import_status(&self, import_id: &str, user: &TokenClaims) -> Option<ImportProgress> {
        self.statuses
            .get(import_id)
            .filter(|progress| progress.owner_id == user.sub || user.can_view_all_imports())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u501_import_from_file::ImportStatus;

    fn user(sub: &str, is_admin: bool) -> TokenClaims {
        TokenClaims {
            sub: sub.into(),
            username: sub.into(),
            is_admin,
            permissions: vec!["import".into()],
            exp: 0,
            iat: 0,
        }
    }

    #[tokio::test]
    async fn test_job_is_queued_as_not_started() {
        let (dispatcher, mut receiver) = ImportDispatcher::new(4, ImportStatusStore::new());
        let owner = user("owner", false);

        let id = dispatcher
            .create_import_job(Bytes::from_static(b"Adult\n"), ImportEntityKind::Age, &owner)
            .unwrap();

        let status = dispatcher.get_import_status(&id, &owner).unwrap();
        assert_eq!(status.status, ImportStatus::NotStarted);
        assert_eq!(status.owner_id, "owner");

        let job = receiver.recv().await.unwrap();
        assert_eq!(job.import_id, id);
        assert_eq!(job.entity_kind, ImportEntityKind::Age);
        assert_eq!(&job.file[..], b"Adult\n");
        assert_eq!(job.created_at, status.created_at);
    }

    #[tokio::test]
    async fn test_status_visibility() {
        let (dispatcher, _receiver) = ImportDispatcher::new(4, ImportStatusStore::new());
        let id = dispatcher
            .create_import_job(Bytes::new(), ImportEntityKind::Sex, &user("owner", false))
            .unwrap();

        assert!(dispatcher
            .get_import_status(&id, &user("stranger", false))
            .is_none());
        assert!(dispatcher
            .get_import_status(&id, &user("admin", true))
            .is_some());
        assert!(dispatcher
            .get_import_status("unknown", &user("admin", true))
            .is_none());
    }

    #[tokio::test]
    async fn test_closed_or_full_queue_rejects_job() {
        let (dispatcher, receiver) = ImportDispatcher::new(1, ImportStatusStore::new());
        let owner = user("owner", false);

        dispatcher
            .create_import_job(Bytes::new(), ImportEntityKind::Sex, &owner)
            .unwrap();
        assert_eq!(
            dispatcher.create_import_job(Bytes::new(), ImportEntityKind::Sex, &owner),
            Err(ImportStartError::QueueFull)
        );

        drop(receiver);
        assert_eq!(
            dispatcher.create_import_job(Bytes::new(), ImportEntityKind::Sex, &owner),
            Err(ImportStartError::QueueClosed)
        );
    }
}
