use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, Path},
    http::StatusCode,
    Json,
};
use contracts::system::auth::TokenClaims;
use contracts::usecases::u501_import_from_file::{ImportEntityKind, ImportProgress, ImportResponse};
use once_cell::sync::OnceCell;

use crate::system::auth::extractor::ImportingUser;
use crate::usecases::u501_import_from_file::{ImportDispatcher, ImportStartError};

// ============================================================================
// UseCase u501: Import from file
// ============================================================================

/// Точка входа импорта: диспетчер очереди и лимит размера файла
pub struct ImportEndpoint {
    dispatcher: ImportDispatcher,
    max_upload_bytes: usize,
}

static IMPORT_ENDPOINT: OnceCell<ImportEndpoint> = OnceCell::new();

/// Регистрация диспетчера (вызывается один раз при старте)
pub fn init_import_endpoint(
    dispatcher: ImportDispatcher,
    max_upload_bytes: usize,
) -> anyhow::Result<()> {
    IMPORT_ENDPOINT
        .set(ImportEndpoint::new(dispatcher, max_upload_bytes))
        .map_err(|_| anyhow::anyhow!("Import endpoint already initialized"))
}

fn endpoint() -> Result<&'static ImportEndpoint, StatusCode> {
    IMPORT_ENDPOINT.get().ok_or_else(|| {
        tracing::error!("Import endpoint is not initialized");
        StatusCode::SERVICE_UNAVAILABLE
    })
}

impl ImportEndpoint {
    pub fn new(dispatcher: ImportDispatcher, max_upload_bytes: usize) -> Self {
        Self {
            dispatcher,
            max_upload_bytes,
        }
    }

    async fn start_import(
        &self,
        kind_code: &str,
        user: &TokenClaims,
        multipart: &mut Multipart,
    ) -> Result<ImportResponse, StatusCode> {
        let entity_kind = ImportEntityKind::from_code(kind_code).ok_or_else(|| {
            tracing::warn!("Unknown import entity kind: {}", kind_code);
            StatusCode::BAD_REQUEST
        })?;

        let file = read_upload(multipart).await?.ok_or_else(|| {
            tracing::warn!("Import upload without a file from user {}", user.username);
            StatusCode::BAD_REQUEST
        })?;
        if file.is_empty() {
            return Err(StatusCode::BAD_REQUEST);
        }
        if file.len() > self.max_upload_bytes {
            tracing::warn!(
                "Import upload of {} bytes exceeds limit of {} bytes",
                file.len(),
                self.max_upload_bytes
            );
            return Err(StatusCode::PAYLOAD_TOO_LARGE);
        }

        match self.dispatcher.create_import_job(file, entity_kind, user) {
            Ok(upload_id) => Ok(ImportResponse { upload_id }),
            Err(e) => {
                tracing::error!("Failed to start import: {}", e);
                Err(match e {
                    ImportStartError::QueueClosed | ImportStartError::QueueFull => {
                        StatusCode::SERVICE_UNAVAILABLE
                    }
                })
            }
        }
    }

    fn status(&self, import_id: &str, user: &TokenClaims) -> Result<ImportProgress, StatusCode> {
        self.dispatcher
            .get_import_status(import_id, user)
            .ok_or(StatusCode::NOT_FOUND)
    }
}

/// Содержимое поля `file`, иначе первой части с именем файла
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Bytes>, StatusCode> {
    let mut first_file_part = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_status)? {
        let is_file_field = field.name() == Some("file");
        let has_file_name = field.file_name().is_some();
        if !is_file_field && (!has_file_name || first_file_part.is_some()) {
            continue;
        }

        let bytes = field.bytes().await.map_err(multipart_status)?;
        if is_file_field {
            return Ok(Some(bytes));
        }
        first_file_part = Some(bytes);
    }
    Ok(first_file_part)
}

fn multipart_status(e: MultipartError) -> StatusCode {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Import upload rejected: {}", e.body_text());
    } else {
        tracing::warn!("Malformed multipart upload: {}", e.body_text());
    }
    status
}

/// POST /api/import/:entity_kind
pub async fn u501_upload_file(
    Path(entity_kind): Path<String>,
    ImportingUser(user): ImportingUser,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, StatusCode> {
    endpoint()?
        .start_import(&entity_kind, &user, &mut multipart)
        .await
        .map(Json)
}

/// GET /api/import/status/:import_id
pub async fn u501_get_status(
    Path(import_id): Path<String>,
    ImportingUser(user): ImportingUser,
) -> Result<Json<ImportProgress>, StatusCode> {
    endpoint()?.status(&import_id, &user).map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_from_file::ImportStatusStore;
    use axum::body::Body;
    use axum::extract::{FromRequest, Request};
    use contracts::usecases::u501_import_from_file::ImportStatus;

    const BOUNDARY: &str = "import-test-boundary";

    fn user(sub: &str, permissions: &[&str]) -> TokenClaims {
        TokenClaims {
            sub: sub.to_string(),
            username: sub.to_string(),
            is_admin: false,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp: 0,
            iat: 0,
        }
    }

    /// Части: (имя поля, имя файла, содержимое)
    async fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Multipart {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                    name, file_name
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        let request = Request::builder()
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn endpoint_with_queue(
        capacity: usize,
        max_upload_bytes: usize,
    ) -> (
        ImportEndpoint,
        tokio::sync::mpsc::Receiver<crate::usecases::u501_import_from_file::ImportJob>,
    ) {
        let (dispatcher, receiver) = ImportDispatcher::new(capacity, ImportStatusStore::new());
        (ImportEndpoint::new(dispatcher, max_upload_bytes), receiver)
    }

    #[tokio::test]
    async fn test_upload_returns_id_and_queues_job() {
        let (endpoint, mut receiver) = endpoint_with_queue(4, 1024);
        let owner = user("u1", &["import"]);
        let mut upload = multipart(&[("file", Some("sexes.csv"), "Male\nFemale")]).await;

        let response = endpoint
            .start_import("sex", &owner, &mut upload)
            .await
            .unwrap();

        let job = receiver.try_recv().unwrap();
        assert_eq!(job.import_id, response.upload_id);
        assert_eq!(job.entity_kind, ImportEntityKind::Sex);
        assert_eq!(&job.file[..], b"Male\nFemale");

        let progress = endpoint.status(&response.upload_id, &owner).unwrap();
        assert_eq!(progress.status, ImportStatus::NotStarted);
    }

    #[tokio::test]
    async fn test_first_file_part_is_used_without_file_field() {
        let (endpoint, mut receiver) = endpoint_with_queue(4, 1024);
        let owner = user("u1", &["import"]);
        let mut upload = multipart(&[
            ("comment", None, "ignored"),
            ("upload", Some("a.csv"), "Rain"),
            ("other", Some("b.csv"), "Snow"),
        ])
        .await;

        endpoint
            .start_import("weather", &owner, &mut upload)
            .await
            .unwrap();

        assert_eq!(&receiver.try_recv().unwrap().file[..], b"Rain");
    }

    #[tokio::test]
    async fn test_rejected_uploads() {
        let (endpoint, mut receiver) = endpoint_with_queue(4, 8);
        let owner = user("u1", &["import"]);

        let mut unknown = multipart(&[("file", Some("x.csv"), "a")]).await;
        assert_eq!(
            endpoint.start_import("entry", &owner, &mut unknown).await.unwrap_err(),
            StatusCode::BAD_REQUEST
        );

        let mut missing = multipart(&[("comment", None, "no file here")]).await;
        assert_eq!(
            endpoint.start_import("sex", &owner, &mut missing).await.unwrap_err(),
            StatusCode::BAD_REQUEST
        );

        let mut empty = multipart(&[("file", Some("x.csv"), "")]).await;
        assert_eq!(
            endpoint.start_import("sex", &owner, &mut empty).await.unwrap_err(),
            StatusCode::BAD_REQUEST
        );

        let mut too_large = multipart(&[("file", Some("x.csv"), "0123456789")]).await;
        assert_eq!(
            endpoint.start_import("sex", &owner, &mut too_large).await.unwrap_err(),
            StatusCode::PAYLOAD_TOO_LARGE
        );

        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_queue_is_unavailable() {
        let (endpoint, receiver) = endpoint_with_queue(4, 1024);
        drop(receiver);
        let owner = user("u1", &["import"]);
        let mut upload = multipart(&[("file", Some("x.csv"), "Male")]).await;

        assert_eq!(
            endpoint.start_import("sex", &owner, &mut upload).await.unwrap_err(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_status_of_foreign_or_unknown_import_is_not_found() {
        let (endpoint, _receiver) = endpoint_with_queue(4, 1024);
        let owner = user("u1", &["import"]);
        let mut upload = multipart(&[("file", Some("x.csv"), "Male")]).await;
        let response = endpoint
            .start_import("sex", &owner, &mut upload)
            .await
            .unwrap();

        let stranger = user("u2", &["import"]);
        assert_eq!(
            endpoint.status(&response.upload_id, &stranger).unwrap_err(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            endpoint.status("missing", &owner).unwrap_err(),
            StatusCode::NOT_FOUND
        );

        let admin = TokenClaims {
            is_admin: true,
            ..user("admin", &[])
        };
        assert!(endpoint.status(&response.upload_id, &admin).is_ok());
    }
}
