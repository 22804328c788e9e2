use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, system};

/// Запас на служебные части multipart сверх лимита размера файла
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Конфигурация всех роутов приложения
pub fn configure_routes(max_upload_bytes: usize) -> Router {
    let import_routes = Router::new()
        // UseCase u501: Import from file
        .route(
            "/api/import/:entity_kind",
            post(handlers::usecases::u501_upload_file),
        )
        .route(
            "/api/import/status/:import_id",
            get(handlers::usecases::u501_get_status),
        )
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(middleware::from_fn(system::auth::middleware::require_auth));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(import_routes)
}
