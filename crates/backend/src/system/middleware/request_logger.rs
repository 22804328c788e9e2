use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Middleware для логирования HTTP запросов: метод, путь, статус, длительность
/// и размер загруженного тела (если известен из Content-Length)
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_size = req
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration = start.elapsed().as_millis();
    let size = request_size
        .map(format_number)
        .unwrap_or_else(|| "-".to_string());

    if response.status().is_server_error() {
        tracing::error!("{} {} -> {} | {}ms | {} bytes in", method, path, status, duration, size);
    } else if response.status().is_client_error() {
        tracing::warn!("{} {} -> {} | {}ms | {} bytes in", method, path, status, duration, size);
    } else {
        tracing::info!("{} {} -> {} | {}ms | {} bytes in", method, path, status, duration, size);
    }

    response
}
