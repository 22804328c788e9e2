pub mod domain;
pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use usecases::u501_import_from_file::{
        run_status_cleanup, ImportDispatcher, ImportSettings, ImportStatusStore, ImportWorker,
        ReferenceCatalog,
    };

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    shared::data::db::initialize_database(Some(&db_path.to_string_lossy()))
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    system::auth::jwt::init_jwt_secret(shared::config::resolve_jwt_secret(&config));

    // Очередь импорта и фоновые задачи
    let settings = Arc::new(ImportSettings::from_config(&config.import)?);
    let statuses = ImportStatusStore::new();
    let (dispatcher, receiver) = ImportDispatcher::new(settings.queue_capacity, statuses.clone());
    let worker = ImportWorker::new(
        receiver,
        ReferenceCatalog::database(settings.insert_batch_size),
        statuses.clone(),
        Arc::clone(&settings),
    );
    tokio::spawn(worker.run_loop());
    tokio::spawn(run_status_cleanup(statuses, Arc::clone(&settings)));
    handlers::usecases::init_import_endpoint(dispatcher, config.import.max_upload_bytes)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = routes::configure_routes(config.import.max_upload_bytes)
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
