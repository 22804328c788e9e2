use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Таблицы справочников (минимальный bootstrap схемы, без миграций)
const REFERENCE_TABLES: &[(&str, &str)] = &[
    (
        "a001_observer",
        r#"
        CREATE TABLE IF NOT EXISTS a001_observer (
            id TEXT PRIMARY KEY NOT NULL,
            label TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a002_sex",
        r#"
        CREATE TABLE IF NOT EXISTS a002_sex (
            id TEXT PRIMARY KEY NOT NULL,
            label TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a003_age",
        r#"
        CREATE TABLE IF NOT EXISTS a003_age (
            id TEXT PRIMARY KEY NOT NULL,
            label TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a004_weather",
        r#"
        CREATE TABLE IF NOT EXISTS a004_weather (
            id TEXT PRIMARY KEY NOT NULL,
            label TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a005_number_estimate",
        r#"
        CREATE TABLE IF NOT EXISTS a005_number_estimate (
            id TEXT PRIMARY KEY NOT NULL,
            label TEXT NOT NULL,
            non_counted INTEGER NOT NULL DEFAULT 0,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a006_distance_estimate",
        r#"
        CREATE TABLE IF NOT EXISTS a006_distance_estimate (
            id TEXT PRIMARY KEY NOT NULL,
            label TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a007_species_class",
        r#"
        CREATE TABLE IF NOT EXISTS a007_species_class (
            id TEXT PRIMARY KEY NOT NULL,
            label TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a008_environment",
        r#"
        CREATE TABLE IF NOT EXISTS a008_environment (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL,
            label TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a009_behavior",
        r#"
        CREATE TABLE IF NOT EXISTS a009_behavior (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL,
            label TEXT NOT NULL,
            breeding_status TEXT,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a010_department",
        r#"
        CREATE TABLE IF NOT EXISTS a010_department (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a011_town",
        r#"
        CREATE TABLE IF NOT EXISTS a011_town (
            id TEXT PRIMARY KEY NOT NULL,
            department_id TEXT NOT NULL REFERENCES a010_department(id),
            code INTEGER NOT NULL,
            name TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a012_locality",
        r#"
        CREATE TABLE IF NOT EXISTS a012_locality (
            id TEXT PRIMARY KEY NOT NULL,
            town_id TEXT NOT NULL REFERENCES a011_town(id),
            name TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            altitude INTEGER NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
    (
        "a013_species",
        r#"
        CREATE TABLE IF NOT EXISTS a013_species (
            id TEXT PRIMARY KEY NOT NULL,
            class_id TEXT NOT NULL REFERENCES a007_species_class(id),
            code TEXT NOT NULL,
            common_name TEXT NOT NULL,
            scientific_name TEXT NOT NULL,
            owner_id TEXT,
            created_at TEXT,
            updated_at TEXT
        );
    "#,
    ),
];

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/app.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    for (table_name, create_sql) in REFERENCE_TABLES {
        tracing::debug!("Ensuring table {} exists", table_name);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_sql.to_string(),
        ))
        .await?;
    }
    tracing::info!(
        "Database ready at {} ({} reference tables)",
        absolute_path.display(),
        REFERENCE_TABLES.len()
    );

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
