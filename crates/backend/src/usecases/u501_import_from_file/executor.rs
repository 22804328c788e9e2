use anyhow::Context;
use axum::body::Bytes;
use chrono::{DateTime, Utc};
use contracts::usecases::u501_import_from_file::{ImportEntityKind, ImportPhase, ImportProgress};

use super::catalog::ReferenceCatalog;
use super::csv_reader::{count_rows, CsvRowReader};
use super::importer::{create_importer, RowImporter, RowOutcome};
use super::progress_tracker::ProgressSink;
use super::settings::ImportSettings;

/// Задача импорта одного загруженного файла
#[derive(Debug, Clone)]
pub struct ImportJob {
    pub import_id: String,
    pub entity_kind: ImportEntityKind,
    pub owner_id: String,
    pub file: Bytes,
    /// Момент постановки в очередь (совпадает с `created_at` статуса)
    pub created_at: DateTime<Utc>,
}

/// Выполнить задачу импорта. Ошибки инфраструктуры переводят задачу в `failed`,
/// ошибки отдельных строк попадают в список ошибок статуса.
pub async fn run_import(
    job: ImportJob,
    catalog: &ReferenceCatalog,
    sink: &dyn ProgressSink,
    settings: &ImportSettings,
) -> ImportProgress {
    let mut progress =
        ImportProgress::new(job.import_id.clone(), job.entity_kind, job.owner_id.clone());
    progress.created_at = job.created_at;
    let mut importer = create_importer(job.entity_kind);

    tracing::info!(
        "Import {} started: kind={}, owner={}, {} bytes",
        job.import_id,
        job.entity_kind,
        job.owner_id,
        job.file.len()
    );

    match execute(&job, importer.as_mut(), catalog, sink, settings, &mut progress).await {
        Ok(()) => {
            tracing::info!(
                "Import {} complete: {} row(s), {} valid, {} rejected",
                job.import_id,
                progress.processed_rows,
                progress.valid_rows,
                progress.errors.len()
            );
        }
        Err(e) => {
            tracing::error!("Import {} failed: {:#}", job.import_id, e);
            progress.fail(format!("{:#}", e));
            sink.publish(progress.clone());
        }
    }
    progress
}

async fn execute(
    job: &ImportJob,
    importer: &mut dyn RowImporter,
    catalog: &ReferenceCatalog,
    sink: &dyn ProgressSink,
    settings: &ImportSettings,
    progress: &mut ImportProgress,
) -> anyhow::Result<()> {
    progress.enter_phase(ImportPhase::RetrievingData);
    sink.publish(progress.clone());
    importer.init(catalog).await?;

    progress.total_rows = Some(count_rows(&job.file, settings.delimiter, settings.has_headers));
    progress.enter_phase(ImportPhase::ValidatingRows);
    sink.publish(progress.clone());

    for row in CsvRowReader::new(&job.file, settings.delimiter, settings.has_headers) {
        progress.processed_rows += 1;
        match row {
            Ok(row) => match importer.validate_and_stage(row.number, &row.cells)? {
                RowOutcome::Staged => progress.valid_rows += 1,
                RowOutcome::Rejected(message) => {
                    progress.add_error(row.number, row.cells, message);
                }
            },
            Err(e) => {
                let row_number = e.row_number().unwrap_or(progress.processed_rows);
                progress.add_error(row_number, Vec::new(), e.to_string());
            }
        }

        if progress.processed_rows % settings.progress_every == 0 {
            sink.publish(progress.clone());
        }
    }

    progress.enter_phase(ImportPhase::InsertingRows);
    sink.publish(progress.clone());
    let inserted = importer
        .persist(catalog, &job.owner_id)
        .await
        .context("Failed to persist imported rows")?;

    progress.complete(inserted as u32);
    sink.publish(progress.clone());
    Ok(())
}
