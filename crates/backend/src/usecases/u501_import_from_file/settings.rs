use crate::shared::config::ImportConfig;

/// Параметры выполнения задач импорта
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub delimiter: u8,
    pub has_headers: bool,
    pub progress_every: u32,
    pub workers: usize,
    pub queue_capacity: usize,
    pub insert_batch_size: usize,
    pub status_ttl_hours: i64,
    pub cleanup_interval_seconds: u64,
}

impl ImportSettings {
    pub fn from_config(config: &ImportConfig) -> anyhow::Result<Self> {
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Import delimiter must be a single ASCII character, got {:?}",
                    config.delimiter
                )
            })?;

        Ok(Self {
            delimiter,
            has_headers: config.has_headers,
            progress_every: config.progress_every.max(1),
            workers: config.workers.max(1),
            queue_capacity: config.queue_capacity.max(1),
            insert_batch_size: config.insert_batch_size.max(1),
            status_ttl_hours: config.status_ttl_hours,
            cleanup_interval_seconds: config.cleanup_interval_seconds.max(1),
        })
    }
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            delimiter: b';',
            has_headers: false,
            progress_every: 10,
            workers: 2,
            queue_capacity: 32,
            insert_batch_size: 500,
            status_ttl_hours: 24,
            cleanup_interval_seconds: 600,
        }
    }
}
