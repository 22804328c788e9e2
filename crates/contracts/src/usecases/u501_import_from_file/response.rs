use serde::{Deserialize, Serialize};

/// Ответ на загрузку файла: идентификатор для опроса статуса
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    #[serde(rename = "uploadId")]
    pub upload_id: String,
}
