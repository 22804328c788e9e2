use serde::{Deserialize, Serialize};

/// Право на загрузку файлов импорта
pub const PERMISSION_IMPORT: &str = "import";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub username: String,
    pub is_admin: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}

impl TokenClaims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Может ли пользователь запускать импорт
    pub fn can_import(&self) -> bool {
        self.is_admin || self.has_permission(PERMISSION_IMPORT)
    }

    /// Может ли пользователь видеть задачи импорта других пользователей
    pub fn can_view_all_imports(&self) -> bool {
        self.is_admin
    }
}
