use async_trait::async_trait;

/// Хранилище записей одного справочника.
///
/// Граница со службой справочных данных: импорт читает весь текущий набор
/// записей и пакетно создает новые. Реализации на БД живут в
/// `domain::*::repository`, в тестах используется хранилище в памяти.
#[async_trait]
pub trait ReferenceStore<E>: Send + Sync {
    /// Все сохраненные записи справочника
    async fn find_all(&self) -> anyhow::Result<Vec<E>>;

    /// Сохранить записи, вернуть сохраненные
    async fn insert_many(&self, items: Vec<E>) -> anyhow::Result<Vec<E>>;
}
