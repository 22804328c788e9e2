use super::EntityMetadata;

/// Трейт для корня агрегата
///
/// Определяет обязательные методы и метаданные для всех справочников системы
pub trait AggregateRoot {
    /// Получить метаданные жизненного цикла
    fn metadata(&self) -> &EntityMetadata;

    /// Получить изменяемые метаданные
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Имя элемента для сообщений (единственное число, например, "Observer")
    fn element_name() -> &'static str;
}
