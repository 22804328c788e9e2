use std::collections::HashMap;

/// Сравнение строк: без пробелов по краям и без учета регистра
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Естественный ключ записи справочника (label, code, name внутри родителя...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey {
    /// Имя поля для сообщений об ошибке
    pub field: &'static str,
    /// Значение, как его ввел пользователь, без пробелов по краям
    pub display: String,
    normalized: String,
}

impl NaturalKey {
    pub fn new(field: &'static str, value: impl Into<String>) -> Self {
        let display = value.into().trim().to_string();
        let normalized = normalize(&display);
        Self {
            field,
            display,
            normalized,
        }
    }

    /// Ключ, уникальный только внутри родителя (коммуна внутри департамента и т.п.)
    pub fn scoped(field: &'static str, scope: &str, value: impl Into<String>) -> Self {
        let mut key = Self::new(field, value);
        key.normalized = format!("{}\u{1f}{}", scope, key.normalized);
        key
    }
}

/// Откуда в рабочем наборе взялся ключ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    Persisted,
    Staged { row_number: u32 },
}

/// Рабочий набор одной задачи: записи из БД и принятые ранее строки файла
#[derive(Debug, Default)]
pub struct WorkingSet {
    keys: HashMap<(&'static str, String), KeyOrigin>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Первый из ключей, который уже есть в наборе
    pub fn find_conflict<'k>(&self, keys: &'k [NaturalKey]) -> Option<(&'k NaturalKey, KeyOrigin)> {
        keys.iter().find_map(|key| {
            self.keys
                .get(&(key.field, key.normalized.clone()))
                .map(|origin| (key, *origin))
        })
    }

    /// Зарегистрировать ключи; уже известный ключ сохраняет первое происхождение
    pub fn register(&mut self, keys: Vec<NaturalKey>, origin: KeyOrigin) {
        for key in keys {
            self.keys.entry((key.field, key.normalized)).or_insert(origin);
        }
    }
}

pub fn duplicate_message(entity_name: &str, key: &NaturalKey, origin: KeyOrigin) -> String {
    match origin {
        KeyOrigin::Persisted => format!(
            "{} with {} \"{}\" already exists",
            entity_name, key.field, key.display
        ),
        KeyOrigin::Staged { row_number } => format!(
            "{} with {} \"{}\" duplicates row {}",
            entity_name, key.field, key.display, row_number
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_ignores_case_and_spaces() {
        let mut set = WorkingSet::new();
        set.register(vec![NaturalKey::new("label", "Adult")], KeyOrigin::Persisted);

        let candidate = [NaturalKey::new("label", "  aDULT ")];
        let (key, origin) = set.find_conflict(&candidate).unwrap();
        assert_eq!(origin, KeyOrigin::Persisted);
        assert_eq!(
            duplicate_message("Age", key, origin),
            "Age with label \"aDULT\" already exists"
        );
    }

    #[test]
    fn test_scoped_key_display_is_trimmed() {
        let key = NaturalKey::scoped("name", "7", " Le Lac\t");
        assert_eq!(key.display, "Le Lac");
        assert_eq!(key.normalized, NaturalKey::scoped("name", "7", "le lac").normalized);
    }

    #[test]
    fn test_any_key_conflicts() {
        let mut set = WorkingSet::new();
        set.register(
            vec![NaturalKey::new("code", "NEST"), NaturalKey::new("label", "Nesting")],
            KeyOrigin::Staged { row_number: 4 },
        );

        let candidate = [NaturalKey::new("code", "FLY"), NaturalKey::new("label", "nesting")];
        let (key, origin) = set.find_conflict(&candidate).unwrap();
        assert_eq!(key.field, "label");
        assert_eq!(
            duplicate_message("Behavior", key, origin),
            "Behavior with label \"nesting\" duplicates row 4"
        );
    }

    #[test]
    fn test_fields_and_scopes_do_not_collide() {
        let mut set = WorkingSet::new();
        set.register(vec![NaturalKey::new("code", "A1")], KeyOrigin::Persisted);
        set.register(
            vec![NaturalKey::scoped("name", "town-1", "Les Bois")],
            KeyOrigin::Persisted,
        );

        assert!(set.find_conflict(&[NaturalKey::new("label", "A1")]).is_none());
        assert!(set
            .find_conflict(&[NaturalKey::scoped("name", "town-2", "Les Bois")])
            .is_none());
        assert!(set
            .find_conflict(&[NaturalKey::scoped("name", "town-1", "les bois")])
            .is_some());
    }

    #[test]
    fn test_first_origin_is_kept() {
        let mut set = WorkingSet::new();
        set.register(vec![NaturalKey::new("label", "x")], KeyOrigin::Staged { row_number: 1 });
        set.register(vec![NaturalKey::new("label", "X")], KeyOrigin::Staged { row_number: 7 });

        assert_eq!(set.len(), 1);
        let (_, origin) = set.find_conflict(&[NaturalKey::new("label", "x")]).unwrap();
        assert_eq!(origin, KeyOrigin::Staged { row_number: 1 });
    }
}
