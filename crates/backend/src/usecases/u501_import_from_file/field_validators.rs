//! Проверки отдельных полей строки импорта.
//!
//! `validate_*` возвращают `None`, если значение корректно, иначе текст ошибки.
//! `check_*` дополнительно отдают разобранное значение для построения записи.

use contracts::enums::breeding_status::BreedingStatus;

pub const MAX_ALTITUDE: i64 = 65535;
pub const MAX_TOWN_CODE: i64 = 65535;
pub const LABEL_MAX_LEN: usize = 100;
pub const CODE_MAX_LEN: usize = 10;

pub fn validate_altitude(value: &str) -> Option<String> {
    check_altitude(value).err()
}

pub fn validate_latitude(value: &str) -> Option<String> {
    check_latitude(value).err()
}

pub fn validate_longitude(value: &str) -> Option<String> {
    check_longitude(value).err()
}

pub fn validate_label(field: &str, value: &str, max_len: usize) -> Option<String> {
    check_label(field, value, max_len).err()
}

pub fn check_altitude(value: &str) -> Result<i32, String> {
    check_bounded_integer("Altitude", value, 0, MAX_ALTITUDE)
}

pub fn check_town_code(value: &str) -> Result<i32, String> {
    check_bounded_integer("Town code", value, 0, MAX_TOWN_CODE)
}

pub fn check_latitude(value: &str) -> Result<f64, String> {
    check_bounded_number("Latitude", value, -90.0, 90.0)
}

pub fn check_longitude(value: &str) -> Result<f64, String> {
    check_bounded_number("Longitude", value, -180.0, 180.0)
}

/// Непустое значение не длиннее `max_len` символов
pub fn check_label(field: &str, value: &str, max_len: usize) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if value.chars().count() > max_len {
        return Err(format!("{} must be at most {} characters", field, max_len));
    }
    Ok(value.to_string())
}

/// Пустая ячейка означает отсутствие статуса гнездования
pub fn parse_breeding_status(value: &str) -> Result<Option<BreedingStatus>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    BreedingStatus::from_code(value).map(Some).ok_or_else(|| {
        let allowed: Vec<&str> = BreedingStatus::all().iter().map(|s| s.code()).collect();
        format!("Breeding status must be one of: {}", allowed.join(", "))
    })
}

/// Флаг "не подсчитано" для оценок численности
pub fn parse_non_counted(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "" | "no" | "false" | "0" => Ok(false),
        "yes" | "true" | "1" | "x" => Ok(true),
        _ => Err("Non-counted flag must be empty or one of: yes, no, true, false, 1, 0, x".to_string()),
    }
}

fn check_bounded_integer(field: &str, value: &str, min: i64, max: i64) -> Result<i32, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    let parsed: i64 = value
        .parse()
        .map_err(|_| format!("{} must be an integer", field))?;
    if parsed < min || parsed > max {
        return Err(format!(
            "{} must be an integer between {} and {}",
            field, min, max
        ));
    }
    i32::try_from(parsed).map_err(|_| format!("{} must be an integer", field))
}

fn check_bounded_number(field: &str, value: &str, min: f64, max: f64) -> Result<f64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    let parsed: f64 = value
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| format!("{} must be a number", field))?;
    if parsed < min || parsed > max {
        return Err(format!(
            "{} must be a number between {} and {}",
            field, min, max
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_altitude() {
        assert_eq!(
            validate_altitude(""),
            Some("Altitude must not be empty".to_string())
        );
        assert_eq!(
            validate_altitude("12.5"),
            Some("Altitude must be an integer".to_string())
        );
        let out_of_range = Some("Altitude must be an integer between 0 and 65535".to_string());
        assert_eq!(validate_altitude("-1"), out_of_range);
        assert_eq!(validate_altitude("65536"), out_of_range);
        assert_eq!(validate_altitude("0"), None);
        assert_eq!(validate_altitude("65535"), None);
        assert_eq!(check_altitude(" 1200 "), Ok(1200));
    }

    #[test]
    fn test_latitude_bounds() {
        assert_eq!(validate_latitude("-90"), None);
        assert_eq!(validate_latitude("90"), None);
        assert_eq!(validate_latitude("45.123"), None);
        let out_of_range = Some("Latitude must be a number between -90 and 90".to_string());
        assert_eq!(validate_latitude("90.0001"), out_of_range);
        assert_eq!(validate_latitude("-90.0001"), out_of_range);
        assert_eq!(
            validate_latitude(" "),
            Some("Latitude must not be empty".to_string())
        );
        assert_eq!(
            validate_latitude("north"),
            Some("Latitude must be a number".to_string())
        );
    }

    #[test]
    fn test_longitude_bounds() {
        assert_eq!(validate_longitude("-180"), None);
        assert_eq!(validate_longitude("180"), None);
        let out_of_range = Some("Longitude must be a number between -180 and 180".to_string());
        assert_eq!(validate_longitude("180.5"), out_of_range);
        assert_eq!(validate_longitude("-181"), out_of_range);
        assert_eq!(
            validate_longitude(""),
            Some("Longitude must not be empty".to_string())
        );
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        for value in ["NaN", "inf", "-infinity"] {
            assert_eq!(
                validate_latitude(value),
                Some("Latitude must be a number".to_string())
            );
        }
    }

    #[test]
    fn test_label_length() {
        assert_eq!(validate_label("Label", "Adult", LABEL_MAX_LEN), None);
        assert_eq!(
            validate_label("Label", "  ", LABEL_MAX_LEN),
            Some("Label must not be empty".to_string())
        );
        assert_eq!(
            validate_label("Code", "ABCDEFGHIJK", CODE_MAX_LEN),
            Some("Code must be at most 10 characters".to_string())
        );
        // Длина считается в символах, а не байтах
        assert_eq!(validate_label("Code", "ÉÉÉÉÉÉÉÉÉÉ", CODE_MAX_LEN), None);
    }

    #[test]
    fn test_breeding_status() {
        assert_eq!(parse_breeding_status(""), Ok(None));
        assert_eq!(
            parse_breeding_status(" Probable "),
            Ok(Some(BreedingStatus::Probable))
        );
        assert_eq!(
            parse_breeding_status("maybe"),
            Err("Breeding status must be one of: possible, probable, certain".to_string())
        );
    }

    #[test]
    fn test_non_counted_flag() {
        assert_eq!(parse_non_counted(""), Ok(false));
        assert_eq!(parse_non_counted("No"), Ok(false));
        assert_eq!(parse_non_counted("X"), Ok(true));
        assert_eq!(parse_non_counted("true"), Ok(true));
        assert!(parse_non_counted("sometimes").is_err());
    }

    #[test]
    fn test_town_code() {
        assert_eq!(check_town_code("75056"), Err("Town code must be an integer between 0 and 65535".to_string()));
        assert_eq!(check_town_code("056"), Ok(56));
        assert_eq!(check_town_code("a1"), Err("Town code must be an integer".to_string()));
    }
}
