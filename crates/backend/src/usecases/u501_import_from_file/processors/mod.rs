pub mod behavior;
pub mod department;
pub mod environment;
pub mod label;
pub mod locality;
pub mod number_estimate;
pub mod species;
pub mod town;

/// Обрезанное значение ячейки (пустая строка, если ячейки нет)
pub(crate) fn cell(cells: &[String], index: usize) -> String {
    cells
        .get(index)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
