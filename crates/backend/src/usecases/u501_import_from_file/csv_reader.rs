use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Структурная ошибка строки файла (до валидации полей)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("Row has {found} column(s), expected {expected}")]
    Malformed { found: usize, expected: usize },

    #[error("Row could not be read: {reason}")]
    Unreadable { row_number: u32, reason: String },
}

impl RowError {
    pub fn row_number(&self) -> Option<u32> {
        match self {
            RowError::Unreadable { row_number, .. } => Some(*row_number),
            RowError::Malformed { .. } => None,
        }
    }
}

/// Одна строка данных: номер (с 1, без заголовка) и обрезанные ячейки
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub number: u32,
    pub cells: Vec<String>,
}

/// Ленивый однопроходный reader строк загруженного файла
pub struct CsvRowReader<'a> {
    records: csv::StringRecordsIntoIter<&'a [u8]>,
    row_number: u32,
}

impl<'a> CsvRowReader<'a> {
    pub fn new(bytes: &'a [u8], delimiter: u8, has_headers: bool) -> Self {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(bytes);

        Self {
            records: reader.into_records(),
            row_number: 0,
        }
    }
}

impl Iterator for CsvRowReader<'_> {
    type Item = Result<CsvRow, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.records.next()?;
            match record {
                Ok(record) => {
                    let cells: Vec<String> =
                        record.iter().map(|cell| cell.trim().to_string()).collect();
                    // Строки только из разделителей считаем пустыми
                    if cells.iter().all(|cell| cell.is_empty()) {
                        continue;
                    }
                    self.row_number += 1;
                    return Some(Ok(CsvRow {
                        number: self.row_number,
                        cells,
                    }));
                }
                Err(e) => {
                    self.row_number += 1;
                    return Some(Err(RowError::Unreadable {
                        row_number: self.row_number,
                        reason: e.to_string(),
                    }));
                }
            }
        }
    }
}

/// Количество строк данных в файле (для общего прогресса)
pub fn count_rows(bytes: &[u8], delimiter: u8, has_headers: bool) -> u32 {
    CsvRowReader::new(bytes, delimiter, has_headers).count() as u32
}

/// Отбросить пустые хвостовые ячейки сверх `max` и проверить число колонок.
/// Хвостовые необязательные колонки (между `min` и `max`) можно не указывать
pub fn normalize_columns(cells: &[String], min: usize, max: usize) -> Result<&[String], RowError> {
    let mut len = cells.len();
    while len > max && cells[len - 1].is_empty() {
        len -= 1;
    }
    if len < min {
        return Err(RowError::Malformed {
            found: len,
            expected: min,
        });
    }
    if len > max {
        return Err(RowError::Malformed {
            found: len,
            expected: max,
        });
    }
    Ok(&cells[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_reads_trimmed_cells_in_file_order() {
        let data = "\u{FEFF} Robin ; x\nSparrow;y\n\nFinch;z\n";
        let rows: Vec<_> = CsvRowReader::new(data.as_bytes(), b';', false)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].cells, cells(&["Robin", "x"]));
        assert_eq!(rows[2].number, 3);
        assert_eq!(rows[2].cells, cells(&["Finch", "z"]));
    }

    #[test]
    fn test_header_row_is_not_counted() {
        let data = "label\nMale\nFemale\n";
        let rows: Vec<_> = CsvRowReader::new(data.as_bytes(), b';', true)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number, 1);
        assert_eq!(rows[0].cells, cells(&["Male"]));
        assert_eq!(count_rows(data.as_bytes(), b';', true), 2);
    }

    #[test]
    fn test_separator_only_lines_are_skipped() {
        let data = "a;b\n;;\n c ; d \n";
        assert_eq!(count_rows(data.as_bytes(), b';', false), 2);
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let data = b"ok\n\xFF\xFE;bad\nnext\n";
        let rows: Vec<_> = CsvRowReader::new(data, b';', false).collect();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        assert!(matches!(
            rows[1],
            Err(RowError::Unreadable { row_number: 2, .. })
        ));
        assert_eq!(rows[2].as_ref().unwrap().number, 3);
    }

    #[test]
    fn test_normalize_drops_trailing_empty_cells() {
        let row = cells(&["a", "b", "", ""]);
        assert_eq!(normalize_columns(&row, 2, 2).unwrap(), &row[..2]);

        // Пустые ячейки в пределах ожидаемого числа сохраняются
        let row = cells(&["a", "", ""]);
        assert_eq!(normalize_columns(&row, 3, 3).unwrap().len(), 3);
    }

    #[test]
    fn test_optional_trailing_columns_may_be_omitted() {
        let row = cells(&["NEST", "Nest building"]);
        assert_eq!(normalize_columns(&row, 2, 3).unwrap().len(), 2);
        assert!(normalize_columns(&cells(&["NEST"]), 2, 3).is_err());
    }

    #[test]
    fn test_normalize_rejects_wrong_column_count() {
        let row = cells(&["a", "b", "c"]);
        let err = normalize_columns(&row, 2, 2).unwrap_err();
        assert_eq!(
            err,
            RowError::Malformed {
                found: 3,
                expected: 2
            }
        );
        assert_eq!(err.to_string(), "Row has 3 column(s), expected 2");

        let row = cells(&["a"]);
        assert_eq!(
            normalize_columns(&row, 2, 2).unwrap_err().to_string(),
            "Row has 1 column(s), expected 2"
        );
    }
}
