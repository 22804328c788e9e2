use std::sync::Arc;

use contracts::domain::a005_number_estimate::NumberEstimate;
use contracts::usecases::u501_import_from_file::ImportEntityKind;

use super::cell;
use crate::shared::data::reference_store::ReferenceStore;
use crate::usecases::u501_import_from_file::catalog::ReferenceCatalog;
use crate::usecases::u501_import_from_file::field_validators::{
    check_label, parse_non_counted, LABEL_MAX_LEN,
};
use crate::usecases::u501_import_from_file::importer::ImportProcessor;
use crate::usecases::u501_import_from_file::working_set::NaturalKey;

/// Колонки: label; non_counted
#[derive(Default)]
pub struct NumberEstimateProcessor;

impl ImportProcessor for NumberEstimateProcessor {
    type Entity = NumberEstimate;

    const KIND: ImportEntityKind = ImportEntityKind::NumberEstimate;
    const COLUMNS: usize = 2;
    const REQUIRED_COLUMNS: usize = 1;

    fn store(catalog: &ReferenceCatalog) -> Arc<dyn ReferenceStore<NumberEstimate>> {
        catalog.number_estimates.clone()
    }

    fn build(&self, cells: &[String]) -> Result<NumberEstimate, String> {
        let label = check_label("Label", &cell(cells, 0), LABEL_MAX_LEN)?;
        let non_counted = parse_non_counted(&cell(cells, 1))?;
        Ok(NumberEstimate::new_for_insert(label, non_counted))
    }

    fn natural_keys(entity: &NumberEstimate) -> Vec<NaturalKey> {
        vec![NaturalKey::new("label", entity.label.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_import_from_file::processors::row;

    #[test]
    fn test_build() {
        let estimate = NumberEstimateProcessor.build(&row(&["Flock", "x"])).unwrap();
        assert_eq!(estimate.label, "Flock");
        assert!(estimate.non_counted);

        let estimate = NumberEstimateProcessor.build(&row(&["Exact", ""])).unwrap();
        assert!(!estimate.non_counted);

        assert!(NumberEstimateProcessor.build(&row(&["Exact", "maybe"])).is_err());
    }
}
