use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoricalField, Dataset, NumericField, Record};
use super::range::SliderBounds;

// ---------------------------------------------------------------------------
// FilterSpec: active sidebar selections
// ---------------------------------------------------------------------------

/// The current filter state: a selected-value set per categorical field and a
/// closed interval per numeric field.
///
/// An empty selection set means "no filter" (show all), mirroring the source
/// dashboard: deselecting every option is pass-through, not exclude-all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    pub categories: BTreeMap<CategoricalField, BTreeSet<String>>,
    pub ranges: BTreeMap<NumericField, (f64, f64)>,
}

impl FilterSpec {
    /// Initial state: every category selected and every range at the full
    /// observed span, so nothing is filtered out.
    pub fn all_pass(dataset: &Dataset, bounds: &BTreeMap<NumericField, SliderBounds>) -> Self {
        let categories = dataset
            .unique_values
            .iter()
            .map(|(field, vals)| (*field, vals.clone()))
            .collect();
        let ranges = bounds
            .iter()
            .map(|(field, b)| (*field, b.default_range))
            .collect();
        FilterSpec { categories, ranges }
    }

    /// Whether a record passes every active filter.
    ///
    /// * Categorical: value must be in the selected set, unless the set is
    ///   empty (pass-through).
    /// * Numeric: `lo <= v <= hi`, inclusive; a missing value fails any
    ///   active range, since null compares with nothing.
    pub fn matches(&self, record: &Record) -> bool {
        for (field, selected) in &self.categories {
            if selected.is_empty() {
                continue;
            }
            if !selected.contains(field.value(record)) {
                return false;
            }
        }
        for (field, &(lo, hi)) in &self.ranges {
            match field.value(record) {
                Some(v) if lo <= v && v <= hi => {}
                _ => return false,
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Applying filters
// ---------------------------------------------------------------------------

/// Return indices of records that pass all active filters, in file order.
pub fn filtered_indices(dataset: &Dataset, spec: &FilterSpec) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| spec.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Produce a standalone filtered dataset (cloned projection).
///
/// An empty result is a valid state, not an error: callers render the
/// "no data for these filters" notice instead of aggregating.
pub fn apply(dataset: &Dataset, spec: &FilterSpec) -> Dataset {
    let records = dataset
        .records
        .iter()
        .filter(|r| spec.matches(r))
        .cloned()
        .collect();
    Dataset::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(client: &str, service_type: &str, response_time: Option<f64>) -> Record {
        Record {
            client_id: client.to_string(),
            service_type: service_type.to_string(),
            service_conversion: "Convertido".to_string(),
            client_conversion: String::new(),
            had_response: "Sim".to_string(),
            response_time_hours: response_time,
            initial_value: Some(100.0),
            providers_contacted: Some(2),
            checkin: None,
            checkout: None,
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            rec("c1", "boarding", Some(1.0)),
            rec("c2", "day_care", Some(4.5)),
            rec("c3", "boarding", None),
            rec("c4", "walking", Some(10.0)),
        ])
    }

    fn select(spec: &mut FilterSpec, field: CategoricalField, values: &[&str]) {
        spec.categories
            .insert(field, values.iter().map(|s| s.to_string()).collect());
    }

    #[test]
    fn empty_selection_is_pass_through() {
        let ds = dataset();
        let mut spec = FilterSpec::default();
        select(&mut spec, CategoricalField::ServiceType, &[]);
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 1, 2, 3]);
    }

    #[test]
    fn categorical_membership_keeps_only_selected() {
        let ds = dataset();
        let mut spec = FilterSpec::default();
        select(&mut spec, CategoricalField::ServiceType, &["boarding"]);
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 2]);
    }

    #[test]
    fn numeric_range_is_inclusive_on_both_ends() {
        let ds = dataset();
        let mut spec = FilterSpec::default();
        spec.ranges
            .insert(NumericField::ResponseTimeHours, (1.0, 4.5));
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 1]);
    }

    #[test]
    fn missing_value_fails_an_active_range() {
        let ds = dataset();
        let mut spec = FilterSpec::default();
        spec.ranges
            .insert(NumericField::ResponseTimeHours, (0.0, 100.0));
        // index 2 has no response time and must be excluded
        assert_eq!(filtered_indices(&ds, &spec), vec![0, 1, 3]);
    }

    #[test]
    fn apply_is_idempotent() {
        let ds = dataset();
        let mut spec = FilterSpec::default();
        select(&mut spec, CategoricalField::ServiceType, &["boarding"]);
        spec.ranges
            .insert(NumericField::ResponseTimeHours, (0.0, 100.0));

        let once = apply(&ds, &spec);
        let twice = apply(&once, &spec);
        assert_eq!(once.records, twice.records);
    }

    #[test]
    fn filters_commute() {
        let ds = dataset();

        let mut cat_only = FilterSpec::default();
        select(&mut cat_only, CategoricalField::ServiceType, &["boarding", "day_care"]);

        let mut range_only = FilterSpec::default();
        range_only
            .ranges
            .insert(NumericField::ResponseTimeHours, (0.0, 2.0));

        let cat_then_range = apply(&apply(&ds, &cat_only), &range_only);
        let range_then_cat = apply(&apply(&ds, &range_only), &cat_only);
        assert_eq!(cat_then_range.records, range_then_cat.records);
    }

    #[test]
    fn empty_result_is_a_valid_state() {
        let ds = dataset();
        let mut spec = FilterSpec::default();
        select(&mut spec, CategoricalField::ServiceType, &["grooming"]);
        let filtered = apply(&ds, &spec);
        assert!(filtered.is_empty());
    }

    #[test]
    fn all_pass_spec_keeps_every_record() {
        let ds = dataset();
        let bounds = BTreeMap::new();
        let spec = FilterSpec::all_pass(&ds, &bounds);
        assert_eq!(filtered_indices(&ds, &spec).len(), ds.len());
    }
}
