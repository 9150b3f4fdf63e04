use std::collections::BTreeMap;

use crate::data::filter::{FilterSpec, filtered_indices};
use crate::data::model::{CategoricalField, Dataset, NumericField, Record};
use crate::data::range::{SliderBounds, derive_bounds};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// The dataset is loaded once before the UI starts and never mutated; every
/// interaction only rewrites the [`FilterSpec`] and recomputes the visible
/// index set.
pub struct AppState {
    /// The process-lifetime dataset.
    pub dataset: Dataset,

    /// Slider bounds per numeric field, derived once from the full dataset.
    pub bounds: BTreeMap<NumericField, SliderBounds>,

    /// Current sidebar selections.
    pub spec: FilterSpec,

    /// Indices of records passing the current filters (cached per frame).
    pub visible: Vec<usize>,
}

impl AppState {
    /// Build the initial state from a freshly loaded dataset: derive slider
    /// bounds and start with an all-pass filter.
    pub fn new(dataset: Dataset) -> Self {
        let bounds: BTreeMap<NumericField, SliderBounds> = NumericField::ALL
            .into_iter()
            .map(|field| {
                let b = derive_bounds(
                    dataset.numeric_column(field),
                    0.0,
                    field.default_max(),
                    field.step(),
                );
                (field, b)
            })
            .collect();

        let spec = FilterSpec::all_pass(&dataset, &bounds);
        let visible = filtered_indices(&dataset, &spec);

        AppState {
            dataset,
            bounds,
            spec,
            visible,
        }
    }

    /// Recompute the visible set after any filter change.
    pub fn refilter(&mut self) {
        self.visible = filtered_indices(&self.dataset, &self.spec);
    }

    /// Toggle a single value in a categorical filter.
    pub fn toggle_filter_value(&mut self, field: CategoricalField, value: &str) {
        let selected = self.spec.categories.entry(field).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values of a categorical filter.
    pub fn select_all(&mut self, field: CategoricalField) {
        if let Some(all_vals) = self.dataset.unique_values.get(&field) {
            self.spec.categories.insert(field, all_vals.clone());
            self.refilter();
        }
    }

    /// Deselect all values of a categorical filter.  Per the pass-through
    /// policy this shows everything again.
    pub fn select_none(&mut self, field: CategoricalField) {
        self.spec.categories.insert(field, Default::default());
        self.refilter();
    }

    /// Update a numeric range, clamped to the derived bounds and kept
    /// non-inverted.
    pub fn set_range(&mut self, field: NumericField, mut lo: f64, mut hi: f64) {
        if let Some(b) = self.bounds.get(&field) {
            lo = lo.clamp(b.min, b.max);
            hi = hi.clamp(b.min, b.max);
        }
        if lo > hi {
            std::mem::swap(&mut lo, &mut hi);
        }
        self.spec.ranges.insert(field, (lo, hi));
        self.refilter();
    }

    /// Iterate the records passing the current filters, in file order.
    pub fn visible_records(&self) -> impl Iterator<Item = &Record> {
        self.visible.iter().map(|&i| &self.dataset.records[i])
    }

    /// The active range for a numeric field, defaulting to the full span.
    pub fn range(&self, field: NumericField) -> (f64, f64) {
        self.spec
            .ranges
            .get(&field)
            .copied()
            .or_else(|| self.bounds.get(&field).map(|b| b.default_range))
            .unwrap_or((0.0, field.default_max()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let rec = |client: &str, service_type: &str, rt: Option<f64>| Record {
            client_id: client.to_string(),
            service_type: service_type.to_string(),
            service_conversion: "Convertido".to_string(),
            client_conversion: String::new(),
            had_response: "Sim".to_string(),
            response_time_hours: rt,
            initial_value: Some(50.0),
            providers_contacted: Some(1),
            checkin: None,
            checkout: None,
        };
        Dataset::from_records(vec![
            rec("c1", "boarding", Some(1.0)),
            rec("c2", "day_care", Some(3.0)),
        ])
    }

    #[test]
    fn initial_state_shows_everything() {
        let state = AppState::new(dataset());
        assert_eq!(state.visible, vec![0, 1]);
    }

    #[test]
    fn toggling_a_value_refilters() {
        let mut state = AppState::new(dataset());
        state.toggle_filter_value(CategoricalField::ServiceType, "day_care");
        assert_eq!(state.visible, vec![0]);
        state.toggle_filter_value(CategoricalField::ServiceType, "day_care");
        assert_eq!(state.visible, vec![0, 1]);
    }

    #[test]
    fn ranges_are_clamped_and_ordered() {
        let mut state = AppState::new(dataset());
        state.set_range(NumericField::ResponseTimeHours, 500.0, -500.0);
        let (lo, hi) = state.range(NumericField::ResponseTimeHours);
        assert!(lo <= hi);
        let b = state.bounds[&NumericField::ResponseTimeHours];
        assert!(lo >= b.min && hi <= b.max);
    }

    #[test]
    fn bounds_are_derived_per_numeric_field() {
        let state = AppState::new(dataset());
        let b = state.bounds[&NumericField::ResponseTimeHours];
        assert_eq!((b.min, b.max), (1.0, 3.0));
        // single-valued column gets widened
        let b = state.bounds[&NumericField::InitialValue];
        assert_eq!((b.min, b.max), (50.0, 60.0));
    }
}
