// ---------------------------------------------------------------------------
// Slider bounds derived from a (possibly dirty) numeric column
// ---------------------------------------------------------------------------

/// Safe bounds for a range slider.  Invariant: `min < max` always, even for
/// all-missing or single-valued columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderBounds {
    pub min: f64,
    pub max: f64,
    /// Initial slider position: the full observed range (no filtering).
    pub default_range: (f64, f64),
}

impl SliderBounds {
    /// Bounds for an integer-valued control.  Truncation, not rounding,
    /// applied to each endpoint independently.
    pub fn as_integer(&self) -> (i64, i64, (i64, i64)) {
        (
            self.min as i64,
            self.max as i64,
            (self.default_range.0 as i64, self.default_range.1 as i64),
        )
    }
}

/// Derive slider bounds from a numeric column.
///
/// Missing values are dropped first.  An entirely missing column yields the
/// caller-supplied defaults.  A single-valued column gets its upper bound
/// widened by `step` so the slider always has a usable span.
pub fn derive_bounds(
    values: impl IntoIterator<Item = Option<f64>>,
    default_min: f64,
    default_max: f64,
    step: f64,
) -> SliderBounds {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;

    for v in values.into_iter().flatten() {
        if v.is_nan() {
            continue;
        }
        seen = true;
        min = min.min(v);
        max = max.max(v);
    }

    if !seen {
        return SliderBounds {
            min: default_min,
            max: default_max,
            default_range: (default_min, default_max),
        };
    }

    if min == max {
        max += step;
    }

    SliderBounds {
        min,
        max,
        default_range: (min, max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_range_becomes_bounds_and_default() {
        let b = derive_bounds([Some(2.0), Some(8.5), None, Some(4.0)], 0.0, 1000.0, 0.1);
        assert_eq!(b.min, 2.0);
        assert_eq!(b.max, 8.5);
        assert_eq!(b.default_range, (2.0, 8.5));
    }

    #[test]
    fn all_missing_falls_back_to_defaults() {
        let b = derive_bounds([None, None, None], 0.0, 1000.0, 0.1);
        assert_eq!(b.min, 0.0);
        assert_eq!(b.max, 1000.0);
        assert_eq!(b.default_range, (0.0, 1000.0));
        assert!(b.min < b.max);
    }

    #[test]
    fn empty_column_falls_back_to_defaults() {
        let b = derive_bounds([], 5.0, 10.0, 1.0);
        assert_eq!(b.min, 5.0);
        assert_eq!(b.max, 10.0);
    }

    #[test]
    fn single_value_is_widened_by_step() {
        let b = derive_bounds([Some(5.0), Some(5.0), Some(5.0)], 0.0, 1000.0, 0.1);
        assert_eq!(b.min, 5.0);
        assert_eq!(b.max, 5.1);
        assert_eq!(b.default_range, (5.0, 5.1));
        assert!(b.min < b.max);
    }

    #[test]
    fn nan_values_are_treated_as_missing() {
        let b = derive_bounds([Some(f64::NAN), Some(3.0)], 0.0, 100.0, 1.0);
        assert_eq!(b.min, 3.0);
        assert_eq!(b.max, 4.0); // single survivor, widened
    }

    #[test]
    fn integer_bounds_truncate_each_endpoint() {
        let b = SliderBounds {
            min: 1.9,
            max: 7.8,
            default_range: (1.9, 7.8),
        };
        assert_eq!(b.as_integer(), (1, 7, (1, 7)));
    }
}
