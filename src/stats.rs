use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::{
    CLIENT_CONVERTED, Record, STATUS_CONVERTED, STATUS_NOT_CONVERTED,
};

// ---------------------------------------------------------------------------
// Conversion KPI
// ---------------------------------------------------------------------------

/// Client-level conversion rate over the filtered set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionKpi {
    pub total_clients: usize,
    pub converted_clients: usize,
    /// Percentage in [0, 100]; exactly 0.0 when there are no clients.
    pub rate_pct: f64,
}

/// Count distinct clients and distinct converted clients.
///
/// A client converts when at least one of its records carries the
/// "converted one of the needs" status.
pub fn conversion_kpi<'a>(records: impl IntoIterator<Item = &'a Record>) -> ConversionKpi {
    let mut clients: BTreeSet<&str> = BTreeSet::new();
    let mut converted: BTreeSet<&str> = BTreeSet::new();
    for r in records {
        clients.insert(&r.client_id);
        if r.client_conversion == CLIENT_CONVERTED {
            converted.insert(&r.client_id);
        }
    }

    let total_clients = clients.len();
    let converted_clients = converted.len();
    let rate_pct = if total_clients > 0 {
        converted_clients as f64 / total_clients as f64 * 100.0
    } else {
        0.0
    };
    ConversionKpi {
        total_clients,
        converted_clients,
        rate_pct,
    }
}

// ---------------------------------------------------------------------------
// Conversion proportion per service type
// ---------------------------------------------------------------------------

/// One grouped-bar row: the normalized frequency of the two expected
/// conversion statuses for a service type.  Both columns are always present;
/// a status that never occurred contributes 0.0, keeping chart series stable
/// across re-filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceTypeConversion {
    pub service_type: String,
    pub converted: f64,
    pub not_converted: f64,
}

/// Normalized per-type status frequencies, sorted by service type.
pub fn conversion_by_service_type<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> Vec<ServiceTypeConversion> {
    // service type → (total rows, rows per status)
    let mut counts: BTreeMap<&str, (usize, BTreeMap<&str, usize>)> = BTreeMap::new();
    for r in records {
        let entry = counts.entry(&r.service_type).or_default();
        entry.0 += 1;
        *entry.1.entry(&r.service_conversion).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(service_type, (total, by_status))| {
            let proportion = |status: &str| {
                by_status.get(status).copied().unwrap_or(0) as f64 / total as f64
            };
            ServiceTypeConversion {
                service_type: service_type.to_string(),
                converted: proportion(STATUS_CONVERTED),
                not_converted: proportion(STATUS_NOT_CONVERTED),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Per-status bar heights over a shared binning.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub label: String,
    pub counts: Vec<usize>,
}

/// Chart-ready histogram: equal-width bins starting at `start`, one count
/// series per status value.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub bin_count: usize,
    pub series: Vec<HistogramSeries>,
}

impl Histogram {
    /// Bin values grouped by a status label.  `bin_count` must be > 0.
    fn bin(values: &[(f64, &str)], bin_count: usize) -> Self {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &(v, _) in values {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if values.is_empty() {
            lo = 0.0;
            hi = 0.0;
        }

        let span = hi - lo;
        // Degenerate span still needs a positive width so indices stay finite.
        let bin_width = if span > 0.0 { span / bin_count as f64 } else { 1.0 };

        // Preserve first-seen label order so chart colors stay stable.
        let mut order: Vec<&str> = Vec::new();
        let mut counts: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for &(v, label) in values {
            if !counts.contains_key(label) {
                order.push(label);
            }
            let series = counts.entry(label).or_insert_with(|| vec![0; bin_count]);
            let idx = (((v - lo) / bin_width) as usize).min(bin_count - 1);
            series[idx] += 1;
        }

        Histogram {
            start: lo,
            bin_width,
            bin_count,
            series: order
                .into_iter()
                .map(|label| HistogramSeries {
                    label: label.to_string(),
                    counts: counts.remove(label).unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Center of bin `i`, for bar placement.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }
}

pub const MAX_RESPONSE_TIME_BINS: usize = 50;
pub const MIN_PROVIDER_BINS: usize = 5;

/// Bin count for the response-time histogram, scaled by how much of the data
/// range the active slider covers and capped at 50.  A zero-width (or
/// inverted) active range falls back to the cap instead of dividing by zero.
pub fn response_time_bin_count(max_value: f64, active_range: (f64, f64)) -> usize {
    let width = active_range.1 - active_range.0;
    if width > 0.0 {
        let scaled = (max_value / width * MAX_RESPONSE_TIME_BINS as f64) as usize + 1;
        scaled.min(MAX_RESPONSE_TIME_BINS)
    } else {
        MAX_RESPONSE_TIME_BINS
    }
}

/// Response-time distribution split by service conversion status.
///
/// Returns `None` when every response time is missing, which callers render
/// as the "insufficient data" notice for this chart only.
pub fn response_time_histogram<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    active_range: (f64, f64),
) -> Option<Histogram> {
    let values: Vec<(f64, &str)> = records
        .into_iter()
        .filter_map(|r| {
            r.response_time_hours
                .map(|v| (v, r.service_conversion.as_str()))
        })
        .collect();
    if values.is_empty() {
        return None;
    }

    let max_value = values.iter().map(|&(v, _)| v).fold(f64::NEG_INFINITY, f64::max);
    let bins = response_time_bin_count(max_value, active_range);
    Some(Histogram::bin(&values, bins))
}

/// Providers-contacted distribution split by client conversion status.
///
/// The field is client-level, so the records are first de-duplicated down to
/// distinct (client, providers, status) triples to avoid counting a client
/// once per service row.  Returns `None` only when the projection is empty;
/// an all-missing column still yields a histogram with the fallback bin
/// count of 5 and zero counts.
pub fn providers_histogram<'a>(records: impl IntoIterator<Item = &'a Record>) -> Option<Histogram> {
    let projection: BTreeSet<(&str, Option<i64>, &str)> = records
        .into_iter()
        .map(|r| {
            (
                r.client_id.as_str(),
                r.providers_contacted,
                r.client_conversion.as_str(),
            )
        })
        .collect();
    if projection.is_empty() {
        return None;
    }

    let values: Vec<(f64, &str)> = projection
        .iter()
        .filter_map(|&(_, providers, status)| providers.map(|p| (p as f64, status)))
        .collect();

    let bins = values
        .iter()
        .map(|&(v, _)| v as usize)
        .max()
        .map_or(MIN_PROVIDER_BINS, |m| m.max(MIN_PROVIDER_BINS));

    Some(Histogram::bin(&values, bins))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(
        client: &str,
        service_type: &str,
        service_conversion: &str,
        client_conversion: &str,
        response_time: Option<f64>,
        providers: Option<i64>,
    ) -> Record {
        Record {
            client_id: client.to_string(),
            service_type: service_type.to_string(),
            service_conversion: service_conversion.to_string(),
            client_conversion: client_conversion.to_string(),
            had_response: "Sim".to_string(),
            response_time_hours: response_time,
            initial_value: None,
            providers_contacted: providers,
            checkin: None,
            checkout: None,
        }
    }

    #[test]
    fn kpi_counts_distinct_clients() {
        // 3 clients, 2 converted (c1 appears twice and counts once)
        let records = vec![
            rec("c1", "boarding", STATUS_CONVERTED, CLIENT_CONVERTED, None, None),
            rec("c1", "day_care", STATUS_NOT_CONVERTED, CLIENT_CONVERTED, None, None),
            rec("c2", "boarding", STATUS_CONVERTED, CLIENT_CONVERTED, None, None),
            rec("c3", "boarding", STATUS_NOT_CONVERTED, "Não converteu", None, None),
        ];
        let kpi = conversion_kpi(&records);
        assert_eq!(kpi.total_clients, 3);
        assert_eq!(kpi.converted_clients, 2);
        assert!((kpi.rate_pct - 66.666_666).abs() < 0.01);
    }

    #[test]
    fn kpi_is_zero_for_empty_input() {
        let kpi = conversion_kpi(&[]);
        assert_eq!(kpi.total_clients, 0);
        assert_eq!(kpi.rate_pct, 0.0);
        assert!(!kpi.rate_pct.is_nan());
    }

    #[test]
    fn proportions_sum_to_one_per_service_type() {
        let records = vec![
            rec("c1", "boarding", STATUS_CONVERTED, "", None, None),
            rec("c2", "boarding", STATUS_NOT_CONVERTED, "", None, None),
            rec("c3", "boarding", STATUS_CONVERTED, "", None, None),
            rec("c4", "day_care", STATUS_NOT_CONVERTED, "", None, None),
        ];
        let table = conversion_by_service_type(&records);
        assert_eq!(table.len(), 2);
        for row in &table {
            let sum = row.converted + row.not_converted;
            assert!((0.0..=1.0).contains(&row.converted));
            assert!((0.0..=1.0).contains(&row.not_converted));
            assert!((sum - 1.0).abs() < 1e-9, "{}: {sum}", row.service_type);
        }
        assert!((table[0].converted - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn missing_status_column_is_zero_filled() {
        let records = vec![
            rec("c1", "walking", STATUS_CONVERTED, "", None, None),
            rec("c2", "walking", STATUS_CONVERTED, "", None, None),
        ];
        let table = conversion_by_service_type(&records);
        assert_eq!(table[0].converted, 1.0);
        assert_eq!(table[0].not_converted, 0.0);
    }

    #[test]
    fn zero_width_active_range_falls_back_to_cap() {
        assert_eq!(response_time_bin_count(12.0, (3.0, 3.0)), 50);
        assert_eq!(response_time_bin_count(12.0, (5.0, 3.0)), 50);
    }

    #[test]
    fn bin_count_is_capped_at_fifty() {
        assert_eq!(response_time_bin_count(1000.0, (0.0, 1.0)), 50);
    }

    #[test]
    fn narrow_focus_gets_fewer_bins() {
        // max 10, active width 25 → 10/25*50 + 1 = 21
        assert_eq!(response_time_bin_count(10.0, (0.0, 25.0)), 21);
    }

    #[test]
    fn response_histogram_is_none_when_all_missing() {
        let records = vec![rec("c1", "boarding", STATUS_CONVERTED, "", None, None)];
        assert!(response_time_histogram(&records, (0.0, 10.0)).is_none());
    }

    #[test]
    fn response_histogram_counts_every_value() {
        let records = vec![
            rec("c1", "boarding", STATUS_CONVERTED, "", Some(1.0), None),
            rec("c2", "boarding", STATUS_CONVERTED, "", Some(2.0), None),
            rec("c3", "boarding", STATUS_NOT_CONVERTED, "", Some(9.0), None),
        ];
        let hist = response_time_histogram(&records, (0.0, 10.0)).unwrap();
        let total: usize = hist.series.iter().flat_map(|s| s.counts.iter()).sum();
        assert_eq!(total, 3);
        assert_eq!(hist.series.len(), 2);
    }

    #[test]
    fn providers_histogram_deduplicates_clients() {
        // c1 has three service rows but one provider count: one observation
        let records = vec![
            rec("c1", "boarding", STATUS_CONVERTED, CLIENT_CONVERTED, None, Some(4)),
            rec("c1", "day_care", STATUS_CONVERTED, CLIENT_CONVERTED, None, Some(4)),
            rec("c1", "walking", STATUS_CONVERTED, CLIENT_CONVERTED, None, Some(4)),
            rec("c2", "boarding", STATUS_CONVERTED, "Não converteu", None, Some(1)),
        ];
        let hist = providers_histogram(&records).unwrap();
        let total: usize = hist.series.iter().flat_map(|s| s.counts.iter()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn providers_histogram_all_missing_falls_back_to_five_bins() {
        let records = vec![
            rec("c1", "boarding", STATUS_CONVERTED, "", None, None),
            rec("c2", "boarding", STATUS_CONVERTED, "", None, None),
        ];
        let hist = providers_histogram(&records).unwrap();
        assert_eq!(hist.bin_count, 5);
        assert!(hist.series.is_empty());
    }

    #[test]
    fn providers_bin_count_tracks_observed_maximum() {
        let records = vec![
            rec("c1", "boarding", STATUS_CONVERTED, "", None, Some(12)),
            rec("c2", "boarding", STATUS_CONVERTED, "", None, Some(2)),
        ];
        let hist = providers_histogram(&records).unwrap();
        assert_eq!(hist.bin_count, 12);
    }
}
