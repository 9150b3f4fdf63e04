use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Status literals – the CSV is the external interface, values kept verbatim
// ---------------------------------------------------------------------------

/// Service-level conversion statuses expected by the per-type proportion chart.
pub const STATUS_CONVERTED: &str = "Convertido";
pub const STATUS_NOT_CONVERTED: &str = "Não Convertido";

/// Client-level status marking a client that converted at least one need.
pub const CLIENT_CONVERTED: &str = "Converteu uma das necessidades";

// ---------------------------------------------------------------------------
// Record – one service request (one row of the source CSV)
// ---------------------------------------------------------------------------

/// A single service-request record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub client_id: String,
    pub service_type: String,
    pub service_conversion: String,
    pub client_conversion: String,
    pub had_response: String,
    /// Response time in hours; missing in the source for unanswered requests.
    pub response_time_hours: Option<f64>,
    /// Initial quoted value of the service.
    pub initial_value: Option<f64>,
    /// Providers contacted by this client (client-level attribute repeated per row).
    pub providers_contacted: Option<i64>,
    pub checkin: Option<NaiveDateTime>,
    pub checkout: Option<NaiveDateTime>,
}

// ---------------------------------------------------------------------------
// Filterable fields
// ---------------------------------------------------------------------------

/// The categorical columns the sidebar can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CategoricalField {
    ServiceType,
    ServiceConversion,
    HadResponse,
    ClientConversion,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::ServiceType,
        CategoricalField::ServiceConversion,
        CategoricalField::HadResponse,
        CategoricalField::ClientConversion,
    ];

    pub fn value<'a>(&self, record: &'a Record) -> &'a str {
        match self {
            CategoricalField::ServiceType => &record.service_type,
            CategoricalField::ServiceConversion => &record.service_conversion,
            CategoricalField::HadResponse => &record.had_response,
            CategoricalField::ClientConversion => &record.client_conversion,
        }
    }

    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            CategoricalField::ServiceType => "Tipo de Serviço",
            CategoricalField::ServiceConversion => "Status de Conversão do Serviço",
            CategoricalField::HadResponse => "Teve Resposta do Herói",
            CategoricalField::ClientConversion => "Status de Conversão do Cliente",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The numeric columns the sidebar can filter on with a range slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumericField {
    ResponseTimeHours,
    InitialValue,
    ProvidersContacted,
}

impl NumericField {
    pub const ALL: [NumericField; 3] = [
        NumericField::ResponseTimeHours,
        NumericField::InitialValue,
        NumericField::ProvidersContacted,
    ];

    pub fn value(&self, record: &Record) -> Option<f64> {
        match self {
            NumericField::ResponseTimeHours => record.response_time_hours,
            NumericField::InitialValue => record.initial_value,
            NumericField::ProvidersContacted => record.providers_contacted.map(|v| v as f64),
        }
    }

    /// Sidebar label.
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::ResponseTimeHours => "Tempo de Resposta (horas)",
            NumericField::InitialValue => "Valor Inicial do Serviço",
            NumericField::ProvidersContacted => "Nº de Heróis Contatados",
        }
    }

    /// Slider step, mirroring the source dashboard's controls.
    pub fn step(&self) -> f64 {
        match self {
            NumericField::ResponseTimeHours => 0.1,
            NumericField::InitialValue => 10.0,
            NumericField::ProvidersContacted => 1.0,
        }
    }

    /// Fallback upper bound used when the column is entirely missing.
    pub fn default_max(&self) -> f64 {
        match self {
            NumericField::ResponseTimeHours => 1000.0,
            NumericField::InitialValue => 10_000.0,
            NumericField::ProvidersContacted => 10.0,
        }
    }

    /// Integer-valued controls get truncated bounds.
    pub fn is_integer(&self) -> bool {
        matches!(self, NumericField::ProvidersContacted)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed unique values per categorical column.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records (rows), in file order.
    pub records: Vec<Record>,
    /// For each categorical field the sorted set of unique values.
    pub unique_values: BTreeMap<CategoricalField, BTreeSet<String>>,
}

impl Dataset {
    /// Build the unique-value index from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<CategoricalField, BTreeSet<String>> = BTreeMap::new();
        for field in CategoricalField::ALL {
            let values = records
                .iter()
                .map(|r| field.value(r).to_string())
                .collect::<BTreeSet<String>>();
            unique_values.insert(field, values);
        }
        Dataset {
            records,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate one numeric column.
    pub fn numeric_column(&self, field: NumericField) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(move |r| field.value(r))
    }
}
