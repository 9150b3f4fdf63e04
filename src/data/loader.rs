use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal load failures.  Both variants halt the session before the UI starts;
/// a partially loaded dataset is never returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

/// One row as it appears in the file.  Everything is read as text first;
/// numeric and date coercion happens in [`Record`] conversion so that dirty
/// cells degrade to `None` instead of aborting the load.
#[derive(Debug, Deserialize)]
struct RawRow {
    id_cliente: Option<String>,
    tipo_servico: Option<String>,
    status_conversao_servico: Option<String>,
    status_conversao_cliente: Option<String>,
    teve_resposta_formatado: Option<String>,
    tempo_de_resposta_horas: Option<String>,
    valor_inicial: Option<String>,
    quantidade_herois_contatados: Option<String>,
    dt_checkin: Option<String>,
    dt_checkout: Option<String>,
}

impl From<RawRow> for Record {
    fn from(raw: RawRow) -> Self {
        Record {
            client_id: raw.id_cliente.unwrap_or_default(),
            service_type: raw.tipo_servico.unwrap_or_default(),
            service_conversion: raw.status_conversao_servico.unwrap_or_default(),
            client_conversion: raw.status_conversao_cliente.unwrap_or_default(),
            had_response: raw.teve_resposta_formatado.unwrap_or_default(),
            response_time_hours: parse_f64(raw.tempo_de_resposta_horas.as_deref()),
            initial_value: parse_f64(raw.valor_inicial.as_deref()),
            providers_contacted: parse_i64(raw.quantidade_herois_contatados.as_deref()),
            checkin: parse_datetime(raw.dt_checkin.as_deref()),
            checkout: parse_datetime(raw.dt_checkout.as_deref()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the service-request dataset from a CSV file.
///
/// The two date columns are coerced: unparseable timestamps become `None`,
/// never an error.  File-level problems (missing file, malformed CSV) are
/// fatal and reported to the caller.
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        records.push(Record::from(row?));
    }

    let dataset = Dataset::from_records(records);
    log::info!("loaded {} service-request records from {}", dataset.len(), path.display());
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell coercion helpers
// ---------------------------------------------------------------------------

fn parse_f64(cell: Option<&str>) -> Option<f64> {
    let s = cell?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

fn parse_i64(cell: Option<&str>) -> Option<i64> {
    let s = cell?.trim();
    if s.is_empty() {
        return None;
    }
    // Exports sometimes store integer counts as "3.0".
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Accepted timestamp layouts, tried in order.
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
];

fn parse_datetime(cell: Option<&str>) -> Option<NaiveDateTime> {
    let s = cell?.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    // Date-only cells get midnight.
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
}
