use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::StatusColors;
use crate::data::model::{NumericField, Record, STATUS_CONVERTED, STATUS_NOT_CONVERTED};
use crate::state::AppState;
use crate::stats::{self, Histogram};

/// Rows shown in the raw-data preview.
const PREVIEW_ROWS: usize = 10;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Central panel – KPI, charts, raw-data preview
// ---------------------------------------------------------------------------

/// Render the dashboard body for the current filtered view.
///
/// An empty filtered set short-circuits into a notice; otherwise each section
/// aggregates independently, so one chart falling back to its "insufficient
/// data" notice never hides the others.
pub fn central_panel(
    ui: &mut Ui,
    state: &AppState,
    service_colors: &StatusColors,
    client_colors: &StatusColors,
) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.visible.is_empty() {
                warning(
                    ui,
                    "Nenhum dado encontrado com os filtros selecionados. \
                     Por favor, ajuste os filtros na barra lateral.",
                );
                return;
            }

            kpi_section(ui, state);
            ui.separator();
            conversion_by_type_chart(ui, state, service_colors);
            ui.separator();
            response_time_chart(ui, state, service_colors);
            ui.separator();
            providers_chart(ui, state, client_colors);
            ui.separator();
            preview_table(ui, state);
        });
}

fn warning(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).color(Color32::YELLOW));
}

// ---------------------------------------------------------------------------
// KPI
// ---------------------------------------------------------------------------

fn kpi_section(ui: &mut Ui, state: &AppState) {
    let kpi = stats::conversion_kpi(state.visible_records());

    ui.heading("Visão Geral da Conversão");
    ui.label(
        RichText::new(format!("{:.2}%", kpi.rate_pct))
            .size(28.0)
            .strong(),
    );
    ui.label("Taxa de Conversão de Clientes (com filtros)");
    ui.label(format!(
        "Total de clientes com serviços no Carnaval (com filtros): {}",
        kpi.total_clients
    ));
    ui.label(format!(
        "Clientes que converteram pelo menos uma necessidade (com filtros): {}",
        kpi.converted_clients
    ));
}

// ---------------------------------------------------------------------------
// Conversion proportion per service type (grouped bars)
// ---------------------------------------------------------------------------

fn conversion_by_type_chart(ui: &mut Ui, state: &AppState, colors: &StatusColors) {
    ui.strong("Conversão por Tipo de Serviço (Serviço Individual)");

    let table = stats::conversion_by_service_type(state.visible_records());
    if table.is_empty() {
        warning(
            ui,
            "Dados insuficientes para plotar a Conversão por Tipo de Serviço \
             com os filtros aplicados.",
        );
        return;
    }

    let half_width = 0.35;
    let converted: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(i, row)| Bar::new(i as f64 - half_width / 2.0, row.converted).width(half_width))
        .collect();
    let not_converted: Vec<Bar> = table
        .iter()
        .enumerate()
        .map(|(i, row)| Bar::new(i as f64 + half_width / 2.0, row.not_converted).width(half_width))
        .collect();

    let labels: Vec<String> = table.into_iter().map(|row| row.service_type).collect();

    Plot::new("conversion_by_type")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .y_axis_label("Proporção")
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if i >= 0.0 && (mark.value - i).abs() < 1e-6 {
                labels.get(i as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(converted)
                    .name(STATUS_CONVERTED)
                    .color(colors.color_for(STATUS_CONVERTED)),
            );
            plot_ui.bar_chart(
                BarChart::new(not_converted)
                    .name(STATUS_NOT_CONVERTED)
                    .color(colors.color_for(STATUS_NOT_CONVERTED)),
            );
        });
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

fn response_time_chart(ui: &mut Ui, state: &AppState, colors: &StatusColors) {
    ui.strong("Distribuição do Tempo de Resposta (Horas)");

    let active_range = state.range(NumericField::ResponseTimeHours);
    match stats::response_time_histogram(state.visible_records(), active_range) {
        Some(hist) => histogram_plot(
            ui,
            "response_time_hist",
            "Tempo de Resposta (horas)",
            &hist,
            colors,
        ),
        None => warning(
            ui,
            "Dados insuficientes para plotar a Distribuição do Tempo de Resposta \
             com os filtros aplicados.",
        ),
    }
}

fn providers_chart(ui: &mut Ui, state: &AppState, colors: &StatusColors) {
    ui.strong("Número de Heróis Contatados por Cliente vs. Conversão");

    match stats::providers_histogram(state.visible_records()) {
        Some(hist) => histogram_plot(
            ui,
            "providers_hist",
            "Nº de Heróis Contatados",
            &hist,
            colors,
        ),
        None => warning(
            ui,
            "Dados de 'quantidade_herois_contatados' não disponíveis ou inválidos \
             para plotar o histograma com os filtros aplicados.",
        ),
    }
}

/// Stacked per-status bars over the histogram's shared binning.
fn histogram_plot(ui: &mut Ui, id: &str, x_label: &str, hist: &Histogram, colors: &StatusColors) {
    let mut base = vec![0.0f64; hist.bin_count];
    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.series.len());

    for series in &hist.series {
        let bars: Vec<Bar> = series
            .counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, &count)| {
                Bar::new(hist.bin_center(i), count as f64)
                    .width(hist.bin_width * 0.95)
                    .base_offset(base[i])
            })
            .collect();
        for (i, &count) in series.counts.iter().enumerate() {
            base[i] += count as f64;
        }
        charts.push(
            BarChart::new(bars)
                .name(&series.label)
                .color(colors.color_for(&series.label)),
        );
    }

    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(x_label.to_string())
        .y_axis_label("Contagem")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Raw-data preview
// ---------------------------------------------------------------------------

const PREVIEW_COLUMNS: [&str; 10] = [
    "id_cliente",
    "tipo_servico",
    "status_conversao_servico",
    "status_conversao_cliente",
    "teve_resposta_formatado",
    "tempo_de_resposta_horas",
    "valor_inicial",
    "quantidade_herois_contatados",
    "dt_checkin",
    "dt_checkout",
];

fn preview_table(ui: &mut Ui, state: &AppState) {
    ui.strong("Dados Brutos (Amostra com Filtros Aplicados)");

    let rows: Vec<&Record> = state.visible_records().take(PREVIEW_ROWS).collect();

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().resizable(true), PREVIEW_COLUMNS.len())
        .header(20.0, |mut header| {
            for title in PREVIEW_COLUMNS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for record in rows {
                body.row(18.0, |mut row| {
                    let cells = [
                        record.client_id.clone(),
                        record.service_type.clone(),
                        record.service_conversion.clone(),
                        record.client_conversion.clone(),
                        record.had_response.clone(),
                        fmt_f64(record.response_time_hours),
                        fmt_f64(record.initial_value),
                        fmt_i64(record.providers_contacted),
                        fmt_datetime(record.checkin),
                        fmt_datetime(record.checkout),
                    ];
                    for cell in cells {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

fn fmt_f64(value: Option<f64>) -> String {
    value.map_or_else(|| "–".to_string(), |v| format!("{v:.2}"))
}

fn fmt_i64(value: Option<i64>) -> String {
    value.map_or_else(|| "–".to_string(), |v| v.to_string())
}

fn fmt_datetime(value: Option<chrono::NaiveDateTime>) -> String {
    value.map_or_else(
        || "–".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
    )
}
