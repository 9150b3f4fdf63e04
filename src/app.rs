use eframe::egui;

use crate::color::StatusColors;
use crate::data::model::{CategoricalField, Dataset};
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CarnavalApp {
    pub state: AppState,
    /// Colours for service-conversion statuses, fixed at load so chart series
    /// keep their colour across re-filtering.
    service_colors: StatusColors,
    /// Colours for client-conversion statuses.
    client_colors: StatusColors,
}

impl CarnavalApp {
    pub fn new(dataset: Dataset) -> Self {
        let status_colors = |field: CategoricalField| {
            let labels = dataset
                .unique_values
                .get(&field)
                .map(|values| values.iter().map(String::as_str).collect::<Vec<_>>())
                .unwrap_or_default();
            StatusColors::new(labels)
        };

        let service_colors = status_colors(CategoricalField::ServiceConversion);
        let client_colors = status_colors(CategoricalField::ClientConversion);

        CarnavalApp {
            state: AppState::new(dataset),
            service_colors,
            client_colors,
        }
    }
}

impl eframe::App for CarnavalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and counts ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPI, charts, preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            charts::central_panel(ui, &self.state, &self.service_colors, &self.client_colors);
        });
    }
}
