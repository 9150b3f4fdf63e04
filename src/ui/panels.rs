use eframe::egui::{self, RichText, ScrollArea, Slider, Ui};

use crate::data::model::{CategoricalField, NumericField};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the sidebar: one multi-select per categorical field, one range
/// control per numeric field.  Every change refilters immediately.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros de Análise");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for field in CategoricalField::ALL {
                category_filter(ui, state, field);
            }

            ui.separator();

            for field in NumericField::ALL {
                range_filter(ui, state, field);
            }
        });
}

/// Collapsible multi-select with All/None shortcuts, one checkbox per unique
/// value of the column.
fn category_filter(ui: &mut Ui, state: &mut AppState, field: CategoricalField) {
    // Clone what we need so we can mutate state inside the loop.
    let Some(all_values) = state.dataset.unique_values.get(&field).cloned() else {
        return;
    };

    let n_selected = state
        .spec
        .categories
        .get(&field)
        .map_or(0, |selected| selected.len());
    let header_text = format!("{}  ({n_selected}/{})", field.label(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(field.label())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Todos").clicked() {
                    state.select_all(field);
                }
                if ui.small_button("Nenhum").clicked() {
                    state.select_none(field);
                }
            });

            for value in &all_values {
                let label = if value.is_empty() { "(em branco)" } else { value };
                let mut checked = state
                    .spec
                    .categories
                    .get(&field)
                    .is_some_and(|selected| selected.contains(value));
                if ui.checkbox(&mut checked, label).changed() {
                    state.toggle_filter_value(field, value);
                }
            }
        });
}

/// Paired min/max sliders clamped to the derived bounds.  Integer-valued
/// fields get truncated integer controls.
fn range_filter(ui: &mut Ui, state: &mut AppState, field: NumericField) {
    let Some(bounds) = state.bounds.get(&field).copied() else {
        return;
    };
    let (lo, hi) = state.range(field);

    ui.strong(field.label());

    if field.is_integer() {
        let (min, max, _) = bounds.as_integer();
        let mut ilo = lo as i64;
        let mut ihi = hi as i64;
        let changed = ui
            .add(Slider::new(&mut ilo, min..=max).text("mín"))
            .changed()
            | ui.add(Slider::new(&mut ihi, min..=max).text("máx")).changed();
        if changed {
            state.set_range(field, ilo as f64, ihi as f64);
        }
    } else {
        let mut flo = lo;
        let mut fhi = hi;
        let changed = ui
            .add(
                Slider::new(&mut flo, bounds.min..=bounds.max)
                    .step_by(field.step())
                    .text("mín"),
            )
            .changed()
            | ui.add(
                Slider::new(&mut fhi, bounds.min..=bounds.max)
                    .step_by(field.step())
                    .text("máx"),
            )
            .changed();
        if changed {
            state.set_range(field, flo, fhi);
        }
    }

    ui.add_space(6.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar: title and record counts.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Carnaval 2025: Análise de Conversão e Respostas");
        ui.separator();
        ui.label(format!(
            "{} registros carregados, {} visíveis",
            state.dataset.len(),
            state.visible.len()
        ));
    });
}
