use std::path::Path;

use carnaval_dash::app::CarnavalApp;
use carnaval_dash::data::loader;
use eframe::egui;

/// The dataset is consumed from a fixed relative location next to the binary.
const DATA_FILE: &str = "dados_carnaval_2025.csv";

fn main() -> eframe::Result {
    env_logger::init();

    // A missing or malformed file is fatal: no partial dataset, no UI.
    let dataset = match loader::load_csv(Path::new(DATA_FILE)) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("failed to load '{DATA_FILE}': {e}");
            eprintln!(
                "Erro ao carregar '{DATA_FILE}': {e}\n\
                 Certifique-se de que o arquivo está na mesma pasta do executável."
            );
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Carnaval 2025 – Análise de Conversão e Respostas",
        options,
        Box::new(|_cc| Ok(Box::new(CarnavalApp::new(dataset)))),
    )
}
