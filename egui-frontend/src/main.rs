use eframe::egui;
use log::{error, info};

mod api;
mod ui;

use api::ApiClient;
use ui::InvoiceManagerApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    info!("Starting Invoice Manager egui application");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Invoice Manager")
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Invoice Manager",
        options,
        Box::new(|_cc| match ApiClient::from_env() {
            Ok(api) => Ok(Box::new(InvoiceManagerApp::new(api))),
            Err(e) => {
                error!("Failed to create API client: {}", e);
                Err(format!("Failed to create API client: {}", e).into())
            }
        }),
    )
}
