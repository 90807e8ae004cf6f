//! # App Coordinator Module
//!
//! The eframe update loop: check server health on the first frame, then draw the
//! tab bar, the active tab and any open dialogs.

use eframe::egui;
use std::time::Duration;

use crate::ui::app_state::{ConnectionState, InvoiceManagerApp, MainTab};

impl eframe::App for InvoiceManagerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.connection == ConnectionState::Checking {
            // Draw the "connecting" screen before blocking on the health check
            if ctx.frame_nr() > 0 {
                self.load_initial_data();
            }
            ctx.request_repaint();
        }

        if self.connection != ConnectionState::Connected {
            egui::CentralPanel::default().show(ctx, |ui| self.render_connection_screen(ui));
            return;
        }

        if self.success_message.is_some() {
            ctx.request_repaint_after(Duration::from_secs(5));
        }

        egui::TopBottomPanel::top("main_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.current_tab, MainTab::Organizations, "Organizations");
                ui.selectable_value(&mut self.current_tab, MainTab::Invoices, "Invoices");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.api.base_url());
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(message) = &self.success_message {
                    ui.colored_label(egui::Color32::from_rgb(40, 140, 60), message.as_str());
                    if ui.small_button("x").clicked() {
                        self.clear_messages();
                    }
                } else {
                    ui.label(format!(
                        "{} organizations, {} invoices",
                        self.organizations.len(),
                        self.invoices.len()
                    ));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.current_tab {
            MainTab::Organizations => self.render_organizations_tab(ui),
            MainTab::Invoices => self.render_invoices_tab(ui),
        });

        self.render_modals(ctx);
    }
}
