//! # Modals
//!
//! Delete confirmation, error dialog and the connection failure screen.

use eframe::egui;

use crate::ui::app_state::{ConnectionState, InvoiceManagerApp};

impl InvoiceManagerApp {
    pub fn render_modals(&mut self, ctx: &egui::Context) {
        self.render_organization_form(ctx);
        self.render_invoice_form(ctx);
        self.render_delete_confirmation(ctx);
        self.render_error_dialog(ctx);
    }

    fn render_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(target) = self.pending_delete.clone() else {
            return;
        };

        let mut confirmed = false;
        let mut cancelled = false;
        egui::Window::new("Confirm delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(target.prompt());
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        confirmed = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancelled = true;
                    }
                });
            });

        if confirmed {
            self.pending_delete = None;
            self.delete_confirmed(target);
        } else if cancelled {
            self.pending_delete = None;
        }
    }

    fn render_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error_message.clone() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(200, 40, 40), message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.error_message = None;
        }
    }

    /// Full-window screen shown while the server cannot be reached
    pub fn render_connection_screen(&mut self, ui: &mut egui::Ui) {
        let connection = self.connection.clone();
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            match &connection {
                ConnectionState::Checking => {
                    ui.spinner();
                    ui.label(format!("Connecting to {}...", self.api.base_url()));
                }
                ConnectionState::Failed(reason) => {
                    ui.heading("Cannot reach the invoice server");
                    ui.add_space(8.0);
                    ui.colored_label(egui::Color32::from_rgb(200, 40, 40), reason.as_str());
                    ui.add_space(16.0);
                    if ui.button("Retry").clicked() {
                        self.connection = ConnectionState::Checking;
                    }
                }
                ConnectionState::Connected => {}
            }
        });
    }
}
