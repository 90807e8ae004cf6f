//! # Organizations Tab
//!
//! Organization table plus the create/edit dialog.

use eframe::egui;

use crate::ui::app_state::{DeleteTarget, InvoiceManagerApp};
use crate::ui::forms::OrganizationForm;
use crate::ui::FormAction;

impl InvoiceManagerApp {
    pub fn render_organizations_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Organizations");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Refresh").clicked() {
                    self.refresh_organizations();
                }
                if ui.button("New Organization").clicked() {
                    self.organization_form = Some(OrganizationForm::new());
                }
            });
        });
        ui.separator();

        if self.organizations.is_empty() {
            ui.label("No organizations yet.");
            return;
        }

        let mut edit = None;
        let mut delete = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("organizations_table")
                .striped(true)
                .num_columns(6)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for header in ["ID", "Name", "Fiscal code", "Address", "Created", ""] {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for organization in &self.organizations {
                        ui.label(organization.id.to_string());
                        ui.label(organization.name.as_str());
                        ui.label(organization.fiscal_code.as_deref().unwrap_or("-"));
                        ui.label(organization.address.as_deref().unwrap_or("-"));
                        ui.label(organization.created_at.format("%Y-%m-%d").to_string());
                        ui.horizontal(|ui| {
                            if ui.button("Edit").clicked() {
                                edit = Some(organization.id);
                            }
                            if ui.button("Delete").clicked() {
                                delete = Some(DeleteTarget::Organization {
                                    id: organization.id,
                                    name: organization.name.clone(),
                                });
                            }
                        });
                        ui.end_row();
                    }
                });
        });

        if let Some(id) = edit {
            self.open_organization_editor(id);
        }
        if delete.is_some() {
            self.pending_delete = delete;
        }
    }

    pub fn render_organization_form(&mut self, ctx: &egui::Context) {
        let Some(mut form) = self.organization_form.take() else {
            return;
        };

        let mut action = FormAction::Editing;
        egui::Window::new(form.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("organization_form").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
                    ui.label("Name *");
                    ui.add(egui::TextEdit::singleline(&mut form.name).desired_width(280.0));
                    ui.end_row();

                    ui.label("Fiscal code");
                    ui.add(egui::TextEdit::singleline(&mut form.fiscal_code).desired_width(280.0));
                    ui.end_row();

                    ui.label("Address");
                    ui.add(egui::TextEdit::multiline(&mut form.address).desired_width(280.0).desired_rows(3));
                    ui.end_row();
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        action = FormAction::Save;
                    }
                    if ui.button("Cancel").clicked() {
                        action = FormAction::Cancel;
                    }
                });
            });

        match action {
            FormAction::Editing => self.organization_form = Some(form),
            FormAction::Save => self.save_organization(form),
            FormAction::Cancel => {}
        }
    }
}
