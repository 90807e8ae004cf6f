//! # Invoices Tab
//!
//! Invoice table plus the create/edit dialog with its line item editor. The
//! dialog shows a running total using the same rounding rule as the server;
//! the stored total is always the one the server returns.

use eframe::egui;
use egui_extras::DatePickerButton;

use crate::ui::app_state::{DeleteTarget, InvoiceManagerApp};
use crate::ui::forms::InvoiceForm;
use crate::ui::FormAction;

impl InvoiceManagerApp {
    pub fn render_invoices_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Invoices");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Refresh").clicked() {
                    self.refresh_invoices();
                }
                let can_create = !self.organizations.is_empty();
                if ui
                    .add_enabled(can_create, egui::Button::new("New Invoice"))
                    .on_disabled_hover_text("Create an organization first")
                    .clicked()
                {
                    let first = self.organizations.first().map(|organization| organization.id);
                    self.invoice_form = Some(InvoiceForm::new(first));
                }
            });
        });
        ui.separator();

        if self.invoices.is_empty() {
            ui.label("No invoices yet.");
            return;
        }

        let mut edit = None;
        let mut delete = None;

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("invoices_table")
                .striped(true)
                .num_columns(8)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for header in ["Number", "Organization", "Issued", "Due", "Items", "Total", "Notes", ""] {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for invoice in &self.invoices {
                        ui.label(invoice.invoice_number.as_str());
                        ui.label(invoice.organization_name.as_str());
                        ui.label(invoice.issue_date.format("%Y-%m-%d").to_string());
                        ui.label(invoice.due_date.format("%Y-%m-%d").to_string());
                        ui.label(invoice.items.len().to_string());
                        ui.label(format!("{:.2}", invoice.total_amount));
                        ui.label(invoice.notes.as_deref().unwrap_or(""));
                        ui.horizontal(|ui| {
                            if ui.button("Edit").clicked() {
                                edit = Some(invoice.id);
                            }
                            if ui.button("Delete").clicked() {
                                delete = Some(DeleteTarget::Invoice {
                                    id: invoice.id,
                                    number: invoice.invoice_number.clone(),
                                });
                            }
                        });
                        ui.end_row();
                    }
                });
        });

        if let Some(id) = edit {
            self.open_invoice_editor(id);
        }
        if delete.is_some() {
            self.pending_delete = delete;
        }
    }

    pub fn render_invoice_form(&mut self, ctx: &egui::Context) {
        let Some(mut form) = self.invoice_form.take() else {
            return;
        };

        let mut action = FormAction::Editing;
        let selected_name = form
            .organization_id
            .and_then(|id| self.organization_name(id))
            .unwrap_or("Choose...")
            .to_string();

        egui::Window::new(form.title())
            .collapsible(false)
            .resizable(true)
            .default_width(640.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("invoice_header").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
                    ui.label("Organization *");
                    egui::ComboBox::from_id_source("invoice_organization")
                        .selected_text(selected_name)
                        .width(280.0)
                        .show_ui(ui, |ui| {
                            for organization in &self.organizations {
                                ui.selectable_value(&mut form.organization_id, Some(organization.id), organization.name.as_str());
                            }
                        });
                    ui.end_row();

                    ui.label("Invoice number *");
                    ui.add(egui::TextEdit::singleline(&mut form.invoice_number).desired_width(280.0));
                    ui.end_row();

                    ui.label("Issue date");
                    ui.add(DatePickerButton::new(&mut form.issue_date).id_source("invoice_issue_date"));
                    ui.end_row();

                    ui.label("Due date");
                    ui.add(DatePickerButton::new(&mut form.due_date).id_source("invoice_due_date"));
                    ui.end_row();

                    ui.label("Notes");
                    ui.add(egui::TextEdit::multiline(&mut form.notes).desired_width(280.0).desired_rows(2));
                    ui.end_row();
                });

                ui.add_space(8.0);
                ui.separator();
                render_item_rows(ui, &mut form);

                ui.separator();
                ui.horizontal(|ui| {
                    ui.strong(format!("Total: {:.2}", form.running_total()));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Cancel").clicked() {
                            action = FormAction::Cancel;
                        }
                        if ui.button("Save").clicked() {
                            action = FormAction::Save;
                        }
                    });
                });
            });

        match action {
            FormAction::Editing => self.invoice_form = Some(form),
            FormAction::Save => self.save_invoice(form),
            FormAction::Cancel => {}
        }
    }
}

fn render_item_rows(ui: &mut egui::Ui, form: &mut InvoiceForm) {
    let mut remove = None;

    egui::Grid::new("invoice_items").num_columns(5).spacing([8.0, 6.0]).show(ui, |ui| {
        for header in ["Description", "Quantity", "Unit price", "Total", ""] {
            ui.strong(header);
        }
        ui.end_row();

        for (index, row) in form.items.iter_mut().enumerate() {
            ui.add(egui::TextEdit::singleline(&mut row.description).desired_width(240.0));
            ui.add(egui::TextEdit::singleline(&mut row.quantity).desired_width(70.0));
            ui.add(egui::TextEdit::singleline(&mut row.unit_price).desired_width(90.0));
            match row.total() {
                Some(total) => ui.label(format!("{:.2}", total)),
                None => ui.weak("-"),
            };
            if ui.small_button("Remove").clicked() {
                remove = Some(index);
            }
            ui.end_row();
        }
    });

    if let Some(index) = remove {
        form.remove_item(index);
    }
    if ui.button("Add item").clicked() {
        form.add_item();
    }
}
