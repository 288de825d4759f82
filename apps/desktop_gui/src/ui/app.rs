use std::{collections::HashSet, sync::Arc, time::Duration};

use client_core::{
    render::{
        EMPTY_INVOICES_MESSAGE, EMPTY_PASSENGERS_MESSAGE, HIGH_VALUE_MARKER, NO_SUMMARY_MESSAGE,
    },
    render_invoices, render_passengers, render_summary, Badge, DashboardEvent, HttpRecordService,
    InvoiceView, Pane, PassengerView, RecordSnapshot, SummaryView, ViewSelector,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{Color32, RichText};
use tokio::sync::watch;
use shared::domain::TicketNumber;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{status_line, UiEvent},
        orchestration::dispatch_backend_command,
    },
};

const SUCCESS_COLOR: Color32 = Color32::from_rgb(46, 160, 67);
const PENDING_COLOR: Color32 = Color32::from_rgb(210, 153, 34);
const ERROR_COLOR: Color32 = Color32::from_rgb(218, 54, 51);

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    passengers_rx: watch::Receiver<Arc<RecordSnapshot>>,
    service: Arc<HttpRecordService>,
    selector: ViewSelector,
    search_text: String,
    passengers: PassengerView,
    invoices: InvoiceView,
    summary: SummaryView,
    /// Row checkboxes. Purely visual; nothing reads them.
    flagged: HashSet<TicketNumber>,
    status: String,
}

impl DashboardApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        passengers_rx: watch::Receiver<Arc<RecordSnapshot>>,
        service: Arc<HttpRecordService>,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            passengers_rx,
            service,
            selector: ViewSelector::default(),
            search_text: String::new(),
            passengers: PassengerView::Empty,
            invoices: InvoiceView::Empty,
            summary: SummaryView::NoData,
            flagged: HashSet::new(),
            status: String::new(),
        };
        app.queue(BackendCommand::LoadAll);
        app
    }

    fn queue(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        if self.passengers_rx.has_changed().unwrap_or(false) {
            let snapshot = self.passengers_rx.borrow_and_update().clone();
            self.passengers = render_passengers(&snapshot);
        }
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        let event = match event {
            UiEvent::Dashboard(event) => event,
            UiEvent::Error(message) => {
                self.status = message;
                return;
            }
        };

        if let Some(line) = status_line(&event) {
            self.status = line;
        }
        match event {
            DashboardEvent::PassengersUpdated(snapshot) => {
                self.passengers = render_passengers(&snapshot);
            }
            DashboardEvent::InvoicesUpdated(invoices) => {
                self.invoices = render_invoices(&invoices);
            }
            DashboardEvent::SummaryUpdated(summary) => {
                self.summary = render_summary(summary.as_ref());
            }
            DashboardEvent::PaneChanged(pane) => {
                self.selector.select(pane);
            }
            DashboardEvent::ActionFinished { .. } | DashboardEvent::DownloadAllFinished(_) => {}
        }
    }

    fn absolute_link(&self, link: &str) -> Option<String> {
        absolute_link(&self.service, link)
    }

    fn show_tabs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for pane in Pane::ALL {
                let selected = self.selector.is_visible(pane);
                // Re-selecting the active tab still reloads it.
                if ui.selectable_label(selected, pane.label()).clicked() {
                    self.queue(BackendCommand::SelectPane(pane));
                }
            }
        });
    }

    fn show_passengers(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Search");
            if ui.text_edit_singleline(&mut self.search_text).changed() {
                let text = self.search_text.clone();
                self.queue(BackendCommand::Search(text));
            }
            if ui.button("Download all").clicked() {
                self.queue(BackendCommand::DownloadAll);
            }
        });
        ui.add_space(6.0);

        let PassengerView::Table { counters, rows, .. } = &self.passengers else {
            ui.label(EMPTY_PASSENGERS_MESSAGE);
            return;
        };

        ui.horizontal(|ui| {
            counter_card(ui, "Total", counters.total);
            counter_card(ui, "Pending Downloads", counters.pending_downloads);
            counter_card(ui, "Parsed", counters.parsed);
        });
        ui.add_space(6.0);

        let service = &self.service;
        let flagged_set = &mut self.flagged;
        let mut queued = Vec::new();
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("passenger_grid")
                .striped(true)
                .num_columns(6)
                .show(ui, |ui| {
                    for header in ["Ticket", "Passenger", "Download", "Parse", "Actions", ""] {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for row in rows {
                        ui.label(row.ticket_label());
                        ui.label(&row.name);
                        badge_label(ui, &row.download);
                        badge_label(ui, &row.parse);
                        ui.horizontal(|ui| {
                            if row.actions.download && ui.button("Download").clicked() {
                                queued.push(BackendCommand::Download(row.ticket.clone()));
                            }
                            if row.actions.parse && ui.button("Parse").clicked() {
                                queued.push(BackendCommand::Parse(row.ticket.clone()));
                            }
                            if let Some(link) = row
                                .actions
                                .artifact_link
                                .as_deref()
                                .and_then(|link| absolute_link(service, link))
                            {
                                ui.hyperlink_to("Open PDF", link);
                            }
                        });
                        if row.selectable {
                            let mut flagged = flagged_set.contains(&row.ticket);
                            if ui.checkbox(&mut flagged, "").changed() {
                                toggle(flagged_set, &row.ticket, flagged);
                            }
                        } else {
                            ui.label("");
                        }
                        ui.end_row();
                    }
                });
        });

        for cmd in queued {
            self.queue(cmd);
        }
    }

    fn show_invoices(&self, ui: &mut egui::Ui) {
        let InvoiceView::Table(rows) = &self.invoices else {
            ui.label(EMPTY_INVOICES_MESSAGE);
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("invoice_grid")
                .striped(true)
                .num_columns(8)
                .show(ui, |ui| {
                    for header in [
                        "Invoice", "Date", "Airline", "Amount", "GSTIN", "Confidence", "Passenger",
                        "PDF",
                    ] {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for row in rows {
                        ui.label(&row.invoice_number);
                        ui.label(&row.date);
                        ui.label(&row.airline);
                        ui.horizontal(|ui| {
                            ui.label(&row.amount);
                            if row.high_value {
                                ui.label(RichText::new(HIGH_VALUE_MARKER).color(ERROR_COLOR).strong());
                            }
                        });
                        ui.label(&row.gstin);
                        ui.label(&row.confidence);
                        ui.label(&row.passenger);
                        match row
                            .artifact_link
                            .as_deref()
                            .and_then(|link| self.absolute_link(link))
                        {
                            Some(link) => {
                                ui.hyperlink_to("Open PDF", link);
                            }
                            None => {
                                ui.label("—");
                            }
                        }
                        ui.end_row();
                    }
                });
        });
    }

    fn show_summary(&self, ui: &mut egui::Ui) {
        let SummaryView::Totals {
            carriers,
            high_value_count,
        } = &self.summary
        else {
            ui.label(NO_SUMMARY_MESSAGE);
            return;
        };

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.heading("Airline Totals");
            for line in carriers {
                ui.label(format!(
                    "{}: {} — {} invoices",
                    line.airline, line.total, line.count
                ));
            }
            ui.separator();
            ui.label(format!("High-value invoices (>₹10,000): {high_value_count}"));
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("pane_tabs").show(ctx, |ui| self.show_tabs(ui));
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(&self.status);
        });
        egui::CentralPanel::default().show(ctx, |ui| match self.selector.active() {
            Pane::Passengers => self.show_passengers(ui),
            Pane::Invoices => self.show_invoices(ui),
            Pane::Summary => self.show_summary(ui),
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn absolute_link(service: &HttpRecordService, link: &str) -> Option<String> {
    service.resolve_link(link).ok().map(|url| url.to_string())
}

fn counter_card(ui: &mut egui::Ui, title: &str, value: usize) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.vertical(|ui| {
            ui.label(title);
            ui.heading(value.to_string());
        });
    });
}

fn badge_color(badge: &Badge) -> Color32 {
    match badge {
        Badge::Success => SUCCESS_COLOR,
        Badge::Pending => PENDING_COLOR,
        Badge::Error(_) => ERROR_COLOR,
    }
}

fn badge_label(ui: &mut egui::Ui, badge: &Badge) {
    ui.label(RichText::new(badge.label()).color(badge_color(badge)));
}

fn toggle(set: &mut HashSet<TicketNumber>, ticket: &TicketNumber, on: bool) {
    if on {
        set.insert(ticket.clone());
    } else {
        set.remove(ticket);
    }
}
