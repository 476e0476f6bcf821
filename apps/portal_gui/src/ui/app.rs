//! The three-panel portal UI: document-type selection with the saved list,
//! and one form panel per document kind. All document state lives in the
//! backend worker's controller; this type only mirrors what events report.

use client_core::{export_filename, Block, SavedList, SuggestionView, EMPTY_LIST_MESSAGE};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use eframe::egui;
use shared::domain::{DocumentId, DocumentKind};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::UiEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiPanel {
    Selection,
    Form(DocumentKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded(SavedList),
    Failed(String),
}

pub struct PortalGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    panel: UiPanel,
    notes_input: String,
    gherkin_input: String,
    suggestion: Option<SuggestionView>,
    actions_enabled: bool,
    list_state: ListState,
    busy: Option<&'static str>,
    status: String,
    blocking_message: Option<String>,
    pending_delete: Option<DocumentId>,
}

impl PortalGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            panel: UiPanel::Selection,
            notes_input: String::new(),
            gherkin_input: String::new(),
            suggestion: None,
            actions_enabled: false,
            list_state: ListState::Loading,
            busy: None,
            status: "Starting backend worker...".to_string(),
            blocking_message: None,
            pending_delete: None,
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::WorkerReady => {
                self.status = "Connected to backend worker".to_string();
            }
            UiEvent::SuggestionReady { kind, view } => {
                self.busy = None;
                self.panel = UiPanel::Form(kind);
                self.suggestion = Some(view);
                self.actions_enabled = true;
                self.status = "Suggestion ready".to_string();
            }
            UiEvent::DocumentLoaded {
                kind,
                view,
                input_placeholder,
            } => {
                self.busy = None;
                self.panel = UiPanel::Form(kind);
                self.suggestion = Some(view);
                self.actions_enabled = true;
                match kind {
                    DocumentKind::UserStory => self.notes_input = input_placeholder.to_string(),
                    DocumentKind::AcceptanceTerm => {
                        self.gherkin_input = input_placeholder.to_string()
                    }
                }
                self.status = format!("Loaded saved {}", kind.form_title());
            }
            UiEvent::Saved { id } => {
                self.busy = None;
                self.blocking_message = Some(format!("Document saved successfully (id {id})."));
            }
            UiEvent::Exported { path } => {
                self.busy = None;
                self.blocking_message =
                    Some(format!("Document exported to {}.", path.display()));
            }
            UiEvent::ListLoaded(list) => {
                self.busy = None;
                self.list_state = ListState::Loaded(list);
            }
            UiEvent::ListFailed(message) => {
                self.busy = None;
                self.list_state = ListState::Failed(message);
            }
            UiEvent::DeleteArmed { id } => {
                self.pending_delete = Some(id);
            }
            UiEvent::DeleteCancelled => {
                self.pending_delete = None;
            }
            UiEvent::Deleted { id } => {
                self.busy = None;
                self.pending_delete = None;
                self.blocking_message = Some(format!("Document {id} deleted."));
            }
            UiEvent::Error(err) => {
                self.busy = None;
                self.pending_delete = None;
                self.blocking_message = Some(err.blocking_text());
            }
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand, busy_label: Option<&'static str>) {
        let name = cmd.name();
        match self.cmd_tx.try_send(cmd) {
            Ok(()) => {
                tracing::debug!(command = name, "queued ui->backend command");
                if let Some(label) = busy_label {
                    self.busy = Some(label);
                }
            }
            Err(TrySendError::Full(_)) => {
                self.status = "Command queue is full; please retry".to_string();
            }
            Err(TrySendError::Disconnected(_)) => {
                self.status = "Backend worker disconnected; restart the app".to_string();
            }
        }
    }

    fn clear_form_state(&mut self) {
        self.notes_input.clear();
        self.gherkin_input.clear();
        self.suggestion = None;
        self.actions_enabled = false;
    }

    fn selection_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Create a document");
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for kind in [DocumentKind::UserStory, DocumentKind::AcceptanceTerm] {
                let button = egui::Button::new(kind.form_title()).min_size(egui::vec2(180.0, 40.0));
                if ui.add_enabled(self.busy.is_none(), button).clicked() {
                    self.panel = UiPanel::Form(kind);
                    self.clear_form_state();
                    self.dispatch(BackendCommand::OpenForm { kind }, None);
                }
            }
        });

        ui.add_space(12.0);
        ui.separator();
        ui.horizontal(|ui| {
            ui.heading("Saved documents");
            if ui
                .add_enabled(self.busy.is_none(), egui::Button::new("Refresh"))
                .clicked()
            {
                self.dispatch(BackendCommand::RefreshList, Some("refreshing list"));
            }
        });
        ui.add_space(4.0);

        match self.list_state.clone() {
            ListState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading saved documents...");
                });
            }
            ListState::Failed(message) => {
                ui.colored_label(
                    ui.visuals().error_fg_color,
                    format!("Failed to load documents: {message}"),
                );
            }
            ListState::Loaded(list) => {
                if list.is_empty() {
                    ui.label(egui::RichText::new(EMPTY_LIST_MESSAGE).italics());
                } else {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for entry in &list.entries {
                            ui.horizontal(|ui| {
                                if ui
                                    .add_enabled(self.busy.is_none(), egui::Button::new("View"))
                                    .clicked()
                                {
                                    self.dispatch(
                                        BackendCommand::View { id: entry.id },
                                        Some("loading document"),
                                    );
                                }
                                if ui
                                    .add_enabled(self.busy.is_none(), egui::Button::new("Delete"))
                                    .clicked()
                                {
                                    self.dispatch(
                                        BackendCommand::RequestDelete { id: entry.id },
                                        None,
                                    );
                                }
                                ui.label(&entry.label);
                            });
                        }
                    });
                }
            }
        }
    }

    fn form_panel(&mut self, ui: &mut egui::Ui, kind: DocumentKind) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.busy.is_none(), egui::Button::new("< Back"))
                .clicked()
            {
                self.panel = UiPanel::Selection;
                self.clear_form_state();
                self.dispatch(BackendCommand::ReturnToSelection, Some("refreshing list"));
            }
            ui.heading(kind.form_title());
        });
        ui.add_space(8.0);

        let (input_label, hint) = match kind {
            DocumentKind::UserStory => (
                "Improvement request notes",
                "Describe the requested improvement...",
            ),
            DocumentKind::AcceptanceTerm => (
                "Gherkin scenarios",
                "Scenario: ...\n  Given ...\n  When ...\n  Then ...",
            ),
        };
        ui.label(input_label);
        let input = match kind {
            DocumentKind::UserStory => &mut self.notes_input,
            DocumentKind::AcceptanceTerm => &mut self.gherkin_input,
        };
        ui.add(
            egui::TextEdit::multiline(input)
                .desired_rows(6)
                .desired_width(f32::INFINITY)
                .hint_text(hint),
        );

        ui.add_space(4.0);
        if ui
            .add_enabled(self.busy.is_none(), egui::Button::new("Generate suggestion"))
            .clicked()
        {
            let input = match kind {
                DocumentKind::UserStory => self.notes_input.clone(),
                DocumentKind::AcceptanceTerm => self.gherkin_input.clone(),
            };
            self.dispatch(
                BackendCommand::Process { kind, input },
                Some("processing"),
            );
        }

        if let Some(view) = self.suggestion.clone() {
            ui.add_space(8.0);
            ui.separator();
            egui::ScrollArea::vertical()
                .max_height(ui.available_height() - 48.0)
                .show(ui, |ui| {
                    render_suggestion(ui, &view);
                });

            // Save/export only become available once a suggestion rendered.
            if self.actions_enabled {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(self.busy.is_none(), egui::Button::new("Save"))
                        .clicked()
                    {
                        self.dispatch(BackendCommand::Save, Some("saving"));
                    }
                    if ui
                        .add_enabled(self.busy.is_none(), egui::Button::new("Export .docx"))
                        .clicked()
                    {
                        let dest = rfd::FileDialog::new()
                            .set_file_name(export_filename(kind))
                            .save_file();
                        if let Some(dest) = dest {
                            self.dispatch(BackendCommand::Export { dest }, Some("exporting"));
                        }
                    }
                });
            }
        }
    }

    fn blocking_message_window(&mut self, ctx: &egui::Context) {
        let Some(message) = self.blocking_message.clone() else {
            return;
        };
        egui::Window::new("Portal")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(4.0);
                if ui.button("OK").clicked() {
                    self.blocking_message = None;
                }
            });
    }

    fn delete_confirmation_window(&mut self, ctx: &egui::Context) {
        let Some(id) = self.pending_delete else {
            return;
        };
        egui::Window::new("Confirm deletion")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Delete document {id}? This cannot be undone."
                ));
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        self.dispatch(BackendCommand::ConfirmDelete, Some("deleting"));
                    }
                    if ui.button("Cancel").clicked() {
                        self.dispatch(BackendCommand::CancelDelete, None);
                    }
                });
            });
    }
}

impl eframe::App for PortalGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }

        egui::TopBottomPanel::top("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Document Portal");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(busy) = self.busy {
                        ui.spinner();
                        ui.label(busy);
                    } else {
                        ui.label(&self.status);
                    }
                });
            });
        });

        self.blocking_message_window(ctx);
        self.delete_confirmation_window(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.panel {
            UiPanel::Selection => self.selection_panel(ui),
            UiPanel::Form(kind) => self.form_panel(ui, kind),
        });

        if self.busy.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

fn render_suggestion(ui: &mut egui::Ui, view: &SuggestionView) {
    ui.heading(&view.heading);
    ui.add_space(4.0);
    for block in &view.blocks {
        match block {
            Block::Field { label, value } => {
                ui.horizontal_wrapped(|ui| {
                    ui.strong(format!("{label}:"));
                    ui.label(value);
                });
            }
            Block::Narrative { label, lines } => {
                ui.strong(format!("{label}:"));
                for line in lines {
                    ui.label(line);
                }
                ui.add_space(4.0);
            }
            Block::Criteria { label, items } => {
                ui.strong(format!("{label}:"));
                for item in items {
                    ui.group(|ui| {
                        ui.strong(&item.scenario);
                        ui.horizontal_wrapped(|ui| {
                            ui.strong("Given");
                            ui.label(&item.given);
                        });
                        ui.horizontal_wrapped(|ui| {
                            ui.strong("When");
                            ui.label(&item.when);
                        });
                        ui.horizontal_wrapped(|ui| {
                            ui.strong("Then");
                            ui.label(&item.then);
                        });
                    });
                }
                ui.add_space(4.0);
            }
            Block::Preformatted { label, text } => {
                ui.strong(format!("{label}:"));
                ui.label(egui::RichText::new(text).monospace());
                ui.add_space(4.0);
            }
            Block::Table {
                title,
                headers,
                rows,
            } => {
                ui.strong(title);
                egui::Grid::new(title.as_str())
                    .striped(true)
                    .show(ui, |ui| {
                        for header in headers {
                            ui.strong(header);
                        }
                        ui.end_row();
                        for row in rows {
                            for cell in row {
                                if cell.preformatted {
                                    ui.label(egui::RichText::new(&cell.text).monospace());
                                } else {
                                    ui.label(&cell.text);
                                }
                            }
                            ui.end_row();
                        }
                    });
                ui.add_space(8.0);
            }
        }
    }
}
