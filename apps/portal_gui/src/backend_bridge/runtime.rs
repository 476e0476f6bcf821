//! Backend worker: owns the portal controller on a tokio runtime and turns
//! queued commands into UI events.

use std::{sync::Arc, thread};

use client_core::{HttpPortalApi, PortalController};
use crossbeam_channel::{Receiver, Sender};
use tracing::{error, info};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{UiError, UiErrorContext, UiEvent},
};

pub fn launch(server_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::WorkerStartup,
                    format!("failed to build the backend runtime: {err}"),
                )));
                error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            info!(server_url, "backend worker ready");
            let api = Arc::new(HttpPortalApi::new(server_url));
            let controller = PortalController::new(api);
            let _ = ui_tx.try_send(UiEvent::WorkerReady);

            // Initial population of the saved list, as on page load.
            send_list(&controller, &ui_tx).await;

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&controller, &ui_tx, cmd).await;
            }
        });
    });
}

async fn handle_command(
    controller: &PortalController,
    ui_tx: &Sender<UiEvent>,
    cmd: BackendCommand,
) {
    tracing::debug!(command = cmd.name(), "handling ui->backend command");
    match cmd {
        BackendCommand::OpenForm { kind } => {
            controller.open_form(kind);
        }
        BackendCommand::ReturnToSelection => {
            let event = match controller.return_to_selection().await {
                Ok(list) => UiEvent::ListLoaded(list),
                Err(err) => UiEvent::ListFailed(err.user_message()),
            };
            let _ = ui_tx.try_send(event);
        }
        BackendCommand::Process { kind, input } => {
            let event = match controller.process(kind, &input).await {
                Ok(view) => UiEvent::SuggestionReady { kind, view },
                Err(err) => UiEvent::Error(UiError::from_portal(UiErrorContext::Process, &err)),
            };
            let _ = ui_tx.try_send(event);
        }
        BackendCommand::Save => {
            match controller.save().await {
                Ok(id) => {
                    let _ = ui_tx.try_send(UiEvent::Saved { id });
                    send_list(controller, ui_tx).await;
                }
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_portal(
                        UiErrorContext::Save,
                        &err,
                    )));
                }
            };
        }
        BackendCommand::Export { dest } => {
            let event = match controller.export().await {
                Ok(exported) => match tokio::fs::write(&dest, &exported.bytes).await {
                    Ok(()) => UiEvent::Exported { path: dest },
                    Err(err) => UiEvent::Error(UiError::from_message(
                        UiErrorContext::Export,
                        format!("could not write {}: {err}", dest.display()),
                    )),
                },
                Err(err) => UiEvent::Error(UiError::from_portal(UiErrorContext::Export, &err)),
            };
            let _ = ui_tx.try_send(event);
        }
        BackendCommand::RefreshList => {
            send_list(controller, ui_tx).await;
        }
        BackendCommand::View { id } => {
            let event = match controller.view(id).await {
                Ok(loaded) => UiEvent::DocumentLoaded {
                    kind: loaded.kind,
                    view: loaded.view,
                    input_placeholder: loaded.input_placeholder,
                },
                Err(err) => UiEvent::Error(UiError::from_portal(UiErrorContext::View, &err)),
            };
            let _ = ui_tx.try_send(event);
        }
        BackendCommand::RequestDelete { id } => {
            controller.request_delete(id);
            let _ = ui_tx.try_send(UiEvent::DeleteArmed { id });
        }
        BackendCommand::CancelDelete => {
            controller.cancel_delete();
            let _ = ui_tx.try_send(UiEvent::DeleteCancelled);
        }
        BackendCommand::ConfirmDelete => {
            match controller.confirm_delete().await {
                Ok(id) => {
                    let _ = ui_tx.try_send(UiEvent::Deleted { id });
                    send_list(controller, ui_tx).await;
                }
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_portal(
                        UiErrorContext::Delete,
                        &err,
                    )));
                }
            };
        }
    }
}

async fn send_list(controller: &PortalController, ui_tx: &Sender<UiEvent>) {
    let event = match controller.refresh_list().await {
        Ok(list) => UiEvent::ListLoaded(list),
        Err(err) => UiEvent::ListFailed(err.user_message()),
    };
    let _ = ui_tx.try_send(event);
}
