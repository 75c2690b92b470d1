//! Routes terminal commands to the controller. This layer is the "caller"
//! that keeps buttons disabled while busy: the controller itself never
//! refuses work.

use std::sync::Arc;

use client_core::{HeroViewController, HeroesView, PendingRefresh, PendingSubmit};
use tokio::sync::mpsc::{error::TrySendError, Sender};

use crate::commands::ViewCommand;

pub const BUSY_NOTICE: &str = "Operación en curso; espera a que termine";
pub const FORM_CLOSED_NOTICE: &str = "Abre el formulario con 'new' primero";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    OperationFinished { command: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// State changed synchronously; re-render now.
    Applied,
    /// A network operation was started; a [`UiEvent`] follows on completion.
    Started,
    Rejected(&'static str),
    Help,
    Quit,
}

#[derive(Debug)]
enum Operation {
    Refresh(PendingRefresh),
    Submit(PendingSubmit),
}

/// Network commands are marked busy on the controller before this returns,
/// so a command dispatched right after a `Started` one already sees the
/// disabled view.
pub async fn dispatch_view_command(
    controller: &Arc<HeroViewController>,
    command: ViewCommand,
    events: &Sender<UiEvent>,
) -> Dispatch {
    let cmd_name = command.name();
    let view = HeroesView::from_state(&controller.snapshot().await);

    let outcome = match command {
        ViewCommand::ToggleForm if view.toggle_form.disabled => Dispatch::Rejected(BUSY_NOTICE),
        ViewCommand::ToggleForm => {
            controller.toggle_form_visibility().await;
            Dispatch::Applied
        }
        ViewCommand::Refresh if view.refresh.disabled => Dispatch::Rejected(BUSY_NOTICE),
        ViewCommand::Refresh => {
            let pending = controller.begin_refresh().await;
            spawn_operation(controller, Operation::Refresh(pending), cmd_name, events);
            Dispatch::Started
        }
        ViewCommand::SetField { field, value } => match &view.form {
            None => Dispatch::Rejected(FORM_CLOSED_NOTICE),
            Some(form) if form.inputs_disabled => Dispatch::Rejected(BUSY_NOTICE),
            Some(_) => {
                controller.update_draft_field(field, &value).await;
                Dispatch::Applied
            }
        },
        ViewCommand::Submit => match &view.form {
            None => Dispatch::Rejected(FORM_CLOSED_NOTICE),
            Some(form) if form.inputs_disabled => Dispatch::Rejected(BUSY_NOTICE),
            Some(_) => {
                let pending = controller.begin_submit().await;
                spawn_operation(controller, Operation::Submit(pending), cmd_name, events);
                Dispatch::Started
            }
        },
        ViewCommand::Help => Dispatch::Help,
        ViewCommand::Quit => Dispatch::Quit,
    };

    match &outcome {
        Dispatch::Rejected(reason) => {
            tracing::debug!(command = cmd_name, reason, "rejected ui command")
        }
        _ => tracing::debug!(command = cmd_name, "dispatched ui command"),
    }
    outcome
}

fn spawn_operation(
    controller: &Arc<HeroViewController>,
    operation: Operation,
    command: &'static str,
    events: &Sender<UiEvent>,
) {
    let controller = Arc::clone(controller);
    let events = events.clone();
    tokio::spawn(async move {
        // Failures are already on the controller's error banner.
        let _ = match operation {
            Operation::Refresh(pending) => controller.finish_refresh(pending).await,
            Operation::Submit(pending) => controller.finish_submit(pending).await,
        };
        match events.try_send(UiEvent::OperationFinished { command }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(command, "ui event queue is full; skipping re-render");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(command, "ui event queue closed");
            }
        }
    });
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
