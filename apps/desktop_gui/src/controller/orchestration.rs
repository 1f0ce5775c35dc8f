//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

/// Queues `cmd` without blocking the UI thread. A full or closed queue is
/// reported back as a [`UiError`] instead.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(UiError::from_message(
            UiErrorContext::CommandQueue,
            "UI command queue is full; please retry",
        )),
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(UiError::from_message(
                UiErrorContext::CommandQueue,
                "Backend command processor disconnected (possible startup/runtime failure); restart the app",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::controller::events::UiErrorCategory;

    #[test]
    fn queues_commands_in_order() {
        let (tx, rx) = bounded(4);
        dispatch_backend_command(&tx, BackendCommand::LoadUsers).expect("queued");
        assert_eq!(rx.try_recv().ok(), Some(BackendCommand::LoadUsers));
    }

    #[test]
    fn full_queue_is_reported_as_transport_error() {
        let (tx, _rx) = bounded(1);
        dispatch_backend_command(&tx, BackendCommand::LoadUsers).expect("first");
        let err = dispatch_backend_command(&tx, BackendCommand::LoadUsers).expect_err("full");
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.context(), UiErrorContext::CommandQueue);
    }

    #[test]
    fn disconnected_backend_is_reported() {
        let (tx, rx) = bounded(1);
        drop(rx);
        let err = dispatch_backend_command(&tx, BackendCommand::LoadUsers).expect_err("closed");
        assert!(err.message().contains("disconnected"));
    }
}
