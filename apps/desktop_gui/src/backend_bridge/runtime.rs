//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread, time::Duration};

use client_core::{UserApi, UserApiClient};
use crossbeam_channel::{Receiver, Sender};
use shared::{config::Settings, domain::UserId, view::ListViewState};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{Notification, UiError, UiErrorContext, UiEvent};
use crate::controller::interaction::{UserController, ViewSink};

/// Forwards controller output to the UI thread.
pub struct ChannelViewSink {
    ui_tx: Sender<UiEvent>,
}

impl ChannelViewSink {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    fn send(&self, event: UiEvent) {
        if self.ui_tx.send(event).is_err() {
            tracing::debug!("ui event receiver dropped; discarding event");
        }
    }
}

impl ViewSink for ChannelViewSink {
    fn show_list(&self, state: ListViewState) {
        self.send(UiEvent::ListUpdated(state));
    }

    fn notify(&self, notification: Notification) {
        self.send(UiEvent::Notify(notification));
    }

    fn edit_completed(&self, user_id: &UserId) {
        self.send(UiEvent::UserUpdated(user_id.clone()));
    }
}

/// Spawns the backend worker thread. Commands are executed one at a time in
/// arrival order until the command sender is dropped.
pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let timeout = settings.request_timeout_secs.map(Duration::from_secs);
        let api: Arc<dyn UserApi> =
            match UserApiClient::with_timeout(&settings.api_base_url, timeout) {
                Ok(client) => Arc::new(client),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        err.to_string(),
                    )));
                    let _ = ui_tx.try_send(UiEvent::ListUpdated(ListViewState::Failed(
                        shared::view::LOAD_FAILED_MESSAGE.to_string(),
                    )));
                    tracing::error!("failed to build user api client: {err}");
                    return;
                }
            };

        let view = Arc::new(ChannelViewSink::new(ui_tx));
        let mut controller = UserController::new(api, view, settings.refresh_policy);
        tracing::info!(
            base_url = %settings.api_base_url,
            refresh = ?settings.refresh_policy,
            "backend worker ready"
        );

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "executing backend command");
                controller.execute(cmd).await;
            }
        });
        tracing::info!("backend worker stopped");
    });
}
