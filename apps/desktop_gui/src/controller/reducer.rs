//! UI state and the pure transitions that turn user actions into backend
//! commands. Nothing here touches the network or egui.

use std::time::{Duration, Instant};

use shared::{domain::UserId, protocol::UserDraft, view::ListViewState};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{Notification, UiError, UiErrorContext, UiEvent};

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this user?";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub password_visible: bool,
}

impl CreateForm {
    fn draft(&self) -> UserDraft {
        UserDraft::from_form(
            &self.username,
            &self.email,
            &self.password,
            &self.first_name,
            &self.last_name,
        )
    }

    /// Clears the typed values. Password visibility is a view preference and
    /// survives the reset.
    fn reset(&mut self) {
        *self = Self {
            password_visible: self.password_visible,
            ..Self::default()
        };
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditModal {
    pub user_id: UserId,
    pub form: EditForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Cancel,
    Backdrop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Reload,
    TogglePasswordVisibility,
    SubmitCreate,
    OpenEdit(UserId),
    CloseEdit(CloseReason),
    SubmitEdit,
    RequestDelete(UserId),
    ConfirmDelete(bool),
    DismissNotification,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveNotification {
    pub notification: Notification,
    pub shown_at: Instant,
}

#[derive(Debug)]
pub struct ConsoleState {
    pub list: ListViewState,
    pub create_form: CreateForm,
    /// At most one modal exists; opening again replaces it.
    pub edit_modal: Option<EditModal>,
    pub pending_delete: Option<UserId>,
    pub notification: Option<ActiveNotification>,
    pub status: Option<String>,
    notification_ttl: Duration,
}

impl ConsoleState {
    pub fn new(notification_ttl: Duration) -> Self {
        Self {
            list: ListViewState::Loading,
            create_form: CreateForm::default(),
            edit_modal: None,
            pending_delete: None,
            notification: None,
            status: None,
            notification_ttl,
        }
    }

    pub fn apply(&mut self, action: UiAction, now: Instant) -> Vec<BackendCommand> {
        match action {
            UiAction::Reload => vec![BackendCommand::LoadUsers],
            UiAction::TogglePasswordVisibility => {
                self.create_form.password_visible = !self.create_form.password_visible;
                Vec::new()
            }
            UiAction::SubmitCreate => self.submit_create(now),
            UiAction::OpenEdit(user_id) => {
                self.open_edit(user_id);
                Vec::new()
            }
            UiAction::CloseEdit(reason) => {
                tracing::debug!(?reason, "closing edit modal");
                self.edit_modal = None;
                Vec::new()
            }
            UiAction::SubmitEdit => self.submit_edit(),
            UiAction::RequestDelete(user_id) => {
                self.pending_delete = Some(user_id);
                Vec::new()
            }
            UiAction::ConfirmDelete(confirmed) => match self.pending_delete.take() {
                Some(user_id) if confirmed => vec![BackendCommand::DeleteUser { user_id }],
                _ => Vec::new(),
            },
            UiAction::DismissNotification => {
                self.notification = None;
                Vec::new()
            }
        }
    }

    pub fn handle_event(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::ListUpdated(list) => self.list = list,
            UiEvent::UserUpdated(user_id) => {
                if self
                    .edit_modal
                    .as_ref()
                    .is_some_and(|modal| modal.user_id.same_record(&user_id))
                {
                    self.edit_modal = None;
                }
            }
            UiEvent::Notify(notification) => self.notify(notification, now),
            UiEvent::Error(err) => self.report(err, now),
        }
    }

    /// Surfaces a failure that never reached the backend, e.g. a full
    /// command queue.
    pub fn report(&mut self, err: UiError, now: Instant) {
        tracing::warn!(
            category = ?err.category(),
            context = ?err.context(),
            "{}",
            err.message()
        );
        self.status = Some(err.status_line());
        self.notify(Notification::error(err.message()), now);
    }

    /// Drops the banner once it has been visible for the configured time.
    pub fn expire_notification(&mut self, now: Instant) {
        if self
            .notification
            .as_ref()
            .is_some_and(|active| now.saturating_duration_since(active.shown_at) >= self.notification_ttl)
        {
            self.notification = None;
        }
    }

    fn notify(&mut self, notification: Notification, now: Instant) {
        self.notification = Some(ActiveNotification {
            notification,
            shown_at: now,
        });
    }

    fn submit_create(&mut self, now: Instant) -> Vec<BackendCommand> {
        let draft = self.create_form.draft();
        let missing = draft.missing_required();
        if !missing.is_empty() {
            self.report(
                UiError::from_message(
                    UiErrorContext::CreateForm,
                    format!("{} required", missing.join(" and ")),
                ),
                now,
            );
            return Vec::new();
        }
        self.create_form.reset();
        vec![BackendCommand::CreateUser { draft }]
    }

    fn open_edit(&mut self, user_id: UserId) {
        let form = self
            .list
            .find(&user_id)
            .map(|card| EditForm {
                username: card.record.username.clone().unwrap_or_default(),
                email: card.record.email.clone().unwrap_or_default(),
                password: String::new(),
                first_name: card.record.present_first_name().unwrap_or_default().to_string(),
                last_name: card.record.present_last_name().unwrap_or_default().to_string(),
            })
            .unwrap_or_default();
        self.edit_modal = Some(EditModal { user_id, form });
    }

    fn submit_edit(&mut self) -> Vec<BackendCommand> {
        let Some(modal) = self.edit_modal.as_ref() else {
            return Vec::new();
        };
        let form = &modal.form;
        let draft = UserDraft::from_form(
            &form.username,
            &form.email,
            &form.password,
            &form.first_name,
            &form.last_name,
        );
        vec![BackendCommand::UpdateUser {
            user_id: modal.user_id.clone(),
            draft,
        }]
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
