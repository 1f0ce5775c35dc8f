//! Backend side of the interaction flow: runs API calls for queued commands
//! and pushes the results to whatever view it was constructed with.

use std::sync::Arc;

use client_core::UserApi;
use shared::{
    config::RefreshPolicy,
    domain::UserId,
    protocol::UserDraft,
    view::{render_users, ListViewState, LOAD_FAILED_MESSAGE},
};
use tracing::{info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::Notification;

pub const CREATED_MESSAGE: &str = "User created successfully!";
pub const UPDATED_MESSAGE: &str = "User updated successfully!";
pub const DELETED_MESSAGE: &str = "User deleted successfully!";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create user. Please try again.";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update user. Please try again.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete user. Please try again.";

/// Output handles the controller renders into.
pub trait ViewSink: Send + Sync {
    fn show_list(&self, state: ListViewState);
    fn notify(&self, notification: Notification);
    fn edit_completed(&self, user_id: &UserId);
}

pub struct UserController {
    api: Arc<dyn UserApi>,
    view: Arc<dyn ViewSink>,
    policy: RefreshPolicy,
    rendered: ListViewState,
}

impl UserController {
    pub fn new(api: Arc<dyn UserApi>, view: Arc<dyn ViewSink>, policy: RefreshPolicy) -> Self {
        Self {
            api,
            view,
            policy,
            rendered: ListViewState::Loading,
        }
    }

    pub async fn execute(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::LoadUsers => self.load_users().await,
            BackendCommand::CreateUser { draft } => self.create_user(draft).await,
            BackendCommand::UpdateUser { user_id, draft } => {
                self.update_user(user_id, draft).await
            }
            BackendCommand::DeleteUser { user_id } => self.delete_user(user_id).await,
        }
    }

    pub async fn load_users(&mut self) {
        self.show(ListViewState::Loading);
        let state = match self.api.list().await {
            Ok(response) => render_users(&response),
            Err(err) => {
                warn!("failed to load users: {err}");
                ListViewState::Failed(LOAD_FAILED_MESSAGE.to_string())
            }
        };
        self.show(state);
    }

    pub async fn create_user(&mut self, draft: UserDraft) {
        match self.api.create(&draft).await {
            Ok(record) => {
                info!(username = %draft.username, "user created");
                self.view.notify(Notification::success(CREATED_MESSAGE));
                self.refresh(|list| list.apply_created(record)).await;
            }
            Err(err) => {
                warn!("failed to create user: {err}");
                self.show(ListViewState::Failed(CREATE_FAILED_MESSAGE.to_string()));
                self.view.notify(Notification::error(CREATE_FAILED_MESSAGE));
            }
        }
    }

    pub async fn update_user(&mut self, user_id: UserId, draft: UserDraft) {
        match self.api.update(&user_id, &draft).await {
            Ok(record) => {
                info!(%user_id, "user updated");
                self.view.notify(Notification::success(UPDATED_MESSAGE));
                self.view.edit_completed(&user_id);
                self.refresh(|list| list.apply_updated(&user_id, record))
                    .await;
            }
            Err(err) => {
                warn!(%user_id, "failed to update user: {err}");
                self.view.notify(Notification::error(UPDATE_FAILED_MESSAGE));
            }
        }
    }

    pub async fn delete_user(&mut self, user_id: UserId) {
        match self.api.delete(&user_id).await {
            Ok(()) => {
                info!(%user_id, "user deleted");
                self.view.notify(Notification::success(DELETED_MESSAGE));
                self.refresh(|list| list.apply_deleted(&user_id)).await;
            }
            Err(err) => {
                warn!(%user_id, "failed to delete user: {err}");
                self.view.notify(Notification::error(DELETE_FAILED_MESSAGE));
            }
        }
    }

    /// Brings the list up to date after an acknowledged mutation. Falls back
    /// to a reload when the response cannot be spliced into what is shown.
    async fn refresh(&mut self, splice: impl FnOnce(&mut ListViewState) -> bool) {
        if self.policy == RefreshPolicy::ApplyResponse {
            let mut next = self.rendered.clone();
            if splice(&mut next) {
                self.show(next);
                return;
            }
        }
        self.load_users().await;
    }

    fn show(&mut self, state: ListViewState) {
        self.rendered = state.clone();
        self.view.show_list(state);
    }
}

#[cfg(test)]
#[path = "tests/interaction_tests.rs"]
mod tests;
