//! Backend commands queued from UI to backend worker.

use shared::{domain::UserId, protocol::UserDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadUsers,
    CreateUser { draft: UserDraft },
    UpdateUser { user_id: UserId, draft: UserDraft },
    DeleteUser { user_id: UserId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadUsers => "load_users",
            Self::CreateUser { .. } => "create_user",
            Self::UpdateUser { .. } => "update_user",
            Self::DeleteUser { .. } => "delete_user",
        }
    }
}
