//! List view model: turns API responses into cards and placeholder states.

use std::fmt::Write as _;

use crate::{
    domain::{normalize, DisplayUser, UserId, UserRecord},
    protocol::UserListResponse,
};

pub const LOADING_PLACEHOLDER: &str = "Loading users...";
pub const EMPTY_PLACEHOLDER: &str = "No users found";
pub const LOAD_FAILED_MESSAGE: &str = "Error loading users. Please try again.";

/// One rendered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub user: DisplayUser,
    pub record: UserRecord,
}

impl UserCard {
    pub fn new(record: UserRecord) -> Self {
        Self {
            user: normalize(&record),
            record,
        }
    }

    /// `None` when the API sent neither `id` nor `_id`; such cards cannot be
    /// edited or deleted.
    pub fn user_id(&self) -> Option<&UserId> {
        self.record.user_id()
    }

    pub fn title(&self) -> String {
        format!(
            "{} {} (@{})",
            self.user.first_name, self.user.last_name, self.user.username
        )
    }

    pub fn email_line(&self) -> String {
        format!("Email: {}", self.user.email)
    }

    pub fn id_line(&self) -> String {
        format!("ID: {}", self.user.id)
    }
}

/// Everything the list container can show. Each render replaces the whole
/// state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListViewState {
    #[default]
    Loading,
    Empty,
    Failed(String),
    Cards(Vec<UserCard>),
}

/// Builds one card per record in API order, or the empty placeholder when
/// there are none.
pub fn render_users(response: &UserListResponse) -> ListViewState {
    let records = response.records();
    if records.is_empty() {
        return ListViewState::Empty;
    }
    ListViewState::Cards(records.iter().cloned().map(UserCard::new).collect())
}

impl ListViewState {
    /// Text shown instead of cards, if any.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Loading => Some(LOADING_PLACEHOLDER),
            Self::Empty => Some(EMPTY_PLACEHOLDER),
            Self::Failed(message) => Some(message),
            Self::Cards(_) => None,
        }
    }

    pub fn cards(&self) -> &[UserCard] {
        match self {
            Self::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn find(&self, id: &UserId) -> Option<&UserCard> {
        self.cards()
            .iter()
            .find(|card| card.user_id().is_some_and(|card_id| card_id.same_record(id)))
    }

    /// Appends a freshly created record. Returns `false` when the current
    /// state does not reflect a loaded list, or the reply carried no id, and a
    /// reload is needed instead.
    pub fn apply_created(&mut self, record: UserRecord) -> bool {
        if record.user_id().is_none() {
            return false;
        }
        match self {
            Self::Cards(cards) => {
                cards.push(UserCard::new(record));
                true
            }
            Self::Empty => {
                *self = Self::Cards(vec![UserCard::new(record)]);
                true
            }
            Self::Loading | Self::Failed(_) => false,
        }
    }

    /// Replaces the card for `id` in place. A reply with nothing to show
    /// leaves the card alone and asks for a reload.
    pub fn apply_updated(&mut self, id: &UserId, mut record: UserRecord) -> bool {
        if !record.has_display_fields() {
            return false;
        }
        let Self::Cards(cards) = self else {
            return false;
        };
        let Some(card) = cards
            .iter_mut()
            .find(|card| card.user_id().is_some_and(|card_id| card_id.same_record(id)))
        else {
            return false;
        };
        if record.user_id().is_none() {
            record.id = Some(id.clone());
        }
        *card = UserCard::new(record);
        true
    }

    pub fn apply_deleted(&mut self, id: &UserId) -> bool {
        let Self::Cards(cards) = self else {
            return false;
        };
        let before = cards.len();
        cards.retain(|card| !card.user_id().is_some_and(|card_id| card_id.same_record(id)));
        if cards.len() == before {
            return false;
        }
        if cards.is_empty() {
            *self = Self::Empty;
        }
        true
    }
}

/// Plain-text rendering for terminals.
pub fn render_text(state: &ListViewState) -> String {
    if let Some(placeholder) = state.placeholder() {
        return format!("{placeholder}\n");
    }

    let mut out = String::new();
    for (index, card) in state.cards().iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", card.title());
        let _ = writeln!(out, "  {}", card.email_line());
        let _ = writeln!(out, "  {}", card.id_line());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, username: &str) -> UserRecord {
        UserRecord {
            id: Some(UserId::Number(id)),
            username: Some(username.to_string()),
            first_name: Some("First".into()),
            last_name: Some("Last".into()),
            email: Some(format!("{username}@example.com")),
            ..UserRecord::default()
        }
    }

    #[test]
    fn empty_or_absent_list_renders_only_the_placeholder() {
        for response in [
            UserListResponse::default(),
            UserListResponse::new(Vec::new()),
        ] {
            let state = render_users(&response);
            assert_eq!(state, ListViewState::Empty);
            assert_eq!(state.placeholder(), Some("No users found"));
            assert!(state.cards().is_empty());
            assert_eq!(render_text(&state), "No users found\n");
        }
    }

    #[test]
    fn cards_keep_api_order_and_format_lines() {
        let state = render_users(&UserListResponse::new(vec![user(1, "ada"), user(2, "bob")]));
        let cards = state.cards();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title(), "First Last (@ada)");
        assert_eq!(cards[0].email_line(), "Email: ada@example.com");
        assert_eq!(cards[1].id_line(), "ID: 2");
        assert!(state.placeholder().is_none());
    }

    #[test]
    fn text_rendering_separates_cards() {
        let state = render_users(&UserListResponse::new(vec![user(1, "ada"), user(2, "bob")]));
        assert_eq!(
            render_text(&state),
            "First Last (@ada)\n  Email: ada@example.com\n  ID: 1\n\n\
             First Last (@bob)\n  Email: bob@example.com\n  ID: 2\n"
        );
    }

    #[test]
    fn card_without_identifier_has_no_user_id() {
        let card = UserCard::new(UserRecord::default());
        assert!(card.user_id().is_none());
        assert_eq!(card.id_line(), "ID: N/A");
    }

    #[test]
    fn splices_mutations_into_loaded_list() {
        let mut state = ListViewState::Empty;
        assert!(state.apply_created(user(1, "ada")));
        assert!(state.apply_created(user(2, "bob")));

        let mut renamed = user(2, "robert");
        renamed.id = None;
        assert!(state.apply_updated(&UserId::Text("2".into()), renamed));
        assert_eq!(state.cards()[1].user.username, "robert");
        assert_eq!(state.cards()[1].user.id, "2");

        assert!(state.apply_deleted(&UserId::Number(1)));
        assert!(state.apply_deleted(&UserId::Number(2)));
        assert_eq!(state, ListViewState::Empty);
    }

    #[test]
    fn splicing_requires_a_loaded_list() {
        let mut failed = ListViewState::Failed(LOAD_FAILED_MESSAGE.into());
        assert!(!failed.apply_created(user(1, "ada")));
        assert!(!failed.apply_deleted(&UserId::Number(1)));

        let mut cards = render_users(&UserListResponse::new(vec![user(1, "ada")]));
        assert!(!cards.apply_updated(&UserId::Number(9), user(9, "ghost")));
        assert!(!cards.apply_deleted(&UserId::Number(9)));
    }

    #[test]
    fn replies_without_a_record_are_not_spliced() {
        let mut state = render_users(&UserListResponse::new(vec![user(1, "ada")]));
        let before = state.clone();

        assert!(!state.apply_created(UserRecord::default()));
        let mut nameless = user(5, "eve");
        nameless.id = None;
        assert!(!state.apply_created(nameless));
        assert!(!state.apply_updated(&UserId::Number(1), UserRecord::default()));
        assert_eq!(state, before);
    }
}
