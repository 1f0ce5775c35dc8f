//! Controller layer: UI events, reducer-like state transitions, command orchestration,
//! and the backend controller that executes commands against the user API.

pub mod events;
pub mod interaction;
pub mod orchestration;
pub mod reducer;
