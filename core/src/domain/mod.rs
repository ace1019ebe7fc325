//! Domain types shared by the engine: the sign-encoded block state and
//! the history record handed to a [`crate::engine::collaborators::HistorySink`].

mod block;
mod history;

pub use block::{BlockState, Visibility};
pub use history::{HistoryKind, HistoryRecord};
