//! Ideas application library
//!
//! The idea schema, list controller and item component, plus the bootstrap
//! that wires them to a store.

pub mod bootstrap;
pub mod modules;

pub use bootstrap::App;
pub use modules::ideas::{EditOutcome, EditState, Idea, IdeaItem, IdeasController};
