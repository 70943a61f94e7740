//! Outcome rules shared by every variant.
//!
//! Pure functions over a grid and its catalog, kept apart from board
//! storage so the controller and the agent can both call them.

pub mod draw;
pub mod win;

pub use draw::is_draw;
pub use win::{has_win, winning_line};
