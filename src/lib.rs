//! Engine for a 2048 variant where tiles merge when they are neighbours in the
//! Fibonacci sequence, with an escalating goal and a limited move budget.

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod progression;
pub mod rules;
pub mod tui;

pub use board::{Board, Cell, Coord};
pub use config::GameConfig;
pub use engine::{Delegate, Direction, Engine, Turn};
pub use error::QueueError;
