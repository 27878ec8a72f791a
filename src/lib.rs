//! Terminal self-quizzing with persistent progress.
//!
//! The engine (working-list derivation, session navigation, grading,
//! scoring) lives under [`engine`], with the dataset types in [`data`] and
//! the snapshot persistence in [`store`]. The binary in `main.rs` wires
//! these to a ratatui front end; integration tests drive the engine and
//! store directly.

pub mod app;
pub mod config;
pub mod data;
pub mod engine;
pub mod event;
pub mod store;
pub mod ui;
