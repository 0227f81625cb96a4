//! Terminal UI for the jamal binary

pub mod ci;
pub mod components;
pub mod console;
pub mod context;
pub mod error;
pub mod json;
pub mod output;
pub mod primitives;
pub mod terminal;
pub mod theme;
