//! Presentation layer: reads `AppState`, forwards control changes to it.

pub mod charts;
pub mod panels;
