//! Terminal UI module using ratatui.
//!
//! - `render`: main frame layout, bars and overlays
//! - `report`: report table and raw response views
//! - `input`: keyboard event handling
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod report;
pub mod styles;
