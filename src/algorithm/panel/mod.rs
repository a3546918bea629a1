//! Country-year panel construction
//!
//! Joining the normalized sources and deriving the lagged model features.

pub mod assemble;
pub mod features;

pub use assemble::{PANEL_COLUMNS, assemble_panel};
pub use features::build_features;
