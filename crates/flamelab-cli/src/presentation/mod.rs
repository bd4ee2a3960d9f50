//! Terminal formatting shared by the handlers.
//!
//! Format only: every value shown here comes from `flamelab_core` or
//! `flamelab_runtime` unchanged.

pub mod events;
pub mod tables;

pub use events::describe_event;
pub use tables::{flag, hex_color, separator, truncate_string};
