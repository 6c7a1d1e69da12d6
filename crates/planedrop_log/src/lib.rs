//! Logging for planedrop.

#[macro_use]
mod macros;

pub use log::{debug, error, info, trace, warn};
