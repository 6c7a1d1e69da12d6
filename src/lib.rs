//! Bookkeeping and physics glue for a tabletop AR demo session: tracked
//! planes are mirrored as textured visuals, taps drop cubes onto them and
//! long presses blow the cubes away.

pub mod command;
pub mod config;
pub mod gesture;
pub mod headless;
pub mod host;
pub mod io;
pub mod observer;
pub mod replay;
pub mod run;
pub mod session;

pub use config::SessionConfig;
pub use session::{SessionController, SessionState, SessionStats};
