//! A library to change the primary display's mode and the desktop scaling.
//!
//! Requested modes are checked against the modes the display driver reports
//! before anything is applied. On Windows this wraps the relevant `winuser.h`
//! calls; other platforms get a backend that knows no modes.

mod backend;
mod display;
mod messages;
mod platform;
mod types;

pub use backend::*;
pub use display::*;
pub use messages::*;
pub use platform::SystemBackend;
pub use types::*;
