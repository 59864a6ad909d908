//! Interactive terminal session.
//!
//! The session is a single event loop: keyboard input arrives on a
//! channel fed by a blocking reader thread, while search results and
//! debounced queries arrive through the controller. Every wakeup is
//! followed by a redraw.

mod app;
mod ui;

pub use app::App;
