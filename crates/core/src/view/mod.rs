pub mod format;
pub mod notifications;
pub mod panel;
pub mod state;
pub mod sync;
