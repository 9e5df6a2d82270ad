//! Logging macros shared by every crate in the workspace.
//!
//! These forward to [`tracing`] events; the CLI installs a formatter that
//! renders each level with its own symbol. `success!` is an info-level event
//! on a dedicated target so the formatter can mark it differently.

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::tracing::debug!($($arg)*) };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::tracing::info!($($arg)*) };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => { $crate::tracing::info!(target: "wavemap::success", $($arg)*) };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::tracing::warn!($($arg)*) };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::tracing::error!($($arg)*) };
}
