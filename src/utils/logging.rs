//! Conditional logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! Each module that uses them declares its own switch:
//! ```rust
//! const ENABLE_LOGS: bool = true;
//! ```
//! and then imports the macros from the crate root:
//! ```rust,ignore
//! use crate::{log_info, log_warn, log_error};
//! ```

/// Conditional info logging; checks the `ENABLE_LOGS` const in the calling
/// module.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional warn logging; checks the `ENABLE_LOGS` const in the calling
/// module.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Conditional error logging; checks the `ENABLE_LOGS` const in the calling
/// module.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
