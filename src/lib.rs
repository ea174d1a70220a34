//! ConsoleKit session tools.
//!
//! Library half of `ck-list-sessions`, also used by integration tests and
//! by anything that wants to serve a ConsoleKit session object.

pub mod accounts;
pub mod config;
#[cfg(target_os = "linux")]
pub mod dbus;
#[cfg(target_os = "linux")]
pub mod list;

// Re-export commonly used types for convenience
pub use accounts::{AccountLookup, SystemAccounts};
pub use config::Config;
#[cfg(target_os = "linux")]
pub use list::{Lister, ListError, SessionRecord};
