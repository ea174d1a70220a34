//! D-Bus integration for ConsoleKit.
//!
//! Two halves share this module:
//!
//! - the `org.freedesktop.ConsoleKit.Session` binding table and the handler
//!   object that serves it ([`SessionInterface`], [`SessionService`]);
//! - blocking client proxies for the Manager, Seat and Session interfaces,
//!   used by `ck-list-sessions`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐          D-Bus           ┌──────────────────┐
//! │  ConsoleKit      │<─────────────────────────│ ck-list-sessions │
//! │  Manager / Seat  │  org.freedesktop.        │ (ManagerProxy,   │
//! │  Session objects │  ConsoleKit.*            │  SeatProxy,      │
//! │ (SessionService) │─────────────────────────>│  SessionProxy)   │
//! └──────────────────┘                          └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ## Server (session owner side)
//!
//! ```ignore
//! let state = Arc::new(RwLock::new(SessionState::new(id, seat_id)?));
//! let (service, mut rx) = SessionService::start(Builder::system()?, state.clone()).await?;
//!
//! while let Some(cmd) = rx.recv().await {
//!     match cmd {
//!         SessionCommand::Activate => service.set_active(true).await?,
//!         SessionCommand::Lock | SessionCommand::Unlock => { /* ... */ }
//!     }
//! }
//! ```
//!
//! ## Client (CLI side)
//!
//! ```ignore
//! let connection = connect(&config.bus)?;
//! let manager = ManagerProxyBlocking::new(&connection)?;
//! for seat in manager.get_seats()? { /* ... */ }
//! ```

mod interface;
mod service;

pub use interface::{
    MethodInfo, SessionCommand, SessionInterface, SessionState, SignalInfo, SESSION_METHODS,
    SESSION_SIGNALS,
};
pub use service::{
    connect, ManagerProxy, ManagerProxyBlocking, SeatProxy, SeatProxyBlocking, SessionProxy,
    SessionProxyBlocking, SessionService,
};

/// Well-known bus name of the ConsoleKit service.
pub const CK_NAME: &str = "org.freedesktop.ConsoleKit";

/// Root of every ConsoleKit object path.
pub const CK_PATH: &str = "/org/freedesktop/ConsoleKit";

/// Object path of the manager.
pub const CK_MANAGER_PATH: &str = "/org/freedesktop/ConsoleKit/Manager";

pub const CK_MANAGER_INTERFACE: &str = "org.freedesktop.ConsoleKit.Manager";
pub const CK_SEAT_INTERFACE: &str = "org.freedesktop.ConsoleKit.Seat";
pub const CK_SESSION_INTERFACE: &str = "org.freedesktop.ConsoleKit.Session";

/// Strip the ConsoleKit path root from an object path.
///
/// `/org/freedesktop/ConsoleKit/Session1` becomes `Session1`. Paths outside
/// the ConsoleKit tree are returned unchanged.
pub fn short_id(path: &str) -> &str {
    path.strip_prefix(CK_PATH)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}
