//! D-Bus service setup and client proxies for ConsoleKit.

use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};
use zbus::{
    connection::Builder,
    zvariant::{ObjectPath, OwnedObjectPath},
    Connection, Result,
};

use super::interface::{SessionCommand, SessionInterface, SessionState};
use crate::config::BusConfig;

/// Open the blocking connection `ck-list-sessions` talks through.
///
/// Uses the system bus unless the configuration names an explicit address.
pub fn connect(config: &BusConfig) -> Result<zbus::blocking::Connection> {
    let builder = match config.address.as_deref() {
        Some(address) => {
            debug!("Connecting to D-Bus at {}", address);
            zbus::blocking::connection::Builder::address(address)?
        }
        None => zbus::blocking::connection::Builder::system()?,
    };

    let builder = match config.method_timeout() {
        Some(timeout) => builder.method_timeout(timeout),
        None => builder,
    };

    builder.build()
}

/// D-Bus service handle for one session object.
///
/// Keeps the connection alive and emits `ActiveChanged` when the owner
/// changes the active flag.
pub struct SessionService {
    connection: Connection,
    path: OwnedObjectPath,
    state: Arc<RwLock<SessionState>>,
}

impl SessionService {
    /// Start serving a session.
    ///
    /// The interface is registered at the session's own id on the connection
    /// produced by `builder`, which may already carry a well-known name.
    /// Returns a channel receiver for requests from D-Bus clients.
    pub async fn start<'a>(
        builder: Builder<'a>,
        state: Arc<RwLock<SessionState>>,
    ) -> Result<(Self, mpsc::Receiver<SessionCommand>)> {
        let (command_tx, command_rx) = mpsc::channel(32);

        let path = state.read().await.id.clone();
        let served: ObjectPath<'a> = path.clone().into_inner();
        let interface = SessionInterface::new(command_tx, state.clone());

        let connection = builder.serve_at(served, interface)?.build().await?;

        info!("Session service started at {}", path);

        Ok((
            Self {
                connection,
                path,
                state,
            },
            command_rx,
        ))
    }

    /// Object path the session is served at.
    pub fn path(&self) -> &OwnedObjectPath {
        &self.path
    }

    /// Update the active flag, emitting `ActiveChanged` if it changed.
    pub async fn set_active(&self, active: bool) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if state.active == active {
                return Ok(());
            }
            state.active = active;
        }

        debug!("Emitting ActiveChanged({}) for {}", active, self.path);
        let iface_ref = self
            .connection
            .object_server()
            .interface::<_, SessionInterface>(self.path.as_str())
            .await?;
        SessionInterface::active_changed(iface_ref.signal_emitter(), active).await
    }

    /// Get a reference to the connection for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

/// Proxy for the ConsoleKit manager object.
#[zbus::proxy(
    interface = "org.freedesktop.ConsoleKit.Manager",
    default_service = "org.freedesktop.ConsoleKit",
    default_path = "/org/freedesktop/ConsoleKit/Manager"
)]
pub trait Manager {
    fn get_seats(&self) -> zbus::Result<Vec<OwnedObjectPath>>;
}

/// Proxy for a seat. The path is the seat id.
#[zbus::proxy(
    interface = "org.freedesktop.ConsoleKit.Seat",
    default_service = "org.freedesktop.ConsoleKit"
)]
pub trait Seat {
    fn get_sessions(&self) -> zbus::Result<Vec<OwnedObjectPath>>;
}

/// Proxy for a session. The path is the session id.
#[zbus::proxy(
    interface = "org.freedesktop.ConsoleKit.Session",
    default_service = "org.freedesktop.ConsoleKit"
)]
pub trait Session {
    fn get_id(&self) -> zbus::Result<OwnedObjectPath>;
    fn get_seat_id(&self) -> zbus::Result<OwnedObjectPath>;
    fn get_session_type(&self) -> zbus::Result<String>;
    fn get_user(&self) -> zbus::Result<i32>;
    #[zbus(name = "GetX11Display")]
    fn get_x11_display(&self) -> zbus::Result<String>;
    fn get_display_device(&self) -> zbus::Result<String>;
    fn get_host_name(&self) -> zbus::Result<String>;
    fn is_active(&self) -> zbus::Result<bool>;
    fn is_local(&self) -> zbus::Result<bool>;
    fn activate(&self) -> zbus::Result<()>;
    fn lock(&self) -> zbus::Result<()>;
    fn unlock(&self) -> zbus::Result<()>;
}
