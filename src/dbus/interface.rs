//! D-Bus binding table for a ConsoleKit session.
//!
//! Provides the `org.freedesktop.ConsoleKit.Session` interface. Getters answer
//! from shared [`SessionState`]; requests that need the session owner to act
//! (`Activate`, `Lock`, `Unlock`) are forwarded as [`SessionCommand`]s.

use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use zbus::interface;
use zbus::object_server::SignalEmitter;
use zbus::zvariant::OwnedObjectPath;

/// One method of the session interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodInfo {
    /// D-Bus member name.
    pub name: &'static str,
    /// Name and signature of the single output argument, if any.
    pub out_arg: Option<(&'static str, &'static str)>,
    /// Whether the handler completes after handing the request to the owner.
    pub is_async: bool,
}

/// One signal of the session interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalInfo {
    pub name: &'static str,
    /// Name and signature of the signal argument, if any.
    pub arg: Option<(&'static str, &'static str)>,
}

const fn getter(name: &'static str, arg: &'static str, signature: &'static str) -> MethodInfo {
    MethodInfo {
        name,
        out_arg: Some((arg, signature)),
        is_async: false,
    }
}

const fn request(name: &'static str) -> MethodInfo {
    MethodInfo {
        name,
        out_arg: None,
        is_async: true,
    }
}

/// Methods served by [`SessionInterface`], in declaration order.
pub const SESSION_METHODS: &[MethodInfo] = &[
    getter("GetId", "ssid", "o"),
    getter("GetSeatId", "sid", "o"),
    getter("GetSessionType", "type", "s"),
    getter("GetUser", "uid", "i"),
    getter("GetX11Display", "display", "s"),
    getter("GetDisplayDevice", "display_device", "s"),
    getter("GetHostName", "host_name", "s"),
    getter("IsActive", "active", "b"),
    getter("IsLocal", "local", "b"),
    request("Activate"),
    request("Lock"),
    request("Unlock"),
];

/// Signals emitted by [`SessionInterface`].
pub const SESSION_SIGNALS: &[SignalInfo] = &[
    SignalInfo {
        name: "ActiveChanged",
        arg: Some(("is_active", "b")),
    },
    SignalInfo {
        name: "Lock",
        arg: None,
    },
    SignalInfo {
        name: "Unlock",
        arg: None,
    },
];

/// Requests forwarded to whoever owns the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Make this session the active one on its seat.
    Activate,
    /// A client asked for the session to be locked. `Lock` was already emitted.
    Lock,
    /// A client asked for the session to be unlocked. `Unlock` was already emitted.
    Unlock,
}

/// Attributes of a session as exposed over D-Bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub id: OwnedObjectPath,
    pub seat_id: OwnedObjectPath,
    pub session_type: String,
    pub unix_user: i32,
    pub x11_display: String,
    pub display_device: String,
    pub remote_host_name: String,
    pub active: bool,
    pub local: bool,
}

impl SessionState {
    /// Create state for a local, inactive session with empty attributes.
    pub fn new(id: &str, seat_id: &str) -> zbus::Result<Self> {
        Ok(Self {
            id: OwnedObjectPath::try_from(id)?,
            seat_id: OwnedObjectPath::try_from(seat_id)?,
            session_type: String::new(),
            unix_user: 0,
            x11_display: String::new(),
            display_device: String::new(),
            remote_host_name: String::new(),
            active: false,
            local: true,
        })
    }
}

/// D-Bus interface implementation for one session.
///
/// Registered at the session's own object path (see [`SessionState::id`])
/// with the interface name `org.freedesktop.ConsoleKit.Session`.
pub struct SessionInterface {
    command_tx: mpsc::Sender<SessionCommand>,
    state: Arc<RwLock<SessionState>>,
}

impl SessionInterface {
    pub fn new(command_tx: mpsc::Sender<SessionCommand>, state: Arc<RwLock<SessionState>>) -> Self {
        Self { command_tx, state }
    }

    async fn forward(&self, command: SessionCommand) -> zbus::fdo::Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| zbus::fdo::Error::Failed(format!("Failed to send command: {}", e)))
    }
}

#[interface(name = "org.freedesktop.ConsoleKit.Session")]
impl SessionInterface {
    #[zbus(out_args("ssid"))]
    async fn get_id(&self) -> OwnedObjectPath {
        self.state.read().await.id.clone()
    }

    #[zbus(out_args("sid"))]
    async fn get_seat_id(&self) -> OwnedObjectPath {
        self.state.read().await.seat_id.clone()
    }

    #[zbus(out_args("type"))]
    async fn get_session_type(&self) -> String {
        self.state.read().await.session_type.clone()
    }

    #[zbus(out_args("uid"))]
    async fn get_user(&self) -> i32 {
        self.state.read().await.unix_user
    }

    #[zbus(name = "GetX11Display", out_args("display"))]
    async fn get_x11_display(&self) -> String {
        self.state.read().await.x11_display.clone()
    }

    #[zbus(out_args("display_device"))]
    async fn get_display_device(&self) -> String {
        self.state.read().await.display_device.clone()
    }

    #[zbus(out_args("host_name"))]
    async fn get_host_name(&self) -> String {
        self.state.read().await.remote_host_name.clone()
    }

    #[zbus(out_args("active"))]
    async fn is_active(&self) -> bool {
        self.state.read().await.active
    }

    #[zbus(out_args("local"))]
    async fn is_local(&self) -> bool {
        self.state.read().await.local
    }

    /// Ask the seat to switch to this session.
    async fn activate(&self) -> zbus::fdo::Result<()> {
        self.forward(SessionCommand::Activate).await
    }

    async fn lock(
        &self,
        #[zbus(signal_emitter)] emitter: SignalEmitter<'_>,
    ) -> zbus::fdo::Result<()> {
        Self::lock_requested(&emitter).await?;
        self.forward(SessionCommand::Lock).await
    }

    async fn unlock(
        &self,
        #[zbus(signal_emitter)] emitter: SignalEmitter<'_>,
    ) -> zbus::fdo::Result<()> {
        Self::unlock_requested(&emitter).await?;
        self.forward(SessionCommand::Unlock).await
    }

    #[zbus(signal)]
    pub async fn active_changed(emitter: &SignalEmitter<'_>, is_active: bool) -> zbus::Result<()>;

    #[zbus(signal, name = "Lock")]
    pub async fn lock_requested(emitter: &SignalEmitter<'_>) -> zbus::Result<()>;

    #[zbus(signal, name = "Unlock")]
    pub async fn unlock_requested(emitter: &SignalEmitter<'_>) -> zbus::Result<()>;
}
