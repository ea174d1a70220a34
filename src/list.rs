//! Seat and session enumeration for `ck-list-sessions`.
//!
//! Walks manager → seats → sessions over blocking proxies and writes one
//! [`SessionRecord`] line per session. Individual call failures are logged
//! and leave the affected field at its default; only the initial bus
//! connection and writes to the output are fatal.

use std::fmt;
use std::io::Write;

use thiserror::Error;
use tracing::{debug, warn};
use zbus::blocking::Connection;
use zbus::proxy::CacheProperties;
use zbus::zvariant::ObjectPath;

use crate::accounts::AccountLookup;
use crate::config::BusConfig;
use crate::dbus::{
    self, short_id, ManagerProxyBlocking, SeatProxyBlocking, SessionProxyBlocking,
};

#[derive(Error, Debug)]
pub enum ListError {
    #[error("Failed to connect to the D-Bus daemon: {}", error_message(.0))]
    Connect(#[source] zbus::Error),

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// One line of the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    pub uid: i32,
    pub realname: String,
    /// Short id of the seat.
    pub seat: String,
    /// Short id of the session.
    pub session: String,
    pub session_type: String,
    pub active: bool,
    pub x11_display: String,
    pub display_device: String,
    pub host_name: String,
    pub local: bool,
}

fn flag(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

impl fmt::Display for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "uid='{}' realname='{}' seat='{}' session='{}' session-type='{}' active={} \
             x11-display='{}' display-device='{}' host-name='{}' is-local={}",
            self.uid,
            self.realname,
            self.seat,
            self.session,
            self.session_type,
            flag(self.active),
            self.x11_display,
            self.display_device,
            self.host_name,
            flag(self.local),
        )
    }
}

/// Message carried by a D-Bus error, without the error name when the
/// service supplied a message of its own.
pub fn error_message(err: &zbus::Error) -> String {
    match err {
        zbus::Error::MethodError(_, Some(message), _) => message.clone(),
        other => other.to_string(),
    }
}

/// Unwrap a call result, logging `<member> failed: <message>` on error.
fn fetch<T>(member: &str, reply: zbus::Result<T>) -> Option<T> {
    match reply {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} failed: {}", member, error_message(&e));
            None
        }
    }
}

/// Connect with `config` and write the full report to `out`.
pub fn run<A: AccountLookup, W: Write>(
    config: &BusConfig,
    accounts: A,
    out: &mut W,
) -> Result<(), ListError> {
    let connection = dbus::connect(config).map_err(ListError::Connect)?;
    Lister::new(&connection, accounts).list_seats(out)
}

/// Report writer bound to one bus connection.
pub struct Lister<'c, A> {
    connection: &'c Connection,
    accounts: A,
}

impl<'c, A: AccountLookup> Lister<'c, A> {
    pub fn new(connection: &'c Connection, accounts: A) -> Self {
        Self {
            connection,
            accounts,
        }
    }

    /// List every session of every seat, in the order the service returns them.
    pub fn list_seats<W: Write>(&self, out: &mut W) -> Result<(), ListError> {
        let seats = ManagerProxyBlocking::builder(self.connection)
            .cache_properties(CacheProperties::No)
            .build()
            .and_then(|manager| manager.get_seats());

        let seats = match seats {
            Ok(seats) => seats,
            Err(e) => {
                warn!("Failed to get list of seats: {}", error_message(&e));
                return Ok(());
            }
        };

        debug!("Found {} seat(s)", seats.len());
        for seat in &seats {
            self.list_sessions(seat, out)?;
        }
        Ok(())
    }

    /// List the sessions attached to one seat.
    pub fn list_sessions<W: Write>(
        &self,
        seat: &ObjectPath<'_>,
        out: &mut W,
    ) -> Result<(), ListError> {
        let sessions = SeatProxyBlocking::builder(self.connection)
            .path(seat)
            .map(|builder| builder.cache_properties(CacheProperties::No))
            .and_then(|builder| builder.build())
            .and_then(|proxy| proxy.get_sessions());

        let sessions = match sessions {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!(
                    "Failed to get list of sessions for {}: {}",
                    seat,
                    error_message(&e)
                );
                return Ok(());
            }
        };

        debug!("Seat {} has {} session(s)", seat, sessions.len());
        for ssid in &sessions {
            self.list_session(ssid, out)?;
        }
        Ok(())
    }

    /// Write the report line for one session.
    pub fn list_session<W: Write>(
        &self,
        ssid: &ObjectPath<'_>,
        out: &mut W,
    ) -> Result<(), ListError> {
        match self.session_record(ssid) {
            Ok(record) => writeln!(out, "{}", record)?,
            Err(e) => warn!("Could not create proxy for {}: {}", ssid, error_message(&e)),
        }
        Ok(())
    }

    /// Fetch every attribute of a session.
    ///
    /// Fails only when no proxy can be built for `ssid`; failed attribute
    /// calls leave their field at the default.
    pub fn session_record(&self, ssid: &ObjectPath<'_>) -> zbus::Result<SessionRecord> {
        let proxy = SessionProxyBlocking::builder(self.connection)
            .path(ssid)?
            .cache_properties(CacheProperties::No)
            .build()?;

        // Call order is fixed: GetUser first, IsLocal last.
        let uid = fetch("GetUser", proxy.get_user());
        let seat_id = fetch("GetSeatId", proxy.get_seat_id());
        let session_type = fetch("GetSessionType", proxy.get_session_type());
        let x11_display = fetch("GetX11Display", proxy.get_x11_display());
        let display_device = fetch("GetDisplayDevice", proxy.get_display_device());
        let host_name = fetch("GetHostName", proxy.get_host_name());
        let active = fetch("IsActive", proxy.is_active());
        let local = fetch("IsLocal", proxy.is_local());

        let realname = uid
            .and_then(|uid| self.accounts.real_name(uid as u32))
            .unwrap_or_default();

        Ok(SessionRecord {
            uid: uid.unwrap_or_default(),
            realname,
            seat: seat_id
                .map(|sid| short_id(sid.as_str()).to_string())
                .unwrap_or_default(),
            session: short_id(ssid.as_str()).to_string(),
            session_type: session_type.unwrap_or_default(),
            active: active.unwrap_or_default(),
            x11_display: x11_display.unwrap_or_default(),
            display_device: display_device.unwrap_or_default(),
            host_name: host_name.unwrap_or_default(),
            local: local.unwrap_or_default(),
        })
    }
}
