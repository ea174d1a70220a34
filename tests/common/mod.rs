//! In-process ConsoleKit stand-in served over a peer-to-peer socket pair.

#![allow(dead_code)]

use std::os::unix::net::UnixStream;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use zbus::blocking::connection::Builder;
use zbus::blocking::Connection;
use zbus::zvariant::OwnedObjectPath;
use zbus::{fdo, interface, Guid};

pub const MANAGER_PATH: &str = "/org/freedesktop/ConsoleKit/Manager";

/// Client calls that get no reply fail after this long.
const CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Always served, so the peer has an object server that answers calls to
/// unknown objects with an error.
struct Placeholder;

#[interface(name = "org.example.Placeholder")]
impl Placeholder {
    fn ping(&self) {}
}

pub fn path(p: &str) -> OwnedObjectPath {
    OwnedObjectPath::try_from(p).unwrap()
}

pub struct MockManager {
    pub seats: fdo::Result<Vec<OwnedObjectPath>>,
}

#[interface(name = "org.freedesktop.ConsoleKit.Manager")]
impl MockManager {
    fn get_seats(&self) -> fdo::Result<Vec<OwnedObjectPath>> {
        self.seats.clone()
    }
}

pub struct MockSeat {
    pub sessions: fdo::Result<Vec<OwnedObjectPath>>,
}

#[interface(name = "org.freedesktop.ConsoleKit.Seat")]
impl MockSeat {
    fn get_sessions(&self) -> fdo::Result<Vec<OwnedObjectPath>> {
        self.sessions.clone()
    }
}

/// Session attributes, with a list of member names that answer with an error.
#[derive(Clone)]
pub struct MockSession {
    pub uid: i32,
    pub seat_id: OwnedObjectPath,
    pub session_type: String,
    pub x11_display: String,
    pub display_device: String,
    pub host_name: String,
    pub active: bool,
    pub local: bool,
    pub failing: Vec<&'static str>,
    /// Members called so far, in arrival order.
    pub calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MockSession {
    pub fn new(uid: i32, seat_id: &str) -> Self {
        Self {
            uid,
            seat_id: path(seat_id),
            session_type: "x11".into(),
            x11_display: ":0".into(),
            display_device: "/dev/tty7".into(),
            host_name: "localhost".into(),
            active: true,
            local: true,
            failing: Vec::new(),
            calls: Arc::default(),
        }
    }

    pub fn failing(mut self, member: &'static str) -> Self {
        self.failing.push(member);
        self
    }

    fn check(&self, member: &'static str) -> fdo::Result<()> {
        self.calls.lock().unwrap().push(member);
        if self.failing.contains(&member) {
            Err(fdo::Error::Failed(format!("{} is unavailable", member)))
        } else {
            Ok(())
        }
    }
}

#[interface(name = "org.freedesktop.ConsoleKit.Session")]
impl MockSession {
    fn get_user(&self) -> fdo::Result<i32> {
        self.check("GetUser")?;
        Ok(self.uid)
    }

    fn get_seat_id(&self) -> fdo::Result<OwnedObjectPath> {
        self.check("GetSeatId")?;
        Ok(self.seat_id.clone())
    }

    fn get_session_type(&self) -> fdo::Result<String> {
        self.check("GetSessionType")?;
        Ok(self.session_type.clone())
    }

    #[zbus(name = "GetX11Display")]
    fn get_x11_display(&self) -> fdo::Result<String> {
        self.check("GetX11Display")?;
        Ok(self.x11_display.clone())
    }

    fn get_display_device(&self) -> fdo::Result<String> {
        self.check("GetDisplayDevice")?;
        Ok(self.display_device.clone())
    }

    fn get_host_name(&self) -> fdo::Result<String> {
        self.check("GetHostName")?;
        Ok(self.host_name.clone())
    }

    fn is_active(&self) -> fdo::Result<bool> {
        self.check("IsActive")?;
        Ok(self.active)
    }

    fn is_local(&self) -> fdo::Result<bool> {
        self.check("IsLocal")?;
        Ok(self.local)
    }
}

/// Objects served by the mock, keyed by path.
#[derive(Default)]
pub struct MockConsoleKit {
    pub seats: Option<fdo::Result<Vec<OwnedObjectPath>>>,
    pub seat_objects: Vec<(String, MockSeat)>,
    pub sessions: Vec<(String, MockSession)>,
}

impl MockConsoleKit {
    pub fn with_seats(mut self, seats: &[&str]) -> Self {
        self.seats = Some(Ok(seats.iter().map(|s| path(s)).collect()));
        self
    }

    pub fn seat(mut self, seat: &str, sessions: &[&str]) -> Self {
        let sessions = Ok(sessions.iter().map(|s| path(s)).collect());
        self.seat_objects.push((seat.to_string(), MockSeat { sessions }));
        self
    }

    pub fn failing_manager(mut self) -> Self {
        self.seats = Some(Err(fdo::Error::AccessDenied("not authorized".into())));
        self
    }

    pub fn failing_seat(mut self, seat: &str) -> Self {
        let sessions = Err(fdo::Error::AccessDenied("seat is private".into()));
        self.seat_objects.push((seat.to_string(), MockSeat { sessions }));
        self
    }

    pub fn session(mut self, ssid: &str, session: MockSession) -> Self {
        self.sessions.push((ssid.to_string(), session));
        self
    }

    /// Serve the mock on one end of a socket pair and return the client end.
    ///
    /// The server connection registers no bus name, so destination headers
    /// are not checked.
    pub fn serve(self) -> (Connection, Connection) {
        let (server_sock, client_sock) = UnixStream::pair().unwrap();

        let server = thread::spawn(move || {
            let mut builder = Builder::async_io_unix_stream(server_sock)
                .server(Guid::generate())
                .unwrap()
                .p2p()
                .serve_at("/org/example/Placeholder", Placeholder)
                .unwrap();
            if let Some(seats) = self.seats {
                builder = builder
                    .serve_at(MANAGER_PATH, MockManager { seats })
                    .unwrap();
            }
            for (p, seat) in self.seat_objects {
                builder = builder.serve_at(p, seat).unwrap();
            }
            for (p, session) in self.sessions {
                builder = builder.serve_at(p, session).unwrap();
            }
            builder.build().unwrap()
        });

        let client = Builder::async_io_unix_stream(client_sock)
            .p2p()
            .method_timeout(CALL_TIMEOUT)
            .build()
            .unwrap();
        let server = server.join().unwrap();
        (server, client)
    }
}
