//! Serve one ConsoleKit session object on the session bus.
//!
//! Run with `cargo run --example serve-session`, then poke it with
//! `busctl --user call org.freedesktop.ConsoleKit /org/freedesktop/ConsoleKit/Session1 \
//!  org.freedesktop.ConsoleKit.Session Activate`.

use std::sync::Arc;

use ck_tools::dbus::{SessionCommand, SessionService, SessionState, CK_NAME, SESSION_METHODS};
use tokio::sync::RwLock;
use tracing::info;
use zbus::connection::Builder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("ck_tools=debug,serve_session=info")
        .init();

    let mut state = SessionState::new(
        "/org/freedesktop/ConsoleKit/Session1",
        "/org/freedesktop/ConsoleKit/Seat1",
    )?;
    state.session_type = "x11".into();
    state.unix_user = nix::unistd::getuid().as_raw() as i32;
    state.x11_display = std::env::var("DISPLAY").unwrap_or_default();

    let builder = Builder::session()?.name(CK_NAME)?;
    let (service, mut commands) =
        SessionService::start(builder, Arc::new(RwLock::new(state))).await?;

    for method in SESSION_METHODS {
        info!("Serving {}", method.name);
    }

    while let Some(command) = commands.recv().await {
        info!("Received {:?}", command);
        match command {
            SessionCommand::Activate => service.set_active(true).await?,
            SessionCommand::Lock | SessionCommand::Unlock => {}
        }
    }

    Ok(())
}
