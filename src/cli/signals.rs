//! Shutdown signal handling for the watch process

use std::fmt;

/// Which signal asked us to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    Interrupt,
    Terminate,
}

impl fmt::Display for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupt => write!(f, "SIGINT"),
            Self::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Listener for OS shutdown signals.
///
/// Handlers are installed on creation, so a signal arriving before
/// [`ShutdownListener::recv`] is awaited is not lost.
pub struct ShutdownListener {
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
}

impl ShutdownListener {
    /// Install the signal handlers
    #[cfg(unix)]
    pub fn new() -> Result<Self, std::io::Error> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(not(unix))]
    pub fn new() -> Result<Self, std::io::Error> {
        Ok(Self {})
    }

    /// Wait for SIGINT or SIGTERM
    #[cfg(unix)]
    pub async fn recv(&mut self) -> Shutdown {
        tokio::select! {
            _ = self.sigint.recv() => Shutdown::Interrupt,
            _ = self.sigterm.recv() => Shutdown::Terminate,
        }
    }

    /// Wait for Ctrl+C
    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> Shutdown {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl+C handler failed");
            std::future::pending::<()>().await;
        }
        Shutdown::Interrupt
    }
}
