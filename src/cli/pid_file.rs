//! PID file management for the watch process

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use tracing::debug;

/// PID file guarding a history store against concurrent watchers
pub struct PidFile {
    path: PathBuf,
    owned: bool,
}

impl PidFile {
    /// PID file next to the store it protects
    pub fn for_store(store_path: &Path) -> Self {
        let mut path = store_path.as_os_str().to_owned();
        path.push(".pid");
        Self::with_path(PathBuf::from(path))
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owned: false,
        }
    }

    /// Get the PID file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID of a live process holding the file, if any.
    /// A stale file is removed.
    pub fn is_running(&self) -> Option<u32> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let pid: u32 = contents.trim().parse().ok()?;

        if pid != process::id() && process_alive(pid) {
            return Some(pid);
        }

        debug!(pid, path = %self.path.display(), "Removing stale PID file");
        let _ = fs::remove_file(&self.path);
        None
    }

    /// Acquire the PID file (fails if another watcher is running)
    pub fn acquire(&mut self) -> Result<(), PidFileError> {
        if let Some(pid) = self.is_running() {
            return Err(PidFileError::AlreadyRunning(pid));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                PidFileError::WriteFailed(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let mut file = fs::File::create(&self.path).map_err(|e| {
            PidFileError::WriteFailed(format!("Failed to create PID file: {}", e))
        })?;
        write!(file, "{}", process::id())
            .map_err(|e| PidFileError::WriteFailed(format!("Failed to write PID: {}", e)))?;

        self.owned = true;
        Ok(())
    }

    /// Release the PID file if we hold it
    pub fn release(&mut self) -> Result<(), PidFileError> {
        if !self.owned {
            return Ok(());
        }
        self.owned = false;

        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                PidFileError::RemoveFailed(format!("Failed to remove PID file: {}", e))
            })?;
        }
        Ok(())
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.release();
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    // Signal 0 probes for existence; EPERM means it exists under another user
    match kill(Pid::from_raw(raw), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}

#[cfg(windows)]
fn process_alive(pid: u32) -> bool {
    use windows_sys::Win32::Foundation::{CloseHandle, STILL_ACTIVE};
    use windows_sys::Win32::System::Threading::{
        GetExitCodeProcess, OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION,
    };

    // SAFETY: the handle is checked for null and closed before returning
    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid);
        if handle.is_null() {
            return false;
        }
        let mut code: u32 = 0;
        let ok = GetExitCodeProcess(handle, &mut code) != 0;
        CloseHandle(handle);
        ok && code == STILL_ACTIVE as u32
    }
}

/// PID file errors
#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("Another watcher is already running (PID: {0})")]
    AlreadyRunning(u32),

    #[error("Failed to write PID file: {0}")]
    WriteFailed(String),

    #[error("Failed to remove PID file: {0}")]
    RemoveFailed(String),
}
