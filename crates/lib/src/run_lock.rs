//! File-based lock ensuring one agent runs at a time.
//!
//! The lock is an advisory `flock` on a file in the state directory. The
//! kernel drops it when the holding process exits for any reason, so a
//! killed agent never leaves a stale lock behind.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const LOCK_FILENAME: &str = "run.lock";

#[derive(Debug, Serialize, Deserialize)]
pub struct LockMetadata {
  pub pid: u32,
  pub started_at_unix: u64,
  pub command: String,
}

#[derive(Debug, Error)]
pub enum RunLockError {
  #[error("another flatguard run is in progress: {command} (PID {pid}, started at Unix time {started_at_unix})")]
  Contention {
    command: String,
    pid: u32,
    started_at_unix: u64,
    lock_path: PathBuf,
  },

  #[error("another flatguard run is in progress (lock file: {})", lock_path.display())]
  ContentionUnknown { lock_path: PathBuf },

  #[error("failed to create lock directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("failed to open lock file: {0}")]
  OpenFile(#[source] io::Error),

  #[error("failed to write lock metadata: {0}")]
  WriteMetadata(#[source] io::Error),

  #[error("failed to acquire lock: {0}")]
  LockFailed(#[source] io::Error),
}

/// An exclusive lock held until dropped.
#[derive(Debug)]
pub struct RunLock {
  file: File,
  lock_path: PathBuf,
}

impl RunLock {
  /// Acquire the lock in `dir`, failing immediately if another process holds it.
  pub fn acquire(dir: &Path, command: &str) -> Result<Self, RunLockError> {
    let lock_path = dir.join(LOCK_FILENAME);

    std::fs::create_dir_all(dir).map_err(RunLockError::CreateDir)?;

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(false)
      .open(&lock_path)
      .map_err(RunLockError::OpenFile)?;

    if let Err(err) = try_lock(&file) {
      if err.kind() == io::ErrorKind::WouldBlock {
        return Err(Self::read_contention_error(&lock_path));
      }
      return Err(RunLockError::LockFailed(err));
    }

    Self::write_metadata(&file, command)?;
    debug!(path = %lock_path.display(), "acquired run lock");

    Ok(RunLock { file, lock_path })
  }

  /// Reads the metadata through the held handle.
  pub fn read_metadata(&self) -> io::Result<LockMetadata> {
    use std::io::{Seek, SeekFrom};

    let mut file = &self.file;
    file.seek(SeekFrom::Start(0))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    serde_json::from_str(&contents).map_err(io::Error::other)
  }

  pub fn lock_path(&self) -> &Path {
    &self.lock_path
  }

  fn write_metadata(file: &File, command: &str) -> Result<(), RunLockError> {
    let metadata = LockMetadata {
      pid: std::process::id(),
      started_at_unix: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs(),
      command: command.to_string(),
    };

    file.set_len(0).map_err(RunLockError::WriteMetadata)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &metadata).map_err(|e| RunLockError::WriteMetadata(io::Error::other(e)))?;
    writer.flush().map_err(RunLockError::WriteMetadata)?;

    Ok(())
  }

  fn read_contention_error(lock_path: &Path) -> RunLockError {
    if let Ok(mut file) = File::open(lock_path) {
      let mut contents = String::new();
      if file.read_to_string(&mut contents).is_ok()
        && let Ok(metadata) = serde_json::from_str::<LockMetadata>(&contents)
      {
        return RunLockError::Contention {
          command: metadata.command,
          pid: metadata.pid,
          started_at_unix: metadata.started_at_unix,
          lock_path: lock_path.to_path_buf(),
        };
      }
    }

    RunLockError::ContentionUnknown {
      lock_path: lock_path.to_path_buf(),
    }
  }
}

#[cfg(unix)]
fn try_lock(file: &File) -> io::Result<()> {
  use rustix::fs::{FlockOperation, flock};
  use std::os::unix::io::AsFd;

  flock(file.as_fd(), FlockOperation::NonBlockingLockExclusive).map_err(|e| io::Error::from_raw_os_error(e.raw_os_error()))
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> io::Result<()> {
  Ok(())
}
