//! Environment variable management for testing
//!
//! Environment variables are process-global, so every guard in this module
//! serializes on a single lock. Tests that only touch individual variables
//! should hold [`env_lock`] for their whole body.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Acquire the process-wide environment lock.
///
/// A test that panicked while holding the lock poisons it; the poison is
/// ignored because every guard restores its variables on drop.
pub fn env_lock() -> MutexGuard<'static, ()> {
  ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A test environment that points `XDG_CONFIG_HOME` at a per-test temporary
/// directory
pub struct EnvTestGuard {
  /// The temporary directory that holds the config directory
  pub temp_dir: TempDir,
  original_config_home: Option<OsString>,
  _lock: MutexGuard<'static, ()>,
}

impl Default for EnvTestGuard {
  fn default() -> Self {
    Self::new()
  }
}

impl EnvTestGuard {
  pub const XDG_CONFIG_HOME: &'static str = "XDG_CONFIG_HOME";

  /// Create a new test environment with an isolated config directory
  pub fn new() -> Self {
    let lock = env_lock();
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");

    let original_config_home = env::var_os(Self::XDG_CONFIG_HOME);

    let temp_path = temp_dir.path().to_path_buf();
    unsafe {
      env::set_var(Self::XDG_CONFIG_HOME, temp_path.join("config"));
    }

    std::fs::create_dir_all(temp_path.join("config")).expect("Failed to create config directory");

    Self {
      temp_dir,
      original_config_home,
      _lock: lock,
    }
  }

  /// Get the path to the XDG config directory
  pub fn config_dir(&self) -> PathBuf {
    self.temp_dir.path().join("config")
  }
}

impl Drop for EnvTestGuard {
  fn drop(&mut self) {
    restore(Self::XDG_CONFIG_HOME, self.original_config_home.take());
  }
}

/// Sets or removes a single environment variable and restores the previous
/// value on drop. Callers are expected to hold [`env_lock`].
pub struct EnvVarGuard {
  key: &'static str,
  original: Option<OsString>,
}

impl EnvVarGuard {
  /// Set `key` to `value` for the lifetime of the guard
  pub fn set(key: &'static str, value: &str) -> Self {
    let original = env::var_os(key);
    unsafe {
      env::set_var(key, value);
    }
    Self { key, original }
  }

  /// Remove `key` for the lifetime of the guard
  pub fn remove(key: &'static str) -> Self {
    let original = env::var_os(key);
    unsafe {
      env::remove_var(key);
    }
    Self { key, original }
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    restore(self.key, self.original.take());
  }
}

fn restore(key: &str, original: Option<OsString>) {
  match original {
    Some(value) => unsafe {
      env::set_var(key, value);
    },
    None => unsafe {
      env::remove_var(key);
    },
  }
}
