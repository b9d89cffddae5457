//! Helpers for reading and writing credentials stored in `.netrc` files.
//!
//! GitHub tokens are stored under the web host (`github.com`, or the GitHub
//! Enterprise hostname), not the API host, which matches what git credential
//! helpers expect. [`machine_for_api_url`] performs that mapping.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::creds::Credentials;

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use octocheck_core::creds::netrc::get_netrc_path;
///
/// let path = get_netrc_path(Path::new("/home/user"));
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

/// Parses a `.netrc` file and returns credentials for the requested machine.
///
/// Tokens are read as a whitespace-separated stream, so both single-line
/// (`machine host login user password pass`) and multi-line entries work.
/// Lines starting with `#` are ignored. Entries missing a `login` or a
/// `password` are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  Ok(parse_netrc(&content, target_machine))
}

/// Parses `.netrc` content already loaded into memory.
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content
    .lines()
    .filter(|line| !line.trim_start().starts_with('#'))
    .flat_map(str::split_whitespace);

  let mut machine: Option<&str> = None;
  let mut login: Option<&str> = None;
  let mut password: Option<&str> = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" | "default" => {
        if let Some(found) = complete_entry(machine, login, password, target_machine) {
          return Some(found);
        }
        machine = if token == "machine" { tokens.next() } else { None };
        login = None;
        password = None;
      }
      "login" => login = tokens.next(),
      "password" => password = tokens.next(),
      _ => {}
    }
  }

  complete_entry(machine, login, password, target_machine)
}

fn complete_entry(
  machine: Option<&str>,
  login: Option<&str>,
  password: Option<&str>,
  target_machine: &str,
) -> Option<Credentials> {
  match (machine, login, password) {
    (Some(machine), Some(login), Some(password)) if machine == target_machine => Some(Credentials {
      username: login.to_string(),
      password: password.to_string(),
    }),
    _ => None,
  }
}

/// Writes or replaces the `.netrc` entry for the given machine.
///
/// Other entries are preserved in their original order. On Unix the file is
/// restricted to mode `600` afterwards.
///
/// # Errors
///
/// Returns an error if the file cannot be read, written, or have its
/// permissions changed.
pub fn write_netrc_entry(path: &Path, machine: &str, username: &str, password: &str) -> Result<()> {
  let existing = if path.exists() {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
  } else {
    String::new()
  };

  let mut output = String::new();
  let mut skipping = false;
  for line in existing.lines() {
    let trimmed = line.trim_start();
    if trimmed.starts_with("machine ") || trimmed == "default" {
      skipping = trimmed.split_whitespace().nth(1) == Some(machine);
    }
    if !skipping {
      output.push_str(line);
      output.push('\n');
    }
  }

  let mut file = fs::File::create(path).with_context(|| format!("Failed to open {} for writing", path.display()))?;
  file.write_all(output.as_bytes())?;
  writeln!(file, "machine {machine}")?;
  writeln!(file, "  login {username}")?;
  writeln!(file, "  password {password}")?;

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
      .with_context(|| format!("Failed to restrict permissions on {}", path.display()))?;
  }

  Ok(())
}

/// Removes protocol prefixes and trailing slashes from a host URL.
///
/// # Examples
///
/// ```
/// use octocheck_core::creds::netrc::normalize_host;
///
/// assert_eq!(normalize_host("https://github.example.com/"), "github.example.com");
/// assert_eq!(normalize_host("github.com"), "github.com");
/// ```
pub fn normalize_host(raw_host: &str) -> String {
  raw_host
    .trim_start_matches("https://")
    .trim_start_matches("http://")
    .trim_end_matches('/')
    .to_string()
}

/// Maps a REST API base URL onto the `.netrc` machine name holding its token.
///
/// `https://api.github.com` maps to `github.com`; GitHub Enterprise URLs of the
/// form `https://host/api/v3` map to `host`. Anything else maps to its host.
pub fn machine_for_api_url(api_url: &str) -> String {
  let host = normalize_host(api_url);
  let host = host.split('/').next().unwrap_or_default();
  match host.strip_prefix("api.") {
    Some(web_host) => web_host.to_string(),
    None => host.to_string(),
  }
}
