//! Server configuration.
//!
//! Read from a TOML file (default `config.toml`, optional) and then from
//! `ROOST_*` environment variables, which win. Every key has a default, so
//! the server starts with no configuration at all.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// SQLite file. Unset means an in-memory store that dies with the process.
  #[serde(default)]
  pub store_path:          Option<PathBuf>,
  /// Load the sample listings into an empty catalog at startup.
  #[serde(default = "default_seed")]
  pub seed_sample_catalog: bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_seed() -> bool { true }

impl ServerConfig {
  /// Layer `path` (if it exists) under the `ROOST_*` environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROOST"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> Option<PathBuf> {
    self.store_path.as_deref().map(expand_tilde)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("definitely/not/here.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
    assert!(cfg.seed_sample_catalog);
    assert!(cfg.resolved_store_path().is_none());
  }

  #[test]
  fn absolute_paths_are_left_alone() {
    assert_eq!(
      expand_tilde(Path::new("/var/lib/roost.db")),
      PathBuf::from("/var/lib/roost.db")
    );
  }
}
