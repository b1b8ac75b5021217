//! Runtime configuration.
//!
//! Read from a TOML file (`--config`, default `duet.toml`, optional) layered
//! under `DUET_*` environment variables. `DUET_ITEMS` and `DUET_RETIRED` are
//! comma-separated lists.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use duet_api::AuthConfig;
use duet_core::catalog::Catalog;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  pub log_path:           PathBuf,
  pub host:               String,
  pub port:               u16,
  /// Catalog in display order; duplicates and blanks are dropped on load.
  pub items:              Vec<String>,
  #[serde(default)]
  pub retired:            Vec<String>,
  pub auth_username:      Option<String>,
  /// argon2 PHC string, see `duet hash-password`.
  pub auth_password_hash: Option<String>,
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings: Self = config::Config::builder()
      .set_default("log_path", "~/.local/share/duet/answers.db")?
      .set_default("host", "127.0.0.1")?
      .set_default("port", 5240)?
      .set_default("items", Vec::<String>::new())?
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("DUET")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("items")
          .with_list_parse_key("retired"),
      )
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise Settings")?;

    Ok(Self { log_path: expand_tilde(&settings.log_path), ..settings })
  }

  /// The configured catalog with `retired` already applied.
  pub fn catalog(&self) -> Catalog {
    let mut catalog = Catalog::load(&self.items);
    catalog.retire(&self.retired);
    catalog
  }

  /// Credentials for the HTTP API, if both halves are configured.
  pub fn auth(&self) -> Option<AuthConfig> {
    match (&self.auth_username, &self.auth_password_hash) {
      (Some(username), Some(password_hash)) => Some(AuthConfig {
        username:      username.clone(),
        password_hash: password_hash.clone(),
      }),
      _ => None,
    }
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
