//! Runtime settings.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML file
//! (`--config`, else `<data_dir>/fakturace.toml`), then `FAKTURACE_*`
//! environment variables with `__` separating nested keys
//! (`FAKTURACE_ISSUER__COMPANY`).

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DateResolution, Result};
use crate::pohoda::{DataPackOptions, Identity};

pub const ENV_PREFIX: &str = "FAKTURACE";
pub const CONFIG_FILE_NAME: &str = "fakturace.toml";

/// `dat:dataPack` metadata that does not change between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPackSettings {
    pub id_prefix: String,
    pub application: String,
    /// Free text; the generation time is appended.
    pub note: String,
}

impl Default for DataPackSettings {
    fn default() -> Self {
        Self {
            id_prefix: "neven_cz".to_string(),
            application: "StwTest (neven_cz)".to_string(),
            note: "Exported by fakturace".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
    pub db_dir: Option<PathBuf>,
    pub db_file: String,
    pub debug: bool,
    pub date_resolution: DateResolution,
    pub issuer: Identity,
    pub data_pack: DataPackSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            input_dir: None,
            output_dir: None,
            logs_dir: None,
            db_dir: None,
            db_file: "abra_invoices.sqlite".to_string(),
            debug: false,
            date_resolution: DateResolution::default(),
            issuer: default_issuer(),
            data_pack: DataPackSettings::default(),
        }
    }
}

/// The operating company, written as `inv:myIdentity` on every invoice.
pub fn default_issuer() -> Identity {
    Identity {
        company: Some("Neven 7 s.r.o.".to_string()),
        name: None,
        city: Some("Brno".to_string()),
        street: Some("Zavřená 27".to_string()),
        zip: Some("634 00".to_string()),
        ico: Some("29318513".to_string()),
        dic: Some("CZ12345678".to_string()),
        country: None,
        phone: Some("CZ29318513".to_string()),
        email: Some("info@neven.cz".to_string()),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fakturace")
}

/// `FAKTURACE_DATA_DIR`, `FAKTURACE_ISSUER__COMPANY`, ...
pub fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

impl Settings {
    /// Load from the process environment and an optional explicit file.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_file, env_source())
    }

    /// Load with a caller-supplied environment source.
    pub fn load_with_env(config_file: Option<&Path>, env: Environment) -> Result<Self> {
        let (path, required) = match config_file {
            Some(p) => (p.to_path_buf(), true),
            None => {
                // The default file lives under data_dir, which may itself come from the environment.
                let probe: Settings = Config::builder()
                    .add_source(env.clone())
                    .build()?
                    .try_deserialize()?;
                (expand_home(&probe.data_dir).join(CONFIG_FILE_NAME), false)
            }
        };
        debug!(path = %path.display(), required, "loading settings");

        let mut settings: Settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(env)
            .build()?
            .try_deserialize()?;
        settings.data_dir = expand_home(&settings.data_dir);
        Ok(settings)
    }

    pub fn input_dir(&self) -> PathBuf {
        self.dir_or(&self.input_dir, "input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir_or(&self.output_dir, "output")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.dir_or(&self.logs_dir, "logs")
    }

    pub fn db_dir(&self) -> PathBuf {
        self.dir_or(&self.db_dir, "db")
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir().join(&self.db_file)
    }

    /// Create the data directory tree.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            self.data_dir.clone(),
            self.input_dir(),
            self.output_dir(),
            self.logs_dir(),
            self.db_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Data-pack attributes stamped with `generated_at`.
    pub fn data_pack_options(&self, generated_at: NaiveDateTime) -> DataPackOptions {
        DataPackOptions {
            ico: self.issuer.ico.clone().unwrap_or_default(),
            application: self.data_pack.application.clone(),
            id_prefix: self.data_pack.id_prefix.clone(),
            note: format!("{} on {}", self.data_pack.note, generated_at.format("%Y-%m-%d %H:%M:%S")),
            generated_at,
        }
    }

    fn dir_or(&self, explicit: &Option<PathBuf>, name: &str) -> PathBuf {
        explicit
            .as_deref()
            .map(expand_home)
            .unwrap_or_else(|| self.data_dir.join(name))
    }
}
