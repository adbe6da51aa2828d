use std::{env, fs, path::Path, path::PathBuf};

use color_eyre::{Result, eyre::WrapErr};
use directories::{BaseDirs, ProjectDirs};
use lazy_static::lazy_static;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::registry::FilterFieldRegistry;

const CONFIG: &str = include_str!("../.config/config.json5");

/// File name looked up in the config dir when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "config.json5";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
    /// User catalog layered over the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub app: AppConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Layer embedded defaults, then `config_path` (or `<config_dir>/config.json5`
    /// when present)
    ///
    /// An explicit path must exist; the discovered one is optional.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        builder = match config_path {
            Some(p) => builder.add_source(
                config::File::from(expand_tilde(p))
                    .format(config::FileFormat::Json5)
                    .required(true),
            ),
            None => builder.add_source(
                config::File::from(config_dir.join(CONFIG_FILE_NAME))
                    .format(config::FileFormat::Json5)
                    .required(false),
            ),
        };

        let cfg: Self = builder.build()?.try_deserialize()?;
        debug!("Loaded config: {:?}", cfg.app);
        Ok(cfg)
    }

    /// Resolved user catalog path; relative paths sit under the config dir
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.app.catalog_path.as_ref().map(|p| {
            let p = expand_tilde(p);
            if p.is_relative() {
                self.app.config_dir.join(p)
            } else {
                p
            }
        })
    }

    /// Built-in catalog with the user catalog (if configured) layered on top
    pub fn load_registry(&self) -> Result<FilterFieldRegistry> {
        let builtin = FilterFieldRegistry::builtin()?;
        let Some(path) = self.catalog_path() else {
            return Ok(builtin);
        };
        let source = fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read catalog {}", path.display()))?;
        let user = FilterFieldRegistry::from_json5(&source)
            .wrap_err_with(|| format!("invalid catalog {}", path.display()))?;
        info!("Layered catalog {} over built-in views", path.display());
        Ok(builtin.merge(user))
    }
}

pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str() {
        if s.starts_with('~') {
            if let Some(base) = BaseDirs::new() {
                return PathBuf::from(s.replacen('~', base.home_dir().to_str().unwrap_or(""), 1));
            }
        }
    }
    path.to_path_buf()
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "filterdeck", env!("CARGO_PKG_NAME"))
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}
