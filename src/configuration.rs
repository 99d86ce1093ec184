use config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

/// Environment variables with this prefix override the file, e.g.
/// `MUCAT__SERVER_SETTINGS__PORT=9000`.
const ENV_PREFIX: &str = "MUCAT";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub catalog_settings: CatalogSettings,
    pub cache_settings: CacheSettings,
    pub server_settings: ServerSettings,
    pub lyrics_settings: LyricsSettings,
}

/// Catalog sources a coordinator can be built from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Cache,
    Itunes,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub base_url: String,
    pub default_limit: usize,
    /// Sources in priority order.
    pub sources: Vec<SourceKind>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "https://itunes.apple.com".to_string(),
            default_limit: 3,
            sources: vec![SourceKind::Cache, SourceKind::Itunes],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub cache_dir: PathBuf,
    pub enabled: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./appcache"),
            enabled: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
    pub port: u16,
    pub page_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8000,
            page_size: 5,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LyricsSettings {
    pub base_url: String,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.lyrics.ovh/v1".to_string(),
        }
    }
}

/// Loads settings from `cfg_file` when it exists, then applies environment
/// overrides. Missing keys fall back to their defaults.
pub fn get_configuration(cfg_file: &Path) -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(cfg_file).format(config::FileFormat::Yaml).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub struct ConfigFolder {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigFolder {
    /// Locates `~/.mucat`, falling back to the working directory when `HOME`
    /// is not set.
    pub fn new() -> Self {
        let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::in_home(Path::new(&home_dir))
    }

    pub fn in_home(home_dir: &Path) -> Self {
        Self {
            config_dir: get_config_dir_name(home_dir),
            config_file: get_config_file_name(home_dir),
        }
    }
}

impl Default for ConfigFolder {
    fn default() -> Self {
        Self::new()
    }
}

fn get_config_dir_name(home_dir: &Path) -> PathBuf {
    home_dir.join(".mucat")
}

fn get_config_file_name(home_dir: &Path) -> PathBuf {
    home_dir.join(".mucat").join("config.yaml")
}

pub fn create_config(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    println!("\x1b[1m\x1b[32mCreating configuration...\x1b[0m");
    let config_dir = cfg_folder.config_dir;

    if cfg_folder.config_file.exists() && !confirm_overwrite()? {
        println!("\x1b[33mOperation cancelled.\x1b[0m");
        return Ok(());
    }

    fs::create_dir_all(&config_dir)?;

    let config_content = include_str!("config_template.yaml");
    fs::write(&cfg_folder.config_file, config_content)?;

    println!("\x1b[32mConfiguration file created at:");
    println!("  -> {}", cfg_folder.config_file.display());
    println!("\x1b[0mEdit it to change the catalog, cache or server settings.");

    Ok(())
}

fn confirm_overwrite() -> Result<bool, io::Error> {
    println!("\x1b[31mThe configuration file already exists.");
    println!("Do you want to overwrite it? Your changes will be lost. (y/N)\x1b[0m");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}
