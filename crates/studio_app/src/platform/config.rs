use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use studio_engine::{EngineConfig, FetchSettings, SimulationSettings, ThumbnailSource};

const CONFIG_FILENAME: &str = "studio.ron";
const CONFIG_ENV: &str = "STUDIO_CONFIG";

/// Locales offered for the preview's creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateLocale {
    #[default]
    ArEg,
    EnUs,
    EnGb,
    FrFr,
    DeDe,
}

impl DateLocale {
    pub fn chrono_locale(self) -> chrono::Locale {
        match self {
            DateLocale::ArEg => chrono::Locale::ar_EG,
            DateLocale::EnUs => chrono::Locale::en_US,
            DateLocale::EnGb => chrono::Locale::en_GB,
            DateLocale::FrFr => chrono::Locale::fr_FR,
            DateLocale::DeDe => chrono::Locale::de_DE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub locale: DateLocale,
    pub thumbnail_base_url: String,
    pub export_dir: PathBuf,
    pub tick_interval_ms: u64,
    pub progress_step: u8,
    pub simulated_latency_ms: u64,
    pub generation_timeout_ms: u64,
    pub fetch_retries: u32,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        let simulation = SimulationSettings::default();
        Self {
            locale: DateLocale::default(),
            thumbnail_base_url: ThumbnailSource::default().base_url,
            export_dir: PathBuf::from("exports"),
            tick_interval_ms: simulation.tick_interval.as_millis() as u64,
            progress_step: simulation.progress_step,
            simulated_latency_ms: simulation.latency.as_millis() as u64,
            generation_timeout_ms: 15_000,
            fetch_retries: FetchSettings::default().retries,
            log_file: PathBuf::from("studio.log"),
            log_level: "info".to_string(),
        }
    }
}

impl StudioConfig {
    pub fn engine_config(&self) -> EngineConfig {
        let export_dir = if self.export_dir.is_absolute() {
            self.export_dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(&self.export_dir)
        };

        let mut config = EngineConfig::default_with_export(export_dir);
        config.simulation = SimulationSettings {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            progress_step: self.progress_step,
            latency: Duration::from_millis(self.simulated_latency_ms),
        };
        config.thumbnails = ThumbnailSource::with_base(self.thumbnail_base_url.clone());
        config.fetch.retries = self.fetch_retries;
        config.generation_timeout = Duration::from_millis(self.generation_timeout_ms);
        config.created_utc = Arc::new(Utc::now);
        config
    }
}

/// `$STUDIO_CONFIG` if set, otherwise `./studio.ron`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
}

/// Loads the config file. A missing file yields defaults silently; an
/// unreadable or malformed one yields defaults plus a description of the
/// problem, which the caller logs once logging is up.
pub fn load_config(path: &Path) -> (StudioConfig, Option<String>) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return (StudioConfig::default(), None);
        }
        Err(err) => {
            let problem = format!("Failed to read config from {:?}: {}", path, err);
            return (StudioConfig::default(), Some(problem));
        }
    };

    match ron::from_str(&content) {
        Ok(config) => (config, None),
        Err(err) => {
            let problem = format!("Failed to parse config from {:?}: {}", path, err);
            (StudioConfig::default(), Some(problem))
        }
    }
}
