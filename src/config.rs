use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use crate::diff::validate_threshold;
use crate::grid::GridSpec;
use crate::text::DEFAULT_MIN_CONFIDENCE;

/// Tunables for tiling, change detection and the capture loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    pub grid: GridSpec,

    /// Tiles with a fingerprint distance above this are reported as changed
    pub threshold: f64,

    /// OCR matches below this confidence (0-100) are discarded
    pub min_ocr_confidence: f32,

    pub capture_interval_secs: u64,
    pub capture_timeout_secs: u64,

    /// Minimum gap between two OCR passes
    pub ocr_cooldown_secs: u64,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            threshold: 0.1,
            min_ocr_confidence: DEFAULT_MIN_CONFIDENCE,
            capture_interval_secs: 5,
            capture_timeout_secs: 10,
            ocr_cooldown_secs: 20,
        }
    }
}

impl TileConfig {
    pub fn validate(&self) -> Result<()> {
        self.grid.validate().context("invalid grid settings")?;
        validate_threshold(self.threshold).context("invalid diff threshold")?;
        if !(0.0..=100.0).contains(&self.min_ocr_confidence) {
            anyhow::bail!(
                "min_ocr_confidence must be within [0, 100], got {}",
                self.min_ocr_confidence
            );
        }
        if self.capture_interval_secs == 0 {
            anyhow::bail!("capture_interval_secs must be > 0");
        }
        if self.capture_timeout_secs == 0 {
            anyhow::bail!("capture_timeout_secs must be > 0");
        }
        Ok(())
    }

    pub fn capture_interval(&self) -> Duration {
        Duration::from_secs(self.capture_interval_secs)
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_secs(self.capture_timeout_secs)
    }

    pub fn ocr_cooldown(&self) -> Duration {
        Duration::from_secs(self.ocr_cooldown_secs)
    }
}

/// JSON-backed settings file holding a [`TileConfig`].
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<TileConfig>,
}

impl SettingsStore {
    /// Load settings from `path`. A missing, unreadable-as-JSON or invalid
    /// file yields defaults; the file is only written on [`Self::update`].
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str::<TileConfig>(&contents)
                .ok()
                .filter(|config| config.validate().is_ok())
                .unwrap_or_default()
        } else {
            TileConfig::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn config(&self) -> TileConfig {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Validate, store and persist a new config. Invalid configs are
    /// rejected and leave both memory and disk untouched.
    pub fn update(&self, config: TileConfig) -> Result<()> {
        config.validate()?;
        let mut guard = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.persist(&config)?;
        *guard = config;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: TileConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        data.validate()?;
        let mut guard = self
            .data
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &TileConfig) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
