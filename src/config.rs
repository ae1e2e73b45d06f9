use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, PatcherError, Result},
    frame::{Backdrop, DetectionParams, FrameSettings},
    patcher::PatchJob,
    raster::{FitMode, Rect},
};

/// Billboard rectangles of the stock spritesheet
const DEFAULT_BILLBOARDS: [(&str, Rect); 9] = [
    ("BILLBOARD01", Rect::new(625, 375, 300, 170)),
    ("BILLBOARD02", Rect::new(245, 1262, 215, 220)),
    ("BILLBOARD03", Rect::new(5, 1262, 230, 220)),
    ("BILLBOARD04", Rect::new(1205, 310, 268, 170)),
    ("BILLBOARD05", Rect::new(5, 897, 298, 190)),
    ("BILLBOARD06", Rect::new(488, 555, 298, 190)),
    ("BILLBOARD07", Rect::new(313, 897, 298, 190)),
    ("BILLBOARD08", Rect::new(230, 5, 385, 265)),
    ("BILLBOARD09", Rect::new(150, 555, 328, 282)),
];

/// Main configuration for the billboard patcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Billboard name to atlas rectangle
    pub billboards: BTreeMap<String, Rect>,

    /// Frame style and thickness
    pub frame: FrameSettings,

    /// Border detection tunables
    pub detection: DetectionParams,

    /// How artwork is fitted into the interior
    pub fit: FitConfig,

    /// Atlas files to patch
    pub targets: TargetConfig,

    /// Content to billboard assignments
    pub jobs: Vec<PatchJob>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            billboards: DEFAULT_BILLBOARDS
                .iter()
                .map(|(name, rect)| (name.to_string(), *rect))
                .collect(),
            frame: FrameSettings::default(),
            detection: DetectionParams::default(),
            fit: FitConfig::default(),
            targets: TargetConfig::default(),
            jobs: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.message().to_string(),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up a billboard rectangle by name
    pub fn billboard(&self, name: &str) -> Result<Rect> {
        self.billboards
            .get(name)
            .copied()
            .ok_or_else(|| PatcherError::UnknownTarget { name: name.to_string() })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_billboards()?;
        self.validate_detection()?;
        Ok(())
    }

    fn validate_billboards(&self) -> Result<()> {
        for (name, rect) in &self.billboards {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "billboards".to_string(),
                    value: format!("empty name for {}", rect),
                }.into());
            }

            if rect.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("billboards.{}", name),
                    value: rect.to_string(),
                }.into());
            }
        }

        let entries: Vec<(&String, &Rect)> = self.billboards.iter().collect();
        for (i, (name, rect)) in entries.iter().enumerate() {
            for (other_name, other) in &entries[i + 1..] {
                if rect.overlaps(other) {
                    return Err(ConfigError::InvalidValue {
                        key: format!("billboards.{}", name),
                        value: format!("{} overlaps {} ({})", rect, other_name, other),
                    }.into());
                }
            }
        }

        Ok(())
    }

    fn validate_detection(&self) -> Result<()> {
        let detection = &self.detection;

        if detection.min_thickness > detection.max_thickness {
            return Err(ConfigError::InvalidValue {
                key: "detection.thickness_range".to_string(),
                value: format!("{}-{}", detection.min_thickness, detection.max_thickness),
            }.into());
        }

        if detection.scan_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "detection.scan_limit".to_string(),
                value: detection.scan_limit.to_string(),
            }.into());
        }

        Ok(())
    }
}

/// Interior fitting configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Stretch or letterbox
    pub mode: FitMode,

    /// What shows behind transparent artwork
    pub backdrop: Backdrop,
}

/// Atlas targets and where pristine billboard frames live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Atlas files patched in order; missing ones are skipped
    pub atlases: Vec<PathBuf>,

    /// Directory of `<NAME>.png` billboards used as frame references
    pub reference_dir: Option<PathBuf>,

    /// Copy each atlas to a timestamped `.bak` file before overwriting it
    pub backup: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            atlases: vec![
                PathBuf::from("game/assets/sprites.png"),
                PathBuf::from("public/game/assets/images/sprites.png"),
            ],
            reference_dir: None,
            backup: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Thickness;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.billboards.len(), 9);
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("patcher.toml");

        let mut original_config = Config::default();
        original_config.frame.thickness = Thickness::Fixed(4);
        original_config.targets.reference_dir = Some(PathBuf::from("tools/extracted_billboards"));
        original_config.jobs.push(PatchJob::new("tools/arc.png", "BILLBOARD09"));

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(
            &file_path,
            r#"
[frame]
style = "pixel-art"
thickness = "detect"
color = [90, 90, 90, 255]

[fit]
mode = "letterbox"

[billboards.MAIN]
x = 0
y = 0
width = 64
height = 32

[[jobs]]
content = "ad.png"
billboard = "MAIN"
"#,
        )
        .unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.frame.style, "pixel-art");
        assert_eq!(config.frame.thickness, Thickness::Detect);
        assert_eq!(config.fit.mode, FitMode::Letterbox);
        assert_eq!(config.fit.backdrop, Backdrop::Reference);
        assert_eq!(config.billboards.len(), 1);
        assert_eq!(config.billboard("MAIN").unwrap(), Rect::new(0, 0, 64, 32));
        assert_eq!(config.jobs, vec![PatchJob::new("ad.png", "MAIN")]);
        assert_eq!(config.detection, DetectionParams::default());
    }

    #[test]
    fn test_unknown_billboard() {
        let config = Config::default();
        assert!(matches!(
            config.billboard("BILLBOARD42"),
            Err(PatcherError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn test_overlapping_billboards_rejected() {
        let mut config = Config::default();
        config.billboards.insert("OVERLAP".to_string(), Rect::new(600, 400, 50, 50));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_detection_range() {
        let mut config = Config::default();
        config.detection.min_thickness = 12;
        config.detection.max_thickness = 8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("no/such/patcher.toml");
        assert!(matches!(
            result,
            Err(PatcherError::Config(ConfigError::FileNotFound { .. }))
        ));
    }
}
