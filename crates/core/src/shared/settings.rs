use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    DEFAULT_BLUR_KERNEL, DEFAULT_HSV_LOWER, DEFAULT_HSV_UPPER, DEFAULT_MORPH_KERNEL,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS, MAX_HUE,
};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Color-key thresholds and mask clean-up kernel sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyingSettings {
    pub hsv_lower: [u8; 3],
    pub hsv_upper: [u8; 3],
    pub morph_kernel: usize,
    pub blur_kernel: usize,
}

impl Default for KeyingSettings {
    fn default() -> Self {
        Self {
            hsv_lower: DEFAULT_HSV_LOWER,
            hsv_upper: DEFAULT_HSV_UPPER,
            morph_kernel: DEFAULT_MORPH_KERNEL,
            blur_kernel: DEFAULT_BLUR_KERNEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keying: KeyingSettings,
    pub executor: ExecutorSettings,
}

impl Settings {
    /// Loads settings from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let keying = &self.keying;
        for (name, size) in [
            ("morph_kernel", keying.morph_kernel),
            ("blur_kernel", keying.blur_kernel),
        ] {
            if size == 0 || size % 2 == 0 {
                return Err(SettingsError::Invalid(format!(
                    "{name} must be a positive odd integer, got {size}"
                )));
            }
        }
        if keying.hsv_upper[0] > MAX_HUE {
            return Err(SettingsError::Invalid(format!(
                "hue must be at most {MAX_HUE}, got {}",
                keying.hsv_upper[0]
            )));
        }
        if keying
            .hsv_lower
            .iter()
            .zip(keying.hsv_upper.iter())
            .any(|(lo, hi)| lo > hi)
        {
            return Err(SettingsError::Invalid(format!(
                "hsv_lower {:?} must not exceed hsv_upper {:?}",
                keying.hsv_lower, keying.hsv_upper
            )));
        }
        if self.executor.workers == 0 {
            return Err(SettingsError::Invalid("workers must be at least 1".into()));
        }
        if self.executor.queue_capacity == 0 {
            return Err(SettingsError::Invalid(
                "queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn write_settings(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("settings.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.keying.hsv_lower, [35, 40, 40]);
        assert_eq!(settings.keying.hsv_upper, [85, 255, 255]);
        assert_eq!(settings.keying.morph_kernel, 3);
        assert_eq!(settings.keying.blur_kernel, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), r#"{"executor": {"workers": 4}}"#);
        let settings = Settings::from_path(&path).unwrap();
        assert_eq!(settings.executor.workers, 4);
        assert_eq!(settings.executor.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(settings.keying, KeyingSettings::default());
    }

    #[test]
    fn test_roundtrip_through_json() {
        let mut settings = Settings::default();
        settings.keying.hsv_lower = [40, 60, 60];
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Settings::from_path(Path::new("/nonexistent/settings.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), "{ not json");
        let err = Settings::from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[rstest]
    #[case::even_blur(r#"{"keying": {"blur_kernel": 4}}"#)]
    #[case::zero_morph(r#"{"keying": {"morph_kernel": 0}}"#)]
    #[case::hue_out_of_range(r#"{"keying": {"hsv_upper": [200, 255, 255]}}"#)]
    #[case::inverted_bounds(r#"{"keying": {"hsv_lower": [90, 40, 40]}}"#)]
    #[case::no_workers(r#"{"executor": {"workers": 0}}"#)]
    #[case::no_queue(r#"{"executor": {"queue_capacity": 0}}"#)]
    fn test_invalid_values_rejected(#[case] json: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_settings(dir.path(), json);
        let err = Settings::from_path(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)), "got {err}");
    }
}
