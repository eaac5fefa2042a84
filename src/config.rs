//! Scene configuration.
//!
//! Every setting has a default, so an empty TOML file (or no file at all) is a
//! valid configuration. Colors and shapes are kept as strings here and parsed
//! by [`SceneConfig::validate`], which is also where numeric ranges are
//! checked.
//!
//! ```toml
//! color = "#ff0055"
//! shape = "star"
//! particle_count = 4000
//! seed = 7
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ConfigError;
use crate::field::{Material, DEFAULT_PARTICLE_COUNT, DEFAULT_RADIUS};
use crate::visuals::{ParticleShape, VisualConfig};

fn default_color() -> String {
    Rgb::default().to_string()
}

fn default_shape() -> String {
    ParticleShape::default().id().to_string()
}

fn default_background() -> String {
    "#050505".into()
}

/// Complete viewer configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Particle color as a CSS string.
    pub color: String,
    /// Particle shape id or label.
    pub shape: String,
    pub particle_count: u32,
    /// Radius of the settled sphere.
    pub radius: f32,
    /// Layout seed. Unset means a fresh layout every run.
    pub seed: Option<u64>,
    pub point_size: f32,
    pub opacity: f32,
    /// Idle spin while settled.
    pub rotation_speed_settled: f32,
    /// Idle spin while dispersed.
    pub rotation_speed_dispersed: f32,
    pub camera_distance: f32,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Density of the exponential-squared fog. Zero disables it.
    pub fog_density: f32,
    /// Clear and fog color as a CSS string.
    pub background: String,
    pub fullscreen: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let material = Material::default();
        Self {
            color: default_color(),
            shape: default_shape(),
            particle_count: DEFAULT_PARTICLE_COUNT,
            radius: DEFAULT_RADIUS,
            seed: None,
            point_size: material.point_size,
            opacity: material.opacity,
            rotation_speed_settled: 1.0,
            rotation_speed_dispersed: 0.2,
            camera_distance: 50.0,
            fov_deg: 75.0,
            fog_density: 0.002,
            background: default_background(),
            fullscreen: false,
            width: 1280,
            height: 720,
        }
    }
}

impl SceneConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> String {
        // Every field is a plain scalar or string, so this cannot fail.
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Check colors, shape and numeric ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.color_rgb()?;
        self.background_rgb()?;
        self.particle_shape()?;

        fn positive(key: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    key,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }

        if self.particle_count == 0 {
            return Err(ConfigError::Invalid {
                key: "particle_count",
                reason: "must be greater than zero".into(),
            });
        }
        positive("radius", self.radius)?;
        positive("point_size", self.point_size)?;
        positive("camera_distance", self.camera_distance)?;
        if !(self.opacity.is_finite() && (0.0..=1.0).contains(&self.opacity)) {
            return Err(ConfigError::Invalid {
                key: "opacity",
                reason: format!("must be between 0 and 1, got {}", self.opacity),
            });
        }
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(ConfigError::Invalid {
                key: "fov_deg",
                reason: format!("must be between 0 and 180 degrees, got {}", self.fov_deg),
            });
        }
        if !(self.fog_density.is_finite() && self.fog_density >= 0.0) {
            return Err(ConfigError::Invalid {
                key: "fog_density",
                reason: format!("must not be negative, got {}", self.fog_density),
            });
        }
        for (key, speed) in [
            ("rotation_speed_settled", self.rotation_speed_settled),
            ("rotation_speed_dispersed", self.rotation_speed_dispersed),
        ] {
            if !speed.is_finite() {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be finite".into(),
                });
            }
        }
        Ok(())
    }

    pub fn color_rgb(&self) -> Result<Rgb, ConfigError> {
        Ok(self.color.parse()?)
    }

    pub fn background_rgb(&self) -> Result<Rgb, ConfigError> {
        Ok(self.background.parse()?)
    }

    pub fn particle_shape(&self) -> Result<ParticleShape, ConfigError> {
        self.shape.parse().map_err(ConfigError::Shape)
    }

    /// Initial appearance.
    pub fn visual_config(&self) -> Result<VisualConfig, ConfigError> {
        Ok(VisualConfig {
            color: self.color_rgb()?,
            shape: self.particle_shape()?,
        })
    }

    pub fn material(&self) -> Material {
        Material {
            point_size: self.point_size,
            opacity: self.opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.color_rgb().unwrap(), Rgb::new(0x00, 0xf3, 0xff));
        assert_eq!(config.particle_shape().unwrap(), ParticleShape::Sphere);
        assert_eq!(config.particle_count, 2000);
        assert_eq!(config.radius, 14.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(SceneConfig::from_toml_str("").unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = SceneConfig::from_toml_str(
            r#"
            color = "rgb(255, 0, 85)"
            shape = "Snow"
            seed = 9
            "#,
        )
        .unwrap();
        let visuals = config.visual_config().unwrap();
        assert_eq!(visuals.color, Rgb::new(255, 0, 85));
        assert_eq!(visuals.shape, ParticleShape::Snowflake);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.fov_deg, 75.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SceneConfig::from_toml_str("shape = \"cube\""),
            Err(ConfigError::Shape(s)) if s == "cube"
        ));
        assert!(matches!(
            SceneConfig::from_toml_str("color = \"#12\""),
            Err(ConfigError::Color(_))
        ));
        assert!(matches!(
            SceneConfig::from_toml_str("particle_count = 0"),
            Err(ConfigError::Invalid { key: "particle_count", .. })
        ));
        assert!(matches!(
            SceneConfig::from_toml_str("opacity = 1.5"),
            Err(ConfigError::Invalid { key: "opacity", .. })
        ));
        assert!(matches!(
            SceneConfig::from_toml_str("unknown_key = 1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_and_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut config = SceneConfig::default();
        config.shape = "petal".into();
        config.particle_count = 500;
        file.write_all(config.to_toml_string().as_bytes()).unwrap();

        let loaded = SceneConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SceneConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
