use std::path::{Path, PathBuf};

use glam::Vec2;
use image::GenericImageView;
use serde::Deserialize;

use crate::grid::WalkableGrid;
use crate::types::{
    DEFAULT_FREE_THRESH, DEFAULT_OCCUPIED_THRESH, FREE, MapInfo, OCCUPIED, RdwError, UNKNOWN,
};

/// Map description in the usual `map.yaml` + image layout: dark pixels are
/// blocked, light pixels are walkable.
#[derive(Debug, Deserialize)]
struct WalkableMapMetadata {
    image: String,
    resolution: f32,
    /// `[x, y]` or `[x, y, yaw]`; yaw is ignored.
    origin: Vec<f32>,
    #[serde(
        default = "default_occupied_thresh",
        deserialize_with = "deserialize_threshold"
    )]
    occupied_thresh: f32,
    #[serde(
        default = "default_free_thresh",
        deserialize_with = "deserialize_threshold"
    )]
    free_thresh: f32,
    #[serde(default = "default_negate")]
    negate: Negate,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Negate {
    Bool(bool),
    Int(i32),
}

impl Negate {
    fn is_negated(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
        }
    }
}

fn default_negate() -> Negate {
    Negate::Bool(false)
}

fn default_occupied_thresh() -> f32 {
    DEFAULT_OCCUPIED_THRESH
}

fn default_free_thresh() -> f32 {
    DEFAULT_FREE_THRESH
}

fn deserialize_threshold<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = f32::deserialize(deserializer)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(serde::de::Error::custom(
            "thresholds must be in the range [0.0, 1.0]",
        ))
    }
}

/// Load a walkable-surface map from its YAML description.
pub fn load_walkable_map(yaml_path: impl AsRef<Path>) -> Result<WalkableGrid, RdwError> {
    let yaml_path = yaml_path.as_ref();
    let yaml_str = std::fs::read_to_string(yaml_path)?;
    let metadata: WalkableMapMetadata = serde_yaml::from_str(&yaml_str)?;

    if metadata.occupied_thresh <= metadata.free_thresh {
        return Err(RdwError::InvalidConfig(
            "occupied_thresh must be greater than free_thresh".to_string(),
        ));
    }
    if metadata.resolution <= 0.0 {
        return Err(RdwError::InvalidConfig(format!(
            "resolution must be positive, got {}",
            metadata.resolution
        )));
    }
    let origin = match metadata.origin.as_slice() {
        [x, y] | [x, y, _] => Vec2::new(*x, *y),
        other => {
            return Err(RdwError::InvalidConfig(format!(
                "origin must have 2 or 3 components, got {}",
                other.len()
            )));
        }
    };

    let negate = metadata.negate.is_negated();
    let image_path = resolve_image_path(yaml_path, &metadata.image);
    let image = image::open(&image_path)?;
    let (width, height) = image.dimensions();
    let rgba = image.to_rgba8();

    let mut data = vec![UNKNOWN; (width as usize) * (height as usize)];

    for y in 0..height {
        for x in 0..width {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            if a == 0 {
                continue;
            }
            let lightness = (r as f32 + g as f32 + b as f32) / (3.0 * 255.0);
            let mut darkness = 1.0 - lightness;
            if negate {
                darkness = 1.0 - darkness;
            }

            let value = if darkness >= metadata.occupied_thresh {
                OCCUPIED
            } else if darkness <= metadata.free_thresh {
                FREE
            } else {
                UNKNOWN
            };

            // Image rows run top-down, map rows bottom-up.
            let grid_y = height - y - 1;
            let idx = (grid_y as usize) * (width as usize) + (x as usize);
            data[idx] = value;
        }
    }

    let info = MapInfo {
        width,
        height,
        resolution: metadata.resolution,
        origin,
    };

    WalkableGrid::new(info, data)
}

fn resolve_image_path(yaml_path: &Path, image_ref: &str) -> PathBuf {
    let image_path = PathBuf::from(image_ref);
    if image_path.is_absolute() {
        return image_path;
    }

    match yaml_path.parent() {
        Some(parent) => parent.join(image_path),
        None => image_path,
    }
}
