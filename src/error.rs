/// Error types shared across the library.
///
/// Programmer errors (contract violations) and resource problems are kept
/// apart: the former mean a caller broke an invariant, the latter are
/// expected at load time and are logged and skipped.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("rectangle sides must be between 1 and {max} pixels, got {width}x{height}", max = crate::entities::MAX_EXTENT)]
    Malformed { width: i64, height: i64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error("`{field}` must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("`{field}` must be a finite, non-negative number, got {value}")]
    BadSpeed { field: &'static str, value: f32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("an action sequence needs at least one step")]
    Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("entity has no projectile template and cannot fire")]
    NoProjectileTemplate,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("unknown texture `{0}`")]
    UnknownTexture(String),
    #[error("unknown bullet template `{0}`")]
    UnknownBullet(String),
    #[error("unknown enemy template `{0}`")]
    UnknownEnemy(String),
    #[error("template `{name}`: {source}")]
    BadGeometry {
        name: String,
        #[source]
        source: GeometryError,
    },
    #[error("template `{name}`: {source}")]
    BadSequence {
        name: String,
        #[source]
        source: SequenceError,
    },
}
