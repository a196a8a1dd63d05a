use thiserror::Error;

/// Default maximum number of distinct stop ids.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Default maximum length of a single CSV field, in bytes.
pub const DEFAULT_MAX_FIELD_LEN: usize = 100;

/// Upper bound on `capacity`. Keeps the `capacity²` matrix slots
/// addressable on 32-bit targets and the matrix within a few GiB.
pub const MAX_CAPACITY: usize = 46_340;

pub const MAX_FIELD_LEN_LIMIT: usize = 4096;

/// Sizing for a transit network session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Valid stop ids are `0..capacity`. The weight matrix holds
    /// `capacity * capacity` slots, so this drives memory use directly.
    pub capacity: usize,
    /// Longer fields are truncated, not rejected.
    pub max_field_len: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{setting} must be between {min} and {max}, got {value}")]
pub struct ConfigError {
    pub setting: &'static str,
    pub value: usize,
    pub min: usize,
    pub max: usize,
}

impl NetworkConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("capacity", self.capacity, 1, MAX_CAPACITY)?;
        check_range("max_field_len", self.max_field_len, 1, MAX_FIELD_LEN_LIMIT)?;
        Ok(())
    }
}

fn check_range(
    setting: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError {
            setting,
            value,
            min,
            max,
        });
    }
    Ok(())
}
