//! Device configuration
//!
//! Runtime knobs for [`crate::device::MonomeDevice`]. Nothing here is
//! persisted; the firmware builds a config at startup.

use monome_protocol::Rotation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

/// Default bound on bytes drained by one poll
pub const DEFAULT_MAX_POLL_BYTES: usize = 256;

/// Default number of quiet polls before a partial frame is dropped
pub const DEFAULT_STALE_POLL_LIMIT: u8 = 2;

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Grid mounting rotation applied at construction
    pub rotation: Rotation,
    /// Most bytes a single poll will read from the transport
    pub max_poll_bytes: usize,
    /// Consecutive empty polls after which a half-received frame is dropped
    pub stale_poll_limit: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            rotation: Rotation::Deg0,
            max_poll_bytes: DEFAULT_MAX_POLL_BYTES,
            stale_poll_limit: DEFAULT_STALE_POLL_LIMIT,
        }
    }
}

impl DeviceConfig {
    /// Reject settings that would stop polling from making progress
    pub fn validate(&self) -> Result<(), DeviceError> {
        if self.max_poll_bytes == 0 || self.stale_poll_limit == 0 {
            return Err(DeviceError::InvalidSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(DeviceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let config = DeviceConfig {
            max_poll_bytes: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(DeviceError::InvalidSize));

        let config = DeviceConfig {
            stale_poll_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(DeviceError::InvalidSize));
    }
}
