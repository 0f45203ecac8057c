//! Plausibility checks di atas hasil codec
//!
//! Validator tidak merekonstruksi konfigurasi dari checksum. Konfigurasi
//! diperlakukan sebagai vektor opaque; yang dilaporkan hanya jumlahnya.
//! Pengecekan domain [1,118] hanya berlaku untuk layout kanonik dan
//! bersifat non-fatal.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::core::CANONICAL_INDEX;
use crate::error::{Error, Result};
use crate::protocol::DecodedConfiguration;

/// Lowest defined atomic number
pub const MIN_ATOMIC_NUMBER: u32 = 1;
/// Highest defined atomic number (oganesson)
pub const MAX_ATOMIC_NUMBER: u32 = 118;

/// Validator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub atomic_number_min: u32,
    pub atomic_number_max: u32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            atomic_number_min: MIN_ATOMIC_NUMBER,
            atomic_number_max: MAX_ATOMIC_NUMBER,
        }
    }
}

/// Non-fatal diagnostic attached to a successful decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    ImplausibleChecksum { checksum: u32, min: u32, max: u32 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ImplausibleChecksum { checksum, min, max } => write!(
                f,
                "implausible checksum {} (expected {}..={})",
                checksum, min, max
            ),
        }
    }
}

impl From<Warning> for Error {
    fn from(warning: Warning) -> Self {
        match warning {
            Warning::ImplausibleChecksum { checksum, min, max } => {
                Error::ImplausibleChecksum { checksum, min, max }
            }
        }
    }
}

/// Hasil decode: konfigurasi + warning non-fatal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    pub configuration: DecodedConfiguration,
    pub warnings: Vec<Warning>,
}

impl DecodeReport {
    #[inline(always)]
    pub fn is_plausible(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Buang warning, ambil konfigurasinya saja
    pub fn into_configuration(self) -> DecodedConfiguration {
        self.configuration
    }

    /// Untuk caller yang peduli validitas fisik: warning pertama jadi error.
    ///
    /// # Errors
    /// `ImplausibleChecksum` jika validator memberi warning.
    pub fn into_strict(self) -> Result<DecodedConfiguration> {
        match self.warnings.first() {
            Some(&warning) => Err(warning.into()),
            None => Ok(self.configuration),
        }
    }
}

/// Advisory domain checks
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Checksum check for a layout/sum pair. Only the canonical layout has
    /// a known domain bound.
    #[inline(always)]
    pub fn check_checksum(&self, layout_index: u8, checksum: u32) -> Option<Warning> {
        if layout_index != CANONICAL_INDEX {
            return None;
        }
        let ValidatorConfig {
            atomic_number_min: min,
            atomic_number_max: max,
        } = self.config;
        if (min..=max).contains(&checksum) {
            None
        } else {
            Some(Warning::ImplausibleChecksum { checksum, min, max })
        }
    }

    /// Pre-encode advisory check. Tidak pernah memblokir encode.
    pub fn check_encode(&self, layout_index: u8, values: &[u32]) -> Option<Warning> {
        let checksum = values.iter().sum();
        let warning = self.check_checksum(layout_index, checksum)?;
        warn!(layout = layout_index, checksum, "encoding implausible configuration");
        Some(warning)
    }

    /// Post-decode inspection
    pub fn inspect(&self, configuration: DecodedConfiguration) -> DecodeReport {
        let mut warnings = Vec::new();
        if let Some(warning) =
            self.check_checksum(configuration.layout_index(), configuration.checksum())
        {
            warn!(
                layout = configuration.layout_index(),
                checksum = configuration.checksum(),
                "decoded implausible configuration"
            );
            warnings.push(warning);
        }
        DecodeReport {
            configuration,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_only_for_canonical() {
        let validator = Validator::default();
        assert!(validator.check_checksum(0, 11).is_none());
        assert!(validator.check_checksum(0, 118).is_none());
        assert!(validator.check_checksum(0, 1).is_none());
        assert_eq!(
            validator.check_checksum(0, 0),
            Some(Warning::ImplausibleChecksum {
                checksum: 0,
                min: 1,
                max: 118
            })
        );
        assert!(validator.check_checksum(0, 119).is_some());
        // Layout ekstensi bebas dari heuristik [1,118]
        assert!(validator.check_checksum(3, 0).is_none());
        assert!(validator.check_checksum(3, 400).is_none());
    }

    #[test]
    fn test_custom_config() {
        let validator = Validator::new(ValidatorConfig {
            atomic_number_min: 1,
            atomic_number_max: 20,
        });
        assert!(validator.check_checksum(0, 20).is_none());
        assert!(validator.check_checksum(0, 26).is_some());
    }

    #[test]
    fn test_check_encode_is_advisory() {
        let validator = Validator::default();
        assert!(validator.check_encode(0, &[2, 2, 6, 1]).is_none());
        assert!(validator.check_encode(0, &[15; 10]).is_some());
        assert!(validator.check_encode(1, &[15; 10]).is_none());
    }

    #[test]
    fn test_warning_into_error() {
        let err: Error = Warning::ImplausibleChecksum {
            checksum: 130,
            min: 1,
            max: 118,
        }
        .into();
        assert!(matches!(
            err,
            Error::ImplausibleChecksum { checksum: 130, .. }
        ));
    }
}
