//! Error types for the MAC control plane
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Rejected arguments and setup misuse
//! - [`ResourceError`]: Allocation failures
//! - [`HwError`]: Failures reported by the hardware or an operation set
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by the port transactions. Validation errors are always reported before
//! any state changes; hardware errors are reported after rollback.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid argument and setup errors
///
/// A transaction that fails with one of these has not touched the port
/// state or the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Frame size below the minimum PDU
    PduTooSmall,
    /// Frame size above the maximum PDU
    PduTooLarge,
    /// Multicast or zero-OUI station address
    InvalidAddress,
    /// Flow-control flags outside respond/generate
    InvalidFlowControl,
    /// Multicast list longer than the port accepts
    TooManyAddresses,
    /// No operation set matches the device family
    UnsupportedFamily,
    /// An operation set was already selected for this port
    AlreadySelected,
    /// Invalid PHY or PHY register address (must be 0-31)
    InvalidPhyAddress,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::PduTooSmall => "PDU too small",
            ConfigError::PduTooLarge => "PDU too large",
            ConfigError::InvalidAddress => "invalid station address",
            ConfigError::InvalidFlowControl => "invalid flow control flags",
            ConfigError::TooManyAddresses => "too many multicast addresses",
            ConfigError::UnsupportedFamily => "unsupported device family",
            ConfigError::AlreadySelected => "operation set already selected",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
        }
    }
}

// =============================================================================
// Resource Errors
// =============================================================================

/// Resource exhaustion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResourceError {
    /// Rollback buffer could not be allocated
    OutOfMemory,
}

impl core::fmt::Display for ResourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ResourceError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResourceError::OutOfMemory => "out of memory",
        }
    }
}

// =============================================================================
// Hardware Errors
// =============================================================================

/// Errors reported by an operation set, the PHY or the MDIO bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HwError {
    /// A register did not hold the value written to it
    VerifyFailed,
    /// Operation timed out
    Timeout,
    /// Operation not supported by this hardware
    Unsupported,
    /// No PHY responded at the configured address
    NoPhy,
}

impl core::fmt::Display for HwError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl HwError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            HwError::VerifyFailed => "register verify failed",
            HwError::Timeout => "operation timed out",
            HwError::Unsupported => "not supported by hardware",
            HwError::NoPhy => "no PHY found",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match port.set_pdu(pdu) {
///     Err(Error::Config(ConfigError::PduTooLarge)) => { /* ... */ }
///     Err(Error::Resource(ResourceError::OutOfMemory)) => { /* ... */ }
///     Err(Error::Hw(HwError::VerifyFailed)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Invalid argument or setup error
    Config(ConfigError),
    /// Resource exhaustion
    Resource(ResourceError),
    /// Hardware error
    Hw(HwError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Resource(e) => write!(f, "resource: {}", e.as_str()),
            Error::Hw(e) => write!(f, "hw: {}", e.as_str()),
        }
    }
}

impl core::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ResourceError> for Error {
    fn from(e: ResourceError) -> Self {
        Error::Resource(e)
    }
}

impl From<HwError> for Error {
    fn from(e: HwError) -> Self {
        Error::Hw(e)
    }
}

/// Result type alias for port operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for argument validation
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for operation-set calls
pub type HwResult<T> = core::result::Result<T, HwError>;

// =============================================================================
// Unit Tests
// =============================================================================
