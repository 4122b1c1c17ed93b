//! Hardware Operation Sets
//!
//! Every MAC family supplies one [`MacOps`] implementation: a stateless set
//! of routines that push the port's staged [`PortConfig`] into the hardware.
//! The port picks exactly one at setup through [`select`], keyed by
//! [`NicFamily`], and dispatches every later transaction through it.
//!
//! # Supported Families
//!
//! | Family | Type tag | Operation set |
//! |--------|----------|---------------|
//! | Synopsys DesignWare GMAC | [`MacType::Dwmac`] | [`DwmacOps`] |
//! | Netcope COMBO-80G / 100G / 100G2 | [`MacType::Ibuf`] | [`IbufOps`] |
//!
//! New families need a new variant here; [`NicFamily::Unknown`] is the
//! only fallback and it is rejected.

pub mod dwmac;
pub mod ibuf;

pub use dwmac::DwmacOps;
pub use ibuf::IbufOps;

use crate::driver::config::{MacStats, RxQueueId};
use crate::driver::error::{ConfigError, ConfigResult, HwError, HwResult};
use crate::driver::port::PortConfig;
use crate::hal::register::RegisterBus;

// =============================================================================
// Family Identification
// =============================================================================

/// PCI vendor ID of Netcope/CESNET COMBO cards
pub const PCI_VENDOR_ID_NETCOPE: u16 = 0x1B26;
/// PCI device ID of the COMBO-80G
pub const PCI_DEVICE_ID_COMBO80G: u16 = 0xCB80;
/// PCI device ID of the COMBO-100G
pub const PCI_DEVICE_ID_COMBO100G: u16 = 0xC1C1;
/// PCI device ID of the COMBO-100G2
pub const PCI_DEVICE_ID_COMBO100G2: u16 = 0xC2C1;

/// Device family, as identified by the bus layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NicFamily {
    /// Synopsys DesignWare GMAC
    Dwmac,
    /// COMBO-80G
    Combo80g,
    /// COMBO-100G
    Combo100g,
    /// COMBO-100G2
    Combo100g2,
    /// Anything else
    Unknown,
}

impl NicFamily {
    /// Identify a PCI function by vendor and device ID
    ///
    /// Platform GMACs are not PCI functions; callers name
    /// [`NicFamily::Dwmac`] directly.
    pub const fn from_pci_id(vendor: u16, device: u16) -> Self {
        if vendor != PCI_VENDOR_ID_NETCOPE {
            return Self::Unknown;
        }
        match device {
            PCI_DEVICE_ID_COMBO80G => Self::Combo80g,
            PCI_DEVICE_ID_COMBO100G => Self::Combo100g,
            PCI_DEVICE_ID_COMBO100G2 => Self::Combo100g2,
            _ => Self::Unknown,
        }
    }
}

/// Type tag of the selected operation set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacType {
    /// DesignWare GMAC register bank
    Dwmac,
    /// COMBO IBUF/OBUF register bank
    Ibuf,
}

// =============================================================================
// Operation Set Trait
// =============================================================================

/// Hardware operation set for one MAC family
///
/// Each routine applies the relevant part of `port` to the hardware behind
/// `bus`. Implementations hold no state of their own; everything they need
/// is in the port configuration or readable from the registers.
///
/// The default-queue and statistics members are optional. A family without
/// the capability keeps the provided defaults.
pub trait MacOps: Sync {
    /// Apply `port.pdu()` as the maximum frame size
    fn pdu_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()>;

    /// Read the maximum frame size currently programmed
    fn pdu_get(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<u32>;

    /// Apply `port.mac_address()` as the station address
    fn addr_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()>;

    /// Apply receive filter, flow control and drain state
    fn reconfigure(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()>;

    /// Report whether the link is up
    fn up(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<bool>;

    /// Apply `port.multicast_list()`
    fn multicast_list_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()>;

    /// Steer unmatched traffic to `rxq`
    fn filter_default_rxq_set(
        &self,
        _bus: &mut dyn RegisterBus,
        _port: &PortConfig,
        _rxq: RxQueueId,
        _using_rss: bool,
    ) -> HwResult<()> {
        Ok(())
    }

    /// Stop steering unmatched traffic
    fn filter_default_rxq_clear(&self, _bus: &mut dyn RegisterBus, _port: &PortConfig) {}

    /// Refresh `stats` from the hardware counters
    fn stats_update(
        &self,
        _bus: &mut dyn RegisterBus,
        _port: &PortConfig,
        _stats: &mut MacStats,
    ) -> HwResult<()> {
        Err(HwError::Unsupported)
    }
}

// =============================================================================
// Selector
// =============================================================================

/// Map a device family to its operation set
///
/// # Errors
/// [`ConfigError::UnsupportedFamily`] for [`NicFamily::Unknown`].
pub fn select(family: NicFamily) -> ConfigResult<(MacType, &'static dyn MacOps)> {
    match family {
        NicFamily::Dwmac => Ok((MacType::Dwmac, &DwmacOps)),
        NicFamily::Combo80g | NicFamily::Combo100g | NicFamily::Combo100g2 => {
            Ok((MacType::Ibuf, &IbufOps))
        }
        NicFamily::Unknown => Err(ConfigError::UnsupportedFamily),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
