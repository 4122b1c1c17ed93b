//! MDIO (Management Data Input/Output) HAL
//!
//! PHYs are managed over a Clause 22 MDIO bus. [`MdioBus`] is the seam the
//! PHY layer talks through; [`SmiMdio`] drives the DesignWare MAC's
//! Station Management Interface through a [`RegisterBus`] window.

use embedded_hal::delay::DelayNs;

use crate::driver::error::{ConfigError, HwError, Result};
use crate::hal::register::RegisterBus;
use crate::internal::constants::{MDIO_POLL_INTERVAL_US, MDIO_TIMEOUT_US};
use crate::internal::phy_regs::PHY_ADDR_MAX;
use crate::internal::register::dwmac::{GMACMIIADDR_OFFSET, GMACMIIDATA_OFFSET};

// =============================================================================
// SMI Register Bits
// =============================================================================

/// MII Busy
pub const GMACMIIADDR_GB: u32 = 1 << 0;
/// MII Write
pub const GMACMIIADDR_GW: u32 = 1 << 1;
/// CSR Clock Range shift
pub const GMACMIIADDR_CR_SHIFT: u32 = 2;
/// CSR Clock Range mask
pub const GMACMIIADDR_CR_MASK: u32 = 0xF << 2;
/// MII Register address shift
pub const GMACMIIADDR_GR_SHIFT: u32 = 6;
/// MII Register address mask (5 bits)
pub const GMACMIIADDR_GR_MASK: u32 = 0x1F << 6;
/// Physical Layer Address shift
pub const GMACMIIADDR_PA_SHIFT: u32 = 11;
/// Physical Layer Address mask (5 bits)
pub const GMACMIIADDR_PA_MASK: u32 = 0x1F << 11;

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;

/// MDC clock divider values based on the CSR clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MdcClockDivider {
    /// Clock/42 (60-100 MHz)
    Div42 = 0,
    /// Clock/62 (100-150 MHz)
    Div62 = 1,
    /// Clock/16 (20-35 MHz)
    Div16 = 2,
    /// Clock/26 (35-60 MHz)
    Div26 = 3,
    /// Clock/102 (150-250 MHz)
    #[default]
    Div102 = 4,
    /// Clock/124 (250-300 MHz)
    Div124 = 5,
}

impl MdcClockDivider {
    /// Get the divider for a CSR clock frequency
    ///
    /// The MDC clock must not exceed 2.5 MHz per IEEE 802.3.
    pub const fn from_csr_clock_hz(csr_clk_hz: u32) -> Self {
        if csr_clk_hz < 35_000_000 {
            Self::Div16
        } else if csr_clk_hz < 60_000_000 {
            Self::Div26
        } else if csr_clk_hz < 100_000_000 {
            Self::Div42
        } else if csr_clk_hz < 150_000_000 {
            Self::Div62
        } else if csr_clk_hz < 250_000_000 {
            Self::Div102
        } else {
            Self::Div124
        }
    }

    /// Get the divider value for register programming
    pub const fn to_reg_value(self) -> u32 {
        self as u32
    }
}

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// Implemented by SMI controllers, bit-banged buses and test mocks alike.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if the MDIO bus is busy
    fn is_busy(&mut self) -> bool;
}

// =============================================================================
// DesignWare SMI Controller
// =============================================================================

/// MDIO over the DWMAC Station Management Interface
///
/// Owns its own register window. With [`Mmio`](crate::hal::register::Mmio)
/// this is a copy of the MAC window handed to the port; only the MII
/// address and data registers are touched here.
#[derive(Debug)]
pub struct SmiMdio<B: RegisterBus, D: DelayNs> {
    bus: B,
    delay: D,
    clock_divider: MdcClockDivider,
    timeout_us: u32,
}

impl<B: RegisterBus, D: DelayNs> SmiMdio<B, D> {
    /// Create a new SMI controller
    pub fn new(bus: B, delay: D) -> Self {
        Self {
            bus,
            delay,
            clock_divider: MdcClockDivider::default(),
            timeout_us: MDIO_TIMEOUT_US,
        }
    }

    /// Use a specific MDC clock divider
    #[must_use]
    pub fn with_clock_divider(mut self, divider: MdcClockDivider) -> Self {
        self.clock_divider = divider;
        self
    }

    /// Set the operation timeout
    pub fn set_timeout_us(&mut self, timeout_us: u32) {
        self.timeout_us = timeout_us;
    }

    /// Release the register window and delay provider
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    fn wait_not_busy(&mut self) -> Result<()> {
        let mut elapsed = 0u32;
        while self.bus.read32(GMACMIIADDR_OFFSET) & GMACMIIADDR_GB != 0 {
            if elapsed >= self.timeout_us {
                #[cfg(feature = "defmt")]
                defmt::warn!("SMI busy for {} us", elapsed);
                return Err(HwError::Timeout.into());
            }
            self.delay.delay_us(MDIO_POLL_INTERVAL_US);
            elapsed += MDIO_POLL_INTERVAL_US;
        }
        Ok(())
    }

    fn build_mii_addr(&self, phy_addr: u8, reg_addr: u8, is_write: bool) -> u32 {
        let mut addr = ((phy_addr as u32) << GMACMIIADDR_PA_SHIFT) & GMACMIIADDR_PA_MASK;
        addr |= ((reg_addr as u32) << GMACMIIADDR_GR_SHIFT) & GMACMIIADDR_GR_MASK;
        addr |= (self.clock_divider.to_reg_value() << GMACMIIADDR_CR_SHIFT) & GMACMIIADDR_CR_MASK;
        if is_write {
            addr |= GMACMIIADDR_GW;
        }
        // Busy starts the transaction
        addr | GMACMIIADDR_GB
    }

    fn check_addresses(phy_addr: u8, reg_addr: u8) -> Result<()> {
        if phy_addr > PHY_ADDR_MAX {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        if reg_addr > MAX_REG_ADDR {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        Ok(())
    }
}

impl<B: RegisterBus, D: DelayNs> MdioBus for SmiMdio<B, D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        Self::check_addresses(phy_addr, reg_addr)?;
        self.wait_not_busy()?;

        let addr = self.build_mii_addr(phy_addr, reg_addr, false);
        self.bus.write32(GMACMIIADDR_OFFSET, addr);
        self.wait_not_busy()?;

        Ok((self.bus.read32(GMACMIIDATA_OFFSET) & 0xFFFF) as u16)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        Self::check_addresses(phy_addr, reg_addr)?;
        self.wait_not_busy()?;

        // Data first, the address write triggers the transaction
        self.bus.write32(GMACMIIDATA_OFFSET, value as u32);
        let addr = self.build_mii_addr(phy_addr, reg_addr, true);
        self.bus.write32(GMACMIIADDR_OFFSET, addr);

        self.wait_not_busy()
    }

    fn is_busy(&mut self) -> bool {
        self.bus.read32(GMACMIIADDR_OFFSET) & GMACMIIADDR_GB != 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
