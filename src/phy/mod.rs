//! Ethernet PHY Layer
//!
//! The transaction layer consumes the PHY only through [`PhyOps`]: read
//! what the PHY supports, push a new advertisement, and read back what the
//! link partner advertised. Negotiation itself runs in the PHY.
//!
//! # Implementations
//!
//! - [`Clause22Phy`]: any IEEE 802.3 Clause 22 PHY behind an [`MdioBus`]
//! - [`FixedPhy`]: fixed links without a managed PHY (COMBO cards)
//!
//! [`MdioBus`]: crate::hal::mdio::MdioBus

pub mod clause22;
pub mod fixed;

pub use clause22::Clause22Phy;
pub use fixed::FixedPhy;

use crate::driver::config::PhyCap;
use crate::driver::error::Result;
use crate::driver::port::PortConfig;

// =============================================================================
// PHY Operations Trait
// =============================================================================

/// PHY operations used by the port
pub trait PhyOps {
    /// Apply `port.adv_cap_mask()` and renegotiate
    fn reconfigure(&mut self, port: &PortConfig) -> Result<()>;

    /// Capabilities the PHY supports
    fn capabilities(&mut self) -> Result<PhyCap>;

    /// Link partner advertisement, `None` until negotiation completes
    fn link_partner(&mut self) -> Result<Option<PhyCap>>;
}

impl<T: PhyOps + ?Sized> PhyOps for &mut T {
    fn reconfigure(&mut self, port: &PortConfig) -> Result<()> {
        (**self).reconfigure(port)
    }

    fn capabilities(&mut self) -> Result<PhyCap> {
        (**self).capabilities()
    }

    fn link_partner(&mut self) -> Result<Option<PhyCap>> {
        (**self).link_partner()
    }
}

// =============================================================================
// IEEE 802.3 Helpers
// =============================================================================

/// Helper functions over the standard Clause 22 registers
pub mod ieee802_3 {
    use embedded_hal::delay::DelayNs;

    use crate::driver::config::PhyCap;
    use crate::driver::error::{HwError, Result};
    use crate::hal::mdio::MdioBus;
    use crate::internal::constants::{PHY_RESET_POLL_INTERVAL_US, PHY_RESET_TIMEOUT_MS};
    use crate::internal::phy_regs::{anar, bmcr, bmsr, estatus, gbcr, gbsr, phy_reg};

    /// Read PHY ID from PHYIDR1 and PHYIDR2
    pub fn read_phy_id<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<u32> {
        let id1 = mdio.read(phy_addr, phy_reg::PHYIDR1)? as u32;
        let id2 = mdio.read(phy_addr, phy_reg::PHYIDR2)? as u32;
        Ok((id1 << 16) | id2)
    }

    /// Check that something answers at `phy_addr`
    ///
    /// An empty address reads back all ones (pulled-up MDIO) or all zeros.
    pub fn probe<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<u32> {
        let id = read_phy_id(mdio, phy_addr)?;
        if id == 0 || id == 0xFFFF_FFFF {
            return Err(HwError::NoPhy.into());
        }
        Ok(id)
    }

    /// Perform soft reset via BMCR and wait for the bit to self-clear
    pub fn soft_reset<M: MdioBus, D: DelayNs>(
        mdio: &mut M,
        delay: &mut D,
        phy_addr: u8,
    ) -> Result<()> {
        mdio.write(phy_addr, phy_reg::BMCR, bmcr::RESET)?;

        let max_polls = PHY_RESET_TIMEOUT_MS * 1_000 / PHY_RESET_POLL_INTERVAL_US;
        for _ in 0..max_polls {
            if mdio.read(phy_addr, phy_reg::BMCR)? & bmcr::RESET == 0 {
                return Ok(());
            }
            delay.delay_us(PHY_RESET_POLL_INTERVAL_US);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("PHY {} reset did not complete", phy_addr);
        Err(HwError::Timeout.into())
    }

    /// Read supported capabilities from BMSR and ESTATUS
    pub fn read_capabilities<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<PhyCap> {
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;

        let mut caps = PhyCap::empty();
        caps.set(PhyCap::FDX100, bmsr_val & bmsr::TX_FD_CAPABLE != 0);
        caps.set(PhyCap::HDX100, bmsr_val & bmsr::TX_HD_CAPABLE != 0);
        caps.set(PhyCap::FDX10, bmsr_val & bmsr::T10_FD_CAPABLE != 0);
        caps.set(PhyCap::HDX10, bmsr_val & bmsr::T10_HD_CAPABLE != 0);
        caps.set(PhyCap::AN, bmsr_val & bmsr::AN_ABILITY != 0);

        if bmsr_val & bmsr::ESTATUS != 0 {
            let est = mdio.read(phy_addr, phy_reg::ESTATUS)?;
            caps.set(PhyCap::FDX1000, est & estatus::T1000_FD != 0);
            caps.set(PhyCap::HDX1000, est & estatus::T1000_HD != 0);
        }

        // PAUSE support is a MAC property; the PHY only carries it
        Ok(caps | PhyCap::PAUSE_BITS)
    }

    /// Write ANAR (and GBCR for gigabit PHYs) from an advertisement mask
    pub fn write_advertisement<M: MdioBus>(
        mdio: &mut M,
        phy_addr: u8,
        adv: PhyCap,
        gigabit: bool,
    ) -> Result<()> {
        let mut anar_val = anar::SELECTOR_IEEE802_3;
        if adv.contains(PhyCap::FDX100) {
            anar_val |= anar::TX_FD;
        }
        if adv.contains(PhyCap::HDX100) {
            anar_val |= anar::TX_HD;
        }
        if adv.contains(PhyCap::FDX10) {
            anar_val |= anar::T10_FD;
        }
        if adv.contains(PhyCap::HDX10) {
            anar_val |= anar::T10_HD;
        }
        if adv.contains(PhyCap::PAUSE) {
            anar_val |= anar::PAUSE;
        }
        if adv.contains(PhyCap::ASYM) {
            anar_val |= anar::PAUSE_ASYM;
        }
        mdio.write(phy_addr, phy_reg::ANAR, anar_val)?;

        if gigabit {
            let mut gbcr_val = mdio.read(phy_addr, phy_reg::GBCR)?;
            gbcr_val &= !(gbcr::ADV_1000_FD | gbcr::ADV_1000_HD);
            if adv.contains(PhyCap::FDX1000) {
                gbcr_val |= gbcr::ADV_1000_FD;
            }
            if adv.contains(PhyCap::HDX1000) {
                gbcr_val |= gbcr::ADV_1000_HD;
            }
            mdio.write(phy_addr, phy_reg::GBCR, gbcr_val)?;
        }
        Ok(())
    }

    /// Enable auto-negotiation and restart
    pub fn restart_auto_negotiation<M: MdioBus>(mdio: &mut M, phy_addr: u8) -> Result<()> {
        let bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;
        mdio.write(
            phy_addr,
            phy_reg::BMCR,
            bmcr_val | bmcr::AN_ENABLE | bmcr::AN_RESTART,
        )
    }

    /// Force the best speed and duplex in `adv`, with auto-negotiation off
    pub fn force_link<M: MdioBus>(mdio: &mut M, phy_addr: u8, adv: PhyCap) -> Result<()> {
        let mut bmcr_val = mdio.read(phy_addr, phy_reg::BMCR)?;
        bmcr_val &= !(bmcr::AN_ENABLE | bmcr::SPEED_100 | bmcr::SPEED_1000 | bmcr::DUPLEX_FULL);

        if adv.intersects(PhyCap::FDX1000 | PhyCap::HDX1000) {
            bmcr_val |= bmcr::SPEED_1000;
            if adv.contains(PhyCap::FDX1000) {
                bmcr_val |= bmcr::DUPLEX_FULL;
            }
        } else if adv.intersects(PhyCap::FDX100 | PhyCap::HDX100) {
            bmcr_val |= bmcr::SPEED_100;
            if adv.contains(PhyCap::FDX100) {
                bmcr_val |= bmcr::DUPLEX_FULL;
            }
        } else if adv.contains(PhyCap::FDX10) {
            bmcr_val |= bmcr::DUPLEX_FULL;
        }

        mdio.write(phy_addr, phy_reg::BMCR, bmcr_val)
    }

    /// Read the link partner's advertisement once negotiation completes
    pub fn read_link_partner<M: MdioBus>(
        mdio: &mut M,
        phy_addr: u8,
        gigabit: bool,
    ) -> Result<Option<PhyCap>> {
        let bmsr_val = mdio.read(phy_addr, phy_reg::BMSR)?;
        if bmsr_val & bmsr::AN_COMPLETE == 0 {
            return Ok(None);
        }

        let anlpar_val = mdio.read(phy_addr, phy_reg::ANLPAR)?;
        let mut lp = PhyCap::AN;
        lp.set(PhyCap::FDX100, anlpar_val & anar::TX_FD != 0);
        lp.set(PhyCap::HDX100, anlpar_val & anar::TX_HD != 0);
        lp.set(PhyCap::FDX10, anlpar_val & anar::T10_FD != 0);
        lp.set(PhyCap::HDX10, anlpar_val & anar::T10_HD != 0);
        lp.set(PhyCap::PAUSE, anlpar_val & anar::PAUSE != 0);
        lp.set(PhyCap::ASYM, anlpar_val & anar::PAUSE_ASYM != 0);

        if gigabit {
            let gbsr_val = mdio.read(phy_addr, phy_reg::GBSR)?;
            lp.set(PhyCap::FDX1000, gbsr_val & gbsr::LP_1000_FD != 0);
            lp.set(PhyCap::HDX1000, gbsr_val & gbsr::LP_1000_HD != 0);
        }
        Ok(Some(lp))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
