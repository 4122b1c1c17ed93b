//! Clause 22 PHY over MDIO
//!
//! Works with any PHY that implements the IEEE 802.3 Clause 22 basic and
//! auto-negotiation registers. Gigabit advertisement is used when the PHY
//! reports extended status.

use embedded_hal::delay::DelayNs;

use super::{PhyOps, ieee802_3};
use crate::driver::config::PhyCap;
use crate::driver::error::{ConfigError, Result};
use crate::driver::port::PortConfig;
use crate::hal::mdio::MdioBus;
use crate::internal::phy_regs::PHY_ADDR_MAX;

/// Generic Clause 22 PHY
#[derive(Debug)]
pub struct Clause22Phy<M: MdioBus, D: DelayNs> {
    mdio: M,
    delay: D,
    addr: u8,
    /// Set once capabilities show 1000BASE-T support
    gigabit: bool,
}

impl<M: MdioBus, D: DelayNs> Clause22Phy<M, D> {
    /// Create a PHY handle at `addr`
    ///
    /// # Errors
    /// [`ConfigError::InvalidPhyAddress`] if `addr` is above 31.
    pub fn new(mdio: M, delay: D, addr: u8) -> Result<Self> {
        if addr > PHY_ADDR_MAX {
            return Err(ConfigError::InvalidPhyAddress.into());
        }
        Ok(Self {
            mdio,
            delay,
            addr,
            gigabit: false,
        })
    }

    /// PHY address on the MDIO bus
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Read the 32-bit PHY identifier, failing if nothing answers
    pub fn id(&mut self) -> Result<u32> {
        ieee802_3::probe(&mut self.mdio, self.addr)
    }

    /// Soft reset the PHY and wait for completion
    pub fn reset(&mut self) -> Result<()> {
        ieee802_3::soft_reset(&mut self.mdio, &mut self.delay, self.addr)
    }

    /// Give back the MDIO bus and delay
    pub fn release(self) -> (M, D) {
        (self.mdio, self.delay)
    }
}

impl<M: MdioBus, D: DelayNs> PhyOps for Clause22Phy<M, D> {
    fn reconfigure(&mut self, port: &PortConfig) -> Result<()> {
        let adv = port.adv_cap_mask();
        ieee802_3::write_advertisement(&mut self.mdio, self.addr, adv, self.gigabit)?;

        if adv.contains(PhyCap::AN) {
            ieee802_3::restart_auto_negotiation(&mut self.mdio, self.addr)
        } else {
            ieee802_3::force_link(&mut self.mdio, self.addr, adv)
        }
    }

    fn capabilities(&mut self) -> Result<PhyCap> {
        ieee802_3::probe(&mut self.mdio, self.addr)?;
        let caps = ieee802_3::read_capabilities(&mut self.mdio, self.addr)?;
        self.gigabit = caps.intersects(PhyCap::FDX1000 | PhyCap::HDX1000);

        #[cfg(feature = "defmt")]
        defmt::debug!("PHY {} capabilities {}", self.addr, caps);

        Ok(caps)
    }

    fn link_partner(&mut self) -> Result<Option<PhyCap>> {
        ieee802_3::read_link_partner(&mut self.mdio, self.addr, self.gigabit)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::driver::error::{Error, HwError};
    use crate::internal::phy_regs::{anar, bmcr, bmsr, estatus, gbcr, phy_reg};
    use crate::testing::{MockDelay, MockMdioBus};

    const ADDR: u8 = 1;

    fn gigabit_mdio() -> MockMdioBus {
        let mdio = MockMdioBus::new();
        mdio.set_register(ADDR, phy_reg::PHYIDR1, 0x001C);
        mdio.set_register(ADDR, phy_reg::PHYIDR2, 0xC916);
        mdio.set_register(
            ADDR,
            phy_reg::BMSR,
            bmsr::TX_FD_CAPABLE | bmsr::TX_HD_CAPABLE | bmsr::ESTATUS | bmsr::AN_ABILITY,
        );
        mdio.set_register(ADDR, phy_reg::ESTATUS, estatus::T1000_FD);
        mdio
    }

    fn port_advertising(adv: PhyCap) -> PortConfig {
        let mut port = PortConfig::new();
        port.adv_cap_mask = adv;
        port
    }

    #[test]
    fn address_above_31_rejected() {
        let result = Clause22Phy::new(MockMdioBus::new(), MockDelay::new(), 32);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidPhyAddress))
        ));
    }

    #[test]
    fn capabilities_require_a_phy() {
        let mut phy = Clause22Phy::new(MockMdioBus::new(), MockDelay::new(), ADDR).unwrap();
        assert_eq!(phy.capabilities(), Err(Error::Hw(HwError::NoPhy)));
    }

    #[test]
    fn capabilities_enable_gigabit_advertisement() {
        let mut phy = Clause22Phy::new(gigabit_mdio(), MockDelay::new(), ADDR).unwrap();

        let caps = phy.capabilities().unwrap();
        assert!(caps.contains(PhyCap::FDX1000 | PhyCap::AN | PhyCap::PAUSE));

        phy.reconfigure(&port_advertising(PhyCap::FDX1000 | PhyCap::AN))
            .unwrap();
        let (mdio, _) = phy.release();
        assert_eq!(
            mdio.get_register(ADDR, phy_reg::GBCR),
            Some(gbcr::ADV_1000_FD)
        );
    }

    #[test]
    fn reconfigure_restarts_negotiation() {
        let mut phy = Clause22Phy::new(gigabit_mdio(), MockDelay::new(), ADDR).unwrap();
        let adv = PhyCap::FDX100 | PhyCap::AN | PhyCap::PAUSE;

        phy.reconfigure(&port_advertising(adv)).unwrap();

        let (mdio, _) = phy.release();
        let bmcr_val = mdio.get_register(ADDR, phy_reg::BMCR).unwrap();
        assert_eq!(bmcr_val, bmcr::AN_ENABLE | bmcr::AN_RESTART);
        let anar_val = mdio.get_register(ADDR, phy_reg::ANAR).unwrap();
        assert_eq!(anar_val, anar::SELECTOR_IEEE802_3 | anar::TX_FD | anar::PAUSE);
    }

    #[test]
    fn reconfigure_without_an_forces_link() {
        let mut phy = Clause22Phy::new(gigabit_mdio(), MockDelay::new(), ADDR).unwrap();

        phy.reconfigure(&port_advertising(PhyCap::HDX100)).unwrap();

        let (mdio, _) = phy.release();
        assert_eq!(mdio.get_register(ADDR, phy_reg::BMCR), Some(bmcr::SPEED_100));
    }

    #[test]
    fn reset_waits_for_self_clear() {
        let mdio = gigabit_mdio();
        mdio.self_clearing(ADDR, phy_reg::BMCR, bmcr::RESET);
        let mut phy = Clause22Phy::new(mdio, MockDelay::new(), ADDR).unwrap();

        phy.reset().unwrap();
        assert_eq!(phy.id(), Ok(0x001C_C916));
    }

    #[test]
    fn link_partner_reads_anlpar() {
        let mdio = gigabit_mdio();
        mdio.set_register(ADDR, phy_reg::BMSR, bmsr::AN_COMPLETE | bmsr::AN_ABILITY);
        mdio.set_register(ADDR, phy_reg::ANLPAR, anar::TX_FD | anar::PAUSE_ASYM);
        let mut phy = Clause22Phy::new(mdio, MockDelay::new(), ADDR).unwrap();

        let lp = phy.link_partner().unwrap().unwrap();
        assert_eq!(lp, PhyCap::AN | PhyCap::FDX100 | PhyCap::ASYM);
    }
}
