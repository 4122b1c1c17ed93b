//! Fixed link without a managed PHY
//!
//! COMBO cards expose no MDIO bus; the line side is fixed by the card. The
//! capability mask is supplied by the caller and never renegotiated.

use super::PhyOps;
use crate::driver::config::PhyCap;
use crate::driver::error::Result;
use crate::driver::port::PortConfig;

/// PHY stand-in for fixed links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedPhy {
    caps: PhyCap,
    partner: Option<PhyCap>,
}

impl FixedPhy {
    /// Fixed link supporting `caps`, with no link partner information
    pub const fn new(caps: PhyCap) -> Self {
        Self {
            caps,
            partner: None,
        }
    }

    /// Report `partner` as the link partner's advertisement
    #[must_use]
    pub const fn with_link_partner(mut self, partner: PhyCap) -> Self {
        self.partner = Some(partner);
        self
    }
}

impl PhyOps for FixedPhy {
    fn reconfigure(&mut self, _port: &PortConfig) -> Result<()> {
        Ok(())
    }

    fn capabilities(&mut self) -> Result<PhyCap> {
        Ok(self.caps)
    }

    fn link_partner(&mut self) -> Result<Option<PhyCap>> {
        Ok(self.partner)
    }
}
