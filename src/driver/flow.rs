//! IEEE 802.3 flow control transactions.
//!
//! This module extends [`Port`] with PAUSE flow-control policy: the caller
//! asks for "respond" (honour received PAUSE frames) and/or "generate"
//! (emit PAUSE frames), which is encoded into the PAUSE/ASYM bits of the
//! advertised capability mask and pushed to the PHY and then the MAC.
//!
//! # Encoding
//!
//! | Requested | Advertised |
//! |-----------|------------|
//! | none | - |
//! | respond | PAUSE, ASYM |
//! | generate | ASYM |
//! | respond + generate | PAUSE |
//!
//! Respond sets both bits, generate then toggles ASYM. Decoding reverses
//! it, so every request reads back unchanged.
//!
//! # Resolution
//!
//! With autonegotiated flow control, [`Port::update_link`] resolves the
//! active flags from both advertisements per IEEE 802.3 Annex 28B.

use super::config::{FlowControl, FlowControlState, PhyCap};
use super::error::{ConfigError, Result};
use super::port::Port;
use crate::hal::register::RegisterBus;
use crate::phy::PhyOps;

// =============================================================================
// Encoding
// =============================================================================

/// Encode requested flags into the PAUSE/ASYM bits of `adv`
///
/// Other capability bits are left alone.
pub fn encode_pause(adv: PhyCap, fcntl: FlowControl) -> PhyCap {
    let mut adv = adv;
    adv.set(PhyCap::PAUSE_BITS, fcntl.contains(FlowControl::RESPOND));
    if fcntl.contains(FlowControl::GENERATE) {
        adv.toggle(PhyCap::ASYM);
    }
    adv
}

/// Decode the requested flags from an advertised mask
pub fn decode_pause(adv: PhyCap) -> FlowControl {
    let mut fcntl = if adv.contains(PhyCap::PAUSE) {
        FlowControl::RESPOND | FlowControl::GENERATE
    } else {
        FlowControl::empty()
    };
    if adv.contains(PhyCap::ASYM) {
        fcntl.toggle(FlowControl::GENERATE);
    }
    fcntl
}

/// Resolve active flags from local and partner advertisements
pub fn resolve_pause(local: PhyCap, partner: PhyCap) -> FlowControl {
    let local_pause = local.contains(PhyCap::PAUSE);
    let local_asym = local.contains(PhyCap::ASYM);
    let lp_pause = partner.contains(PhyCap::PAUSE);
    let lp_asym = partner.contains(PhyCap::ASYM);

    if local_pause && lp_pause {
        FlowControl::RESPOND | FlowControl::GENERATE
    } else if local_pause && local_asym && lp_asym {
        FlowControl::RESPOND
    } else if !local_pause && local_asym && lp_pause && lp_asym {
        FlowControl::GENERATE
    } else {
        FlowControl::empty()
    }
}

// =============================================================================
// Transactions
// =============================================================================

impl<B: RegisterBus, P: PhyOps> Port<B, P> {
    /// Set the flow-control policy
    ///
    /// `autoneg` is dropped silently when the PHY cannot autonegotiate. The
    /// new advertisement goes to the PHY first, then the MAC. If either
    /// fails the flags, autoneg and advertised mask are restored. A MAC
    /// failure does not undo what the PHY already applied.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFlowControl`] for bits other than respond
    ///   and generate
    /// - the PHY or MAC error
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn set_flow_control(&mut self, fcntl: FlowControl, autoneg: bool) -> Result<()> {
        if fcntl.bits() & !FlowControl::all().bits() != 0 {
            return Err(ConfigError::InvalidFlowControl.into());
        }

        let autoneg = autoneg && self.config.phy_cap_mask.contains(PhyCap::AN);
        let ops = self.ops();

        let old_fcntl = self.config.fcntl;
        let old_autoneg = self.config.fcntl_autoneg;
        let old_adv = self.config.adv_cap_mask;

        self.config.fcntl = fcntl;
        self.config.fcntl_autoneg = autoneg;
        self.config.adv_cap_mask = encode_pause(old_adv, fcntl);

        let result = match self.phy.reconfigure(&self.config) {
            Ok(()) => ops
                .reconfigure(&mut self.bus, &self.config)
                .map_err(Into::into),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            self.config.fcntl = old_fcntl;
            self.config.fcntl_autoneg = old_autoneg;
            self.config.adv_cap_mask = old_adv;
            #[cfg(feature = "defmt")]
            defmt::warn!("flow control rolled back: {}", e);
            return Err(e);
        }
        Ok(())
    }

    /// Requested and active flow-control flags
    pub fn flow_control(&self) -> FlowControlState {
        FlowControlState {
            wanted: decode_pause(self.config.adv_cap_mask),
            link: self.config.fcntl,
        }
    }

    /// Poll the PHY for the link partner's advertisement
    ///
    /// Returns `Ok(false)` while negotiation is incomplete. Otherwise stores
    /// the partner mask and, with autonegotiated flow control, resolves the
    /// active flags and reapplies them to the MAC. The flags are restored if
    /// the MAC rejects them.
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn update_link(&mut self) -> Result<bool> {
        let Some(partner) = self.phy.link_partner()? else {
            return Ok(false);
        };
        self.config.lp_cap_mask = partner;

        if !self.config.fcntl_autoneg {
            return Ok(true);
        }

        let resolved = resolve_pause(self.config.adv_cap_mask, partner);
        if resolved == self.config.fcntl {
            return Ok(true);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("flow control resolved to {}", resolved);

        let ops = self.ops();
        let old = core::mem::replace(&mut self.config.fcntl, resolved);
        if let Err(e) = ops.reconfigure(&mut self.bus, &self.config) {
            self.config.fcntl = old;
            return Err(e.into());
        }
        Ok(true)
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
    use crate::internal::register::dwmac::{GMACFC_OFFSET, GMACFC_RFE, GMACFC_TFE};
    use crate::mac::{MacType, NicFamily};
    use crate::testing::{MockPhy, MockRegisters, ScriptedMac, ScriptedOp};

    type TestPort = Port<MockRegisters, MockPhy>;

    const BOTH: FlowControl = FlowControl::RESPOND.union(FlowControl::GENERATE);

    fn probed(caps: PhyCap) -> TestPort {
        let mut port = Port::new(MockRegisters::new(), MockPhy::new(caps));
        port.select(NicFamily::Dwmac).unwrap();
        port.phy_probe().unwrap();
        port
    }

    fn scripted(caps: PhyCap) -> TestPort {
        let mut port = Port::new(MockRegisters::new(), MockPhy::new(caps));
        port.install_ops(&ScriptedMac, MacType::Dwmac);
        port.phy_probe().unwrap();
        port
    }

    // =========================================================================
    // Encoding Tests
    // =========================================================================

    #[test]
    fn encoding_table() {
        let base = PhyCap::AN | PhyCap::FDX1000;
        assert_eq!(encode_pause(base, FlowControl::empty()), base);
        assert_eq!(
            encode_pause(base, FlowControl::RESPOND),
            base | PhyCap::PAUSE | PhyCap::ASYM
        );
        assert_eq!(encode_pause(base, FlowControl::GENERATE), base | PhyCap::ASYM);
        assert_eq!(encode_pause(base, BOTH), base | PhyCap::PAUSE);
    }

    #[test]
    fn encoding_clears_previous_pause_bits() {
        let adv = PhyCap::FDX100 | PhyCap::PAUSE | PhyCap::ASYM;
        assert_eq!(encode_pause(adv, FlowControl::empty()), PhyCap::FDX100);
    }

    #[test]
    fn decode_reverses_encode() {
        let requests = [FlowControl::empty(), FlowControl::RESPOND, FlowControl::GENERATE, BOTH];
        for fcntl in requests {
            let adv = encode_pause(PhyCap::AN, fcntl);
            assert_eq!(decode_pause(adv), fcntl, "round trip of {fcntl:?}");
        }
    }

    #[test]
    fn respond_only_advertises_both_bits() {
        let adv = encode_pause(PhyCap::empty(), FlowControl::RESPOND);
        assert!(adv.contains(PhyCap::PAUSE));
        assert!(adv.contains(PhyCap::ASYM));
        assert_eq!(decode_pause(adv), FlowControl::RESPOND);
    }

    #[test]
    fn annex_28b_resolution() {
        let pause = PhyCap::PAUSE;
        let asym = PhyCap::ASYM;
        let none = PhyCap::empty();

        assert_eq!(resolve_pause(pause, pause), BOTH);
        assert_eq!(resolve_pause(pause | asym, pause), BOTH);
        assert_eq!(resolve_pause(pause | asym, asym), FlowControl::RESPOND);
        assert_eq!(resolve_pause(asym, pause | asym), FlowControl::GENERATE);
        assert_eq!(resolve_pause(asym, pause), FlowControl::empty());
        assert_eq!(resolve_pause(pause, asym), FlowControl::empty());
        assert_eq!(resolve_pause(none, pause | asym), FlowControl::empty());
    }

    // =========================================================================
    // Transaction Tests
    // =========================================================================

    #[test]
    fn unknown_bits_rejected() {
        let mut port = probed(PhyCap::AN);
        let before = port.config().adv_cap_mask();

        let result = port.set_flow_control(FlowControl::from_bits_retain(0x4), true);

        assert_eq!(result, Err(Error::Config(ConfigError::InvalidFlowControl)));
        assert_eq!(port.config().adv_cap_mask(), before);
        assert_eq!(port.phy.reconfigure_calls(), 0);
    }

    #[test]
    fn autoneg_forced_off_without_phy_support() {
        let mut port = probed(PhyCap::FDX100);

        port.set_flow_control(BOTH, true).unwrap();

        assert!(!port.config().flow_control_autoneg());
        assert_eq!(port.flow_control().wanted, BOTH);
    }

    #[test]
    fn flags_reach_phy_and_mac() {
        let mut port = probed(PhyCap::AN | PhyCap::FDX100);

        port.set_flow_control(BOTH, true).unwrap();

        assert!(port.config().flow_control_autoneg());
        assert_eq!(
            port.phy.last_advertised(),
            Some(PhyCap::AN | PhyCap::FDX100 | PhyCap::PAUSE)
        );
        let fc = port.bus.register(GMACFC_OFFSET);
        assert_ne!(fc & GMACFC_RFE, 0);
        assert_ne!(fc & GMACFC_TFE, 0);
    }

    #[test]
    fn query_reports_wanted_and_active() {
        let mut port = probed(PhyCap::AN);
        port.set_flow_control(FlowControl::GENERATE, false).unwrap();

        let state = port.flow_control();
        assert_eq!(state.wanted, FlowControl::GENERATE);
        assert_eq!(state.link, FlowControl::GENERATE);
    }

    #[test]
    fn phy_failure_restores_and_skips_mac() {
        let mut port = scripted(PhyCap::AN);
        port.set_flow_control(FlowControl::RESPOND, true).unwrap();
        let before = port.config().clone();
        let mac_calls = ScriptedMac::calls(&port.bus, ScriptedOp::Reconfigure);
        port.phy.set_fail(true);

        let result = port.set_flow_control(FlowControl::GENERATE, false);

        assert_eq!(result, Err(Error::Hw(HwError::Timeout)));
        assert_eq!(*port.config(), before);
        assert_eq!(
            ScriptedMac::calls(&port.bus, ScriptedOp::Reconfigure),
            mac_calls
        );
    }

    #[test]
    fn mac_failure_restores_software_but_not_phy() {
        let mut port = scripted(PhyCap::AN);
        port.set_flow_control(FlowControl::RESPOND, true).unwrap();
        let before = port.config().clone();
        ScriptedMac::fail_on(&mut port.bus, ScriptedOp::Reconfigure);

        let result = port.set_flow_control(FlowControl::GENERATE, false);

        assert_eq!(result, Err(Error::Hw(HwError::VerifyFailed)));
        assert_eq!(*port.config(), before);
        // The PHY keeps the rejected advertisement
        assert_eq!(port.phy.last_advertised(), Some(PhyCap::AN | PhyCap::ASYM));
        assert_ne!(port.phy.last_advertised(), Some(before.adv_cap_mask()));
    }

    // =========================================================================
    // Link Update Tests
    // =========================================================================

    #[test]
    fn update_link_waits_for_partner() {
        let mut port = probed(PhyCap::AN);
        assert_eq!(port.update_link(), Ok(false));
        assert_eq!(port.config().lp_cap_mask(), PhyCap::empty());
    }

    #[test]
    fn update_link_resolves_autoneg_flags() {
        let mut port = probed(PhyCap::AN | PhyCap::FDX100);
        port.set_flow_control(FlowControl::RESPOND, true).unwrap();
        port.phy.set_link_partner(Some(PhyCap::AN | PhyCap::ASYM));

        assert_eq!(port.update_link(), Ok(true));

        assert_eq!(port.config().lp_cap_mask(), PhyCap::AN | PhyCap::ASYM);
        assert_eq!(port.flow_control().link, FlowControl::RESPOND);
        assert_eq!(port.flow_control().wanted, FlowControl::RESPOND);
    }

    #[test]
    fn update_link_without_autoneg_keeps_flags() {
        let mut port = probed(PhyCap::AN);
        port.set_flow_control(BOTH, false).unwrap();
        port.phy.set_link_partner(Some(PhyCap::empty()));

        assert_eq!(port.update_link(), Ok(true));
        assert_eq!(port.flow_control().link, BOTH);
    }

    #[test]
    fn update_link_rolls_back_rejected_resolution() {
        let mut port = scripted(PhyCap::AN);
        port.set_flow_control(BOTH, true).unwrap();
        port.phy.set_link_partner(Some(PhyCap::empty()));
        ScriptedMac::fail_on(&mut port.bus, ScriptedOp::Reconfigure);

        assert_eq!(port.update_link(), Err(Error::Hw(HwError::VerifyFailed)));
        assert_eq!(port.flow_control().link, BOTH);
        assert_eq!(port.config().lp_cap_mask(), PhyCap::empty());
    }
}
