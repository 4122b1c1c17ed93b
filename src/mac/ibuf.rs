//! COMBO IBUF/OBUF operation set
//!
//! COMBO ports filter on a small MAC address memory inside the IBUF: entry
//! 0 holds the station address, the remaining entries hold multicast
//! groups. When the groups do not fit, the check mode widens to accept all
//! multicast. The hardware has no PAUSE support, so flow control is
//! accepted and ignored.

use crate::driver::config::MacStats;
use crate::driver::error::HwResult;
use crate::driver::port::PortConfig;
use crate::hal::register::RegisterBus;
use crate::internal::register::ibuf::{IBUF_MAX_MAC_COUNT, IbufRegs, MacCheckMode};

use super::MacOps;

/// Operation set for Netcope COMBO cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IbufOps;

impl IbufOps {
    /// Usable MAC memory entries
    fn capacity(bus: &mut dyn RegisterBus) -> usize {
        IbufRegs::mac_count(bus).min(IBUF_MAX_MAC_COUNT)
    }

    /// Check mode for the staged filter and multicast list
    fn check_mode(bus: &mut dyn RegisterBus, port: &PortConfig) -> MacCheckMode {
        let filter = port.filter();
        // Entry 0 is the station address
        let overflow = port.multicast_count() + 1 > Self::capacity(bus);

        if filter.all_unicast {
            MacCheckMode::Promiscuous
        } else if filter.all_multicast || (filter.multicast && overflow) {
            MacCheckMode::AllMulticast
        } else if filter.broadcast {
            MacCheckMode::AllBroadcast
        } else {
            MacCheckMode::OnlyValid
        }
    }

    fn apply_check_mode(bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        let mode = Self::check_mode(bus, port);
        IbufRegs::set_check_mode(bus, mode)
    }
}

impl MacOps for IbufOps {
    fn pdu_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        IbufRegs::set_mtu(bus, port.pdu())
    }

    fn pdu_get(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<u32> {
        Ok(IbufRegs::mtu(bus))
    }

    fn addr_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        IbufRegs::set_mac_entry(bus, 0, Some(port.mac_address().octets()))
    }

    fn reconfigure(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        Self::apply_check_mode(bus, port)?;
        let enabled = !port.drain();
        IbufRegs::set_ibuf_enabled(bus, enabled)?;
        IbufRegs::set_obuf_enabled(bus, enabled)
    }

    fn up(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<bool> {
        Ok(IbufRegs::is_link_up(bus))
    }

    fn multicast_list_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        let list = port.multicast_list();
        for index in 1..Self::capacity(bus) {
            let addr = list.get(index - 1).map(|a| a.octets());
            IbufRegs::set_mac_entry(bus, index, addr)?;
        }
        Self::apply_check_mode(bus, port)
    }

    fn stats_update(
        &self,
        bus: &mut dyn RegisterBus,
        _port: &PortConfig,
        stats: &mut MacStats,
    ) -> HwResult<()> {
        let overflow = IbufRegs::rx_overflow(bus);
        stats.rx_frames = IbufRegs::rx_total_frames(bus);
        stats.rx_octets = IbufRegs::rx_octets(bus);
        stats.rx_errors = IbufRegs::rx_discarded(bus).saturating_sub(overflow);
        stats.rx_dropped = overflow;
        stats.tx_frames = IbufRegs::tx_frames(bus);
        stats.tx_octets = IbufRegs::tx_octets(bus);
        stats.tx_dropped = IbufRegs::tx_discarded(bus);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
