//! DesignWare GMAC operation set
//!
//! Frame size goes to the watchdog register plus the jumbo enable bit.
//! The station address sits in address slot 0, the first four multicast
//! groups take perfect-filter slots 1-4 and the rest fall back to the
//! 64-bin CRC hash table. Every write is read back.

use crate::driver::config::{FlowControl, MacStats};
use crate::driver::error::HwResult;
use crate::driver::port::PortConfig;
use crate::hal::register::RegisterBus;
use crate::internal::constants::PAUSE_TIME_MAX;
use crate::internal::register::dwmac::{
    DwmacRegs, GMACCONFIG_JE, GMACFC_PT_MASK, GMACFC_PT_SHIFT, GMACFC_RFE, GMACFC_TFE, GMACFF_DBF,
    GMACFF_HMC, GMACFF_HPF, GMACFF_PM, GMACFF_PR, GMACSGMII_LNKSTS, GMACWDT_PWE, GMACWDT_WTO_MASK,
    JUMBO_FRAME_MAX, MAC_ADDR_FILTER_COUNT, STANDARD_FRAME_MAX,
};

use super::MacOps;

/// Operation set for the Synopsys DesignWare GMAC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DwmacOps;

impl DwmacOps {
    fn apply_frame_filter(bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        let filter = port.filter();
        let clear = GMACFF_PR | GMACFF_HMC | GMACFF_HPF | GMACFF_PM | GMACFF_DBF;
        let mut ff = DwmacRegs::frame_filter(bus) & !clear;
        if filter.all_unicast {
            ff |= GMACFF_PR;
        }
        // First four groups sit in perfect slots, the rest in the hash table
        if filter.multicast {
            ff |= GMACFF_HMC | GMACFF_HPF;
        }
        if filter.all_multicast {
            ff |= GMACFF_PM;
        }
        if !filter.broadcast {
            ff |= GMACFF_DBF;
        }
        DwmacRegs::set_frame_filter(bus, ff)
    }

    fn apply_flow_control(bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        let fcntl = port.flow_control();
        let mut fc = DwmacRegs::flow_control(bus) & !(GMACFC_TFE | GMACFC_RFE | GMACFC_PT_MASK);
        if fcntl.contains(FlowControl::RESPOND) {
            fc |= GMACFC_RFE;
        }
        if fcntl.contains(FlowControl::GENERATE) {
            fc |= GMACFC_TFE | ((PAUSE_TIME_MAX as u32) << GMACFC_PT_SHIFT);
        }
        DwmacRegs::set_flow_control(bus, fc)
    }
}

impl MacOps for DwmacOps {
    fn pdu_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        let pdu = port.pdu();
        DwmacRegs::set_watchdog(bus, (pdu & GMACWDT_WTO_MASK) | GMACWDT_PWE)?;
        DwmacRegs::set_jumbo(bus, pdu > STANDARD_FRAME_MAX)
    }

    fn pdu_get(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<u32> {
        let wdt = DwmacRegs::watchdog(bus);
        if wdt & GMACWDT_PWE != 0 {
            return Ok(wdt & GMACWDT_WTO_MASK);
        }
        if DwmacRegs::config(bus) & GMACCONFIG_JE != 0 {
            Ok(JUMBO_FRAME_MAX)
        } else {
            Ok(STANDARD_FRAME_MAX)
        }
    }

    fn addr_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        DwmacRegs::set_station_address(bus, port.mac_address().octets())
    }

    fn reconfigure(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        Self::apply_frame_filter(bus, port)?;
        Self::apply_flow_control(bus, port)?;
        DwmacRegs::set_receiver(bus, !port.drain())
    }

    fn up(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<bool> {
        Ok(DwmacRegs::sgmii_status(bus) & GMACSGMII_LNKSTS != 0)
    }

    fn multicast_list_set(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<()> {
        let list = port.multicast_list();
        for slot in 1..=MAC_ADDR_FILTER_COUNT {
            let addr = list.get(slot - 1).map(|a| a.octets());
            DwmacRegs::set_filter_slot(bus, slot, addr)?;
        }

        let hash = list
            .iter()
            .skip(MAC_ADDR_FILTER_COUNT)
            .fold(0u64, |acc, addr| {
                acc | (1u64 << DwmacRegs::compute_hash_index(addr.octets()))
            });
        DwmacRegs::set_hash_table(bus, hash)
    }

    fn stats_update(
        &self,
        bus: &mut dyn RegisterBus,
        _port: &PortConfig,
        stats: &mut MacStats,
    ) -> HwResult<()> {
        stats.rx_frames = DwmacRegs::mmc_rx_frames(bus) as u64;
        stats.rx_octets = DwmacRegs::mmc_rx_octets(bus) as u64;
        stats.rx_errors = DwmacRegs::mmc_rx_crc_errors(bus) as u64;
        stats.tx_frames = DwmacRegs::mmc_tx_frames(bus) as u64;
        stats.tx_octets = DwmacRegs::mmc_tx_octets(bus) as u64;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
