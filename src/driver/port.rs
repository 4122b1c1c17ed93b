//! Port state and configuration transactions
//!
//! A [`Port`] owns the register bus, the PHY and the [`PortConfig`] that
//! mirrors what the hardware was last told. Every setter follows the same
//! shape: validate, stage the new value into the config, call the selected
//! [`MacOps`] member, and restore the old value if the hardware call fails.
//! Validation errors are returned before anything is staged.
//!
//! Filter and multicast transactions live in [`filtering`](super::filtering),
//! flow control and link resolution in [`flow`](super::flow).
//!
//! # Example
//!
//! ```ignore
//! use nic_macctl::{Port, NicFamily, PortSettings, Mmio, FixedPhy, PhyCap};
//!
//! let bus = unsafe { Mmio::new(bar0) };
//! let mut port = Port::new(bus, FixedPhy::new(PhyCap::FDX40000));
//! port.select(NicFamily::Combo100g)?;
//! port.phy_probe()?;
//! port.configure(&PortSettings::new().with_mtu(9000))?;
//! ```

use super::config::{
    FilterMode, FlowControl, MacAddress, MacStats, PhyCap, PortSettings, RxQueueId,
};
use super::error::{ConfigError, Result};
use crate::hal::register::RegisterBus;
use crate::internal::constants::{MAC_PDU_MAX, MAC_PDU_MIN, MULTICAST_LIST_MAX};
use crate::mac::{self, MacOps, MacType, NicFamily};
use crate::phy::PhyOps;

// =============================================================================
// Port Configuration State
// =============================================================================

/// Software copy of the configuration applied to the hardware
///
/// Operation sets read this to program registers. Only the transactions on
/// [`Port`] mutate it.
#[derive(Debug, Clone)]
pub struct PortConfig {
    pub(crate) pdu: u32,
    pub(crate) mac_addr: MacAddress,
    pub(crate) filter: FilterMode,
    pub(crate) drain: bool,
    pub(crate) fcntl: FlowControl,
    pub(crate) fcntl_autoneg: bool,
    pub(crate) phy_cap_mask: PhyCap,
    pub(crate) adv_cap_mask: PhyCap,
    pub(crate) lp_cap_mask: PhyCap,
    pub(crate) mulcst_list: [MacAddress; MULTICAST_LIST_MAX],
    pub(crate) mulcst_count: usize,
}

impl PortConfig {
    /// Zeroed state: nothing applied yet
    pub const fn new() -> Self {
        Self {
            pdu: 0,
            mac_addr: MacAddress::ZERO,
            filter: FilterMode {
                all_unicast: false,
                multicast: false,
                all_multicast: false,
                broadcast: false,
            },
            drain: false,
            fcntl: FlowControl::empty(),
            fcntl_autoneg: false,
            phy_cap_mask: PhyCap::empty(),
            adv_cap_mask: PhyCap::empty(),
            lp_cap_mask: PhyCap::empty(),
            mulcst_list: [MacAddress::ZERO; MULTICAST_LIST_MAX],
            mulcst_count: 0,
        }
    }

    /// Maximum frame size in bytes
    pub const fn pdu(&self) -> u32 {
        self.pdu
    }

    /// Station address
    pub const fn mac_address(&self) -> &MacAddress {
        &self.mac_addr
    }

    /// Receive filter flags
    pub const fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Whether the MAC is held quiesced
    pub const fn drain(&self) -> bool {
        self.drain
    }

    /// Active flow-control flags
    pub const fn flow_control(&self) -> FlowControl {
        self.fcntl
    }

    /// Whether flow control follows the negotiated result
    pub const fn flow_control_autoneg(&self) -> bool {
        self.fcntl_autoneg
    }

    /// Capabilities supported by the PHY
    pub const fn phy_cap_mask(&self) -> PhyCap {
        self.phy_cap_mask
    }

    /// Capabilities advertised to the link partner
    pub const fn adv_cap_mask(&self) -> PhyCap {
        self.adv_cap_mask
    }

    /// Capabilities the link partner advertised
    pub const fn lp_cap_mask(&self) -> PhyCap {
        self.lp_cap_mask
    }

    /// Multicast groups, in the order they were set
    pub fn multicast_list(&self) -> &[MacAddress] {
        &self.mulcst_list[..self.mulcst_count]
    }

    /// Number of multicast groups
    pub const fn multicast_count(&self) -> usize {
        self.mulcst_count
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self::new()
    }
}

// Entries past the count are scratch space
impl PartialEq for PortConfig {
    fn eq(&self, other: &Self) -> bool {
        self.pdu == other.pdu
            && self.mac_addr == other.mac_addr
            && self.filter == other.filter
            && self.drain == other.drain
            && self.fcntl == other.fcntl
            && self.fcntl_autoneg == other.fcntl_autoneg
            && self.phy_cap_mask == other.phy_cap_mask
            && self.adv_cap_mask == other.adv_cap_mask
            && self.lp_cap_mask == other.lp_cap_mask
            && self.multicast_list() == other.multicast_list()
    }
}

impl Eq for PortConfig {}

// =============================================================================
// Port
// =============================================================================

/// One MAC port: register bus, PHY, selected operation set and state
///
/// All methods take `&mut self`, so one port is driven by one context at a
/// time. Use [`SharedPort`](crate::sync::SharedPort) to share it with
/// interrupt handlers.
pub struct Port<B: RegisterBus, P: PhyOps> {
    pub(crate) bus: B,
    pub(crate) phy: P,
    ops: Option<&'static dyn MacOps>,
    mac_type: Option<MacType>,
    pub(crate) config: PortConfig,
    stats: MacStats,
}

impl<B: RegisterBus, P: PhyOps> Port<B, P> {
    /// Create a port with no operation set selected
    pub const fn new(bus: B, phy: P) -> Self {
        Self {
            bus,
            phy,
            ops: None,
            mac_type: None,
            config: PortConfig::new(),
            stats: MacStats {
                rx_frames: 0,
                rx_octets: 0,
                rx_errors: 0,
                rx_dropped: 0,
                tx_frames: 0,
                tx_octets: 0,
                tx_dropped: 0,
            },
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    /// Select the operation set for `family`
    ///
    /// Must be called once before any other transaction.
    ///
    /// # Errors
    /// - [`ConfigError::AlreadySelected`] on a second call
    /// - [`ConfigError::UnsupportedFamily`] for [`NicFamily::Unknown`]
    pub fn select(&mut self, family: NicFamily) -> Result<MacType> {
        if self.ops.is_some() {
            return Err(ConfigError::AlreadySelected.into());
        }

        let (mac_type, ops) = mac::select(family)?;
        self.mac_type = Some(mac_type);
        self.ops = Some(ops);

        #[cfg(feature = "defmt")]
        defmt::info!("{} uses {} operations", family, mac_type);

        Ok(mac_type)
    }

    #[cfg(test)]
    pub(crate) fn install_ops(&mut self, ops: &'static dyn MacOps, mac_type: MacType) {
        self.ops = Some(ops);
        self.mac_type = Some(mac_type);
    }

    /// Selected operation set
    ///
    /// # Panics
    /// If [`select`](Self::select) has not succeeded yet.
    #[track_caller]
    pub(crate) fn ops(&self) -> &'static dyn MacOps {
        match self.ops {
            Some(ops) => ops,
            None => panic!("MAC operation set not selected"),
        }
    }

    /// Type tag of the selected operation set
    pub fn mac_type(&self) -> Option<MacType> {
        self.mac_type
    }

    /// Current software state
    pub fn config(&self) -> &PortConfig {
        &self.config
    }

    /// Register bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable register bus, for operations outside this crate
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// PHY
    pub fn phy(&self) -> &P {
        &self.phy
    }

    /// Mutable PHY
    pub fn phy_mut(&mut self) -> &mut P {
        &mut self.phy
    }

    /// Give back the bus and PHY
    pub fn release(self) -> (B, P) {
        (self.bus, self.phy)
    }

    /// Read PHY capabilities and advertise all of them
    ///
    /// Nothing changes on error.
    pub fn phy_probe(&mut self) -> Result<PhyCap> {
        let caps = self.phy.capabilities()?;
        self.config.phy_cap_mask = caps;
        self.config.adv_cap_mask = caps;

        #[cfg(feature = "defmt")]
        defmt::debug!("PHY capabilities {}", caps);

        Ok(caps)
    }

    /// Apply a full set of port settings
    ///
    /// Runs the individual transactions in order: PDU, station address,
    /// filter, flow control, multicast list, then leaves drain. Stops at the
    /// first error; steps already done stay applied.
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn configure(&mut self, settings: &PortSettings<'_>) -> Result<()> {
        self.set_pdu(settings.pdu)?;
        self.set_mac_address(settings.mac_address)?;
        self.set_filter(settings.filter)?;
        self.set_flow_control(settings.flow_control, settings.flow_control_autoneg)?;
        self.set_multicast_list(settings.multicast)?;
        self.set_drain(false)
    }

    // =========================================================================
    // Frame Size
    // =========================================================================

    /// Set the maximum frame size
    ///
    /// # Errors
    /// - [`ConfigError::PduTooSmall`] below 60 bytes
    /// - [`ConfigError::PduTooLarge`] above 9216 bytes
    /// - the hardware error, with the old size restored
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn set_pdu(&mut self, pdu: u32) -> Result<()> {
        if pdu < MAC_PDU_MIN {
            return Err(ConfigError::PduTooSmall.into());
        }
        if pdu > MAC_PDU_MAX {
            return Err(ConfigError::PduTooLarge.into());
        }

        let ops = self.ops();
        let old = core::mem::replace(&mut self.config.pdu, pdu);
        if let Err(e) = ops.pdu_set(&mut self.bus, &self.config) {
            self.config.pdu = old;
            #[cfg(feature = "defmt")]
            defmt::warn!("PDU {} rejected by hardware: {}", pdu, e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Read the maximum frame size programmed in hardware
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn pdu(&mut self) -> Result<u32> {
        let ops = self.ops();
        Ok(ops.pdu_get(&mut self.bus, &self.config)?)
    }

    // =========================================================================
    // Station Address
    // =========================================================================

    /// Set the station address
    ///
    /// # Errors
    /// - [`ConfigError::InvalidAddress`] for a multicast address or an
    ///   all-zero OUI
    /// - the hardware error, with the old address restored
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn set_mac_address(&mut self, addr: MacAddress) -> Result<()> {
        if !addr.is_valid_station() {
            return Err(ConfigError::InvalidAddress.into());
        }

        let ops = self.ops();
        let old = core::mem::replace(&mut self.config.mac_addr, addr);
        if let Err(e) = ops.addr_set(&mut self.bus, &self.config) {
            self.config.mac_addr = old;
            #[cfg(feature = "defmt")]
            defmt::warn!("station address {} rejected: {}", addr, e);
            return Err(e.into());
        }
        Ok(())
    }

    // =========================================================================
    // Drain
    // =========================================================================

    /// Hold the MAC quiesced, or release it
    ///
    /// Setting the current value makes no hardware call. A hardware failure
    /// leaves the new value staged.
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn set_drain(&mut self, enabled: bool) -> Result<()> {
        if self.config.drain == enabled {
            return Ok(());
        }

        let ops = self.ops();
        self.config.drain = enabled;
        ops.reconfigure(&mut self.bus, &self.config)?;
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check whether the link is up
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn is_up(&mut self) -> Result<bool> {
        let ops = self.ops();
        Ok(ops.up(&mut self.bus, &self.config)?)
    }

    /// Refresh and return MAC statistics
    ///
    /// # Errors
    /// [`HwError::Unsupported`](super::error::HwError::Unsupported) when the
    /// operation set has no counters.
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn stats(&mut self) -> Result<MacStats> {
        let ops = self.ops();
        ops.stats_update(&mut self.bus, &self.config, &mut self.stats)?;
        Ok(self.stats)
    }

    // =========================================================================
    // Default Receive Queue
    // =========================================================================

    /// Steer unmatched traffic to `rxq`
    ///
    /// Succeeds without effect when the hardware has no such control.
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn set_default_rxq(&mut self, rxq: RxQueueId, using_rss: bool) -> Result<()> {
        let ops = self.ops();
        ops.filter_default_rxq_set(&mut self.bus, &self.config, rxq, using_rss)?;
        Ok(())
    }

    /// Stop steering unmatched traffic
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn clear_default_rxq(&mut self) {
        let ops = self.ops();
        ops.filter_default_rxq_clear(&mut self.bus, &self.config);
    }
}

impl<B: RegisterBus + core::fmt::Debug, P: PhyOps + core::fmt::Debug> core::fmt::Debug
    for Port<B, P>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Port")
            .field("bus", &self.bus)
            .field("phy", &self.phy)
            .field("mac_type", &self.mac_type)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
