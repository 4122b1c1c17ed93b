//! Configuration types for the MAC control plane
//!
//! Value types shared by the port transactions and the operation sets,
//! plus the [`PortSettings`] builder used for bring-up.

use crate::internal::constants::{DEFAULT_MAC_ADDR, MAC_ADDR_LEN, MTU, PDU_ADJUSTMENT, PDU_ALIGN};

// =============================================================================
// MAC Address
// =============================================================================

/// 48-bit IEEE 802 MAC address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacAddress(pub [u8; MAC_ADDR_LEN]);

impl MacAddress {
    /// All-zero address
    pub const ZERO: Self = Self([0; MAC_ADDR_LEN]);

    /// Broadcast address
    pub const BROADCAST: Self = Self([0xFF; MAC_ADDR_LEN]);

    /// Create an address from its six octets
    #[must_use]
    pub const fn new(octets: [u8; MAC_ADDR_LEN]) -> Self {
        Self(octets)
    }

    /// Get the octets
    #[inline]
    pub const fn octets(&self) -> &[u8; MAC_ADDR_LEN] {
        &self.0
    }

    /// Group address (I/G bit set)
    #[inline]
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// All-ones address
    #[inline]
    pub const fn is_broadcast(&self) -> bool {
        let mut i = 0;
        while i < MAC_ADDR_LEN {
            if self.0[i] != 0xFF {
                return false;
            }
            i += 1;
        }
        true
    }

    /// Locally administered (U/L bit set)
    #[inline]
    pub const fn is_locally_administered(&self) -> bool {
        self.0[0] & 0x02 != 0
    }

    /// 24-bit organizationally unique identifier
    #[inline]
    pub const fn oui(&self) -> u32 {
        ((self.0[0] as u32) << 16) | ((self.0[1] as u32) << 8) | (self.0[2] as u32)
    }

    /// Usable as a station address: unicast with a nonzero OUI
    #[inline]
    pub const fn is_valid_station(&self) -> bool {
        !self.is_multicast() && self.oui() != 0
    }
}

impl From<[u8; MAC_ADDR_LEN]> for MacAddress {
    fn from(octets: [u8; MAC_ADDR_LEN]) -> Self {
        Self(octets)
    }
}

impl core::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

// =============================================================================
// Frame Size Helpers
// =============================================================================

/// PDU needed to carry `sdu` payload bytes
///
/// Adds header, VLAN tag and CRC, then rounds up to the PDU alignment.
/// Saturates at `u32::MAX`, which no port accepts.
#[must_use]
pub const fn pdu_from_sdu(sdu: u32) -> u32 {
    sdu.saturating_add(PDU_ADJUSTMENT)
        .div_ceil(PDU_ALIGN)
        .saturating_mul(PDU_ALIGN)
}

/// Largest payload a `pdu` carries
#[must_use]
pub const fn sdu_from_pdu(pdu: u32) -> u32 {
    pdu.saturating_sub(PDU_ADJUSTMENT)
}

// =============================================================================
// Receive Filter
// =============================================================================

/// Receive filter mode
///
/// Four independent switches; every combination is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterMode {
    /// Accept frames for any unicast destination
    pub all_unicast: bool,
    /// Accept frames for the programmed multicast list
    pub multicast: bool,
    /// Accept every multicast frame
    pub all_multicast: bool,
    /// Accept broadcast frames
    pub broadcast: bool,
}

impl FilterMode {
    /// Multicast list and broadcast, nothing else
    #[must_use]
    pub const fn new() -> Self {
        Self {
            all_unicast: false,
            multicast: true,
            all_multicast: false,
            broadcast: true,
        }
    }

    /// Accept everything
    #[must_use]
    pub const fn promiscuous() -> Self {
        Self {
            all_unicast: true,
            multicast: true,
            all_multicast: true,
            broadcast: true,
        }
    }
}

// =============================================================================
// Flow Control and PHY Capabilities
// =============================================================================

bitflags::bitflags! {
    /// IEEE 802.3x PAUSE flow-control flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FlowControl: u32 {
        /// Honor received PAUSE frames
        const RESPOND = 0x1;
        /// Emit PAUSE frames when congested
        const GENERATE = 0x2;
    }
}

bitflags::bitflags! {
    /// PHY capability mask
    ///
    /// Used for the PHY's supported set, the local advertisement and the
    /// link partner's advertisement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PhyCap: u32 {
        /// 10BASE-T half duplex
        const HDX10 = 1 << 1;
        /// 10BASE-T full duplex
        const FDX10 = 1 << 2;
        /// 100BASE-TX half duplex
        const HDX100 = 1 << 3;
        /// 100BASE-TX full duplex
        const FDX100 = 1 << 4;
        /// 1000BASE-T half duplex
        const HDX1000 = 1 << 5;
        /// 1000BASE-T full duplex
        const FDX1000 = 1 << 6;
        /// 10GBASE full duplex
        const FDX10000 = 1 << 7;
        /// Symmetric PAUSE
        const PAUSE = 1 << 8;
        /// Asymmetric PAUSE
        const ASYM = 1 << 9;
        /// Auto-negotiation
        const AN = 1 << 10;
        /// 40GBASE full duplex
        const FDX40000 = 1 << 11;
    }
}

impl PhyCap {
    /// Both PAUSE advertisement bits
    pub const PAUSE_BITS: Self = Self::PAUSE.union(Self::ASYM);
}

#[cfg(feature = "defmt")]
impl defmt::Format for FlowControl {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FlowControl({=u32:#x})", self.bits());
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PhyCap {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "PhyCap({=u32:#x})", self.bits());
    }
}

/// Flow-control state reported by [`Port::flow_control`](crate::Port::flow_control)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlowControlState {
    /// Flags decoded from the current advertisement
    pub wanted: FlowControl,
    /// Flags currently active on the link
    pub link: FlowControl,
}

// =============================================================================
// Receive Queue and Statistics
// =============================================================================

/// Receive queue handle for the default-queue target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxQueueId(pub u16);

/// MAC traffic counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MacStats {
    /// Frames received
    pub rx_frames: u64,
    /// Octets received
    pub rx_octets: u64,
    /// Frames received with errors (CRC, length)
    pub rx_errors: u64,
    /// Frames dropped by the MAC on receive
    pub rx_dropped: u64,
    /// Frames transmitted
    pub tx_frames: u64,
    /// Octets transmitted
    pub tx_octets: u64,
    /// Frames dropped by the MAC on transmit
    pub tx_dropped: u64,
}

// =============================================================================
// Port Settings (bring-up)
// =============================================================================

/// Complete port configuration applied by [`Port::configure`](crate::Port::configure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSettings<'a> {
    /// Maximum frame size
    pub pdu: u32,
    /// Station address
    pub mac_address: MacAddress,
    /// Receive filter mode
    pub filter: FilterMode,
    /// Requested flow-control flags
    pub flow_control: FlowControl,
    /// Negotiate flow control with the link partner
    pub flow_control_autoneg: bool,
    /// Multicast addresses to accept
    pub multicast: &'a [MacAddress],
}

impl Default for PortSettings<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PortSettings<'a> {
    /// Create settings with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pdu: pdu_from_sdu(MTU),
            mac_address: MacAddress(DEFAULT_MAC_ADDR),
            filter: FilterMode::new(),
            flow_control: FlowControl::RESPOND.union(FlowControl::GENERATE),
            flow_control_autoneg: true,
            multicast: &[],
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    /// Set the maximum frame size
    #[must_use]
    pub const fn with_pdu(mut self, pdu: u32) -> Self {
        self.pdu = pdu;
        self
    }

    /// Set the maximum frame size from a payload size
    #[must_use]
    pub const fn with_mtu(mut self, sdu: u32) -> Self {
        self.pdu = pdu_from_sdu(sdu);
        self
    }

    /// Set the station address
    ///
    /// If not set, a default locally-administered address
    /// (02:00:00:00:00:01) is used.
    #[must_use]
    pub const fn with_mac_address(mut self, addr: [u8; 6]) -> Self {
        self.mac_address = MacAddress(addr);
        self
    }

    /// Set the receive filter mode
    #[must_use]
    pub const fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Set the requested flow control
    #[must_use]
    pub const fn with_flow_control(mut self, flags: FlowControl, autoneg: bool) -> Self {
        self.flow_control = flags;
        self.flow_control_autoneg = autoneg;
        self
    }

    /// Set the multicast list
    #[must_use]
    pub const fn with_multicast(mut self, list: &'a [MacAddress]) -> Self {
        self.multicast = list;
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
