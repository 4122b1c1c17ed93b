//! Centralized Constants
//!
//! This module provides a single source of truth for the limits and defaults
//! used by the transaction layer and the hardware operation sets.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Frame sizes**: PDU bounds and SDU/PDU adjustment
//! - **Addresses**: MAC address length, multicast list bound, defaults
//! - **Flow control**: IEEE 802.3 PAUSE defaults
//! - **Timing**: MDIO and PHY polling limits
//!
//! # Note
//!
//! Hardware register bit definitions remain in their respective modules
//! (`register/dwmac.rs`, `register/ibuf.rs`, `phy_regs.rs`) as they are
//! specific to those hardware blocks.

// =============================================================================
// Frame Sizes
// =============================================================================

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: u32 = 14;

/// VLAN tag size
pub const VLAN_TAG_SIZE: u32 = 4;

/// CRC/FCS size at end of frame
pub const CRC_SIZE: u32 = 4;

/// Bytes added to an SDU to obtain the PDU before alignment
pub const PDU_ADJUSTMENT: u32 = ETH_HEADER_SIZE + VLAN_TAG_SIZE + CRC_SIZE;

/// PDU alignment in bytes
pub const PDU_ALIGN: u32 = 8;

/// Smallest PDU a port accepts
pub const MAC_PDU_MIN: u32 = 60;

/// Largest PDU a port accepts
pub const MAC_PDU_MAX: u32 = 9216;

/// Standard Ethernet MTU (Maximum Transmission Unit)
pub const MTU: u32 = 1500;

// =============================================================================
// Addresses
// =============================================================================

/// MAC address length in bytes
pub const MAC_ADDR_LEN: usize = 6;

/// Maximum number of entries in a port's multicast address list
pub const MULTICAST_LIST_MAX: usize = 256;

/// Default locally-administered MAC address
/// Bit 1 of first byte = 1 indicates locally administered
/// Bit 0 of first byte = 0 indicates unicast
pub const DEFAULT_MAC_ADDR: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];

// =============================================================================
// Flow Control (IEEE 802.3 PAUSE)
// =============================================================================

/// Maximum PAUSE time value
/// Each unit = 512 bit times (slot time)
pub const PAUSE_TIME_MAX: u16 = 0xFFFF;

// =============================================================================
// Timing
// =============================================================================

/// MDIO operation timeout in microseconds
pub const MDIO_TIMEOUT_US: u32 = 1_000;

/// MDIO busy poll interval in microseconds
pub const MDIO_POLL_INTERVAL_US: u32 = 10;

/// PHY soft reset timeout in milliseconds
pub const PHY_RESET_TIMEOUT_MS: u32 = 500;

/// PHY reset poll interval in microseconds
pub const PHY_RESET_POLL_INTERVAL_US: u32 = 1_000;
