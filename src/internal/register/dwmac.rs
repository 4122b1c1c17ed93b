//! Synopsys DesignWare MAC (DWMAC) core registers
//!
//! The GMAC register bank handles frame reception filtering, station
//! address matching and IEEE 802.3x flow control. Offsets are relative to
//! the MAC block; the MMC counter block follows at 0x100.

use super::{reg_bit_set, reg_ro, reg_rw};
use crate::driver::error::HwResult;
use crate::hal::register::RegisterBus;

// =============================================================================
// Register Offsets
// =============================================================================

/// GMAC Configuration Register offset
pub const GMACCONFIG_OFFSET: usize = 0x00;
/// GMAC Frame Filter Register offset
pub const GMACFF_OFFSET: usize = 0x04;
/// GMAC Hash Table High Register offset
pub const GMACHASTH_OFFSET: usize = 0x08;
/// GMAC Hash Table Low Register offset
pub const GMACHASTL_OFFSET: usize = 0x0C;
/// GMAC MII Address Register offset
pub const GMACMIIADDR_OFFSET: usize = 0x10;
/// GMAC MII Data Register offset
pub const GMACMIIDATA_OFFSET: usize = 0x14;
/// GMAC Flow Control Register offset
pub const GMACFC_OFFSET: usize = 0x18;
/// GMAC Address 0 High Register offset (upper 16 bits of station address)
pub const GMACADDR0H_OFFSET: usize = 0x40;
/// GMAC Address 0 Low Register offset (lower 32 bits of station address)
pub const GMACADDR0L_OFFSET: usize = 0x44;
/// GMAC SGMII/RGMII Status Register offset
pub const GMACSGMII_OFFSET: usize = 0xD8;
/// GMAC Watchdog Timeout Register offset
pub const GMACWDT_OFFSET: usize = 0xDC;

/// Number of additional perfect-filter slots (beyond the station address)
pub const MAC_ADDR_FILTER_COUNT: usize = 4;

/// Offset of the high register of perfect-filter slot `slot` (1-based)
#[inline(always)]
pub const fn addr_high_offset(slot: usize) -> usize {
    GMACADDR0H_OFFSET + slot * 8
}

/// Offset of the low register of perfect-filter slot `slot` (1-based)
#[inline(always)]
pub const fn addr_low_offset(slot: usize) -> usize {
    GMACADDR0L_OFFSET + slot * 8
}

// =============================================================================
// MMC Counter Offsets
// =============================================================================

/// Transmitted octets, good and bad
pub const MMC_TXOCTETCOUNT_GB_OFFSET: usize = 0x114;
/// Transmitted frames, good and bad
pub const MMC_TXFRAMECOUNT_GB_OFFSET: usize = 0x118;
/// Received frames, good and bad
pub const MMC_RXFRAMECOUNT_GB_OFFSET: usize = 0x180;
/// Received octets, good and bad
pub const MMC_RXOCTETCOUNT_GB_OFFSET: usize = 0x184;
/// Received frames with CRC error
pub const MMC_RXCRCERROR_OFFSET: usize = 0x194;

// =============================================================================
// GMAC Configuration Register (GMACCONFIG) Bits
// =============================================================================

/// Receiver Enable
pub const GMACCONFIG_RE: u32 = 1 << 2;
/// Jumbo Frame Enable
pub const GMACCONFIG_JE: u32 = 1 << 20;

/// Largest frame accepted without jumbo enable (1518 + VLAN tag)
pub const STANDARD_FRAME_MAX: u32 = 1522;
/// Largest frame accepted with jumbo enable and no programmed watchdog
pub const JUMBO_FRAME_MAX: u32 = 9022;

// =============================================================================
// GMAC Frame Filter Register (GMACFF) Bits
// =============================================================================

/// Promiscuous Mode
pub const GMACFF_PR: u32 = 1 << 0;
/// Hash Multicast
pub const GMACFF_HMC: u32 = 1 << 2;
/// Pass All Multicast
pub const GMACFF_PM: u32 = 1 << 4;
/// Disable Broadcast Frames
pub const GMACFF_DBF: u32 = 1 << 5;
/// Hash or Perfect Filter: pass on either match instead of hash only
pub const GMACFF_HPF: u32 = 1 << 10;

// =============================================================================
// GMAC Flow Control Register (GMACFC) Bits
// =============================================================================

/// Transmit Flow Control Enable
pub const GMACFC_TFE: u32 = 1 << 1;
/// Receive Flow Control Enable
pub const GMACFC_RFE: u32 = 1 << 2;
/// Pause Time shift
pub const GMACFC_PT_SHIFT: u32 = 16;
/// Pause Time mask
pub const GMACFC_PT_MASK: u32 = 0xFFFF << 16;

// =============================================================================
// GMAC Address High Register Bits
// =============================================================================

/// Address Enable
pub const GMACADDRH_AE: u32 = 1 << 31;

// =============================================================================
// GMAC SGMII/RGMII Status and Watchdog Bits
// =============================================================================

/// Link Status
pub const GMACSGMII_LNKSTS: u32 = 1 << 3;

/// Watchdog Timeout mask (bits 13:0)
pub const GMACWDT_WTO_MASK: u32 = 0x3FFF;
/// Programmable Watchdog Enable
pub const GMACWDT_PWE: u32 = 1 << 16;

// =============================================================================
// MAC Register Access Functions
// =============================================================================

/// DWMAC register block accessors
pub struct DwmacRegs;

impl DwmacRegs {
    // -------------------------------------------------------------------------
    // Register accessors (generated by macros)
    // -------------------------------------------------------------------------

    reg_rw!(config, set_config, GMACCONFIG_OFFSET, "GMAC Configuration register");
    reg_rw!(frame_filter, set_frame_filter, GMACFF_OFFSET, "Frame Filter register");
    reg_rw!(hash_table_high, set_hash_table_high, GMACHASTH_OFFSET, "Hash Table High register");
    reg_rw!(hash_table_low, set_hash_table_low, GMACHASTL_OFFSET, "Hash Table Low register");
    reg_rw!(flow_control, set_flow_control, GMACFC_OFFSET, "Flow Control register");
    reg_rw!(watchdog, set_watchdog, GMACWDT_OFFSET, "Watchdog Timeout register");

    reg_ro!(sgmii_status, GMACSGMII_OFFSET, "SGMII/RGMII Status register");
    reg_ro!(mmc_tx_octets, MMC_TXOCTETCOUNT_GB_OFFSET, "MMC transmitted octet counter");
    reg_ro!(mmc_tx_frames, MMC_TXFRAMECOUNT_GB_OFFSET, "MMC transmitted frame counter");
    reg_ro!(mmc_rx_frames, MMC_RXFRAMECOUNT_GB_OFFSET, "MMC received frame counter");
    reg_ro!(mmc_rx_octets, MMC_RXOCTETCOUNT_GB_OFFSET, "MMC received octet counter");
    reg_ro!(mmc_rx_crc_errors, MMC_RXCRCERROR_OFFSET, "MMC received CRC error counter");

    reg_bit_set!(set_jumbo, GMACCONFIG_OFFSET, GMACCONFIG_JE, "jumbo frame enable");
    reg_bit_set!(set_receiver, GMACCONFIG_OFFSET, GMACCONFIG_RE, "receiver enable");

    // -------------------------------------------------------------------------
    // Station address
    // -------------------------------------------------------------------------

    /// Program the station address into slot 0
    pub fn set_station_address<B: RegisterBus + ?Sized>(bus: &mut B, addr: &[u8; 6]) -> HwResult<()> {
        let (high, low) = encode_address(addr);
        // Low first: the hardware latches the pair on the high write
        bus.write32_verified(GMACADDR0L_OFFSET, low)?;
        bus.write32_verified(GMACADDR0H_OFFSET, high | GMACADDRH_AE)
    }

    /// Read the station address back from slot 0
    pub fn station_address<B: RegisterBus + ?Sized>(bus: &mut B) -> [u8; 6] {
        let low = bus.read32(GMACADDR0L_OFFSET);
        let high = bus.read32(GMACADDR0H_OFFSET);
        decode_address(high, low)
    }

    /// Program or disable a perfect-filter slot (1..=4)
    pub fn set_filter_slot<B: RegisterBus + ?Sized>(
        bus: &mut B,
        slot: usize,
        addr: Option<&[u8; 6]>,
    ) -> HwResult<()> {
        debug_assert!((1..=MAC_ADDR_FILTER_COUNT).contains(&slot));
        let (high, low) = match addr {
            Some(addr) => {
                let (high, low) = encode_address(addr);
                (high | GMACADDRH_AE, low)
            }
            None => (0, 0),
        };
        bus.write32_verified(addr_low_offset(slot), low)?;
        bus.write32_verified(addr_high_offset(slot), high)
    }

    // -------------------------------------------------------------------------
    // Hash table operations
    // -------------------------------------------------------------------------

    /// Set full 64-bit hash table
    pub fn set_hash_table<B: RegisterBus + ?Sized>(bus: &mut B, value: u64) -> HwResult<()> {
        Self::set_hash_table_low(bus, value as u32)?;
        Self::set_hash_table_high(bus, (value >> 32) as u32)
    }

    /// Get full 64-bit hash table
    pub fn hash_table<B: RegisterBus + ?Sized>(bus: &mut B) -> u64 {
        let low = Self::hash_table_low(bus) as u64;
        let high = Self::hash_table_high(bus) as u64;
        low | (high << 32)
    }

    /// Compute hash index for a MAC address
    ///
    /// Uses the Ethernet CRC-32 polynomial; the hardware selects one of the
    /// 64 hash table bits with the low 6 bits of the CRC.
    pub fn compute_hash_index(addr: &[u8; 6]) -> u8 {
        const CRC32_POLY: u32 = 0xEDB8_8320;
        let mut crc: u32 = 0xFFFF_FFFF;

        for &byte in addr {
            let mut data = byte;
            for _ in 0..8 {
                if ((crc ^ data as u32) & 1) != 0 {
                    crc = (crc >> 1) ^ CRC32_POLY;
                } else {
                    crc >>= 1;
                }
                data >>= 1;
            }
        }
        (crc & 0x3F) as u8
    }
}

/// Split an address into (high, low) register words
#[inline]
pub const fn encode_address(addr: &[u8; 6]) -> (u32, u32) {
    let low = (addr[0] as u32)
        | ((addr[1] as u32) << 8)
        | ((addr[2] as u32) << 16)
        | ((addr[3] as u32) << 24);
    let high = (addr[4] as u32) | ((addr[5] as u32) << 8);
    (high, low)
}

/// Join (high, low) register words into an address
#[inline]
pub const fn decode_address(high: u32, low: u32) -> [u8; 6] {
    [
        low as u8,
        (low >> 8) as u8,
        (low >> 16) as u8,
        (low >> 24) as u8,
        high as u8,
        (high >> 8) as u8,
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
