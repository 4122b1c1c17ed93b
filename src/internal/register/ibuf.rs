//! COMBO card IBUF/OBUF registers
//!
//! The input buffer (IBUF) of a COMBO port owns MAC address checking, the
//! MTU limit and the receive counters; the output buffer (OBUF) owns the
//! transmit counters. Both sit in the port's register window at fixed
//! bases. Every counter is 64 bits wide, split into low and high words.

use super::{reg_bit_set, reg_counter64, reg_ro, reg_rw};
use crate::driver::error::HwResult;
use crate::hal::register::RegisterBus;

// =============================================================================
// Block Bases
// =============================================================================

/// IBUF block offset within the port window
pub const IBUF_BASE: usize = 0x8000;
/// OBUF block offset within the port window
pub const OBUF_BASE: usize = 0x9000;

// =============================================================================
// IBUF Register Offsets
// =============================================================================

/// Total received frames, low word
pub const IBUF_TRFCL_OFFSET: usize = IBUF_BASE + 0x00;
/// Correct frames, low word
pub const IBUF_CFCL_OFFSET: usize = IBUF_BASE + 0x04;
/// Discarded frames, low word
pub const IBUF_DFCL_OFFSET: usize = IBUF_BASE + 0x08;
/// Frames discarded on buffer overflow, low word
pub const IBUF_BODFCL_OFFSET: usize = IBUF_BASE + 0x0C;
/// Total received frames, high word
pub const IBUF_TRFCH_OFFSET: usize = IBUF_BASE + 0x10;
/// Correct frames, high word
pub const IBUF_CFCH_OFFSET: usize = IBUF_BASE + 0x14;
/// Discarded frames, high word
pub const IBUF_DFCH_OFFSET: usize = IBUF_BASE + 0x18;
/// Frames discarded on buffer overflow, high word
pub const IBUF_BODFCH_OFFSET: usize = IBUF_BASE + 0x1C;
/// IBUF enable register
pub const IBUF_EN_OFFSET: usize = IBUF_BASE + 0x20;
/// IBUF status register
pub const IBUF_ST_OFFSET: usize = IBUF_BASE + 0x28;
/// Frame MTU
pub const IBUF_MTU_OFFSET: usize = IBUF_BASE + 0x34;
/// MAC address check mode
pub const IBUF_MAC_CHMODE_OFFSET: usize = IBUF_BASE + 0x38;
/// Octets received in correct frames, low word
pub const IBUF_OROCL_OFFSET: usize = IBUF_BASE + 0x3C;
/// Octets received in correct frames, high word
pub const IBUF_OROCH_OFFSET: usize = IBUF_BASE + 0x40;
/// MAC address memory, two words per entry
pub const IBUF_MAC_MEM_OFFSET: usize = IBUF_BASE + 0x80;

/// Capacity limit of the MAC address memory (MAC_COUNT is 5 bits)
pub const IBUF_MAX_MAC_COUNT: usize = 32;

// =============================================================================
// OBUF Register Offsets
// =============================================================================

/// Total sent frames, low word
pub const OBUF_TSFCL_OFFSET: usize = OBUF_BASE + 0x00;
/// Octets sent, low word
pub const OBUF_OSCL_OFFSET: usize = OBUF_BASE + 0x04;
/// Total discarded frames, low word
pub const OBUF_TDFCL_OFFSET: usize = OBUF_BASE + 0x08;
/// Total sent frames, high word
pub const OBUF_TSFCH_OFFSET: usize = OBUF_BASE + 0x10;
/// Octets sent, high word
pub const OBUF_OSCH_OFFSET: usize = OBUF_BASE + 0x14;
/// Total discarded frames, high word
pub const OBUF_TDFCH_OFFSET: usize = OBUF_BASE + 0x18;
/// OBUF enable register
pub const OBUF_EN_OFFSET: usize = OBUF_BASE + 0x20;
/// OBUF status register
pub const OBUF_ST_OFFSET: usize = OBUF_BASE + 0x30;

// =============================================================================
// Register Bits
// =============================================================================

/// Buffer enable (IBUF_EN, OBUF_EN)
pub const BUF_EN: u32 = 1 << 0;

/// Link up (IBUF_ST)
pub const IBUF_ST_LINK_UP: u32 = 0x80;
/// MAC memory capacity shift (IBUF_ST)
pub const IBUF_ST_MAC_COUNT_SHIFT: u32 = 23;
/// MAC memory capacity mask, after shifting (IBUF_ST)
pub const IBUF_ST_MAC_COUNT_MASK: u32 = 0x1F;

/// Check mode field mask (MAC_CHMODE)
pub const MAC_CHMODE_MASK: u32 = 0x3;

/// Valid flag in the second word of a MAC memory entry
pub const MAC_MEM_VALID: u32 = 1 << 16;

// =============================================================================
// MAC Check Mode
// =============================================================================

/// Address check mode of the IBUF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum MacCheckMode {
    /// Accept every frame
    Promiscuous = 0x0,
    /// Accept frames whose destination is in the MAC memory
    OnlyValid = 0x1,
    /// As `OnlyValid`, plus broadcast frames
    AllBroadcast = 0x2,
    /// As `AllBroadcast`, plus every multicast frame
    AllMulticast = 0x3,
}

impl MacCheckMode {
    /// Decode the low two bits of MAC_CHMODE
    pub const fn from_bits(bits: u32) -> Self {
        match bits & MAC_CHMODE_MASK {
            0x1 => Self::OnlyValid,
            0x2 => Self::AllBroadcast,
            0x3 => Self::AllMulticast,
            _ => Self::Promiscuous,
        }
    }
}

// =============================================================================
// IBUF/OBUF Register Access Functions
// =============================================================================

/// IBUF/OBUF register block accessors
pub struct IbufRegs;

impl IbufRegs {
    reg_rw!(mtu, set_mtu, IBUF_MTU_OFFSET, "IBUF MTU register");
    reg_rw!(check_mode_raw, set_check_mode_raw, IBUF_MAC_CHMODE_OFFSET, "IBUF MAC check mode register");

    reg_ro!(status, IBUF_ST_OFFSET, "IBUF status register");
    reg_ro!(obuf_status, OBUF_ST_OFFSET, "OBUF status register");

    reg_bit_set!(set_ibuf_enabled, IBUF_EN_OFFSET, BUF_EN, "IBUF enable");
    reg_bit_set!(set_obuf_enabled, OBUF_EN_OFFSET, BUF_EN, "OBUF enable");

    reg_counter64!(rx_total_frames, IBUF_TRFCL_OFFSET, IBUF_TRFCH_OFFSET, "total received frames");
    reg_counter64!(rx_good_frames, IBUF_CFCL_OFFSET, IBUF_CFCH_OFFSET, "correctly received frames");
    reg_counter64!(rx_discarded, IBUF_DFCL_OFFSET, IBUF_DFCH_OFFSET, "discarded received frames");
    reg_counter64!(rx_overflow, IBUF_BODFCL_OFFSET, IBUF_BODFCH_OFFSET, "frames discarded on overflow");
    reg_counter64!(rx_octets, IBUF_OROCL_OFFSET, IBUF_OROCH_OFFSET, "octets in correct frames");
    reg_counter64!(tx_frames, OBUF_TSFCL_OFFSET, OBUF_TSFCH_OFFSET, "total sent frames");
    reg_counter64!(tx_octets, OBUF_OSCL_OFFSET, OBUF_OSCH_OFFSET, "sent octets");
    reg_counter64!(tx_discarded, OBUF_TDFCL_OFFSET, OBUF_TDFCH_OFFSET, "discarded sent frames");

    /// Check whether the link is up
    #[inline]
    pub fn is_link_up<B: RegisterBus + ?Sized>(bus: &mut B) -> bool {
        Self::status(bus) & IBUF_ST_LINK_UP != 0
    }

    /// Number of entries the MAC memory holds
    #[inline]
    pub fn mac_count<B: RegisterBus + ?Sized>(bus: &mut B) -> usize {
        let count = (Self::status(bus) >> IBUF_ST_MAC_COUNT_SHIFT) & IBUF_ST_MAC_COUNT_MASK;
        count as usize
    }

    /// Read the current check mode
    pub fn check_mode<B: RegisterBus + ?Sized>(bus: &mut B) -> MacCheckMode {
        MacCheckMode::from_bits(Self::check_mode_raw(bus))
    }

    /// Write the check mode, keeping the reserved upper bits
    pub fn set_check_mode<B: RegisterBus + ?Sized>(bus: &mut B, mode: MacCheckMode) -> HwResult<()> {
        let value = (bus.read32(IBUF_MAC_CHMODE_OFFSET) & !MAC_CHMODE_MASK) | mode as u32;
        bus.write32_verified(IBUF_MAC_CHMODE_OFFSET, value)
    }

    /// Program or invalidate MAC memory entry `index`
    pub fn set_mac_entry<B: RegisterBus + ?Sized>(
        bus: &mut B,
        index: usize,
        addr: Option<&[u8; 6]>,
    ) -> HwResult<()> {
        debug_assert!(index < IBUF_MAX_MAC_COUNT);
        let (word0, word1) = match addr {
            Some(addr) => {
                let (word0, word1) = encode_entry(addr);
                (word0, word1 | MAC_MEM_VALID)
            }
            None => (0, 0),
        };
        let offset = IBUF_MAC_MEM_OFFSET + index * 8;
        bus.write32_verified(offset, word0)?;
        bus.write32_verified(offset + 4, word1)
    }

    /// Read MAC memory entry `index`, `None` when it is not valid
    pub fn mac_entry<B: RegisterBus + ?Sized>(bus: &mut B, index: usize) -> Option<[u8; 6]> {
        let offset = IBUF_MAC_MEM_OFFSET + index * 8;
        let word0 = bus.read32(offset);
        let word1 = bus.read32(offset + 4);
        (word1 & MAC_MEM_VALID != 0).then(|| decode_entry(word0, word1))
    }
}

/// Split an address into MAC memory words (address big-endian, low word first)
#[inline]
pub const fn encode_entry(addr: &[u8; 6]) -> (u32, u32) {
    let word0 = ((addr[2] as u32) << 24)
        | ((addr[3] as u32) << 16)
        | ((addr[4] as u32) << 8)
        | (addr[5] as u32);
    let word1 = ((addr[0] as u32) << 8) | (addr[1] as u32);
    (word0, word1)
}

/// Join MAC memory words into an address
#[inline]
pub const fn decode_entry(word0: u32, word1: u32) -> [u8; 6] {
    [
        (word1 >> 8) as u8,
        word1 as u8,
        (word0 >> 24) as u8,
        (word0 >> 16) as u8,
        (word0 >> 8) as u8,
        word0 as u8,
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
