//! IEEE 802.3 Clause 22 PHY Register Definitions
//!
//! Registers 0-15 are standardized; the generic PHY driver touches only
//! these, so vendor-specific registers 16-31 are not listed.
//!
//! | Register | Name | Description |
//! |----------|------|-------------|
//! | 0 | BMCR | Basic Mode Control |
//! | 1 | BMSR | Basic Mode Status |
//! | 4 | ANAR | Auto-Negotiation Advertisement |
//! | 5 | ANLPAR | Link Partner Ability |
//! | 9 | GBCR | 1000BASE-T Control |
//! | 10 | GBSR | 1000BASE-T Status |
//! | 15 | ESTATUS | Extended Status |

// =============================================================================
// Standard PHY Register Addresses
// =============================================================================

/// Standard PHY register addresses
pub mod phy_reg {
    /// Basic Mode Control Register
    pub const BMCR: u8 = 0;
    /// Basic Mode Status Register
    pub const BMSR: u8 = 1;
    /// PHY Identifier 1
    pub const PHYIDR1: u8 = 2;
    /// PHY Identifier 2
    pub const PHYIDR2: u8 = 3;
    /// Auto-Negotiation Advertisement Register
    pub const ANAR: u8 = 4;
    /// Auto-Negotiation Link Partner Ability Register
    pub const ANLPAR: u8 = 5;
    /// 1000BASE-T Control Register
    pub const GBCR: u8 = 9;
    /// 1000BASE-T Status Register
    pub const GBSR: u8 = 10;
    /// Extended Status Register
    pub const ESTATUS: u8 = 15;
}

/// Highest valid Clause 22 PHY address
pub const PHY_ADDR_MAX: u8 = 31;

// =============================================================================
// BMCR - Basic Mode Control Register (Register 0)
// =============================================================================

/// BMCR bits
pub mod bmcr {
    /// Soft reset, self-clearing
    pub const RESET: u16 = 1 << 15;
    /// Speed select LSB (100 Mbps if set and MSB clear)
    pub const SPEED_100: u16 = 1 << 13;
    /// Auto-negotiation enable
    pub const AN_ENABLE: u16 = 1 << 12;
    /// Restart auto-negotiation, self-clearing
    pub const AN_RESTART: u16 = 1 << 9;
    /// Duplex mode (full duplex if set)
    pub const DUPLEX_FULL: u16 = 1 << 8;
    /// Speed select MSB (1000 Mbps if set and LSB clear)
    pub const SPEED_1000: u16 = 1 << 6;
}

// =============================================================================
// BMSR - Basic Mode Status Register (Register 1)
// =============================================================================

/// BMSR bits
pub mod bmsr {
    /// 100BASE-TX full duplex capable
    pub const TX_FD_CAPABLE: u16 = 1 << 14;
    /// 100BASE-TX half duplex capable
    pub const TX_HD_CAPABLE: u16 = 1 << 13;
    /// 10BASE-T full duplex capable
    pub const T10_FD_CAPABLE: u16 = 1 << 12;
    /// 10BASE-T half duplex capable
    pub const T10_HD_CAPABLE: u16 = 1 << 11;
    /// Extended status register present
    pub const ESTATUS: u16 = 1 << 8;
    /// Auto-negotiation complete
    pub const AN_COMPLETE: u16 = 1 << 5;
    /// Auto-negotiation ability
    pub const AN_ABILITY: u16 = 1 << 3;
}

// =============================================================================
// ANAR / ANLPAR - Advertisement and Link Partner Ability (Registers 4, 5)
// =============================================================================

/// ANAR bits; ANLPAR uses the same layout for the partner's abilities
pub mod anar {
    /// Asymmetric pause
    pub const PAUSE_ASYM: u16 = 1 << 11;
    /// Pause capable
    pub const PAUSE: u16 = 1 << 10;
    /// 100BASE-TX full duplex
    pub const TX_FD: u16 = 1 << 8;
    /// 100BASE-TX half duplex
    pub const TX_HD: u16 = 1 << 7;
    /// 10BASE-T full duplex
    pub const T10_FD: u16 = 1 << 6;
    /// 10BASE-T half duplex
    pub const T10_HD: u16 = 1 << 5;
    /// IEEE 802.3 selector value
    pub const SELECTOR_IEEE802_3: u16 = 0x0001;
}

// =============================================================================
// GBCR / GBSR - 1000BASE-T Control and Status (Registers 9, 10)
// =============================================================================

/// GBCR bits
pub mod gbcr {
    /// Advertise 1000BASE-T full duplex
    pub const ADV_1000_FD: u16 = 1 << 9;
    /// Advertise 1000BASE-T half duplex
    pub const ADV_1000_HD: u16 = 1 << 8;
}

/// GBSR bits
pub mod gbsr {
    /// Link partner 1000BASE-T full duplex
    pub const LP_1000_FD: u16 = 1 << 11;
    /// Link partner 1000BASE-T half duplex
    pub const LP_1000_HD: u16 = 1 << 10;
}

// =============================================================================
// ESTATUS - Extended Status Register (Register 15)
// =============================================================================

/// ESTATUS bits
pub mod estatus {
    /// 1000BASE-T full duplex capable
    pub const T1000_FD: u16 = 1 << 13;
    /// 1000BASE-T half duplex capable
    pub const T1000_HD: u16 = 1 << 12;
}
