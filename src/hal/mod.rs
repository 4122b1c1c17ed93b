//! Hardware Abstraction Layer
//!
//! The two buses the rest of the crate talks through.
//!
//! # Modules
//!
//! - [`register`]: 32-bit register access with little-endian conversion
//! - [`mdio`]: MDIO/SMI bus for PHY communication
//!
//! # Delay Integration
//!
//! Busy polling takes `embedded_hal::delay::DelayNs` directly. Pass any
//! delay implementation from your HAL.

pub mod mdio;
pub mod register;

// Re-export commonly used types
pub use mdio::{MdcClockDivider, MdioBus, SmiMdio};
pub use register::{Mmio, RegisterBus};
