//! NIC MAC Control Plane
//!
//! A `no_std` transaction manager for the link-layer configuration of a
//! network port: frame size, station address, receive filter, flow control,
//! multicast groups and drain state.
//!
//! Every change is staged in software, pushed to the hardware through the
//! operation set selected for the device family, and rolled back if the
//! hardware refuses it.
//!
//! # Architecture
//!
//! The crate is organized into four layers:
//!
//! 1. **Transactions** ([`driver`]): [`Port`] and its [`PortConfig`]
//! 2. **Operation Sets** ([`mac`]): per-family [`MacOps`] and the selector
//! 3. **PHY Layer** ([`phy`]): [`PhyOps`] over Clause 22 MDIO or a fixed link
//! 4. **HAL Layer** ([`hal`]): register and MDIO buses
//!
//! ## Supported Hardware
//!
//! - **Synopsys DesignWare GMAC**: platform MACs, perfect and hash filtering
//! - **Netcope COMBO-80G/100G/100G2**: IBUF/OBUF MAC memory filtering
//!
//! Additional families can be added by implementing [`MacOps`] and adding a
//! [`NicFamily`] variant.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting and log messages
//! - `critical-section`: Enable ISR-safe `SharedPort` wrapper
//!
//! # Example
//!
//! ```ignore
//! use nic_macctl::{FlowControl, Mmio, NicFamily, Port, PortSettings};
//! use nic_macctl::hal::SmiMdio;
//! use nic_macctl::phy::Clause22Phy;
//!
//! let mdio = SmiMdio::new(unsafe { Mmio::new(GMAC_BASE) }, delay);
//! let phy = Clause22Phy::new(mdio, phy_delay, 1)?;
//! let mut port = Port::new(unsafe { Mmio::new(GMAC_BASE) }, phy);
//!
//! port.select(NicFamily::Dwmac)?;
//! port.phy_probe()?;
//! port.configure(
//!     &PortSettings::new()
//!         .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
//!         .with_flow_control(FlowControl::RESPOND, true),
//! )?;
//!
//! // Later, from the link-change path
//! if port.update_link()? {
//!     let fc = port.flow_control();
//! }
//! ```
//!
//! # Memory Requirements
//!
//! A [`Port`] holds a fixed 256-entry multicast table (about 1.5 KB). The
//! only heap use is the rollback copy of the old list during
//! [`Port::set_multicast_list`].

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

extern crate alloc;

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod hal;
pub mod mac;
pub mod phy;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    FilterMode, FlowControl, FlowControlState, MacAddress, MacStats, PhyCap, PortSettings,
    RxQueueId, pdu_from_sdu, sdu_from_pdu,
};
pub use driver::error::{ConfigError, ConfigResult, Error, HwError, HwResult, ResourceError, Result};
pub use driver::port::{Port, PortConfig};
pub use hal::register::{Mmio, RegisterBus};
pub use mac::{MacOps, MacType, NicFamily};

// Re-export PHY types
pub use phy::{Clause22Phy, FixedPhy, PhyOps};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedPort;

/// Frame size limits and defaults.
pub mod constants {
    pub use crate::internal::constants::{
        CRC_SIZE, DEFAULT_MAC_ADDR, ETH_HEADER_SIZE, MAC_ADDR_LEN, MAC_PDU_MAX, MAC_PDU_MIN, MTU,
        MULTICAST_LIST_MAX, PDU_ADJUSTMENT, PDU_ALIGN, VLAN_TAG_SIZE,
    };
}

/// Low-level register accessors for advanced use.
///
/// These are intentionally separated from the primary facade. Most users should
/// prefer the port transactions instead of touching registers directly.
///
/// # Safety
///
/// Direct register access bypasses the software state kept in [`PortConfig`].
/// Anything written here is invisible to rollback.
pub mod unsafe_registers {
    pub use crate::internal::register::dwmac::DwmacRegs;
    pub use crate::internal::register::ibuf::{IbufRegs, MacCheckMode};
}
