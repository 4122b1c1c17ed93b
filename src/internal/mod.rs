//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//! Types in this module may change without notice between minor versions.
//!
//! # Contents
//!
//! - [`register`]: Register bank layouts for the DWMAC and COMBO IBUF/OBUF blocks
//! - [`constants`]: Frame size limits, defaults and polling budgets
//! - [`phy_regs`]: IEEE 802.3 Clause 22 PHY register definitions

pub(crate) mod constants;
pub(crate) mod phy_regs;
pub(crate) mod register;
