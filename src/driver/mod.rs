//! Port configuration transactions.
//!
//! This module contains the state and the transactions that change it:
//!
//! - [`config`] - Value types and the [`PortSettings`] builder
//! - [`error`] - Error types and result aliases
//! - [`port`] - [`Port`], [`PortConfig`] and the PDU, address, drain, link,
//!   statistics and default-queue transactions
//! - [`filtering`] - Receive filter and multicast list transactions
//! - [`flow`] - Flow-control transactions and link resolution
//!
//! # Example
//!
//! ```ignore
//! use nic_macctl::driver::{FilterMode, Port};
//!
//! port.set_filter(FilterMode::promiscuous())?;
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod filtering;
pub mod flow;
pub mod port;

// Re-exports for convenience
pub use config::{
    FilterMode, FlowControl, FlowControlState, MacAddress, MacStats, PhyCap, PortSettings,
    RxQueueId, pdu_from_sdu, sdu_from_pdu,
};
pub use error::{ConfigError, ConfigResult, Error, HwError, HwResult, ResourceError, Result};
pub use flow::{decode_pause, encode_pause, resolve_pause};
pub use port::{Port, PortConfig};
