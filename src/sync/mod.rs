//! Synchronization Support
//!
//! Ports take `&mut self` for every transaction, so one port is driven by
//! one context at a time. When the same port must be reached from an
//! interrupt handler, wrap it here.
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedPort`] - critical-section protected [`Port`](crate::Port)
//!
//! # Feature Flags
//!
//! - `critical-section`: enables this module
//!
//! # Example
//!
//! ```ignore
//! use nic_macctl::sync::SharedPort;
//!
//! static PORT: SharedPort<Mmio, FixedPhy> =
//!     SharedPort::new(Port::new(unsafe { Mmio::new(BAR0) }, FixedPhy::new(PhyCap::FDX40000)));
//!
//! fn link_irq() {
//!     let _ = PORT.with(|port| port.update_link());
//! }
//! ```

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::SharedPort;
