//! Receive filter and multicast list transactions.
//!
//! This module extends [`Port`] with:
//!
//! - **Filter mode** - the four accept flags (all unicast, multicast, all
//!   multicast, broadcast), applied through the shared reconfigure call
//! - **Multicast list** - up to 256 group addresses, applied as a whole
//!
//! How the groups land in hardware depends on the family. DesignWare puts
//! the first four in perfect-filter slots and hashes the rest; COMBO cards
//! fill their MAC memory and fall back to accepting all multicast.

use alloc::vec::Vec;

use super::config::{FilterMode, MacAddress};
use super::error::{ConfigError, ResourceError, Result};
use super::port::Port;
use crate::hal::register::RegisterBus;
use crate::internal::constants::MULTICAST_LIST_MAX;
use crate::phy::PhyOps;

// =============================================================================
// Filter Mode
// =============================================================================

impl<B: RegisterBus, P: PhyOps> Port<B, P> {
    /// Set the receive filter flags
    ///
    /// Any combination is accepted. On hardware failure all four flags are
    /// restored together.
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn set_filter(&mut self, filter: FilterMode) -> Result<()> {
        let ops = self.ops();
        let old = core::mem::replace(&mut self.config.filter, filter);
        if let Err(e) = ops.reconfigure(&mut self.bus, &self.config) {
            self.config.filter = old;
            #[cfg(feature = "defmt")]
            defmt::warn!("filter mode rolled back: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}

// =============================================================================
// Multicast List
// =============================================================================

impl<B: RegisterBus, P: PhyOps> Port<B, P> {
    /// Replace the multicast group list
    ///
    /// The previous list is saved in a temporary buffer for the duration of
    /// the call and copied back if the hardware rejects the new one.
    ///
    /// # Errors
    /// - [`ConfigError::TooManyAddresses`] above 256 entries
    /// - [`ResourceError::OutOfMemory`] if the rollback buffer cannot be
    ///   allocated; nothing is applied
    /// - the hardware error, with the previous list restored
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn set_multicast_list(&mut self, list: &[MacAddress]) -> Result<()> {
        if list.len() > MULTICAST_LIST_MAX {
            return Err(ConfigError::TooManyAddresses.into());
        }

        let ops = self.ops();
        let old_count = self.config.mulcst_count;
        let mut saved = Vec::new();
        if old_count > 0 {
            saved
                .try_reserve_exact(old_count)
                .map_err(|_| ResourceError::OutOfMemory)?;
            saved.extend_from_slice(&self.config.mulcst_list[..old_count]);
        }

        self.config.mulcst_list[..list.len()].copy_from_slice(list);
        self.config.mulcst_count = list.len();

        if let Err(e) = ops.multicast_list_set(&mut self.bus, &self.config) {
            self.config.mulcst_list[..old_count].copy_from_slice(&saved);
            self.config.mulcst_count = old_count;
            #[cfg(feature = "defmt")]
            defmt::warn!("multicast list rolled back to {} entries: {}", old_count, e);
            return Err(e.into());
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use core::alloc::{GlobalAlloc, Layout};
    use core::cell::Cell;
    use std::alloc::System;
    use std::vec::Vec;

    use super::*;
    use crate::driver::config::PhyCap;
    use crate::driver::error::{Error, HwError};
    use crate::driver::port::PortConfig;
    use crate::internal::register::dwmac::{GMACFF_OFFSET, GMACFF_PR, addr_high_offset};
    use crate::internal::register::ibuf::{
        IBUF_MAC_CHMODE_OFFSET, IBUF_ST_MAC_COUNT_SHIFT, IBUF_ST_OFFSET, IbufRegs, MacCheckMode,
    };
    use crate::mac::{MacType, NicFamily};
    use crate::testing::{MockPhy, MockRegisters, ScriptedMac, ScriptedOp};

    type TestPort = Port<MockRegisters, MockPhy>;

    // =========================================================================
    // Failing Allocator
    // =========================================================================

    /// System allocator that returns null while the current thread asks it to
    struct FailingAlloc;

    std::thread_local! {
        static FAIL_ALLOC: Cell<bool> = const { Cell::new(false) };
    }

    unsafe impl GlobalAlloc for FailingAlloc {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            if FAIL_ALLOC.try_with(Cell::get).unwrap_or(false) {
                return core::ptr::null_mut();
            }
            unsafe { System.alloc(layout) }
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            unsafe { System.dealloc(ptr, layout) }
        }
    }

    #[global_allocator]
    static ALLOCATOR: FailingAlloc = FailingAlloc;

    fn without_heap<R>(f: impl FnOnce() -> R) -> R {
        FAIL_ALLOC.with(|fail| fail.set(true));
        let result = f();
        FAIL_ALLOC.with(|fail| fail.set(false));
        result
    }

    fn port(family: NicFamily) -> TestPort {
        let mut port = Port::new(MockRegisters::new(), MockPhy::new(PhyCap::AN));
        port.select(family).unwrap();
        port
    }

    fn scripted_port() -> TestPort {
        let mut port = Port::new(MockRegisters::new(), MockPhy::new(PhyCap::AN));
        port.install_ops(&ScriptedMac, MacType::Ibuf);
        port
    }

    fn groups(n: usize) -> Vec<MacAddress> {
        (0..n)
            .map(|i| MacAddress::new([0x01, 0x00, 0x5E, 0x00, (i >> 8) as u8, i as u8]))
            .collect()
    }

    // =========================================================================
    // Filter Mode Tests
    // =========================================================================

    #[test]
    fn filter_applied_through_reconfigure() {
        let mut port = port(NicFamily::Dwmac);

        port.set_filter(FilterMode::promiscuous()).unwrap();

        assert_eq!(port.config().filter(), FilterMode::promiscuous());
        assert_ne!(port.bus.register(GMACFF_OFFSET) & GMACFF_PR, 0);
    }

    #[test]
    fn filter_restored_together_on_failure() {
        let mut port = scripted_port();
        port.set_filter(FilterMode::new()).unwrap();
        ScriptedMac::fail_on(&mut port.bus, ScriptedOp::Reconfigure);

        let result = port.set_filter(FilterMode {
            all_unicast: true,
            multicast: false,
            all_multicast: true,
            broadcast: false,
        });

        assert_eq!(result, Err(Error::Hw(HwError::VerifyFailed)));
        assert_eq!(port.config().filter(), FilterMode::new());
    }

    #[test]
    fn combo_filter_sets_check_mode() {
        let mut port = port(NicFamily::Combo100g);
        port.bus.set_register(IBUF_ST_OFFSET, 8 << IBUF_ST_MAC_COUNT_SHIFT);

        port.set_filter(FilterMode::new()).unwrap();
        assert_eq!(IbufRegs::check_mode(&mut port.bus), MacCheckMode::AllBroadcast);

        port.bus.stick(IBUF_MAC_CHMODE_OFFSET);
        assert!(port.set_filter(FilterMode::promiscuous()).is_err());
        assert_eq!(port.config().filter(), FilterMode::new());
    }

    // =========================================================================
    // Multicast List Tests
    // =========================================================================

    #[test]
    fn list_at_maximum_accepted() {
        let mut port = port(NicFamily::Dwmac);
        let list = groups(MULTICAST_LIST_MAX);

        port.set_multicast_list(&list).unwrap();

        assert_eq!(port.config().multicast_count(), MULTICAST_LIST_MAX);
        assert_eq!(port.config().multicast_list(), &list[..]);
    }

    #[test]
    fn list_above_maximum_rejected() {
        let mut port = scripted_port();
        let first = groups(3);
        port.set_multicast_list(&first).unwrap();

        let result = port.set_multicast_list(&groups(MULTICAST_LIST_MAX + 1));

        assert_eq!(result, Err(Error::Config(ConfigError::TooManyAddresses)));
        assert_eq!(port.config().multicast_list(), &first[..]);
        assert_eq!(ScriptedMac::calls(&port.bus, ScriptedOp::MulticastSet), 1);
    }

    #[test]
    fn list_restored_on_hardware_failure() {
        let mut port = scripted_port();
        let first = groups(2);
        port.set_multicast_list(&first).unwrap();
        let before: PortConfig = port.config().clone();
        ScriptedMac::fail_on(&mut port.bus, ScriptedOp::MulticastSet);

        let result = port.set_multicast_list(&groups(10));

        assert_eq!(result, Err(Error::Hw(HwError::VerifyFailed)));
        assert_eq!(*port.config(), before);
        assert_eq!(port.config().multicast_list(), &first[..]);
    }

    #[test]
    fn rollback_buffer_allocation_failure_applies_nothing() {
        let mut port = scripted_port();
        let first = groups(5);
        port.set_multicast_list(&first).unwrap();
        let next = groups(12);
        let before = port.config().clone();

        let result = without_heap(|| port.set_multicast_list(&next));

        assert_eq!(result, Err(Error::Resource(ResourceError::OutOfMemory)));
        assert_eq!(*port.config(), before);
        assert_eq!(port.config().mulcst_list, before.mulcst_list);
        assert_eq!(port.config().multicast_list(), &first[..]);
        assert_eq!(ScriptedMac::calls(&port.bus, ScriptedOp::MulticastSet), 1);
    }

    #[test]
    fn failure_from_empty_list_restores_empty() {
        let mut port = scripted_port();
        ScriptedMac::fail_on(&mut port.bus, ScriptedOp::MulticastSet);

        assert!(port.set_multicast_list(&groups(4)).is_err());
        assert_eq!(port.config().multicast_count(), 0);
        assert!(port.config().multicast_list().is_empty());
    }

    #[test]
    fn shorter_list_replaces_longer() {
        let mut port = port(NicFamily::Dwmac);
        port.set_multicast_list(&groups(6)).unwrap();
        port.set_multicast_list(&groups(1)).unwrap();

        assert_eq!(port.config().multicast_count(), 1);
        // Slot 2 cleared in hardware
        assert_eq!(port.bus.register(addr_high_offset(2)), 0);
    }

    #[test]
    fn empty_list_clears() {
        let mut port = port(NicFamily::Dwmac);
        port.set_multicast_list(&groups(2)).unwrap();
        port.set_multicast_list(&[]).unwrap();

        assert_eq!(port.config().multicast_count(), 0);
    }
}
