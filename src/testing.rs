//! Testing utilities and mock implementations
//!
//! Mocks for exercising operation sets, PHYs and port transactions on the
//! host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::vec::Vec;

use crate::driver::config::{PhyCap, RxQueueId};
use crate::driver::error::{Error, HwError, HwResult, Result};
use crate::driver::port::PortConfig;
use crate::hal::mdio::MdioBus;
use crate::hal::register::RegisterBus;
use crate::mac::MacOps;
use crate::phy::PhyOps;

// =============================================================================
// Mock Register Bank
// =============================================================================

/// Register map standing in for a memory-mapped register bank
///
/// Unset registers read as zero. Every write is logged, including writes to
/// stuck registers, which are otherwise dropped so a verified write fails.
///
/// # Example
///
/// ```ignore
/// let mut bus = MockRegisters::new();
/// bus.stick(GMACWDT_OFFSET);
/// assert_eq!(bus.write32_verified(GMACWDT_OFFSET, 1), Err(HwError::VerifyFailed));
/// ```
#[derive(Debug, Default)]
pub struct MockRegisters {
    registers: HashMap<usize, u32>,
    write_log: Vec<(usize, u32)>,
    stuck: HashSet<usize>,
    self_clearing: HashMap<usize, u32>,
}

impl MockRegisters {
    /// Create an empty register bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset a register value without logging a write
    pub fn set_register(&mut self, offset: usize, value: u32) {
        self.registers.insert(offset, value);
    }

    /// Current register value
    pub fn register(&self, offset: usize) -> u32 {
        self.registers.get(&offset).copied().unwrap_or(0)
    }

    /// Drop all further writes to `offset`
    pub fn stick(&mut self, offset: usize) {
        self.stuck.insert(offset);
    }

    /// Clear `mask` bits right after each write, like a busy bit
    pub fn self_clearing(&mut self, offset: usize, mask: u32) {
        self.self_clearing.insert(offset, mask);
    }

    /// All writes in order
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.write_log.clone()
    }

    /// Last value written to `offset`
    pub fn last_write(&self, offset: usize) -> Option<u32> {
        self.write_log
            .iter()
            .rev()
            .find(|&&(o, _)| o == offset)
            .map(|&(_, v)| v)
    }
}

impl RegisterBus for MockRegisters {
    fn read32(&mut self, offset: usize) -> u32 {
        self.register(offset)
    }

    fn write32(&mut self, offset: usize, value: u32) {
        self.write_log.push((offset, value));
        if self.stuck.contains(&offset) {
            return;
        }
        let clear = self.self_clearing.get(&offset).copied().unwrap_or(0);
        self.registers.insert(offset, value & !clear);
    }
}

// =============================================================================
// Mock MDIO Bus
// =============================================================================

/// Mock MDIO bus for testing PHY code without hardware
///
/// Registers read as zero until set; writes land in the same map.
///
/// # Example
///
/// ```ignore
/// let mdio = MockMdioBus::new();
/// mdio.set_register(0, phy_reg::BMSR, bmsr::AN_COMPLETE);
/// ```
#[derive(Debug, Default)]
pub struct MockMdioBus {
    /// Register values: (phy_addr, reg_addr) -> value
    registers: RefCell<HashMap<(u8, u8), u16>>,
    /// Bits cleared right after a write: (phy_addr, reg_addr) -> mask
    self_clearing: RefCell<HashMap<(u8, u8), u16>>,
}

impl MockMdioBus {
    /// Create a new mock MDIO bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a register value
    pub fn set_register(&self, phy_addr: u8, reg_addr: u8, value: u16) {
        self.registers
            .borrow_mut()
            .insert((phy_addr, reg_addr), value);
    }

    /// Get the current value of a register (for test verification)
    pub fn get_register(&self, phy_addr: u8, reg_addr: u8) -> Option<u16> {
        self.registers.borrow().get(&(phy_addr, reg_addr)).copied()
    }

    /// Clear `mask` bits right after each write to a register
    pub fn self_clearing(&self, phy_addr: u8, reg_addr: u8, mask: u16) {
        self.self_clearing
            .borrow_mut()
            .insert((phy_addr, reg_addr), mask);
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        // Return from register map (default 0 if not set)
        Ok(self.get_register(phy_addr, reg_addr).unwrap_or(0))
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        let clear = self
            .self_clearing
            .borrow()
            .get(&(phy_addr, reg_addr))
            .copied()
            .unwrap_or(0);
        self.set_register(phy_addr, reg_addr, value & !clear);
        Ok(())
    }

    fn is_busy(&mut self) -> bool {
        false
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total microseconds that were "delayed"
    pub fn total_us(&self) -> u64 {
        self.total_ns() / 1_000
    }

    /// Get total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += ns as u64;
    }
}

// =============================================================================
// Mock PHY
// =============================================================================

/// PHY with a fixed capability mask and switchable failure
///
/// While failing, every member returns [`HwError::Timeout`].
#[derive(Debug)]
pub struct MockPhy {
    caps: PhyCap,
    partner: Option<PhyCap>,
    fail: bool,
    reconfigure_calls: usize,
    last_advertised: Option<PhyCap>,
}

impl MockPhy {
    pub fn new(caps: PhyCap) -> Self {
        Self {
            caps,
            partner: None,
            fail: false,
            reconfigure_calls: 0,
            last_advertised: None,
        }
    }

    pub fn set_fail(&mut self, fail: bool) {
        self.fail = fail;
    }

    pub fn set_link_partner(&mut self, partner: Option<PhyCap>) {
        self.partner = partner;
    }

    /// Successful reconfigure calls
    pub fn reconfigure_calls(&self) -> usize {
        self.reconfigure_calls
    }

    /// Advertisement applied by the last successful reconfigure
    pub fn last_advertised(&self) -> Option<PhyCap> {
        self.last_advertised
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Hw(HwError::Timeout));
        }
        Ok(())
    }
}

impl PhyOps for MockPhy {
    fn reconfigure(&mut self, port: &PortConfig) -> Result<()> {
        self.check()?;
        self.reconfigure_calls += 1;
        self.last_advertised = Some(port.adv_cap_mask());
        Ok(())
    }

    fn capabilities(&mut self) -> Result<PhyCap> {
        self.check()?;
        Ok(self.caps)
    }

    fn link_partner(&mut self) -> Result<Option<PhyCap>> {
        self.check()?;
        Ok(self.partner)
    }
}

// =============================================================================
// Scripted Operation Set
// =============================================================================

/// Members of [`ScriptedMac`] that can be counted or failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedOp {
    PduSet = 0,
    PduGet,
    AddrSet,
    Reconfigure,
    Up,
    MulticastSet,
    RxqSet,
    RxqClear,
}

/// Operation set that only counts calls and fails on demand
///
/// Operation sets are stateless, so the script lives in scratch registers
/// on the bus: a failure mask, one call counter per member and the default
/// queue. It implements the optional default-queue members but not
/// statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedMac;

impl ScriptedMac {
    const FAIL_OFFSET: usize = 0xF000;
    const CALLS_BASE: usize = 0xF100;
    const RXQ_OFFSET: usize = 0xF200;
    const RXQ_VALID: u32 = 1 << 31;

    const fn calls_offset(op: ScriptedOp) -> usize {
        Self::CALLS_BASE + (op as usize) * 4
    }

    /// Make every later call to `op` fail with [`HwError::VerifyFailed`]
    pub fn fail_on(bus: &mut MockRegisters, op: ScriptedOp) {
        let mask = bus.register(Self::FAIL_OFFSET) | (1 << op as u32);
        bus.set_register(Self::FAIL_OFFSET, mask);
    }

    /// Number of calls to `op`, failed ones included
    pub fn calls(bus: &MockRegisters, op: ScriptedOp) -> u32 {
        bus.register(Self::calls_offset(op))
    }

    /// Queue set by the last default-queue call
    pub fn default_rxq(bus: &MockRegisters) -> Option<u16> {
        let value = bus.register(Self::RXQ_OFFSET);
        (value & Self::RXQ_VALID != 0).then_some(value as u16)
    }

    fn enter(bus: &mut dyn RegisterBus, op: ScriptedOp) -> HwResult<()> {
        let offset = Self::calls_offset(op);
        let count = bus.read32(offset);
        bus.write32(offset, count + 1);

        if bus.read32(Self::FAIL_OFFSET) & (1 << op as u32) != 0 {
            return Err(HwError::VerifyFailed);
        }
        Ok(())
    }
}

impl MacOps for ScriptedMac {
    fn pdu_set(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<()> {
        Self::enter(bus, ScriptedOp::PduSet)
    }

    fn pdu_get(&self, bus: &mut dyn RegisterBus, port: &PortConfig) -> HwResult<u32> {
        Self::enter(bus, ScriptedOp::PduGet)?;
        Ok(port.pdu())
    }

    fn addr_set(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<()> {
        Self::enter(bus, ScriptedOp::AddrSet)
    }

    fn reconfigure(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<()> {
        Self::enter(bus, ScriptedOp::Reconfigure)
    }

    fn up(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<bool> {
        Self::enter(bus, ScriptedOp::Up)?;
        Ok(true)
    }

    fn multicast_list_set(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) -> HwResult<()> {
        Self::enter(bus, ScriptedOp::MulticastSet)
    }

    fn filter_default_rxq_set(
        &self,
        bus: &mut dyn RegisterBus,
        _port: &PortConfig,
        rxq: RxQueueId,
        _using_rss: bool,
    ) -> HwResult<()> {
        Self::enter(bus, ScriptedOp::RxqSet)?;
        bus.write32(Self::RXQ_OFFSET, Self::RXQ_VALID | rxq.0 as u32);
        Ok(())
    }

    fn filter_default_rxq_clear(&self, bus: &mut dyn RegisterBus, _port: &PortConfig) {
        let _ = Self::enter(bus, ScriptedOp::RxqClear);
        bus.write32(Self::RXQ_OFFSET, 0);
    }
}
