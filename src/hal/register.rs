//! Register Access
//!
//! Hardware operation sets never touch memory directly. They go through a
//! [`RegisterBus`], a window of 32-bit little-endian registers addressed by
//! byte offset. [`Mmio`] is the volatile implementation for a mapped BAR or
//! peripheral block; tests substitute a mock.

use crate::driver::error::{HwError, HwResult};

// =============================================================================
// Register Bus Trait
// =============================================================================

/// 32-bit register window
///
/// Implementations perform the little-endian/host-order conversion, so
/// callers always see register values in host order.
pub trait RegisterBus {
    /// Read the register at `offset` (bytes from the start of the window)
    fn read32(&mut self, offset: usize) -> u32;

    /// Write `value` to the register at `offset`
    fn write32(&mut self, offset: usize, value: u32);

    /// Read-modify-write a register
    #[inline]
    fn modify32<F>(&mut self, offset: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
        Self: Sized,
    {
        let value = self.read32(offset);
        self.write32(offset, f(value));
    }

    /// Write a register and read it back
    ///
    /// # Errors
    /// [`HwError::VerifyFailed`] if the register did not latch `value`.
    #[inline]
    fn write32_verified(&mut self, offset: usize, value: u32) -> HwResult<()> {
        self.write32(offset, value);
        if self.read32(offset) == value {
            Ok(())
        } else {
            Err(HwError::VerifyFailed)
        }
    }

    /// Read-modify-write a register and read it back
    ///
    /// # Errors
    /// [`HwError::VerifyFailed`] if the register did not latch the new value.
    #[inline]
    fn modify32_verified<F>(&mut self, offset: usize, f: F) -> HwResult<()>
    where
        F: FnOnce(u32) -> u32,
        Self: Sized,
    {
        let value = f(self.read32(offset));
        self.write32_verified(offset, value)
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    #[inline]
    fn read32(&mut self, offset: usize) -> u32 {
        (**self).read32(offset)
    }

    #[inline]
    fn write32(&mut self, offset: usize, value: u32) {
        (**self).write32(offset, value);
    }
}

// =============================================================================
// Memory-Mapped Window
// =============================================================================

/// Volatile register window at a fixed base address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// Create a window over the registers starting at `base`
    ///
    /// # Safety
    /// `base` must be the start of a mapped register block, 4-byte aligned,
    /// large enough for every offset the selected operation set touches, and
    /// not aliased by another owner that reprograms the same registers.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Get the base address
    #[inline(always)]
    pub const fn base(&self) -> usize {
        self.base
    }
}

impl RegisterBus for Mmio {
    #[inline(always)]
    fn read32(&mut self, offset: usize) -> u32 {
        // SAFETY: `Mmio::new` requires the window to cover every offset used
        let raw = unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) };
        u32::from_le(raw)
    }

    #[inline(always)]
    fn write32(&mut self, offset: usize, value: u32) {
        // SAFETY: `Mmio::new` requires the window to cover every offset used
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value.to_le()) }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::testing::MockRegisters;

    #[test]
    fn mmio_reads_and_writes_little_endian() {
        let mut backing = [0u32; 4];
        let mut bus = unsafe { Mmio::new(backing.as_mut_ptr() as usize) };

        bus.write32(4, 0x1234_5678);
        assert_eq!(bus.read32(4), 0x1234_5678);
        assert_eq!(backing[1], 0x1234_5678u32.to_le());
    }

    #[test]
    fn modify_preserves_other_bits() {
        let mut bus = MockRegisters::new();
        bus.set_register(0x10, 0xF0);

        bus.modify32(0x10, |v| v | 0x01);
        assert_eq!(bus.register(0x10), 0xF1);
    }

    #[test]
    fn write_verified_detects_stuck_register() {
        let mut bus = MockRegisters::new();
        bus.stick(0x20);

        assert_eq!(bus.write32_verified(0x20, 5), Err(HwError::VerifyFailed));
        assert_eq!(bus.write32_verified(0x24, 5), Ok(()));
    }

    #[test]
    fn mutable_reference_is_a_bus() {
        fn poke<B: RegisterBus>(mut bus: B) -> HwResult<()> {
            bus.write32_verified(0, 7)
        }

        let mut bus = MockRegisters::new();
        assert_eq!(poke(&mut bus), Ok(()));
        assert_eq!(bus.register(0), 7);
    }
}
