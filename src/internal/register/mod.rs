//! Register bank layouts for the supported MAC families
//!
//! Every accessor goes through a [`RegisterBus`](crate::hal::register::RegisterBus)
//! window, so the same definitions serve a mapped BAR and a test mock.
//! Offsets are relative to the start of the window handed to the port.

pub mod dwmac;
pub mod ibuf;

// =============================================================================
// Register Access Macros
// =============================================================================

/// Generate read and verified-write accessors for a register.
///
/// # Example
/// ```ignore
/// impl DwmacRegs {
///     reg_rw!(config, set_config, GMACCONFIG_OFFSET, "GMAC Configuration register");
/// }
/// ```
macro_rules! reg_rw {
    ($read_fn:ident, $write_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn<B: $crate::hal::register::RegisterBus + ?Sized>(bus: &mut B) -> u32 {
            bus.read32($offset)
        }

        #[doc = concat!("Write ", $doc, " and read it back")]
        #[inline(always)]
        pub fn $write_fn<B: $crate::hal::register::RegisterBus + ?Sized>(
            bus: &mut B,
            value: u32,
        ) -> $crate::driver::error::HwResult<()> {
            bus.write32_verified($offset, value)
        }
    };
}

/// Generate a read-only accessor for a register.
macro_rules! reg_ro {
    ($read_fn:ident, $offset:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $read_fn<B: $crate::hal::register::RegisterBus + ?Sized>(bus: &mut B) -> u32 {
            bus.read32($offset)
        }
    };
}

/// Generate a verified set-or-clear method for one bit of a register.
///
/// # Example
/// ```ignore
/// impl DwmacRegs {
///     reg_bit_set!(set_jumbo, GMACCONFIG_OFFSET, GMACCONFIG_JE, "jumbo frame enable");
/// }
/// ```
macro_rules! reg_bit_set {
    ($fn:ident, $offset:expr, $bit:expr, $what:expr) => {
        #[doc = concat!("Set or clear ", $what)]
        #[inline(always)]
        pub fn $fn<B: $crate::hal::register::RegisterBus + ?Sized>(
            bus: &mut B,
            enable: bool,
        ) -> $crate::driver::error::HwResult<()> {
            let value = bus.read32($offset);
            let value = if enable { value | $bit } else { value & !$bit };
            bus.write32_verified($offset, value)
        }
    };
}

/// Generate a read of a 64-bit counter split across low/high registers.
macro_rules! reg_counter64 {
    ($fn:ident, $lo:expr, $hi:expr, $doc:expr) => {
        #[doc = concat!("Read ", $doc)]
        #[inline(always)]
        pub fn $fn<B: $crate::hal::register::RegisterBus + ?Sized>(bus: &mut B) -> u64 {
            let lo = bus.read32($lo) as u64;
            let hi = bus.read32($hi) as u64;
            lo | (hi << 32)
        }
    };
}

pub(crate) use reg_bit_set;
pub(crate) use reg_counter64;
pub(crate) use reg_ro;
pub(crate) use reg_rw;
