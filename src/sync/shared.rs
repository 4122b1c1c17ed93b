//! ISR-safe port wrapper using critical sections.

use super::primitives::CriticalSectionCell;
use crate::driver::error::Result;
use crate::driver::port::Port;
use crate::hal::register::RegisterBus;
use crate::phy::PhyOps;

/// ISR-safe [`Port`] wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, disabling interrupts
/// for the duration of the closure. A transaction runs to completion,
/// rollback included, before anyone else sees the port.
///
/// # Example
///
/// ```ignore
/// static PORT: SharedPort<Mmio, FixedPhy> = SharedPort::new(Port::new(bus, phy));
///
/// PORT.with(|port| port.set_drain(true))?;
/// ```
pub struct SharedPort<B: RegisterBus, P: PhyOps> {
    inner: CriticalSectionCell<Port<B, P>>,
}

impl<B: RegisterBus, P: PhyOps> SharedPort<B, P> {
    /// Wrap a port (const, suitable for static initialization).
    pub const fn new(port: Port<B, P>) -> Self {
        Self {
            inner: CriticalSectionCell::new(port),
        }
    }

    /// Execute a closure with exclusive access to the port.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Port<B, P>) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Port<B, P>) -> R,
    {
        self.inner.try_with(f)
    }

    /// Check whether the link is up.
    ///
    /// # Panics
    /// If no operation set is selected.
    pub fn is_up(&self) -> Result<bool> {
        self.inner.with(|port| port.is_up())
    }

    /// Unwrap the port.
    pub fn into_inner(self) -> Port<B, P> {
        self.inner.into_inner()
    }
}
