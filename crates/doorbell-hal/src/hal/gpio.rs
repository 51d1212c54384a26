// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::hal::HalResult;

/// GPIO number as used by the platform's pin matrix
pub type PinNumber = i32;

/// Which signal transition raises the interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Low to high
    RisingEdge,
    /// High to low
    FallingEdge,
    /// Both transitions
    AnyEdge,
}

/// Interrupt handler attached to a pin.
///
/// Runs in interrupt context: it must not block or allocate. Any context the
/// handler needs is captured by the closure.
pub type EdgeHandler = Box<dyn FnMut() + Send + 'static>;

/// Edge-triggered digital input abstraction
pub trait EdgeInterruptProvider {
    /// Install the shared per-pin interrupt dispatch service.
    ///
    /// Must be called once before any handler is attached.
    fn install_interrupt_service(&mut self) -> HalResult<()>;

    /// Configure `pin` as an input raising interrupts on `trigger`
    fn set_interrupt_trigger(&mut self, pin: PinNumber, trigger: Trigger) -> HalResult<()>;

    /// Attach `handler` to `pin`; the handler stays attached for the lifetime
    /// of the provider
    fn attach_handler(&mut self, pin: PinNumber, handler: EdgeHandler) -> HalResult<()>;
}
