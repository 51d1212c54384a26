// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! GPIO edge interrupts through the shared per-pin ISR service.

use core::ffi::c_void;

use esp_idf_svc::sys::{self as esp_idf_sys, esp};
use tracing::debug;

use super::driver_error;
use crate::hal::{EdgeHandler, EdgeInterruptProvider, HalError, HalResult, PinNumber, Trigger};

unsafe extern "C" fn edge_trampoline(arg: *mut c_void) {
    let handler = &mut *(arg as *mut EdgeHandler);
    handler();
}

struct Attached {
    pin: PinNumber,
    handler: *mut EdgeHandler,
}

/// Edge interrupt provider for the on-chip GPIO matrix
#[derive(Default)]
pub struct EspEdgeInterrupts {
    service_installed: bool,
    attached: Vec<Attached>,
}

// The raw handler pointers are only dereferenced by the ISR service
unsafe impl Send for EspEdgeInterrupts {}

impl EspEdgeInterrupts {
    pub fn new() -> Self {
        Self::default()
    }
}

fn intr_type(trigger: Trigger) -> esp_idf_sys::gpio_int_type_t {
    match trigger {
        Trigger::RisingEdge => esp_idf_sys::gpio_int_type_t_GPIO_INTR_POSEDGE,
        Trigger::FallingEdge => esp_idf_sys::gpio_int_type_t_GPIO_INTR_NEGEDGE,
        Trigger::AnyEdge => esp_idf_sys::gpio_int_type_t_GPIO_INTR_ANYEDGE,
    }
}

impl EdgeInterruptProvider for EspEdgeInterrupts {
    fn install_interrupt_service(&mut self) -> HalResult<()> {
        if self.service_installed {
            return Ok(());
        }
        esp!(unsafe { esp_idf_sys::gpio_install_isr_service(0) })
            .map_err(driver_error("gpio_install_isr_service"))?;
        self.service_installed = true;
        Ok(())
    }

    fn set_interrupt_trigger(&mut self, pin: PinNumber, trigger: Trigger) -> HalResult<()> {
        if pin < 0 {
            return Err(HalError::InvalidArgument(format!("GPIO{}", pin)));
        }
        esp!(unsafe {
            esp_idf_sys::gpio_set_direction(pin, esp_idf_sys::gpio_mode_t_GPIO_MODE_INPUT)
        })
        .map_err(driver_error("gpio_set_direction"))?;
        esp!(unsafe { esp_idf_sys::gpio_set_intr_type(pin, intr_type(trigger)) })
            .map_err(driver_error("gpio_set_intr_type"))?;
        debug!("GPIO{} interrupt trigger set to {:?}", pin, trigger);
        Ok(())
    }

    fn attach_handler(&mut self, pin: PinNumber, handler: EdgeHandler) -> HalResult<()> {
        if !self.service_installed {
            return Err(HalError::driver(
                "gpio_isr_handler_add",
                "interrupt service not installed",
            ));
        }

        let raw = Box::into_raw(Box::new(handler));
        let result = esp!(unsafe {
            esp_idf_sys::gpio_isr_handler_add(pin, Some(edge_trampoline), raw as *mut c_void)
        });
        if let Err(e) = result {
            drop(unsafe { Box::from_raw(raw) });
            return Err(HalError::driver("gpio_isr_handler_add", e));
        }

        self.attached.push(Attached { pin, handler: raw });
        esp!(unsafe { esp_idf_sys::gpio_intr_enable(pin) })
            .map_err(driver_error("gpio_intr_enable"))
    }
}

impl Drop for EspEdgeInterrupts {
    fn drop(&mut self) {
        for attached in self.attached.drain(..) {
            unsafe {
                esp_idf_sys::gpio_isr_handler_remove(attached.pin);
                drop(Box::from_raw(attached.handler));
            }
        }
    }
}
