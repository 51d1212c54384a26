// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Wi-Fi station link layer.
//!
//! Configuration, start and connect go through `EspWifi`. Events are taken
//! straight from the default system event loop so that observers can be
//! registered and removed independently of the driver.

use core::ffi::c_void;
use std::collections::HashMap;
use std::net::Ipv4Addr;

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::sys::{self as esp_idf_sys, esp};
use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi};
use tracing::debug;

use super::driver_error;
use crate::hal::{
    AuthThreshold, HalError, HalResult, HandlerId, LinkEvent, LinkEventHandler, LinkLayer,
    StationCredentials,
};

fn auth_method(threshold: AuthThreshold) -> AuthMethod {
    match threshold {
        AuthThreshold::Open => AuthMethod::None,
        AuthThreshold::Wep => AuthMethod::WEP,
        AuthThreshold::WpaPersonal => AuthMethod::WPA,
        AuthThreshold::Wpa2Personal => AuthMethod::WPA2Personal,
        AuthThreshold::Wpa3Personal => AuthMethod::WPA3Personal,
    }
}

/// Translate a raw system event; anything not relevant to bring-up is ignored
unsafe fn decode_event(
    event_base: esp_idf_sys::esp_event_base_t,
    event_id: i32,
    event_data: *mut c_void,
) -> Option<LinkEvent> {
    if event_base == esp_idf_sys::WIFI_EVENT {
        if event_id == esp_idf_sys::wifi_event_t_WIFI_EVENT_STA_START as i32 {
            return Some(LinkEvent::StationStarted);
        }
        if event_id == esp_idf_sys::wifi_event_t_WIFI_EVENT_STA_DISCONNECTED as i32 {
            let reason = if event_data.is_null() {
                0
            } else {
                (*(event_data as *const esp_idf_sys::wifi_event_sta_disconnected_t)).reason as u16
            };
            return Some(LinkEvent::StationDisconnected { reason });
        }
    } else if event_base == esp_idf_sys::IP_EVENT
        && event_id == esp_idf_sys::ip_event_t_IP_EVENT_STA_GOT_IP as i32
        && !event_data.is_null()
    {
        let got_ip = &*(event_data as *const esp_idf_sys::ip_event_got_ip_t);
        // lwIP keeps the address in network byte order
        let ip = Ipv4Addr::from(got_ip.ip_info.ip.addr.to_le_bytes());
        return Some(LinkEvent::AddressAcquired { ip });
    }
    None
}

unsafe extern "C" fn event_trampoline(
    arg: *mut c_void,
    event_base: esp_idf_sys::esp_event_base_t,
    event_id: i32,
    event_data: *mut c_void,
) {
    if let Some(event) = decode_event(event_base, event_id, event_data) {
        let handler = &*(arg as *const LinkEventHandler);
        handler(event);
    }
}

struct Registration {
    wifi_instance: esp_idf_sys::esp_event_handler_instance_t,
    ip_instance: esp_idf_sys::esp_event_handler_instance_t,
    handler: *mut LinkEventHandler,
}

impl Registration {
    unsafe fn release(self) -> HalResult<()> {
        let wifi = esp!(esp_idf_sys::esp_event_handler_instance_unregister(
            esp_idf_sys::WIFI_EVENT,
            esp_idf_sys::ESP_EVENT_ANY_ID,
            self.wifi_instance,
        ));
        let ip = esp!(esp_idf_sys::esp_event_handler_instance_unregister(
            esp_idf_sys::IP_EVENT,
            esp_idf_sys::ip_event_t_IP_EVENT_STA_GOT_IP as i32,
            self.ip_instance,
        ));
        // The event loop no longer references the handler
        drop(Box::from_raw(self.handler));
        wifi.map_err(driver_error("esp_event_handler_instance_unregister"))?;
        ip.map_err(driver_error("esp_event_handler_instance_unregister"))
    }
}

/// Station-mode Wi-Fi on the default system event loop
pub struct EspLinkLayer {
    wifi: EspWifi<'static>,
    client: ClientConfiguration,
    registrations: HashMap<HandlerId, Registration>,
    next_id: u32,
}

// Raw pointers in `registrations` are owned by this struct and only shared
// with the event loop task
unsafe impl Send for EspLinkLayer {}

impl EspLinkLayer {
    /// Create the driver. Calibration data is not persisted to NVS.
    pub fn new(
        modem: impl Peripheral<P = Modem> + 'static,
        sysloop: EspSystemEventLoop,
    ) -> HalResult<Self> {
        let wifi = EspWifi::new(modem, sysloop, None).map_err(driver_error("EspWifi::new"))?;
        Ok(Self {
            wifi,
            client: ClientConfiguration::default(),
            registrations: HashMap::new(),
            next_id: 0,
        })
    }

    fn apply(&mut self) -> HalResult<()> {
        self.wifi
            .set_configuration(&Configuration::Client(self.client.clone()))
            .map_err(driver_error("esp_wifi_set_config"))
    }
}

impl LinkLayer for EspLinkLayer {
    fn set_station_mode(&mut self) -> HalResult<()> {
        self.apply()
    }

    fn set_credentials(&mut self, credentials: &StationCredentials) -> HalResult<()> {
        self.client.ssid = credentials
            .ssid
            .as_str()
            .try_into()
            .map_err(|_| HalError::InvalidArgument("ssid".to_string()))?;
        self.client.password = credentials
            .password
            .as_str()
            .try_into()
            .map_err(|_| HalError::InvalidArgument("password".to_string()))?;
        self.client.auth_method = auth_method(credentials.auth_threshold);
        self.apply()
    }

    fn start(&mut self) -> HalResult<()> {
        self.wifi.start().map_err(driver_error("esp_wifi_start"))
    }

    fn connect(&mut self) -> HalResult<()> {
        self.wifi.connect().map_err(driver_error("esp_wifi_connect"))
    }

    fn register_handler(&mut self, handler: LinkEventHandler) -> HalResult<HandlerId> {
        let raw = Box::into_raw(Box::new(handler));
        let mut wifi_instance: esp_idf_sys::esp_event_handler_instance_t = core::ptr::null_mut();
        let mut ip_instance: esp_idf_sys::esp_event_handler_instance_t = core::ptr::null_mut();

        let wifi = esp!(unsafe {
            esp_idf_sys::esp_event_handler_instance_register(
                esp_idf_sys::WIFI_EVENT,
                esp_idf_sys::ESP_EVENT_ANY_ID,
                Some(event_trampoline),
                raw as *mut c_void,
                &mut wifi_instance,
            )
        });
        if let Err(e) = wifi {
            drop(unsafe { Box::from_raw(raw) });
            return Err(HalError::driver("esp_event_handler_instance_register", e));
        }

        let ip = esp!(unsafe {
            esp_idf_sys::esp_event_handler_instance_register(
                esp_idf_sys::IP_EVENT,
                esp_idf_sys::ip_event_t_IP_EVENT_STA_GOT_IP as i32,
                Some(event_trampoline),
                raw as *mut c_void,
                &mut ip_instance,
            )
        });
        if let Err(e) = ip {
            unsafe {
                esp_idf_sys::esp_event_handler_instance_unregister(
                    esp_idf_sys::WIFI_EVENT,
                    esp_idf_sys::ESP_EVENT_ANY_ID,
                    wifi_instance,
                );
                drop(Box::from_raw(raw));
            }
            return Err(HalError::driver("esp_event_handler_instance_register", e));
        }

        let id = HandlerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.registrations.insert(
            id,
            Registration {
                wifi_instance,
                ip_instance,
                handler: raw,
            },
        );
        debug!("Registered link event handler {:?}", id);
        Ok(id)
    }

    fn unregister_handler(&mut self, id: HandlerId) -> HalResult<()> {
        let registration = self
            .registrations
            .remove(&id)
            .ok_or(HalError::UnknownHandler(id.0))?;
        unsafe { registration.release() }
    }
}

impl Drop for EspLinkLayer {
    fn drop(&mut self) {
        for (_, registration) in self.registrations.drain() {
            let _ = unsafe { registration.release() };
        }
    }
}
