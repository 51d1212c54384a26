// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

fn main() {
    // ESP-IDF link arguments and environment for the firmware binary
    #[cfg(feature = "esp32")]
    embuild::espidf::sysenv::output();
}
