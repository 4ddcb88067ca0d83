//! GPIO / peripheral pin assignments for the BattMon node (ESP32-WROOM).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

/// ESP-IDF GPIO number.
pub type Pin = i32;

/// Number of GPIOs on the ESP32 (0..=39).
pub const GPIO_COUNT: usize = 40;

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1, input-only pins)
// ---------------------------------------------------------------------------

/// Battery voltage divider. ADC1 channel 6.
pub const BATTERY_ADC_GPIO: Pin = 34;

/// Analog temperature sensor (10 mV/°C). ADC1 channel 7.
pub const TEMP_ADC_GPIO: Pin = 35;

// ---------------------------------------------------------------------------
// Alarm output
// ---------------------------------------------------------------------------

/// Alarm LED + buzzer driver, active HIGH. Also the on-board LED.
pub const ALARM_OUTPUT_GPIO: Pin = 2;

// ---------------------------------------------------------------------------
// Debug console (UART0, routed to the USB bridge)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: Pin = 1;
pub const UART_RX_GPIO: Pin = 3;

/// Map an ADC1-capable GPIO to its channel number.
pub const fn adc1_channel(pin: Pin) -> Option<u32> {
    match pin {
        36 => Some(0),
        37 => Some(1),
        38 => Some(2),
        39 => Some(3),
        32 => Some(4),
        33 => Some(5),
        34 => Some(6),
        35 => Some(7),
        _ => None,
    }
}
