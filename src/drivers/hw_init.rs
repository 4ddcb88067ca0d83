//! One-shot hardware peripheral initialization and raw pin primitives.
//!
//! Configures the ADC1 one-shot unit for the battery and temperature
//! channels and exposes thin GPIO/ADC helpers over raw ESP-IDF sys calls.
//! Called once from `main()` before any task is spawned.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real ADC1 / GPIO register access.
//! On host/test: per-pin atomics driven through the [`sim`] module.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::pins::{self, Pin};

// ── Error type ────────────────────────────────────────────────

/// Errors from one-shot peripheral initialization and pin primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    AdcReadFailed(i32),
    NoAdcChannel(Pin),
    GpioReadFailed(Pin),
    GpioConfigFailed(i32),
    GpioWriteFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::AdcReadFailed(rc)    => write!(f, "ADC1 read failed (rc={})", rc),
            Self::NoAdcChannel(pin)    => write!(f, "GPIO{} has no ADC1 channel", pin),
            Self::GpioReadFailed(pin)  => write!(f, "GPIO{} level unavailable", pin),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::GpioWriteFailed(rc)  => write!(f, "GPIO write failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before any task is spawned.
    unsafe {
        init_adc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: ADC1_HANDLE is written once in `init_adc()` before any task
/// is spawned and only read afterwards.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for pin in [pins::BATTERY_ADC_GPIO, pins::TEMP_ADC_GPIO] {
        let channel = pins::adc1_channel(pin).ok_or(HwInitError::NoAdcChannel(pin))?;
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!("hw_init: ADC1 configured (CH6=battery, CH7=temp)");
    Ok(())
}

/// One 12-bit conversion on the ADC1 channel behind `pin`.
///
/// The one-shot driver is not thread-safe per unit; callers serialise
/// access (see `adapters::hardware`).
#[cfg(target_os = "espidf")]
pub fn adc1_read(pin: Pin) -> Result<u16, HwInitError> {
    let channel = pins::adc1_channel(pin).ok_or(HwInitError::NoAdcChannel(pin))?;
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract; the caller holds the ADC lock.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcReadFailed(ret));
    }
    adc_counts(raw)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(pin: Pin) -> Result<u16, HwInitError> {
    pins::adc1_channel(pin).ok_or(HwInitError::NoAdcChannel(pin))?;
    if sim::failing(pin) {
        return Err(HwInitError::AdcReadFailed(-1));
    }
    adc_counts(i32::from(sim::adc(pin)))
}

/// Oneshot result to counts. A negative result is a driver error, never 0.
fn adc_counts(raw: i32) -> Result<u16, HwInitError> {
    u16::try_from(raw).map_err(|_| HwInitError::AdcReadFailed(raw))
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_configure(pin: Pin, output: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: if output { gpio_mode_t_GPIO_MODE_OUTPUT } else { gpio_mode_t_GPIO_MODE_INPUT },
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: gpio_config only touches the pins in pin_bit_mask.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    if output {
        // SAFETY: pin was just configured as an output.
        unsafe { gpio_set_level(pin, 0) };
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_configure(pin: Pin, output: bool) -> Result<(), HwInitError> {
    if sim::failing(pin) {
        return Err(HwInitError::GpioConfigFailed(-1));
    }
    if output {
        sim::set_level(pin, false);
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: Pin) -> Result<bool, HwInitError> {
    if !(0..pins::GPIO_COUNT as Pin).contains(&pin) {
        return Err(HwInitError::GpioReadFailed(pin));
    }
    // SAFETY: gpio_get_level is a read-only register access on a valid pin.
    Ok((unsafe { gpio_get_level(pin) }) != 0)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: Pin) -> Result<bool, HwInitError> {
    if sim::failing(pin) {
        return Err(HwInitError::GpioReadFailed(pin));
    }
    Ok(sim::level(pin))
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: Pin, high: bool) -> Result<(), HwInitError> {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioWriteFailed(ret)); }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: Pin, high: bool) -> Result<(), HwInitError> {
    if sim::failing(pin) {
        return Err(HwInitError::GpioWriteFailed(-1));
    }
    sim::set_level(pin, high);
    Ok(())
}

// ── Host simulation state ─────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
pub mod sim {
    //! Per-pin simulated ADC values, GPIO levels and fault injection.

    use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, Ordering};

    use crate::pins::{GPIO_COUNT, Pin};

    static ADC: [AtomicU16; GPIO_COUNT] = [const { AtomicU16::new(0) }; GPIO_COUNT];
    static LEVEL: [AtomicBool; GPIO_COUNT] = [const { AtomicBool::new(false) }; GPIO_COUNT];
    static FAILING: AtomicU64 = AtomicU64::new(0);

    fn index(pin: Pin) -> Option<usize> {
        usize::try_from(pin).ok().filter(|&i| i < GPIO_COUNT)
    }

    pub fn set_adc(pin: Pin, raw: u16) {
        if let Some(i) = index(pin) {
            ADC[i].store(raw, Ordering::Relaxed);
        }
    }

    pub fn adc(pin: Pin) -> u16 {
        index(pin).map_or(0, |i| ADC[i].load(Ordering::Relaxed))
    }

    pub fn set_level(pin: Pin, high: bool) {
        if let Some(i) = index(pin) {
            LEVEL[i].store(high, Ordering::Relaxed);
        }
    }

    pub fn level(pin: Pin) -> bool {
        index(pin).is_some_and(|i| LEVEL[i].load(Ordering::Relaxed))
    }

    /// Make every primitive on `pin` fail (or succeed again).
    pub fn set_failing(pin: Pin, failing: bool) {
        if let Some(i) = index(pin) {
            if failing {
                FAILING.fetch_or(1 << i, Ordering::Relaxed);
            } else {
                FAILING.fetch_and(!(1 << i), Ordering::Relaxed);
            }
        }
    }

    pub fn failing(pin: Pin) -> bool {
        index(pin).is_some_and(|i| FAILING.load(Ordering::Relaxed) & (1 << i) != 0)
    }
}
