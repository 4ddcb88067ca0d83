//! ESP-IDF runtime symbols for `critical-section` and `embassy-time`.
//!
//! `embassy-sync`'s `CriticalSectionRawMutex` needs an acquire/release pair.
//! Both are backed by one process-wide mutex; nesting on the same thread is
//! tracked with a depth counter so only the outermost acquire locks.
//!
//! `async-io-mini`'s `Timer` runs on the `embassy-time` driver interface:
//! `now` is the `esp_timer` microsecond clock (1 MHz tick) and each wake is
//! a short-lived thread sleeping until the deadline.

use core::cell::{Cell, RefCell};
use core::task::Waker;
use core::time::Duration;
use std::sync::{Mutex, MutexGuard, PoisonError};

static SECTION_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    static DEPTH: Cell<u8> = const { Cell::new(0) };
    static HELD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    let depth = DEPTH.get();
    if depth == 0 {
        // The guarded data is `()`, so a poisoned lock is still usable.
        let guard = SECTION_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        HELD.with(|held| *held.borrow_mut() = Some(guard));
    }
    let depth = depth.saturating_add(1);
    DEPTH.set(depth);
    depth
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    let depth = DEPTH.get();
    if depth == 0 {
        return;
    }
    DEPTH.set(depth - 1);
    if depth == 1 {
        HELD.with(|held| *held.borrow_mut() = None);
    }
}

// ── embassy-time driver ───────────────────────────────────────

#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_now() -> u64 {
    // SAFETY: esp_timer is started by the IDF before app_main.
    let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
    u64::try_from(us).unwrap_or(0)
}

#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_schedule_wake(at: u64, waker: *mut core::ffi::c_void) {
    if waker.is_null() {
        return;
    }
    // SAFETY: embassy-time passes a pointer to a live `Waker` for the
    // duration of this call; it is cloned before returning.
    let waker = unsafe { (*waker.cast::<Waker>()).clone() };
    std::thread::spawn(move || {
        let now = _embassy_time_now();
        if at > now {
            std::thread::sleep(Duration::from_micros(at - now));
        }
        waker.wake();
    });
}
