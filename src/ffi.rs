#![cfg(target_os = "windows")]

//! Exported C ABI.
//!
//! The host binds these by name (`cdecl`, which is the only convention on
//! x64). They run over one process-wide [`Bridge`] on the Windows platform,
//! configured from `PADBRIDGE_CONFIG` the first time any of them is called.
//!
//! | Export | Operation |
//! |---|---|
//! | `JInputInit` | capture process id, load the driver (idempotent) |
//! | `JXInputGetState` | poll a slot into a [`GamepadSample`] |
//! | `JXInputGetBatteryInfo` | query a slot's battery into a [`BatterySample`] |
//! | `JXInputSetState` | forward a [`Vibration`] |
//! | `JXInputGetDriverStatus` | [`DriverStatus`] as a byte |
//! | `JInputGetKeyboardState` | copy the 256-byte key table |
//! | `JInputGetKeyboardBitmap` | the held keys packed into eight `u32` words |
//! | `JInputIsFocused` | foreground window belongs to this process |
//!
//! Nothing here panics or unwinds. Null output pointers are ignored and, for
//! driver queries, answered with [`DEVICE_NOT_CONNECTED`].
//!
//! The host should call `JInputInit` once before polling from several
//! threads; the lazy paths are race-free regardless.

#![allow(non_snake_case)]

use crate::backends::windows::Win32;
use crate::bridge::Bridge;
use crate::driver::{DriverStatus, DEVICE_NOT_CONNECTED};
use crate::keyboard::{BITMAP_WORDS, KEY_COUNT};
use crate::logging;
use crate::sample::{BatterySample, GamepadSample, Vibration};
use std::sync::LazyLock;

static BRIDGE: LazyLock<Bridge<Win32>> = LazyLock::new(|| {
    let config = logging::init_from_env();
    Bridge::new(Win32, &config)
});

/// Capture the process id and load the gamepad driver.
#[no_mangle]
pub extern "C" fn JInputInit() {
    BRIDGE.init();
}

/// Poll slot `user_index`. Returns the driver status.
///
/// # Safety
/// `state` must be null or valid for writing one [`GamepadSample`].
#[no_mangle]
pub unsafe extern "C" fn JXInputGetState(user_index: u32, state: *mut GamepadSample) -> u32 {
    match unsafe { state.as_mut() } {
        Some(state) => BRIDGE.poll_gamepad(user_index, state),
        None => DEVICE_NOT_CONNECTED,
    }
}

/// Query the gamepad battery of slot `user_index`. Returns the driver status.
///
/// # Safety
/// `battery` must be null or valid for writing one [`BatterySample`].
#[no_mangle]
pub unsafe extern "C" fn JXInputGetBatteryInfo(
    user_index: u32,
    battery: *mut BatterySample,
) -> u32 {
    match unsafe { battery.as_mut() } {
        Some(battery) => BRIDGE.battery_info(user_index, battery),
        None => DEVICE_NOT_CONNECTED,
    }
}

/// Set rumble on slot `user_index`.
///
/// # Safety
/// `vibration` must be null or valid for reading one [`Vibration`].
#[no_mangle]
pub unsafe extern "C" fn JXInputSetState(user_index: u32, vibration: *const Vibration) {
    if let Some(vibration) = unsafe { vibration.as_ref() } {
        BRIDGE.set_vibration(user_index, vibration);
    }
}

/// Current [`DriverStatus`] (0 unloaded, 1 loaded, 2 failed). Does not load.
#[no_mangle]
pub extern "C" fn JXInputGetDriverStatus() -> u8 {
    let status: DriverStatus = BRIDGE.status();
    status as u8
}

/// Copy the keyboard table. The OS success flag is not reported.
///
/// # Safety
/// `keys` must be null or valid for writing 256 bytes.
#[no_mangle]
pub unsafe extern "C" fn JInputGetKeyboardState(keys: *mut u8) {
    if let Some(keys) = unsafe { keys.cast::<[u8; KEY_COUNT]>().as_mut() } {
        BRIDGE.keyboard_state(keys);
    }
}

/// Write the held-key bitmap (key `k` is bit `k % 32` of word `k / 32`).
///
/// # Safety
/// `bits` must be null or valid for writing eight `u32` words.
#[no_mangle]
pub unsafe extern "C" fn JInputGetKeyboardBitmap(bits: *mut u32) {
    if bits.is_null() {
        return;
    }
    let words = BRIDGE.keyboard_snapshot().to_bitmap();
    // SAFETY: caller guarantees room for BITMAP_WORDS words. Copied bytewise
    // so the host buffer needn't be 4-aligned.
    unsafe {
        std::ptr::copy_nonoverlapping(
            words.as_ptr().cast::<u8>(),
            bits.cast::<u8>(),
            BITMAP_WORDS * std::mem::size_of::<u32>(),
        );
    }
}

/// Whether the foreground window belongs to this process.
#[no_mangle]
pub extern "C" fn JInputIsFocused() -> bool {
    BRIDGE.is_focused()
}
