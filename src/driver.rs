//! Resolved gamepad driver entry points.
//!
//! A [`DriverBinding`] is the capability record left behind by a successful
//! library load: up to three entry points, each independently optional. A
//! library that lacks one of them still loads; only the operations that need
//! the missing entry point degrade.

use crate::sample::{RawBatteryInformation, RawState, Vibration, BATTERY_DEVTYPE_GAMEPAD};
use bitflags::bitflags;
use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

/// `ERROR_DEVICE_NOT_CONNECTED`: the status returned whenever no driver
/// entry point can answer for a slot.
pub const DEVICE_NOT_CONNECTED: u32 = 1167;

/// `ERROR_SUCCESS`.
pub const SUCCESS: u32 = 0;

/// `XInputGetState` (or its ordinal-exported sibling).
pub type GetStateFn = unsafe extern "system" fn(user_index: u32, state: *mut RawState) -> u32;

/// `XInputSetState`.
pub type SetStateFn =
    unsafe extern "system" fn(user_index: u32, vibration: *mut Vibration) -> u32;

/// `XInputGetBatteryInformation`.
pub type GetBatteryInformationFn = unsafe extern "system" fn(
    user_index: u32,
    dev_type: u8,
    battery: *mut RawBatteryInformation,
) -> u32;

/// Lifecycle of the process-wide driver binding.
///
/// Only `Unloaded -> Loaded` and `Unloaded -> Failed` ever happen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DriverStatus {
    Unloaded = 0,
    Loaded = 1,
    Failed = 2,
}

bitflags! {
    /// Which entry points a binding actually carries.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const POLL    = 1 << 0;
        const VIBRATE = 1 << 1;
        const BATTERY = 1 << 2;
    }
}

/// Entry points resolved from a loaded driver library.
///
/// Functions stored here are trusted to honor the XInput contracts for the
/// pointers they receive.
#[derive(Clone, Copy, Default)]
pub struct DriverBinding {
    get_state: Option<GetStateFn>,
    set_state: Option<SetStateFn>,
    get_battery_information: Option<GetBatteryInformationFn>,
}

impl DriverBinding {
    /// A binding with no capabilities.
    pub const fn new() -> Self {
        Self {
            get_state: None,
            set_state: None,
            get_battery_information: None,
        }
    }

    /// Add the poll entry point.
    pub const fn with_get_state(mut self, f: GetStateFn) -> Self {
        self.get_state = Some(f);
        self
    }

    /// Add the vibration entry point.
    pub const fn with_set_state(mut self, f: SetStateFn) -> Self {
        self.set_state = Some(f);
        self
    }

    /// Add the battery entry point.
    pub const fn with_get_battery_information(mut self, f: GetBatteryInformationFn) -> Self {
        self.get_battery_information = Some(f);
        self
    }

    /// Build a binding from raw symbol addresses.
    ///
    /// # Safety
    /// Each non-null address must point at a function with the matching
    /// signature and the `system` calling convention.
    pub unsafe fn from_addresses(
        get_state: Option<NonNull<c_void>>,
        set_state: Option<NonNull<c_void>>,
        get_battery_information: Option<NonNull<c_void>>,
    ) -> Self {
        // SAFETY: the caller vouches for the signatures; function pointers and
        // data pointers share a representation on every Windows target.
        unsafe {
            Self {
                get_state: get_state
                    .map(|p| std::mem::transmute::<*mut c_void, GetStateFn>(p.as_ptr())),
                set_state: set_state
                    .map(|p| std::mem::transmute::<*mut c_void, SetStateFn>(p.as_ptr())),
                get_battery_information: get_battery_information.map(|p| {
                    std::mem::transmute::<*mut c_void, GetBatteryInformationFn>(p.as_ptr())
                }),
            }
        }
    }

    /// Which of the three entry points are present.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        caps.set(Capabilities::POLL, self.get_state.is_some());
        caps.set(Capabilities::VIBRATE, self.set_state.is_some());
        caps.set(Capabilities::BATTERY, self.get_battery_information.is_some());
        caps
    }

    /// Addresses of the three entry points, for diagnostics.
    pub fn addresses(&self) -> [Option<usize>; 3] {
        [
            self.get_state.map(|f| f as usize),
            self.set_state.map(|f| f as usize),
            self.get_battery_information.map(|f| f as usize),
        ]
    }

    /// Poll `user_index` into `state`. `None` when the binding can't poll.
    #[inline]
    pub fn get_state(&self, user_index: u32, state: &mut RawState) -> Option<u32> {
        let f = self.get_state?;
        // SAFETY: `state` is a valid, exclusive XINPUT_STATE for the call.
        Some(unsafe { f(user_index, state) })
    }

    /// Forward a vibration request. `None` when the binding can't vibrate.
    #[inline]
    pub fn set_state(&self, user_index: u32, vibration: &Vibration) -> Option<u32> {
        let f = self.set_state?;
        // The driver takes a mutable pointer but only reads it.
        let mut vibration = *vibration;
        // SAFETY: `vibration` is a valid XINPUT_VIBRATION local.
        Some(unsafe { f(user_index, &mut vibration) })
    }

    /// Query the gamepad battery for `user_index`. `None` when unsupported.
    #[inline]
    pub fn get_battery_information(
        &self,
        user_index: u32,
        battery: &mut RawBatteryInformation,
    ) -> Option<u32> {
        let f = self.get_battery_information?;
        // SAFETY: `battery` is a valid, exclusive XINPUT_BATTERY_INFORMATION.
        Some(unsafe { f(user_index, BATTERY_DEVTYPE_GAMEPAD, battery) })
    }
}

impl fmt::Debug for DriverBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverBinding")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
