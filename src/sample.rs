//! Data layouts crossing the driver and host boundaries.
//!
//! Two families live here:
//!
//! - **Driver side** (`Raw*`, [`Vibration`]): `#[repr(C)]` mirrors of the XInput
//!   structures, passed by pointer into the vendor entry points.
//! - **Host side** ([`GamepadSample`], [`BatterySample`]): `#[repr(C, packed)]`
//!   structures with no implicit padding, written into caller-owned buffers.
//!
//! ## Host field order
//! - Gamepad: `buttons: u16`, then `trigger_l`, `trigger_r`, `stick_lx`,
//!   `stick_ly`, `stick_rx`, `stick_ry` as `f32` (26 bytes).
//! - Battery: `battery_type: u8`, `battery_level: u8` (2 bytes).
//!
//! Packed fields can't be borrowed; copy them out (`{ sample.stick_lx }`).

use crate::lut;
use bitflags::bitflags;

/// Number of controller slots XInput exposes (`XUSER_MAX_COUNT`).
pub const MAX_CONTROLLERS: u32 = 4;

/// Device type argument for battery queries (`BATTERY_DEVTYPE_GAMEPAD`).
pub const BATTERY_DEVTYPE_GAMEPAD: u8 = 0;

/// `XINPUT_GAMEPAD`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawGamepad {
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub thumb_lx: i16,
    pub thumb_ly: i16,
    pub thumb_rx: i16,
    pub thumb_ry: i16,
}

/// `XINPUT_STATE`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawState {
    /// Changes whenever the controller state changes.
    pub packet_number: u32,
    pub gamepad: RawGamepad,
}

/// `XINPUT_VIBRATION`: motor speeds, `0..=65535`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vibration {
    /// Low-frequency rumble motor.
    pub left_motor_speed: u16,
    /// High-frequency rumble motor.
    pub right_motor_speed: u16,
}

/// `XINPUT_BATTERY_INFORMATION`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawBatteryInformation {
    pub battery_type: u8,
    pub battery_level: u8,
}

const _: [(); 12] = [(); std::mem::size_of::<RawGamepad>()];
const _: [(); 16] = [(); std::mem::size_of::<RawState>()];
const _: [(); 4] = [(); std::mem::size_of::<Vibration>()];
const _: [(); 2] = [(); std::mem::size_of::<RawBatteryInformation>()];

#[cfg(windows)]
mod layout_check {
    use super::*;
    use windows_sys::Win32::UI::Input::XboxController::{
        XINPUT_BATTERY_INFORMATION, XINPUT_GAMEPAD, XINPUT_STATE, XINPUT_VIBRATION,
        XUSER_MAX_COUNT,
    };

    const _: [(); std::mem::size_of::<XINPUT_GAMEPAD>()] = [(); std::mem::size_of::<RawGamepad>()];
    const _: [(); std::mem::size_of::<XINPUT_STATE>()] = [(); std::mem::size_of::<RawState>()];
    const _: [(); std::mem::size_of::<XINPUT_VIBRATION>()] = [(); std::mem::size_of::<Vibration>()];
    const _: [(); std::mem::size_of::<XINPUT_BATTERY_INFORMATION>()] =
        [(); std::mem::size_of::<RawBatteryInformation>()];
    const _: [(); XUSER_MAX_COUNT as usize] = [(); MAX_CONTROLLERS as usize];
}

bitflags! {
    /// Digital buttons in the 16-bit XInput mask.
    ///
    /// `GUIDE` is only reported by the ordinal-exported state entry point; the
    /// named `XInputGetState` masks it out.
    #[repr(transparent)]
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GamepadButtons: u16 {
        const DPAD_UP        = 0x0001;
        const DPAD_DOWN      = 0x0002;
        const DPAD_LEFT      = 0x0004;
        const DPAD_RIGHT     = 0x0008;
        const START          = 0x0010;
        const BACK           = 0x0020;
        const LEFT_THUMB     = 0x0040;
        const RIGHT_THUMB    = 0x0080;
        const LEFT_SHOULDER  = 0x0100;
        const RIGHT_SHOULDER = 0x0200;
        const GUIDE          = 0x0400;
        const A              = 0x1000;
        const B              = 0x2000;
        const X              = 0x4000;
        const Y              = 0x8000;
    }
}

/// Normalized gamepad state handed to the host.
///
/// Triggers are `[0, 1]`, sticks `[-1, 1]`. A zeroed sample is what the host
/// sees for a slot that never answered.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GamepadSample {
    pub buttons: u16,
    pub trigger_l: f32,
    pub trigger_r: f32,
    pub stick_lx: f32,
    pub stick_ly: f32,
    pub stick_rx: f32,
    pub stick_ry: f32,
}

const _: [(); 26] = [(); std::mem::size_of::<GamepadSample>()];
const _: [(); 1] = [(); std::mem::align_of::<GamepadSample>()];

impl GamepadSample {
    /// Normalize a raw driver sample. Buttons are copied verbatim.
    #[inline]
    pub fn from_raw(raw: &RawGamepad) -> Self {
        Self {
            buttons: raw.buttons,
            trigger_l: lut::trigger(raw.left_trigger),
            trigger_r: lut::trigger(raw.right_trigger),
            stick_lx: lut::stick(raw.thumb_lx),
            stick_ly: lut::stick(raw.thumb_ly),
            stick_rx: lut::stick(raw.thumb_rx),
            stick_ry: lut::stick(raw.thumb_ry),
        }
    }

    /// Typed view of the button mask. Unknown bits are kept.
    #[inline]
    pub fn buttons(&self) -> GamepadButtons {
        GamepadButtons::from_bits_retain(self.buttons)
    }

    /// `[lx, ly, rx, ry]`.
    #[inline]
    pub fn sticks(&self) -> [f32; 4] {
        [self.stick_lx, self.stick_ly, self.stick_rx, self.stick_ry]
    }

    /// `[left, right]`.
    #[inline]
    pub fn triggers(&self) -> [f32; 2] {
        [self.trigger_l, self.trigger_r]
    }
}

/// What powers a controller, as reported by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BatteryType {
    Disconnected,
    Wired,
    Alkaline,
    NiMh,
    Unknown,
    /// A code this crate doesn't know about.
    Other(u8),
}

impl From<u8> for BatteryType {
    fn from(raw: u8) -> Self {
        match raw {
            0x00 => Self::Disconnected,
            0x01 => Self::Wired,
            0x02 => Self::Alkaline,
            0x03 => Self::NiMh,
            0xFF => Self::Unknown,
            other => Self::Other(other),
        }
    }
}

/// Coarse charge level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BatteryLevel {
    Empty,
    Low,
    Medium,
    Full,
    Other(u8),
}

impl From<u8> for BatteryLevel {
    fn from(raw: u8) -> Self {
        match raw {
            0x00 => Self::Empty,
            0x01 => Self::Low,
            0x02 => Self::Medium,
            0x03 => Self::Full,
            other => Self::Other(other),
        }
    }
}

/// Battery state handed to the host. Both bytes are the driver's codes.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatterySample {
    pub battery_type: u8,
    pub battery_level: u8,
}

const _: [(); 2] = [(); std::mem::size_of::<BatterySample>()];

impl BatterySample {
    /// Copy the driver's battery codes verbatim.
    #[inline]
    pub fn from_raw(raw: &RawBatteryInformation) -> Self {
        Self {
            battery_type: raw.battery_type,
            battery_level: raw.battery_level,
        }
    }

    /// Typed view of `battery_type`.
    #[inline]
    pub fn battery_type(&self) -> BatteryType {
        BatteryType::from(self.battery_type)
    }

    /// Typed view of `battery_level`.
    #[inline]
    pub fn level(&self) -> BatteryLevel {
        BatteryLevel::from(self.battery_level)
    }

    /// `false` when the driver reports no device behind the slot.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.battery_type() != BatteryType::Disconnected
    }
}
