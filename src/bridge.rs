//! The bridge: every host-facing operation, over an explicit [`Platform`].
//!
//! [`Bridge`] owns the two pieces of lazily-initialized state (the
//! [`DriverLoader`] and the [`ProcessIdentity`]) instead of hiding them in
//! globals, so a test can hand it a scripted platform (`VirtualPlatform`, feature
//! `virtual`) or a pre-bound driver. The exported C surface wraps one process-wide
//! instance over the Windows platform.
//!
//! # Status codes
//! Driver calls return the driver's status verbatim. When the driver binding
//! lacks the needed entry point (library never loaded, or loaded without that
//! export) the result is [`DEVICE_NOT_CONNECTED`] and the output is untouched.

use crate::backends::Platform;
use crate::config::BridgeConfig;
use crate::driver::{DriverBinding, DriverStatus, DEVICE_NOT_CONNECTED};
use crate::error::LoadError;
use crate::identity::ProcessIdentity;
use crate::keyboard::{KeyboardSnapshot, KEY_COUNT};
use crate::loader::DriverLoader;
use crate::lut;
use crate::sample::{BatterySample, GamepadSample, RawBatteryInformation, RawState, Vibration};
use tracing::{debug, trace};

/// Lazily initialized driver and identity state over a [`Platform`].
#[derive(Debug)]
pub struct Bridge<P> {
    platform: P,
    loader: DriverLoader,
    identity: ProcessIdentity,
}

impl<P: Platform> Bridge<P> {
    /// A bridge that will load its driver per `config` on first use.
    pub fn new(platform: P, config: &BridgeConfig) -> Self {
        Self::with_loader(platform, DriverLoader::new(config.driver.clone()))
    }

    /// A bridge over an existing loader, e.g. [`DriverLoader::with_binding`].
    pub fn with_loader(platform: P, loader: DriverLoader) -> Self {
        Self {
            platform,
            loader,
            identity: ProcessIdentity::new(),
        }
    }

    /// The platform this bridge forwards to.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Capture the process id and load the driver. Safe to call repeatedly;
    /// neither step runs twice.
    pub fn init(&self) {
        let pid = self.identity.init(|| self.platform.current_process_id());
        lut::warm();
        let status = self.loader.init(&self.platform);
        debug!(pid, ?status, "bridge initialized");
    }

    /// Driver lifecycle state. Never triggers a load.
    pub fn status(&self) -> DriverStatus {
        self.loader.status()
    }

    /// Why the driver failed to load, if it did.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.loader.error()
    }

    /// The resolved binding, loading on first call. Only polling goes
    /// through here.
    pub fn driver(&self) -> Option<&DriverBinding> {
        self.loader.init(&self.platform);
        self.loader.binding()
    }

    /// Poll slot `index` into `out`, normalizing axes.
    ///
    /// Returns the driver status verbatim, or [`DEVICE_NOT_CONNECTED`] without
    /// touching `out` when polling is unavailable.
    pub fn poll_gamepad(&self, index: u32, out: &mut GamepadSample) -> u32 {
        let Some(driver) = self.driver() else {
            return DEVICE_NOT_CONNECTED;
        };
        let mut raw = RawState::default();
        match driver.get_state(index, &mut raw) {
            Some(status) => {
                *out = GamepadSample::from_raw(&raw.gamepad);
                status
            }
            None => DEVICE_NOT_CONNECTED,
        }
    }

    /// Query the gamepad battery of slot `index` into `out`.
    ///
    /// Does not load the driver; before [`init`](Self::init) or the first
    /// poll this answers [`DEVICE_NOT_CONNECTED`].
    pub fn battery_info(&self, index: u32, out: &mut BatterySample) -> u32 {
        let Some(driver) = self.loader.binding() else {
            return DEVICE_NOT_CONNECTED;
        };
        let mut raw = RawBatteryInformation::default();
        match driver.get_battery_information(index, &mut raw) {
            Some(status) => {
                *out = BatterySample::from_raw(&raw);
                status
            }
            None => DEVICE_NOT_CONNECTED,
        }
    }

    /// Set rumble on slot `index`. Silently ignored when unsupported or not
    /// yet loaded; the driver's status is discarded.
    pub fn set_vibration(&self, index: u32, vibration: &Vibration) {
        if let Some(driver) = self.loader.binding() {
            if driver.set_state(index, vibration).is_none() {
                trace!(index, "vibration unsupported by driver");
            }
        }
    }

    /// Copy the OS keyboard table into `keys`. Returns the OS success flag;
    /// on failure `keys` may be stale or zeroed.
    pub fn keyboard_state(&self, keys: &mut [u8; KEY_COUNT]) -> bool {
        self.platform.keyboard_state(keys)
    }

    /// Take a fresh [`KeyboardSnapshot`].
    pub fn keyboard_snapshot(&self) -> KeyboardSnapshot {
        let mut snapshot = KeyboardSnapshot::new();
        if !self.keyboard_state(snapshot.as_bytes_mut()) {
            trace!("keyboard state query failed");
        }
        snapshot
    }

    /// Whether the foreground window belongs to this process.
    ///
    /// `false` with no foreground window, when its owner can't be determined,
    /// or before [`init`](Self::init) captured this process's id.
    pub fn is_focused(&self) -> bool {
        let Some(window) = self.platform.foreground_window() else {
            return false;
        };
        let Some(owner) = self.platform.window_process_id(window) else {
            return false;
        };
        self.identity.get() == Some(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{VirtualLibrary, VirtualPlatform, WindowHandle};
    use crate::driver::SUCCESS;

    const PID: u32 = 4000;

    fn bridge() -> Bridge<VirtualPlatform> {
        Bridge::new(VirtualPlatform::new(PID), &BridgeConfig::default())
    }

    #[test]
    fn init_captures_pid_and_fails_without_driver() {
        let b = bridge();
        assert_eq!(b.status(), DriverStatus::Unloaded);
        b.init();
        assert_eq!(b.identity.get(), Some(PID));
        assert_eq!(b.status(), DriverStatus::Failed);
        assert_eq!(
            b.load_error().map(LoadError::codes),
            Some(vec![126, 126, 126])
        );
    }

    #[test]
    fn unavailable_driver_leaves_outputs_untouched() {
        let b = bridge();

        let mut sample = GamepadSample {
            buttons: 0xBEEF,
            ..Default::default()
        };
        assert_eq!(b.poll_gamepad(0, &mut sample), DEVICE_NOT_CONNECTED);
        assert_eq!({ sample.buttons }, 0xBEEF);

        let mut battery = BatterySample::default();
        assert_eq!(b.battery_info(3, &mut battery), DEVICE_NOT_CONNECTED);
        assert_eq!(battery, BatterySample::default());

        b.set_vibration(0, &Vibration::default());
    }

    unsafe extern "system" fn battery_full(_: u32, _: u8, out: *mut RawBatteryInformation) -> u32 {
        unsafe {
            (*out).battery_type = 0x01;
            (*out).battery_level = 0x03;
        }
        SUCCESS
    }

    #[test]
    fn battery_and_vibration_do_not_load() {
        let platform = VirtualPlatform::new(PID).with_library(
            "xinput1_3.dll",
            VirtualLibrary::new()
                .export_get_battery_information("XInputGetBatteryInformation", battery_full),
        );
        let b = Bridge::new(platform, &BridgeConfig::default());

        let mut battery = BatterySample::default();
        assert_eq!(b.battery_info(0, &mut battery), DEVICE_NOT_CONNECTED);
        assert_eq!(battery, BatterySample::default());
        b.set_vibration(0, &Vibration::default());
        assert_eq!(b.status(), DriverStatus::Unloaded);
        assert!(b.platform().load_attempts().is_empty());

        b.init();
        assert_eq!(b.battery_info(0, &mut battery), SUCCESS);
        assert!(battery.is_connected());
        assert_eq!(b.platform().load_attempts(), ["xinput1_3.dll"]);
    }

    #[test]
    fn poll_loads_lazily() {
        let b = bridge();
        let mut sample = GamepadSample::default();
        b.poll_gamepad(0, &mut sample);
        assert_eq!(b.status(), DriverStatus::Failed);
        assert_eq!(b.platform().load_attempts().len(), 3);

        // Never retried.
        b.poll_gamepad(1, &mut sample);
        b.init();
        assert_eq!(b.platform().load_attempts().len(), 3);
    }

    #[test]
    fn focus_requires_captured_identity() {
        let b = bridge();
        b.platform().set_foreground(WindowHandle(1), Some(PID));
        assert!(!b.is_focused());

        b.init();
        assert!(b.is_focused());
    }

    #[test]
    fn focus_edge_cases() {
        let b = bridge();
        b.init();

        assert!(!b.is_focused(), "no foreground window");

        b.platform().set_foreground(WindowHandle(1), None);
        assert!(!b.is_focused(), "owner unknown");

        b.platform().set_foreground(WindowHandle(1), Some(PID + 1));
        assert!(!b.is_focused(), "other process");

        b.platform().set_foreground(WindowHandle(2), Some(PID));
        assert!(b.is_focused());
    }

    #[test]
    fn keyboard_snapshot_forwards_platform_state() {
        let b = bridge();
        b.platform().press(0x20);
        let snap = b.keyboard_snapshot();
        assert!(snap.is_held(0x20));
        assert!(!snap.is_held(0x21));

        b.platform().fail_keyboard(true);
        let mut keys = [0u8; KEY_COUNT];
        assert!(!b.keyboard_state(&mut keys));
        assert!(!b.keyboard_snapshot().is_held(0x20));
    }

    unsafe extern "system" fn poll_centered(_: u32, state: *mut RawState) -> u32 {
        unsafe {
            (*state).gamepad.left_trigger = 255;
            (*state).gamepad.thumb_lx = i16::MIN;
        }
        SUCCESS
    }

    #[test]
    fn loaded_library_drives_poll() {
        let platform = VirtualPlatform::new(PID).with_library(
            "xinput1_4.dll",
            VirtualLibrary::new().export_get_state(100u16, poll_centered),
        );
        let b = Bridge::new(platform, &BridgeConfig::default());

        let mut sample = GamepadSample::default();
        assert_eq!(b.poll_gamepad(0, &mut sample), SUCCESS);
        assert_eq!({ sample.trigger_l }, 1.0);
        assert_eq!({ sample.stick_lx }, -1.0);
        assert_eq!(b.status(), DriverStatus::Loaded);
        assert_eq!(
            b.platform().load_attempts(),
            ["xinput1_3.dll", "xinput1_4.dll"]
        );
    }
}
