//! Scripted in-memory platform.
//!
//! [`VirtualPlatform`] stands in for the OS: tests feed it libraries, a
//! foreground window and key states, then drive a [`Bridge`](crate::Bridge)
//! against it exactly as the exported surface drives the Windows backend.

use crate::backends::{Platform, WindowHandle};
use crate::config::Symbol;
use crate::driver::{GetBatteryInformationFn, GetStateFn, SetStateFn};
use crate::keyboard::KEY_COUNT;
use crate::loader::{DriverLibrary, LibraryLoader};
use std::collections::HashMap;
use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Mutex;

/// `ERROR_MOD_NOT_FOUND`: what the virtual loader reports for unknown names.
pub const MOD_NOT_FOUND: u32 = 126;

/// A fake driver library: a symbol table of function addresses.
#[derive(Clone, Debug, Default)]
pub struct VirtualLibrary {
    exports: HashMap<Symbol, usize>,
}

impl VirtualLibrary {
    /// A library with no exports.
    pub fn new() -> Self {
        Self::default()
    }

    /// Export a raw address under `symbol`.
    pub fn export(mut self, symbol: impl Into<Symbol>, address: usize) -> Self {
        self.exports.insert(symbol.into(), address);
        self
    }

    /// Export a poll function under `symbol`.
    pub fn export_get_state(self, symbol: impl Into<Symbol>, f: GetStateFn) -> Self {
        self.export(symbol, f as usize)
    }

    /// Export a vibration function under `symbol`.
    pub fn export_set_state(self, symbol: impl Into<Symbol>, f: SetStateFn) -> Self {
        self.export(symbol, f as usize)
    }

    /// Export a battery function under `symbol`.
    pub fn export_get_battery_information(
        self,
        symbol: impl Into<Symbol>,
        f: GetBatteryInformationFn,
    ) -> Self {
        self.export(symbol, f as usize)
    }
}

impl DriverLibrary for VirtualLibrary {
    fn resolve(&self, symbol: &Symbol) -> Option<NonNull<c_void>> {
        self.exports
            .get(symbol)
            .and_then(|&addr| NonNull::new(addr as *mut c_void))
    }
}

#[derive(Clone, Copy, Debug)]
struct Foreground {
    window: WindowHandle,
    owner: Option<u32>,
}

/// In-memory [`Platform`].
#[derive(Debug)]
pub struct VirtualPlatform {
    pid: u32,
    foreground: Mutex<Option<Foreground>>,
    keys: Mutex<[u8; KEY_COUNT]>,
    keyboard_ok: Mutex<bool>,
    libraries: Mutex<HashMap<String, VirtualLibrary>>,
    load_attempts: Mutex<Vec<String>>,
}

impl VirtualPlatform {
    /// A platform whose process id is `pid`, with no libraries, no
    /// foreground window and no keys held.
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            foreground: Mutex::new(None),
            keys: Mutex::new([0; KEY_COUNT]),
            keyboard_ok: Mutex::new(true),
            libraries: Mutex::new(HashMap::new()),
            load_attempts: Mutex::new(Vec::new()),
        }
    }

    /// Make `name` loadable.
    pub fn with_library(self, name: &str, library: VirtualLibrary) -> Self {
        lock(&self.libraries).insert(name.to_string(), library);
        self
    }

    /// Put `window` in the foreground; `owner` is what the owning-process
    /// query answers (`None` = the query fails).
    pub fn set_foreground(&self, window: WindowHandle, owner: Option<u32>) {
        *lock(&self.foreground) = Some(Foreground { window, owner });
    }

    /// No window in the foreground.
    pub fn clear_foreground(&self) {
        *lock(&self.foreground) = None;
    }

    /// Mark `vk` held (sets bit `0x80`).
    pub fn press(&self, vk: u8) {
        lock(&self.keys)[vk as usize] |= 0x80;
    }

    /// Clear the held bit of `vk`.
    pub fn release(&self, vk: u8) {
        lock(&self.keys)[vk as usize] &= !0x80;
    }

    /// Make subsequent keyboard queries report failure without writing.
    pub fn fail_keyboard(&self, fail: bool) {
        *lock(&self.keyboard_ok) = !fail;
    }

    /// Library names the loader asked for, in order.
    pub fn load_attempts(&self) -> Vec<String> {
        lock(&self.load_attempts).clone()
    }
}

impl LibraryLoader for VirtualPlatform {
    fn load_library(&self, name: &str) -> Result<Box<dyn DriverLibrary>, u32> {
        lock(&self.load_attempts).push(name.to_string());
        lock(&self.libraries)
            .get(name)
            .cloned()
            .map(|lib| Box::new(lib) as Box<dyn DriverLibrary>)
            .ok_or(MOD_NOT_FOUND)
    }
}

impl Platform for VirtualPlatform {
    fn current_process_id(&self) -> u32 {
        self.pid
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        lock(&self.foreground).map(|fg| fg.window)
    }

    fn window_process_id(&self, window: WindowHandle) -> Option<u32> {
        lock(&self.foreground)
            .filter(|fg| fg.window == window)
            .and_then(|fg| fg.owner)
    }

    fn keyboard_state(&self, keys: &mut [u8; KEY_COUNT]) -> bool {
        if !*lock(&self.keyboard_ok) {
            return false;
        }
        *keys = *lock(&self.keys);
        true
    }
}

// A poisoned lock only means a test panicked mid-update; the data is still usable.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_library_reports_mod_not_found() {
        let p = VirtualPlatform::new(1);
        assert_eq!(p.load_library("xinput1_3.dll").err(), Some(MOD_NOT_FOUND));
        assert_eq!(p.load_attempts(), ["xinput1_3.dll"]);
    }

    #[test]
    fn library_resolves_exports() {
        let lib = VirtualLibrary::new().export(100u16, 0x1000).export("Named", 0x2000);
        assert_eq!(
            lib.resolve(&Symbol::Ordinal(100)).map(|p| p.as_ptr() as usize),
            Some(0x1000)
        );
        assert_eq!(
            lib.resolve(&Symbol::from("Named")).map(|p| p.as_ptr() as usize),
            Some(0x2000)
        );
        assert!(lib.resolve(&Symbol::Ordinal(2)).is_none());
    }

    #[test]
    fn foreground_owner_only_for_current_window() {
        let p = VirtualPlatform::new(1);
        assert_eq!(p.foreground_window(), None);

        p.set_foreground(WindowHandle(7), Some(99));
        assert_eq!(p.foreground_window(), Some(WindowHandle(7)));
        assert_eq!(p.window_process_id(WindowHandle(7)), Some(99));
        assert_eq!(p.window_process_id(WindowHandle(8)), None);

        p.clear_foreground();
        assert_eq!(p.foreground_window(), None);
    }

    #[test]
    fn keyboard_press_release() {
        let p = VirtualPlatform::new(1);
        p.press(0x41);
        let mut keys = [0u8; KEY_COUNT];
        assert!(p.keyboard_state(&mut keys));
        assert_eq!(keys[0x41], 0x80);

        p.release(0x41);
        p.fail_keyboard(true);
        assert!(!p.keyboard_state(&mut keys));
        // Failed query leaves the buffer untouched.
        assert_eq!(keys[0x41], 0x80);
    }
}
