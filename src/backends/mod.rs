//! Platform backends for `padbridge`.
//!
//! A [`Platform`] is everything the bridge asks of the operating system:
//! - opening the gamepad driver library (via [`LibraryLoader`]),
//! - the current process id,
//! - the foreground window and the process that owns it,
//! - the keyboard state table.
//!
//! Backends:
//! - **`windows`**: the real thing, built on `windows-sys` (Windows only).
//! - **`virtual_platform`**: a scripted in-memory platform for tests (feature
//!   `virtual`; never part of the shipped DLL by default).

use crate::keyboard::KEY_COUNT;
use crate::loader::LibraryLoader;

#[cfg(any(test, feature = "virtual"))]
#[cfg_attr(docsrs, doc(cfg(feature = "virtual")))]
pub mod virtual_platform;

#[cfg(target_os = "windows")]
#[cfg_attr(docsrs, doc(cfg(target_os = "windows")))]
pub mod windows;

#[cfg(any(test, feature = "virtual"))]
pub use virtual_platform::{VirtualLibrary, VirtualPlatform};

/// Opaque top-level window handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub usize);

/// OS services the bridge forwards to.
pub trait Platform: LibraryLoader + Send + Sync {
    /// Id of the calling process. Cannot fail.
    fn current_process_id(&self) -> u32;

    /// The window the user is currently working in, if any.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Process owning `window`, or `None` if it can't be determined.
    fn window_process_id(&self, window: WindowHandle) -> Option<u32>;

    /// Fill `keys` with the calling thread's keyboard state.
    ///
    /// Returns the OS success flag; on failure `keys` may be stale.
    fn keyboard_state(&self, keys: &mut [u8; KEY_COUNT]) -> bool;
}
