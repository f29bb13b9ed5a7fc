//! XInput gamepad and keyboard/focus bridge for host engines.
//!
//! Loads the XInput driver lazily through a fixed fallback chain, normalizes
//! raw gamepad samples through precomputed lookup tables, and forwards
//! keyboard and focus queries to the OS. On Windows the crate builds as a DLL
//! exporting a flat C surface (see `ffi`); everywhere, [`Bridge`] can be
//! driven directly over any [`Platform`].

pub mod backends;
pub mod bridge;
pub mod config;
pub mod driver;
pub mod error;
pub mod identity;
pub mod keyboard;
pub mod loader;
pub mod logging;
pub mod lut;
pub mod sample;

#[cfg(target_os = "windows")]
#[cfg_attr(docsrs, doc(cfg(target_os = "windows")))]
pub mod ffi;

pub use backends::{Platform, WindowHandle};
#[cfg(any(test, feature = "virtual"))]
pub use backends::{VirtualLibrary, VirtualPlatform};
pub use bridge::Bridge;
pub use config::{BridgeConfig, DriverConfig, EntryPoints, Symbol};
pub use driver::{Capabilities, DriverBinding, DriverStatus, DEVICE_NOT_CONNECTED, SUCCESS};
pub use error::{ConfigError, LoadAttempt, LoadError};
pub use keyboard::KeyboardSnapshot;
pub use loader::{DriverLibrary, DriverLoader, LibraryLoader};
pub use sample::{
    BatteryLevel, BatterySample, BatteryType, GamepadButtons, GamepadSample, Vibration,
    MAX_CONTROLLERS,
};
