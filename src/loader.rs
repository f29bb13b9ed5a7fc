//! Lazy driver loading with a fixed fallback chain.
//!
//! [`DriverLoader`] tries each configured library name in order, stops at the
//! first one the OS loads, and resolves the three entry points from it. The
//! outcome is recorded exactly once:
//!
//! - `Unloaded -> Loaded` when some candidate loads (entry points may still be
//!   individually missing),
//! - `Unloaded -> Failed` when every candidate fails; each OS error code is
//!   kept for the diagnostic.
//!
//! Later `init` calls are no-ops. There is no unload: a loaded library stays
//! mapped for the life of the loader (for the exported singleton, the process).
//!
//! Concurrent first calls are serialized by a [`OnceLock`]; only one thread
//! runs the load.

use crate::config::{DriverConfig, Symbol};
use crate::driver::{Capabilities, DriverBinding, DriverStatus};
use crate::error::{LoadAttempt, LoadError};
use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;
use std::sync::OnceLock;
use tracing::{debug, error, trace, warn};

/// A loaded dynamic library that can resolve exported symbols.
pub trait DriverLibrary: Send + Sync {
    /// Address of `symbol`, or `None` if the library doesn't export it.
    fn resolve(&self, symbol: &Symbol) -> Option<NonNull<c_void>>;
}

/// Something that can open dynamic libraries by name (the OS loader, or a fake).
pub trait LibraryLoader {
    /// Open `name`, or return the OS error code for the failed attempt.
    fn load_library(&self, name: &str) -> Result<Box<dyn DriverLibrary>, u32>;
}

/// A successfully loaded driver.
pub struct LoadedDriver {
    /// Candidate name that loaded; `None` for an injected binding.
    pub library: Option<String>,
    pub binding: DriverBinding,
    _handle: Option<Box<dyn DriverLibrary>>,
}

impl fmt::Debug for LoadedDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedDriver")
            .field("library", &self.library)
            .field("binding", &self.binding)
            .finish()
    }
}

#[derive(Debug)]
enum Resolution {
    Loaded(LoadedDriver),
    Failed(LoadError),
}

/// Process-lifetime driver binding, resolved on first use.
pub struct DriverLoader {
    config: DriverConfig,
    state: OnceLock<Resolution>,
}

impl DriverLoader {
    /// An `Unloaded` loader that will try `config.candidates` in order.
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            state: OnceLock::new(),
        }
    }

    /// A loader that is already `Loaded` with `binding`; `init` never touches
    /// the OS. Used to substitute a driver.
    pub fn with_binding(binding: DriverBinding) -> Self {
        let loader = Self::new(DriverConfig::default());
        let _ = loader.state.set(Resolution::Loaded(LoadedDriver {
            library: None,
            binding,
            _handle: None,
        }));
        loader
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run the fallback chain once. Subsequent calls return immediately.
    pub fn init(&self, libraries: &dyn LibraryLoader) -> DriverStatus {
        self.state.get_or_init(|| self.resolve(libraries));
        self.status()
    }

    /// Current state; never triggers a load.
    pub fn status(&self) -> DriverStatus {
        match self.state.get() {
            None => DriverStatus::Unloaded,
            Some(Resolution::Loaded(_)) => DriverStatus::Loaded,
            Some(Resolution::Failed(_)) => DriverStatus::Failed,
        }
    }

    /// The binding, if a library loaded.
    #[inline]
    pub fn binding(&self) -> Option<&DriverBinding> {
        self.loaded().map(|d| &d.binding)
    }

    /// The loaded library and its binding.
    pub fn loaded(&self) -> Option<&LoadedDriver> {
        match self.state.get() {
            Some(Resolution::Loaded(d)) => Some(d),
            _ => None,
        }
    }

    /// The recorded failure, if every candidate failed.
    pub fn error(&self) -> Option<&LoadError> {
        match self.state.get() {
            Some(Resolution::Failed(e)) => Some(e),
            _ => None,
        }
    }

    fn resolve(&self, libraries: &dyn LibraryLoader) -> Resolution {
        match self.load_first(libraries) {
            Ok((name, library)) => {
                let binding = self.bind(&name, library.as_ref());
                Resolution::Loaded(LoadedDriver {
                    library: Some(name),
                    binding,
                    _handle: Some(library),
                })
            }
            Err(e) => {
                error!(error = %e, "gamepad driver unavailable");
                Resolution::Failed(e)
            }
        }
    }

    fn load_first(
        &self,
        libraries: &dyn LibraryLoader,
    ) -> Result<(String, Box<dyn DriverLibrary>), LoadError> {
        if self.config.candidates.is_empty() {
            return Err(LoadError::NoCandidates);
        }

        let mut attempts = Vec::with_capacity(self.config.candidates.len());
        for name in &self.config.candidates {
            trace!(library = %name, "trying gamepad driver");
            match libraries.load_library(name) {
                Ok(library) => {
                    debug!(library = %name, failed_before = attempts.len(), "gamepad driver loaded");
                    return Ok((name.clone(), library));
                }
                Err(code) => {
                    trace!(library = %name, "load failed: 0x{code:08x}");
                    attempts.push(LoadAttempt {
                        library: name.clone(),
                        code,
                    });
                }
            }
        }

        Err(LoadError::Exhausted { attempts })
    }

    fn bind(&self, name: &str, library: &dyn DriverLibrary) -> DriverBinding {
        let points = &self.config.entry_points;
        let lookup = |symbol: &Symbol| {
            let addr = library.resolve(symbol);
            if addr.is_none() {
                warn!(library = %name, symbol = %symbol, "driver entry point missing");
            }
            addr
        };

        let get_state = lookup(&points.get_state);
        let set_state = lookup(&points.set_state);
        let get_battery_information = lookup(&points.get_battery_information);

        // SAFETY: the entry-point table pairs each symbol with the XInput
        // function of the matching signature.
        let binding =
            unsafe { DriverBinding::from_addresses(get_state, set_state, get_battery_information) };

        if binding.capabilities() != Capabilities::all() {
            debug!(library = %name, capabilities = ?binding.capabilities(), "partial driver binding");
        }
        binding
    }
}

impl fmt::Debug for DriverLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverLoader")
            .field("status", &self.status())
            .field("state", &self.state.get())
            .finish()
    }
}
