#![cfg(target_os = "windows")]

//! XInput DLL handle.
//!
//! Libraries are loaded by bare name so the standard DLL search order
//! applies. Entry points resolve either by exported name or by export
//! ordinal (`MAKEINTRESOURCEA`): older XInput releases only export the
//! guide-button-aware state function by ordinal.
//!
//! The module handle is never freed. Function pointers handed out by
//! [`resolve`](DriverLibrary::resolve) stay valid for the life of the process.

use crate::config::Symbol;
use crate::loader::DriverLibrary;

use std::ffi::{c_void, CString};
use std::ptr::NonNull;

use windows_sys::core::PCSTR;
use windows_sys::Win32::Foundation::{GetLastError, ERROR_INVALID_NAME, HMODULE};
use windows_sys::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryA};

/// A loaded XInput module.
#[derive(Debug)]
pub struct XInputLibrary {
    module: HMODULE,
}

// SAFETY: an HMODULE is a process-wide base address; lookups through it are
// thread-safe and the module is never unloaded.
unsafe impl Send for XInputLibrary {}
unsafe impl Sync for XInputLibrary {}

impl XInputLibrary {
    /// `LoadLibraryA(name)`, returning `GetLastError()` on failure.
    pub fn load(name: &str) -> Result<Self, u32> {
        let c_name = CString::new(name).map_err(|_| ERROR_INVALID_NAME)?;
        let module = unsafe { LoadLibraryA(c_name.as_ptr().cast()) };
        if module.is_null() {
            Err(unsafe { GetLastError() })
        } else {
            Ok(Self { module })
        }
    }
}

impl DriverLibrary for XInputLibrary {
    fn resolve(&self, symbol: &Symbol) -> Option<NonNull<c_void>> {
        let proc = match symbol {
            // MAKEINTRESOURCEA: the ordinal in the low word of the name pointer.
            Symbol::Ordinal(ordinal) => unsafe {
                GetProcAddress(self.module, *ordinal as usize as PCSTR)
            },
            Symbol::Name(name) => {
                let c_name = CString::new(name.as_str()).ok()?;
                unsafe { GetProcAddress(self.module, c_name.as_ptr().cast()) }
            }
        };
        proc.and_then(|f| NonNull::new(f as *mut c_void))
    }
}
