#![cfg(target_os = "windows")]

//! Windows backend.
//!
//! - **`xinput_library`**: `LoadLibraryA` / `GetProcAddress` for the XInput DLL
//! - **[`Win32`]**: process id, foreground window owner and keyboard state
//!
//! Every call here is a single forwarding call into user32/kernel32; nothing
//! is cached at this layer.

pub mod xinput_library;

pub use xinput_library::XInputLibrary;

use crate::backends::{Platform, WindowHandle};
use crate::keyboard::KEY_COUNT;
use crate::loader::{DriverLibrary, LibraryLoader};

use windows_sys::Win32::Foundation::HWND;
use windows_sys::Win32::System::Threading::GetCurrentProcessId;
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{GetKeyState, GetKeyboardState};
use windows_sys::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowThreadProcessId};

/// The live Windows platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct Win32;

impl LibraryLoader for Win32 {
    fn load_library(&self, name: &str) -> Result<Box<dyn DriverLibrary>, u32> {
        XInputLibrary::load(name).map(|lib| Box::new(lib) as Box<dyn DriverLibrary>)
    }
}

impl Platform for Win32 {
    fn current_process_id(&self) -> u32 {
        unsafe { GetCurrentProcessId() }
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.is_null() {
            None
        } else {
            Some(WindowHandle(hwnd as usize))
        }
    }

    fn window_process_id(&self, window: WindowHandle) -> Option<u32> {
        let mut pid: u32 = 0;
        // Returns the owning thread id; 0 means the window is gone.
        let tid = unsafe { GetWindowThreadProcessId(window.0 as HWND, &mut pid) };
        if tid == 0 {
            None
        } else {
            Some(pid)
        }
    }

    fn keyboard_state(&self, keys: &mut [u8; KEY_COUNT]) -> bool {
        unsafe {
            // GetKeyboardState only sees what this thread's message queue has
            // processed; any GetKeyState call first syncs it with the system.
            GetKeyState(0);
            GetKeyboardState(keys.as_mut_ptr()) != 0
        }
    }
}
