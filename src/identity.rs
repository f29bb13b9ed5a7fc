//! Once-captured process identity, used by focus checks.

use std::sync::OnceLock;

/// Process id captured on first init and never changed.
#[derive(Debug, Default)]
pub struct ProcessIdentity {
    pid: OnceLock<u32>,
}

impl ProcessIdentity {
    pub const fn new() -> Self {
        Self {
            pid: OnceLock::new(),
        }
    }

    /// Capture the process id via `current` unless already captured.
    /// Returns the cached id.
    pub fn init(&self, current: impl FnOnce() -> u32) -> u32 {
        *self.pid.get_or_init(current)
    }

    /// The cached id, or `None` before [`init`](Self::init).
    #[inline]
    pub fn get(&self) -> Option<u32> {
        self.pid.get().copied()
    }
}
