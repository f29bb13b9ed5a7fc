//! Keyboard state snapshots.
//!
//! A snapshot is the raw 256-byte virtual-key table the OS hands out
//! (`GetKeyboardState`). For each key:
//! - bit `0x80`: key is held,
//! - bit `0x01`: key is toggled (Caps Lock and friends).
//!
//! No normalization happens here; [`KeyboardSnapshot::to_bitmap`] only packs
//! the held bits for hosts that want 32 bytes instead of 256.

/// Number of virtual-key codes.
pub const KEY_COUNT: usize = 256;

/// Words in a packed held-key bitmap.
pub const BITMAP_WORDS: usize = KEY_COUNT / 32;

const HELD: u8 = 0x80;
const TOGGLED: u8 = 0x01;

/// One copy of the OS virtual-key table.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardSnapshot(pub [u8; KEY_COUNT]);

impl Default for KeyboardSnapshot {
    fn default() -> Self {
        Self([0; KEY_COUNT])
    }
}

impl KeyboardSnapshot {
    /// All keys up.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_COUNT] {
        &self.0
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8; KEY_COUNT] {
        &mut self.0
    }

    /// High bit of `vk`'s byte.
    #[inline]
    pub fn is_held(&self, vk: u8) -> bool {
        self.0[vk as usize] & HELD != 0
    }

    /// Low bit of `vk`'s byte.
    #[inline]
    pub fn is_toggled(&self, vk: u8) -> bool {
        self.0[vk as usize] & TOGGLED != 0
    }

    /// Virtual-key codes currently held, ascending.
    pub fn held_keys(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=u8::MAX).filter(|&vk| self.is_held(vk))
    }

    /// Pack held flags LSB-first: key `k` is bit `k % 32` of word `k / 32`.
    pub fn to_bitmap(&self) -> [u32; BITMAP_WORDS] {
        let mut words = [0u32; BITMAP_WORDS];
        for (word, chunk) in words.iter_mut().zip(self.0.chunks_exact(32)) {
            *word = chunk
                .iter()
                .enumerate()
                .filter(|(_, b)| **b & HELD != 0)
                .fold(0, |acc, (bit, _)| acc | (1 << bit));
        }
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // VK_SHIFT, VK_CAPITAL, 'A', VK_F1
    const VK_SHIFT: u8 = 0x10;
    const VK_CAPITAL: u8 = 0x14;
    const VK_A: u8 = 0x41;
    const VK_F1: u8 = 0x70;

    #[test]
    fn held_and_toggled_bits() {
        let mut snap = KeyboardSnapshot::new();
        snap.0[VK_SHIFT as usize] = 0x80;
        snap.0[VK_CAPITAL as usize] = 0x01;
        snap.0[VK_A as usize] = 0x81;

        assert!(snap.is_held(VK_SHIFT));
        assert!(!snap.is_toggled(VK_SHIFT));
        assert!(!snap.is_held(VK_CAPITAL));
        assert!(snap.is_toggled(VK_CAPITAL));
        assert!(snap.is_held(VK_A) && snap.is_toggled(VK_A));
        assert_eq!(snap.held_keys().collect::<Vec<_>>(), vec![VK_SHIFT, VK_A]);
    }

    #[test]
    fn bitmap_packs_lsb_first() {
        let mut snap = KeyboardSnapshot::new();
        for vk in [0u8, 31, VK_SHIFT, VK_A, VK_F1, 255] {
            snap.0[vk as usize] = 0x80;
        }
        // Toggle-only keys are not held.
        snap.0[VK_CAPITAL as usize] = 0x01;

        let bits = snap.to_bitmap();
        assert_eq!(bits[0], (1 << 0) | (1 << 31) | (1 << 0x10));
        assert_eq!(bits[2], 1 << (VK_A - 64));
        assert_eq!(bits[3], 1 << (VK_F1 - 96));
        assert_eq!(bits[7], 1 << 31);
        assert_eq!(bits[1] | bits[4] | bits[5] | bits[6], 0);
    }

    #[test]
    fn empty_snapshot_is_all_clear() {
        let snap = KeyboardSnapshot::default();
        assert_eq!(snap.to_bitmap(), [0; BITMAP_WORDS]);
        assert_eq!(snap.held_keys().count(), 0);
    }
}
