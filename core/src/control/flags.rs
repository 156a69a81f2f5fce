use serde::{Deserialize, Serialize};
use std::fmt;

/// Eight-bit status register kept as a plain integer with named masks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusRegister(u8);

impl StatusRegister {
    /// Bit 0: supply rail is up.
    pub const POWER_ON: u8 = 1 << 0;
    /// Bit 1: output stage enabled.
    pub const ENABLED: u8 = 1 << 1;
    /// Bit 2: interrupt pending.
    pub const INTERRUPT: u8 = 1 << 2;
    /// Bit 3: attached sensor has a fresh conversion.
    pub const SENSOR_READY: u8 = 1 << 3;
    /// Bits 4-7 carry no meaning and are always written as zero.
    pub const RESERVED_MASK: u8 = 0xF0;

    pub const fn new() -> Self {
        Self(0)
    }

    /// Builds a register from a raw byte, discarding reserved bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & !Self::RESERVED_MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn set(&mut self, mask: u8) {
        self.0 |= mask & !Self::RESERVED_MASK;
    }

    pub fn clear(&mut self, mask: u8) {
        self.0 &= !mask;
    }

    pub fn toggle(&mut self, mask: u8) {
        self.0 ^= mask & !Self::RESERVED_MASK;
    }

    /// True when every bit of `mask` is set.
    pub const fn is_set(self, mask: u8) -> bool {
        mask != 0 && self.0 & mask == mask
    }

    pub fn write(&mut self, mask: u8, on: bool) {
        if on {
            self.set(mask);
        } else {
            self.clear(mask);
        }
    }

    pub fn power_on(self) -> bool {
        self.is_set(Self::POWER_ON)
    }

    pub fn enabled(self) -> bool {
        self.is_set(Self::ENABLED)
    }

    pub fn interrupt_pending(self) -> bool {
        self.is_set(Self::INTERRUPT)
    }

    pub fn sensor_ready(self) -> bool {
        self.is_set(Self::SENSOR_READY)
    }
}

impl fmt::Display for StatusRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b} (0x{:02X})", self.0, self.0)
    }
}
