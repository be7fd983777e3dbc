//! # Typed register bit-fields
//!
//! A [`Field`] describes a contiguous group of bits inside an 8, 16 or 32-bit register value.
//! All chip register maps in [`regs`](crate::regs) and [`eeprom`](crate::eeprom) are built from these descriptors.
//!
//! ## Available Methods
//! - [`Field::new`] - Build a field from a contiguous mask
//! - [`Field::from_parts`] - Build a field from a shift and a width
//! - [`get`](Field::get) - Extract the field from a register value
//! - [`set`](Field::set) - Update the field inside a register value
//! - [`with`](Field::with) - Return a copy of the register value with the field updated

use core::ops::{BitAnd, BitOr, Not, Shl, Shr};

/// Register word types a [`Field`] can operate on
pub trait RegWord:
    Copy + PartialEq
    + BitAnd<Output = Self> + BitOr<Output = Self> + Not<Output = Self>
    + Shl<u32, Output = Self> + Shr<u32, Output = Self>
{
    /// Number of bits in the word
    const BITS: u32;
    /// All-zero word
    const ZERO: Self;
    fn trailing_zeros(self) -> u32;
    fn count_ones(self) -> u32;
    /// Truncate a u32 value to the word size
    fn from_u32(v: u32) -> Self;
    fn into_u32(self) -> u32;
}

macro_rules! impl_reg_word {
    ($t:ty) => {
        impl RegWord for $t {
            const BITS: u32 = <$t>::BITS;
            const ZERO: Self = 0;
            fn trailing_zeros(self) -> u32 { <$t>::trailing_zeros(self) }
            fn count_ones(self) -> u32 { <$t>::count_ones(self) }
            fn from_u32(v: u32) -> Self { v as $t }
            fn into_u32(self) -> u32 { self as u32 }
        }
    };
}

impl_reg_word!(u8);
impl_reg_word!(u16);
impl_reg_word!(u32);

/// Bit-field inside a register of type `T`, described by its mask
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field<T>(T);

/// Field of a 32-bit CSR register
pub type Field32 = Field<u32>;
/// Field of a 16-bit EEPROM word
pub type Field16 = Field<u16>;
/// Field of an 8-bit BBP/RFCSR register
pub type Field8 = Field<u8>;

impl<T: RegWord> Field<T> {
    /// Create a field from a contiguous mask
    pub const fn new(mask: T) -> Self {
        Field(mask)
    }

    /// Create a field from its position and width in bits
    pub fn from_parts(shift: u32, width: u32) -> Self {
        let ones = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
        Field(T::from_u32(ones) << shift)
    }

    pub fn mask(&self) -> T {
        self.0
    }

    /// Position of the least significant bit
    pub fn shift(&self) -> u32 {
        self.0.trailing_zeros().min(T::BITS)
    }

    /// Number of bits
    pub fn width(&self) -> u32 {
        self.0.count_ones()
    }

    /// Extract the field value from a register
    pub fn get(&self, reg: T) -> T {
        if self.0 == T::ZERO {
            return T::ZERO;
        }
        (reg & self.0) >> self.shift()
    }

    /// Replace the field in `reg` with `value` (extra bits are dropped)
    pub fn set(&self, reg: &mut T, value: T) {
        if self.0 == T::ZERO {
            return;
        }
        *reg = (*reg & !self.0) | ((value << self.shift()) & self.0);
    }

    /// Copy of `reg` with the field replaced by `value`
    pub fn with(&self, reg: T, value: T) -> T {
        let mut r = reg;
        self.set(&mut r, value);
        r
    }

    /// Check if any bit of the field is set
    pub fn is_set(&self, reg: T) -> bool {
        (reg & self.0) != T::ZERO
    }
}

impl Field<u32> {
    /// Extract the field as a byte (for fields up to 8 bits)
    pub fn get_u8(&self, reg: u32) -> u8 {
        self.get(reg) as u8
    }

    /// Set a single-bit field from a boolean
    pub fn set_bool(&self, reg: &mut u32, en: bool) {
        self.set(reg, en as u32);
    }
}

impl Field<u16> {
    /// Extract the field as a byte (for fields up to 8 bits)
    pub fn get_u8(&self, word: u16) -> u8 {
        self.get(word) as u8
    }
}

impl Field<u8> {
    pub fn set_bool(&self, reg: &mut u8, en: bool) {
        self.set(reg, en as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_widths() {
        for width in 1..=32u32 {
            for shift in 0..=(32 - width) {
                let f = Field32::from_parts(shift, width);
                assert_eq!(f.width(), width);
                assert_eq!(f.shift(), shift);
                let max = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
                for v in [0, 1, max / 2, max] {
                    let mut reg = 0xA5A5_5A5Au32;
                    f.set(&mut reg, v);
                    assert_eq!(f.get(reg), v, "width {width} shift {shift}");
                }
            }
        }
    }

    #[test]
    fn set_keeps_neighbours() {
        let f = Field32::new(0x0000_ff00);
        let reg = f.with(0x1234_5678, 0xab);
        assert_eq!(reg, 0x1234_ab78);
        // Oversized value is truncated to the field
        assert_eq!(f.with(0, 0x1ff), 0xff00);
    }

    #[test]
    fn small_words() {
        let f8 = Field8::new(0x18);
        let mut r = 0xffu8;
        f8.set(&mut r, 0);
        assert_eq!(r, 0xe7);
        assert_eq!(f8.get(0x10), 2);

        let f16 = Field16::from_parts(8, 4);
        assert_eq!(f16.mask(), 0x0f00);
        assert_eq!(f16.get(0x0a00), 0xa);
        assert!(f16.is_set(0x0100));
    }
}
