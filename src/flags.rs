//! # Status Flags
//!
//! The status register (SREG, data address 0x5F) bit layout:
//!
//! | Bit | Flag | Meaning                     |
//! |-----|------|-----------------------------|
//! | 7   | I    | Global interrupt enable     |
//! | 6   | T    | Bit copy storage            |
//! | 5   | H    | Half carry                  |
//! | 4   | S    | Sign, N xor V               |
//! | 3   | V    | Two's complement overflow   |
//! | 2   | N    | Negative                    |
//! | 1   | Z    | Zero                        |
//! | 0   | C    | Carry                       |
//!
//! Each function here computes a [`FlagUpdate`] for one operation class. An
//! update carries the set of flags the instruction defines plus their new
//! values, and [`FlagUpdate::apply`] clears exactly those bits before OR-ing
//! in the values. Flags an instruction does not define survive untouched.

/// One bit of the status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Flag {
    Carry = 0,
    Zero = 1,
    Negative = 2,
    Overflow = 3,
    Sign = 4,
    HalfCarry = 5,
    Transfer = 6,
    Interrupt = 7,
}

impl Flag {
    /// All flags, indexed by bit position.
    pub const ALL: [Flag; 8] = [
        Flag::Carry,
        Flag::Zero,
        Flag::Negative,
        Flag::Overflow,
        Flag::Sign,
        Flag::HalfCarry,
        Flag::Transfer,
        Flag::Interrupt,
    ];

    /// Looks up a flag by its SREG bit index (only the low 3 bits are used).
    pub const fn from_index(index: u8) -> Flag {
        Flag::ALL[(index & 0x07) as usize]
    }

    /// Bit index in SREG.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Single-bit mask in SREG.
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }

    /// Conventional one-letter name (C, Z, N, V, S, H, T, I).
    pub const fn letter(self) -> char {
        match self {
            Flag::Carry => 'C',
            Flag::Zero => 'Z',
            Flag::Negative => 'N',
            Flag::Overflow => 'V',
            Flag::Sign => 'S',
            Flag::HalfCarry => 'H',
            Flag::Transfer => 'T',
            Flag::Interrupt => 'I',
        }
    }
}

/// A partial write to the status register.
///
/// # Examples
///
/// ```
/// use libavr::{Flag, FlagUpdate};
///
/// let update = FlagUpdate::new()
///     .with(Flag::Zero, true)
///     .with(Flag::Carry, false);
///
/// // I and T survive, C is cleared, Z is set.
/// assert_eq!(update.apply(0b1100_0001), 0b1100_0010);
/// assert_eq!(update.get(Flag::Overflow), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagUpdate {
    affected: u8,
    values: u8,
}

impl FlagUpdate {
    /// An update that touches nothing.
    pub const fn new() -> Self {
        Self {
            affected: 0,
            values: 0,
        }
    }

    /// Marks `flag` as defined by this update with the given value.
    pub const fn with(self, flag: Flag, value: bool) -> Self {
        let mask = flag.mask();
        Self {
            affected: self.affected | mask,
            values: if value {
                self.values | mask
            } else {
                self.values & !mask
            },
        }
    }

    /// Bit mask of the flags this update writes.
    pub const fn affected(self) -> u8 {
        self.affected
    }

    /// The value this update writes for `flag`, or `None` if untouched.
    pub const fn get(self, flag: Flag) -> Option<bool> {
        if self.affected & flag.mask() == 0 {
            None
        } else {
            Some(self.values & flag.mask() != 0)
        }
    }

    /// Applies the update to an SREG value.
    pub const fn apply(self, sreg: u8) -> u8 {
        (sreg & !self.affected) | self.values
    }
}

#[inline]
const fn bit(value: u16, n: u32) -> bool {
    (value >> n) & 1 != 0
}

/// Carry out of bit `n` for `a + b = r`.
#[inline]
const fn carry_out(a: u8, b: u8, r: u8, n: u32) -> bool {
    let (a, b, r) = (bit(a as u16, n), bit(b as u16, n), bit(r as u16, n));
    (a && b) || (b && !r) || (!r && a)
}

/// Borrow into bit `n` for `a - b = r`.
#[inline]
const fn borrow_out(a: u8, b: u8, r: u8, n: u32) -> bool {
    let (a, b, r) = (bit(a as u16, n), bit(b as u16, n), bit(r as u16, n));
    (!a && b) || (b && r) || (r && !a)
}

/// Z, N, V and S for an 8-bit result with a known overflow.
#[inline]
const fn result_flags(r: u8, overflow: bool) -> FlagUpdate {
    let negative = r & 0x80 != 0;
    FlagUpdate::new()
        .with(Flag::Zero, r == 0)
        .with(Flag::Negative, negative)
        .with(Flag::Overflow, overflow)
        .with(Flag::Sign, negative ^ overflow)
}

/// ADD, ADC: `rd + rr (+ C) = r`. Defines H, S, V, N, Z, C.
pub const fn add(rd: u8, rr: u8, r: u8) -> FlagUpdate {
    let (rd7, rr7, r7) = (rd & 0x80 != 0, rr & 0x80 != 0, r & 0x80 != 0);
    let overflow = (rd7 && rr7 && !r7) || (!rd7 && !rr7 && r7);

    result_flags(r, overflow)
        .with(Flag::Carry, carry_out(rd, rr, r, 7))
        .with(Flag::HalfCarry, carry_out(rd, rr, r, 3))
}

/// SUB, SUBI, SBC, SBCI: `rd - rr (- C) = r`. Defines H, S, V, N, Z, C.
///
/// Z is set from the result alone, also for the with-carry forms.
pub const fn sub(rd: u8, rr: u8, r: u8) -> FlagUpdate {
    let (rd7, rr7, r7) = (rd & 0x80 != 0, rr & 0x80 != 0, r & 0x80 != 0);
    let overflow = (rd7 && !rr7 && !r7) || (!rd7 && rr7 && r7);

    result_flags(r, overflow)
        .with(Flag::Carry, borrow_out(rd, rr, r, 7))
        .with(Flag::HalfCarry, borrow_out(rd, rr, r, 3))
}

/// AND, ANDI, OR, ORI, EOR. Defines S, V (cleared), N, Z; C and H untouched.
pub const fn logic(r: u8) -> FlagUpdate {
    result_flags(r, false)
}

/// ADIW: `rd + k = r` on a register pair. Defines S, V, N, Z, C.
pub const fn add_word(rd: u16, r: u16) -> FlagUpdate {
    let (rdh7, r15) = (bit(rd, 15), bit(r, 15));
    let overflow = !rdh7 && r15;

    FlagUpdate::new()
        .with(Flag::Carry, !r15 && rdh7)
        .with(Flag::Zero, r == 0)
        .with(Flag::Negative, r15)
        .with(Flag::Overflow, overflow)
        .with(Flag::Sign, r15 ^ overflow)
}

/// SBIW: `rd - k = r` on a register pair. Defines S, V, N, Z, C.
pub const fn sub_word(rd: u16, r: u16) -> FlagUpdate {
    let (rdh7, r15) = (bit(rd, 15), bit(r, 15));
    let overflow = rdh7 && !r15;

    FlagUpdate::new()
        .with(Flag::Carry, r15 && !rdh7)
        .with(Flag::Zero, r == 0)
        .with(Flag::Negative, r15)
        .with(Flag::Overflow, overflow)
        .with(Flag::Sign, r15 ^ overflow)
}

/// COM: carry set, overflow cleared. Defines S, V, N, Z, C.
pub const fn com(r: u8) -> FlagUpdate {
    result_flags(r, false).with(Flag::Carry, true)
}

/// NEG: `0 - rd = r`. Defines H, S, V, N, Z, C.
pub const fn neg(rd: u8, r: u8) -> FlagUpdate {
    result_flags(r, r == 0x80)
        .with(Flag::Carry, r != 0)
        .with(Flag::HalfCarry, (r | rd) & 0x08 != 0)
}

/// INC. Overflow only when crossing 0x7F -> 0x80. Carry is untouched.
pub const fn inc(rd: u8, r: u8) -> FlagUpdate {
    result_flags(r, rd == 0x7F)
}

/// DEC. Overflow only when crossing 0x80 -> 0x7F. Carry is untouched.
pub const fn dec(rd: u8, r: u8) -> FlagUpdate {
    result_flags(r, rd == 0x80)
}

/// MUL family. C is bit 15 of the product before any fractional shift and Z
/// tests the stored value. No other flag is defined.
pub const fn multiply(product: u16, stored: u16) -> FlagUpdate {
    FlagUpdate::new()
        .with(Flag::Carry, bit(product, 15))
        .with(Flag::Zero, stored == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_overflow_add(a: u8, b: u8) -> bool {
        (a as i8).checked_add(b as i8).is_none()
    }

    fn signed_overflow_sub(a: u8, b: u8) -> bool {
        (a as i8).checked_sub(b as i8).is_none()
    }

    #[test]
    fn test_add_matches_arithmetic_for_all_pairs() {
        for rd in 0..=255u8 {
            for rr in 0..=255u8 {
                let r = rd.wrapping_add(rr);
                let update = add(rd, rr, r);

                assert_eq!(update.get(Flag::Carry), Some(rd as u16 + rr as u16 > 0xFF));
                assert_eq!(
                    update.get(Flag::HalfCarry),
                    Some((rd & 0x0F) + (rr & 0x0F) > 0x0F)
                );
                assert_eq!(update.get(Flag::Overflow), Some(signed_overflow_add(rd, rr)));
                assert_eq!(update.get(Flag::Zero), Some(r == 0));
            }
        }
    }

    #[test]
    fn test_sub_matches_arithmetic_for_all_pairs() {
        for rd in 0..=255u8 {
            for rr in 0..=255u8 {
                let r = rd.wrapping_sub(rr);
                let update = sub(rd, rr, r);

                assert_eq!(update.get(Flag::Carry), Some(rr > rd));
                assert_eq!(update.get(Flag::HalfCarry), Some((rr & 0x0F) > (rd & 0x0F)));
                assert_eq!(update.get(Flag::Overflow), Some(signed_overflow_sub(rd, rr)));
            }
        }
    }

    #[test]
    fn test_sign_is_negative_xor_overflow() {
        // 0x7F + 0x01 = 0x80: N=1, V=1 -> S=0
        let update = add(0x7F, 0x01, 0x80);
        assert_eq!(update.get(Flag::Negative), Some(true));
        assert_eq!(update.get(Flag::Overflow), Some(true));
        assert_eq!(update.get(Flag::Sign), Some(false));
    }

    #[test]
    fn test_logic_leaves_carry_and_half_carry() {
        let update = logic(0x80);
        assert_eq!(update.get(Flag::Carry), None);
        assert_eq!(update.get(Flag::HalfCarry), None);
        assert_eq!(update.get(Flag::Overflow), Some(false));
        assert_eq!(update.apply(0b0010_1001), 0b0011_0101);
    }

    #[test]
    fn test_sub_zero_follows_result() {
        // 5 - 4 - C(1) = 0
        assert_eq!(sub(5, 4, 0).get(Flag::Zero), Some(true));
        assert_eq!(sub(0, 0, 0).apply(0x00) & Flag::Zero.mask(), Flag::Zero.mask());
        assert_eq!(sub(5, 4, 1).get(Flag::Zero), Some(false));
    }

    #[test]
    fn test_word_flags() {
        // 0x7FFF + 1 crosses into negative
        let update = add_word(0x7FFF, 0x8000);
        assert_eq!(update.get(Flag::Overflow), Some(true));
        assert_eq!(update.get(Flag::Carry), Some(false));
        assert_eq!(update.get(Flag::HalfCarry), None);

        // 0xFFFF + 1 wraps to zero
        let update = add_word(0xFFFF, 0x0000);
        assert_eq!(update.get(Flag::Carry), Some(true));
        assert_eq!(update.get(Flag::Zero), Some(true));

        // 0x0000 - 1 borrows
        let update = sub_word(0x0000, 0xFFFF);
        assert_eq!(update.get(Flag::Carry), Some(true));
        assert_eq!(update.get(Flag::Negative), Some(true));

        // 0x8000 - 1 underflows the signed range
        let update = sub_word(0x8000, 0x7FFF);
        assert_eq!(update.get(Flag::Overflow), Some(true));
        assert_eq!(update.get(Flag::Sign), Some(true));
    }

    #[test]
    fn test_multiply_touches_only_carry_and_zero() {
        let update = multiply(0xFE01, 0xFE01);
        assert_eq!(update.affected(), Flag::Carry.mask() | Flag::Zero.mask());
        assert_eq!(update.apply(0b1111_1100), 0b1111_1101);
    }

    #[test]
    fn test_flag_lookup_by_index() {
        for (index, flag) in Flag::ALL.iter().enumerate() {
            assert_eq!(Flag::from_index(index as u8), *flag);
            assert_eq!(flag.index() as usize, index);
        }
        assert_eq!(Flag::Sign.letter(), 'S');
    }
}
