//! # Opcode Table
//!
//! Single source of truth for every implemented AVR instruction. An entry
//! identifies an instruction by a mask/pattern pair: a fetched word belongs
//! to the entry when `word & mask == pattern`.
//!
//! AVR encodings overlap: shorter prefixes are shared by several
//! instructions. The decoder therefore never walks [`OPCODE_TABLE`] in
//! declaration order. It walks [`DECODE_ORDER`], which ranks entries by mask
//! specificity (number of fixed bits, most constrained first) and is computed
//! at compile time. Ties keep declaration order, and entries with equal
//! specificity must not overlap.
//!
//! Adding an instruction means adding an [`Opcode`] variant, a table row in
//! the matching position, operand extraction in the decoder and a handler.
//! The ranking takes care of precedence.

/// Instruction identity, one variant per implemented mnemonic.
///
/// Discriminants index [`OPCODE_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Or,
    Eor,
    Subi,
    Sbci,
    Andi,
    Ori,
    Adiw,
    Sbiw,
    Com,
    Neg,
    Inc,
    Dec,
    Mul,
    Muls,
    Mulsu,
    Fmul,
    Fmuls,
    Fmulsu,
    Rjmp,
    Brbs,
    Brbc,
    Sbi,
    Ldi,
}

impl Opcode {
    /// Table entry for this opcode.
    pub const fn metadata(self) -> OpcodeMetadata {
        OPCODE_TABLE[self as usize]
    }

    /// Lowercase assembler mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        self.metadata().mnemonic
    }

    /// Cycle cost when no data-dependent timing applies.
    pub const fn base_cycles(self) -> u8 {
        self.metadata().base_cycles
    }
}

/// Static decode and timing information for one instruction.
///
/// # Examples
///
/// ```
/// use libavr::{Opcode, OPCODE_TABLE};
///
/// let add = &OPCODE_TABLE[Opcode::Add as usize];
/// assert_eq!(add.mnemonic, "add");
/// assert!(add.matches(0x0C12)); // add r1, r2
/// assert!(!add.matches(0x1C12)); // adc r1, r2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeMetadata {
    /// Which instruction this entry describes.
    pub opcode: Opcode,

    /// Lowercase assembler mnemonic.
    pub mnemonic: &'static str,

    /// Bits of the word that are fixed by the encoding.
    pub mask: u16,

    /// Required value of the fixed bits.
    pub pattern: u16,

    /// Cycle cost. Branches charge this when not taken.
    pub base_cycles: u8,
}

impl OpcodeMetadata {
    /// True if `word` carries this entry's fixed bits.
    pub const fn matches(&self, word: u16) -> bool {
        word & self.mask == self.pattern
    }

    /// Number of fixed bits; higher ranks earlier in [`DECODE_ORDER`].
    pub const fn specificity(&self) -> u32 {
        self.mask.count_ones()
    }
}

/// Number of implemented instructions.
pub const OPCODE_COUNT: usize = 28;

const fn entry(
    opcode: Opcode,
    mnemonic: &'static str,
    mask: u16,
    pattern: u16,
    base_cycles: u8,
) -> OpcodeMetadata {
    OpcodeMetadata {
        opcode,
        mnemonic,
        mask,
        pattern,
        base_cycles,
    }
}

/// Every implemented instruction, indexed by [`Opcode`] discriminant.
pub const OPCODE_TABLE: [OpcodeMetadata; OPCODE_COUNT] = [
    // 0000 11rd dddd rrrr
    entry(Opcode::Add, "add", 0xFC00, 0x0C00, 1),
    // 0001 11rd dddd rrrr
    entry(Opcode::Adc, "adc", 0xFC00, 0x1C00, 1),
    // 0001 10rd dddd rrrr
    entry(Opcode::Sub, "sub", 0xFC00, 0x1800, 1),
    // 0000 10rd dddd rrrr
    entry(Opcode::Sbc, "sbc", 0xFC00, 0x0800, 1),
    // 0010 00rd dddd rrrr
    entry(Opcode::And, "and", 0xFC00, 0x2000, 1),
    // 0010 10rd dddd rrrr
    entry(Opcode::Or, "or", 0xFC00, 0x2800, 1),
    // 0010 01rd dddd rrrr
    entry(Opcode::Eor, "eor", 0xFC00, 0x2400, 1),
    // 0101 KKKK dddd KKKK
    entry(Opcode::Subi, "subi", 0xF000, 0x5000, 1),
    // 0100 KKKK dddd KKKK
    entry(Opcode::Sbci, "sbci", 0xF000, 0x4000, 1),
    // 0111 KKKK dddd KKKK
    entry(Opcode::Andi, "andi", 0xF000, 0x7000, 1),
    // 0110 KKKK dddd KKKK
    entry(Opcode::Ori, "ori", 0xF000, 0x6000, 1),
    // 1001 0110 KKdd KKKK
    entry(Opcode::Adiw, "adiw", 0xFF00, 0x9600, 2),
    // 1001 0111 KKdd KKKK
    entry(Opcode::Sbiw, "sbiw", 0xFF00, 0x9700, 2),
    // 1001 010d dddd 0000
    entry(Opcode::Com, "com", 0xFE0F, 0x9400, 1),
    // 1001 010d dddd 0001
    entry(Opcode::Neg, "neg", 0xFE0F, 0x9401, 1),
    // 1001 010d dddd 0011
    entry(Opcode::Inc, "inc", 0xFE0F, 0x9403, 1),
    // 1001 010d dddd 1010
    entry(Opcode::Dec, "dec", 0xFE0F, 0x940A, 1),
    // 1001 11rd dddd rrrr
    entry(Opcode::Mul, "mul", 0xFC00, 0x9C00, 2),
    // 0000 0010 dddd rrrr
    entry(Opcode::Muls, "muls", 0xFF00, 0x0200, 2),
    // 0000 0011 0ddd 0rrr
    entry(Opcode::Mulsu, "mulsu", 0xFF88, 0x0300, 2),
    // 0000 0011 0ddd 1rrr
    entry(Opcode::Fmul, "fmul", 0xFF88, 0x0308, 2),
    // 0000 0011 1ddd 0rrr
    entry(Opcode::Fmuls, "fmuls", 0xFF88, 0x0380, 2),
    // 0000 0011 1ddd 1rrr
    entry(Opcode::Fmulsu, "fmulsu", 0xFF88, 0x0388, 2),
    // 1100 kkkk kkkk kkkk
    entry(Opcode::Rjmp, "rjmp", 0xF000, 0xC000, 2),
    // 1111 00kk kkkk ksss
    entry(Opcode::Brbs, "brbs", 0xFC00, 0xF000, 1),
    // 1111 01kk kkkk ksss; charges 2 cycles whether or not it branches
    entry(Opcode::Brbc, "brbc", 0xFC00, 0xF400, 2),
    // 1001 1010 AAAA Abbb
    entry(Opcode::Sbi, "sbi", 0xFF00, 0x9A00, 2),
    // 1110 KKKK dddd KKKK
    entry(Opcode::Ldi, "ldi", 0xF000, 0xE000, 1),
];

/// Indices into [`OPCODE_TABLE`] in the order the decoder tries them.
pub const DECODE_ORDER: [usize; OPCODE_COUNT] = specificity_order(&OPCODE_TABLE);

/// Stable insertion sort of table indices by descending mask specificity.
const fn specificity_order(table: &[OpcodeMetadata; OPCODE_COUNT]) -> [usize; OPCODE_COUNT] {
    let mut order = [0usize; OPCODE_COUNT];
    let mut i = 0;
    while i < OPCODE_COUNT {
        order[i] = i;
        i += 1;
    }

    let mut i = 1;
    while i < OPCODE_COUNT {
        let mut j = i;
        while j > 0 && table[order[j - 1]].specificity() < table[order[j]].specificity() {
            let swapped = order[j - 1];
            order[j - 1] = order[j];
            order[j] = swapped;
            j -= 1;
        }
        i += 1;
    }

    order
}

/// Finds the most specific table entry matching `word`.
pub fn lookup(word: u16) -> Option<OpcodeMetadata> {
    DECODE_ORDER
        .iter()
        .map(|&index| OPCODE_TABLE[index])
        .find(|metadata| metadata.matches(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_indexed_by_opcode() {
        for (index, metadata) in OPCODE_TABLE.iter().enumerate() {
            assert_eq!(metadata.opcode as usize, index, "{}", metadata.mnemonic);
        }
    }

    #[test]
    fn test_patterns_lie_within_masks() {
        for metadata in OPCODE_TABLE.iter() {
            assert_eq!(
                metadata.pattern & !metadata.mask,
                0,
                "{} has pattern bits outside its mask",
                metadata.mnemonic
            );
        }
    }

    #[test]
    fn test_decode_order_is_a_permutation() {
        let mut seen = [false; OPCODE_COUNT];
        for &index in DECODE_ORDER.iter() {
            assert!(!seen[index]);
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_decode_order_is_most_specific_first() {
        for pair in DECODE_ORDER.windows(2) {
            let (a, b) = (&OPCODE_TABLE[pair[0]], &OPCODE_TABLE[pair[1]]);
            assert!(a.specificity() >= b.specificity());
            if a.specificity() == b.specificity() {
                assert!(pair[0] < pair[1], "ties must keep table order");
            }
        }
        assert_eq!(OPCODE_TABLE[DECODE_ORDER[0]].specificity(), 11);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(0x0C12).map(|m| m.opcode), Some(Opcode::Add));
        assert_eq!(lookup(0x9403).map(|m| m.opcode), Some(Opcode::Inc));
        assert_eq!(lookup(0xCFFF).map(|m| m.opcode), Some(Opcode::Rjmp));
        assert_eq!(lookup(0x0000), None); // nop is not implemented
        assert_eq!(lookup(0xFFFF), None); // erased flash
    }
}
