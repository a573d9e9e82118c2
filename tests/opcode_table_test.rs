//! Tests for the opcode metadata table and decode priority.

use libavr::{decode, Instruction, Opcode, DECODE_ORDER, OPCODE_TABLE};

#[test]
fn test_table_has_one_entry_per_opcode() {
    for (index, entry) in OPCODE_TABLE.iter().enumerate() {
        assert_eq!(entry.opcode as usize, index, "{}", entry.mnemonic);
    }

    let mut mnemonics: Vec<&str> = OPCODE_TABLE.iter().map(|e| e.mnemonic).collect();
    mnemonics.sort_unstable();
    mnemonics.dedup();
    assert_eq!(mnemonics.len(), OPCODE_TABLE.len());
}

#[test]
fn test_cycle_costs() {
    let expected = [
        (Opcode::Add, 1),
        (Opcode::Adc, 1),
        (Opcode::Sub, 1),
        (Opcode::Sbc, 1),
        (Opcode::And, 1),
        (Opcode::Or, 1),
        (Opcode::Eor, 1),
        (Opcode::Subi, 1),
        (Opcode::Sbci, 1),
        (Opcode::Andi, 1),
        (Opcode::Ori, 1),
        (Opcode::Adiw, 2),
        (Opcode::Sbiw, 2),
        (Opcode::Com, 1),
        (Opcode::Neg, 1),
        (Opcode::Inc, 1),
        (Opcode::Dec, 1),
        (Opcode::Mul, 2),
        (Opcode::Muls, 2),
        (Opcode::Mulsu, 2),
        (Opcode::Fmul, 2),
        (Opcode::Fmuls, 2),
        (Opcode::Fmulsu, 2),
        (Opcode::Rjmp, 2),
        (Opcode::Brbs, 1),
        (Opcode::Brbc, 2),
        (Opcode::Sbi, 2),
        (Opcode::Ldi, 1),
    ];

    assert_eq!(expected.len(), OPCODE_TABLE.len());
    for (opcode, cycles) in expected {
        assert_eq!(opcode.base_cycles(), cycles, "{}", opcode.mnemonic());
    }
}

#[test]
fn test_decode_order_is_most_specific_first() {
    let specificities: Vec<u32> = DECODE_ORDER
        .iter()
        .map(|&i| OPCODE_TABLE[i].specificity())
        .collect();

    assert!(specificities.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_no_ambiguous_words() {
    // Any word matched by several entries must have a unique most specific one
    for word in 0..=u16::MAX {
        let mut matches: Vec<u32> = OPCODE_TABLE
            .iter()
            .filter(|e| e.matches(word))
            .map(|e| e.specificity())
            .collect();
        matches.sort_unstable_by(|a, b| b.cmp(a));

        if matches.len() > 1 {
            assert!(matches[0] > matches[1], "ambiguous word {:#06X}", word);
        }
    }
}

#[test]
fn test_decode_agrees_with_table() {
    for word in 0..=u16::MAX {
        let best = OPCODE_TABLE
            .iter()
            .filter(|e| e.matches(word))
            .max_by_key(|e| e.specificity());

        assert_eq!(
            decode(word).opcode(),
            best.map(|e| e.opcode),
            "word {:#06X}",
            word
        );
    }
}

#[test]
fn test_unimplemented_instructions_decode_as_unknown() {
    for word in [
        0x0000, // nop
        0x9508, // ret
        0x9518, // reti
        0x920F, // push r0
        0x900F, // pop r0
        0xB000, // in r0, 0x00
        0x2F01, // mov r16, r17
        0x9588, // sleep
    ] {
        assert_eq!(decode(word), Instruction::Unknown(word));
    }
}

#[test]
fn test_operand_fields_cover_their_ranges() {
    for word in 0..=u16::MAX {
        match decode(word) {
            Instruction::Add { d, r } | Instruction::Mul { d, r } => {
                assert!(d < 32 && r < 32);
            }
            Instruction::Ldi { d, .. } | Instruction::Subi { d, .. } => {
                assert!((16..32).contains(&d));
            }
            Instruction::Adiw { d, k } | Instruction::Sbiw { d, k } => {
                assert!([24, 26, 28, 30].contains(&d));
                assert!(k < 64);
            }
            Instruction::Muls { d, r } => {
                assert!((16..32).contains(&d) && (16..32).contains(&r));
            }
            Instruction::Mulsu { d, r } | Instruction::Fmulsu { d, r } => {
                assert!((16..24).contains(&d) && (16..24).contains(&r));
            }
            Instruction::Rjmp { k } => assert!((-2048..2048).contains(&k)),
            Instruction::Brbs { s, k } | Instruction::Brbc { s, k } => {
                assert!(s < 8);
                assert!((-64..64).contains(&k));
            }
            Instruction::Sbi { a, b } => assert!(a < 32 && b < 8),
            _ => {}
        }
    }
}
