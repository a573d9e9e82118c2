//! Integration tests for the AVR disassembler

use libavr::disassembler::formatter::{format_instruction, format_listing};
use libavr::disassembler::{disassemble, DisassemblyOptions};
use libavr::{hex, Cpu, Instruction};

#[test]
fn test_single_instruction_disassembly() {
    let bytes = &[0x0F, 0xEF]; // ldi r16, 0xFF

    let instructions = disassemble(bytes, DisassemblyOptions::default());

    assert_eq!(instructions.len(), 1);

    let instr = &instructions[0];
    assert_eq!(instr.address, 0x0000);
    assert_eq!(instr.instruction, Some(Instruction::Ldi { d: 16, k: 0xFF }));
    assert_eq!(instr.mnemonic, "ldi");
    assert_eq!(instr.bytes, vec![0x0F, 0xEF]);
    assert_eq!(instr.base_cycles, 1);

    assert_eq!(format_instruction(instr), "ldi r16, 0xFF");
}

#[test]
fn test_multi_instruction_disassembly() {
    let bytes = &[
        0x05, 0xE0, // ldi r16, 0x05
        0x13, 0xE0, // ldi r17, 0x03
        0x01, 0x0F, // add r16, r17
        0x2D, 0x9A, // sbi 0x05, 5
        0xFF, 0xCF, // rjmp .-2
    ];

    let options = DisassemblyOptions {
        start_address: 0x0100,
        ..DisassemblyOptions::default()
    };

    let instructions = disassemble(bytes, options);
    let text: Vec<String> = instructions.iter().map(format_instruction).collect();

    assert_eq!(
        text,
        vec![
            "ldi r16, 0x05",
            "ldi r17, 0x03",
            "add r16, r17",
            "sbi 0x05, 5",
            "rjmp .-2",
        ]
    );
    assert_eq!(instructions[4].address, 0x0108);
    assert_eq!(instructions[4].target(), Some(0x0108));
}

#[test]
fn test_unknown_words_and_trailing_byte() {
    let bytes = &[
        0x0F, 0xEF, // ldi r16, 0xFF
        0x08, 0x95, // ret (not implemented)
        0x42, // odd byte
    ];

    let instructions = disassemble(bytes, DisassemblyOptions::default());

    assert_eq!(instructions.len(), 3);

    assert_eq!(instructions[1].mnemonic, ".dw");
    assert_eq!(instructions[1].instruction, Some(Instruction::Unknown(0x9508)));
    assert_eq!(format_instruction(&instructions[1]), ".dw 0x9508");

    assert_eq!(instructions[2].address, 4);
    assert_eq!(instructions[2].instruction, None);
    assert_eq!(format_instruction(&instructions[2]), ".db 0x42");
}

#[test]
fn test_every_mnemonic_formats() {
    let cases: &[(u16, &str)] = &[
        (0x0C12, "add r1, r2"),
        (0x1FFF, "adc r31, r31"),
        (0x1B01, "sub r16, r17"),
        (0x0B01, "sbc r16, r17"),
        (0x2312, "and r17, r18"),
        (0x2B12, "or r17, r18"),
        (0x2700, "eor r16, r16"),
        (0x5F0F, "subi r16, 0xFF"),
        (0x4010, "sbci r17, 0x00"),
        (0x7F0F, "andi r16, 0xFF"),
        (0x6800, "ori r16, 0x80"),
        (0x9601, "adiw r24, 1"),
        (0x9711, "sbiw r26, 1"),
        (0x9400, "com r0"),
        (0x95F1, "neg r31"),
        (0x9403, "inc r0"),
        (0x940A, "dec r0"),
        (0x9C12, "mul r1, r2"),
        (0x020F, "muls r16, r31"),
        (0x0370, "mulsu r23, r16"),
        (0x0309, "fmul r16, r17"),
        (0x03C5, "fmuls r20, r21"),
        (0x03EF, "fmulsu r22, r23"),
        (0xC7FF, "rjmp .+4094"),
        (0xC800, "rjmp .-4096"),
        (0xF1FF, "brbs 7, .+126"),
        (0xF600, "brbc 0, .-128"),
        (0x9AFF, "sbi 0x1F, 7"),
        (0xEF0F, "ldi r16, 0xFF"),
    ];

    for &(word, expected) in cases {
        let listing = disassemble(&word.to_le_bytes(), DisassemblyOptions::default());
        assert_eq!(format_instruction(&listing[0]), expected, "word {:#06X}", word);
    }
}

#[test]
fn test_listing_matches_execution() {
    // The CPU and the disassembler share one decoder
    let image = hex::parse(":0A00000005E013E0010F2D9AFFCF79\n:00000001FF\n").unwrap();
    let listing = disassemble(&image.data, DisassemblyOptions::default());
    let mut cpu = Cpu::new(&image.data).unwrap();

    for entry in &listing {
        assert_eq!(cpu.pc(), entry.address);
        assert_eq!(Some(cpu.step()), entry.instruction);
    }
}

#[test]
fn test_format_listing_with_offsets() {
    let options = DisassemblyOptions {
        start_address: 0x10,
        hex_dump: false,
        show_offsets: true,
    };
    let listing = disassemble(&[0x11, 0xF0], options);

    assert_eq!(format_listing(&listing, options), "  10:\tbrbs 1, .+4\t; 0x16\n");
}
