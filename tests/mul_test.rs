//! Tests for the multiply family.
//!
//! Every variant stores its 16-bit product in R1:R0, defines only C and Z,
//! and takes two cycles.

use libavr::{Cpu, Flag};

/// Helper function to create a CPU with `words` at flash address 0
fn setup_cpu(words: &[u16]) -> Cpu {
    let image: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    Cpu::new(&image).unwrap()
}

fn mul(d: u8, r: u8) -> u16 {
    let (d, r) = (d as u16, r as u16);
    0x9C00 | ((r & 0x10) << 5) | (d << 4) | (r & 0x0F)
}

fn muls(d: u8, r: u8) -> u16 {
    0x0200 | (d as u16 - 16) << 4 | (r as u16 - 16)
}

/// MULSU, FMUL, FMULS, FMULSU: both registers in R16-R23.
fn middle(base: u16, d: u8, r: u8) -> u16 {
    base | (d as u16 - 16) << 4 | (r as u16 - 16)
}

fn mulsu(d: u8, r: u8) -> u16 {
    middle(0x0300, d, r)
}

fn fmul(d: u8, r: u8) -> u16 {
    middle(0x0308, d, r)
}

fn fmuls(d: u8, r: u8) -> u16 {
    middle(0x0380, d, r)
}

fn fmulsu(d: u8, r: u8) -> u16 {
    middle(0x0388, d, r)
}

// ========== MUL ==========

#[test]
fn test_mul_max_operands() {
    let mut cpu = setup_cpu(&[mul(2, 3)]);
    cpu.set_register(2, 0xFF);
    cpu.set_register(3, 0xFF);

    cpu.step();

    assert_eq!(cpu.register_pair(0), 0xFE01);
    assert_eq!(cpu.register(0), 0x01);
    assert_eq!(cpu.register(1), 0xFE);
    assert!(cpu.flag(Flag::Carry));
    assert!(!cpu.flag(Flag::Zero));
    assert_eq!(cpu.pc(), 2);
    assert_eq!(cpu.cycles(), 2);
}

#[test]
fn test_mul_zero() {
    let mut cpu = setup_cpu(&[mul(20, 21)]);
    cpu.set_register(20, 0x00);
    cpu.set_register(21, 0x37);
    cpu.set_register_pair(0, 0xBEEF);

    cpu.step();

    assert_eq!(cpu.register_pair(0), 0x0000);
    assert!(cpu.flag(Flag::Zero));
    assert!(!cpu.flag(Flag::Carry));
}

#[test]
fn test_mul_overwrites_its_own_operands() {
    // mul r0, r1 reads both before writing R1:R0
    let mut cpu = setup_cpu(&[mul(0, 1)]);
    cpu.set_register(0, 12);
    cpu.set_register(1, 11);

    cpu.step();

    assert_eq!(cpu.register_pair(0), 132);
}

#[test]
fn test_mul_only_touches_c_and_z() {
    let mut cpu = setup_cpu(&[mul(2, 3)]);
    cpu.set_status(0b1111_1100);
    cpu.set_register(2, 2);
    cpu.set_register(3, 3);

    cpu.step();

    assert_eq!(cpu.status(), 0b1111_1100);
}

// ========== MULS / MULSU ==========

#[test]
fn test_muls_negative_times_negative() {
    let mut cpu = setup_cpu(&[muls(16, 31)]);
    cpu.set_register(16, 0xFE); // -2
    cpu.set_register(31, 0xFD); // -3

    cpu.step();

    assert_eq!(cpu.register_pair(0), 6);
    assert!(!cpu.flag(Flag::Carry));
}

#[test]
fn test_muls_negative_result_sets_carry() {
    let mut cpu = setup_cpu(&[muls(17, 18)]);
    cpu.set_register(17, 0xFF); // -1
    cpu.set_register(18, 0x05);

    cpu.step();

    assert_eq!(cpu.register_pair(0), 0xFFFB); // -5
    assert!(cpu.flag(Flag::Carry));
}

#[test]
fn test_mulsu() {
    let mut cpu = setup_cpu(&[mulsu(23, 16)]);
    cpu.set_register(23, 0xFF); // -1 signed
    cpu.set_register(16, 0xFF); // 255 unsigned

    cpu.step();

    assert_eq!(cpu.register_pair(0), 0xFF01); // -255
    assert!(cpu.flag(Flag::Carry));
    assert_eq!(cpu.cycles(), 2);
}

// ========== Fractional ==========

#[test]
fn test_fmul_shifts_product() {
    // 0.5 x 0.5 in 1.7 fixed point = 0.25 in 1.15
    let mut cpu = setup_cpu(&[fmul(16, 17)]);
    cpu.set_register(16, 0x40);
    cpu.set_register(17, 0x40);

    cpu.step();

    assert_eq!(cpu.register_pair(0), 0x2000);
    assert!(!cpu.flag(Flag::Carry));
}

#[test]
fn test_fmul_carry_from_unshifted_product() {
    let mut cpu = setup_cpu(&[fmul(16, 17)]);
    cpu.set_register(16, 0xFF);
    cpu.set_register(17, 0xFF);

    cpu.step();

    // 0xFE01 << 1
    assert_eq!(cpu.register_pair(0), 0xFC02);
    assert!(cpu.flag(Flag::Carry));
    assert!(!cpu.flag(Flag::Zero));
}

#[test]
fn test_fmul_zero_tests_stored_value() {
    // 0x80 x 0x80 = 0x4000: C clear, stored 0x8000 is non-zero
    let mut cpu = setup_cpu(&[fmul(18, 19)]);
    cpu.set_register(18, 0x80);
    cpu.set_register(19, 0x80);

    cpu.step();

    assert_eq!(cpu.register_pair(0), 0x8000);
    assert!(!cpu.flag(Flag::Zero));
    assert!(!cpu.flag(Flag::Carry));
}

#[test]
fn test_fmuls() {
    // -0.5 x 0.5 = -0.25
    let mut cpu = setup_cpu(&[fmuls(20, 21)]);
    cpu.set_register(20, 0xC0);
    cpu.set_register(21, 0x40);

    cpu.step();

    assert_eq!(cpu.register_pair(0), 0xE000);
    assert!(cpu.flag(Flag::Carry));
}

#[test]
fn test_fmulsu() {
    // -1 (signed) x 128 (unsigned) = 0xFF80, stored shifted
    let mut cpu = setup_cpu(&[fmulsu(22, 23)]);
    cpu.set_register(22, 0xFF);
    cpu.set_register(23, 0x80);

    cpu.step();

    assert_eq!(cpu.register_pair(0), 0xFF00);
    assert!(cpu.flag(Flag::Carry));
    assert_eq!(cpu.cycles(), 2);
}
