//! Tests for AND, OR, EOR, ANDI and ORI.
//!
//! Logic instructions define S, V, N and Z only. V is always cleared and
//! C/H keep whatever value they had.

use libavr::{Cpu, Flag};

/// Helper function to create a CPU with `words` at flash address 0
fn setup_cpu(words: &[u16]) -> Cpu {
    let image: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    Cpu::new(&image).unwrap()
}

fn register_register(base: u16, d: u8, r: u8) -> u16 {
    let (d, r) = (d as u16, r as u16);
    base | ((r & 0x10) << 5) | (d << 4) | (r & 0x0F)
}

fn upper_immediate(base: u16, d: u8, k: u8) -> u16 {
    let (d, k) = (d as u16 - 16, k as u16);
    base | ((k & 0xF0) << 4) | (d << 4) | (k & 0x0F)
}

#[test]
fn test_and() {
    let mut cpu = setup_cpu(&[register_register(0x2000, 2, 3)]);
    cpu.set_register(2, 0b1100_1100);
    cpu.set_register(3, 0b1010_1010);

    cpu.step();

    assert_eq!(cpu.register(2), 0b1000_1000);
    assert!(cpu.flag(Flag::Negative));
    assert!(cpu.flag(Flag::Sign));
    assert!(!cpu.flag(Flag::Zero));
    assert_eq!(cpu.pc(), 2);
    assert_eq!(cpu.cycles(), 1);
}

#[test]
fn test_or() {
    let mut cpu = setup_cpu(&[register_register(0x2800, 20, 21)]);
    cpu.set_register(20, 0x0F);
    cpu.set_register(21, 0x30);

    cpu.step();

    assert_eq!(cpu.register(20), 0x3F);
    assert!(!cpu.flag(Flag::Negative));
    assert!(!cpu.flag(Flag::Zero));
}

#[test]
fn test_eor_clears_register() {
    // eor r7, r7 is the CLR idiom
    let mut cpu = setup_cpu(&[register_register(0x2400, 7, 7)]);
    cpu.set_register(7, 0x5A);

    cpu.step();

    assert_eq!(cpu.register(7), 0x00);
    assert!(cpu.flag(Flag::Zero));
}

#[test]
fn test_logic_preserves_carry_and_half_carry() {
    let mut cpu = setup_cpu(&[register_register(0x2000, 2, 3)]);
    cpu.set_status(0b0010_1001); // H, V, C

    cpu.step();

    assert!(cpu.flag(Flag::Carry));
    assert!(cpu.flag(Flag::HalfCarry));
    assert!(!cpu.flag(Flag::Overflow));
    assert!(cpu.flag(Flag::Zero));
}

#[test]
fn test_andi() {
    let mut cpu = setup_cpu(&[upper_immediate(0x7000, 16, 0x0F)]);
    cpu.set_register(16, 0xA5);

    cpu.step();

    assert_eq!(cpu.register(16), 0x05);
    assert!(!cpu.flag(Flag::Zero));
}

#[test]
fn test_andi_to_zero() {
    let mut cpu = setup_cpu(&[upper_immediate(0x7000, 31, 0x00)]);
    cpu.set_register(31, 0xFF);

    cpu.step();

    assert_eq!(cpu.register(31), 0x00);
    assert!(cpu.flag(Flag::Zero));
}

#[test]
fn test_ori() {
    let mut cpu = setup_cpu(&[upper_immediate(0x6000, 18, 0x80)]);
    cpu.set_register(18, 0x01);

    cpu.step();

    assert_eq!(cpu.register(18), 0x81);
    assert!(cpu.flag(Flag::Negative));
    assert!(cpu.flag(Flag::Sign));
    assert!(!cpu.flag(Flag::Overflow));
}
