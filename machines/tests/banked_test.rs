use zinc_core::core::machine::Machine;
use zinc_core::cpu::z80::RunExit;
use zinc_machines::BankedSystem;
use zinc_machines::rom_loader::{RomImage, RomLoadError};

const PAGE: usize = 0x400;

#[test]
fn test_bank_switch_applies_before_next_instruction() {
    let rom = [
        0x3E, 0x01, // LD A,1
        0xD3, 0x7F, // OUT (0x7F),A
        0x3E, 0xAA, // LD A,0xAA
        0x32, 0x00, 0x40, // LD (0x4000),A
        0x3E, 0x02, // LD A,2
        0xD3, 0x7F, // OUT (0x7F),A
        0x3E, 0x55, // LD A,0x55
        0x32, 0x00, 0x40, // LD (0x4000),A
        0x76, // HALT
    ];
    let mut sys = BankedSystem::new(&rom, PAGE, 100_000);

    assert_eq!(sys.run_frame(), RunExit::CycleLimit);
    assert_eq!(sys.bank(0).get(0), 0x00);
    assert_eq!(sys.bank(1).get(0), 0xAA);
    assert_eq!(sys.bank(2).get(0), 0x55);
    assert_eq!(sys.io.selected, 2);
    assert!(sys.cpu.halted);
}

#[test]
fn test_rom_is_write_protected() {
    let rom = [
        0x3E, 0x99, // LD A,0x99
        0x32, 0x00, 0x00, // LD (0x0000),A
        0x32, 0x00, 0x80, // LD (0x8000),A
        0x76, // HALT
    ];
    let mut sys = BankedSystem::new(&rom, PAGE, 10_000);
    sys.run_frame();

    assert_eq!(sys.cpu.peek(0x0000), 0x3E);
    assert_eq!(sys.cpu.peek(0x8000), 0x99);
}

#[test]
fn test_frame_irq() {
    let mut rom = vec![0u8; 0x40];
    rom[..6].copy_from_slice(&[
        0xED, 0x56, // IM 1
        0xFB, // EI
        0x76, // HALT
        0x18, 0xFD, // JR HALT
    ]);
    rom[0x38..0x3B].copy_from_slice(&[0x04, 0xFB, 0xC9]); // INC B; EI; RET
    let mut sys = BankedSystem::new(&rom, PAGE, 1_000);
    sys.cpu.regs.set_b(0);
    sys.cpu.regs.set_sp(0x0000);

    for _ in 0..3 {
        assert_eq!(sys.run_frame(), RunExit::CycleLimit);
    }
    // Frame boundaries at 1000 and 2000 are seen by the runs that start there.
    assert_eq!(sys.io.frames, 2);
    assert_eq!(sys.io.irqs_taken, 2);
    assert_eq!(sys.cpu.regs.get_b(), 2);
    assert_eq!(sys.cycles(), 3_000);
}

#[test]
fn test_reset_restores_bank_zero() {
    let rom = [0x3E, 0x03, 0xD3, 0x7F, 0x76];
    let mut sys = BankedSystem::new(&rom, PAGE, 10_000);
    sys.run_frame();
    assert_eq!(sys.io.selected, 3);

    sys.reset();
    assert_eq!(sys.io.selected, 0);
    assert_eq!(sys.cpu.regs.get_pc(), 0);
}

#[test]
fn test_oversized_image_rejected() {
    let image = RomImage::from_bytes("big.rom", &[0u8; 0x4001]);
    let result = BankedSystem::from_image(&image, PAGE, 1_000);
    let Err(err) = result else {
        panic!("oversized image accepted");
    };
    assert!(matches!(err, RomLoadError::TooLarge { limit: 0x4000, .. }));
}
