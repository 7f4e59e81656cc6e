use zinc_core::cpu::z80::{RunExit, RunOptions};
mod common;
use common::{TestHost, new_cpu, run_instruction};

// ============================================================
// LDI / LDIR
// ============================================================

#[test]
fn test_ldi_flags() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_a(0x00);
    cpu.regs.set_f(0x00);
    cpu.regs.set_hl(0x4000);
    cpu.regs.set_de(0x5000);
    cpu.regs.set_bc(0x0001);
    cpu.poke(0x4000, 0x0A);
    cpu.mem.load(0, &[0xED, 0xA0]); // LDI

    assert_eq!(run_instruction(&mut cpu, &mut host), 16);
    assert_eq!(cpu.peek(0x5000), 0x0A);
    assert_eq!(cpu.regs.get_hl(), 0x4001);
    assert_eq!(cpu.regs.get_de(), 0x5001);
    assert_eq!(cpu.regs.get_bc(), 0x0000);
    // X = bit 3 and Y = bit 1 of (value + A); PV clear since BC reached 0
    assert_eq!(cpu.regs.get_f(), 0x28);
}

#[test]
fn test_ldir_iterations() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_hl(0x4000);
    cpu.regs.set_de(0x5000);
    cpu.regs.set_bc(0x0003);
    cpu.mem.load(0x4000, &[0x11, 0x22, 0x33]);
    cpu.mem.load(0, &[0xED, 0xB0]); // LDIR

    assert_eq!(run_instruction(&mut cpu, &mut host), 21);
    assert_eq!(cpu.regs.get_pc(), 0x0000, "repeats by rewinding PC");
    assert_eq!(cpu.memptr, 0x0001);
    assert_eq!(run_instruction(&mut cpu, &mut host), 21);
    assert_eq!(run_instruction(&mut cpu, &mut host), 16);
    assert_eq!(cpu.regs.get_pc(), 0x0002);
    assert_eq!(cpu.mem.read_block(0x5000, 3), vec![0x11, 0x22, 0x33]);
    assert_eq!(cpu.regs.get_f() & 0x04, 0);
}

#[test]
fn test_ldir_is_interruptible_between_iterations() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_hl(0x4000);
    cpu.regs.set_de(0x5000);
    cpu.regs.set_bc(0x0010);
    cpu.regs.set_sp(0x8000);
    cpu.mem.load(0x0100, &[0xED, 0xB0]);
    cpu.regs.set_pc(0x0100);
    cpu.iff1 = true;
    cpu.im = 1;

    run_instruction(&mut cpu, &mut host);
    cpu.set_irq(true);
    run_instruction(&mut cpu, &mut host);
    assert_eq!(cpu.regs.get_pc(), 0x0038);
    assert_eq!(cpu.mem.peek16(0x7FFE), 0x0100, "returns to the LDIR");
    assert_eq!(cpu.regs.get_bc(), 0x000F);
}

#[test]
fn test_lddr() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_hl(0x4002);
    cpu.regs.set_de(0x5002);
    cpu.regs.set_bc(0x0003);
    cpu.mem.load(0x4000, &[0xAA, 0xBB, 0xCC]);
    cpu.mem.load(0, &[0xED, 0xB8, 0x76]); // LDDR; HALT

    let exit = cpu.run(&mut host, 1000, RunOptions::until_halt());
    assert_eq!(exit, RunExit::Halted);
    assert_eq!(cpu.mem.read_block(0x5000, 3), vec![0xAA, 0xBB, 0xCC]);
    assert_eq!(cpu.regs.get_hl(), 0x3FFF);
    assert_eq!(cpu.cc, 21 + 21 + 16 + 4);
}

// ============================================================
// CPI / CPIR
// ============================================================

#[test]
fn test_cpir_finds_byte() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_a(0x42);
    cpu.regs.set_f(0x01);
    cpu.regs.set_hl(0x4000);
    cpu.regs.set_bc(0x0003);
    cpu.mem.load(0x4000, &[0x10, 0x42, 0x30]);
    cpu.mem.load(0, &[0xED, 0xB1]); // CPIR

    assert_eq!(run_instruction(&mut cpu, &mut host), 21);
    assert_eq!(run_instruction(&mut cpu, &mut host), 16);
    assert_eq!(cpu.regs.get_hl(), 0x4002);
    assert_eq!(cpu.regs.get_bc(), 0x0001);
    let f = cpu.regs.get_f();
    assert_ne!(f & 0x40, 0, "Z: match found");
    assert_ne!(f & 0x04, 0, "PV: BC != 0");
    assert_ne!(f & 0x02, 0, "N set");
    assert_ne!(f & 0x01, 0, "C preserved");
}

#[test]
fn test_cpd_no_match() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_a(0x10);
    cpu.regs.set_hl(0x4000);
    cpu.regs.set_bc(0x0001);
    cpu.poke(0x4000, 0x20);
    cpu.mem.load(0, &[0xED, 0xA9]); // CPD

    assert_eq!(run_instruction(&mut cpu, &mut host), 16);
    assert_eq!(cpu.regs.get_hl(), 0x3FFF);
    let f = cpu.regs.get_f();
    assert_eq!(f & (0x40 | 0x04), 0);
    assert_ne!(f & 0x80, 0, "0x10 - 0x20 is negative");
}

// ============================================================
// Block I/O
// ============================================================

#[test]
fn test_ini() {
    let mut cpu = new_cpu();
    let mut host = TestHost::with_input(&[0xAA]);
    cpu.regs.set_bc(0x0210);
    cpu.regs.set_hl(0x6000);
    cpu.mem.load(0, &[0xED, 0xA2]); // INI

    assert_eq!(run_instruction(&mut cpu, &mut host), 16);
    assert_eq!(host.reads, vec![(13, 0x0210)]);
    assert_eq!(cpu.peek(0x6000), 0xAA);
    assert_eq!(cpu.regs.get_b(), 0x01);
    assert_eq!(cpu.regs.get_hl(), 0x6001);
    assert_eq!(cpu.memptr, 0x0211);
    assert_eq!(cpu.regs.get_f(), 0x02, "N from bit 7 of the input byte");
}

#[test]
fn test_otir() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_bc(0x0220);
    cpu.regs.set_hl(0x7000);
    cpu.mem.load(0x7000, &[0x01, 0x02]);
    cpu.mem.load(0, &[0xED, 0xB3]); // OTIR

    assert_eq!(run_instruction(&mut cpu, &mut host), 21);
    assert_eq!(run_instruction(&mut cpu, &mut host), 16);
    // B is decremented before it reaches the address bus
    assert_eq!(host.writes, vec![(16, 0x0120, 0x01), (37, 0x0020, 0x02)]);
    assert_eq!(cpu.regs.get_b(), 0);
    assert_ne!(cpu.regs.get_f() & 0x40, 0);
}

// ============================================================
// RLD / RRD
// ============================================================

#[test]
fn test_rld() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_a(0x7A);
    cpu.regs.set_hl(0x5000);
    cpu.poke(0x5000, 0x31);
    cpu.mem.load(0, &[0xED, 0x6F]);

    assert_eq!(run_instruction(&mut cpu, &mut host), 18);
    assert_eq!(cpu.peek(0x5000), 0x1A);
    assert_eq!(cpu.regs.get_a(), 0x73);
    assert_eq!(cpu.memptr, 0x5001);
}

#[test]
fn test_rrd() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_a(0x84);
    cpu.regs.set_hl(0x5000);
    cpu.poke(0x5000, 0x20);
    cpu.mem.load(0, &[0xED, 0x67]);

    assert_eq!(run_instruction(&mut cpu, &mut host), 18);
    assert_eq!(cpu.peek(0x5000), 0x42);
    assert_eq!(cpu.regs.get_a(), 0x80);
    assert_ne!(cpu.regs.get_f() & 0x80, 0);
}
