mod common;
use common::{TestHost, new_cpu, run_instruction};

#[test]
fn test_ld_r_r() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_c(0x5A);
    cpu.mem.load(0, &[0x41, 0x78]); // LD B,C; LD A,B

    assert_eq!(run_instruction(&mut cpu, &mut host), 4);
    assert_eq!(run_instruction(&mut cpu, &mut host), 4);
    assert_eq!(cpu.regs.get_b(), 0x5A);
    assert_eq!(cpu.regs.get_a(), 0x5A);
}

#[test]
fn test_ld_r_hl_and_hl_r() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_hl(0x4000);
    cpu.poke(0x4000, 0x99);
    cpu.regs.set_e(0x11);
    cpu.mem.load(0, &[0x56, 0x73]); // LD D,(HL); LD (HL),E

    assert_eq!(run_instruction(&mut cpu, &mut host), 7);
    assert_eq!(cpu.regs.get_d(), 0x99);
    assert_eq!(run_instruction(&mut cpu, &mut host), 7);
    assert_eq!(cpu.peek(0x4000), 0x11);
}

#[test]
fn test_ld_hl_n() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_hl(0x4000);
    cpu.mem.load(0, &[0x36, 0xAB]); // LD (HL),0xAB

    assert_eq!(run_instruction(&mut cpu, &mut host), 10);
    assert_eq!(cpu.peek(0x4000), 0xAB);
    assert_eq!(cpu.regs.get_pc(), 2);
}

#[test]
fn test_ld_rr_nn() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    let program = [
        0x01, 0x34, 0x12, // LD BC,0x1234
        0x11, 0x78, 0x56, // LD DE,0x5678
        0x21, 0xBC, 0x9A, // LD HL,0x9ABC
        0x31, 0xF0, 0xDE, // LD SP,0xDEF0
    ];
    cpu.mem.load(0, &program);

    for _ in 0..4 {
        assert_eq!(run_instruction(&mut cpu, &mut host), 10);
    }
    assert_eq!(cpu.regs.get_bc(), 0x1234);
    assert_eq!(cpu.regs.get_de(), 0x5678);
    assert_eq!(cpu.regs.get_hl(), 0x9ABC);
    assert_eq!(cpu.regs.get_sp(), 0xDEF0);
}

#[test]
fn test_ld_bc_a_memptr() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_a(0x42);
    cpu.regs.set_bc(0x40FF);
    cpu.mem.load(0, &[0x02]); // LD (BC),A

    assert_eq!(run_instruction(&mut cpu, &mut host), 7);
    assert_eq!(cpu.peek(0x40FF), 0x42);
    // MEMPTR = A:(BC+1) low byte
    assert_eq!(cpu.memptr, 0x4200);
}

#[test]
fn test_ld_a_de() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_de(0x3000);
    cpu.poke(0x3000, 0x77);
    cpu.mem.load(0, &[0x1A]); // LD A,(DE)

    assert_eq!(run_instruction(&mut cpu, &mut host), 7);
    assert_eq!(cpu.regs.get_a(), 0x77);
    assert_eq!(cpu.memptr, 0x3001);
}

#[test]
fn test_ld_nn_a_and_a_nn() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_a(0x5C);
    // LD (0x8000),A; LD A,(0x8001)
    cpu.mem.load(0, &[0x32, 0x00, 0x80, 0x3A, 0x01, 0x80]);
    cpu.poke(0x8001, 0x3D);

    assert_eq!(run_instruction(&mut cpu, &mut host), 13);
    assert_eq!(cpu.peek(0x8000), 0x5C);
    assert_eq!(run_instruction(&mut cpu, &mut host), 13);
    assert_eq!(cpu.regs.get_a(), 0x3D);
    assert_eq!(cpu.memptr, 0x8002);
}

#[test]
fn test_ld_nn_hl_and_hl_nn() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_hl(0xBEEF);
    // LD (0x9000),HL; LD HL,(0x9100)
    cpu.mem.load(0, &[0x22, 0x00, 0x90, 0x2A, 0x00, 0x91]);
    cpu.mem.poke16(0x9100, 0x1357);

    assert_eq!(run_instruction(&mut cpu, &mut host), 16);
    assert_eq!(cpu.peek(0x9000), 0xEF);
    assert_eq!(cpu.peek(0x9001), 0xBE);
    assert_eq!(run_instruction(&mut cpu, &mut host), 16);
    assert_eq!(cpu.regs.get_hl(), 0x1357);
}

#[test]
fn test_word_access_wraps_address_space() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_hl(0x1234);
    cpu.mem.load(0, &[0x22, 0xFF, 0xFF]); // LD (0xFFFF),HL

    run_instruction(&mut cpu, &mut host);
    assert_eq!(cpu.peek(0xFFFF), 0x34);
    assert_eq!(cpu.peek(0x0000), 0x12, "high byte wraps to 0x0000");
}

#[test]
fn test_exchanges() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_af(0x1122);
    cpu.regs.set_bc(0x3344);
    cpu.regs.set_de(0x5566);
    cpu.regs.set_hl(0x7788);
    cpu.mem.load(0, &[0xEB, 0x08, 0xD9]); // EX DE,HL; EX AF,AF'; EXX

    run_instruction(&mut cpu, &mut host);
    assert_eq!(cpu.regs.get_de(), 0x7788);
    assert_eq!(cpu.regs.get_hl(), 0x5566);

    run_instruction(&mut cpu, &mut host);
    assert_eq!(cpu.regs.get_af(), 0xFFFF);
    run_instruction(&mut cpu, &mut host);
    assert_eq!(cpu.regs.get_bc(), 0xFFFF);
    assert_eq!(cpu.regs.get_de(), 0xFFFF);
    assert_eq!(cpu.regs.get_hl(), 0xFFFF);
    assert_eq!(cpu.cc, 12);

    // Swapping back restores the originals
    cpu.regs.exchange_af();
    cpu.regs.exchange_main();
    assert_eq!(cpu.regs.get_af(), 0x1122);
    assert_eq!(cpu.regs.get_bc(), 0x3344);
    assert_eq!(cpu.regs.get_hl(), 0x5566);
}

#[test]
fn test_ld_sp_hl() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_hl(0x4321);
    cpu.mem.load(0, &[0xF9]);

    assert_eq!(run_instruction(&mut cpu, &mut host), 6);
    assert_eq!(cpu.regs.get_sp(), 0x4321);
}

#[test]
fn test_in_a_n() {
    let mut cpu = new_cpu();
    let mut host = TestHost::with_input(&[0x9C]);
    cpu.regs.set_a(0x12);
    cpu.regs.set_f(0x00);
    cpu.mem.load(0, &[0xDB, 0x34]); // IN A,(0x34)

    assert_eq!(run_instruction(&mut cpu, &mut host), 11);
    assert_eq!(cpu.regs.get_a(), 0x9C);
    assert_eq!(cpu.regs.get_f(), 0x00, "IN A,(n) leaves flags alone");
    // Port read happens at the end of the 4 T I/O cycle
    assert_eq!(host.reads, vec![(11, 0x1234)]);
}

#[test]
fn test_out_n_a() {
    let mut cpu = new_cpu();
    let mut host = TestHost::new();
    cpu.regs.set_a(0x55);
    cpu.mem.load(0, &[0xD3, 0x10]); // OUT (0x10),A

    assert_eq!(run_instruction(&mut cpu, &mut host), 11);
    assert_eq!(host.writes, vec![(11, 0x5510, 0x55)]);
    assert_eq!(cpu.memptr, 0x5511);
}
