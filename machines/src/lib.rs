use std::io;

use zinc_core::cpu::{CpuStateTrait, Z80};

pub mod banked;
pub mod registry;
pub mod rom_loader;
pub mod simplez80;

pub use banked::BankedSystem;
pub use simplez80::SimpleZ80System;

/// Register and interrupt state in the layout shared by every machine dump.
pub fn write_cpu_summary(cpu: &Z80, out: &mut dyn io::Write) -> io::Result<()> {
    let s = cpu.snapshot();
    writeln!(
        out,
        "PC={:04X} SP={:04X} AF={:02X}{:02X} BC={:02X}{:02X} DE={:02X}{:02X} HL={:02X}{:02X}",
        s.pc, s.sp, s.a, s.f, s.b, s.c, s.d, s.e, s.h, s.l
    )?;
    writeln!(
        out,
        "IX={:04X} IY={:04X} I={:02X} R={:02X} WZ={:04X} IM={} IFF1={} IFF2={} halted={}",
        s.ix, s.iy, s.i, s.r, s.memptr, s.im, s.iff1 as u8, s.iff2 as u8, s.halted
    )?;
    writeln!(out, "cycles={}", s.cc)
}
