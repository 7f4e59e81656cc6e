//! Z80 validation against the SingleStepTests JSON vectors.
//!
//! Each vector gives the full register file and the touched RAM before and
//! after one instruction, plus its bus cycles (one entry per T-state) and the
//! port traffic it produces. [`run_case`] loads the initial state into a
//! fresh [`Z80`], executes one `step` and compares everything.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use zinc_core::core::{Bank, Host, InterruptLines};
use zinc_core::cpu::{CpuStateTrait, Z80, Z80State};

// --- TracingHost: port traffic recorder ---

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortOp {
    Read,
    Write,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortAccess {
    pub port: u16,
    pub data: u8,
    pub op: PortOp,
    pub cycle: i64,
}

/// Serves scripted port reads and records every port access.
#[derive(Default)]
pub struct TracingHost {
    pub input: VecDeque<u8>,
    pub accesses: Vec<PortAccess>,
}

impl TracingHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Host for TracingHost {
    fn handle_input(&mut self, cycle: i64, port: u16, _lines: &mut InterruptLines) -> u8 {
        let data = self.input.pop_front().unwrap_or(0xFF);
        self.accesses.push(PortAccess {
            port,
            data,
            op: PortOp::Read,
            cycle,
        });
        data
    }

    fn handle_output(&mut self, cycle: i64, port: u16, value: u8, _lines: &mut InterruptLines) {
        self.accesses.push(PortAccess {
            port,
            data: value,
            op: PortOp::Write,
            cycle,
        });
    }
}

// --- JSON test vector types (SingleStepTests/z80 format) ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Z80TestCase {
    pub name: String,
    pub initial: Z80CpuState,
    #[serde(rename = "final")]
    pub final_state: Z80CpuState,
    /// One entry per T-state: (address, data, activity).
    pub cycles: Vec<(Option<u16>, Option<u8>, String)>,
    /// (port, data, "r" | "w").
    #[serde(default)]
    pub ports: Vec<(u16, u8, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Z80CpuState {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
    pub h: u8,
    pub l: u8,
    pub i: u8,
    pub r: u8,
    pub ei: u8,
    pub wz: u16,
    pub ix: u16,
    pub iy: u16,
    #[serde(rename = "af_")]
    pub af_prime: u16,
    #[serde(rename = "bc_")]
    pub bc_prime: u16,
    #[serde(rename = "de_")]
    pub de_prime: u16,
    #[serde(rename = "hl_")]
    pub hl_prime: u16,
    pub im: u8,
    pub p: u8,
    pub q: u8,
    pub iff1: u8,
    pub iff2: u8,
    pub ram: Vec<(u16, u8)>,
}

impl Z80CpuState {
    /// Register part of the vector as a core snapshot (cycle counter 0).
    pub fn to_snapshot(&self) -> Z80State {
        let [a_prime, f_prime] = self.af_prime.to_be_bytes();
        let [b_prime, c_prime] = self.bc_prime.to_be_bytes();
        let [d_prime, e_prime] = self.de_prime.to_be_bytes();
        let [h_prime, l_prime] = self.hl_prime.to_be_bytes();
        Z80State {
            a: self.a,
            f: self.f,
            b: self.b,
            c: self.c,
            d: self.d,
            e: self.e,
            h: self.h,
            l: self.l,
            a_prime,
            f_prime,
            b_prime,
            c_prime,
            d_prime,
            e_prime,
            h_prime,
            l_prime,
            ix: self.ix,
            iy: self.iy,
            sp: self.sp,
            pc: self.pc,
            i: self.i,
            r: self.r,
            iff1: self.iff1 != 0,
            iff2: self.iff2 != 0,
            im: self.im,
            memptr: self.wz,
            p: self.p != 0,
            q: self.q,
            halted: false,
            ei_delay: self.ei != 0,
            cc: 0,
            ..Z80State::default()
        }
    }
}

// --- Loading ---

/// Read a vector file, transparently inflating `.gz`.
pub fn load_cases(path: &Path) -> io::Result<Vec<Z80TestCase>> {
    let mut file = BufReader::new(File::open(path)?);
    let mut json = String::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        GzDecoder::new(file).read_to_string(&mut json)?;
    } else {
        file.read_to_string(&mut json)?;
    }
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Vector files in `dir` (`.json` or `.json.gz`), sorted by name.
pub fn vector_files(dir: &Path) -> io::Result<Vec<std::path::PathBuf>> {
    let mut files: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            let name = p.file_name().unwrap_or_default().to_string_lossy();
            name.ends_with(".json") || name.ends_with(".json.gz")
        })
        .collect();
    files.sort();
    Ok(files)
}

// --- Execution ---

/// Execute one vector. Returns the first mismatch as an error message.
pub fn run_case(tc: &Z80TestCase) -> Result<(), String> {
    let mut cpu = Z80::new();
    let ram = Bank::new(0x10000);
    cpu.mem.map_ram(0, 0x10000, &ram, 0);
    cpu.restore(&tc.initial.to_snapshot());
    for &(addr, val) in &tc.initial.ram {
        ram.set(addr as usize, val);
    }

    let mut host = TracingHost::new();
    host.input = tc
        .ports
        .iter()
        .filter(|(_, _, dir)| dir.starts_with('r'))
        .map(|&(_, data, _)| data)
        .collect();

    cpu.step(&mut host);

    let got = cpu.snapshot();
    let exp = tc.final_state.to_snapshot();

    macro_rules! check {
        ($field:ident, $name:expr) => {
            if got.$field != exp.$field {
                return Err(format!(
                    "{}: {} (got {:X?} exp {:X?})",
                    tc.name, $name, got.$field, exp.$field
                ));
            }
        };
    }

    check!(a, "A");
    check!(f, "F");
    check!(b, "B");
    check!(c, "C");
    check!(d, "D");
    check!(e, "E");
    check!(h, "H");
    check!(l, "L");
    check!(i, "I");
    check!(r, "R");
    check!(ix, "IX");
    check!(iy, "IY");
    check!(sp, "SP");
    check!(pc, "PC");
    check!(memptr, "WZ");
    check!(iff1, "IFF1");
    check!(iff2, "IFF2");
    check!(im, "IM");
    check!(ei_delay, "EI");
    check!(p, "P");
    check!(q, "Q");
    check!(a_prime, "A'");
    check!(f_prime, "F'");
    check!(b_prime, "B'");
    check!(c_prime, "C'");
    check!(d_prime, "D'");
    check!(e_prime, "E'");
    check!(h_prime, "H'");
    check!(l_prime, "L'");

    for &(addr, expected) in &tc.final_state.ram {
        let actual = ram.get(addr as usize);
        if actual != expected {
            return Err(format!(
                "{}: RAM[0x{:04X}] (got 0x{:02X} exp 0x{:02X})",
                tc.name, addr, actual, expected
            ));
        }
    }

    let writes: Vec<_> = host
        .accesses
        .iter()
        .filter(|a| a.op == PortOp::Write)
        .map(|a| (a.port, a.data))
        .collect();
    let expected_writes: Vec<_> = tc
        .ports
        .iter()
        .filter(|(_, _, dir)| dir.starts_with('w'))
        .map(|&(port, data, _)| (port, data))
        .collect();
    if writes != expected_writes {
        return Err(format!(
            "{}: port writes (got {:X?} exp {:X?})",
            tc.name, writes, expected_writes
        ));
    }

    if got.cc != tc.cycles.len() as i64 {
        return Err(format!(
            "{}: cycles (got {} exp {})",
            tc.name,
            got.cc,
            tc.cycles.len()
        ));
    }

    Ok(())
}
