//! Plain-data CPU snapshots.

use crate::core::NmiState;

/// Trait for CPU types that can provide state snapshots
pub trait CpuStateTrait {
    type Snapshot;
    fn snapshot(&self) -> Self::Snapshot;
}

/// Everything needed to resume a Z80 exactly where it stopped: the register
/// file, hidden latches, interrupt lines and the cycle counter. The memory map
/// belongs to the host and is not included.
#[derive(Debug, Clone, PartialEq)]
pub struct Z80State {
    // Main bank
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,

    // Shadow bank (AF', BC', DE', HL')
    pub a_prime: u8,
    pub f_prime: u8,
    pub b_prime: u8,
    pub c_prime: u8,
    pub d_prime: u8,
    pub e_prime: u8,
    pub h_prime: u8,
    pub l_prime: u8,

    pub ix: u16,
    pub iy: u16,
    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    pub r: u8,

    pub iff1: bool,
    pub iff2: bool,
    pub im: u8,
    /// WZ.
    pub memptr: u16,
    /// Set by LD A,I / LD A,R; an interrupt accepted right after clears P/V.
    pub p: bool,
    /// F if the last instruction wrote flags, else 0.
    pub q: u8,
    pub halted: bool,
    pub ei_delay: bool,

    pub cc: i64,
    pub nmi: NmiState,
    pub irq: bool,
    pub irq_data: u8,
}

impl Default for Z80State {
    /// Power-on contents, matching `Z80::new()`.
    fn default() -> Self {
        Self {
            a: 0xFF,
            f: 0xFF,
            b: 0xFF,
            c: 0xFF,
            d: 0xFF,
            e: 0xFF,
            h: 0xFF,
            l: 0xFF,
            a_prime: 0xFF,
            f_prime: 0xFF,
            b_prime: 0xFF,
            c_prime: 0xFF,
            d_prime: 0xFF,
            e_prime: 0xFF,
            h_prime: 0xFF,
            l_prime: 0xFF,
            ix: 0xFFFF,
            iy: 0xFFFF,
            sp: 0xFFFF,
            pc: 0,
            i: 0,
            r: 0,
            iff1: false,
            iff2: false,
            im: 0,
            memptr: 0,
            p: false,
            q: 0,
            halted: false,
            ei_delay: false,
            cc: 0,
            nmi: NmiState::Idle,
            irq: false,
            irq_data: 0xFF,
        }
    }
}
