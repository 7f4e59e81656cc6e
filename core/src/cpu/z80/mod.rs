mod alu;
mod bit;
mod block;
mod branch;
pub mod flags;
mod interrupt;
mod load_store;
pub mod registers;
mod stack;

pub use registers::{ByteOrder, Pair, RegisterFile};

use tracing::debug;

use crate::core::{Host, InterruptLines, memory::MemoryPager};
use crate::cpu::state::{CpuStateTrait, Z80State};

#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum Flag {
    C = 0x01,  // Carry
    N = 0x02,  // Add/Subtract
    PV = 0x04, // Parity/Overflow
    X = 0x08,  // Unused (copy of bit 3)
    H = 0x10,  // Half Carry
    Y = 0x20,  // Unused (copy of bit 5)
    Z = 0x40,  // Zero
    S = 0x80,  // Sign
}

pub struct Z80 {
    pub regs: RegisterFile,
    pub mem: MemoryPager,
    pub lines: InterruptLines,
    /// Cycle counter (T-states).
    pub cc: i64,

    // Interrupt state
    pub iff1: bool,
    pub iff2: bool,
    pub im: u8,
    pub halted: bool,
    pub ei_delay: bool,

    // Internal state
    pub memptr: u16, // Hidden WZ register
    pub p: bool,     // Set after LD A,I / LD A,R for interrupt PV behavior
    pub q: u8,       // Copy of F when instruction modifies flags, 0 otherwise (for SCF/CCF X/Y)
    pub(crate) prev_q: u8,

    // Prefix handling
    pub(crate) index_mode: IndexMode,

    pub(crate) next_update: i64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IndexMode {
    HL,
    IX,
    IY,
}

/// Extra stop conditions for [`Z80::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Return after this many instructions (HALT idle steps count as NOPs).
    pub max_instructions: Option<u64>,
    /// Return as soon as the CPU is halted.
    pub stop_on_halt: bool,
}

impl RunOptions {
    pub fn instructions(count: u64) -> Self {
        Self {
            max_instructions: Some(count),
            ..Self::default()
        }
    }

    pub fn until_halt() -> Self {
        Self {
            stop_on_halt: true,
            ..Self::default()
        }
    }
}

/// Why [`Z80::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunExit {
    /// The cycle counter reached `cc_exit`.
    CycleLimit,
    /// `RunOptions::max_instructions` instructions were executed.
    InstructionLimit,
    /// The CPU is halted and `RunOptions::stop_on_halt` was set.
    Halted,
    /// A host callback called `InterruptLines::request_stop`.
    Stopped,
}

impl Default for Z80 {
    fn default() -> Self {
        Self::new()
    }
}

impl Z80 {
    pub fn new() -> Self {
        Self::with_memory(MemoryPager::default())
    }

    /// CPU with a page table of the given granularity.
    pub fn with_page_size(page_size: usize) -> Self {
        Self::with_memory(MemoryPager::new(page_size))
    }

    pub fn with_memory(mem: MemoryPager) -> Self {
        Self {
            regs: RegisterFile::new(),
            mem,
            lines: InterruptLines::default(),
            cc: 0,
            iff1: false,
            iff2: false,
            im: 0,
            halted: false,
            ei_delay: false,
            memptr: 0,
            p: false,
            q: 0,
            prev_q: 0,
            index_mode: IndexMode::HL,
            next_update: 0,
        }
    }

    // --- Host controls ---

    pub fn set_nmi(&mut self) {
        self.lines.set_nmi();
    }

    pub fn clear_nmi(&mut self) {
        self.lines.clear_nmi();
    }

    pub fn set_irq(&mut self, asserted: bool) {
        self.lines.set_irq(asserted);
    }

    pub fn peek(&self, addr: u16) -> u8 {
        self.mem.peek(addr)
    }

    pub fn poke(&self, addr: u16, value: u8) {
        self.mem.poke(addr, value);
    }

    // --- Flags ---

    #[inline]
    pub(crate) fn flags(&self) -> u8 {
        self.regs.get_f()
    }

    /// Write F from an instruction that computes flags (tracked in Q).
    #[inline]
    pub(crate) fn set_flags(&mut self, f: u8) {
        self.regs.set_f(f);
        self.q = f;
    }

    #[inline]
    pub(crate) fn flag(&self, flag: Flag) -> bool {
        self.flags() & flag as u8 != 0
    }

    // --- Bus access with cycle accounting ---
    // Each helper charges its T-states before the access becomes visible.

    /// M1 opcode fetch: 4 T, refresh counter bumped.
    pub(crate) fn fetch_opcode(&mut self) -> u8 {
        self.cc += 4;
        let pc = self.regs.get_pc();
        let op = self.mem.peek(pc);
        self.regs.set_pc(pc.wrapping_add(1));
        self.regs.refresh();
        op
    }

    /// Memory read cycle: 3 T.
    #[inline]
    pub(crate) fn read_byte(&mut self, addr: u16) -> u8 {
        self.cc += 3;
        self.mem.peek(addr)
    }

    /// Memory write cycle: 3 T.
    #[inline]
    pub(crate) fn write_byte(&mut self, addr: u16, value: u8) {
        self.cc += 3;
        self.mem.poke(addr, value);
    }

    /// Internal (no bus) cycles.
    #[inline]
    pub(crate) fn internal(&mut self, cycles: i64) {
        self.cc += cycles;
    }

    pub(crate) fn read_imm(&mut self) -> u8 {
        let pc = self.regs.get_pc();
        let val = self.read_byte(pc);
        self.regs.set_pc(pc.wrapping_add(1));
        val
    }

    pub(crate) fn read_imm16(&mut self) -> u16 {
        let low = self.read_imm();
        let high = self.read_imm();
        u16::from_le_bytes([low, high])
    }

    pub(crate) fn read_word(&mut self, addr: u16) -> u16 {
        let low = self.read_byte(addr);
        let high = self.read_byte(addr.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    pub(crate) fn write_word(&mut self, addr: u16, val: u16) {
        let [low, high] = val.to_le_bytes();
        self.write_byte(addr, low);
        self.write_byte(addr.wrapping_add(1), high);
    }

    /// I/O read cycle: 4 T, then the host supplies the byte.
    pub(crate) fn port_in<H: Host + ?Sized>(&mut self, host: &mut H, port: u16) -> u8 {
        self.cc += 4;
        host.handle_input(self.cc, port, &mut self.lines)
    }

    /// I/O write cycle: 4 T, then the host sees the byte.
    pub(crate) fn port_out<H: Host + ?Sized>(&mut self, host: &mut H, port: u16, value: u8) {
        self.cc += 4;
        host.handle_output(self.cc, port, value, &mut self.lines);
    }

    // --- Register helpers ---

    /// Get 8-bit register by index (0=B 1=C 2=D 3=E 4=H 5=L 7=A).
    /// Index 6 is NOT handled here: callers must handle (HL)/(IX+d)/(IY+d) separately.
    pub fn get_reg8(&self, index: u8) -> u8 {
        match index {
            0 => self.regs.get_b(),
            1 => self.regs.get_c(),
            2 => self.regs.get_d(),
            3 => self.regs.get_e(),
            4 => self.regs.get_h(),
            5 => self.regs.get_l(),
            7 => self.regs.get_a(),
            _ => unreachable!("get_reg8 called with index {}", index),
        }
    }

    pub fn set_reg8(&mut self, index: u8, val: u8) {
        match index {
            0 => self.regs.set_b(val),
            1 => self.regs.set_c(val),
            2 => self.regs.set_d(val),
            3 => self.regs.set_e(val),
            4 => self.regs.set_h(val),
            5 => self.regs.set_l(val),
            7 => self.regs.set_a(val),
            _ => unreachable!("set_reg8 called with index {}", index),
        }
    }

    /// Get 8-bit register by index, respecting IX/IY prefix for H/L (undocumented IXH/IXL/IYH/IYL).
    pub fn get_reg8_ix(&self, index: u8) -> u8 {
        match (index, self.index_mode) {
            (4, IndexMode::IX) => self.regs.high(Pair::IX),
            (5, IndexMode::IX) => self.regs.low(Pair::IX),
            (4, IndexMode::IY) => self.regs.high(Pair::IY),
            (5, IndexMode::IY) => self.regs.low(Pair::IY),
            _ => self.get_reg8(index),
        }
    }

    pub fn set_reg8_ix(&mut self, index: u8, val: u8) {
        match (index, self.index_mode) {
            (4, IndexMode::IX) => self.regs.set_high(Pair::IX, val),
            (5, IndexMode::IX) => self.regs.set_low(Pair::IX, val),
            (4, IndexMode::IY) => self.regs.set_high(Pair::IY, val),
            (5, IndexMode::IY) => self.regs.set_low(Pair::IY, val),
            _ => self.set_reg8(index, val),
        }
    }

    /// HL, IX or IY depending on the active prefix.
    pub(crate) fn index_pair(&self) -> Pair {
        match self.index_mode {
            IndexMode::HL => Pair::HL,
            IndexMode::IX => Pair::IX,
            IndexMode::IY => Pair::IY,
        }
    }

    /// Get 16-bit register pair by index (0=BC, 1=DE, 2=HL/IX/IY, 3=SP).
    pub(crate) fn get_rp(&self, index: u8) -> u16 {
        match index {
            0 => self.regs.get_bc(),
            1 => self.regs.get_de(),
            2 => self.regs.pair(self.index_pair()),
            3 => self.regs.get_sp(),
            _ => unreachable!("get_rp called with index {}", index),
        }
    }

    pub(crate) fn set_rp(&mut self, index: u8, val: u16) {
        match index {
            0 => self.regs.set_bc(val),
            1 => self.regs.set_de(val),
            2 => self.regs.set_pair(self.index_pair(), val),
            3 => self.regs.set_sp(val),
            _ => unreachable!("set_rp called with index {}", index),
        }
    }

    /// Get 16-bit register pair by index for PUSH/POP (0=BC, 1=DE, 2=HL/IX/IY, 3=AF).
    pub(crate) fn get_rp_af(&self, index: u8) -> u16 {
        match index {
            3 => self.regs.get_af(),
            _ => self.get_rp(index),
        }
    }

    pub(crate) fn set_rp_af(&mut self, index: u8, val: u16) {
        match index {
            3 => self.regs.set_af(val),
            _ => self.set_rp(index, val),
        }
    }

    /// Effective address of the (HL) / (IX+d) / (IY+d) operand.
    /// Indexed forms read the displacement (3 T) and add 5 T of address arithmetic.
    pub(crate) fn operand_addr(&mut self) -> u16 {
        if self.index_mode == IndexMode::HL {
            return self.regs.get_hl();
        }
        let base = self.regs.pair(self.index_pair());
        let disp = self.read_imm() as i8;
        self.internal(5);
        let addr = base.wrapping_add(disp as i16 as u16);
        self.memptr = addr;
        addr
    }

    // --- Execution ---

    /// Run until `cc_exit` is reached or another stop condition fires.
    pub fn run<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        cc_exit: i64,
        options: RunOptions,
    ) -> RunExit {
        self.next_update = host.handle_update(self.cc, cc_exit, &mut self.lines);
        let mut executed: u64 = 0;

        let exit = loop {
            if self.lines.take_stop() {
                break RunExit::Stopped;
            }
            if self.cc >= cc_exit {
                break RunExit::CycleLimit;
            }
            if options.max_instructions.is_some_and(|max| executed >= max) {
                break RunExit::InstructionLimit;
            }
            if self.cc >= self.next_update {
                self.next_update = host.handle_update(self.cc, cc_exit, &mut self.lines);
                if self.lines.take_stop() {
                    break RunExit::Stopped;
                }
            }

            if self.service_interrupt(host) {
                continue;
            }

            if self.halted {
                if options.stop_on_halt {
                    break RunExit::Halted;
                }
                if options.max_instructions.is_some() {
                    self.idle_until(self.cc + 4);
                    executed += 1;
                } else {
                    // Nothing can wake the CPU before the host's next event,
                    // and interrupts are only sampled at NOP boundaries.
                    let nops = ((self.next_update - self.cc).max(4) + 3) / 4;
                    self.idle_until(cc_exit.min(self.cc + 4 * nops));
                }
                continue;
            }

            self.execute_instruction(host);
            executed += 1;
        };

        debug!(?exit, cc = self.cc, executed, "run returned");
        exit
    }

    /// Execute exactly one instruction, interrupt response, or HALT idle step.
    /// Does not call `Host::handle_update`.
    pub fn step<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.service_interrupt(host) {
            return;
        }
        if self.halted {
            self.idle_until(self.cc + 4);
            return;
        }
        self.execute_instruction(host);
    }

    /// Advance a halted CPU to `target`, one 4 T NOP per refresh.
    fn idle_until(&mut self, target: i64) {
        let steps = (target - self.cc + 3) / 4;
        self.regs.refresh_by((steps % 128) as u32);
        self.cc = target;
    }

    /// Fetch, decode and execute one complete instruction, prefixes included.
    fn execute_instruction<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.index_mode = IndexMode::HL;
        self.p = false;
        self.prev_q = self.q;
        self.q = 0;

        let mut opcode = self.fetch_opcode();
        // DD/FD chains: only the last prefix counts.
        while opcode == 0xDD || opcode == 0xFD {
            self.index_mode = if opcode == 0xDD {
                IndexMode::IX
            } else {
                IndexMode::IY
            };
            opcode = self.fetch_opcode();
        }
        self.execute_main(opcode, host);
    }

    /// Unprefixed (or DD/FD-modified) opcode dispatch.
    fn execute_main<H: Host + ?Sized>(&mut self, opcode: u8, host: &mut H) {
        match opcode {
            // NOP: 4 T
            0x00 => {}

            // HALT: 4 T. PC is held on the HALT opcode until an interrupt.
            0x76 => {
                self.halted = true;
                self.regs.set_pc(self.regs.get_pc().wrapping_sub(1));
                host.on_halt(self.cc);
            }

            // Prefixes
            0xCB => {
                if self.index_mode == IndexMode::HL {
                    let op = self.fetch_opcode();
                    self.execute_instruction_cb(op);
                } else {
                    self.execute_instruction_index_cb();
                }
            }
            0xED => {
                self.index_mode = IndexMode::HL;
                let op = self.fetch_opcode();
                self.execute_instruction_ed(op, host);
            }

            // --- Load/Store ---

            // LD (BC), A: 7 T
            0x02 => self.op_ld_rp_a(0),
            // LD (DE), A: 7 T
            0x12 => self.op_ld_rp_a(1),
            // LD (nn), HL: 16 T
            0x22 => self.op_ld_nn_hl(),
            // LD (nn), A: 13 T
            0x32 => self.op_ld_nn_a(),

            // EX AF, AF': 4 T
            0x08 => self.regs.exchange_af(),

            // LD A, (BC): 7 T
            0x0A => self.op_ld_a_rp(0),
            // LD A, (DE): 7 T
            0x1A => self.op_ld_a_rp(1),
            // LD HL, (nn): 16 T
            0x2A => self.op_ld_hl_nn_ind(),
            // LD A, (nn): 13 T
            0x3A => self.op_ld_a_nn(),

            // LD rr, nn (0x01/0x11/0x21/0x31): 10 T
            op if (op & 0xCF) == 0x01 => self.op_ld_rr_nn(op),

            // LD r, n (0x06, 0x0E, ... 0x3E): 7 T
            op if (op & 0xC7) == 0x06 => self.op_ld_r_n(op),

            // LD r, r' (0x40-0x7F excluding 0x76): 4/7 T
            op if (op & 0xC0) == 0x40 => self.op_ld_r_r(op),

            // LD SP, HL: 6 T
            0xF9 => {
                self.internal(2);
                self.regs.set_sp(self.get_rp(2));
            }

            // EX DE, HL: 4 T (never affected by DD/FD)
            0xEB => self.regs.swap(Pair::DE, Pair::HL),
            // EXX: 4 T
            0xD9 => self.regs.exchange_main(),
            // EX (SP), HL: 19 T
            0xE3 => self.op_ex_sp_hl(),

            // IN A,(n): 11 T
            0xDB => self.op_in_a_n(host),
            // OUT (n),A: 11 T
            0xD3 => self.op_out_n_a(host),

            // --- Stack ---

            // PUSH rr (0xC5/D5/E5/F5): 11 T
            op if (op & 0xCF) == 0xC5 => self.op_push(op),
            // POP rr (0xC1/D1/E1/F1): 10 T
            op if (op & 0xCF) == 0xC1 => self.op_pop(op),

            // --- ALU ---

            // ALU A, r (0x80 - 0xBF): 4 T (reg) or 7 T ((HL))
            op if (op & 0xC0) == 0x80 => self.op_alu_r(op),
            // ALU A, n (0xC6, 0xCE, ... 0xFE): 7 T
            op if (op & 0xC7) == 0xC6 => self.op_alu_n(op),

            // INC/DEC r: 4 T (reg) or 11 T ((HL))
            op if (op & 0xC6) == 0x04 => self.op_inc_dec_r(op),

            // ADD HL,rr (0x09/0x19/0x29/0x39): 11 T
            op if (op & 0xCF) == 0x09 => self.op_add_hl_rr(op),
            // INC rr / DEC rr: 6 T
            op if (op & 0xC7) == 0x03 => self.op_inc_dec_rr(op),

            // Accumulator rotates: 4 T
            0x07 | 0x0F | 0x17 | 0x1F => self.op_rotate_a(opcode),

            // Misc ALU: 4 T
            0x27 => self.op_daa(),
            0x2F => self.op_cpl(),
            0x37 => self.op_scf(),
            0x3F => self.op_ccf(),

            // --- Branch/Control Flow ---

            // JP nn: 10 T
            0xC3 => self.op_jp_nn(),
            // JP (HL): 4 T
            0xE9 => self.regs.set_pc(self.get_rp(2)),
            // JR e: 12 T
            0x18 => self.op_jr_e(),
            // DJNZ e: 13/8 T
            0x10 => self.op_djnz(),
            // CALL nn: 17 T
            0xCD => self.op_call_nn(),
            // RET: 10 T
            0xC9 => self.op_ret(),

            // DI: 4 T
            0xF3 => self.op_di(),
            // EI: 4 T
            0xFB => self.op_ei(),

            // JP cc,nn: 10 T
            op if (op & 0xC7) == 0xC2 => self.op_jp_cc_nn(op),
            // JR cc,e: 12/7 T (NZ/Z/NC/C only)
            op if (op & 0xE7) == 0x20 => self.op_jr_cc_e(op),
            // CALL cc,nn: 17/10 T
            op if (op & 0xC7) == 0xC4 => self.op_call_cc_nn(op),
            // RET cc: 11/5 T
            op if (op & 0xC7) == 0xC0 => self.op_ret_cc(op),
            // RST p: 11 T
            op if (op & 0xC7) == 0xC7 => self.op_rst(op),

            _ => unreachable!("unhandled opcode {:#04X}", opcode),
        }
    }

    /// ED prefix dispatch. Every ED opcode costs at least 8 T (two M1 cycles).
    fn execute_instruction_ed<H: Host + ?Sized>(&mut self, opcode: u8, host: &mut H) {
        match opcode {
            // --- Specific ED opcodes (low 3 bits = 111) ---
            0x47 => self.op_ld_i_a(),        // LD I,A: 9T
            0x4F => self.op_ld_r_a(),        // LD R,A: 9T
            0x57 => self.op_ld_a_i(),        // LD A,I: 9T
            0x5F => self.op_ld_a_r(),        // LD A,R: 9T
            0x67 => self.op_rrd(),           // RRD: 18T
            0x6F => self.op_rld(),           // RLD: 18T

            // --- Block transfer/compare ---
            0xA0 | 0xA8 | 0xB0 | 0xB8 => self.op_ldi_ldd(opcode),          // LDI/LDD/LDIR/LDDR
            0xA1 | 0xA9 | 0xB1 | 0xB9 => self.op_cpi_cpd(opcode),          // CPI/CPD/CPIR/CPDR
            0xA2 | 0xAA | 0xB2 | 0xBA => self.op_ini_ind(opcode, host),    // INI/IND/INIR/INDR
            0xA3 | 0xAB | 0xB3 | 0xBB => self.op_outi_outd(opcode, host),  // OUTI/OUTD/OTIR/OTDR

            // --- Pattern-based (40-7F range) ---
            op if (op & 0xC7) == 0x40 => self.op_in_r_c(op, host),  // IN r,(C): 12T
            op if (op & 0xC7) == 0x41 => self.op_out_c_r(op, host), // OUT (C),r: 12T
            op if (op & 0xCF) == 0x42 => self.op_sbc_hl_rr(op),     // SBC HL,rr: 15T
            op if (op & 0xCF) == 0x43 => self.op_ld_nn_rr_ed(op),   // LD (nn),rr: 20T
            op if (op & 0xC7) == 0x44 => self.op_neg(),             // NEG: 8T
            op if (op & 0xC7) == 0x45 => self.op_retn(op, host),    // RETN/RETI: 14T
            op if (op & 0xC7) == 0x46 => self.op_im(op),            // IM 0/1/2: 8T
            op if (op & 0xCF) == 0x4A => self.op_adc_hl_rr(op),     // ADC HL,rr: 15T
            op if (op & 0xCF) == 0x4B => self.op_ld_rr_nn_ed(op),   // LD rr,(nn): 20T

            // ED NOP: 8T: undefined opcodes act as NOP
            _ => {}
        }
    }

    /// Power-on/RESET line: PC, I, R cleared, interrupts disabled, IM 0.
    /// The cycle counter and memory map are left alone.
    pub fn reset(&mut self) {
        self.regs.set_pc(0x0000);
        self.regs.set_i(0);
        self.regs.set_r(0);
        self.regs.set_af(0xFFFF);
        self.regs.set_sp(0xFFFF);
        self.iff1 = false;
        self.iff2 = false;
        self.im = 0;
        self.halted = false;
        self.ei_delay = false;
        self.memptr = 0;
        self.p = false;
        self.q = 0;
        self.prev_q = 0;
        self.index_mode = IndexMode::HL;
        self.lines = InterruptLines::default();
    }

    /// Load a previously captured snapshot (registers, cycle counter and
    /// interrupt state). The memory map is not part of the snapshot.
    pub fn restore(&mut self, s: &Z80State) {
        self.regs.set_af(u16::from_be_bytes([s.a, s.f]));
        self.regs.set_bc(u16::from_be_bytes([s.b, s.c]));
        self.regs.set_de(u16::from_be_bytes([s.d, s.e]));
        self.regs.set_hl(u16::from_be_bytes([s.h, s.l]));
        self.regs.set_pair(Pair::AF2, u16::from_be_bytes([s.a_prime, s.f_prime]));
        self.regs.set_pair(Pair::BC2, u16::from_be_bytes([s.b_prime, s.c_prime]));
        self.regs.set_pair(Pair::DE2, u16::from_be_bytes([s.d_prime, s.e_prime]));
        self.regs.set_pair(Pair::HL2, u16::from_be_bytes([s.h_prime, s.l_prime]));
        self.regs.set_ix(s.ix);
        self.regs.set_iy(s.iy);
        self.regs.set_sp(s.sp);
        self.regs.set_pc(s.pc);
        self.regs.set_i(s.i);
        self.regs.set_r(s.r);
        self.iff1 = s.iff1;
        self.iff2 = s.iff2;
        self.im = s.im;
        self.memptr = s.memptr;
        self.p = s.p;
        self.q = s.q;
        self.halted = s.halted;
        self.ei_delay = s.ei_delay;
        self.cc = s.cc;
        self.lines.nmi = s.nmi;
        self.lines.irq = s.irq;
        self.lines.irq_data = s.irq_data;
    }
}

impl CpuStateTrait for Z80 {
    type Snapshot = Z80State;

    fn snapshot(&self) -> Z80State {
        let r = &self.regs;
        Z80State {
            a: r.get_a(),
            f: r.get_f(),
            b: r.get_b(),
            c: r.get_c(),
            d: r.get_d(),
            e: r.get_e(),
            h: r.get_h(),
            l: r.get_l(),
            a_prime: r.high(Pair::AF2),
            f_prime: r.low(Pair::AF2),
            b_prime: r.high(Pair::BC2),
            c_prime: r.low(Pair::BC2),
            d_prime: r.high(Pair::DE2),
            e_prime: r.low(Pair::DE2),
            h_prime: r.high(Pair::HL2),
            l_prime: r.low(Pair::HL2),
            ix: r.get_ix(),
            iy: r.get_iy(),
            sp: r.get_sp(),
            pc: r.get_pc(),
            i: r.get_i(),
            r: r.get_r(),
            iff1: self.iff1,
            iff2: self.iff2,
            im: self.im,
            memptr: self.memptr,
            p: self.p,
            q: self.q,
            halted: self.halted,
            ei_delay: self.ei_delay,
            cc: self.cc,
            nmi: self.lines.nmi,
            irq: self.lines.irq,
            irq_data: self.lines.irq_data,
        }
    }
}
