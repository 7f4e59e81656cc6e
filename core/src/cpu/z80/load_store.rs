use crate::core::Host;
use crate::cpu::z80::flags::{self, CF, PF};
use crate::cpu::z80::{IndexMode, Z80};

impl Z80 {
    /// LD r, r': 4 T, or 7 T / 19 T with a (HL) / (IX+d) operand.
    /// Opcode mask: 01 ddd sss. When one side is memory, H and L are never
    /// remapped to the index halves.
    pub fn op_ld_r_r(&mut self, opcode: u8) {
        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        if src == 6 {
            let addr = self.operand_addr();
            let val = self.read_byte(addr);
            self.set_reg8(dst, val);
        } else if dst == 6 {
            let addr = self.operand_addr();
            let val = self.get_reg8(src);
            self.write_byte(addr, val);
        } else {
            let val = self.get_reg8_ix(src);
            self.set_reg8_ix(dst, val);
        }
    }

    /// LD r, n: 7 T. LD (HL),n: 10 T. LD (IX+d),n: 19 T.
    /// Opcode mask: 00 rrr 110
    pub fn op_ld_r_n(&mut self, opcode: u8) {
        let r = (opcode >> 3) & 0x07;
        if r != 6 {
            let val = self.read_imm();
            self.set_reg8_ix(r, val);
            return;
        }

        let addr = if self.index_mode == IndexMode::HL {
            self.regs.get_hl()
        } else {
            // Displacement and immediate are read back to back, then 2 T of arithmetic.
            let disp = self.read_imm() as i8;
            let addr = self.regs.pair(self.index_pair()).wrapping_add(disp as i16 as u16);
            self.memptr = addr;
            addr
        };
        let val = self.read_imm();
        if self.index_mode != IndexMode::HL {
            self.internal(2);
        }
        self.write_byte(addr, val);
    }

    /// LD rr, nn: 10 T: M1(4) + MR(3) + MR(3)
    /// Opcode mask: 00 rr0 001
    pub fn op_ld_rr_nn(&mut self, opcode: u8) {
        let val = self.read_imm16();
        self.set_rp((opcode >> 4) & 0x03, val);
    }

    /// LD (BC),A / LD (DE),A: 7 T
    pub fn op_ld_rp_a(&mut self, rp: u8) {
        let addr = self.get_rp(rp);
        let a = self.regs.get_a();
        self.write_byte(addr, a);
        self.memptr = ((a as u16) << 8) | (addr.wrapping_add(1) & 0xFF);
    }

    /// LD A,(BC) / LD A,(DE): 7 T
    pub fn op_ld_a_rp(&mut self, rp: u8) {
        let addr = self.get_rp(rp);
        let val = self.read_byte(addr);
        self.regs.set_a(val);
        self.memptr = addr.wrapping_add(1);
    }

    /// LD (nn),A: 13 T
    pub fn op_ld_nn_a(&mut self) {
        let addr = self.read_imm16();
        let a = self.regs.get_a();
        self.write_byte(addr, a);
        self.memptr = ((a as u16) << 8) | (addr.wrapping_add(1) & 0xFF);
    }

    /// LD A,(nn): 13 T
    pub fn op_ld_a_nn(&mut self) {
        let addr = self.read_imm16();
        let val = self.read_byte(addr);
        self.regs.set_a(val);
        self.memptr = addr.wrapping_add(1);
    }

    /// LD (nn),HL: 16 T (IX/IY with prefix)
    pub fn op_ld_nn_hl(&mut self) {
        let addr = self.read_imm16();
        let val = self.get_rp(2);
        self.write_word(addr, val);
        self.memptr = addr.wrapping_add(1);
    }

    /// LD HL,(nn): 16 T (IX/IY with prefix)
    pub fn op_ld_hl_nn_ind(&mut self) {
        let addr = self.read_imm16();
        let val = self.read_word(addr);
        self.set_rp(2, val);
        self.memptr = addr.wrapping_add(1);
    }

    /// LD (nn),rr (ED 43/53/63/73): 20 T
    pub fn op_ld_nn_rr_ed(&mut self, opcode: u8) {
        let addr = self.read_imm16();
        let val = self.get_rp((opcode >> 4) & 0x03);
        self.write_word(addr, val);
        self.memptr = addr.wrapping_add(1);
    }

    /// LD rr,(nn) (ED 4B/5B/6B/7B): 20 T
    pub fn op_ld_rr_nn_ed(&mut self, opcode: u8) {
        let addr = self.read_imm16();
        let val = self.read_word(addr);
        self.set_rp((opcode >> 4) & 0x03, val);
        self.memptr = addr.wrapping_add(1);
    }

    /// LD I,A: 9 T
    pub fn op_ld_i_a(&mut self) {
        self.internal(1);
        self.regs.set_i(self.regs.get_a());
    }

    /// LD R,A: 9 T. All eight bits are written, including bit 7.
    pub fn op_ld_r_a(&mut self) {
        self.internal(1);
        self.regs.set_r(self.regs.get_a());
    }

    /// LD A,I: 9 T. S, Z, X/Y from I; PV = IFF2; H = N = 0; C preserved.
    pub fn op_ld_a_i(&mut self) {
        self.internal(1);
        let val = self.regs.get_i();
        self.load_a_special(val);
    }

    /// LD A,R: 9 T. Sees R after this instruction's own two refreshes.
    pub fn op_ld_a_r(&mut self) {
        self.internal(1);
        let val = self.regs.get_r();
        self.load_a_special(val);
    }

    fn load_a_special(&mut self, val: u8) {
        self.regs.set_a(val);
        let mut f = (self.flags() & CF) | flags::sz(val);
        if self.iff2 {
            f |= PF;
        }
        self.set_flags(f);
        self.p = true;
    }

    // --- I/O ---

    /// IN A,(n): 11 T: M1(4) + MR(3) + IOR(4). Port high byte = A. No flags.
    pub fn op_in_a_n<H: Host + ?Sized>(&mut self, host: &mut H) {
        let n = self.read_imm();
        let port = u16::from_be_bytes([self.regs.get_a(), n]);
        let val = self.port_in(host, port);
        self.regs.set_a(val);
        self.memptr = port.wrapping_add(1);
    }

    /// OUT (n),A: 11 T: M1(4) + MR(3) + IOW(4). Port high byte = A.
    pub fn op_out_n_a<H: Host + ?Sized>(&mut self, host: &mut H) {
        let n = self.read_imm();
        let a = self.regs.get_a();
        let port = u16::from_be_bytes([a, n]);
        self.port_out(host, port, a);
        self.memptr = ((a as u16) << 8) | (n.wrapping_add(1) as u16);
    }

    /// IN r,(C): 12 T. S, Z, PV(parity), X/Y from the value; H = N = 0.
    /// r = 6 (ED 70) only sets flags.
    pub fn op_in_r_c<H: Host + ?Sized>(&mut self, opcode: u8, host: &mut H) {
        let r = (opcode >> 3) & 0x07;
        let port = self.regs.get_bc();
        let val = self.port_in(host, port);
        self.memptr = port.wrapping_add(1);
        let f = (self.flags() & CF) | flags::SZP[val as usize];
        self.set_flags(f);
        if r != 6 {
            self.set_reg8(r, val);
        }
    }

    /// OUT (C),r: 12 T. r = 6 (ED 71) outputs 0.
    pub fn op_out_c_r<H: Host + ?Sized>(&mut self, opcode: u8, host: &mut H) {
        let r = (opcode >> 3) & 0x07;
        let val = if r == 6 { 0 } else { self.get_reg8(r) };
        let port = self.regs.get_bc();
        self.port_out(host, port, val);
        self.memptr = port.wrapping_add(1);
    }
}
