use crate::cpu::z80::flags;
use crate::cpu::z80::{Flag, Z80};

impl Z80 {
    /// Apply one of the eight accumulator operations (bits 5-3 of the opcode).
    /// 0=ADD 1=ADC 2=SUB 3=SBC 4=AND 5=XOR 6=OR 7=CP
    fn perform_alu_op(&mut self, op: u8, val: u8) {
        let a = self.regs.get_a();
        let carry = self.flag(Flag::C);
        let (result, f) = match op {
            0 => flags::add8(a, val, false),
            1 => flags::add8(a, val, carry),
            2 => flags::sub8(a, val, false),
            3 => flags::sub8(a, val, carry),
            4 => flags::and8(a, val),
            5 => flags::xor8(a, val),
            6 => flags::or8(a, val),
            7 => (a, flags::cp8(a, val)),
            _ => unreachable!(),
        };
        self.regs.set_a(result);
        self.set_flags(f);
    }

    /// ALU A, r: 4 T (reg), 7 T ((HL)) or 19 T ((IX+d))
    /// ADD, ADC, SUB, SBC, AND, XOR, OR, CP
    /// Opcode mask: 10 xxx zzz
    pub fn op_alu_r(&mut self, opcode: u8) {
        let op = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let val = if src == 6 {
            let addr = self.operand_addr();
            self.read_byte(addr)
        } else {
            self.get_reg8_ix(src)
        };
        self.perform_alu_op(op, val);
    }

    /// ALU A, n: 7 T: M1(4) + MR(3)
    /// Opcode mask: 11 xxx 110
    pub fn op_alu_n(&mut self, opcode: u8) {
        let val = self.read_imm();
        self.perform_alu_op((opcode >> 3) & 0x07, val);
    }

    /// INC/DEC r: 4 T (reg), 11 T ((HL)) or 23 T ((IX+d))
    /// Opcode mask: 00 rrr 10x
    pub fn op_inc_dec_r(&mut self, opcode: u8) {
        let r = (opcode >> 3) & 0x07;
        let is_dec = opcode & 0x01 != 0;
        let step = if is_dec { flags::dec8 } else { flags::inc8 };

        if r == 6 {
            let addr = self.operand_addr();
            let val = self.read_byte(addr);
            self.internal(1);
            let (result, f) = step(val, self.flags());
            self.set_flags(f);
            self.write_byte(addr, result);
        } else {
            let (result, f) = step(self.get_reg8_ix(r), self.flags());
            self.set_flags(f);
            self.set_reg8_ix(r, result);
        }
    }

    /// ADD HL,rr: 11 T: M1(4) + internal(7)
    /// Opcode mask: 00 rr1 001 (rr: 0=BC, 1=DE, 2=HL/IX/IY, 3=SP)
    /// H = carry from bit 11, C = carry from bit 15, N = 0.
    /// S, Z, PV preserved. X/Y from high byte of result.
    pub fn op_add_hl_rr(&mut self, opcode: u8) {
        self.internal(7);
        let hl = self.get_rp(2);
        let (result, f) = flags::add16(hl, self.get_rp((opcode >> 4) & 0x03), self.flags());
        self.memptr = hl.wrapping_add(1);
        self.set_rp(2, result);
        self.set_flags(f);
    }

    /// ADC HL,rr: 15 T: M1(4) + M1(4) + internal(7)
    pub fn op_adc_hl_rr(&mut self, opcode: u8) {
        self.internal(7);
        let hl = self.regs.get_hl();
        let rr = self.get_rp((opcode >> 4) & 0x03);
        let (result, f) = flags::adc16(hl, rr, self.flag(Flag::C));
        self.memptr = hl.wrapping_add(1);
        self.regs.set_hl(result);
        self.set_flags(f);
    }

    /// SBC HL,rr: 15 T: M1(4) + M1(4) + internal(7)
    pub fn op_sbc_hl_rr(&mut self, opcode: u8) {
        self.internal(7);
        let hl = self.regs.get_hl();
        let rr = self.get_rp((opcode >> 4) & 0x03);
        let (result, f) = flags::sbc16(hl, rr, self.flag(Flag::C));
        self.memptr = hl.wrapping_add(1);
        self.regs.set_hl(result);
        self.set_flags(f);
    }

    /// INC rr / DEC rr: 6 T: M1(4) + internal(2)
    /// INC: 00 rr0 011, DEC: 00 rr1 011. No flags affected.
    pub fn op_inc_dec_rr(&mut self, opcode: u8) {
        self.internal(2);
        let rp = (opcode >> 4) & 0x03;
        let val = self.get_rp(rp);
        let val = if opcode & 0x08 != 0 {
            val.wrapping_sub(1)
        } else {
            val.wrapping_add(1)
        };
        self.set_rp(rp, val);
    }

    /// RLCA / RRCA / RLA / RRA: 4 T.
    /// S, Z, PV preserved. H = N = 0, X/Y from the new A.
    pub fn op_rotate_a(&mut self, opcode: u8) {
        let (result, f) = flags::rotate_a(opcode >> 3, self.regs.get_a(), self.flags());
        self.regs.set_a(result);
        self.set_flags(f);
    }

    /// DAA: 4 T.
    pub fn op_daa(&mut self) {
        let (result, f) = flags::daa(self.regs.get_a(), self.flags());
        self.regs.set_a(result);
        self.set_flags(f);
    }

    /// CPL: 4 T.
    pub fn op_cpl(&mut self) {
        let (result, f) = flags::cpl(self.regs.get_a(), self.flags());
        self.regs.set_a(result);
        self.set_flags(f);
    }

    /// SCF: 4 T. X/Y depend on whether the previous instruction wrote F.
    pub fn op_scf(&mut self) {
        let f = flags::scf(self.regs.get_a(), self.flags(), self.prev_q);
        self.set_flags(f);
    }

    /// CCF: 4 T.
    pub fn op_ccf(&mut self) {
        let f = flags::ccf(self.regs.get_a(), self.flags(), self.prev_q);
        self.set_flags(f);
    }

    /// NEG: 8 T. Also answers to the undocumented ED mirrors.
    pub fn op_neg(&mut self) {
        let (result, f) = flags::neg8(self.regs.get_a());
        self.regs.set_a(result);
        self.set_flags(f);
    }
}
