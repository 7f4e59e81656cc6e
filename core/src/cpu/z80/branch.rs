use crate::core::Host;
use crate::cpu::z80::{Flag, Z80};

impl Z80 {
    /// Evaluate a condition code (3 bits from opcode bits 5-3).
    /// 0=NZ, 1=Z, 2=NC, 3=C, 4=PO, 5=PE, 6=P, 7=M
    pub(crate) fn eval_condition(&self, cc: u8) -> bool {
        match cc {
            0 => !self.flag(Flag::Z),  // NZ
            1 => self.flag(Flag::Z),   // Z
            2 => !self.flag(Flag::C),  // NC
            3 => self.flag(Flag::C),   // C
            4 => !self.flag(Flag::PV), // PO (parity odd)
            5 => self.flag(Flag::PV),  // PE (parity even)
            6 => !self.flag(Flag::S),  // P (positive)
            7 => self.flag(Flag::S),   // M (minus)
            _ => unreachable!(),
        }
    }

    /// Relative jump target from a displacement already read.
    fn relative(&self, disp: i8) -> u16 {
        self.regs.get_pc().wrapping_add(disp as i16 as u16)
    }

    /// JP nn: 10 T: M1(4) + MR(3) + MR(3)
    pub fn op_jp_nn(&mut self) {
        let addr = self.read_imm16();
        self.memptr = addr;
        self.regs.set_pc(addr);
    }

    /// JP cc,nn: 10 T whether taken or not.
    pub fn op_jp_cc_nn(&mut self, opcode: u8) {
        let addr = self.read_imm16();
        self.memptr = addr;
        if self.eval_condition((opcode >> 3) & 0x07) {
            self.regs.set_pc(addr);
        }
    }

    /// JR e: 12 T: M1(4) + MR(3) + internal(5)
    pub fn op_jr_e(&mut self) {
        let disp = self.read_imm() as i8;
        self.internal(5);
        let target = self.relative(disp);
        self.memptr = target;
        self.regs.set_pc(target);
    }

    /// JR cc,e: 12 T taken / 7 T not taken
    pub fn op_jr_cc_e(&mut self, opcode: u8) {
        let cc = (opcode >> 3) & 0x03; // Only NZ/Z/NC/C for JR cc
        let disp = self.read_imm() as i8;
        if self.eval_condition(cc) {
            self.internal(5);
            let target = self.relative(disp);
            self.memptr = target;
            self.regs.set_pc(target);
        }
    }

    /// DJNZ e: 13 T taken / 8 T not taken
    /// M1(5) + MR(3) [+ internal(5)]. B decremented, no flags affected.
    pub fn op_djnz(&mut self) {
        self.internal(1);
        let disp = self.read_imm() as i8;
        let b = self.regs.get_b().wrapping_sub(1);
        self.regs.set_b(b);
        if b != 0 {
            self.internal(5);
            let target = self.relative(disp);
            self.memptr = target;
            self.regs.set_pc(target);
        }
    }

    /// CALL nn: 17 T: M1(4) + MR(3) + MR(4) + MW(3) + MW(3)
    pub fn op_call_nn(&mut self) {
        let addr = self.read_imm16();
        self.internal(1);
        self.memptr = addr;
        let ret = self.regs.get_pc();
        self.push16(ret);
        self.regs.set_pc(addr);
    }

    /// CALL cc,nn: 17 T taken / 10 T not taken
    pub fn op_call_cc_nn(&mut self, opcode: u8) {
        let addr = self.read_imm16();
        self.memptr = addr;
        if self.eval_condition((opcode >> 3) & 0x07) {
            self.internal(1);
            let ret = self.regs.get_pc();
            self.push16(ret);
            self.regs.set_pc(addr);
        }
    }

    /// RET: 10 T: M1(4) + MR(3) + MR(3)
    pub fn op_ret(&mut self) {
        let addr = self.pop16();
        self.memptr = addr;
        self.regs.set_pc(addr);
    }

    /// RET cc: 11 T taken / 5 T not taken
    pub fn op_ret_cc(&mut self, opcode: u8) {
        self.internal(1);
        if self.eval_condition((opcode >> 3) & 0x07) {
            self.op_ret();
        }
    }

    /// RST p: 11 T: M1(5) + MW(3) + MW(3)
    /// Opcode mask: 11 ppp 111, target = ppp * 8
    pub fn op_rst(&mut self, opcode: u8) {
        self.internal(1);
        let ret = self.regs.get_pc();
        self.push16(ret);
        let target = (opcode & 0x38) as u16;
        self.memptr = target;
        self.regs.set_pc(target);
    }

    /// DI: 4 T
    pub fn op_di(&mut self) {
        self.iff1 = false;
        self.iff2 = false;
    }

    /// EI: 4 T. Interrupts are not accepted until after the next instruction.
    pub fn op_ei(&mut self) {
        self.iff1 = true;
        self.iff2 = true;
        self.ei_delay = true;
    }

    /// RETN / RETI: 14 T: M1(4) + M1(4) + MR(3) + MR(3)
    /// Both copy IFF2 into IFF1; RETI (ED 4D) also tells the host the
    /// service routine is finished.
    pub fn op_retn<H: Host + ?Sized>(&mut self, opcode: u8, host: &mut H) {
        self.iff1 = self.iff2;
        self.op_ret();
        if opcode == 0x4D {
            host.on_reti(self.cc, &mut self.lines);
        }
    }

    /// IM 0/1/2: 8 T
    /// Opcode bits 4-3: 0,1 = IM 0 (1 is undocumented), 2 = IM 1, 3 = IM 2
    pub fn op_im(&mut self, opcode: u8) {
        self.im = match (opcode >> 3) & 0x03 {
            0 | 1 => 0,
            2 => 1,
            _ => 2,
        };
    }
}
