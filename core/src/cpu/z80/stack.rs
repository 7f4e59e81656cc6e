use crate::cpu::z80::Z80;

impl Z80 {
    /// Push a word: high byte first, SP pre-decremented. 6 T.
    pub(crate) fn push16(&mut self, val: u16) {
        let [low, high] = val.to_le_bytes();
        let sp = self.regs.get_sp().wrapping_sub(1);
        self.write_byte(sp, high);
        let sp = sp.wrapping_sub(1);
        self.write_byte(sp, low);
        self.regs.set_sp(sp);
    }

    /// Pop a word: low byte first. 6 T.
    pub(crate) fn pop16(&mut self) -> u16 {
        let sp = self.regs.get_sp();
        let low = self.read_byte(sp);
        let high = self.read_byte(sp.wrapping_add(1));
        self.regs.set_sp(sp.wrapping_add(2));
        u16::from_le_bytes([low, high])
    }

    /// PUSH rr: 11 T: M1(4) + internal(1) + MW(3) + MW(3)
    /// Opcode mask: 11 rr0 101 (rr: 0=BC, 1=DE, 2=HL/IX/IY, 3=AF)
    pub fn op_push(&mut self, opcode: u8) {
        let rp = (opcode >> 4) & 0x03;
        self.internal(1);
        let val = self.get_rp_af(rp);
        self.push16(val);
    }

    /// POP rr: 10 T: M1(4) + MR(3) + MR(3)
    /// Opcode mask: 11 rr0 001 (rr: 0=BC, 1=DE, 2=HL/IX/IY, 3=AF)
    pub fn op_pop(&mut self, opcode: u8) {
        let rp = (opcode >> 4) & 0x03;
        let val = self.pop16();
        self.set_rp_af(rp, val);
    }

    /// EX (SP),HL: 19 T: M1(4) + MR(3) + MR(4) + MW(3) + MW(5)
    /// With DD/FD the index register is exchanged instead.
    pub fn op_ex_sp_hl(&mut self) {
        let sp = self.regs.get_sp();
        let low = self.read_byte(sp);
        let high = self.read_byte(sp.wrapping_add(1));
        self.internal(1);

        let [old_low, old_high] = self.get_rp(2).to_le_bytes();
        self.write_byte(sp.wrapping_add(1), old_high);
        self.write_byte(sp, old_low);
        self.internal(2);

        let val = u16::from_le_bytes([low, high]);
        self.set_rp(2, val);
        self.memptr = val;
    }
}
