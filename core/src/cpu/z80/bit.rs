use crate::cpu::z80::flags;
use crate::cpu::z80::Z80;

impl Z80 {
    /// Rotate/shift, RES or SET applied to a value.
    fn cb_transform(&mut self, op: u8, val: u8) -> u8 {
        let xx = (op >> 6) & 0x03; // 0=rot/shift, 1=BIT, 2=RES, 3=SET
        let yyy = (op >> 3) & 0x07; // bit number or shift operation
        match xx {
            0 => {
                let (result, f) = flags::rotate_shift(yyy, val, self.flags());
                self.set_flags(f);
                result
            }
            2 => val & !(1 << yyy), // RES: no flag changes
            3 => val | (1 << yyy),  // SET: no flag changes
            _ => unreachable!("BIT has no writeback"),
        }
    }

    /// Execute CB-prefixed instruction.
    /// Rotate/shift: S, Z, PV(parity), C from shifted bit, H=0, N=0.
    /// BIT: Z = ~bit, S = bit 7 if tested, PV = Z, H=1, N=0, C preserved.
    /// SET/RES: No flags affected.
    /// Register forms: 8 T. BIT b,(HL): 12 T. Rotate/shift/SET/RES (HL): 15 T.
    pub(crate) fn execute_instruction_cb(&mut self, op: u8) {
        let xx = (op >> 6) & 0x03;
        let yyy = (op >> 3) & 0x07;
        let zzz = op & 0x07;

        if zzz == 6 {
            let addr = self.regs.get_hl();
            let val = self.read_byte(addr);
            self.internal(1);
            if xx == 1 {
                // X/Y from high byte of MEMPTR for BIT (HL)
                let xy = (self.memptr >> 8) as u8;
                let f = flags::bit(yyy, val, self.flags(), xy);
                self.set_flags(f);
            } else {
                let result = self.cb_transform(op, val);
                self.write_byte(addr, result);
            }
            return;
        }

        let val = self.get_reg8(zzz);
        if xx == 1 {
            // X/Y from the operand register value
            let f = flags::bit(yyy, val, self.flags(), val);
            self.set_flags(f);
        } else {
            let result = self.cb_transform(op, val);
            self.set_reg8(zzz, result);
        }
    }

    /// Execute DD CB d op / FD CB d op (indexed bit operations).
    /// BIT b,(IX+d): 20 T. Other (IX+d): 23 T.
    /// The sub-opcode is read as data, so R advances only for the two prefixes.
    /// For non-BIT ops with zzz != 6, result is also copied to register zzz (undocumented).
    pub(crate) fn execute_instruction_index_cb(&mut self) {
        let pc = self.regs.get_pc();
        let disp = self.read_byte(pc) as i8;
        let op = self.read_byte(pc.wrapping_add(1));
        self.internal(2);
        self.regs.set_pc(pc.wrapping_add(2));

        let base = self.regs.pair(self.index_pair());
        let addr = base.wrapping_add(disp as i16 as u16);
        self.memptr = addr;

        let xx = (op >> 6) & 0x03;
        let yyy = (op >> 3) & 0x07;
        let zzz = op & 0x07;

        let val = self.read_byte(addr);
        self.internal(1);

        if xx == 1 {
            // X/Y from the high byte of the effective address
            let f = flags::bit(yyy, val, self.flags(), (addr >> 8) as u8);
            self.set_flags(f);
            return;
        }

        let result = self.cb_transform(op, val);
        self.write_byte(addr, result);
        if zzz != 6 {
            self.set_reg8(zzz, result);
        }
    }
}
