use crate::core::Host;
use crate::cpu::z80::flags::{self, CF, HF, NF, PF, SF, XF, YF, ZF};
use crate::cpu::z80::Z80;

impl Z80 {
    /// Shared tail of the repeating forms: 5 T, PC back onto the ED prefix.
    fn repeat_block(&mut self) {
        self.internal(5);
        let pc = self.regs.get_pc().wrapping_sub(2);
        self.regs.set_pc(pc);
        self.memptr = pc.wrapping_add(1);
    }

    // --- Block Transfer ---

    /// LDI/LDD: 16 T: Main M1(4) + ED M1(4) + MR(3) + MW(5)
    /// LDIR/LDDR: 21 T while repeating, 16 T on the last iteration.
    /// LDI (0xA0): (DE)←(HL), HL++, DE++, BC--
    /// LDD (0xA8): (DE)←(HL), HL--, DE--, BC--
    pub fn op_ldi_ldd(&mut self, opcode: u8) {
        let delta: u16 = if opcode & 0x08 != 0 { 0xFFFF } else { 1 };
        let repeat = opcode & 0x10 != 0;

        let hl = self.regs.get_hl();
        let de = self.regs.get_de();
        let val = self.read_byte(hl);
        self.write_byte(de, val);
        self.internal(2);

        self.regs.set_hl(hl.wrapping_add(delta));
        self.regs.set_de(de.wrapping_add(delta));
        let bc = self.regs.get_bc().wrapping_sub(1);
        self.regs.set_bc(bc);

        let n = val.wrapping_add(self.regs.get_a());
        let mut f = self.flags() & (SF | ZF | CF);
        if bc != 0 {
            f |= PF;
        }
        // Undocumented: X = bit 3 of (val+A), Y = bit 1 of (val+A)
        if n & 0x08 != 0 {
            f |= XF;
        }
        if n & 0x02 != 0 {
            f |= YF;
        }
        self.set_flags(f);

        if repeat && bc != 0 {
            self.repeat_block();
        }
    }

    /// CPI/CPD: 16 T: Main M1(4) + ED M1(4) + MR(3) + internal(5)
    /// CPIR/CPDR: 21 T while repeating (BC != 0 and no match).
    /// C preserved, N set, PV = BC != 0.
    pub fn op_cpi_cpd(&mut self, opcode: u8) {
        let delta: u16 = if opcode & 0x08 != 0 { 0xFFFF } else { 1 };
        let repeat = opcode & 0x10 != 0;

        let hl = self.regs.get_hl();
        let val = self.read_byte(hl);
        self.internal(5);

        let a = self.regs.get_a();
        let result = a.wrapping_sub(val);
        let half = (a & 0x0F) < (val & 0x0F);

        self.regs.set_hl(hl.wrapping_add(delta));
        let bc = self.regs.get_bc().wrapping_sub(1);
        self.regs.set_bc(bc);
        self.memptr = self.memptr.wrapping_add(delta);

        let mut f = (self.flags() & CF) | NF | (result & SF);
        if result == 0 {
            f |= ZF;
        }
        if half {
            f |= HF;
        }
        if bc != 0 {
            f |= PF;
        }
        // Undocumented: X/Y from (A - val - H)
        let n = result.wrapping_sub(half as u8);
        if n & 0x08 != 0 {
            f |= XF;
        }
        if n & 0x02 != 0 {
            f |= YF;
        }
        self.set_flags(f);

        if repeat && bc != 0 && result != 0 {
            self.repeat_block();
        }
    }

    // --- Block I/O ---

    /// Flags common to the block I/O instructions.
    /// `k` is the transferred byte plus the adjusted C (input) or new L (output).
    fn block_io_flags(&mut self, val: u8, k: u16) {
        let b = self.regs.get_b();
        let mut f = flags::sz(b);
        if val & 0x80 != 0 {
            f |= NF;
        }
        if k > 0xFF {
            f |= HF | CF;
        }
        if flags::parity((k as u8 & 0x07) ^ b) {
            f |= PF;
        }
        self.set_flags(f);
    }

    /// INI/IND: 16 T: Main M1(4) + ED M1(5) + IOR(4) + MW(3)
    /// INIR/INDR: 21 T while B != 0.
    pub fn op_ini_ind<H: Host + ?Sized>(&mut self, opcode: u8, host: &mut H) {
        let delta: u16 = if opcode & 0x08 != 0 { 0xFFFF } else { 1 };
        let repeat = opcode & 0x10 != 0;

        self.internal(1);
        let bc = self.regs.get_bc();
        let val = self.port_in(host, bc);
        let hl = self.regs.get_hl();
        self.write_byte(hl, val);

        self.memptr = bc.wrapping_add(delta);
        self.regs.set_b(self.regs.get_b().wrapping_sub(1));
        self.regs.set_hl(hl.wrapping_add(delta));

        let adjusted = self.regs.get_c().wrapping_add(delta as u8);
        self.block_io_flags(val, val as u16 + adjusted as u16);

        if repeat && self.regs.get_b() != 0 {
            self.repeat_block();
        }
    }

    /// OUTI/OUTD: 16 T: Main M1(4) + ED M1(5) + MR(3) + IOW(4)
    /// OTIR/OTDR: 21 T while B != 0. B is decremented before the port write.
    pub fn op_outi_outd<H: Host + ?Sized>(&mut self, opcode: u8, host: &mut H) {
        let delta: u16 = if opcode & 0x08 != 0 { 0xFFFF } else { 1 };
        let repeat = opcode & 0x10 != 0;

        self.internal(1);
        let hl = self.regs.get_hl();
        let val = self.read_byte(hl);
        self.regs.set_b(self.regs.get_b().wrapping_sub(1));
        let bc = self.regs.get_bc();
        self.port_out(host, bc, val);

        self.memptr = bc.wrapping_add(delta);
        self.regs.set_hl(hl.wrapping_add(delta));

        let l = self.regs.get_l();
        self.block_io_flags(val, val as u16 + l as u16);

        if repeat && self.regs.get_b() != 0 {
            self.repeat_block();
        }
    }

    // --- Nibble rotates ---

    /// RRD: 18 T: Main M1(4) + ED M1(4) + MR(3) + internal(4) + MW(3)
    /// Low nibble of (HL) into A, A's low nibble into the high nibble of (HL).
    pub fn op_rrd(&mut self) {
        let hl = self.regs.get_hl();
        let val = self.read_byte(hl);
        self.internal(4);
        let a = self.regs.get_a();
        self.write_byte(hl, (a << 4) | (val >> 4));
        self.finish_nibble_rotate((a & 0xF0) | (val & 0x0F), hl);
    }

    /// RLD: 18 T. High nibble of (HL) into A, A's low nibble into the low nibble of (HL).
    pub fn op_rld(&mut self) {
        let hl = self.regs.get_hl();
        let val = self.read_byte(hl);
        self.internal(4);
        let a = self.regs.get_a();
        self.write_byte(hl, (val << 4) | (a & 0x0F));
        self.finish_nibble_rotate((a & 0xF0) | (val >> 4), hl);
    }

    fn finish_nibble_rotate(&mut self, a: u8, hl: u16) {
        self.regs.set_a(a);
        let f = (self.flags() & CF) | flags::SZP[a as usize];
        self.set_flags(f);
        self.memptr = hl.wrapping_add(1);
    }
}
