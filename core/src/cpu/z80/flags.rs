//! Pure flag engine: every function returns the result and the new F byte.
//!
//! Nothing here touches CPU state, so instruction handlers and tests share
//! the same bit-exact arithmetic, including the undocumented X (bit 3) and
//! Y (bit 5) copies.

use super::Flag;

pub const CF: u8 = Flag::C as u8;
pub const NF: u8 = Flag::N as u8;
pub const PF: u8 = Flag::PV as u8;
pub const XF: u8 = Flag::X as u8;
pub const HF: u8 = Flag::H as u8;
pub const YF: u8 = Flag::Y as u8;
pub const ZF: u8 = Flag::Z as u8;
pub const SF: u8 = Flag::S as u8;
pub const XYF: u8 = XF | YF;

/// Sign, zero, parity and X/Y flags for every byte value.
pub const SZP: [u8; 256] = {
    let mut table = [0u8; 256];
    let mut i = 0usize;
    while i < 256 {
        let v = i as u8;
        let mut f = v & (SF | XYF);
        if v == 0 {
            f |= ZF;
        }
        if v.count_ones() % 2 == 0 {
            f |= PF;
        }
        table[i] = f;
        i += 1;
    }
    table
};

/// Sign, zero and X/Y flags (no parity).
#[inline]
pub fn sz(v: u8) -> u8 {
    SZP[v as usize] & !PF
}

#[inline]
pub fn parity(v: u8) -> bool {
    v.count_ones() % 2 == 0
}

// --- 8-bit arithmetic ---

/// ADD / ADC.
pub fn add8(a: u8, b: u8, carry: bool) -> (u8, u8) {
    let c = carry as u16;
    let wide = a as u16 + b as u16 + c;
    let result = wide as u8;
    let mut f = sz(result);
    if (a & 0x0F) as u16 + (b & 0x0F) as u16 + c > 0x0F {
        f |= HF;
    }
    if (a ^ result) & (b ^ result) & 0x80 != 0 {
        f |= PF;
    }
    if wide > 0xFF {
        f |= CF;
    }
    (result, f)
}

/// SUB / SBC.
pub fn sub8(a: u8, b: u8, carry: bool) -> (u8, u8) {
    let c = carry as i16;
    let wide = a as i16 - b as i16 - c;
    let result = wide as u8;
    let mut f = sz(result) | NF;
    if ((a & 0x0F) as i16) - ((b & 0x0F) as i16) - c < 0 {
        f |= HF;
    }
    if (a ^ b) & (a ^ result) & 0x80 != 0 {
        f |= PF;
    }
    if wide < 0 {
        f |= CF;
    }
    (result, f)
}

/// CP: flags of `a - b`, but X/Y are copied from the operand.
pub fn cp8(a: u8, b: u8) -> u8 {
    let (_, f) = sub8(a, b, false);
    (f & !XYF) | (b & XYF)
}

pub fn and8(a: u8, b: u8) -> (u8, u8) {
    let result = a & b;
    (result, SZP[result as usize] | HF)
}

pub fn or8(a: u8, b: u8) -> (u8, u8) {
    let result = a | b;
    (result, SZP[result as usize])
}

pub fn xor8(a: u8, b: u8) -> (u8, u8) {
    let result = a ^ b;
    (result, SZP[result as usize])
}

/// INC r: C preserved, overflow only on 0x7F -> 0x80.
pub fn inc8(v: u8, f: u8) -> (u8, u8) {
    let result = v.wrapping_add(1);
    let mut nf = (f & CF) | sz(result);
    if v & 0x0F == 0x0F {
        nf |= HF;
    }
    if v == 0x7F {
        nf |= PF;
    }
    (result, nf)
}

/// DEC r: C preserved, overflow only on 0x80 -> 0x7F.
pub fn dec8(v: u8, f: u8) -> (u8, u8) {
    let result = v.wrapping_sub(1);
    let mut nf = (f & CF) | NF | sz(result);
    if v & 0x0F == 0x00 {
        nf |= HF;
    }
    if v == 0x80 {
        nf |= PF;
    }
    (result, nf)
}

/// NEG: 0 - A.
pub fn neg8(a: u8) -> (u8, u8) {
    sub8(0, a, false)
}

/// DAA after an addition or subtraction, driven by N, H and C.
pub fn daa(a: u8, f: u8) -> (u8, u8) {
    let n = f & NF != 0;
    let half = f & HF != 0;
    let carry = f & CF != 0;

    let mut correction = 0u8;
    let mut new_c = carry;
    if half || (a & 0x0F) > 9 {
        correction |= 0x06;
    }
    if carry || a > 0x99 {
        correction |= 0x60;
        new_c = true;
    }

    let result = if n {
        a.wrapping_sub(correction)
    } else {
        a.wrapping_add(correction)
    };
    let new_h = if n {
        half && (a & 0x0F) < 6
    } else {
        (a & 0x0F) > 9
    };

    let mut nf = SZP[result as usize] | (f & NF);
    if new_h {
        nf |= HF;
    }
    if new_c {
        nf |= CF;
    }
    (result, nf)
}

/// CPL: H and N set, X/Y from the new A.
pub fn cpl(a: u8, f: u8) -> (u8, u8) {
    let result = !a;
    (result, (f & (SF | ZF | PF | CF)) | HF | NF | (result & XYF))
}

/// SCF. `q` is the F value written by the previous instruction (0 if it
/// left the flags alone); X/Y come from `(q ^ f) | a`.
pub fn scf(a: u8, f: u8, q: u8) -> u8 {
    (f & (SF | ZF | PF)) | CF | (((q ^ f) | a) & XYF)
}

/// CCF: H takes the old carry, carry is inverted.
pub fn ccf(a: u8, f: u8, q: u8) -> u8 {
    let mut nf = (f & (SF | ZF | PF)) | (((q ^ f) | a) & XYF);
    if f & CF != 0 {
        nf |= HF;
    } else {
        nf |= CF;
    }
    nf
}

// --- Rotates and shifts ---

/// RLCA / RRCA / RLA / RRA (op 0..=3). S, Z and P/V are preserved.
pub fn rotate_a(op: u8, a: u8, f: u8) -> (u8, u8) {
    let (result, carry) = match op {
        0 => (a.rotate_left(1), a >> 7),
        1 => (a.rotate_right(1), a & 1),
        2 => ((a << 1) | (f & CF), a >> 7),
        3 => ((a >> 1) | ((f & CF) << 7), a & 1),
        _ => unreachable!("rotate_a op {}", op),
    };
    (result, (f & (SF | ZF | PF)) | (result & XYF) | carry)
}

/// CB-prefixed rotate/shift. op: 0=RLC 1=RRC 2=RL 3=RR 4=SLA 5=SRA 6=SLL 7=SRL.
pub fn rotate_shift(op: u8, v: u8, f: u8) -> (u8, u8) {
    let (result, carry) = match op {
        0 => (v.rotate_left(1), v >> 7),
        1 => (v.rotate_right(1), v & 1),
        2 => ((v << 1) | (f & CF), v >> 7),
        3 => ((v >> 1) | ((f & CF) << 7), v & 1),
        4 => (v << 1, v >> 7),
        5 => ((v & 0x80) | (v >> 1), v & 1),
        6 => ((v << 1) | 1, v >> 7),
        7 => (v >> 1, v & 1),
        _ => unreachable!("rotate_shift op {}", op),
    };
    (result, SZP[result as usize] | carry)
}

/// BIT n. Z and P/V = tested bit clear, S only for a set bit 7, H set,
/// C preserved. X/Y come from `xy`, which depends on the addressing form.
pub fn bit(n: u8, v: u8, f: u8, xy: u8) -> u8 {
    let tested = v & (1 << n);
    let mut nf = (f & CF) | HF | (xy & XYF);
    if tested == 0 {
        nf |= ZF | PF;
    }
    if tested & 0x80 != 0 {
        nf |= SF;
    }
    nf
}

// --- 16-bit arithmetic ---

/// ADD HL,rr: S, Z and P/V preserved.
pub fn add16(a: u16, b: u16, f: u8) -> (u16, u8) {
    let wide = a as u32 + b as u32;
    let result = wide as u16;
    let mut nf = (f & (SF | ZF | PF)) | ((result >> 8) as u8 & XYF);
    if (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF {
        nf |= HF;
    }
    if wide > 0xFFFF {
        nf |= CF;
    }
    (result, nf)
}

/// ADC HL,rr: every flag from the 16-bit result.
pub fn adc16(a: u16, b: u16, carry: bool) -> (u16, u8) {
    let c = carry as u32;
    let wide = a as u32 + b as u32 + c;
    let result = wide as u16;
    let mut f = (result >> 8) as u8 & (SF | XYF);
    if result == 0 {
        f |= ZF;
    }
    if (a & 0x0FFF) as u32 + (b & 0x0FFF) as u32 + c > 0x0FFF {
        f |= HF;
    }
    if (a ^ result) & (b ^ result) & 0x8000 != 0 {
        f |= PF;
    }
    if wide > 0xFFFF {
        f |= CF;
    }
    (result, f)
}

/// SBC HL,rr: every flag from the 16-bit result.
pub fn sbc16(a: u16, b: u16, carry: bool) -> (u16, u8) {
    let c = carry as i32;
    let wide = a as i32 - b as i32 - c;
    let result = wide as u16;
    let mut f = ((result >> 8) as u8 & (SF | XYF)) | NF;
    if result == 0 {
        f |= ZF;
    }
    if (a & 0x0FFF) as i32 - (b & 0x0FFF) as i32 - c < 0 {
        f |= HF;
    }
    if (a ^ b) & (a ^ result) & 0x8000 != 0 {
        f |= PF;
    }
    if wide < 0 {
        f |= CF;
    }
    (result, f)
}
