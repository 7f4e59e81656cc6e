use proptest::prelude::*;
use zinc_core::cpu::z80::flags::{self, CF, HF, NF, PF, SF, SZP, XYF, ZF};

#[test]
fn szp_table_matches_definition() {
    for v in 0u8..=0xFF {
        let f = SZP[v as usize];
        assert_eq!(f & SF != 0, v & 0x80 != 0, "S for {v:#04X}");
        assert_eq!(f & ZF != 0, v == 0, "Z for {v:#04X}");
        assert_eq!(f & PF != 0, v.count_ones() % 2 == 0, "P for {v:#04X}");
        assert_eq!(f & XYF, v & XYF, "X/Y for {v:#04X}");
        assert_eq!(f & (HF | NF | CF), 0);
    }
}

#[test]
fn inc_dec_overflow_boundaries() {
    let (r, f) = flags::inc8(0x7F, 0);
    assert_eq!(r, 0x80);
    assert_ne!(f & PF, 0);
    let (r, f) = flags::dec8(0x80, CF);
    assert_eq!(r, 0x7F);
    assert_ne!(f & PF, 0);
    assert_ne!(f & CF, 0, "carry preserved");
    let (_, f) = flags::inc8(0xFF, 0);
    assert_ne!(f & ZF, 0);
    assert_eq!(f & CF, 0, "INC never sets carry");
}

proptest! {
    #[test]
    fn add8_matches_wide_arithmetic(a in any::<u8>(), b in any::<u8>(), carry in any::<bool>()) {
        let (r, f) = flags::add8(a, b, carry);
        let wide = a as u16 + b as u16 + carry as u16;
        prop_assert_eq!(r, wide as u8);
        prop_assert_eq!(f & CF != 0, wide > 0xFF);
        prop_assert_eq!(f & NF, 0);
        let signed = a as i8 as i16 + b as i8 as i16 + carry as i16;
        prop_assert_eq!(f & PF != 0, !(-128..=127).contains(&signed));
        prop_assert_eq!(f & (SF | ZF | XYF), SZP[r as usize] & (SF | ZF | XYF));
    }

    #[test]
    fn sub8_matches_wide_arithmetic(a in any::<u8>(), b in any::<u8>(), carry in any::<bool>()) {
        let (r, f) = flags::sub8(a, b, carry);
        let wide = a as i16 - b as i16 - carry as i16;
        prop_assert_eq!(r, wide as u8);
        prop_assert_eq!(f & CF != 0, wide < 0);
        prop_assert_ne!(f & NF, 0);
        let signed = a as i8 as i16 - b as i8 as i16 - carry as i16;
        prop_assert_eq!(f & PF != 0, !(-128..=127).contains(&signed));
    }

    #[test]
    fn cp8_equals_sub_except_xy(a in any::<u8>(), b in any::<u8>()) {
        let (_, sub) = flags::sub8(a, b, false);
        let cp = flags::cp8(a, b);
        prop_assert_eq!(cp & !XYF, sub & !XYF);
        prop_assert_eq!(cp & XYF, b & XYF);
    }

    #[test]
    fn sbc16_inverts_adc16(a in any::<u16>(), b in any::<u16>()) {
        let (sum, f) = flags::adc16(a, b, false);
        let (back, _) = flags::sbc16(sum, b, false);
        prop_assert_eq!(back, a);
        prop_assert_eq!(f & ZF != 0, sum == 0);
        prop_assert_eq!(f & CF != 0, a as u32 + b as u32 > 0xFFFF);
    }

    #[test]
    fn add16_preserves_szp(a in any::<u16>(), b in any::<u16>(), f in any::<u8>()) {
        let (_, nf) = flags::add16(a, b, f);
        prop_assert_eq!(nf & (SF | ZF | PF), f & (SF | ZF | PF));
        prop_assert_eq!(nf & NF, 0);
    }

    #[test]
    fn rotate_left_then_right_restores(v in any::<u8>()) {
        let (left, _) = flags::rotate_shift(0, v, 0);
        let (back, _) = flags::rotate_shift(1, left, 0);
        prop_assert_eq!(back, v);
    }

    #[test]
    fn bit_sets_z_iff_clear(n in 0u8..8, v in any::<u8>(), f in any::<u8>()) {
        let nf = flags::bit(n, v, f, v);
        prop_assert_eq!(nf & ZF != 0, v & (1 << n) == 0);
        prop_assert_eq!(nf & PF != 0, nf & ZF != 0);
        prop_assert_ne!(nf & HF, 0);
        prop_assert_eq!(nf & CF, f & CF);
    }
}
