//! Z80 register file: 16-bit pairs and their 8-bit halves over one byte array.
//!
//! Each pair occupies two consecutive bytes. Which of the two holds the high
//! half is decided by [`ByteOrder`], fixed when the file is created. All
//! accessors go through `pair`/`high`/`low`, so the 8-bit and 16-bit views
//! can never disagree.

/// Storage order of the two halves of a register pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the build target.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Register pairs, including the shadow bank and the I/R pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pair {
    AF,
    BC,
    DE,
    HL,
    AF2,
    BC2,
    DE2,
    HL2,
    IX,
    IY,
    SP,
    PC,
    /// High half = I (interrupt vector), low half = R (refresh counter).
    IR,
}

const PAIR_COUNT: usize = 13;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    bytes: [u8; PAIR_COUNT * 2],
    order: ByteOrder,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Power-on contents: everything 0xFF except PC, I and R.
    pub fn new() -> Self {
        Self::with_order(ByteOrder::native())
    }

    pub fn with_order(order: ByteOrder) -> Self {
        let mut regs = Self {
            bytes: [0xFF; PAIR_COUNT * 2],
            order,
        };
        regs.set_pair(Pair::PC, 0);
        regs.set_pair(Pair::IR, 0);
        regs
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    #[inline]
    fn hi_index(&self, pair: Pair) -> usize {
        let base = pair as usize * 2;
        match self.order {
            ByteOrder::Little => base + 1,
            ByteOrder::Big => base,
        }
    }

    #[inline]
    fn lo_index(&self, pair: Pair) -> usize {
        self.hi_index(pair) ^ 1
    }

    #[inline]
    pub fn pair(&self, pair: Pair) -> u16 {
        let base = pair as usize * 2;
        let bytes = [self.bytes[base], self.bytes[base + 1]];
        match self.order {
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }

    #[inline]
    pub fn set_pair(&mut self, pair: Pair, val: u16) {
        let base = pair as usize * 2;
        let bytes = match self.order {
            ByteOrder::Little => val.to_le_bytes(),
            ByteOrder::Big => val.to_be_bytes(),
        };
        self.bytes[base..base + 2].copy_from_slice(&bytes);
    }

    #[inline]
    pub fn high(&self, pair: Pair) -> u8 {
        self.bytes[self.hi_index(pair)]
    }

    #[inline]
    pub fn set_high(&mut self, pair: Pair, val: u8) {
        let i = self.hi_index(pair);
        self.bytes[i] = val;
    }

    #[inline]
    pub fn low(&self, pair: Pair) -> u8 {
        self.bytes[self.lo_index(pair)]
    }

    #[inline]
    pub fn set_low(&mut self, pair: Pair, val: u8) {
        let i = self.lo_index(pair);
        self.bytes[i] = val;
    }

    /// Swap the contents of two pairs.
    pub fn swap(&mut self, a: Pair, b: Pair) {
        let tmp = self.pair(a);
        self.set_pair(a, self.pair(b));
        self.set_pair(b, tmp);
    }

    /// EX AF,AF'
    pub fn exchange_af(&mut self) {
        self.swap(Pair::AF, Pair::AF2);
    }

    /// EXX
    pub fn exchange_main(&mut self) {
        self.swap(Pair::BC, Pair::BC2);
        self.swap(Pair::DE, Pair::DE2);
        self.swap(Pair::HL, Pair::HL2);
    }

    // 8-bit registers
    pub fn get_a(&self) -> u8 {
        self.high(Pair::AF)
    }
    pub fn set_a(&mut self, val: u8) {
        self.set_high(Pair::AF, val)
    }
    pub fn get_f(&self) -> u8 {
        self.low(Pair::AF)
    }
    pub fn set_f(&mut self, val: u8) {
        self.set_low(Pair::AF, val)
    }
    pub fn get_b(&self) -> u8 {
        self.high(Pair::BC)
    }
    pub fn set_b(&mut self, val: u8) {
        self.set_high(Pair::BC, val)
    }
    pub fn get_c(&self) -> u8 {
        self.low(Pair::BC)
    }
    pub fn set_c(&mut self, val: u8) {
        self.set_low(Pair::BC, val)
    }
    pub fn get_d(&self) -> u8 {
        self.high(Pair::DE)
    }
    pub fn set_d(&mut self, val: u8) {
        self.set_high(Pair::DE, val)
    }
    pub fn get_e(&self) -> u8 {
        self.low(Pair::DE)
    }
    pub fn set_e(&mut self, val: u8) {
        self.set_low(Pair::DE, val)
    }
    pub fn get_h(&self) -> u8 {
        self.high(Pair::HL)
    }
    pub fn set_h(&mut self, val: u8) {
        self.set_high(Pair::HL, val)
    }
    pub fn get_l(&self) -> u8 {
        self.low(Pair::HL)
    }
    pub fn set_l(&mut self, val: u8) {
        self.set_low(Pair::HL, val)
    }
    pub fn get_i(&self) -> u8 {
        self.high(Pair::IR)
    }
    pub fn set_i(&mut self, val: u8) {
        self.set_high(Pair::IR, val)
    }
    pub fn get_r(&self) -> u8 {
        self.low(Pair::IR)
    }
    pub fn set_r(&mut self, val: u8) {
        self.set_low(Pair::IR, val)
    }

    // 16-bit pairs
    pub fn get_af(&self) -> u16 {
        self.pair(Pair::AF)
    }
    pub fn set_af(&mut self, val: u16) {
        self.set_pair(Pair::AF, val)
    }
    pub fn get_bc(&self) -> u16 {
        self.pair(Pair::BC)
    }
    pub fn set_bc(&mut self, val: u16) {
        self.set_pair(Pair::BC, val)
    }
    pub fn get_de(&self) -> u16 {
        self.pair(Pair::DE)
    }
    pub fn set_de(&mut self, val: u16) {
        self.set_pair(Pair::DE, val)
    }
    pub fn get_hl(&self) -> u16 {
        self.pair(Pair::HL)
    }
    pub fn set_hl(&mut self, val: u16) {
        self.set_pair(Pair::HL, val)
    }
    pub fn get_ix(&self) -> u16 {
        self.pair(Pair::IX)
    }
    pub fn set_ix(&mut self, val: u16) {
        self.set_pair(Pair::IX, val)
    }
    pub fn get_iy(&self) -> u16 {
        self.pair(Pair::IY)
    }
    pub fn set_iy(&mut self, val: u16) {
        self.set_pair(Pair::IY, val)
    }
    pub fn get_sp(&self) -> u16 {
        self.pair(Pair::SP)
    }
    pub fn set_sp(&mut self, val: u16) {
        self.set_pair(Pair::SP, val)
    }
    pub fn get_pc(&self) -> u16 {
        self.pair(Pair::PC)
    }
    pub fn set_pc(&mut self, val: u16) {
        self.set_pair(Pair::PC, val)
    }

    /// Increment the 7-bit refresh counter; bit 7 of R is kept.
    #[inline]
    pub fn refresh(&mut self) {
        self.refresh_by(1);
    }

    pub fn refresh_by(&mut self, n: u32) {
        let r = self.get_r();
        self.set_r((r & 0x80) | ((r as u32 + n) as u8 & 0x7F));
    }
}
