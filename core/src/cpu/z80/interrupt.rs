use tracing::{trace, warn};

use super::Z80;
use super::flags::PF;
use crate::core::{Host, IrqMode, NmiState};

impl Z80 {
    /// Accept a pending interrupt at an instruction boundary.
    ///
    /// NMI wins over IRQ. The maskable line is ignored for the one boundary
    /// following EI. Returns true if a response sequence was executed.
    pub(crate) fn service_interrupt<H: Host + ?Sized>(&mut self, host: &mut H) -> bool {
        let ei_blocked = std::mem::take(&mut self.ei_delay);

        if self.lines.nmi == NmiState::Latched {
            self.lines.nmi = NmiState::Acknowledged;
            self.accept_nmi();
            host.on_nmi(self.cc);
            return true;
        }

        if self.lines.irq && self.iff1 && !ei_blocked {
            let mode = self.accept_irq();
            host.on_irq(self.cc, mode, &mut self.lines);
            return true;
        }

        false
    }

    /// Leave HALT; the saved return address must be past the HALT opcode.
    fn wake(&mut self) {
        if self.halted {
            self.halted = false;
            self.regs.set_pc(self.regs.get_pc().wrapping_add(1));
        }
    }

    /// NMI response: 11 T. M1 (5) + push PC (3 + 3), jump to 0x0066.
    fn accept_nmi(&mut self) {
        self.wake();
        self.regs.refresh();
        self.internal(5);

        self.iff2 = self.iff1;
        self.iff1 = false;
        self.p = false;
        self.q = 0;

        let pc = self.regs.get_pc();
        self.push16(pc);
        self.regs.set_pc(0x0066);
        self.memptr = 0x0066;
        trace!(from = pc, cc = self.cc, "nmi");
    }

    /// Maskable interrupt response. The acknowledge M1 takes 7 T (two wait
    /// states); IM 0 and IM 1 total 13 T, IM 2 adds the vector read for 19 T.
    fn accept_irq(&mut self) -> IrqMode {
        self.wake();
        self.regs.refresh();
        self.internal(7);

        // NMOS: accepting right after LD A,I / LD A,R reads IFF2 as already cleared.
        if self.p {
            let f = self.flags() & !PF;
            self.regs.set_f(f);
        }
        self.p = false;
        self.q = 0;

        self.iff1 = false;
        self.iff2 = false;

        let pc = self.regs.get_pc();
        let data = self.lines.irq_data;
        let mode = match self.im {
            0 => IrqMode::Im0,
            1 => IrqMode::Im1,
            _ => IrqMode::Im2,
        };

        let target = match mode {
            IrqMode::Im0 => {
                if data & 0xC7 != 0xC7 {
                    warn!(data, "IM 0 data byte is not an RST opcode, using RST 38h");
                    self.push16(pc);
                    0x0038
                } else {
                    self.push16(pc);
                    (data & 0x38) as u16
                }
            }
            IrqMode::Im1 => {
                self.push16(pc);
                0x0038
            }
            IrqMode::Im2 => {
                self.push16(pc);
                let vector = u16::from_be_bytes([self.regs.get_i(), data]);
                self.read_word(vector)
            }
        };

        self.regs.set_pc(target);
        self.memptr = target;
        trace!(from = pc, to = target, ?mode, cc = self.cc, "irq");
        mode
    }
}
