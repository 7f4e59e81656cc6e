/// State of the non-maskable interrupt input.
///
/// NMI is edge-triggered: asserting the line latches a request, servicing it
/// moves to `Acknowledged`, and no further NMI is taken until the line has
/// been released with `clear_nmi()` and asserted again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NmiState {
    #[default]
    Idle,
    /// Edge seen, waiting for the next instruction boundary.
    Latched,
    /// Serviced; the line is still held by the host.
    Acknowledged,
}

/// Interrupt and control lines shared between the CPU and the host.
///
/// Owned by the CPU; handed to every host callback so peripherals can raise
/// or lower lines from inside the run loop.
#[derive(Clone, Debug, PartialEq)]
pub struct InterruptLines {
    pub(crate) irq: bool,
    pub(crate) irq_data: u8,
    pub(crate) nmi: NmiState,
    pub(crate) stop: bool,
}

impl Default for InterruptLines {
    fn default() -> Self {
        Self {
            irq: false,
            irq_data: 0xFF, // floating data bus: RST 38h in IM 0
            nmi: NmiState::Idle,
            stop: false,
        }
    }
}

impl InterruptLines {
    /// Drive the maskable interrupt line (level-triggered).
    pub fn set_irq(&mut self, asserted: bool) {
        self.irq = asserted;
    }

    /// Byte the interrupting device places on the data bus during
    /// acknowledge: an RST opcode in IM 0, the vector low byte in IM 2.
    pub fn set_irq_data(&mut self, data: u8) {
        self.irq_data = data;
    }

    pub fn irq(&self) -> bool {
        self.irq
    }

    pub fn irq_data(&self) -> u8 {
        self.irq_data
    }

    /// Assert NMI. Only a transition from `Idle` latches a new request.
    pub fn set_nmi(&mut self) {
        if self.nmi == NmiState::Idle {
            self.nmi = NmiState::Latched;
        }
    }

    /// Release NMI. A request that was latched but not yet serviced is kept.
    pub fn clear_nmi(&mut self) {
        if self.nmi == NmiState::Acknowledged {
            self.nmi = NmiState::Idle;
        }
    }

    pub fn nmi(&self) -> NmiState {
        self.nmi
    }

    /// Ask the current `run` call to return at the next instruction boundary.
    pub fn request_stop(&mut self) {
        self.stop = true;
    }

    pub(crate) fn take_stop(&mut self) -> bool {
        std::mem::take(&mut self.stop)
    }
}

/// Interrupt acknowledge kind, reported to [`Host::on_irq`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqMode {
    Im0,
    Im1,
    Im2,
}

/// Callbacks the embedding application supplies to the CPU.
///
/// All calls are synchronous and made from inside `Z80::run`. `cycle` is the
/// CPU cycle counter after the access's T-states have been charged.
pub trait Host {
    /// Port read (`IN`, `INI` family). `port` is the full 16-bit address bus.
    fn handle_input(&mut self, cycle: i64, port: u16, lines: &mut InterruptLines) -> u8;

    /// Port write (`OUT`, `OUTI` family).
    fn handle_output(&mut self, cycle: i64, port: u16, value: u8, lines: &mut InterruptLines);

    /// Periodic check-in. Called at the start of every `run` and whenever the
    /// cycle counter reaches the value this method last returned. `next` is
    /// the run's exit cycle; return the cycle of the next host event.
    fn handle_update(&mut self, cycle: i64, next: i64, lines: &mut InterruptLines) -> i64 {
        let _ = (cycle, lines);
        next
    }

    /// An NMI response has completed (PC is at 0x0066).
    fn on_nmi(&mut self, _cycle: i64) {}

    /// A maskable interrupt response has completed. Devices that release
    /// their request on acknowledge drop the line here.
    fn on_irq(&mut self, _cycle: i64, _mode: IrqMode, _lines: &mut InterruptLines) {}

    /// RETI executed: the end of an interrupt service routine, for
    /// daisy-chained peripheral controllers.
    fn on_reti(&mut self, _cycle: i64, _lines: &mut InterruptLines) {}

    /// The CPU executed HALT.
    fn on_halt(&mut self, _cycle: i64) {}
}
