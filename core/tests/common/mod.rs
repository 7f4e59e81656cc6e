#![allow(dead_code)]

use std::collections::VecDeque;

use zinc_core::core::{Bank, Host, InterruptLines, IrqMode};
use zinc_core::cpu::z80::Z80;

/// CPU with a flat 64KB RAM bank mapped over the whole address space.
pub fn new_cpu() -> Z80 {
    let mut cpu = Z80::new();
    let ram = Bank::new(0x10000);
    cpu.mem.map_ram(0, 0x10000, &ram, 0);
    cpu
}

/// Execute one instruction (or interrupt response) and return its T-states.
pub fn run_instruction(cpu: &mut Z80, host: &mut TestHost) -> i64 {
    let start = cpu.cc;
    cpu.step(host);
    cpu.cc - start
}

/// Scriptable host: queued port input, logged port output, timed interrupts.
#[derive(Default)]
pub struct TestHost {
    /// Bytes returned by successive port reads; 0xFF once empty.
    pub input: VecDeque<u8>,
    /// (cycle, port) of every port read.
    pub reads: Vec<(i64, u16)>,
    /// (cycle, port, value) of every port write.
    pub writes: Vec<(i64, u16, u8)>,
    /// Cycles at which `handle_update` was called.
    pub updates: Vec<i64>,
    /// Call `handle_update` at least this often.
    pub period: Option<i64>,
    /// Assert IRQ at the first update at or after this cycle.
    pub irq_at: Option<i64>,
    /// Assert NMI at the first update at or after this cycle.
    pub nmi_at: Option<i64>,
    /// Request a stop when this port is written.
    pub stop_on_port: Option<u16>,
    /// Drop the IRQ line when it is acknowledged.
    pub ack_clears_irq: bool,

    pub nmis: Vec<i64>,
    pub irqs: Vec<(i64, IrqMode)>,
    pub retis: u32,
    pub halts: u32,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(bytes: &[u8]) -> Self {
        Self {
            input: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Host for TestHost {
    fn handle_input(&mut self, cycle: i64, port: u16, _lines: &mut InterruptLines) -> u8 {
        self.reads.push((cycle, port));
        self.input.pop_front().unwrap_or(0xFF)
    }

    fn handle_output(&mut self, cycle: i64, port: u16, value: u8, lines: &mut InterruptLines) {
        self.writes.push((cycle, port, value));
        if self.stop_on_port == Some(port & 0xFF) {
            lines.request_stop();
        }
    }

    fn handle_update(&mut self, cycle: i64, next: i64, lines: &mut InterruptLines) -> i64 {
        self.updates.push(cycle);
        if self.irq_at.is_some_and(|at| cycle >= at) {
            lines.set_irq(true);
            self.irq_at = None;
        }
        if self.nmi_at.is_some_and(|at| cycle >= at) {
            lines.set_nmi();
            self.nmi_at = None;
        }

        let mut due = next;
        for at in [self.irq_at, self.nmi_at].into_iter().flatten() {
            due = due.min(at);
        }
        if let Some(period) = self.period {
            due = due.min(cycle + period);
        }
        due
    }

    fn on_nmi(&mut self, cycle: i64) {
        self.nmis.push(cycle);
    }

    fn on_irq(&mut self, cycle: i64, mode: IrqMode, lines: &mut InterruptLines) {
        self.irqs.push((cycle, mode));
        if self.ack_clears_irq {
            lines.set_irq(false);
        }
    }

    fn on_reti(&mut self, _cycle: i64, _lines: &mut InterruptLines) {
        self.retis += 1;
    }

    fn on_halt(&mut self, _cycle: i64) {
        self.halts += 1;
    }
}
