use std::collections::VecDeque;
use std::io;

use tracing::{debug, trace};
use zinc_core::core::bus::{Host, InterruptLines, IrqMode};
use zinc_core::core::machine::Machine;
use zinc_core::core::memory::Bank;
use zinc_core::cpu::z80::{RunExit, RunOptions, Z80};

use crate::registry::{MachineConfig, MachineEntry};
use crate::rom_loader::RomLoadError;

/// Console data port: OUT writes a character, IN pops queued input.
pub const CONSOLE_PORT: u8 = 0x01;
/// Console status port: IN returns 1 while queued input remains, else 0.
pub const STATUS_PORT: u8 = 0x00;

/// Port side of the flat test system.
#[derive(Debug, Default)]
pub struct SimpleIo {
    pub console: Vec<u8>,
    pub input: VecDeque<u8>,
    irq_period: Option<i64>,
    next_irq: i64,
    pub irqs_taken: u64,
}

impl SimpleIo {
    fn reset(&mut self) {
        self.console.clear();
        self.input.clear();
        self.irqs_taken = 0;
    }
}

impl Host for SimpleIo {
    fn handle_input(&mut self, _cycle: i64, port: u16, _lines: &mut InterruptLines) -> u8 {
        match port as u8 {
            CONSOLE_PORT => self.input.pop_front().unwrap_or(0xFF),
            STATUS_PORT => u8::from(!self.input.is_empty()),
            _ => 0xFF,
        }
    }

    fn handle_output(&mut self, _cycle: i64, port: u16, value: u8, _lines: &mut InterruptLines) {
        if port as u8 == CONSOLE_PORT {
            self.console.push(value);
        }
    }

    fn handle_update(&mut self, cycle: i64, next: i64, lines: &mut InterruptLines) -> i64 {
        let Some(period) = self.irq_period else {
            return next;
        };
        if cycle >= self.next_irq {
            trace!(cycle, "periodic irq");
            lines.set_irq(true);
            while self.next_irq <= cycle {
                self.next_irq += period;
            }
        }
        next.min(self.next_irq)
    }

    fn on_irq(&mut self, _cycle: i64, _mode: IrqMode, lines: &mut InterruptLines) {
        self.irqs_taken += 1;
        lines.set_irq(false);
    }
}

/// Minimal Z80 system: 64KB of RAM in one bank, a console on port 0x01 and
/// an optional periodic maskable interrupt.
pub struct SimpleZ80System {
    pub cpu: Z80,
    pub io: SimpleIo,
    ram: Bank,
    frame_cycles: i64,
}

impl SimpleZ80System {
    pub fn new() -> Self {
        Self::with_page_size(zinc_core::core::memory::DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        let mut cpu = Z80::with_page_size(page_size);
        let ram = Bank::new(0x10000);
        cpu.mem.map_ram(0x0000, 0x10000, &ram, 0);
        Self {
            cpu,
            io: SimpleIo::default(),
            ram,
            frame_cycles: MachineConfig::default().frame_cycles,
        }
    }

    pub fn load_program(&mut self, offset: u16, data: &[u8]) {
        self.ram.load(offset as usize, data);
    }

    /// Raise IRQ every `period` cycles (None disables it).
    pub fn set_irq_period(&mut self, period: Option<i64>) {
        assert!(period.is_none_or(|p| p > 0), "IRQ period must be positive");
        self.io.irq_period = period;
        self.io.next_irq = self.cpu.cc + period.unwrap_or(0);
    }

    pub fn set_frame_cycles(&mut self, cycles: i64) {
        self.frame_cycles = cycles;
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.io.input.extend(bytes);
    }

    pub fn console_output(&self) -> &[u8] {
        &self.io.console
    }

    pub fn ram(&self) -> &Bank {
        &self.ram
    }

    /// Run until the CPU halts or `max_cycles` elapse.
    pub fn run_until_halt(&mut self, max_cycles: i64) -> RunExit {
        let exit = self.cpu.cc + max_cycles;
        self.cpu.run(&mut self.io, exit, RunOptions::until_halt())
    }
}

impl Default for SimpleZ80System {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine for SimpleZ80System {
    fn name(&self) -> &'static str {
        "simplez80"
    }

    fn run_frame(&mut self) -> RunExit {
        let exit = self.cpu.cc + self.frame_cycles;
        self.cpu.run(&mut self.io, exit, RunOptions::default())
    }

    fn reset(&mut self) {
        self.cpu.reset();
        self.io.reset();
        self.io.next_irq = self.cpu.cc + self.io.irq_period.unwrap_or(0);
    }

    fn cpu(&self) -> &Z80 {
        &self.cpu
    }

    fn dump(&self, out: &mut dyn io::Write) -> io::Result<()> {
        crate::write_cpu_summary(&self.cpu, out)?;
        let console = String::from_utf8_lossy(&self.io.console);
        writeln!(out, "console: {console:?}")
    }
}

fn create(config: &MachineConfig) -> Result<Box<dyn Machine>, RomLoadError> {
    let mut sys = SimpleZ80System::with_page_size(config.page_size);
    sys.set_frame_cycles(config.frame_cycles);
    if let Some(program) = &config.program {
        program.require_fits(0x10000)?;
        sys.load_program(0x0000, program.data());
        debug!(image = program.name(), len = program.len(), "loaded");
    }
    Ok(Box::new(sys))
}

inventory::submit! {
    MachineEntry::new("simplez80", "64KB flat RAM, console on port 0x01", create)
}
