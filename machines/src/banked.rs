//! Banked reference system.
//!
//! Memory map:
//!   0x0000-0x3FFF  16KB program ROM
//!   0x4000-0x7FFF  16KB window onto one of four RAM banks
//!   0x8000-0xFFFF  32KB fixed RAM
//!
//! Writing port 0x7F selects the window bank (low two bits). The port handler
//! only records the request and stops the run; the page table is rewritten
//! between runs, so the instruction after the OUT already sees the new bank.

use std::io;

use tracing::{debug, trace, warn};
use zinc_core::core::bus::{Host, InterruptLines, IrqMode};
use zinc_core::core::machine::Machine;
use zinc_core::core::memory::Bank;
use zinc_core::cpu::z80::{RunExit, RunOptions, Z80};

use crate::registry::{MachineConfig, MachineEntry};
use crate::rom_loader::{RomImage, RomLoadError};

pub const ROM_SIZE: usize = 0x4000;
pub const WINDOW_BASE: usize = 0x4000;
pub const WINDOW_SIZE: usize = 0x4000;
pub const BANK_COUNT: usize = 4;
pub const BANK_SELECT_PORT: u8 = 0x7F;
pub const CONSOLE_PORT: u8 = 0x01;

#[derive(Debug, Default)]
pub struct BankedIo {
    pub console: Vec<u8>,
    /// Bank currently mapped in the window.
    pub selected: u8,
    pending: Option<u8>,
    frame_cycles: i64,
    next_frame: i64,
    pub frames: u64,
    pub irqs_taken: u64,
}

impl Host for BankedIo {
    fn handle_input(&mut self, _cycle: i64, port: u16, _lines: &mut InterruptLines) -> u8 {
        match port as u8 {
            BANK_SELECT_PORT => self.pending.unwrap_or(self.selected),
            _ => 0xFF,
        }
    }

    fn handle_output(&mut self, cycle: i64, port: u16, value: u8, lines: &mut InterruptLines) {
        match port as u8 {
            BANK_SELECT_PORT => {
                let bank = value & (BANK_COUNT as u8 - 1);
                trace!(cycle, bank, "bank switch requested");
                self.pending = Some(bank);
                lines.request_stop();
            }
            CONSOLE_PORT => self.console.push(value),
            _ => {}
        }
    }

    fn handle_update(&mut self, cycle: i64, next: i64, lines: &mut InterruptLines) -> i64 {
        if cycle >= self.next_frame {
            lines.set_irq(true);
            self.frames += 1;
            self.next_frame += self.frame_cycles;
        }
        next.min(self.next_frame)
    }

    fn on_irq(&mut self, _cycle: i64, _mode: IrqMode, lines: &mut InterruptLines) {
        self.irqs_taken += 1;
        lines.set_irq(false);
    }
}

pub struct BankedSystem {
    pub cpu: Z80,
    pub io: BankedIo,
    rom: Bank,
    banks: [Bank; BANK_COUNT],
    fixed: Bank,
}

impl BankedSystem {
    pub fn new(rom: &[u8], page_size: usize, frame_cycles: i64) -> Self {
        assert!(frame_cycles > 0, "frame length must be positive");
        let rom = Bank::from_vec({
            let mut data = vec![0xFF; ROM_SIZE];
            let len = rom.len().min(ROM_SIZE);
            data[..len].copy_from_slice(&rom[..len]);
            data
        });
        let mut sys = Self {
            cpu: Z80::with_page_size(page_size),
            io: BankedIo {
                frame_cycles,
                next_frame: frame_cycles,
                ..BankedIo::default()
            },
            rom,
            banks: std::array::from_fn(|_| Bank::new(WINDOW_SIZE)),
            fixed: Bank::new(0x8000),
        };
        sys.cpu.mem.map_rom(0x0000, ROM_SIZE, &sys.rom, 0);
        sys.cpu.mem.map_ram(0x8000, 0x8000, &sys.fixed, 0);
        sys.map_window(0);
        sys
    }

    pub fn from_image(
        image: &RomImage,
        page_size: usize,
        frame_cycles: i64,
    ) -> Result<Self, RomLoadError> {
        image.require_fits(ROM_SIZE)?;
        Ok(Self::new(image.data(), page_size, frame_cycles))
    }

    pub fn bank(&self, index: usize) -> &Bank {
        &self.banks[index]
    }

    fn map_window(&mut self, bank: u8) {
        debug!(bank, cc = self.cpu.cc, "window remapped");
        self.cpu
            .mem
            .map_ram(WINDOW_BASE, WINDOW_SIZE, &self.banks[bank as usize], 0);
        self.io.selected = bank;
    }

    /// Run to `cc_exit`, applying bank switches as the program requests them.
    fn run_to(&mut self, cc_exit: i64) -> RunExit {
        loop {
            let exit = self.cpu.run(&mut self.io, cc_exit, RunOptions::default());
            let Some(bank) = self.io.pending.take() else {
                return exit;
            };
            self.map_window(bank);
            if exit != RunExit::Stopped {
                return exit;
            }
        }
    }
}

impl Machine for BankedSystem {
    fn name(&self) -> &'static str {
        "banked"
    }

    fn run_frame(&mut self) -> RunExit {
        let exit = self.cpu.cc + self.io.frame_cycles;
        self.run_to(exit)
    }

    fn reset(&mut self) {
        self.cpu.reset();
        self.io.pending = None;
        self.io.console.clear();
        self.io.next_frame = self.cpu.cc + self.io.frame_cycles;
        self.map_window(0);
    }

    fn cpu(&self) -> &Z80 {
        &self.cpu
    }

    fn dump(&self, out: &mut dyn io::Write) -> io::Result<()> {
        crate::write_cpu_summary(&self.cpu, out)?;
        let io = &self.io;
        writeln!(out, "window bank: {}  frames: {}", io.selected, io.frames)?;
        let console = String::from_utf8_lossy(&io.console);
        writeln!(out, "console: {console:?}")
    }
}

fn create(config: &MachineConfig) -> Result<Box<dyn Machine>, RomLoadError> {
    let image = config
        .program
        .as_ref()
        .ok_or_else(|| RomLoadError::MissingFile("banked system boot ROM".to_string()))?;
    // The window must start on a page boundary.
    let page_size = config.page_size.min(WINDOW_SIZE);
    if page_size != config.page_size {
        let requested = config.page_size;
        warn!(requested, page_size, "page size clamped");
    }
    let sys = BankedSystem::from_image(image, page_size, config.frame_cycles)?;
    Ok(Box::new(sys))
}

inventory::submit! {
    MachineEntry::new("banked", "16KB ROM, 4 x 16KB banked window at 0x4000, 32KB RAM", create)
}
