use std::io;

use crate::cpu::Z80;
use crate::cpu::z80::RunExit;

/// Machine-agnostic interface for emulated systems.
///
/// Each reference system owns a [`Z80`] plus the host side of its bus
/// (memory banks, ports, timers) and exposes a uniform surface to the
/// runner. The runner does not know about specific hardware.
pub trait Machine {
    /// Short identifier used on the command line and in config files.
    fn name(&self) -> &'static str;

    /// Run one frame of emulation (advance the clock by one frame's worth of cycles).
    fn run_frame(&mut self) -> RunExit;

    /// Reset the machine to its initial power-on state.
    fn reset(&mut self);

    /// Total T-states executed since power-on.
    fn cycles(&self) -> i64 {
        self.cpu().cc
    }

    fn cpu(&self) -> &Z80;

    /// Write a human-readable description of the machine state.
    fn dump(&self, out: &mut dyn io::Write) -> io::Result<()>;
}
