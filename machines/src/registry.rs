//! Machine registry for runner discovery.
//!
//! Each reference machine self-registers via [`inventory::submit!`] with a
//! [`MachineEntry`] holding its CLI name and a factory function. The runner
//! finds machines at runtime without a central list.

use zinc_core::core::machine::Machine;
use zinc_core::core::memory::DEFAULT_PAGE_SIZE;

use crate::rom_loader::{RomImage, RomLoadError};

/// Construction parameters shared by every machine.
#[derive(Clone, Debug)]
pub struct MachineConfig {
    /// Page size handed to the CPU's memory pager.
    pub page_size: usize,
    /// CPU cycles per `run_frame` call.
    pub frame_cycles: i64,
    /// Program image; required by machines that boot from ROM.
    pub program: Option<RomImage>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            frame_cycles: 4_000_000 / 50,
            program: None,
        }
    }
}

impl MachineConfig {
    /// Cycles per frame for a CPU clock and frame rate, at least one.
    pub fn frame_cycles_for(clock_hz: u64, frame_hz: u64) -> i64 {
        (clock_hz / frame_hz.max(1)).max(1) as i64
    }
}

pub struct MachineEntry {
    /// CLI name used to select this machine (e.g., "simplez80").
    pub name: &'static str,
    pub description: &'static str,
    pub create: fn(&MachineConfig) -> Result<Box<dyn Machine>, RomLoadError>,
}

impl MachineEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        create: fn(&MachineConfig) -> Result<Box<dyn Machine>, RomLoadError>,
    ) -> Self {
        Self {
            name,
            description,
            create,
        }
    }
}

inventory::collect!(MachineEntry);

/// All registered machines, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a machine by its CLI name.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}
