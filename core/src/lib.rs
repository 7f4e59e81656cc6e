pub mod core;
pub mod cpu;

pub mod prelude {
    pub use crate::core::machine::Machine;
    pub use crate::core::{Bank, Host, InterruptLines, IrqMode, MemoryPager, NmiState};
    pub use crate::cpu::z80::{RunExit, RunOptions};
    pub use crate::cpu::{CpuStateTrait, Z80, Z80State};
}
