pub mod bus;
pub mod machine;
pub mod memory;

pub use bus::{Host, InterruptLines, IrqMode, NmiState};
pub use machine::Machine;
pub use memory::{Bank, MemoryPager};
