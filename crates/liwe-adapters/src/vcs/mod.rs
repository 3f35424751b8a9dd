//! Version control adapters.

mod git;
mod memory;

pub use git::GitCli;
pub use memory::MemoryVersionControl;
