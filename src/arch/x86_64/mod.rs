//! Implementação x86_64

pub mod cpu;
pub mod ports;
pub mod resume;
pub mod trap;

pub use cpu::Cpu;
pub use resume::IretReturn;
pub use trap::{RFlags, TrapCause, TrapFrame};
