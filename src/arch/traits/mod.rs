//! Traits do Hardware Abstraction Layer (HAL).
//! Interfaces que o monitor usa para falar com o hardware.

pub mod cpu;
pub mod resume;

// Re-exportar para facilitar uso: `use crate::arch::traits::CpuState;`
pub use cpu::{CpuOps, CpuState};
pub use resume::TrapReturn;
