//! Core Module
//!
//! Lógica do monitor independente de arquitetura: logging, backtrace,
//! retomada de trap e o console interativo.

pub mod debug;
pub mod logging;
pub mod monitor;
pub mod trap;
