//! Protocolo de retomada de uma execução parada por trap.

pub mod resume;

pub use resume::{prepare, resume, ResumeMode};
