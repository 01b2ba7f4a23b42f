//! System Definitions.
//!
//! Tipos compartilhados entre o monitor e quem o embute (erros).

pub mod error;

pub use error::MonitorError;
