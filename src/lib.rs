//! Kmon: Monitor de depuração do kernel Forge.
//!
//! Console interativo que assume o controle de uma execução parada por
//! breakpoint (`int3`) ou single-step (`#DB`). Duas peças têm invariantes reais:
//!
//! - `core::debug::backtrace`: percorre a cadeia de frame pointers e resolve
//!   cada endereço de retorno em informação simbólica.
//! - `core::trap::resume`: reconstrói o `TrapFrame` salvo e devolve o controle
//!   à execução parada, opcionalmente armando o Trap Flag (TF).
//!
//! O resto (tokenizer, tabela de comandos, leitura de linha) é cola.

#![cfg_attr(not(test), no_std)]

// --- Módulos de Baixo Nível (Hardware) ---
pub mod arch; // HAL (CPU, TrapFrame, retorno de trap)
pub mod drivers; // Serial COM1 (logs + console)

// --- Módulos Centrais (Lógica do Monitor) ---
pub mod core; // Logging, backtrace, resume, console
pub mod klib; // Utilitários Internos (alinhamento, tokenização)
pub mod sys; // Definições de Sistema (Erros)

// Re-exportar os tipos usados por quem embute o monitor no kernel
pub use crate::arch::x86_64::trap::{RFlags, TrapCause, TrapFrame};
pub use crate::core::monitor::{CommandSet, Monitor, MonitorConfig, MonitorExit};
pub use crate::sys::MonitorError;
