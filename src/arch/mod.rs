//! # Hardware Abstraction Layer (HAL)
//!
//! O módulo `arch` é a **única** ponte entre a lógica do monitor e o hardware real.
//! Leitura de registradores e a sequência de retorno de trap passam por aqui.
//!
//! ## 🎯 Propósito e Responsabilidade
//! - **Isolamento:** `core::debug` e `core::trap` não sabem em qual CPU estão rodando.
//!   Eles falam com `CpuState` (frame pointer, flags) e `TrapReturn` (iretq).
//! - **Abstração:** Define traits (em `traits/`) que as implementações (ex: `x86_64/`) satisfazem.
//! - **Seleção de Plataforma:** Usa `cfg` attributes para compilar apenas o código da arquitetura alvo.
//!
//! ## 🏗️ Arquitetura e Fluxo
//! 1. O monitor recebe `&dyn CpuState` e `&dyn TrapReturn` na construção da sessão.
//! 2. No kernel, ambos são `x86_64::cpu::X64Cpu` e `x86_64::resume::IretReturn`
//!    (esta só via `unsafe { IretReturn::new() }`).
//! 3. Nos testes, são mocks que não tocam hardware.
//!
//! ## ⚠️ Pontos de Atenção
//! - `TrapFrame` é o layout x86_64; o monitor inteiro assume long mode.

pub mod traits;

// Seleção de Arquitetura: x86_64
#[cfg(target_arch = "x86_64")]
pub mod x86_64;

#[cfg(target_arch = "x86_64")]
pub use x86_64 as platform;

// Re-exports globais para o kernel usar
pub use platform::Cpu;
pub use traits::*;
