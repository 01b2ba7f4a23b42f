//! Interface de retorno de trap (HAL).
//!
//! Isola a sequência de restauração de registradores + `iretq` atrás de
//! duas operações. A lógica de validação e o cálculo de flags ficam em
//! `core::trap::resume` e são puros.

use crate::arch::x86_64::trap::TrapFrame;

/// Transferência de controle de volta para uma execução parada.
///
/// Ambas as operações recebem um frame já preparado (flags calculadas)
/// e NÃO retornam em caso de sucesso.
pub trait TrapReturn {
    /// Restaura o frame e retoma a execução normalmente.
    fn resume_continue(&self, frame: &TrapFrame) -> !;

    /// Restaura o frame com o Trap Flag armado: exatamente uma instrução
    /// executa antes do próximo `#DB`.
    fn resume_step(&self, frame: &TrapFrame) -> !;
}
