//! Implementação x86_64 das operações de CPU (HAL).
//!
//! Usa Assembly inline para leitura de registradores e controle de interrupções.
//!
//! # Segurança
//! Esta implementação assume que o código está rodando em modo longo (64-bit).
//! `halt` e `disable_interrupts` exigem Ring 0; as leituras de RBP/RFLAGS não.

use crate::arch::traits::cpu::{CpuOps, CpuState};
use core::arch::asm;
use core::ptr::NonNull;
use volatile::VolatilePtr;

pub struct X64Cpu;

/// Alias usado pelo resto do crate (`crate::arch::Cpu`).
pub type Cpu = X64Cpu;

impl CpuOps for X64Cpu {
    /// Para a execução da CPU até a próxima interrupção (HLT).
    #[inline]
    fn halt() {
        unsafe {
            asm!("hlt", options(nomem, nostack, preserves_flags));
        }
    }

    /// Desabilita interrupções (CLI).
    ///
    /// # Safety
    /// Requer privilégios de Ring 0.
    #[inline]
    unsafe fn disable_interrupts() {
        asm!("cli", options(nomem, nostack, preserves_flags));
    }

    /// Lê RBP. Só é um frame pointer válido com `-C force-frame-pointers=yes`.
    #[inline(always)]
    fn read_frame_pointer() -> usize {
        let rbp: usize;
        // SAFE: apenas lê o valor corrente do registrador
        unsafe {
            asm!("mov {}, rbp", out(reg) rbp, options(nomem, nostack, preserves_flags));
        }
        rbp
    }

    #[inline]
    fn read_flags() -> u64 {
        let rflags: u64;
        unsafe {
            // PUSHFQ empilha RFLAGS, POP retira para registrador.
            asm!("pushfq; pop {}", out(reg) rflags, options(nomem, preserves_flags));
        }
        rflags
    }
}

/// RBP salvo no frame apontado por `fp` (o frame pointer do chamador).
///
/// `fp == 0` devolve 0, que o walker trata como fim da cadeia.
///
/// # Safety
/// `fp` deve ser 0 ou apontar para um frame vivo com RBP salvo em `[fp]`.
pub(crate) unsafe fn saved_frame_pointer(fp: usize) -> usize {
    match NonNull::new(fp as *mut usize) {
        Some(ptr) => VolatilePtr::new_read_only(ptr).read(),
        None => 0,
    }
}

impl CpuState for X64Cpu {
    /// Frame pointer de quem chamou este método.
    ///
    /// Fica fora de linha com frame próprio; o RBP lido aqui é o desse frame,
    /// e o valor devolvido é o RBP salvo nele, que continua válido depois do
    /// retorno enquanto o chamador estiver vivo.
    #[inline(never)]
    fn frame_pointer(&self) -> usize {
        let own = Self::read_frame_pointer();
        // SAFETY: com frame pointers forçados, [RBP] guarda o RBP do chamador
        unsafe { saved_frame_pointer(own) }
    }

    fn flags(&self) -> u64 {
        Self::read_flags()
    }
}
