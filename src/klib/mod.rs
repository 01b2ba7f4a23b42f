//! Kernel Library (KLib).
//!
//! Utilitários agnósticos de hardware para uso interno do monitor.
//! Funciona como uma extensão da `core` library.

pub mod string;

/// Verifica se um endereço está alinhado.
#[inline]
pub const fn is_aligned(addr: usize, align: usize) -> bool {
    (addr & (align - 1)) == 0
}
