/// Arquivo: x86_64/ports.rs
///
/// Propósito: Porta de I/O de 8 bits (instruções `in`/`out`).
/// A UART da COM1 é o único dispositivo do monitor; cada registrador dela é
/// um `Port` com endereço fixo.
use core::arch::asm;

/// Uma porta de I/O de 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port(u16);

impl Port {
    pub const fn new(addr: u16) -> Self {
        Self(addr)
    }

    /// Porta `addr + offset` (registradores de um mesmo dispositivo).
    pub const fn offset(self, offset: u16) -> Self {
        Self(self.0 + offset)
    }

    #[inline]
    pub fn read(self) -> u8 {
        let value: u8;
        // SAFETY: `in` não acessa memória; exige apenas Ring 0 (ou IOPL)
        unsafe {
            asm!("in al, dx", in("dx") self.0, out("al") value,
                 options(nomem, nostack, preserves_flags));
        }
        value
    }

    #[inline]
    pub fn write(self, value: u8) {
        // SAFETY: idem
        unsafe {
            asm!("out dx, al", in("dx") self.0, in("al") value,
                 options(nomem, nostack, preserves_flags));
        }
    }
}
