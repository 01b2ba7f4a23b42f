/// Arquivo: x86_64/resume.rs
///
/// Propósito: Sequência de retorno de trap (restaurar registradores + `iretq`).
///
/// Detalhes de Implementação:
/// - RSP passa a apontar para o `TrapFrame` preparado; a partir daí tudo é `pop`.
/// - ES/DS não podem ser restaurados com `pop` em long mode; passam por RAX
///   antes de RAX ser restaurado.
/// - `trapno` e `error_code` são pulados (`add rsp, 16`).
/// - `iretq` restaura RIP, CS, RFLAGS, RSP e SS: a stack volta à posição
///   anterior à entrada do trap e as flags já vêm calculadas pelo chamador.
use crate::arch::traits::resume::TrapReturn;
use crate::arch::x86_64::trap::TrapFrame;
use core::arch::asm;

/// Implementação de `TrapReturn` via `iretq`.
///
/// Só pode ser obtida por `IretReturn::new`, que é `unsafe`: os métodos do
/// trait são seguros e confiam no contrato assumido ali.
#[derive(Debug)]
pub struct IretReturn {
    _private: (),
}

impl IretReturn {
    /// # Safety
    /// Só em Ring 0, no kernel, e só como `TrapReturn` do monitor: todo frame
    /// entregue a ela deve vir de `core::trap::resume`, originado de um trap
    /// real desta CPU.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    /// Restaura `frame` e executa `iretq`.
    ///
    /// # Safety
    /// `frame` deve descrever um contexto válido (seletores, RIP e RSP mapeados).
    /// A stack corrente é abandonada.
    #[inline(never)]
    unsafe fn pop_frame(frame: &TrapFrame) -> ! {
        asm!(
            "mov rsp, {0}",
            // Seletores (via scratch)
            "pop rax",
            "mov es, ax",
            "pop rax",
            "mov ds, ax",
            // Registradores gerais, na ordem do TrapFrame
            "pop r15", "pop r14", "pop r13", "pop r12",
            "pop r11", "pop r10", "pop r9",  "pop r8",
            "pop rdi", "pop rsi", "pop rbp", "pop rdx",
            "pop rcx", "pop rbx", "pop rax",
            // Pular trapno e error_code
            "add rsp, 16",
            "iretq",
            in(reg) frame as *const TrapFrame,
            options(noreturn)
        );
    }
}

impl TrapReturn for IretReturn {
    fn resume_continue(&self, frame: &TrapFrame) -> ! {
        crate::ktrace!("(Resume) iretq continue rip=", frame.rip);
        // SAFETY: o frame foi validado e preparado por `core::trap::resume`
        unsafe { Self::pop_frame(frame) }
    }

    fn resume_step(&self, frame: &TrapFrame) -> ! {
        crate::ktrace!("(Resume) iretq step rip=", frame.rip);
        // SAFETY: idem; RFLAGS.TF já está armado no frame
        unsafe { Self::pop_frame(frame) }
    }
}
