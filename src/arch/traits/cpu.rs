//! Interface Abstrata de CPU (HAL).
//! Define as operações que qualquer arquitetura deve implementar.

/// Operações estáticas de CPU (sem estado).
pub trait CpuOps {
    /// Para a execução da CPU até a próxima interrupção (instrução HLT).
    fn halt();

    /// Desabilita interrupções globalmente (CLI).
    ///
    /// # Safety
    /// Requer privilégio de kernel.
    unsafe fn disable_interrupts();

    /// Lê o registrador de frame pointer (RBP em x86_64).
    fn read_frame_pointer() -> usize;

    /// Lê o registrador de flags (RFLAGS em x86_64).
    fn read_flags() -> u64;

    /// Entra em loop infinito de halt com interrupções desabilitadas.
    /// Usado quando o monitor termina sem ter para onde voltar.
    fn hang() -> ! {
        // SAFETY: só chamado em contexto de kernel
        unsafe { Self::disable_interrupts() };
        loop {
            Self::halt();
        }
    }
}

/// Acesso somente-leitura ao estado corrente da CPU.
///
/// Versão "objeto" de `CpuOps`: o monitor recebe `&dyn CpuState`,
/// o que permite injetar um frame pointer sintético nos testes.
pub trait CpuState {
    /// Frame pointer do chamador (início da cadeia do backtrace).
    ///
    /// Deve continuar válido depois do retorno: a implementação de hardware
    /// devolve o RBP de quem chama, nunca o do seu próprio frame.
    /// Exige `-C force-frame-pointers=yes`.
    fn frame_pointer(&self) -> usize;

    /// Valor atual do registrador de flags.
    fn flags(&self) -> u64;
}
