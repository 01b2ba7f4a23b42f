/// Arquivo: core/trap/resume.rs
///
/// Propósito: Retomar a execução parada (`continue`) ou executar exatamente
/// uma instrução e voltar ao monitor (`si`).
///
/// Detalhes de Implementação:
/// - `prepare` é puro: valida a causa do trap e calcula o RFLAGS de retorno.
/// - `resume` consome o frame por valor e entrega a cópia preparada ao
///   `TrapReturn`, que não retorna. Um resume recusado não tem efeito colateral.
/// - Continue: flags capturadas com TF limpo. Step: Continue | TF.
use core::convert::Infallible;

use crate::arch::traits::resume::TrapReturn;
use crate::arch::x86_64::trap::{RFlags, TrapFrame};
use crate::sys::MonitorError;

/// Como a execução parada deve ser retomada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeMode {
    /// Roda livremente até o próximo trap.
    Continue,
    /// Executa uma instrução e gera `#DB`.
    Step,
}

impl ResumeMode {
    /// RFLAGS de retorno a partir das flags capturadas.
    pub fn flags(self, captured: RFlags) -> RFlags {
        let base = captured.difference(RFlags::TF);
        match self {
            ResumeMode::Continue => base,
            ResumeMode::Step => base.union(RFlags::TF),
        }
    }
}

/// Valida o frame e devolve a cópia com as flags de retorno.
pub fn prepare(frame: &TrapFrame, mode: ResumeMode) -> Result<TrapFrame, MonitorError> {
    if !frame.cause().is_resumable() {
        return Err(MonitorError::ResumeRefused {
            trapno: Some(frame.trapno),
        });
    }

    let mut prepared = *frame;
    prepared.rflags = mode.flags(frame.flags()).bits();
    Ok(prepared)
}

/// Retoma a execução descrita por `frame`. Só retorna em caso de recusa.
pub fn resume(
    frame: TrapFrame,
    mode: ResumeMode,
    hw: &dyn TrapReturn,
) -> Result<Infallible, MonitorError> {
    let prepared = match prepare(&frame, mode) {
        Ok(prepared) => prepared,
        Err(err) => {
            crate::kerror!("(Resume) Recusado: trapno=", frame.trapno);
            return Err(err);
        }
    };

    match mode {
        ResumeMode::Continue => {
            crate::kdebug!("(Resume) continue rip=", prepared.rip);
            hw.resume_continue(&prepared)
        }
        ResumeMode::Step => {
            crate::kdebug!("(Resume) step rip=", prepared.rip);
            hw.resume_step(&prepared)
        }
    }
}
