//! # Erros do Monitor
//!
//! Taxonomia única de falhas do console. Cada variante sabe se é
//! recuperável (o loop segue) ou fatal para a sessão (o loop imprime
//! `Command failed!` e termina).
//!
//! | Variante             | Origem      | Fatal |
//! |----------------------|-------------|-------|
//! | `TooManyArgs`        | tokenizer   | não   |
//! | `LineTooLong`        | leitura     | não   |
//! | `UnknownCommand`     | dispatch    | não   |
//! | `LookupFailed`       | backtrace   | sim   |
//! | `StackFault`         | backtrace   | sim   |
//! | `FrameChainCorrupt`  | backtrace   | sim   |
//! | `ResumeRefused`      | resume      | sim   |
//!
//! Não há retry em lugar nenhum: cada operação é tentada uma vez.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorError {
    /// Mais tokens do que o `ArgVec` comporta.
    TooManyArgs { max: usize },
    /// Linha maior que o buffer de comando.
    LineTooLong { max: usize },
    /// Nenhuma entrada da tabela casa com o primeiro token.
    UnknownCommand,
    /// O resolvedor não conhece o endereço de retorno.
    LookupFailed { addr: usize },
    /// Palavra do frame ilegível na memória da execução parada.
    StackFault { addr: usize },
    /// Cadeia de frame pointers não monotônica ou profunda demais.
    FrameChainCorrupt { fp: usize },
    /// continue/si fora de um trap de breakpoint/debug.
    /// `None` quando o monitor foi aberto sem trap frame.
    ResumeRefused { trapno: Option<u64> },
}

impl MonitorError {
    /// Erros fatais encerram o loop do monitor.
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            MonitorError::TooManyArgs { .. }
                | MonitorError::LineTooLong { .. }
                | MonitorError::UnknownCommand
        )
    }

    /// Código de retorno no estilo dos handlers clássicos (0 ok, -1 falha).
    pub const fn status(&self) -> i32 {
        if self.is_fatal() {
            -1
        } else {
            0
        }
    }
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorError::TooManyArgs { max } => write!(f, "Too many arguments (max {})", max),
            MonitorError::LineTooLong { max } => write!(f, "Line too long (max {})", max),
            MonitorError::UnknownCommand => write!(f, "Unknown command"),
            MonitorError::LookupFailed { addr } => {
                write!(f, "No debug info for address {:#x}", addr)
            }
            MonitorError::StackFault { addr } => write!(f, "Unreadable stack word at {:#x}", addr),
            MonitorError::FrameChainCorrupt { fp } => {
                write!(f, "Corrupt frame pointer chain at {:#x}", fp)
            }
            MonitorError::ResumeRefused { trapno: Some(trapno) } => {
                write!(f, "Cannot resume from trap {}", trapno)
            }
            MonitorError::ResumeRefused { trapno: None } => {
                write!(f, "Cannot resume: no active trap")
            }
        }
    }
}
