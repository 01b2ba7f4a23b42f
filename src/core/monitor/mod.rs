//! # Monitor
//!
//! Console interativo de uma execução parada.
//!
//! Ciclo: banner, dump do trap frame (se houver), e então `prompt → linha →
//! tokens → um handler` até o fim da entrada ou uma falha fatal.
//!
//! | Estado           | Evento                              | Próximo          |
//! |------------------|-------------------------------------|------------------|
//! | HALTED_AT_TRAP   | help / kerninfo / backtrace ok      | HALTED_AT_TRAP   |
//! | HALTED_AT_TRAP   | erro recuperável (parse, linha)     | HALTED_AT_TRAP   |
//! | HALTED_AT_TRAP   | continue / si aceitos               | RUNNING (não volta) |
//! | HALTED_AT_TRAP   | erro fatal                          | TERMINATED       |
//!
//! Todo o hardware chega por traits (`CpuState`, `StackMemory`,
//! `DebugInfoResolver`, `TrapReturn`, `LineSource`), então o monitor inteiro
//! roda no host sob `cargo test`.

use core::fmt::{self, Write};

/// Escrita no console do monitor; erros do writer são ignorados.
macro_rules! cprint {
    ($out:expr, $($arg:tt)*) => {{
        let _ = write!($out, $($arg)*);
    }};
}

macro_rules! cprintln {
    ($out:expr, $($arg:tt)*) => {{
        let _ = writeln!($out, $($arg)*);
    }};
}

pub mod args;
pub mod command;
pub mod commands;
pub mod input;
pub mod layout;

#[cfg(test)]
mod test;

pub use args::{ArgVec, MAX_ARGS};
pub use command::{Command, CommandFn, CommandSet};
pub use input::{LineBuffer, LineSource, ScriptedInput, SerialConsole, CMDBUF_SIZE};
pub use layout::{KernelLayout, KERNBASE};

use crate::arch::traits::{CpuState, TrapReturn};
use crate::arch::x86_64::trap::TrapFrame;
use crate::core::debug::backtrace::DEFAULT_MAX_FRAMES;
use crate::core::debug::{DebugInfoResolver, StackMemory};
use crate::sys::MonitorError;

// =============================================================================
// CONFIGURAÇÃO
// =============================================================================

/// Parâmetros de runtime do monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    pub prompt: &'static str,
    /// Profundidade máxima do backtrace.
    pub max_frames: usize,
    pub layout: KernelLayout,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            prompt: "K> ",
            max_frames: DEFAULT_MAX_FRAMES,
            layout: KernelLayout::default(),
        }
    }
}

/// Como uma sessão do monitor terminou (quando termina).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    /// A fonte de linhas acabou.
    EndOfInput,
    /// Um comando falhou com erro fatal.
    CommandFailed(MonitorError),
}

// =============================================================================
// SESSÃO
// =============================================================================

/// Estado visível aos handlers durante uma execução de `Monitor::run`.
pub struct Session<'a> {
    pub out: &'a mut dyn Write,
    /// Frame da execução parada; consumido por um resume.
    pub trap: Option<TrapFrame>,
    pub config: &'a MonitorConfig,
    pub commands: &'a CommandSet,
    pub symbols: &'a dyn DebugInfoResolver,
    pub stack: &'a dyn StackMemory,
    pub cpu: &'a dyn CpuState,
    pub hw: &'a dyn TrapReturn,
}

impl Session<'_> {
    /// Tokeniza e despacha uma linha.
    ///
    /// Erros recuperáveis já são reportados aqui; os fatais sobem para o loop.
    pub fn runcmd(&mut self, line: &str) -> Result<(), MonitorError> {
        let args = match ArgVec::parse(line) {
            Ok(args) => args,
            Err(err) => {
                cprintln!(self.out, "{}", err);
                return Err(err);
            }
        };

        let Some(name) = args.command() else {
            return Ok(());
        };

        let Some(cmd) = self.commands.find(name) else {
            crate::kwarn!("(Monitor) Comando desconhecido");
            cprintln!(self.out, "Unknown command '{}'", name);
            return Err(MonitorError::UnknownCommand);
        };

        crate::ktrace!("(Monitor) Executando comando, argc=", args.len());
        (cmd.func)(&args, self)
    }
}

// =============================================================================
// MONITOR
// =============================================================================

/// Monitor configurado com seus colaboradores de hardware.
pub struct Monitor<'a> {
    config: MonitorConfig,
    commands: CommandSet,
    symbols: &'a dyn DebugInfoResolver,
    stack: &'a dyn StackMemory,
    cpu: &'a dyn CpuState,
    hw: &'a dyn TrapReturn,
}

impl<'a> Monitor<'a> {
    pub fn new(
        config: MonitorConfig,
        commands: CommandSet,
        symbols: &'a dyn DebugInfoResolver,
        stack: &'a dyn StackMemory,
        cpu: &'a dyn CpuState,
        hw: &'a dyn TrapReturn,
    ) -> Self {
        Self {
            config,
            commands,
            symbols,
            stack,
            cpu,
            hw,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    /// Roda o console até o fim da entrada ou uma falha fatal.
    ///
    /// Um `continue`/`si` aceito nunca retorna daqui.
    pub fn run(
        &self,
        trap: Option<TrapFrame>,
        input: &mut dyn LineSource,
        out: &mut dyn Write,
    ) -> MonitorExit {
        crate::kinfo!("(Monitor) Sessao iniciada");

        cprintln!(out, "Welcome to the Forge kernel monitor!");
        cprintln!(out, "Type 'help' for a list of commands.");
        if let Some(frame) = &trap {
            crate::kdebug!("(Monitor) Trap frame presente, trapno=", frame.trapno);
            cprint!(out, "{}", frame);
        }

        let mut session = Session {
            out,
            trap,
            config: &self.config,
            commands: &self.commands,
            symbols: self.symbols,
            stack: self.stack,
            cpu: self.cpu,
            hw: self.hw,
        };
        let mut buf = LineBuffer::new();

        loop {
            cprint!(session.out, "{}", self.config.prompt);

            let line = match input.read_line(&mut buf) {
                None => break,
                Some(Ok(line)) => line,
                Some(Err(err)) => {
                    cprintln!(session.out, "{}", err);
                    continue;
                }
            };

            match session.runcmd(line) {
                Err(err) if err.is_fatal() => {
                    crate::kerror!("(Monitor) Comando falhou, status=", err.status());
                    cprintln!(session.out, "{}", err);
                    cprintln!(session.out, "Command failed!");
                    return MonitorExit::CommandFailed(err);
                }
                _ => {}
            }
        }

        crate::kinfo!("(Monitor) Fim da entrada");
        MonitorExit::EndOfInput
    }
}

/// Entrada do monitor no kernel: COM1 como console, sem volta ao chamador.
#[cfg(target_os = "none")]
pub fn enter(monitor: &Monitor<'_>, trap: Option<TrapFrame>) -> ! {
    use crate::arch::traits::CpuOps;
    use crate::arch::Cpu;
    use crate::drivers::serial::SerialWriter;

    let exit = monitor.run(trap, &mut SerialConsole, &mut SerialWriter);
    match exit {
        MonitorExit::CommandFailed(_) => crate::kfail!("(Monitor) Sessao encerrada por falha"),
        MonitorExit::EndOfInput => crate::kok!("(Monitor) Sessao encerrada"),
    }
    Cpu::hang()
}

impl fmt::Debug for Monitor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("config", &self.config)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}
