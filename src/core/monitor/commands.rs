//! Comandos embutidos do monitor.

use core::fmt::Write;

use super::args::ArgVec;
use super::command::Command;
use super::Session;
use crate::arch::x86_64::trap::{RFlags, TrapFrame};
use crate::core::debug::StackWalker;
use crate::core::trap::{self, ResumeMode};
use crate::sys::MonitorError;

/// Tabela padrão, na ordem listada pelo `help`.
pub static BUILTIN: [Command; 5] = [
    Command {
        name: "help",
        desc: "Display this list of commands",
        func: mon_help,
    },
    Command {
        name: "kerninfo",
        desc: "Display information about the kernel",
        func: mon_kerninfo,
    },
    Command {
        name: "backtrace",
        desc: "Display a backtrace of the stack",
        func: mon_backtrace,
    },
    Command {
        name: "continue",
        desc: "Continue execution from the current trap",
        func: mon_continue,
    },
    Command {
        name: "si",
        desc: "Execute one instruction and return to the monitor",
        func: mon_si,
    },
];

pub fn mon_help(_args: &ArgVec<'_>, session: &mut Session<'_>) -> Result<(), MonitorError> {
    for cmd in session.commands.iter() {
        cprintln!(session.out, "{} - {}", cmd.name, cmd.desc);
    }
    Ok(())
}

pub fn mon_kerninfo(_args: &ArgVec<'_>, session: &mut Session<'_>) -> Result<(), MonitorError> {
    cprint!(session.out, "{}", session.config.layout);
    Ok(())
}

/// Percorre a cadeia de frame pointers a partir do frame deste handler.
///
/// `CpuState::frame_pointer` devolve o RBP de quem o chama: o frame mais
/// interno impresso é o do próprio `mon_backtrace`, vivo durante todo o walk.
pub fn mon_backtrace(_args: &ArgVec<'_>, session: &mut Session<'_>) -> Result<(), MonitorError> {
    cprintln!(session.out, "Stack backtrace:");

    let fp = session.cpu.frame_pointer();
    let walker = StackWalker::new(fp, session.stack, session.symbols)
        .with_max_frames(session.config.max_frames);

    for frame in walker {
        match frame {
            Ok(frame) => cprintln!(session.out, "{}", frame),
            Err(err) => {
                crate::kerror!("(Backtrace) Abortado em fp=", fp);
                return Err(err);
            }
        }
    }
    Ok(())
}

/// Frame preparado para `mode`, sem tirá-lo da sessão.
///
/// Um resume recusado não tem efeito colateral: o frame continua na sessão.
fn prepare_resume(session: &Session<'_>, mode: ResumeMode) -> Result<TrapFrame, MonitorError> {
    let frame = session
        .trap
        .as_ref()
        .ok_or(MonitorError::ResumeRefused { trapno: None })?;

    trap::prepare(frame, mode).map_err(|err| {
        crate::kerror!("(Resume) Recusado: trapno=", frame.trapno);
        err
    })
}

/// Consome o frame da sessão e retoma. Só chamado depois de `prepare_resume`.
fn resume_taken(session: &mut Session<'_>, mode: ResumeMode) -> Result<(), MonitorError> {
    let frame = session
        .trap
        .take()
        .ok_or(MonitorError::ResumeRefused { trapno: None })?;

    let never = trap::resume(frame, mode, session.hw)?;
    match never {}
}

pub fn mon_continue(_args: &ArgVec<'_>, session: &mut Session<'_>) -> Result<(), MonitorError> {
    prepare_resume(session, ResumeMode::Continue)?;
    resume_taken(session, ResumeMode::Continue)
}

/// Single-step: mostra a próxima instrução e retoma com TF armado.
///
/// O segundo valor é o IF que a CPU do monitor teria com o passo armado.
pub fn mon_si(_args: &ArgVec<'_>, session: &mut Session<'_>) -> Result<(), MonitorError> {
    let prepared = prepare_resume(session, ResumeMode::Step)?;

    let current = RFlags::from_bits_retain(session.cpu.flags());
    let step_if = ResumeMode::Step.flags(current).intersection(RFlags::IF);
    cprintln!(
        session.out,
        "Next instruction rip: {:#x} {:#x}",
        prepared.rip,
        step_if.bits()
    );

    resume_taken(session, ResumeMode::Step)
}
