//! Testes de ponta a ponta do console: linhas roteirizadas entram, texto sai.

use core::fmt::Write;
use std::panic::{self, AssertUnwindSafe};
use std::string::String;

use super::*;
use crate::arch::x86_64::trap::{T_BRKPT, T_DEBUG};
use crate::core::debug::backtrace::tests::{SyntheticStack, SYMBOLS};
use crate::core::debug::SymbolTable;
use crate::core::trap::resume::tests::RecordingReturn;
use crate::core::trap::ResumeMode;

const BANNER: &str = "Welcome to the Forge kernel monitor!\nType 'help' for a list of commands.\n";

struct FixedCpu {
    fp: usize,
    flags: u64,
}

impl CpuState for FixedCpu {
    fn frame_pointer(&self) -> usize {
        self.fp
    }

    fn flags(&self) -> u64 {
        self.flags
    }
}

struct Harness {
    config: MonitorConfig,
    commands: CommandSet,
    stack: SyntheticStack,
    table: SymbolTable<'static>,
    cpu: FixedCpu,
    hw: RecordingReturn,
}

impl Harness {
    /// Stack de três frames: test_backtrace ← i386_init ← entry.
    fn new() -> Self {
        Self::with_stack(SyntheticStack::chain(&[
            (0x8000, 0x1010),
            (0x8100, 0x2044),
            (0x8200, 0x3008),
        ]))
    }

    fn with_stack(stack: SyntheticStack) -> Self {
        Self {
            config: MonitorConfig::default(),
            commands: CommandSet::builtin(),
            stack,
            table: SymbolTable::new(&SYMBOLS),
            cpu: FixedCpu {
                fp: 0x8000,
                flags: 0x202,
            },
            hw: RecordingReturn::default(),
        }
    }

    fn monitor(&self) -> Monitor<'_> {
        Monitor::new(
            self.config,
            self.commands,
            &self.table,
            &self.stack,
            &self.cpu,
            &self.hw,
        )
    }

    fn run(&self, trap: Option<TrapFrame>, lines: &[&str]) -> (MonitorExit, String) {
        let mut input = ScriptedInput::new(lines);
        let mut out = String::new();
        let exit = self.monitor().run(trap, &mut input, &mut out);
        (exit, out)
    }

    /// Roda esperando que um resume aconteça (o mock diverge com panic).
    fn run_until_resume(&self, trap: Option<TrapFrame>, lines: &[&str]) -> String {
        let monitor = self.monitor();
        let mut input = ScriptedInput::new(lines);
        let mut out = String::new();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            monitor.run(trap, &mut input, &mut out)
        }));
        assert!(result.is_err(), "monitor returned instead of resuming");
        out
    }
}

fn trap_at(trapno: u64, rflags: u64) -> TrapFrame {
    TrapFrame {
        trapno,
        rflags,
        rip: 0xffff_ffff_8010_00a7,
        rbp: 0x8000,
        ..TrapFrame::default()
    }
}

#[test]
fn whitespace_only_line_prints_nothing() {
    let (exit, out) = Harness::new().run(None, &["", "  \t "]);
    assert_eq!(exit, MonitorExit::EndOfInput);
    assert_eq!(out, format!("{BANNER}K> K> K> "));
}

#[test]
fn help_lists_commands_in_order() {
    let (exit, out) = Harness::new().run(None, &["help"]);
    assert_eq!(exit, MonitorExit::EndOfInput);

    let listed: Vec<&str> = out
        .lines()
        .filter_map(|l| l.trim_start_matches("K> ").split(" - ").next())
        .filter(|name| CommandSet::builtin().find(name).is_some())
        .collect();
    assert_eq!(listed, ["help", "kerninfo", "backtrace", "continue", "si"]);
    assert!(out.contains("si - Execute one instruction and return to the monitor\n"));
}

#[test]
fn unknown_and_miscased_commands_are_recovered() {
    let (exit, out) = Harness::new().run(None, &["foo bar", "HELP", "help"]);
    assert_eq!(exit, MonitorExit::EndOfInput);
    assert!(out.contains("Unknown command 'foo'\n"));
    assert!(out.contains("Unknown command 'HELP'\n"));
    assert!(out.contains("help - Display this list of commands\n"));
}

#[test]
fn too_many_arguments_runs_no_handler() {
    let line = "help 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16";
    let (exit, out) = Harness::new().run(None, &[line]);
    assert_eq!(exit, MonitorExit::EndOfInput);
    assert_eq!(out, format!("{BANNER}K> Too many arguments (max 16)\nK> "));
}

#[test]
fn long_line_is_reported_and_discarded() {
    let long = "help ".repeat(20);
    let (exit, out) = Harness::new().run(None, &[long.as_str(), "kerninfo"]);
    assert_eq!(exit, MonitorExit::EndOfInput);
    assert!(out.contains("K> Line too long (max 80)\nK> Special kernel symbols:\n"));
    assert!(!out.contains("Display this list"));
}

#[test]
fn kerninfo_prints_layout() {
    let mut harness = Harness::new();
    harness.config.layout = KernelLayout {
        start: 0x10_000c,
        entry: KERNBASE + 0x10_0000,
        etext: KERNBASE + 0x10_1000,
        edata: KERNBASE + 0x11_0000,
        end: KERNBASE + 0x11_0800,
    };
    let (_, out) = harness.run(None, &["kerninfo"]);
    assert!(out.contains("  etext  ffffffff80101000 (virt)  0000000000101000 (phys)\n"));
    assert!(out.contains("Kernel executable memory footprint: 66KB\n"));
}

#[test]
fn backtrace_prints_every_frame_and_returns_to_prompt() {
    let (exit, out) = Harness::new().run(None, &["backtrace"]);
    assert_eq!(exit, MonitorExit::EndOfInput);

    let expected = format!(
        "{BANNER}K> Stack backtrace:\n\
         {}\n{}\n{}\nK> ",
        "  rbp 0000000000008000  rip 0000000000001010  args 00000000000000a0 00000000000000a1 \
         00000000000000a2 00000000000000a3 00000000000000a4  kern/init.c:10: test_backtrace+16",
        "  rbp 0000000000008100  rip 0000000000002044  args 00000000000000b0 00000000000000b1 \
         00000000000000b2 00000000000000b3 00000000000000b4  kern/init.c:24: i386_init+68",
        "  rbp 0000000000008200  rip 0000000000003008  args 00000000000000c0 00000000000000c1 \
         00000000000000c2 00000000000000c3 00000000000000c4  kern/entry.S:30: entry+8",
    );
    assert_eq!(out, expected);
}

#[test]
fn backtrace_failure_ends_the_session() {
    let stack = SyntheticStack::chain(&[(0x8000, 0x1010), (0x8100, 0xdead)]);
    let (exit, out) = Harness::with_stack(stack).run(None, &["backtrace", "help"]);

    assert_eq!(
        exit,
        MonitorExit::CommandFailed(MonitorError::LookupFailed { addr: 0xdead })
    );
    assert_eq!(out.matches("  rbp ").count(), 1);
    assert!(out.ends_with("No debug info for address 0xdead\nCommand failed!\n"));
    assert!(!out.contains("help - "));
}

#[test]
fn backtrace_respects_configured_depth() {
    let mut harness = Harness::new();
    harness.config.max_frames = 2;
    let (exit, out) = harness.run(None, &["backtrace"]);

    assert_eq!(
        exit,
        MonitorExit::CommandFailed(MonitorError::FrameChainCorrupt { fp: 0x8200 })
    );
    assert_eq!(out.matches("  rbp ").count(), 2);
}

#[test]
fn trap_frame_is_dumped_on_entry() {
    let (_, out) = Harness::new().run(Some(trap_at(T_BRKPT, 0x202)), &[]);
    assert!(out.starts_with(BANNER));
    assert!(out.contains("TRAP frame\n"));
    assert!(out.contains("  trap 0x00000003 Breakpoint\n"));
    assert!(out.ends_with("K> "));
}

#[test]
fn continue_from_single_step_resumes_without_more_output() {
    let harness = Harness::new();
    let out = harness.run_until_resume(Some(trap_at(T_DEBUG, 0x302)), &["continue", "help"]);

    assert!(out.ends_with("K> "));
    assert!(!out.contains("help - "));

    let (mode, frame) = harness.hw.taken().expect("resumed");
    assert_eq!(mode, ResumeMode::Continue);
    assert_eq!(frame.rflags, 0x202);
    assert_eq!(frame.rip, 0xffff_ffff_8010_00a7);
}

#[test]
fn si_echoes_rip_and_arms_trap_flag() {
    let harness = Harness::new();
    let out = harness.run_until_resume(Some(trap_at(T_BRKPT, 0x202)), &["si"]);

    assert!(out.ends_with("K> Next instruction rip: 0xffffffff801000a7 0x200\n"));
    let (mode, frame) = harness.hw.taken().expect("resumed");
    assert_eq!(mode, ResumeMode::Step);
    assert_eq!(frame.rflags, 0x302);
}

#[test]
fn si_echo_follows_monitor_interrupt_flag() {
    let mut harness = Harness::new();
    harness.cpu.flags = 0x2;
    let out = harness.run_until_resume(Some(trap_at(T_BRKPT, 0x202)), &["si"]);

    assert!(out.ends_with("K> Next instruction rip: 0xffffffff801000a7 0x0\n"));
    let (_, frame) = harness.hw.taken().expect("resumed");
    assert_eq!(frame.rflags, 0x302);
}

#[test]
fn si_without_trap_fails_and_exits() {
    let harness = Harness::new();
    let lines = ["si", "help"];
    let mut input = ScriptedInput::new(&lines);
    let mut out = String::new();
    let exit = harness.monitor().run(None, &mut input, &mut out);

    assert_eq!(
        exit,
        MonitorExit::CommandFailed(MonitorError::ResumeRefused { trapno: None })
    );
    assert_eq!(
        out,
        format!("{BANNER}K> Cannot resume: no active trap\nCommand failed!\n")
    );
    assert_eq!(input.remaining(), 1);
    assert_eq!(harness.hw.taken(), None);
}

#[test]
fn continue_from_page_fault_is_refused() {
    let harness = Harness::new();
    let (exit, out) = harness.run(Some(trap_at(14, 0x202)), &["continue"]);

    assert_eq!(
        exit,
        MonitorExit::CommandFailed(MonitorError::ResumeRefused { trapno: Some(14) })
    );
    assert!(out.ends_with("K> Cannot resume from trap 14\nCommand failed!\n"));
    assert_eq!(harness.hw.taken(), None);
}

fn mon_echo(args: &ArgVec<'_>, session: &mut Session<'_>) -> Result<(), MonitorError> {
    for arg in args.as_slice().iter().skip(1) {
        cprint!(session.out, "{} ", arg);
    }
    cprintln!(session.out, "");
    Ok(())
}

static ECHO_ONLY: [Command; 1] = [Command {
    name: "echo",
    desc: "Print the arguments",
    func: mon_echo,
}];

#[test]
fn custom_command_set() {
    let mut harness = Harness::new();
    harness.commands = CommandSet::new(&ECHO_ONLY);
    let (exit, out) = harness.run(None, &["echo a  b", "help"]);

    assert_eq!(exit, MonitorExit::EndOfInput);
    assert!(out.contains("K> a b \n"));
    assert!(out.contains("Unknown command 'help'\n"));
}

#[test]
fn refused_resume_keeps_the_trap_frame() {
    let harness = Harness::new();
    let mut out = String::new();
    let mut session = Session {
        out: &mut out,
        trap: Some(trap_at(14, 0x202)),
        config: &harness.config,
        commands: &harness.commands,
        symbols: &harness.table,
        stack: &harness.stack,
        cpu: &harness.cpu,
        hw: &harness.hw,
    };

    for line in ["continue", "si", "continue"] {
        assert_eq!(
            session.runcmd(line),
            Err(MonitorError::ResumeRefused { trapno: Some(14) })
        );
        assert_eq!(session.trap.map(|f| f.trapno), Some(14));
    }
    assert_eq!(harness.hw.taken(), None);
    assert!(!out.contains("Next instruction"));
}
