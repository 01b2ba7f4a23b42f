/// Arquivo: x86_64/trap.rs
///
/// Propósito: Snapshot do contexto de uma execução parada por trap.
/// Define o `TrapFrame` que espelha o estado empilhado pelo stub de entrada
/// (seletores + registradores gerais + vetor + código de erro) seguido do
/// frame de hardware consumido por `iretq`.
///
/// Detalhes de Implementação:
/// - Layout `#[repr(C)]`: a sequência de restauração em `resume.rs` faz `pop`
///   campo a campo, então a ordem aqui é ABI.
/// - `RFlags` usa a crate `bitflags`; bits desconhecidos são preservados.
use bitflags::bitflags;
use core::fmt;

/// Vetor de `#DB` (debug / single-step).
pub const T_DEBUG: u64 = 1;
/// Vetor de `#BP` (`int3`).
pub const T_BRKPT: u64 = 3;

bitflags! {
    /// Registrador RFLAGS.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RFlags: u64 {
        /// Carry.
        const CF   = 1 << 0;
        /// Bit reservado, sempre 1.
        const RESERVED_1 = 1 << 1;
        const PF   = 1 << 2;
        const AF   = 1 << 4;
        const ZF   = 1 << 6;
        const SF   = 1 << 7;
        /// Trap Flag: single-step.
        const TF   = 1 << 8;
        /// Interrupt Enable.
        const IF   = 1 << 9;
        const DF   = 1 << 10;
        const OF   = 1 << 11;
        const IOPL = 0b11 << 12;
        const NT   = 1 << 14;
        /// Resume Flag: suprime `#DB` de breakpoint de instrução.
        const RF   = 1 << 16;
        const VM   = 1 << 17;
        const AC   = 1 << 18;
        const VIF  = 1 << 19;
        const VIP  = 1 << 20;
        const ID   = 1 << 21;
    }
}

/// Causa do trap, derivada de `TrapFrame::trapno`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapCause {
    /// `int3` (vetor 3).
    Breakpoint,
    /// `#DB` (vetor 1), gerado pelo TF armado.
    SingleStep,
    /// Qualquer outro vetor.
    Other(u64),
}

impl TrapCause {
    pub const fn from_vector(vector: u64) -> Self {
        match vector {
            T_BRKPT => TrapCause::Breakpoint,
            T_DEBUG => TrapCause::SingleStep,
            v => TrapCause::Other(v),
        }
    }

    /// Só breakpoint e single-step podem ser retomados pelo monitor.
    pub const fn is_resumable(self) -> bool {
        matches!(self, TrapCause::Breakpoint | TrapCause::SingleStep)
    }
}

/// Estado salvo da execução parada.
/// Deve corresponder EXATAMENTE à ordem de push do stub de entrada.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapFrame {
    // Seletores de segmento (salvos pelo stub)
    pub es: u64,
    pub ds: u64,

    // Registradores gerais (salvos pelo stub)
    pub r15: u64,
    pub r14: u64,
    pub r13: u64,
    pub r12: u64,
    pub r11: u64,
    pub r10: u64,
    pub r9: u64,
    pub r8: u64,
    pub rdi: u64,
    pub rsi: u64,
    pub rbp: u64,
    pub rdx: u64,
    pub rcx: u64,
    pub rbx: u64,
    pub rax: u64,

    // Identificação do trap
    pub trapno: u64,
    pub error_code: u64,

    // Frame de Hardware (iretq)
    pub rip: u64,
    pub cs: u64,
    pub rflags: u64,
    pub rsp: u64,
    pub ss: u64,
}

impl TrapFrame {
    pub fn cause(&self) -> TrapCause {
        TrapCause::from_vector(self.trapno)
    }

    pub fn flags(&self) -> RFlags {
        RFlags::from_bits_retain(self.rflags)
    }
}

/// Nome legível de um vetor de exceção.
pub fn trap_name(vector: u64) -> &'static str {
    const EXCNAMES: [&str; 20] = [
        "Divide error",
        "Debug",
        "Non-Maskable Interrupt",
        "Breakpoint",
        "Overflow",
        "BOUND Range Exceeded",
        "Invalid Opcode",
        "Device Not Available",
        "Double Fault",
        "Coprocessor Segment Overrun",
        "Invalid TSS",
        "Segment Not Present",
        "Stack Fault",
        "General Protection",
        "Page Fault",
        "(unknown trap)",
        "x87 FPU Floating-Point Error",
        "Alignment Check",
        "Machine-Check",
        "SIMD Floating-Point Exception",
    ];

    match EXCNAMES.get(vector as usize) {
        Some(name) => name,
        None if vector >= 32 && vector < 256 => "Hardware Interrupt",
        None => "(unknown trap)",
    }
}

impl fmt::Display for TrapFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TRAP frame")?;
        let regs: [(&str, u64); 15] = [
            ("r15", self.r15),
            ("r14", self.r14),
            ("r13", self.r13),
            ("r12", self.r12),
            ("r11", self.r11),
            ("r10", self.r10),
            ("r9 ", self.r9),
            ("r8 ", self.r8),
            ("rdi", self.rdi),
            ("rsi", self.rsi),
            ("rbp", self.rbp),
            ("rdx", self.rdx),
            ("rcx", self.rcx),
            ("rbx", self.rbx),
            ("rax", self.rax),
        ];
        for (name, value) in regs {
            writeln!(f, "  {}  0x{:016x}", name, value)?;
        }
        writeln!(f, "  es   0x----{:04x}", self.es as u16)?;
        writeln!(f, "  ds   0x----{:04x}", self.ds as u16)?;
        writeln!(f, "  trap 0x{:08x} {}", self.trapno, trap_name(self.trapno))?;
        writeln!(f, "  err  0x{:08x}", self.error_code)?;
        writeln!(f, "  rip  0x{:016x}", self.rip)?;
        writeln!(f, "  cs   0x----{:04x}", self.cs as u16)?;
        writeln!(f, "  flag 0x{:016x}", self.rflags)?;
        writeln!(f, "  rsp  0x{:016x}", self.rsp)?;
        writeln!(f, "  ss   0x----{:04x}", self.ss as u16)
    }
}
