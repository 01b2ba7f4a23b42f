// =============================================================================
// KERNEL LOGGING - ZERO OVERHEAD
// =============================================================================
//
// Logs do monitor na COM1, removíveis em compile-time.
//
// ARQUITETURA:
// - Usa features do Cargo para filtrar níveis em compile-time
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt nos logs: apenas string literal + valor hex
// - Escreve APENAS na serial, nunca na saída do console `K> `
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: backtrace abortado, resume recusado
// - WARN:  linha/argumentos além da capacidade, comando desconhecido
// - INFO:  entrada/saída do monitor
// - DEBUG: modo e RIP do resume, profundidade do backtrace
// - TRACE: cada frame visitado, cada linha lida
//
// FEATURES:
// - no_logs:   Remove 100% dos logs
// - log_info:  ERROR, WARN, INFO, DEBUG
// - log_trace: Todos os níveis (padrão)
//
// USO:
//   kinfo!("(Monitor) Entrando...");          // Apenas string
//   kerror!("(Backtrace) Lookup falhou rip=", rip); // String + hex
//
// =============================================================================

use crate::drivers::serial;

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

/// Emite `prefixo + mensagem + CRLF`.
#[doc(hidden)]
#[inline(never)]
pub fn line(prefix: &str, msg: &str) {
    serial::emit_str(prefix);
    serial::emit_str(msg);
    serial::emit_nl();
}

/// Emite `prefixo + mensagem + 0x<valor> + CRLF`.
#[doc(hidden)]
#[inline(never)]
pub fn line_hex(prefix: &str, msg: &str, value: u64) {
    serial::emit_str(prefix);
    serial::emit_str(msg);
    serial::emit_hex(value);
    serial::emit_nl();
}

// =============================================================================
// ERROR / WARN / INFO - Ativos exceto com no_logs
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($msg:expr) => {
        $crate::core::logging::line($crate::core::logging::P_ERROR, $msg)
    };
    ($msg:expr, $val:expr) => {
        $crate::core::logging::line_hex($crate::core::logging::P_ERROR, $msg, $val as u64)
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($msg:expr) => {
        $crate::core::logging::line($crate::core::logging::P_WARN, $msg)
    };
    ($msg:expr, $val:expr) => {
        $crate::core::logging::line_hex($crate::core::logging::P_WARN, $msg, $val as u64)
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kinfo {
    ($msg:expr) => {
        $crate::core::logging::line($crate::core::logging::P_INFO, $msg)
    };
    ($msg:expr, $val:expr) => {
        $crate::core::logging::line_hex($crate::core::logging::P_INFO, $msg, $val as u64)
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// DEBUG - Ativo apenas com log_trace ou log_info
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_trace", feature = "log_info")
))]
#[macro_export]
macro_rules! kdebug {
    ($msg:expr) => {
        $crate::core::logging::line($crate::core::logging::P_DEBUG, $msg)
    };
    ($msg:expr, $val:expr) => {
        $crate::core::logging::line_hex($crate::core::logging::P_DEBUG, $msg, $val as u64)
    };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_trace", feature = "log_info")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// TRACE - Ativo apenas com log_trace
// =============================================================================

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($msg:expr) => {
        $crate::core::logging::line($crate::core::logging::P_TRACE, $msg)
    };
    ($msg:expr, $val:expr) => {
        $crate::core::logging::line_hex($crate::core::logging::P_TRACE, $msg, $val as u64)
    };
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($msg:expr) => {
        $crate::core::logging::line("\x1b[32m[OK]\x1b[0m ", $msg)
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

/// kfail! - Log de falha (prefixo vermelho [FAIL]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kfail {
    ($msg:expr) => {
        $crate::core::logging::line("\x1b[1;31m[FAIL]\x1b[0m ", $msg)
    };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kfail {
    ($($t:tt)*) => {{}};
}
