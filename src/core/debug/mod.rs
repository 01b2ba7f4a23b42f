//! Depuração: resolução simbólica e backtrace por frame pointers.

pub mod backtrace;
pub mod debuginfo;

pub use backtrace::{LiveStack, StackFrame, StackMemory, StackWalker};
pub use debuginfo::{DebugInfo, DebugInfoResolver, FunctionSymbol, LineEntry, SymbolTable};
