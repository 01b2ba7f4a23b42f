//! # Kernel Driver Layer
//!
//! O monitor só depende de um driver: a UART COM1.
//!
//! | Driver   | Arquivo      | Uso |
//! |----------|--------------|-----|
//! | Serial   | `serial.rs`  | Logs do kernel + console interativo `K> ` |
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Monitor (kmon)                 │
//! │  - kinfo!/kerror!  → serial::emit_*         │
//! │  - saída formatada → serial::SerialWriter   │
//! │  - linha de comando← serial::read_byte      │
//! └─────────────────────────────────────────────┘
//! ```

pub mod serial; // UART 16550 - Logs + console
