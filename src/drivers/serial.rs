// =============================================================================
// SERIAL DRIVER - COM1
// =============================================================================
//
// Driver de Porta Serial (COM1) usado pelo monitor para duas coisas:
// - Logs do kernel (macros kinfo!/kerror!/... via emit_*)
// - Console interativo (SerialWriter para saída, try_read_byte para entrada)
//
// ARQUITETURA:
// - emit_*: SEM core::fmt, SEM alocação. Apenas bytes e valores imediatos.
// - SerialWriter: implementa core::fmt::Write para a saída formatada do monitor.
// - Sob cfg(test) os bytes vão para um buffer em memória (CAPTURE) em vez
//   das portas de I/O, que exigem Ring 0.
//
// NOTA IMPORTANTE:
// Este driver NÃO garante exclusão mútua entre CPUs para emit_*. Em ambiente
// SMP, os logs podem se intercalar. Isso é aceitável para debugging.
//
// =============================================================================

use core::fmt;

// =============================================================================
// BACKEND
// =============================================================================

#[cfg(not(test))]
mod backend {
    use crate::arch::x86_64::ports::Port;

    /// Registradores da UART 16550 na COM1.
    const DATA: Port = Port::new(0x3F8);
    const INT_ENABLE: Port = DATA.offset(1);
    const FIFO_CTRL: Port = DATA.offset(2);
    const LINE_CTRL: Port = DATA.offset(3);
    const MODEM_CTRL: Port = DATA.offset(4);
    const LINE_STATUS: Port = DATA.offset(5);

    // LSR bit 0: dado recebido disponível
    const LSR_DATA_READY: u8 = 0x01;
    // LSR bit 5: buffer de transmissão vazio
    const LSR_THR_EMPTY: u8 = 0x20;

    pub fn init() {
        // Sem IRQ: o monitor faz polling
        INT_ENABLE.write(0x00);
        // DLAB ligado para programar o divisor
        LINE_CTRL.write(0x80);
        // Divisor 3 = 38400 baud (lo, hi)
        DATA.write(0x03);
        INT_ENABLE.write(0x00);
        // 8N1, DLAB desligado
        LINE_CTRL.write(0x03);
        // FIFO habilitado e limpo, gatilho de 14 bytes
        FIFO_CTRL.write(0xC7);
        // DTR + RTS
        MODEM_CTRL.write(0x03);
    }

    #[inline(always)]
    pub fn put(byte: u8) {
        while LINE_STATUS.read() & LSR_THR_EMPTY == 0 {
            core::hint::spin_loop();
        }
        DATA.write(byte);
    }

    #[inline]
    pub fn get() -> Option<u8> {
        if LINE_STATUS.read() & LSR_DATA_READY == 0 {
            return None;
        }
        Some(DATA.read())
    }
}

#[cfg(test)]
mod backend {
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Bytes "transmitidos" durante os testes.
    pub static CAPTURE: spin::Mutex<Vec<u8>> = spin::Mutex::new(Vec::new());
    /// Bytes "recebidos" (injetados pelos testes).
    pub static RX: spin::Mutex<VecDeque<u8>> = spin::Mutex::new(VecDeque::new());

    pub fn init() {}

    pub fn put(byte: u8) {
        CAPTURE.lock().push(byte);
    }

    pub fn get() -> Option<u8> {
        RX.lock().pop_front()
    }
}

#[cfg(test)]
pub(crate) use backend::RX;

// =============================================================================
// FUNÇÕES DE INICIALIZAÇÃO
// =============================================================================

/// Inicializa a porta serial COM1 (UART 16550).
///
/// Deve ser chamada uma vez antes do primeiro `Monitor::run`.
/// Configura: 38400 baud, 8N1, FIFO habilitado, sem IRQ.
pub fn init() {
    backend::init();
}

// =============================================================================
// FUNÇÕES DE ESCRITA - CORE
// =============================================================================

/// Envia um único byte para a porta serial.
#[inline(always)]
pub fn emit(byte: u8) {
    backend::put(byte);
}

/// Envia uma string para a porta serial.
#[inline(never)]
pub fn emit_str(s: &str) {
    for byte in s.bytes() {
        emit(byte);
    }
}

/// Envia uma nova linha (CRLF) para a porta serial.
#[inline(never)]
pub fn emit_nl() {
    emit(b'\r');
    emit(b'\n');
}

// =============================================================================
// FUNÇÕES DE ESCRITA - FORMATAÇÃO NUMÉRICA
// =============================================================================

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
#[inline(never)]
pub fn emit_hex(value: u64) {
    emit(b'0');
    emit(b'x');
    for shift in (0..16).rev() {
        emit(nibble_to_ascii(((value >> (shift * 4)) & 0xF) as u8));
    }
}

// =============================================================================
// LEITURA
// =============================================================================

/// Lê um byte se houver dado disponível (não bloqueia).
#[inline]
pub fn try_read_byte() -> Option<u8> {
    backend::get()
}

/// Lê um byte, esperando até que chegue.
pub fn read_byte() -> u8 {
    loop {
        if let Some(byte) = try_read_byte() {
            return byte;
        }
        core::hint::spin_loop();
    }
}

// =============================================================================
// SAÍDA FORMATADA
// =============================================================================

/// Saída do console do monitor sobre a COM1.
///
/// Converte `\n` em CRLF, como `emit_nl`.
pub struct SerialWriter;

impl fmt::Write for SerialWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                emit_nl();
            } else {
                emit(byte);
            }
        }
        Ok(())
    }
}

// =============================================================================
// FUNÇÕES AUXILIARES
// =============================================================================

/// Converte nibble (0-15) para caractere ASCII ('0'-'9', 'A'-'F').
#[inline(always)]
const fn nibble_to_ascii(n: u8) -> u8 {
    if n < 10 {
        b'0' + n
    } else {
        b'A' + (n - 10)
    }
}
