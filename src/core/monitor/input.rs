/// Arquivo: core/monitor/input.rs
///
/// Propósito: Leitura de uma linha de comando por vez.
///
/// Detalhes de Implementação:
/// - `LineBuffer` tem capacidade fixa (`CMDBUF_SIZE`). Estouro vira
///   `LineTooLong`: a linha inteira é descartada, nunca truncada.
/// - `SerialConsole` faz polling da COM1 com eco e backspace.
/// - `ScriptedInput` entrega linhas prontas (testes, scripts de boot).
use crate::drivers::serial;
use crate::sys::MonitorError;

/// Capacidade do buffer de comando, em bytes.
pub const CMDBUF_SIZE: usize = 80;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;

/// Buffer de linha sem alocação.
pub struct LineBuffer {
    bytes: [u8; CMDBUF_SIZE],
    len: usize,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; CMDBUF_SIZE],
            len: 0,
        }
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Acrescenta um byte ASCII.
    pub fn push(&mut self, byte: u8) -> Result<(), MonitorError> {
        if !byte.is_ascii() {
            return Ok(());
        }
        let slot = self
            .bytes
            .get_mut(self.len)
            .ok_or(MonitorError::LineTooLong { max: CMDBUF_SIZE })?;
        *slot = byte;
        self.len += 1;
        Ok(())
    }

    /// Acrescenta uma string inteira ou nada.
    pub fn push_str(&mut self, s: &str) -> Result<(), MonitorError> {
        let end = self.len + s.len();
        let dst = self
            .bytes
            .get_mut(self.len..end)
            .ok_or(MonitorError::LineTooLong { max: CMDBUF_SIZE })?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }

    /// Remove o último byte. `false` se o buffer já estava vazio.
    pub fn pop(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        true
    }

    pub fn as_str(&self) -> &str {
        // Só entram bytes ASCII ou strings inteiras: sempre UTF-8 válido
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or("")
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fonte de linhas de comando.
pub trait LineSource {
    /// Lê a próxima linha em `buf`.
    ///
    /// `None` indica fim da entrada; `Some(Err(LineTooLong))` indica uma linha
    /// descartada por estouro.
    fn read_line<'b>(&mut self, buf: &'b mut LineBuffer) -> Option<Result<&'b str, MonitorError>>;
}

/// Console interativo sobre a COM1.
pub struct SerialConsole;

impl SerialConsole {
    fn erase() {
        serial::emit(BACKSPACE);
        serial::emit(b' ');
        serial::emit(BACKSPACE);
    }
}

impl LineSource for SerialConsole {
    fn read_line<'b>(&mut self, buf: &'b mut LineBuffer) -> Option<Result<&'b str, MonitorError>> {
        buf.clear();
        let mut overflow = false;

        loop {
            match serial::read_byte() {
                b'\r' | b'\n' => {
                    serial::emit_nl();
                    break;
                }
                BACKSPACE | DELETE => {
                    if !overflow && buf.pop() {
                        Self::erase();
                    }
                }
                byte @ (b'\t' | b' '..=b'~') => {
                    if overflow {
                        continue;
                    }
                    match buf.push(byte) {
                        Ok(()) => serial::emit(byte),
                        Err(_) => overflow = true,
                    }
                }
                _ => {}
            }
        }

        if overflow {
            crate::kwarn!("(Monitor) Linha descartada, max=", CMDBUF_SIZE);
            return Some(Err(MonitorError::LineTooLong { max: CMDBUF_SIZE }));
        }
        crate::ktrace!("(Monitor) Linha lida, bytes=", buf.len());
        Some(Ok(buf.as_str()))
    }
}

/// Linhas fixas, entregues em ordem; depois, fim da entrada.
pub struct ScriptedInput<'a> {
    lines: &'a [&'a str],
    next: usize,
}

impl<'a> ScriptedInput<'a> {
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, next: 0 }
    }

    /// Linhas ainda não lidas.
    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.next)
    }
}

impl LineSource for ScriptedInput<'_> {
    fn read_line<'b>(&mut self, buf: &'b mut LineBuffer) -> Option<Result<&'b str, MonitorError>> {
        let line = self.lines.get(self.next)?;
        self.next += 1;

        buf.clear();
        if let Err(err) = buf.push_str(line) {
            crate::kwarn!("(Monitor) Linha descartada, max=", CMDBUF_SIZE);
            return Some(Err(err));
        }
        Some(Ok(buf.as_str()))
    }
}
