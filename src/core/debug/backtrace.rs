/// Arquivo: core/debug/backtrace.rs
///
/// Propósito: Stack backtrace por frame pointers.
/// Percorre a cadeia de RBP da execução parada e resolve cada endereço de
/// retorno via `DebugInfoResolver`.
///
/// Layout de um frame (x86_64, `-C force-frame-pointers=yes`):
///
/// ```text
///   fp + 56  ┌──────────────┐
///            │ arg 4        │
///   ...      │ ...          │
///   fp + 16  │ arg 0        │
///   fp + 8   │ return addr  │
///   fp       │ saved fp ────┼──► frame do chamador (endereço maior)
///            └──────────────┘
/// ```
///
/// Detalhes de Implementação:
/// - `StackWalker` é um iterador preguiçoso, finito e não reiniciável.
/// - A memória é lida via `StackMemory`, nunca por ponteiro cru direto:
///   testes injetam stacks sintéticas.
/// - Guarda contra cadeias corrompidas: o próximo frame pointer precisa ser
///   estritamente maior que o atual, e a profundidade é limitada.
use core::fmt;
use core::mem::size_of;
use core::ops::Range;
use core::ptr::NonNull;

use volatile::VolatilePtr;

use super::debuginfo::{DebugInfo, DebugInfoResolver};
use crate::klib::is_aligned;
use crate::sys::MonitorError;

/// Tamanho de uma palavra da stack.
pub const WORD: usize = size_of::<usize>();

/// Quantos argumentos são lidos de cada frame.
pub const FRAME_ARGS: usize = 5;

/// Limite padrão de frames antes de declarar a cadeia corrompida.
pub const DEFAULT_MAX_FRAMES: usize = 256;

/// Leitura somente-leitura da memória da execução parada.
pub trait StackMemory {
    /// Lê a palavra em `addr`; `None` se o endereço não é legível.
    fn read_word(&self, addr: usize) -> Option<usize>;
}

/// Memória real do kernel, limitada a uma faixa (a stack da execução parada).
pub struct LiveStack {
    bounds: Range<usize>,
}

impl LiveStack {
    /// # Safety
    /// Toda palavra alinhada em `bounds` deve estar mapeada e legível
    /// enquanto o `LiveStack` existir.
    pub const unsafe fn new(bounds: Range<usize>) -> Self {
        Self { bounds }
    }
}

impl StackMemory for LiveStack {
    fn read_word(&self, addr: usize) -> Option<usize> {
        if !is_aligned(addr, WORD) || addr < self.bounds.start {
            return None;
        }
        if addr.checked_add(WORD)? > self.bounds.end {
            return None;
        }
        let ptr = NonNull::new(addr as *mut usize)?;
        // SAFETY: `addr` está alinhado e dentro de `bounds`, que o construtor
        // garante ser legível.
        let word = unsafe { VolatilePtr::new_read_only(ptr) }.read();
        Some(word)
    }
}

/// Um frame resolvido. Efêmero: existe só enquanto é impresso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackFrame<'a> {
    /// Valor do frame pointer deste frame.
    pub fp: usize,
    /// Endereço de retorno para o chamador.
    pub ret: usize,
    /// Argumentos lidos da stack; `None` se ilegíveis.
    pub args: [Option<usize>; FRAME_ARGS],
    pub info: DebugInfo<'a>,
}

impl StackFrame<'_> {
    /// `ret - início da função`.
    pub fn offset(&self) -> usize {
        self.info.offset(self.ret)
    }
}

impl fmt::Display for StackFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  rbp {:016x}  rip {:016x}  args", self.fp, self.ret)?;
        for arg in self.args {
            match arg {
                Some(word) => write!(f, " {:016x}", word)?,
                None => f.write_str(" ????????????????")?,
            }
        }
        write!(
            f,
            "  {}:{}: {}+{}",
            self.info.file,
            self.info.line,
            self.info.name(),
            self.offset()
        )
    }
}

/// Iterador sobre a cadeia de frame pointers, do frame mais interno para fora.
///
/// Termina com `None` ao encontrar o sentinela `0`. Qualquer erro é emitido
/// uma única vez como `Some(Err(..))` e encerra o walk.
pub struct StackWalker<'a> {
    mem: &'a dyn StackMemory,
    resolver: &'a dyn DebugInfoResolver,
    fp: usize,
    /// Frame pointer do último frame emitido (0 antes do primeiro).
    prev_fp: usize,
    depth: usize,
    max_frames: usize,
    /// Erro detectado ao avançar, emitido na próxima chamada.
    pending: Option<MonitorError>,
    done: bool,
}

impl<'a> StackWalker<'a> {
    pub fn new(fp: usize, mem: &'a dyn StackMemory, resolver: &'a dyn DebugInfoResolver) -> Self {
        Self {
            mem,
            resolver,
            fp,
            prev_fp: 0,
            depth: 0,
            max_frames: DEFAULT_MAX_FRAMES,
            pending: None,
            done: false,
        }
    }

    /// Limite de profundidade (guarda contra cadeias sem sentinela).
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Quantos frames já foram emitidos.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn read(&self, addr: usize) -> Result<usize, MonitorError> {
        self.mem
            .read_word(addr)
            .ok_or(MonitorError::StackFault { addr })
    }

    fn slot(fp: usize, index: usize) -> Option<usize> {
        fp.checked_add(index.checked_mul(WORD)?)
    }

    fn check_link(&self) -> Result<(), MonitorError> {
        if self.depth > 0 && self.fp <= self.prev_fp {
            // Cadeia não monotônica: ciclo ou lixo na stack
            return Err(MonitorError::FrameChainCorrupt { fp: self.fp });
        }
        if self.depth >= self.max_frames {
            return Err(MonitorError::FrameChainCorrupt { fp: self.fp });
        }
        Ok(())
    }

    fn walk_frame(&mut self) -> Result<StackFrame<'a>, MonitorError> {
        let fp = self.fp;
        self.check_link()?;

        let ret_slot = Self::slot(fp, 1).ok_or(MonitorError::StackFault { addr: fp })?;
        let ret = self.read(ret_slot)?;

        let mut args = [None; FRAME_ARGS];
        for (i, arg) in args.iter_mut().enumerate() {
            *arg = Self::slot(fp, 2 + i).and_then(|addr| self.mem.read_word(addr));
        }

        let resolver: &'a dyn DebugInfoResolver = self.resolver;
        let info = resolver.lookup(ret)?;

        // Avança já; se o link for ilegível o frame atual ainda é emitido
        match self.read(fp) {
            Ok(next) => {
                self.prev_fp = fp;
                self.fp = next;
            }
            Err(err) => self.pending = Some(err),
        }
        self.depth += 1;

        crate::ktrace!("(Backtrace) frame rip=", ret);
        Ok(StackFrame { fp, ret, args, info })
    }
}

impl<'a> Iterator for StackWalker<'a> {
    type Item = Result<StackFrame<'a>, MonitorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(err) = self.pending.take() {
            self.done = true;
            return Some(Err(err));
        }
        if self.fp == 0 {
            self.done = true;
            return None;
        }

        let frame = self.walk_frame();
        if frame.is_err() {
            self.done = true;
        }
        Some(frame)
    }
}

impl core::iter::FusedIterator for StackWalker<'_> {}
