/// Arquivo: core/debug/debuginfo.rs
///
/// Propósito: Resolução de endereço de código → informação simbólica
/// (arquivo, linha, função, início da função).
///
/// Detalhes de Implementação:
/// - `DebugInfoResolver` é a interface que o backtrace consome. O banco de
///   símbolos real é externo ao monitor.
/// - `SymbolTable` é a implementação por tabela: funções ordenadas por endereço
///   e, para cada uma, sua tabela de linhas. Nomes seguem o formato stabs
///   (`nome:F(0,1)`), por isso `DebugInfo` carrega o nome cru + comprimento.
use crate::klib::string::bounded_prefix;
use crate::sys::MonitorError;

/// Informação simbólica de um endereço de código.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugInfo<'a> {
    /// Arquivo fonte.
    pub file: &'a str,
    /// Linha no arquivo fonte.
    pub line: u32,
    /// Nome da função como armazenado (pode ter sufixo, ex: `:F(0,1)`).
    pub fn_name: &'a str,
    /// Quantos bytes de `fn_name` formam o nome de fato.
    pub fn_name_len: usize,
    /// Endereço de início da função.
    pub fn_addr: usize,
}

impl<'a> DebugInfo<'a> {
    /// Nome da função (prefixo limitado por `fn_name_len`).
    pub fn name(&self) -> &'a str {
        bounded_prefix(self.fn_name, self.fn_name_len)
    }

    /// Deslocamento de `addr` dentro da função.
    pub fn offset(&self, addr: usize) -> usize {
        addr.wrapping_sub(self.fn_addr)
    }
}

/// Consulta de informação de debug por endereço.
pub trait DebugInfoResolver {
    /// Falha com `LookupFailed` se `addr` está fora das faixas de código conhecidas.
    fn lookup(&self, addr: usize) -> Result<DebugInfo<'_>, MonitorError>;
}

/// Uma entrada da tabela de linhas: a partir de `addr`, o código é da linha `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEntry {
    pub addr: usize,
    pub line: u32,
}

/// Uma função conhecida, cobrindo `[start, end)`.
#[derive(Debug, Clone, Copy)]
pub struct FunctionSymbol<'a> {
    pub name: &'a str,
    pub file: &'a str,
    pub start: usize,
    pub end: usize,
    /// Ordenada por `addr`.
    pub lines: &'a [LineEntry],
}

impl<'a> FunctionSymbol<'a> {
    /// Comprimento do nome sem o sufixo de tipo stabs.
    fn name_len(&self) -> usize {
        self.name.find(':').unwrap_or(self.name.len())
    }

    fn contains(&self, addr: usize) -> bool {
        self.start <= addr && addr < self.end
    }
}

/// Resolvedor por tabela de símbolos.
pub struct SymbolTable<'a> {
    functions: &'a [FunctionSymbol<'a>],
}

impl<'a> SymbolTable<'a> {
    /// `functions` deve estar ordenada por `start` e sem sobreposição.
    pub fn new(functions: &'a [FunctionSymbol<'a>]) -> Self {
        debug_assert!(functions.windows(2).all(|w| w[0].end <= w[1].start));
        Self { functions }
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Função que contém `addr`, por busca binária.
    fn find_function(&self, addr: usize) -> Option<&FunctionSymbol<'a>> {
        let idx = self.functions.partition_point(|f| f.start <= addr);
        let func = self.functions.get(idx.checked_sub(1)?)?;
        func.contains(addr).then_some(func)
    }
}

impl DebugInfoResolver for SymbolTable<'_> {
    fn lookup(&self, addr: usize) -> Result<DebugInfo<'_>, MonitorError> {
        let func = self
            .find_function(addr)
            .ok_or(MonitorError::LookupFailed { addr })?;

        // Última entrada de linha que começa em ou antes de `addr`
        let idx = func.lines.partition_point(|l| l.addr <= addr);
        let entry = idx
            .checked_sub(1)
            .and_then(|i| func.lines.get(i))
            .filter(|l| func.contains(l.addr))
            .ok_or(MonitorError::LookupFailed { addr })?;

        Ok(DebugInfo {
            file: func.file,
            line: entry.line,
            fn_name: func.name,
            fn_name_len: func.name_len(),
            fn_addr: func.start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INIT_LINES: [LineEntry; 3] = [
        LineEntry { addr: 0x1000, line: 10 },
        LineEntry { addr: 0x1010, line: 12 },
        LineEntry { addr: 0x1040, line: 20 },
    ];
    const MON_LINES: [LineEntry; 1] = [LineEntry { addr: 0x1108, line: 61 }];

    const FUNCS: [FunctionSymbol<'static>; 2] = [
        FunctionSymbol {
            name: "i386_init:F(0,1)",
            file: "kern/init.c",
            start: 0x1000,
            end: 0x1100,
            lines: &INIT_LINES,
        },
        FunctionSymbol {
            name: "mon_backtrace",
            file: "kern/monitor.c",
            start: 0x1100,
            end: 0x1200,
            lines: &MON_LINES,
        },
    ];

    #[test]
    fn resolves_file_line_and_bounded_name() {
        let table = SymbolTable::new(&FUNCS);
        let info = table.lookup(0x1015).expect("inside i386_init");
        assert_eq!(info.file, "kern/init.c");
        assert_eq!(info.line, 12);
        assert_eq!(info.fn_name, "i386_init:F(0,1)");
        assert_eq!(info.fn_name_len, 9);
        assert_eq!(info.name(), "i386_init");
        assert_eq!(info.fn_addr, 0x1000);
        assert_eq!(info.offset(0x1015), 0x15);
    }

    #[test]
    fn function_boundaries_are_half_open() {
        let table = SymbolTable::new(&FUNCS);
        assert_eq!(table.lookup(0x10ff).unwrap().name(), "i386_init");
        assert_eq!(table.lookup(0x1180).unwrap().name(), "mon_backtrace");
        assert_eq!(
            table.lookup(0x1200),
            Err(MonitorError::LookupFailed { addr: 0x1200 })
        );
        assert_eq!(
            table.lookup(0xfff),
            Err(MonitorError::LookupFailed { addr: 0xfff })
        );
    }

    #[test]
    fn address_before_first_line_entry_is_unresolvable() {
        // mon_backtrace começa em 0x1100, mas a primeira linha só em 0x1108
        let table = SymbolTable::new(&FUNCS);
        assert_eq!(
            table.lookup(0x1104),
            Err(MonitorError::LookupFailed { addr: 0x1104 })
        );
        assert_eq!(table.lookup(0x1108).unwrap().line, 61);
    }

    #[test]
    fn empty_table_resolves_nothing() {
        let table = SymbolTable::new(&[]);
        assert!(table.is_empty());
        assert!(table.lookup(0x1000).is_err());
    }
}
