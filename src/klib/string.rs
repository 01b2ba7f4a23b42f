/// Arquivo: klib/string.rs
///
/// Propósito: Manipulação de strings de baixo nível.
/// Útil para linha de comando do monitor e nomes de símbolos.
///
/// Detalhes de Implementação:
/// - Sem alocação: tudo retorna fatias (`&str`) da entrada.

/// Separadores de argumento da linha de comando.
pub const WHITESPACE: &str = "\t\r\n ";

/// Tokenizer que pula separadores consecutivos (nunca produz token vazio).
///
/// Versão segura do `strtok`: a string original não é alterada.
pub struct Tokenizer<'a> {
    rest: &'a str,
    delims: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(s: &'a str, delims: &'a str) -> Self {
        Self { rest: s, delims }
    }

    /// Tokenizer sobre `WHITESPACE`.
    pub fn whitespace(s: &'a str) -> Self {
        Self::new(s, WHITESPACE)
    }

    fn is_delim(&self, c: char) -> bool {
        self.delims.contains(c)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let all: &'a str = self.rest;
        // Pular separadores
        let start = all.find(|c| !self.is_delim(c))?;
        let rest = &all[start..];

        let end = rest.find(|c| self.is_delim(c)).unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        self.rest = tail;
        Some(token)
    }
}

/// Prefixo de `s` com no máximo `len` bytes, sem cortar um caractere UTF-8.
pub fn bounded_prefix(s: &str, len: usize) -> &str {
    if len >= s.len() {
        return s;
    }
    let mut end = len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
