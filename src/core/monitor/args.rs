//! Tokenização da linha de comando em um vetor de argumentos limitado.

use crate::klib::string::Tokenizer;
use crate::sys::MonitorError;

/// Máximo de tokens por linha (incluindo o nome do comando).
pub const MAX_ARGS: usize = 16;

/// Argumentos de uma linha, emprestados do buffer de entrada.
#[derive(Debug, Clone, Copy)]
pub struct ArgVec<'a> {
    argv: [&'a str; MAX_ARGS],
    argc: usize,
}

impl<'a> ArgVec<'a> {
    /// Separa `line` em tokens por whitespace.
    ///
    /// O 17º token é erro: nenhum handler deve rodar com argumentos truncados.
    pub fn parse(line: &'a str) -> Result<Self, MonitorError> {
        let mut args = Self {
            argv: [""; MAX_ARGS],
            argc: 0,
        };
        for token in Tokenizer::whitespace(line) {
            if args.argc == MAX_ARGS {
                crate::kwarn!("(Monitor) Argumentos demais, max=", MAX_ARGS);
                return Err(MonitorError::TooManyArgs { max: MAX_ARGS });
            }
            args.argv[args.argc] = token;
            args.argc += 1;
        }
        Ok(args)
    }

    pub fn len(&self) -> usize {
        self.argc
    }

    pub fn is_empty(&self) -> bool {
        self.argc == 0
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.argv[..self.argc]
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.as_slice().get(index).copied()
    }

    /// Nome do comando (primeiro token).
    pub fn command(&self) -> Option<&'a str> {
        self.get(0)
    }
}
