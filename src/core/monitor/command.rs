//! Tabela de comandos do monitor.
//!
//! Cada monitor recebe um `CommandSet` construído explicitamente; não há
//! registro global. `CommandSet::builtin()` devolve os comandos padrão.

use super::args::ArgVec;
use super::commands;
use super::Session;
use crate::sys::MonitorError;

/// Assinatura de um handler de comando.
pub type CommandFn = fn(&ArgVec<'_>, &mut Session<'_>) -> Result<(), MonitorError>;

/// Uma entrada da tabela.
#[derive(Clone, Copy)]
pub struct Command {
    pub name: &'static str,
    pub desc: &'static str,
    pub func: CommandFn,
}

impl core::fmt::Debug for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("desc", &self.desc)
            .finish()
    }
}

/// Conjunto ordenado de comandos.
#[derive(Debug, Clone, Copy)]
pub struct CommandSet {
    commands: &'static [Command],
}

impl CommandSet {
    pub const fn new(commands: &'static [Command]) -> Self {
        Self { commands }
    }

    /// help, kerninfo, backtrace, continue, si.
    pub fn builtin() -> Self {
        Self::new(&commands::BUILTIN)
    }

    /// Busca exata e sensível a maiúsculas.
    pub fn find(&self, name: &str) -> Option<&'static Command> {
        self.commands.iter().find(|cmd| cmd.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nop(_: &ArgVec<'_>, _: &mut Session<'_>) -> Result<(), MonitorError> {
        Ok(())
    }

    static CUSTOM: [Command; 2] = [
        Command {
            name: "regs",
            desc: "Dump registers",
            func: nop,
        },
        Command {
            name: "x",
            desc: "Examine memory",
            func: nop,
        },
    ];

    #[test]
    fn builtin_set_in_order() {
        let names: Vec<&str> = CommandSet::builtin().iter().map(|c| c.name).collect();
        assert_eq!(names, ["help", "kerninfo", "backtrace", "continue", "si"]);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let set = CommandSet::builtin();
        assert!(set.find("help").is_some());
        assert!(set.find("HELP").is_none());
        assert!(set.find("hel").is_none());
        assert!(set.find("help ").is_none());
    }

    #[test]
    fn independent_sets() {
        let set = CommandSet::new(&CUSTOM);
        assert_eq!(set.len(), 2);
        assert!(set.find("x").is_some());
        assert!(set.find("help").is_none());
        assert!(CommandSet::new(&[]).is_empty());
    }
}
