use crate::command::Command;
use crate::identifier::Identifier;

/// A named, ordered list of commands; one `.mcfunction` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    id: Identifier,
    commands: Vec<Command>,
}

impl Function {
    /// An empty function.
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            commands: Vec::new(),
        }
    }

    /// The function's identifier.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Commands in execution order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Append one command.
    pub fn push(&mut self, command: impl Into<Command>) {
        self.commands.push(command.into());
    }

    /// Append several commands.
    pub fn extend(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.commands.extend(commands);
    }

    /// Insert commands before everything already present.
    pub fn prepend(&mut self, commands: impl IntoIterator<Item = Command>) {
        let tail = std::mem::take(&mut self.commands);
        self.commands.extend(commands);
        self.commands.extend(tail);
    }

    /// Drop every command after the first `len`.
    pub fn truncate(&mut self, len: usize) {
        self.commands.truncate(len);
    }

    /// Whether the function has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// File contents: one line per command, newline terminated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            out.push_str(&command.to_string());
            out.push('\n');
        }
        out
    }
}
