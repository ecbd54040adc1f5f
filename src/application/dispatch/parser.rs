//! Command line parser - splits raw chat text into name and argument text

/// A chat line recognized as a command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    /// Command name, already case-folded
    pub name: String,
    /// Everything after the first whitespace, verbatim
    pub arg_text: &'a str,
}

/// Recognizes command invocations by their leading sigil
#[derive(Debug, Clone, Copy)]
pub struct CommandParser {
    sigil: char,
}

impl CommandParser {
    pub fn new(sigil: char) -> Self {
        Self { sigil }
    }

    pub fn sigil(&self) -> char {
        self.sigil
    }

    /// Parse a raw chat line; `None` means ordinary chat
    ///
    /// The line is trimmed first so surrounding whitespace never hides a
    /// command. The argument text after the first whitespace is kept as
    /// typed; handlers trim what they care about.
    pub fn parse<'a>(&self, text: &'a str) -> Option<CommandLine<'a>> {
        let trimmed = text.trim();
        let rest = trimmed.strip_prefix(self.sigil)?;
        match rest.split_once(char::is_whitespace) {
            Some((name, arg_text)) => Some(CommandLine {
                name: name.to_lowercase(),
                arg_text,
            }),
            None => Some(CommandLine {
                name: rest.to_lowercase(),
                arg_text: "",
            }),
        }
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new('!')
    }
}
