//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Definition accepted by a preprocessor
    DefinitionLoaded,
    /// Definition failed structural validation
    DefinitionRejected,
    /// Input parsed successfully
    ArgsAccepted,
    /// Input rejected with a field error
    ArgsRejected,
    /// CLI command started
    CommandStart,
}

impl Event {
    /// Returns the event name as it appears in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::DefinitionLoaded => "DEFINITION_LOADED",
            Event::DefinitionRejected => "DEFINITION_REJECTED",
            Event::ArgsAccepted => "ARGS_ACCEPTED",
            Event::ArgsRejected => "ARGS_REJECTED",
            Event::CommandStart => "COMMAND_START",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
