//! Resolver diagnostics.
//!
//! A call is resolved against signatures rather than source text, so a
//! [`Diagnostic`] carries no span. The front end that issued the call owns
//! the location and prefixes it when printing.

use std::fmt;

use crate::ErrorCode;

/// A hint shown under a diagnostic.
///
/// Hints are printed in ascending `priority`; the closest overload of a
/// failed call always comes first.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Suggestion {
    pub message: String,
    pub priority: u8,
}

impl Suggestion {
    pub fn text(message: impl Into<String>, priority: u8) -> Self {
        Suggestion {
            message: message.into(),
            priority,
        }
    }

    /// Point at a concrete overload, rendered as `Name(Type, ...)`.
    pub fn did_you_mean(overload: impl fmt::Display) -> Self {
        Suggestion::text(format!("did you mean `{overload}`?"), 0)
    }
}

/// A refused call or catalog change, explained.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic is only useful once it is reported"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub message: String,
    /// Context lines, e.g. the overloads that tied.
    pub notes: Vec<String>,
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    #[cold]
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            message: message.into(),
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Suggestions in display order. Equal priorities keep insertion order.
    pub fn help(&self) -> Vec<&Suggestion> {
        let mut help: Vec<&Suggestion> = self.suggestions.iter().collect();
        help.sort_by_key(|s| s.priority);
        help
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        for hint in self.help() {
            write!(f, "\n  help: {}", hint.message)?;
        }
        Ok(())
    }
}
