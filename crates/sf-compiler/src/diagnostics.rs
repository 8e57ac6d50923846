use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};
use sf_nbt::snbt::SnbtError;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The compile output is wrong or incomplete.
    Error,
    /// Suspicious, but the output is usable.
    Warning,
}

/// A problem found while compiling or checking a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How bad it is.
    pub severity: Severity,
    /// Entity the problem belongs to, if any.
    pub entity: Option<String>,
    /// One-line description.
    pub message: String,
    /// Extra hint shown below the message.
    pub label: Option<String>,
}

impl Diagnostic {
    /// An error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            entity: None,
            message: message.into(),
            label: None,
        }
    }

    /// A warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            entity: None,
            message: message.into(),
            label: None,
        }
    }

    /// Attach the entity the problem belongs to.
    pub fn for_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Attach a hint.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.entity {
            Some(entity) => write!(f, "{prefix}: [{entity}] {}", self.message)?,
            None => write!(f, "{prefix}: {}", self.message)?,
        }
        if let Some(label) = &self.label {
            write!(f, " ({label})")?;
        }
        Ok(())
    }
}

/// Render SNBT syntax errors against their source text.
pub fn render_snbt_errors(source: &str, filename: &str, errors: &[SnbtError]) -> String {
    let mut output = Vec::new();

    for error in errors {
        let span = (filename, error.span.clone());
        Report::build(ReportKind::Error, span.clone())
            .with_message("malformed SNBT")
            .with_label(
                Label::new(span)
                    .with_message(&error.message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut output)
            .ok();
    }

    String::from_utf8(output).unwrap_or_default()
}
