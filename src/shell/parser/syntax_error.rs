use std::fmt;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use super::lexer::token::span::Span;

#[derive(Debug, Error)]
pub enum SyntaxErrorKind {
    UnterminatedQuote(Span),
    MissingRedirectTarget(Span),
    EmptyStage(Span),
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnterminatedQuote(_) => write!(f, "unterminated quote"),
            Self::MissingRedirectTarget(_) => write!(f, "missing redirect target"),
            Self::EmptyStage(_) => write!(f, "empty pipeline stage"),
        }
    }
}

#[derive(Debug, Error)]
pub struct SyntaxError {
    pub error: SyntaxErrorKind,
    pub src: NamedSource<String>,
}

impl SyntaxError {
    pub fn new(error: SyntaxErrorKind, src: String, name: String) -> Self {
        SyntaxError {
            error,
            src: NamedSource::new(name, src),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.error.fmt(f)
    }
}

impl Diagnostic for SyntaxError {
    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        use SyntaxErrorKind::*;
        let label = match &self.error {
            UnterminatedQuote(span) => LabeledSpan::new_with_span(
                Some(String::from("quote opened here is never closed")),
                *span,
            ),
            MissingRedirectTarget(span) => LabeledSpan::new_with_span(
                Some(String::from("expected a target after this operator")),
                *span,
            ),
            EmptyStage(span) => LabeledSpan::new_with_span(
                Some(String::from("no command on this side of the pipe")),
                *span,
            ),
        };
        Some(Box::new(vec![label].into_iter()))
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("Syntax Error"))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn SourceCode)
    }
}
