pub mod command_line;
pub mod lexer;
pub mod syntax_error;

use std::mem;

use command_line::{Command, CommandLine};
use lexer::{token::TokenType, Lexer};
use syntax_error::{SyntaxError, SyntaxErrorKind};

pub type Result<T> = std::result::Result<T, SyntaxErrorKind>;

/// What one [`Parser::parse_line`] call produced.
#[derive(Debug, PartialEq, Eq)]
pub enum ParsedLine {
    Pipeline(CommandLine),
    /// A terminator with no command in front of it. Callers skip these.
    Empty,
    /// The input is exhausted.
    Eof,
}

pub struct Parser {
    lexer: Lexer,
    name: String,
}

impl Parser {
    pub fn new(name: String, src: String) -> Self {
        Self {
            lexer: Lexer::new(src),
            name,
        }
    }

    /// Consumes one command line from the source. A source may hold several,
    /// separated by newlines or semicolons; call until [`ParsedLine::Eof`].
    pub fn parse_line(&mut self) -> std::result::Result<ParsedLine, SyntaxError> {
        self.parse_pipeline().map_err(|error| {
            SyntaxError::new(error, self.lexer.src().to_string(), self.name.clone())
        })
    }

    fn parse_pipeline(&mut self) -> Result<ParsedLine> {
        let mut command_line = CommandLine::default();
        let mut stage = Command::default();
        let mut env_assignment_allowed = true;

        loop {
            let token = self.lexer.next_token(env_assignment_allowed)?;
            match token.token_type {
                TokenType::Space => (),
                TokenType::EnvAssign(text) => {
                    // the lexer only classifies tokens with a name in front
                    // of the `=`, so the split cannot miss
                    let (name, value) = text.split_once('=').unwrap_or((text.as_str(), ""));
                    command_line.insert_env_override(name.to_string(), value.to_string());
                }
                TokenType::Param(text) => {
                    stage.push_arg(text);
                    env_assignment_allowed = false;
                }
                TokenType::RedirectIn(target) => command_line.set_stdin_redirect(target),
                TokenType::RedirectOut(target) => command_line.set_stdout_redirect(target),
                TokenType::Pipe => {
                    if stage.is_empty() {
                        return Err(SyntaxErrorKind::EmptyStage(token.span));
                    }
                    command_line.push_command(mem::take(&mut stage));
                    env_assignment_allowed = true;
                }
                TokenType::EndOfCommand => {
                    if stage.is_empty() {
                        if command_line.commands().is_empty() {
                            return Ok(ParsedLine::Empty);
                        }
                        // a pipe with nothing after it
                        return Err(SyntaxErrorKind::EmptyStage(token.span));
                    }
                    command_line.push_command(stage);
                    return Ok(ParsedLine::Pipeline(command_line));
                }
                TokenType::EndOfInput => {
                    if stage.is_empty() {
                        if command_line.commands().is_empty() {
                            return Ok(ParsedLine::Eof);
                        }
                        return Err(SyntaxErrorKind::EmptyStage(token.span));
                    }
                    command_line.push_command(stage);
                    return Ok(ParsedLine::Pipeline(command_line));
                }
            }
        }
    }
}
