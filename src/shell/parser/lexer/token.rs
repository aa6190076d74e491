pub mod span;

use span::Span;

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub span: Span,
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum TokenType {
    /// A run of one or more spaces. Carries no content.
    Space,
    Param(String),
    /// A `name=value` token seen before the first plain parameter of a stage.
    EnvAssign(String),
    /// `<`, payload is the target path.
    RedirectIn(String),
    /// `>`, payload is the target path.
    RedirectOut(String),
    Pipe,
    /// A newline or semicolon.
    EndOfCommand,
    EndOfInput,
}
