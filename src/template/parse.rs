//! Template parsing - text in, nodes out
//!
//! No evaluation happens here, so every error is a `TemplateError::Parse`.

use super::TemplateError;

/// A parsed piece of template text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Node {
    /// Literal text, already trimmed by `{{-`/`-}}` markers
    Text(String),
    /// A `{{ ... }}` action
    Action(Action),
}

/// A `{{ ... }}` action: commands joined by `|`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Action {
    pub line: usize,
    pub commands: Vec<Command>,
}

/// One stage of a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Command {
    /// 1-based column of the first token
    pub column: usize,
    /// Source text, for error messages
    pub source: String,
    pub kind: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum CommandKind {
    /// A bare value, only valid as the first command
    Operand(Operand),
    /// A function call; a piped value is appended to `args`
    Call { func: Func, args: Vec<Operand> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Operand {
    /// `.A.B`; empty for `.`
    Field(Vec<String>),
    /// `"..."`
    Str(String),
}

/// Built-in string functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Func {
    ToLower,
    ToUpper,
    Trim,
    TrimPrefix,
    TrimSuffix,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "tolower" => Some(Self::ToLower),
            "toupper" => Some(Self::ToUpper),
            "trim" => Some(Self::Trim),
            "trimprefix" => Some(Self::TrimPrefix),
            "trimsuffix" => Some(Self::TrimSuffix),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::ToLower => "tolower",
            Self::ToUpper => "toupper",
            Self::Trim => "trim",
            Self::TrimPrefix => "trimprefix",
            Self::TrimSuffix => "trimsuffix",
        }
    }

    pub const fn arity(self) -> usize {
        match self {
            Self::ToLower | Self::ToUpper | Self::Trim => 1,
            Self::TrimPrefix | Self::TrimSuffix => 2,
        }
    }

    /// Apply to exactly `arity()` arguments
    pub fn apply(self, args: &[String]) -> String {
        match self {
            Self::ToLower => args[0].to_lowercase(),
            Self::ToUpper => args[0].to_uppercase(),
            Self::Trim => args[0].trim().to_string(),
            Self::TrimPrefix => args[0]
                .strip_prefix(args[1].as_str())
                .unwrap_or(&args[0])
                .to_string(),
            Self::TrimSuffix => args[0]
                .strip_suffix(args[1].as_str())
                .unwrap_or(&args[0])
                .to_string(),
        }
    }
}

#[derive(Debug)]
enum Token {
    Field(Vec<String>),
    Ident(String),
    Str(String),
    Pipe,
    Close { trim: bool },
}

#[derive(Debug)]
struct Spanned {
    token: Token,
    start: usize,
    end: usize,
}

/// Lexer positioned inside a single action
struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

/// Parse template text into nodes
pub(super) fn parse(src: &str) -> Result<Vec<Node>, TemplateError> {
    let mut nodes = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;

    loop {
        let Some(rel) = src[pos..].find("{{") else {
            push_text(&mut nodes, &src[pos..], trim_next, false);
            return Ok(nodes);
        };
        let open = pos + rel;
        let mut inner = open + 2;

        let after = &src[inner..];
        let trim_prev = after.starts_with('-') && after[1..].starts_with(char::is_whitespace);
        if trim_prev {
            inner += 1;
        }
        push_text(&mut nodes, &src[pos..open], trim_next, trim_prev);

        let mut lexer = Lexer {
            src,
            pos: inner,
            line: line_at(src, open),
        };
        let (action, trim) = lexer.action()?;
        nodes.push(Node::Action(action));
        trim_next = trim;
        pos = lexer.pos;
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start();
    }
    if trim_end {
        text = text.trim_end();
    }
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn line_at(src: &str, pos: usize) -> usize {
    src[..pos].matches('\n').count() + 1
}

fn column_at(src: &str, pos: usize) -> usize {
    let line_start = src[..pos].rfind('\n').map_or(0, |nl| nl + 1);
    src[line_start..pos].chars().count() + 1
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn take_ident(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

impl Lexer<'_> {
    fn error(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    /// Parse up to and including the closing `}}`
    ///
    /// Returns the action and whether it ended with `-}}`.
    fn action(&mut self) -> Result<(Action, bool), TemplateError> {
        let mut commands = Vec::new();
        let mut current = Vec::new();

        loop {
            let spanned = self.next_token()?;
            match spanned.token {
                Token::Pipe => {
                    let piped = !commands.is_empty();
                    commands.push(self.command(std::mem::take(&mut current), piped)?);
                }
                Token::Close { trim } => {
                    let piped = !commands.is_empty();
                    commands.push(self.command(current, piped)?);
                    let action = Action {
                        line: self.line,
                        commands,
                    };
                    return Ok((action, trim));
                }
                _ => current.push(spanned),
            }
        }
    }

    fn command(&self, tokens: Vec<Spanned>, piped: bool) -> Result<Command, TemplateError> {
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return Err(self.error("missing value for command"));
        };
        let column = column_at(self.src, first.start);
        let source = self.src[first.start..last.end].to_string();
        let first_source = &self.src[first.start..first.end];
        let has_args = tokens.len() > 1;

        let mut iter = tokens.into_iter();
        let Some(head) = iter.next() else {
            return Err(self.error("missing value for command"));
        };

        let kind = match head.token {
            Token::Ident(name) => {
                let func = Func::lookup(&name)
                    .ok_or_else(|| self.error(format!("function \"{name}\" not defined")))?;
                let args = iter
                    .map(|t| self.operand(t))
                    .collect::<Result<Vec<_>, _>>()?;
                CommandKind::Call { func, args }
            }
            token => {
                if piped || has_args {
                    return Err(self.error(format!(
                        "can't give argument to non-function {first_source}"
                    )));
                }
                CommandKind::Operand(self.operand(Spanned {
                    token,
                    start: head.start,
                    end: head.end,
                })?)
            }
        };

        Ok(Command {
            column,
            source,
            kind,
        })
    }

    fn operand(&self, spanned: Spanned) -> Result<Operand, TemplateError> {
        match spanned.token {
            Token::Field(path) => Ok(Operand::Field(path)),
            Token::Str(s) => Ok(Operand::Str(s)),
            Token::Ident(name) => Err(self.error(format!(
                "function \"{name}\" cannot be used as an argument"
            ))),
            Token::Pipe | Token::Close { .. } => Err(self.error("missing value for command")),
        }
    }

    /// Skip whitespace, returning whether any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let rest = &self.src[self.pos..];
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
        rest.len() != trimmed.len()
    }

    fn next_token(&mut self) -> Result<Spanned, TemplateError> {
        let skipped = self.skip_whitespace();
        let start = self.pos;
        let rest = &self.src[start..];

        if skipped && rest.starts_with("-}}") {
            self.pos += 3;
            return Ok(self.spanned(Token::Close { trim: true }, start));
        }
        if rest.starts_with("}}") {
            self.pos += 2;
            return Ok(self.spanned(Token::Close { trim: false }, start));
        }

        let Some(c) = rest.chars().next() else {
            return Err(self.error("unclosed action"));
        };
        match c {
            '|' => {
                self.pos += 1;
                Ok(self.spanned(Token::Pipe, start))
            }
            '"' => self.string(),
            '.' => Ok(self.field()),
            c if c.is_alphabetic() || c == '_' => {
                let ident = take_ident(rest);
                self.pos += ident.len();
                Ok(self.spanned(Token::Ident(ident.to_string()), start))
            }
            c => Err(self.error(format!("unexpected \"{c}\" in operand"))),
        }
    }

    const fn spanned(&self, token: Token, start: usize) -> Spanned {
        Spanned {
            token,
            start,
            end: self.pos,
        }
    }

    fn field(&mut self) -> Spanned {
        let start = self.pos;
        let mut path = Vec::new();

        while self.src[self.pos..].starts_with('.') {
            let ident = take_ident(&self.src[self.pos + 1..]);
            if ident.is_empty() {
                if path.is_empty() {
                    // bare `.`
                    self.pos += 1;
                }
                break;
            }
            path.push(ident.to_string());
            self.pos += 1 + ident.len();
        }

        self.spanned(Token::Field(path), start)
    }

    fn string(&mut self) -> Result<Spanned, TemplateError> {
        let start = self.pos;
        let mut out = String::new();
        let mut chars = self.src[start + 1..].char_indices();

        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos = start + 1 + i + 1;
                    return Ok(self.spanned(Token::Str(out), start));
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, 't')) => out.push('\t'),
                    Some((_, '"')) => out.push('"'),
                    Some((_, '\\')) => out.push('\\'),
                    Some((_, other)) => {
                        return Err(self.error(format!(
                            "invalid escape \"\\{other}\" in quoted string"
                        )));
                    }
                    None => break,
                },
                '\n' => break,
                c => out.push(c),
            }
        }

        Err(self.error("unterminated quoted string"))
    }
}
