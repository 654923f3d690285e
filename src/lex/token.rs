//! Token kinds and spans produced by the scanner.

/// Closed set of token kinds.
///
/// `Empty` is internal to the scanner (consumed comments, directives,
/// `extern "C" {` prologues) and never escapes `next_token`. `Eof` is an
/// ordinary kind so callers can match on it instead of unwrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Empty,
    Name,
    Number,
    RelOp,
    ArithOp,
    LogicAnd,
    LogicOr,
    Assign,
    Ellipsis,
    KwCase,
    KwDefault,
    KwDo,
    KwElse,
    KwExtern,
    KwFor,
    KwGoto,
    KwIf,
    KwSwitch,
    KwWhile,
    OpenParen,
    CloseParen,
    Comma,
    Colon,
    Semi,
    Question,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
}

impl TokenKind {
    /// Short display form for diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Eof => "end-of-file",
            TokenKind::Empty => "empty",
            TokenKind::Name => "name",
            TokenKind::Number => "number",
            TokenKind::RelOp => "relational operator",
            TokenKind::ArithOp => "arithmetic operator",
            TokenKind::LogicAnd => "'&&'",
            TokenKind::LogicOr => "'||'",
            TokenKind::Assign => "assignment",
            TokenKind::Ellipsis => "'...'",
            TokenKind::KwCase => "'case'",
            TokenKind::KwDefault => "'default'",
            TokenKind::KwDo => "'do'",
            TokenKind::KwElse => "'else'",
            TokenKind::KwExtern => "'extern'",
            TokenKind::KwFor => "'for'",
            TokenKind::KwGoto => "'goto'",
            TokenKind::KwIf => "'if'",
            TokenKind::KwSwitch => "'switch'",
            TokenKind::KwWhile => "'while'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Question => "'?'",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
        }
    }
}

/// One scanned token: kind plus the byte span and line it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
    pub len: usize,
    pub line: u32,
}

/// Reserved words the scorer cares about, sorted for binary search.
/// Anything else lexes as a plain name.
pub(crate) const KEYWORDS: [(&str, TokenKind); 10] = [
    ("case", TokenKind::KwCase),
    ("default", TokenKind::KwDefault),
    ("do", TokenKind::KwDo),
    ("else", TokenKind::KwElse),
    ("extern", TokenKind::KwExtern),
    ("for", TokenKind::KwFor),
    ("goto", TokenKind::KwGoto),
    ("if", TokenKind::KwIf),
    ("switch", TokenKind::KwSwitch),
    ("while", TokenKind::KwWhile),
];
