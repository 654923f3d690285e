//! Byte-cursor scanner over one loaded source file.
//!
//! Hand-rolled FSM producing the closed token set in `token.rs`.
//! Comments, preprocessor lines, and `extern "C" {` prologues are
//! consumed internally and never surface. The scanner keeps the line
//! and non-comment-line bookkeeping the scorer charges against, plus a
//! one-token pushback slot.

use super::chars;
use super::token::{KEYWORDS, Token, TokenKind};
use std::cmp::Ordering;

pub struct Scanner {
    name: String,
    text: Vec<u8>,
    pos: usize,
    line: u32,
    nc_line: u32,
    bol: bool,
    last_kind: TokenKind,
    tok_start: usize,
    tok_line: u32,
    current: Token,
    pushback: Option<Token>,
}

impl Scanner {
    /// Wrap raw file bytes. A NUL sentinel is appended so every scan
    /// loop stops on an end-of-line class byte instead of a bounds
    /// check.
    pub fn new(name: impl Into<String>, mut text: Vec<u8>) -> Self {
        text.push(0);
        Scanner {
            name: name.into(),
            text,
            pos: 0,
            line: 1,
            nc_line: 0,
            bol: true,
            last_kind: TokenKind::Empty,
            tok_start: 0,
            tok_line: 1,
            current: Token { kind: TokenKind::Empty, offset: 0, len: 0, line: 1 },
            pushback: None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.name
    }

    /// Cursor byte offset (one past the last consumed byte).
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Non-comment lines delivered so far.
    pub fn nc_line(&self) -> u32 {
        self.nc_line
    }

    /// Kind of the most recently delivered token.
    pub fn last_kind(&self) -> TokenKind {
        self.last_kind
    }

    /// Overwrite the last-delivered kind. The scorer uses this to
    /// pretend a macro invocation ended in a semicolon and to restore
    /// the pre-lookahead state after an `else` probe.
    pub(crate) fn set_last_kind(&mut self, kind: TokenKind) {
        self.last_kind = kind;
    }

    pub(crate) fn text(&self) -> &[u8] {
        &self.text
    }

    /// Token bytes as (lossily decoded) text.
    pub fn token_text(&self, tok: &Token) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.text[tok.offset..tok.offset + tok.len])
    }

    /// Push the current token back. The next `next_token` call returns
    /// it unchanged. Capacity is one token; ungetting twice before the
    /// next read is a no-op.
    pub fn unget_token(&mut self) {
        self.line = self.current.line;
        self.pushback = Some(self.current);
    }

    /// Jump the cursor to `end`, counting newlines crossed. Any pending
    /// pushback is dropped.
    pub(crate) fn seek_to(&mut self, end: usize) {
        let end = end.min(self.text.len());
        while self.pos < end {
            if self.text[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        self.pushback = None;
    }

    /// Deliver the next token. End of input is the `Eof` kind; the
    /// internal `Empty` kind never escapes.
    pub fn next_token(&mut self) -> Token {
        if let Some(tok) = self.pushback.take() {
            self.tok_start = tok.offset;
            self.tok_line = tok.line;
            self.line = tok.line;
            self.last_kind = tok.kind;
            self.current = tok;
            return tok;
        }

        loop {
            if !self.next_nonblank() {
                return self.eof_token();
            }
            match self.scan_one() {
                TokenKind::Empty => continue,
                TokenKind::Eof => return self.eof_token(),
                kind => {
                    let tok = Token {
                        kind,
                        offset: self.tok_start,
                        len: self.pos - self.tok_start,
                        line: self.tok_line,
                    };
                    if self.bol {
                        self.bol = false;
                        self.nc_line += 1;
                    }
                    self.last_kind = kind;
                    self.current = tok;
                    return tok;
                }
            }
        }
    }

    fn eof_token(&mut self) -> Token {
        let tok = Token {
            kind: TokenKind::Eof,
            offset: self.pos.min(self.text.len()),
            len: 0,
            line: self.line,
        };
        self.current = tok;
        tok
    }

    #[inline]
    fn byte_at(&self, ix: usize) -> u8 {
        self.text.get(ix).copied().unwrap_or(0)
    }

    /// Skip whitespace up to the next token start. Newlines bump the
    /// line counter and arm the beginning-of-line flag. False at the
    /// sentinel.
    fn next_nonblank(&mut self) -> bool {
        loop {
            let c = self.byte_at(self.pos);
            if c == b'\n' {
                self.line += 1;
                self.bol = true;
                self.pos += 1;
            } else if c == 0 {
                return false;
            } else if chars::is_space(c) {
                self.pos += 1;
            } else {
                self.tok_start = self.pos;
                self.tok_line = self.line;
                return true;
            }
        }
    }

    /// Dispatch on the first byte of a token. Leaves the cursor one
    /// past the token.
    fn scan_one(&mut self) -> TokenKind {
        let c = self.byte_at(self.pos);
        if c == 0 {
            return TokenKind::Eof;
        }
        self.pos += 1;

        match c {
            b'A'..=b'Z' | b'_' | b'$' => {
                self.pos = chars::skip_while(&self.text, self.pos, chars::NAME);
                TokenKind::Name
            }
            b'a'..=b'z' => {
                let kind = self.scan_word();
                if kind == TokenKind::KwExtern { self.extern_c_check() } else { kind }
            }
            b'0'..=b'9' => {
                self.pos = chars::skip_while(&self.text, self.pos, chars::NAME);
                TokenKind::Number
            }

            b'!' => {
                if self.eat(b'=') { TokenKind::RelOp } else { TokenKind::ArithOp }
            }
            b'"' => self.scan_quote(b'"'),
            b'\'' => self.scan_quote(b'\''),
            b'#' => self.scan_directive(),
            b'%' | b'*' => self.assign_check(),
            b'&' => {
                if self.eat(b'&') { TokenKind::LogicAnd } else { self.assign_check() }
            }
            b'|' => {
                if self.eat(b'|') { TokenKind::LogicOr } else { self.assign_check() }
            }
            b'+' => match self.byte_at(self.pos) {
                b'+' => {
                    self.pos += 1;
                    TokenKind::ArithOp
                }
                b'=' => {
                    self.pos += 1;
                    TokenKind::Assign
                }
                0 => TokenKind::Eof,
                _ => TokenKind::ArithOp,
            },
            b'-' => match self.byte_at(self.pos) {
                b'>' | b'-' => {
                    self.pos += 1;
                    TokenKind::ArithOp
                }
                b'=' => {
                    self.pos += 1;
                    TokenKind::Assign
                }
                0 => TokenKind::Eof,
                _ => TokenKind::ArithOp,
            },
            b'/' => match self.byte_at(self.pos) {
                b'/' => {
                    self.pos = chars::skip_until(&self.text, self.pos + 1, chars::END_OF_LINE);
                    TokenKind::Empty
                }
                b'=' => {
                    self.pos += 1;
                    TokenKind::Assign
                }
                b'*' => self.scan_comment(),
                _ => TokenKind::ArithOp,
            },
            b'<' => match self.byte_at(self.pos) {
                b'<' => {
                    self.pos += 1;
                    if self.eat(b'=') { TokenKind::Assign } else { TokenKind::ArithOp }
                }
                b'=' => {
                    self.pos += 1;
                    TokenKind::RelOp
                }
                _ => TokenKind::RelOp,
            },
            b'>' => match self.byte_at(self.pos) {
                b'>' => {
                    self.pos += 1;
                    if self.eat(b'=') { TokenKind::Assign } else { TokenKind::ArithOp }
                }
                b'=' => {
                    self.pos += 1;
                    TokenKind::RelOp
                }
                _ => TokenKind::RelOp,
            },
            b'=' => {
                if self.eat(b'=') { TokenKind::RelOp } else { TokenKind::Assign }
            }
            b'^' => {
                if self.eat(b'=') { TokenKind::Assign } else { TokenKind::ArithOp }
            }
            b'.' => {
                if self.byte_at(self.pos) == b'.' && self.byte_at(self.pos + 1) == b'.' {
                    self.pos += 2;
                    TokenKind::Ellipsis
                } else {
                    TokenKind::ArithOp
                }
            }

            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b';' => TokenKind::Semi,
            b'[' => TokenKind::OpenBracket,
            b']' => TokenKind::CloseBracket,
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,

            b'\\' => TokenKind::Empty,
            b'?' => TokenKind::Question,
            b'~' => TokenKind::ArithOp,

            _ => self.unknown(c),
        }
    }

    #[inline]
    fn eat(&mut self, want: u8) -> bool {
        if self.byte_at(self.pos) == want {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `x=` forms: assignment when `=` follows, arithmetic otherwise.
    fn assign_check(&mut self) -> TokenKind {
        if self.eat(b'=') { TokenKind::Assign } else { TokenKind::ArithOp }
    }

    /// Lowercase-initial word: binary-search the keyword table, rejecting
    /// a match that is only a prefix of a longer name. Non-keywords scan
    /// as names and merge `::`-qualified segments into one token.
    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos - 1;
        let mut lo: i32 = 0;
        let mut hi: i32 = KEYWORDS.len() as i32 - 1;

        while lo <= hi {
            let ix = ((lo + hi) / 2) as usize;
            let (kw, kind) = KEYWORDS[ix];
            match cmp_keyword(kw.as_bytes(), &self.text, start) {
                Ordering::Equal => {
                    if !chars::is_name(self.byte_at(start + kw.len())) {
                        self.pos = start + kw.len();
                        return kind;
                    }
                    break;
                }
                Ordering::Less => lo = ix as i32 + 1,
                Ordering::Greater => hi = ix as i32 - 1,
            }
        }

        self.pos = chars::skip_while(&self.text, self.pos, chars::NAME);
        while self.byte_at(self.pos) == b':'
            && self.byte_at(self.pos + 1) == b':'
            && chars::is_name_start(self.byte_at(self.pos + 2))
        {
            self.pos = chars::skip_while(&self.text, self.pos + 2, chars::NAME);
        }
        TokenKind::Name
    }

    /// After an `extern` keyword: when `"C"` and `{` follow (whitespace
    /// allowed), the whole prologue is one no-op; otherwise `extern`
    /// is delivered as a plain name.
    fn extern_c_check(&mut self) -> TokenKind {
        let mut nl_ct = 0u32;
        let mut s = self.pos;

        while chars::is_space(self.byte_at(s)) {
            if self.byte_at(s) == b'\n' {
                nl_ct += 1;
            }
            s += 1;
        }
        if !self.text[s.min(self.text.len())..].starts_with(b"\"C\"") {
            return TokenKind::Name;
        }
        s += 3;
        while chars::is_space(self.byte_at(s)) {
            if self.byte_at(s) == b'\n' {
                nl_ct += 1;
            }
            s += 1;
        }
        if self.byte_at(s) != b'{' {
            return TokenKind::Name;
        }
        self.pos = s + 1;
        self.line += nl_ct;
        TokenKind::Empty
    }

    /// Block comment body; cursor sits on the `*` of `/*`. Unterminated
    /// comments end the scan.
    fn scan_comment(&mut self) -> TokenKind {
        let mut p = self.pos + 1;
        loop {
            p = chars::skip_until(&self.text, p, chars::STAR_OR_NL);
            match self.byte_at(p) {
                0 => {
                    self.pos = p.min(self.text.len());
                    return TokenKind::Eof;
                }
                b'\n' => {
                    self.line += 1;
                    p += 1;
                }
                b'\r' => p += 1,
                _ => {
                    p += 1;
                    if self.byte_at(p) == b'/' {
                        self.pos = p + 1;
                        return TokenKind::Empty;
                    }
                }
            }
        }
    }

    /// `#` at beginning of line: consume the whole directive, honoring
    /// backslash continuation and embedded comments. A `#` anywhere else
    /// is an arithmetic operator (stringize in a macro body).
    fn scan_directive(&mut self) -> TokenKind {
        if !self.bol {
            return TokenKind::ArithOp;
        }

        let mut res = TokenKind::Empty;
        let mut s = self.pos;
        loop {
            match self.byte_at(s) {
                b'\n' => break,
                b'\\' => {
                    s += 1;
                    let ch = self.byte_at(s);
                    if ch == 0 {
                        res = TokenKind::Eof;
                        break;
                    }
                    if ch == b'\n' {
                        self.line += 1;
                    }
                    s += 1;
                }
                0 => {
                    res = TokenKind::Eof;
                    break;
                }
                b'/' => {
                    s += 1;
                    match self.byte_at(s) {
                        b'*' => {
                            self.pos = s;
                            if self.scan_comment() == TokenKind::Eof {
                                res = TokenKind::Eof;
                                break;
                            }
                            s = self.pos;
                        }
                        b'/' => {
                            s = chars::skip_until(&self.text, s + 1, chars::END_OF_LINE);
                            if self.byte_at(s) == 0 {
                                res = TokenKind::Eof;
                            }
                            break;
                        }
                        b'\n' => break,
                        0 => {
                            res = TokenKind::Eof;
                            break;
                        }
                        _ => s += 1,
                    }
                }
                _ => s += 1,
            }
        }

        self.pos = s.min(self.text.len());
        self.bol = true;
        res
    }

    /// String or character literal; the whole literal is one name-like
    /// token. A backslash escape swallows the next byte; EOF inside the
    /// literal ends the scan.
    fn scan_quote(&mut self, quote: u8) -> TokenKind {
        let mut s = self.pos;
        loop {
            let c = self.byte_at(s);
            if c == quote {
                self.pos = s + 1;
                return TokenKind::Name;
            }
            match c {
                b'\\' => {
                    s += 1;
                    if self.byte_at(s) == 0 {
                        self.pos = s.min(self.text.len());
                        return TokenKind::Eof;
                    }
                    s += 1;
                }
                0 => {
                    self.pos = s.min(self.text.len());
                    return TokenKind::Eof;
                }
                _ => s += 1,
            }
        }
    }

    fn unknown(&mut self, c: u8) -> TokenKind {
        let shown = if c.is_ascii_graphic() || c == b' ' { c as char } else { '?' };
        eprintln!(
            "invalid character in {} on line {}: 0x{:02X} ({})",
            self.name, self.line, c, shown
        );
        TokenKind::Eof
    }
}

/// strncmp-style comparison of a keyword against the text at `start`.
fn cmp_keyword(kw: &[u8], text: &[u8], start: usize) -> Ordering {
    for (i, &k) in kw.iter().enumerate() {
        let c = text.get(start + i).copied().unwrap_or(0);
        match k.cmp(&c) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod tests;
