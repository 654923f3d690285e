//! Procedure boundary detection.
//!
//! A procedure starts at a name chain followed by a balanced parameter
//! list and an open brace; everything else at file scope is skipped.
//! The end is found textually, by looking for a close brace at the
//! start of a line, so a scoring pass gone wrong cannot run past the
//! procedure it was asked to score.

use super::chars;
use super::scanner::Scanner;
use super::token::TokenKind;

/// Longer names are cut off in reports and diagnostics.
const NAME_LIMIT: usize = 255;

/// A procedure header the scanner just consumed. The cursor sits one
/// past the opening brace.
#[derive(Debug)]
pub struct ProcStart {
    /// Last name of the declarator chain, so `static char * foo (...)`
    /// yields `foo`.
    pub name: String,
    /// Line carrying the opening brace.
    pub line: u32,
}

/// Scan forward to the next procedure definition. Declarations,
/// initializers, and aggregate bodies in between are skipped. `None`
/// once the file has no further definition.
pub fn find_proc_start(scan: &mut Scanner) -> Option<ProcStart> {
    loop {
        let tok = scan.next_token();
        match tok.kind {
            TokenKind::Name => {}
            TokenKind::Eof => return None,
            TokenKind::Semi => continue,
            _ => {
                if skip_to_semi(scan) == TokenKind::Eof {
                    return None;
                }
                continue;
            }
        }

        // Declarator chain: names and operator tokens may alternate
        // freely; the procedure name is the last name seen.
        let mut name_tok = tok;
        let mut tkn = tok;
        loop {
            loop {
                tkn = scan.next_token();
                if tkn.kind != TokenKind::ArithOp {
                    break;
                }
            }
            if tkn.kind != TokenKind::Name {
                break;
            }
            name_tok = tkn;
        }

        match tkn.kind {
            TokenKind::OpenParen => {}
            TokenKind::Eof => return None,
            TokenKind::Semi => continue,
            _ => {
                if skip_to_semi(scan) == TokenKind::Eof {
                    return None;
                }
                continue;
            }
        }

        if skip_params(scan) == TokenKind::Eof {
            return None;
        }

        let tok = scan.next_token();
        if tok.kind == TokenKind::OpenBrace {
            let last = name_tok.offset + name_tok.len.min(NAME_LIMIT);
            let name = String::from_utf8_lossy(&scan.text()[name_tok.offset..last]).into_owned();
            return Some(ProcStart { name, line: scan.line() });
        }
        // Prototype or K&R-style definition; resume the outer scan.
    }
}

/// Find the end of the procedure body whose open brace was just
/// consumed: the first close brace that either sits on the brace's own
/// line or opens a line. Returns the offset one past that brace, or
/// `None` when the file has no close brace left.
pub fn find_proc_end(scan: &Scanner) -> Option<usize> {
    let text = scan.text();
    let cursor = scan.pos();
    let eol = chars::skip_until(text, cursor, chars::END_OF_LINE);

    let mut close = None;
    for (i, &c) in text[cursor..].iter().enumerate() {
        if c == 0 {
            break;
        }
        if c == b'}' {
            close = Some(cursor + i);
            break;
        }
    }
    let close = close?;
    if close < eol {
        return Some(close + 1);
    }

    for i in eol..text.len().saturating_sub(1) {
        match text[i] {
            0 => break,
            b'\n' | b'\r' if text[i + 1] == b'}' => return Some(i + 2),
            _ => {}
        }
    }
    None
}

/// Consume a balanced parameter list; the open paren is already gone.
/// Returns on the matching close paren or at end of input.
fn skip_params(scan: &mut Scanner) -> TokenKind {
    let mut depth = 1;
    loop {
        let tok = scan.next_token();
        match tok.kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    return tok.kind;
                }
            }
            TokenKind::Eof => return tok.kind,
            _ => {}
        }
    }
}

/// Skip a non-procedure construct: stop on a semicolon at brace depth
/// zero, or on a close brace that both rebalances the depth and starts
/// its line (the usual shape of an aggregate initializer's last line).
fn skip_to_semi(scan: &mut Scanner) -> TokenKind {
    let mut depth: i32 = if scan.last_kind() == TokenKind::OpenBrace { 1 } else { 0 };
    loop {
        let tok = scan.next_token();
        match tok.kind {
            TokenKind::OpenBrace => depth += 1,
            TokenKind::CloseBrace => {
                depth -= 1;
                if depth == 0 && tok.offset > 0 && scan.text()[tok.offset - 1] == b'\n' {
                    return tok.kind;
                }
            }
            TokenKind::Semi => {
                if depth == 0 {
                    return tok.kind;
                }
            }
            TokenKind::Eof => return tok.kind,
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "finder_test.rs"]
mod tests;
