//! Statement-level scoring pass over one procedure body.
//!
//! Every statement costs at least one point. Nested blocks multiply
//! their contents by the nesting penalty, parenthesized subexpressions
//! by the demi penalty, and mixing operator families inside parens
//! charges extra. The raw sum is scaled and rounded at the end. A body
//! that cannot be parsed, or whose scan runs past the recorded close
//! brace, is pinned at `MAX_SCORE` and reported instead of scored.

use std::io::Write;

use crate::lex::{Scanner, Token, TokenKind, chars};

use super::mix::OpMix;
use super::{MAX_SCORE, ScoreParams};

/// The scan left the procedure: end of input, or past the recorded
/// close brace with control blocks still open.
struct ScanAbort;

type StepResult = Result<f64, ScanAbort>;

/// What one scored procedure came to.
#[derive(Debug)]
pub struct ProcMeasure {
    /// Scaled, rounded score; `MAX_SCORE` marks it unscoreable.
    pub score: f64,
    /// Source lines the body spans.
    pub line_ct: u32,
    /// Body lines bearing at least one token.
    pub nc_line_ct: u32,
}

/// Score the procedure whose opening brace the scanner just consumed.
/// `end` is the offset one past the textual close brace found for it.
pub fn score_proc(
    scan: &mut Scanner,
    params: &ScoreParams,
    name: &str,
    proc_line: u32,
    end: usize,
    trace: Option<&mut (dyn Write + '_)>,
) -> ProcMeasure {
    let mut ev = Eval {
        scan,
        params,
        trace,
        name,
        proc_line,
        end,
        depth: 0,
        depth_high: 0,
        goto_ct: 0,
        colon_need: 0,
        start_marks: None,
    };
    ev.run()
}

/// One scoring pass: the scan cursor, the resolved knobs, and the
/// bookkeeping the statement handlers share.
struct Eval<'a, 'w> {
    scan: &'a mut Scanner,
    params: &'a ScoreParams,
    trace: Option<&'a mut (dyn Write + 'w)>,
    name: &'a str,
    proc_line: u32,
    end: usize,
    depth: u32,
    depth_high: u32,
    goto_ct: u32,
    colon_need: u32,
    /// (line, non-comment line) at the first body token.
    start_marks: Option<(u32, u32)>,
}

impl Eval<'_, '_> {
    fn run(&mut self) -> ProcMeasure {
        let mut score = match self.stmt_block() {
            Ok(s) => s,
            Err(ScanAbort) => {
                eprintln!(
                    "end of {}() in {} reached with open control blocks",
                    self.name,
                    self.scan.file_name()
                );
                return ProcMeasure { score: MAX_SCORE, line_ct: 0, nc_line_ct: 0 };
            }
        };

        if self.goto_ct > 0 {
            score += self.goto_ct as f64 * self.params.scaling;
        }

        if self.depth_high >= 5 {
            eprintln!(
                "NOTE: proc {} in file {} line {}\n\tnesting depth reached level {}",
                self.name,
                self.scan.file_name(),
                self.proc_line,
                self.depth_high
            );
            if self.depth_high >= 7 {
                eprintln!("==>\t*seriously consider rewriting the procedure*.");
            }
        }

        if self.scan.pos() + 2 <= self.end {
            eprintln!(
                "procedure {} in {} ended before final close bracket",
                self.name,
                self.scan.file_name()
            );
            score += self.params.penalty;
        }

        if score < 0.0 {
            score = 0.0;
        } else if score < MAX_SCORE {
            score = (score * self.params.scaling).round();
        }
        if score > MAX_SCORE {
            score = MAX_SCORE;
        }

        // A close brace on a line of its own is not billed to the body.
        let own = {
            let pos = self.scan.pos();
            (pos >= 2 && chars::is_end_of_line(self.scan.text()[pos - 2])) as u32
        };
        let (line_mark, nc_mark) =
            self.start_marks.unwrap_or((self.scan.line(), self.scan.nc_line()));
        ProcMeasure {
            score,
            line_ct: 1 + (self.scan.line() - line_mark) - own,
            nc_line_ct: 1 + (self.scan.nc_line() - nc_mark) - own,
        }
    }

    /// Next token for scoring. Bails once the scan leaves the
    /// procedure. `goto` is billed at the end of the pass and its
    /// target reads as a plain name.
    fn next(&mut self) -> Result<Token, ScanAbort> {
        let mut tok = self.scan.next_token();
        if tok.kind == TokenKind::Eof || self.scan.pos() > self.end {
            return Err(ScanAbort);
        }
        if tok.kind == TokenKind::KwGoto {
            self.goto_ct += 1;
            tok.kind = TokenKind::Name;
        }
        Ok(tok)
    }

    fn trace_score(&mut self, score: f64) {
        if let Some(w) = self.trace.as_deref_mut() {
            let _ = writeln!(w, "line {:5} score {:5}", self.scan.line(), score as u32);
        }
    }

    /// Report a token that cannot appear where it did. The sentinel
    /// return value dooms the whole procedure to the unscored bucket.
    fn bad_token(&self, context: &str, kind: TokenKind) -> f64 {
        eprintln!(
            "error near line {} in {}() of {}:\n  in context {}, token '{}' is invalid",
            self.scan.line(),
            self.name,
            self.scan.file_name(),
            context,
            kind.as_str()
        );
        MAX_SCORE
    }

    /// A token no statement can start with. The cursor jumps to the
    /// recorded end so the next read closes out the procedure.
    fn invalid_transition(&mut self) -> f64 {
        self.scan.seek_to(self.end);
        eprintln!("invalid transition");
        MAX_SCORE
    }

    /// Statement block; the open brace is already consumed. Runs to
    /// the matching close brace.
    fn stmt_block(&mut self) -> StepResult {
        let mut ev = self.next()?;
        if self.start_marks.is_none() {
            self.start_marks = Some((self.scan.line(), self.scan.nc_line()));
        }

        self.depth += 1;
        if self.depth > self.depth_high {
            self.depth_high = self.depth;
        }

        let mut res = 0.0;
        loop {
            if ev.kind == TokenKind::CloseBrace {
                self.trace_score(res);
                self.depth -= 1;
                return Ok(if res > MAX_SCORE { MAX_SCORE } else { res });
            }
            res += self.dispatch(ev)?;
            ev = self.next()?;
        }
    }

    /// Statement-level dispatch on the token that opens it.
    fn dispatch(&mut self, ev: Token) -> StepResult {
        match ev.kind {
            TokenKind::Name | TokenKind::Number | TokenKind::ArithOp | TokenKind::Question => {
                self.expression()
            }
            TokenKind::OpenParen => {
                self.scan.unget_token();
                self.expression()
            }
            TokenKind::Semi => Ok(1.0),
            TokenKind::Comma | TokenKind::KwElse => Ok(0.0),
            TokenKind::OpenBrace => self.stmt_block(),
            TokenKind::OpenBracket => self.array_init(),
            TokenKind::KwIf => self.if_statement(),
            TokenKind::KwDo => self.do_statement(),
            TokenKind::KwFor | TokenKind::KwSwitch | TokenKind::KwWhile => self.loop_statement(),
            TokenKind::KwCase => self.case_label(),
            TokenKind::KwDefault => self.default_label(),
            _ => Ok(self.invalid_transition()),
        }
    }

    /// Nested control statement; the keyword is already consumed.
    fn control(&mut self, kind: TokenKind) -> StepResult {
        match kind {
            TokenKind::KwIf => self.if_statement(),
            TokenKind::KwDo => self.do_statement(),
            _ => self.loop_statement(),
        }
    }

    /// Expression statement: one point, plus one per comma, plus any
    /// nested work, with a floor of the non-comment lines it spans.
    fn expression(&mut self) -> StepResult {
        let mut res = 1.0;
        let start_nc = self.scan.nc_line();
        let mut paren_is_parms = true;
        let mut cbrace_needs_semi = false;

        loop {
            let ltk = self.scan.last_kind();
            let ev = self.next()?;
            let mut next_paren_is_parms = false;
            let mut next_cbrace_needs_semi = false;

            match ev.kind {
                TokenKind::CloseBrace => {
                    self.trace_score(res);
                    self.scan.unget_token();
                    break;
                }
                TokenKind::CloseBracket | TokenKind::CloseParen => {
                    self.scan.unget_token();
                    break;
                }
                TokenKind::Comma => res += 1.0,
                TokenKind::Semi => break,
                TokenKind::OpenParen => {
                    if paren_is_parms {
                        // the called name was already counted
                        res += self.parms()? - 1.0;
                    } else {
                        res += self.subexpr(false)?;
                        next_paren_is_parms = true;
                    }
                }
                TokenKind::Name => next_paren_is_parms = true,
                TokenKind::OpenBrace => {
                    res += self.params.penalty * self.stmt_block()?;
                    if !cbrace_needs_semi {
                        // A macro turned into a block-structured command.
                        // Claim a semicolon so the caller closes the
                        // statement.
                        self.scan.set_last_kind(TokenKind::Semi);
                        break;
                    }
                }
                TokenKind::OpenBracket => res += self.bracket_expr()? - 1.0,
                TokenKind::Assign => next_cbrace_needs_semi = true,
                TokenKind::Colon => {
                    // A name followed by a colon is a statement label,
                    // unless a ternary is still waiting for its colon.
                    if self.colon_need > 0 {
                        self.colon_need -= 1;
                    } else if ltk == TokenKind::Name {
                        break;
                    }
                }
                TokenKind::Question => self.colon_need += 1,
                _ => {}
            }

            paren_is_parms = next_paren_is_parms;
            cbrace_needs_semi = next_cbrace_needs_semi;
        }

        let min = 1.0 + (self.scan.nc_line() - start_nc) as f64;
        if res < min {
            res = min;
        } else if res > MAX_SCORE {
            res = MAX_SCORE;
        }
        Ok(res)
    }

    /// Parenthesized expression; the open paren is consumed. A `for`
    /// head gets its operator mix free.
    fn subexpr(&mut self, is_for_clause: bool) -> StepResult {
        let mut saw_name = false;
        let mut tkn_ct = 0u32;
        let mut mix = OpMix::default();
        let mut res = 1.0;
        let start_nc = self.scan.nc_line();

        loop {
            let mut ev = self.next()?;
            tkn_ct += 1;

            match ev.kind {
                TokenKind::CloseParen => {
                    if tkn_ct <= 2 {
                        // a bare name or value in parens
                        return Ok(0.0);
                    }
                    if !is_for_clause
                        && let Some((extra, msg)) =
                            mix.settle(self.params.penalty, self.params.demi_penalty)
                    {
                        res += extra;
                        if let Some(w) = self.trace.as_deref_mut() {
                            let _ = writeln!(
                                w,
                                "line {:5} expression score adjusted due to mix of {}",
                                self.scan.line(),
                                msg
                            );
                        }
                    }
                    res += (self.scan.nc_line() - start_nc) as f64;
                    if res > 1.0 {
                        res -= 1.0;
                    }
                    self.trace_score(res);
                    return Ok(res);
                }
                TokenKind::OpenParen => {
                    if saw_name {
                        res += self.parms()?;
                    } else {
                        res += self.subexpr(false)? * self.params.demi_penalty;
                        // Never saw a name, but a parenthesized value can
                        // still be called or indexed. Pretend.
                        ev.kind = TokenKind::Name;
                    }
                }
                TokenKind::Assign => mix.assign_ct += 1,
                TokenKind::LogicAnd => mix.and_ct += 1,
                TokenKind::LogicOr => mix.or_ct += 1,
                TokenKind::RelOp => mix.relop_ct += 1,
                TokenKind::Comma | TokenKind::Semi => res += 1.0,
                TokenKind::Name
                | TokenKind::Number
                | TokenKind::ArithOp
                | TokenKind::Colon
                | TokenKind::Question => {}
                TokenKind::OpenBrace => res += self.params.penalty * self.stmt_block()?,
                TokenKind::OpenBracket => res += self.bracket_expr()?,
                _ => return Ok(self.bad_token("parenthesized expression", ev.kind)),
            }

            saw_name = ev.kind == TokenKind::Name;
        }
    }

    /// Call arguments. Free unless they spread over lines or carry
    /// parenthesized work of their own.
    fn parms(&mut self) -> StepResult {
        let mut res = 0.0;
        let start_nc = self.scan.nc_line();

        loop {
            let ev = self.next()?;
            match ev.kind {
                TokenKind::CloseParen => {
                    return Ok(res + (self.scan.nc_line() - start_nc) as f64);
                }
                TokenKind::OpenParen => {
                    let s = self.subexpr(false)?;
                    if s > 0.0 {
                        res += s;
                    }
                }
                TokenKind::OpenBrace => res += self.params.penalty * self.stmt_block()?,
                TokenKind::OpenBracket => {
                    let s = self.bracket_expr()?;
                    if s > 1.0 {
                        res += s - 1.0;
                    }
                }
                _ => {
                    // the argument's own tokens are free
                    self.expression()?;
                }
            }
        }
    }

    /// Square-bracketed run: one expression, or a comma list where
    /// each comma already paid for itself.
    fn bracket_expr(&mut self) -> StepResult {
        let mut res = 0.0;
        loop {
            res += self.expression()?;
            if self.scan.last_kind() != TokenKind::Comma {
                break;
            }
            res -= 1.0;
        }

        let ev = self.next()?;
        match ev.kind {
            TokenKind::CloseBracket => Ok(if res > MAX_SCORE { MAX_SCORE } else { res }),
            _ => Ok(self.bad_token("bracketed block", ev.kind)),
        }
    }

    /// Statement opening with a subscript: a designated array element
    /// initializer, `[ix] = expr`.
    fn array_init(&mut self) -> StepResult {
        let res = self.bracket_expr()? - 1.0;
        let ev = self.next()?;
        if ev.kind != TokenKind::Assign {
            return Ok(self.bad_token("array element initializer", ev.kind));
        }
        Ok(res + self.expression()?)
    }

    /// `if` statement, including any `else if` cascade. Every tested
    /// condition adds its head score plus one; the cascade itself adds
    /// no nesting.
    fn if_statement(&mut self) -> StepResult {
        let mut res = 0.0;

        'cascade: loop {
            let ev = self.next()?;
            if ev.kind != TokenKind::OpenParen {
                return Ok(self.bad_token("if expression", ev.kind));
            }
            res += self.subexpr(false)? + 1.0;

            let mut then_clause_done = false;
            let mut ev = self.next()?;

            'clause: loop {
                match ev.kind {
                    TokenKind::OpenBrace => res += self.params.penalty * self.stmt_block()?,
                    TokenKind::Semi => {}
                    TokenKind::OpenParen => {
                        res += self.subexpr(false)?;
                        res += self.expression()?;
                    }
                    TokenKind::Comma => {
                        ev = self.next()?;
                        continue 'clause;
                    }
                    TokenKind::OpenBracket => {
                        res += self.bracket_expr()? - 1.0;
                        res += self.expression()?;
                    }
                    TokenKind::ArithOp | TokenKind::Name | TokenKind::Number => {
                        res += self.expression()?;
                    }
                    TokenKind::KwIf
                    | TokenKind::KwDo
                    | TokenKind::KwFor
                    | TokenKind::KwSwitch
                    | TokenKind::KwWhile => {
                        res += self.params.penalty * self.control(ev.kind)?;
                    }
                    _ => return Ok(self.bad_token("bad if block", ev.kind)),
                }

                if then_clause_done {
                    return Ok(res);
                }

                let held = self.scan.last_kind();
                let probe = self.next()?;
                if probe.kind != TokenKind::KwElse {
                    // Not ours; put it back for the caller.
                    self.scan.unget_token();
                    self.scan.set_last_kind(held);
                    return Ok(res);
                }

                ev = self.next()?;
                if ev.kind == TokenKind::KwIf {
                    continue 'cascade;
                }
                then_clause_done = true;
            }
        }
    }

    /// `for`, `while`, and `switch` share a shape: a parenthesized
    /// head and one controlled statement. Only a real `for` gets its
    /// head unscaled and its operator mix free.
    fn loop_statement(&mut self) -> StepResult {
        let real_for = self.scan.last_kind() == TokenKind::KwFor;
        let ev = self.next()?;
        if ev.kind != TokenKind::OpenParen {
            return Ok(self.bad_token("loop expression", ev.kind));
        }

        let mut res = self.subexpr(real_for)?;
        if res < 1.0 {
            res = 1.0;
        }
        if !real_for {
            res *= self.params.penalty;
        }

        loop {
            let ev = self.next()?;
            match ev.kind {
                TokenKind::OpenBrace => {
                    res += self.params.penalty * self.stmt_block()?;
                    return Ok(res);
                }
                TokenKind::Semi => return Ok(res),
                TokenKind::KwIf
                | TokenKind::KwDo
                | TokenKind::KwFor
                | TokenKind::KwSwitch
                | TokenKind::KwWhile => {
                    res += self.params.penalty * self.control(ev.kind)?;
                    return Ok(res);
                }
                TokenKind::OpenParen => {
                    res += self.subexpr(false)?;
                }
                TokenKind::OpenBracket | TokenKind::Name | TokenKind::Number => {
                    if ev.kind == TokenKind::OpenBracket {
                        res += self.bracket_expr()? - 1.0;
                    }
                    res += self.expression()?;
                    let last = self.scan.last_kind();
                    if last == TokenKind::Semi {
                        return Ok(res);
                    }
                    if last != TokenKind::Comma {
                        return Ok(self.bad_token("loop body ended badly", last));
                    }
                    // a comma: more of the same statement follows
                }
                _ => {}
            }
        }
    }

    /// `do ... while (...)`. The body is charged first, the trailing
    /// condition like a loop head.
    fn do_statement(&mut self) -> StepResult {
        let mut res = 1.0;
        let ev = self.next()?;

        match ev.kind {
            TokenKind::OpenBrace => res += self.params.penalty * self.stmt_block()?,
            TokenKind::OpenParen => {
                self.scan.unget_token();
                res += self.expression()?;
            }
            TokenKind::KwIf
            | TokenKind::KwDo
            | TokenKind::KwFor
            | TokenKind::KwSwitch
            | TokenKind::KwWhile => res += self.params.penalty * self.control(ev.kind)?,
            _ => res += self.expression()?,
        }

        let ev = self.next()?;
        if ev.kind != TokenKind::KwWhile {
            return Ok(self.bad_token("'do ...' missing 'while'", ev.kind));
        }
        let ev = self.next()?;
        if ev.kind != TokenKind::OpenParen {
            return Ok(self.bad_token("while loop expression", ev.kind));
        }

        let mut cond = self.params.penalty * self.subexpr(false)?;
        if cond < 1.0 {
            cond = 1.0;
        }
        res += cond;

        let ev = self.next()?;
        if ev.kind != TokenKind::Semi {
            return Ok(self.bad_token("do...while() missing semicolon", ev.kind));
        }
        Ok(res)
    }

    /// `case` label through its colon. A parenthesized case value adds
    /// its complexity; a case range adds two.
    fn case_label(&mut self) -> StepResult {
        let mut res = 1.0;
        let mut ellipsis_ct = 0.0;

        loop {
            let ev = self.next()?;
            match ev.kind {
                TokenKind::OpenParen => {
                    let s = self.subexpr(false)?;
                    if s > 0.0 {
                        res += s - 1.0;
                    }
                }
                TokenKind::ArithOp | TokenKind::RelOp | TokenKind::Name | TokenKind::Number => {}
                TokenKind::Colon => return Ok(res + ellipsis_ct),
                TokenKind::Ellipsis => {
                    if ellipsis_ct > 0.0 {
                        return Ok(self.bad_token("'case' statement ellipsis", ev.kind));
                    }
                    ellipsis_ct = 2.0;
                }
                _ => return Ok(self.bad_token("'case' statement", ev.kind)),
            }
        }
    }

    fn default_label(&mut self) -> StepResult {
        let ev = self.next()?;
        if ev.kind != TokenKind::Colon {
            return Ok(self.bad_token("'default' missing colon", ev.kind));
        }
        Ok(1.0)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
