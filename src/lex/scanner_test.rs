use super::*;

fn scan_all(src: &str) -> Vec<Token> {
    let mut sc = Scanner::new("test.c", src.as_bytes().to_vec());
    let mut out = Vec::new();
    loop {
        let tok = sc.next_token();
        let done = tok.kind == TokenKind::Eof;
        out.push(tok);
        if done {
            break;
        }
    }
    out
}

/// Kinds of all tokens, without the trailing Eof.
fn kinds(src: &str) -> Vec<TokenKind> {
    let mut v: Vec<TokenKind> = scan_all(src).iter().map(|t| t.kind).collect();
    v.pop();
    v
}

fn texts(src: &str) -> Vec<String> {
    let mut sc = Scanner::new("test.c", src.as_bytes().to_vec());
    let mut out = Vec::new();
    loop {
        let tok = sc.next_token();
        if tok.kind == TokenKind::Eof {
            break;
        }
        out.push(sc.token_text(&tok).into_owned());
    }
    out
}

use TokenKind::*;

// --- operators ---

#[test]
fn multi_char_operators_resolve_greedily() {
    assert_eq!(kinds("a != b"), vec![Name, RelOp, Name]);
    assert_eq!(kinds("a <= b >= c"), vec![Name, RelOp, Name, RelOp, Name]);
    assert_eq!(kinds("a == b"), vec![Name, RelOp, Name]);
    assert_eq!(kinds("a = b"), vec![Name, Assign, Name]);
    assert_eq!(kinds("a += b -= c *= d /= e %= f"), vec![
        Name, Assign, Name, Assign, Name, Assign, Name, Assign, Name, Assign, Name
    ]);
    assert_eq!(kinds("a <<= b"), vec![Name, Assign, Name]);
    assert_eq!(kinds("a >>= b"), vec![Name, Assign, Name]);
    assert_eq!(kinds("a << b >> c"), vec![Name, ArithOp, Name, ArithOp, Name]);
    assert_eq!(kinds("a < b > c"), vec![Name, RelOp, Name, RelOp, Name]);
}

#[test]
fn boolean_and_bitwise_forms() {
    assert_eq!(kinds("a && b"), vec![Name, LogicAnd, Name]);
    assert_eq!(kinds("a || b"), vec![Name, LogicOr, Name]);
    assert_eq!(kinds("a & b | c"), vec![Name, ArithOp, Name, ArithOp, Name]);
    assert_eq!(kinds("a &= b |= c ^= d"), vec![Name, Assign, Name, Assign, Name, Assign, Name]);
    assert_eq!(kinds("!a"), vec![ArithOp, Name]);
}

#[test]
fn increment_decrement_and_arrow_are_arithmetic() {
    assert_eq!(kinds("a++ --b"), vec![Name, ArithOp, ArithOp, Name]);
    assert_eq!(kinds("p->q"), vec![Name, ArithOp, Name]);
}

#[test]
fn ellipsis_needs_all_three_dots() {
    assert_eq!(kinds("a ... b"), vec![Name, Ellipsis, Name]);
    assert_eq!(kinds("a .. b"), vec![Name, ArithOp, ArithOp, Name]);
    assert_eq!(kinds("s.f"), vec![Name, ArithOp, Name]);
}

#[test]
fn question_colon_and_tilde() {
    assert_eq!(kinds("a ? b : c"), vec![Name, Question, Name, Colon, Name]);
    assert_eq!(kinds("~a"), vec![ArithOp, Name]);
}

#[test]
fn stray_backslash_is_a_noop() {
    assert_eq!(kinds("a \\ b"), vec![Name, Name]);
}

// --- names, numbers, keywords ---

#[test]
fn keywords_are_recognized() {
    assert_eq!(kinds("if (x) while (y)"), vec![
        KwIf, OpenParen, Name, CloseParen, KwWhile, OpenParen, Name, CloseParen
    ]);
    assert_eq!(kinds("case default do else for goto switch"), vec![
        KwCase, KwDefault, KwDo, KwElse, KwFor, KwGoto, KwSwitch
    ]);
}

#[test]
fn keyword_prefix_of_longer_word_is_a_name() {
    assert_eq!(kinds("default_value"), vec![Name]);
    assert_eq!(kinds("iffy doit whilelse"), vec![Name, Name, Name]);
}

#[test]
fn uppercase_underscore_dollar_start_names() {
    assert_eq!(kinds("Case _if $sys"), vec![Name, Name, Name]);
}

#[test]
fn numbers_scan_as_single_tokens() {
    assert_eq!(kinds("0xFF 123u 9L"), vec![Number, Number, Number]);
    // A dot is not a name byte, so a float splits.
    assert_eq!(kinds("1.5"), vec![Number, ArithOp, Number]);
}

#[test]
fn qualified_names_merge_into_one_token() {
    assert_eq!(texts("a::b::c d"), vec!["a::b::c", "d"]);
    assert_eq!(kinds("ns::Type x"), vec![Name, Name]);
}

#[test]
fn uppercase_initial_never_merges_qualifiers() {
    assert_eq!(kinds("Foo::bar"), vec![Name, Colon, Colon, Name]);
}

#[test]
fn double_colon_without_name_stays_colons() {
    assert_eq!(kinds("a:: (b)"), vec![Name, Colon, Colon, OpenParen, Name, CloseParen]);
}

#[test]
fn keyword_match_skips_qualifier_merge() {
    assert_eq!(kinds("for::x"), vec![KwFor, Colon, Colon, Name]);
}

// --- literals ---

#[test]
fn string_literals_are_single_name_tokens() {
    assert_eq!(kinds("x = \"a b c\";"), vec![Name, Assign, Name, Semi]);
    assert_eq!(kinds(r#"s = "he said \"hi\"";"#), vec![Name, Assign, Name, Semi]);
    assert_eq!(kinds("c = 'x';"), vec![Name, Assign, Name, Semi]);
    assert_eq!(kinds(r"c = '\'';"), vec![Name, Assign, Name, Semi]);
}

#[test]
fn unterminated_string_ends_the_scan() {
    let toks = scan_all("x = \"never closed");
    assert_eq!(toks.iter().map(|t| t.kind).collect::<Vec<_>>(), vec![Name, Assign, Eof]);
}

// --- comments ---

#[test]
fn block_comments_vanish_and_count_lines() {
    let toks = scan_all("a /* one\ntwo */ b");
    assert_eq!(toks[0].kind, Name);
    assert_eq!(toks[1].kind, Name);
    assert_eq!(toks[0].line, 1);
    assert_eq!(toks[1].line, 2);
}

#[test]
fn tight_comment_closers_parse() {
    assert_eq!(kinds("a /***/ b"), vec![Name, Name]);
    assert_eq!(kinds("a /* ** */ b"), vec![Name, Name]);
}

#[test]
fn unterminated_block_comment_yields_eof() {
    let toks = scan_all("x /* never closed");
    assert_eq!(toks.iter().map(|t| t.kind).collect::<Vec<_>>(), vec![Name, Eof]);
}

#[test]
fn line_comments_run_to_end_of_line() {
    let toks = scan_all("a // rest of line\nb");
    assert_eq!(toks.iter().map(|t| t.kind).collect::<Vec<_>>(), vec![Name, Name, Eof]);
    assert_eq!(toks[1].line, 2);
}

// --- preprocessor ---

#[test]
fn directives_consume_the_whole_line() {
    let toks = scan_all("#define FOO(x) ((x) + 1)\nreal");
    assert_eq!(toks[0].kind, Name);
    assert_eq!(toks[0].line, 2);
}

#[test]
fn directive_continuation_lines_are_counted() {
    let toks = scan_all("#define A \\\n  B \\\n  C\nreal");
    assert_eq!(toks[0].kind, Name);
    assert_eq!(toks[0].line, 4);
}

#[test]
fn directive_may_embed_comments() {
    let toks = scan_all("#if 0 /* note */\nx\n#endif // done\ny");
    let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![Name, Name, Eof]);
    assert_eq!(toks[0].line, 2);
    assert_eq!(toks[1].line, 4);
}

#[test]
fn hash_mid_line_is_an_operator() {
    assert_eq!(kinds("a # b"), vec![Name, ArithOp, Name]);
}

// --- extern "C" ---

#[test]
fn extern_c_prologue_vanishes() {
    let toks = scan_all("extern \"C\" {\nvoid f();");
    let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![Name, Name, OpenParen, CloseParen, Semi, Eof]);
    assert_eq!(toks[0].line, 2);
}

#[test]
fn plain_extern_is_a_name() {
    assert_eq!(texts("extern int x;"), vec!["extern", "int", "x", ";"]);
    assert_eq!(kinds("extern int x;"), vec![Name, Name, Name, Semi]);
}

// --- bookkeeping ---

#[test]
fn pushback_replays_the_same_token() {
    let mut sc = Scanner::new("test.c", b"alpha beta".to_vec());
    let first = sc.next_token();
    sc.unget_token();
    assert_eq!(sc.next_token(), first);
    let second = sc.next_token();
    assert_eq!(sc.token_text(&second).as_ref(), "beta");
}

#[test]
fn pushback_capacity_is_one() {
    let mut sc = Scanner::new("test.c", b"alpha beta".to_vec());
    let first = sc.next_token();
    sc.unget_token();
    sc.unget_token();
    assert_eq!(sc.next_token(), first);
    let second = sc.next_token();
    assert_eq!(sc.token_text(&second).as_ref(), "beta");
}

#[test]
fn non_comment_lines_count_once_per_line() {
    let mut sc = Scanner::new("test.c", b"x = 1;\n// note\n\ny = 2;\n".to_vec());
    while sc.next_token().kind != TokenKind::Eof {}
    assert_eq!(sc.nc_line(), 2);
}

#[test]
fn token_spans_point_into_the_source() {
    let toks = scan_all("  foo bar");
    assert_eq!(toks[0].offset, 2);
    assert_eq!(toks[0].len, 3);
    assert_eq!(toks[1].offset, 6);
    assert_eq!(toks[1].line, 1);
}

#[test]
fn carriage_returns_are_plain_whitespace() {
    let toks = scan_all("a\r\nb\r\n");
    assert_eq!(toks[0].line, 1);
    assert_eq!(toks[1].line, 2);
    assert_eq!(toks[1].kind, Name);
}

#[test]
fn invalid_byte_diagnoses_and_ends_scan() {
    let toks = scan_all("a ` b");
    assert_eq!(toks.iter().map(|t| t.kind).collect::<Vec<_>>(), vec![Name, Eof]);
}

#[test]
fn last_kind_tracks_delivery_and_replay() {
    let mut sc = Scanner::new("test.c", b"a ;".to_vec());
    sc.next_token();
    assert_eq!(sc.last_kind(), TokenKind::Name);
    sc.next_token();
    assert_eq!(sc.last_kind(), TokenKind::Semi);
    sc.unget_token();
    sc.set_last_kind(TokenKind::Name);
    assert_eq!(sc.last_kind(), TokenKind::Name);
    sc.next_token();
    assert_eq!(sc.last_kind(), TokenKind::Semi);
}
