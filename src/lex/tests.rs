use super::*;
use crate::error::ReadErrorKind;
use pretty_assertions::assert_eq;

fn lex(src: &str) -> Vec<(Lexeme, &str)> {
    tokenize(src)
        .map(|tok| tok.map(|tok| (tok.lexeme, tok.text)))
        .collect::<Result<_, _>>()
        .expect("tokenizer error")
}

#[test]
fn test_punctuation_and_atoms() {
    assert_eq!(
        lex("(+ a [b] {c d})"),
        vec![
            (Lexeme::LParen, "("),
            (Lexeme::Atom, "+"),
            (Lexeme::Atom, "a"),
            (Lexeme::LBrack, "["),
            (Lexeme::Atom, "b"),
            (Lexeme::RBrack, "]"),
            (Lexeme::LBrace, "{"),
            (Lexeme::Atom, "c"),
            (Lexeme::Atom, "d"),
            (Lexeme::RBrace, "}"),
            (Lexeme::RParen, ")"),
        ],
    );
}

#[test]
fn test_commas_and_whitespace_separate() {
    assert_eq!(
        lex(" 1,2\t\n3 ,, "),
        vec![(Lexeme::Number, "1"), (Lexeme::Number, "2"), (Lexeme::Number, "3")],
    );
    assert_eq!(lex("   ,\n"), vec![]);
}

#[test]
fn test_splice_unquote_is_greedy() {
    assert_eq!(
        lex("~@a ~b"),
        vec![
            (Lexeme::SpliceUnquote, "~@"),
            (Lexeme::Atom, "a"),
            (Lexeme::Unquote, "~"),
            (Lexeme::Atom, "b"),
        ],
    );
}

#[test]
fn test_reader_macro_markers() {
    assert_eq!(
        lex("'a `b @c ^d"),
        vec![
            (Lexeme::Quote, "'"),
            (Lexeme::Atom, "a"),
            (Lexeme::Quasiquote, "`"),
            (Lexeme::Atom, "b"),
            (Lexeme::Deref, "@"),
            (Lexeme::Atom, "c"),
            (Lexeme::Meta, "^"),
            (Lexeme::Atom, "d"),
        ],
    );
}

#[test]
fn test_numbers_use_longest_match() {
    assert_eq!(
        lex("-12 -x - 123foo"),
        vec![
            (Lexeme::Number, "-12"),
            (Lexeme::Atom, "-x"),
            (Lexeme::Atom, "-"),
            (Lexeme::Number, "123"),
            (Lexeme::Atom, "foo"),
        ],
    );
}

#[test]
fn test_strings_keep_escapes() {
    assert_eq!(
        lex(r#""a \"b\" \\" c"#),
        vec![(Lexeme::Str, r#""a \"b\" \\""#), (Lexeme::Atom, "c")],
    );
}

#[test]
fn test_comment_runs_to_end_of_line() {
    assert_eq!(
        lex("a ; the rest (\nb"),
        vec![
            (Lexeme::Atom, "a"),
            (Lexeme::Comment, "; the rest ("),
            (Lexeme::Atom, "b"),
        ],
    );
}

#[test]
fn test_unterminated_string() {
    let mut tokens = tokenize(r#"(a "bc"#);
    assert_eq!(tokens.next().map(|t| t.map(|t| t.lexeme)), Some(Ok(Lexeme::LParen)));
    assert_eq!(tokens.next().map(|t| t.map(|t| t.lexeme)), Some(Ok(Lexeme::Atom)));
    let err = tokens.next().and_then(Result::err).expect("expected an error");
    assert_eq!(err.kind(), &ReadErrorKind::UnterminatedString);
    assert_eq!(err.region(), SrcRegion::from((3, 6)));
    assert!(tokens.next().is_none());
}

#[test]
fn test_escaped_quote_at_end_is_unterminated() {
    let tokens = tokenize(r#""abc\""#).collect::<Vec<_>>();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_err());
}

#[test]
fn test_tokenizer_is_restartable() {
    let mut tokens = tokenize("(a b)");
    tokens.next();
    let checkpoint = tokens.clone();
    let rest = tokens.map(|t| t.map(|t| t.text)).collect::<Result<Vec<_>, _>>();
    let again = checkpoint.map(|t| t.map(|t| t.text)).collect::<Result<Vec<_>, _>>();
    assert_eq!(rest, Ok(vec!["a", "b", ")"]));
    assert_eq!(rest, again);
}

#[test]
fn test_token_regions() {
    let tokens = tokenize("  (foo)").collect::<Result<Vec<_>, _>>().expect("tokens");
    assert_eq!(tokens[1].region, SrcRegion::from((3, 6)));
    assert_eq!(tokens[1].text, "foo");
}
