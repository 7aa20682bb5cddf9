//! Dialect-dependent keywords and punctuators.

mod common;

use common::{error_in, kinds_in, lex};
use lualex::{Dialect, Features, Keyword, LexErrorKind, LuaVersion, Options, Punct, TokenKind};
use pretty_assertions::assert_eq;

fn puncts(version: LuaVersion, input: &str) -> Vec<Punct> {
    kinds_in(version, input)
        .into_iter()
        .map(|k| match k {
            TokenKind::Punctuator(p) => p,
            other => panic!("expected punctuator in {input:?}, got {other:?}"),
        })
        .collect()
}

// -----------------------------------------------------------
// goto / labels.
// -----------------------------------------------------------

#[test]
fn goto_keyword_by_version() {
    let goto = |version| kinds_in(version, "goto")[0].clone();
    let name = TokenKind::Identifier("goto".into());
    assert_eq!(goto(LuaVersion::Lua51), name);
    assert_eq!(goto(LuaVersion::Lua52), TokenKind::Keyword(Keyword::Goto));
    assert_eq!(goto(LuaVersion::Lua53), TokenKind::Keyword(Keyword::Goto));
    assert_eq!(goto(LuaVersion::LuaJit), name);
}

#[test]
fn goto_keyword_in_jit_without_contextual_goto() {
    let options = Options::new()
        .lua_version(LuaVersion::LuaJit)
        .disable(Features::CONTEXTUAL_GOTO);
    let tokens = lex("goto", &options).expect("tokenize");
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Goto));
}

#[test]
fn label_punctuator() {
    assert_eq!(
        puncts(LuaVersion::Lua51, "::"),
        vec![Punct::Colon, Punct::Colon]
    );
    for version in [LuaVersion::Lua52, LuaVersion::Lua53, LuaVersion::LuaJit] {
        let kinds = kinds_in(version, "::top::");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Punctuator(Punct::DoubleColon),
                TokenKind::Identifier("top".into()),
                TokenKind::Punctuator(Punct::DoubleColon),
            ]
        );
    }
}

// -----------------------------------------------------------
// Opt-in keywords.
// -----------------------------------------------------------

#[test]
fn const_and_declare_are_opt_in() {
    let plain = kinds_in(LuaVersion::Lua53, "const declare");
    assert_eq!(
        plain,
        vec![
            TokenKind::Identifier("const".into()),
            TokenKind::Identifier("declare".into()),
        ]
    );

    let options = Options::new().enable(Features::CONST | Features::TYPE_CHECK);
    let kinds: Vec<_> = lex("const declare", &options)
        .expect("tokenize")
        .into_iter()
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword(Keyword::Const),
            TokenKind::Keyword(Keyword::Declare),
        ]
    );
}

#[test]
fn booleans_and_nil_are_never_keywords() {
    let dialect = Dialect::from_options(&Options::new().lua_version(LuaVersion::Lua53));
    for word in ["true", "false", "nil"] {
        assert_eq!(dialect.keywords().lookup(word.as_bytes()), None);
    }
}

// -----------------------------------------------------------
// Bitwise operators and integer division.
// -----------------------------------------------------------

#[test]
fn bitwise_operators_in_lua53() {
    assert_eq!(
        puncts(LuaVersion::Lua53, "& | ~ << >> ~= //"),
        vec![
            Punct::Ampersand,
            Punct::Pipe,
            Punct::Tilde,
            Punct::ShiftLeft,
            Punct::ShiftRight,
            Punct::NotEq,
            Punct::DoubleSlash,
        ]
    );
}

#[test]
fn shifts_fall_back_to_comparisons() {
    for version in [LuaVersion::Lua51, LuaVersion::Lua52, LuaVersion::LuaJit] {
        assert_eq!(
            puncts(version, "<< >>"),
            vec![Punct::Less, Punct::Less, Punct::Greater, Punct::Greater],
            "{version}"
        );
    }
}

#[test]
fn integer_division_falls_back_to_slashes() {
    for version in [LuaVersion::Lua51, LuaVersion::Lua52, LuaVersion::LuaJit] {
        assert_eq!(
            puncts(version, "//"),
            vec![Punct::Slash, Punct::Slash],
            "{version}"
        );
    }
}

#[test]
fn ampersand_and_tilde_need_bitwise() {
    for version in [LuaVersion::Lua51, LuaVersion::Lua52, LuaVersion::LuaJit] {
        for input in ["a & b", "~a", "a ~ b"] {
            let err = error_in(version, input);
            assert_eq!(
                err.kind, LexErrorKind::UnexpectedSymbol,
                "{input} {version}"
            );
            assert_eq!(err.span.range.len(), 1);
        }
    }
}

#[test]
fn pipe_is_always_a_punctuator() {
    for version in [LuaVersion::Lua51, LuaVersion::Lua52, LuaVersion::LuaJit] {
        assert_eq!(puncts(version, "|"), vec![Punct::Pipe]);
    }
}

#[test]
fn not_equal_in_every_dialect() {
    for version in [
        LuaVersion::Lua51,
        LuaVersion::Lua52,
        LuaVersion::Lua53,
        LuaVersion::LuaJit,
    ] {
        assert_eq!(puncts(version, "~="), vec![Punct::NotEq]);
    }
}

#[test]
fn bitwise_can_be_enabled_on_lua51() {
    let options = Options::new().enable(Features::BITWISE_OPERATORS);
    let tokens = lex("a << 1", &options).expect("tokenize");
    assert_eq!(tokens[1].kind, TokenKind::Punctuator(Punct::ShiftLeft));
    assert_eq!(tokens[1].span.range, 2..4);
}

#[test]
fn integer_division_can_be_disabled_on_lua53() {
    let options = Options::new()
        .lua_version(LuaVersion::Lua53)
        .disable(Features::INTEGER_DIVISION);
    let tokens = lex("7 // 2", &options).expect("tokenize");
    assert_eq!(tokens.len(), 4);
}

#[test]
fn fat_arrow_is_unconditional() {
    assert_eq!(puncts(LuaVersion::Lua51, "=>"), vec![Punct::FatArrow]);
    assert_eq!(
        puncts(LuaVersion::Lua51, "= >"),
        vec![Punct::Assign, Punct::Greater]
    );
}
