//! Tree dumps for representative inputs.

mod common;
use common::*;

#[test]
fn test_snapshot_property() {
    insta::assert_snapshot!(snapshot_parse("val x = 1"), @r#"
    SourceFile@0..9
      Property@0..9
        KwVal@0..3 "val"
        Name@4..5
          Ident@4..5 "x"
        Eq@6..7 "="
        Literal@8..9
          IntLiteral@8..9 "1"
      Eof@9..9 ""
    "#);
}

#[test]
fn test_snapshot_unclosed_parameter_list() {
    insta::assert_snapshot!(snapshot_parse("fun f( { }"), @r#"
    SourceFile@0..11
      Function@0..11
        KwFun@0..3 "fun"
        Name@4..5
          Ident@4..5 "f"
        Error@6..7 "expecting ')'"
          ValueParameterList@6..7
            LParen@6..7 "("
        Block@8..11
          LBrace@8..9 "{"
          RBrace@10..11 "}"
      Eof@11..11 ""
    ---
    Errors:
      - expecting ')' at 6..7
    "#);
}

#[test]
fn test_snapshot_call_on_same_line() {
    insta::assert_snapshot!(snapshot_script("f(1)"), @r#"
    Script@0..4
      CallExpr@0..4
        NameRef@0..1
          Ident@0..1 "f"
        ValueArgumentList@1..4
          LParen@1..2 "("
          ValueArgument@2..3
            Literal@2..3
              IntLiteral@2..3 "1"
          RParen@3..4 ")"
      Eof@4..4 ""
    "#);
}

#[test]
fn test_snapshot_parenthesis_on_next_line() {
    insta::assert_snapshot!(snapshot_script("f\n(1)"), @r#"
    Script@0..5
      NameRef@0..1
        Ident@0..1 "f"
      ParenExpr@2..5
        LParen@2..3 "("
        Literal@3..4
          IntLiteral@3..4 "1"
        RParen@4..5 ")"
      Eof@5..5 ""
    "#);
}
