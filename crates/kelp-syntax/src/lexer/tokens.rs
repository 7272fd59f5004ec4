//! Token definitions for the kelp surface language.
//!
//! This module defines all lexical tokens that can appear in kelp source code.
//! The token kinds are designed to work with both the `logos` lexer generator
//! and the `rowan` lossless syntax tree library.

use logos::Logos;

fn lex_block_comment(lex: &mut logos::Lexer<TokenKind>) -> bool {
    let mut depth = 1usize;
    let bytes = lex.remainder().as_bytes();
    let mut i = 0usize;

    while i + 1 < bytes.len() {
        if bytes[i] == b'/' && bytes[i + 1] == b'*' {
            depth += 1;
            i += 2;
            continue;
        }
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return true;
            }
            continue;
        }
        i += 1;
    }

    // Unterminated comments swallow the rest of the input and lex as `Error`.
    lex.bump(bytes.len());
    false
}

/// All token kinds of the kelp surface language.
///
/// Token kinds are divided into categories:
/// - Trivia (whitespace, comments) - preserved but folded into the next token
/// - Punctuation and operators
/// - Keywords (hard keywords only; modifiers are contextual identifiers)
/// - Literals
/// - Identifiers
/// - Special tokens (errors, EOF)
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[derive(Default)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    /// Whitespace (spaces, tabs, newlines)
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    /// Single-line comment: // ...
    #[regex(r"//[^\r\n]*", allow_greedy = true)]
    LineComment,

    /// Block comment: /* ... */ (supports nesting).
    #[token("/*", lex_block_comment)]
    BlockComment,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    /// `;`
    #[token(";")]
    Semicolon,

    /// `:`
    #[token(":")]
    Colon,

    /// `,`
    #[token(",")]
    Comma,

    /// `.`
    #[token(".")]
    Dot,

    /// `?.`
    #[token("?.")]
    SafeAccess,

    /// `..`
    #[token("..")]
    Range,

    /// `(`
    #[token("(")]
    LParen,

    /// `)`
    #[token(")")]
    RParen,

    /// `[`
    #[token("[")]
    LBracket,

    /// `]`
    #[token("]")]
    RBracket,

    /// `{`
    #[token("{")]
    LBrace,

    /// `}`
    #[token("}")]
    RBrace,

    /// `@`
    #[token("@")]
    At,

    /// `?`
    #[token("?")]
    Question,

    /// `->`
    #[token("->")]
    Arrow,

    /// `!!`
    #[token("!!")]
    ExclExcl,

    // =========================================================================
    // OPERATORS - Assignment
    // =========================================================================
    /// `=`
    #[token("=")]
    Eq,

    /// `+=`
    #[token("+=")]
    PlusEq,

    /// `-=`
    #[token("-=")]
    MinusEq,

    /// `*=`
    #[token("*=")]
    StarEq,

    /// `/=`
    #[token("/=")]
    SlashEq,

    /// `%=`
    #[token("%=")]
    PercentEq,

    // =========================================================================
    // OPERATORS - Comparison and logic
    // =========================================================================
    /// `==`
    #[token("==")]
    EqEq,

    /// `!=`
    #[token("!=")]
    ExclEq,

    /// `===`
    #[token("===")]
    EqEqEq,

    /// `!==`
    #[token("!==")]
    ExclEqEq,

    /// `<`
    #[token("<")]
    Lt,

    /// `>`
    #[token(">")]
    Gt,

    /// `<=`
    #[token("<=")]
    LtEq,

    /// `>=`
    #[token(">=")]
    GtEq,

    /// `&&`
    #[token("&&")]
    AndAnd,

    /// `||`
    #[token("||")]
    OrOr,

    /// `!`
    #[token("!")]
    Excl,

    // =========================================================================
    // OPERATORS - Arithmetic
    // =========================================================================
    /// `+`
    #[token("+")]
    Plus,

    /// `-`
    #[token("-")]
    Minus,

    /// `*`
    #[token("*")]
    Star,

    /// `/`
    #[token("/")]
    Slash,

    /// `%`
    #[token("%")]
    Percent,

    /// `++`
    #[token("++")]
    PlusPlus,

    /// `--`
    #[token("--")]
    MinusMinus,

    /// `?:`
    #[token("?:")]
    Elvis,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// `package`
    #[token("package")]
    KwPackage,

    /// `import`
    #[token("import")]
    KwImport,

    /// `fun`
    #[token("fun")]
    KwFun,

    /// `val`
    #[token("val")]
    KwVal,

    /// `var`
    #[token("var")]
    KwVar,

    /// `class`
    #[token("class")]
    KwClass,

    /// `interface`
    #[token("interface")]
    KwInterface,

    /// `object`
    #[token("object")]
    KwObject,

    /// `return`
    #[token("return")]
    KwReturn,

    /// `break`
    #[token("break")]
    KwBreak,

    /// `continue`
    #[token("continue")]
    KwContinue,

    /// `if`
    #[token("if")]
    KwIf,

    /// `else`
    #[token("else")]
    KwElse,

    /// `while`
    #[token("while")]
    KwWhile,

    /// `for`
    #[token("for")]
    KwFor,

    /// `in`
    #[token("in")]
    KwIn,

    /// `when`
    #[token("when")]
    KwWhen,

    /// `null`
    #[token("null")]
    KwNull,

    /// `true`
    #[token("true")]
    KwTrue,

    /// `false`
    #[token("false")]
    KwFalse,

    /// `this`
    #[token("this")]
    KwThis,

    /// `as`
    #[token("as")]
    KwAs,

    // =========================================================================
    // LITERALS
    // =========================================================================
    /// Integer literal: 123, 1_000L, 0xFF, 0b1010
    #[regex(r"[0-9]([0-9_]*[0-9])?[lL]?")]
    #[regex(r"0[xX][0-9a-fA-F]([0-9a-fA-F_]*[0-9a-fA-F])?[lL]?")]
    #[regex(r"0[bB][01]([01_]*[01])?[lL]?")]
    IntLiteral,

    /// Floating point literal: 3.14, 1.0e10, 2.5f, 1e-3
    #[regex(r"[0-9]([0-9_]*[0-9])?\.[0-9]([0-9_]*[0-9])?([eE][+-]?[0-9]+)?[fF]?")]
    #[regex(r"[0-9]([0-9_]*[0-9])?[eE][+-]?[0-9]+[fF]?")]
    #[regex(r"[0-9]([0-9_]*[0-9])?[fF]")]
    FloatLiteral,

    /// Character literal: 'a', '\n', 'A'
    #[regex(r"'([^'\\\r\n]|\\[^\r\nu]|\\u[0-9a-fA-F]{4})'")]
    CharLiteral,

    /// String literal: "hello ${name}" (templates are kept opaque)
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#)]
    StringLiteral,

    // =========================================================================
    // IDENTIFIERS
    // =========================================================================
    /// Identifier, including backquoted names: `foo`, `` `is valid` ``
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    #[regex(r"`[^`\r\n]+`")]
    Ident,

    // =========================================================================
    // SPECIAL TOKENS
    // =========================================================================
    /// Lexer error - unrecognized character or unterminated literal
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*"#)]
    #[default]
    Error,

    /// End of file marker (not produced by lexer, appended when folding trivia)
    Eof,
}

impl TokenKind {
    /// Returns `true` if this token is trivia (whitespace or comment).
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }

    /// Returns `true` if this token is a comment.
    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, Self::LineComment | Self::BlockComment)
    }

    /// Returns `true` if this token is a hard keyword.
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::KwPackage as u16) && (self as u16) <= (Self::KwAs as u16)
    }

    /// Returns `true` if this token is a literal.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IntLiteral
                | Self::FloatLiteral
                | Self::CharLiteral
                | Self::StringLiteral
                | Self::KwTrue
                | Self::KwFalse
                | Self::KwNull
        )
    }

    /// Returns `true` if this keyword introduces a declaration.
    pub fn is_declaration_keyword(self) -> bool {
        matches!(
            self,
            Self::KwFun
                | Self::KwVal
                | Self::KwVar
                | Self::KwClass
                | Self::KwInterface
                | Self::KwObject
        )
    }

    /// Returns `true` if this token can start an expression.
    pub fn can_start_expr(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                Self::Ident
                    | Self::KwThis
                    | Self::LParen
                    | Self::LBrace
                    | Self::Minus
                    | Self::Plus
                    | Self::Excl
                    | Self::PlusPlus
                    | Self::MinusMinus
                    | Self::KwIf
                    | Self::KwWhen
                    | Self::KwWhile
                    | Self::KwFor
                    | Self::KwReturn
                    | Self::KwBreak
                    | Self::KwContinue
            )
    }

    /// Returns `true` if a binary operator may continue an expression from
    /// the next line.
    pub fn allows_newline_before(self) -> bool {
        matches!(self, Self::AndAnd | Self::OrOr | Self::Elvis)
    }

    /// Returns the binding power for Pratt parsing (left, right).
    /// Returns None if not an infix operator.
    pub fn infix_binding_power(self) -> Option<(u8, u8)> {
        Some(match self {
            // Right associative
            Self::Eq
            | Self::PlusEq
            | Self::MinusEq
            | Self::StarEq
            | Self::SlashEq
            | Self::PercentEq => (2, 1),
            Self::OrOr => (3, 4),
            Self::AndAnd => (5, 6),
            Self::EqEq | Self::ExclEq | Self::EqEqEq | Self::ExclEqEq => (7, 8),
            Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => (9, 10),
            Self::KwIn => (11, 12),
            Self::Elvis => (13, 14),
            Self::Range => (15, 16),
            Self::Plus | Self::Minus => (17, 18),
            Self::Star | Self::Slash | Self::Percent => (19, 20),
            _ => return None,
        })
    }

    /// Returns the binding power for prefix operators.
    pub fn prefix_binding_power(self) -> Option<u8> {
        Some(match self {
            Self::Minus | Self::Plus | Self::Excl | Self::PlusPlus | Self::MinusMinus => 21,
            _ => return None,
        })
    }
}

impl From<TokenKind> for rowan::SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        Self(kind as u16)
    }
}
