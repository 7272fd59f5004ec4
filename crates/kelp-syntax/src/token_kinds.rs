//! Single source of truth for the token kind list shared by `TokenKind` and
//! `SyntaxKind`. The order must match the declaration order of `TokenKind`.

macro_rules! for_each_token_kind {
    ($callback:ident) => {
        $callback! {
            Whitespace,
            LineComment,
            BlockComment,
            Semicolon,
            Colon,
            Comma,
            Dot,
            SafeAccess,
            Range,
            LParen,
            RParen,
            LBracket,
            RBracket,
            LBrace,
            RBrace,
            At,
            Question,
            Arrow,
            ExclExcl,
            Eq,
            PlusEq,
            MinusEq,
            StarEq,
            SlashEq,
            PercentEq,
            EqEq,
            ExclEq,
            EqEqEq,
            ExclEqEq,
            Lt,
            Gt,
            LtEq,
            GtEq,
            AndAnd,
            OrOr,
            Excl,
            Plus,
            Minus,
            Star,
            Slash,
            Percent,
            PlusPlus,
            MinusMinus,
            Elvis,
            KwPackage,
            KwImport,
            KwFun,
            KwVal,
            KwVar,
            KwClass,
            KwInterface,
            KwObject,
            KwReturn,
            KwBreak,
            KwContinue,
            KwIf,
            KwElse,
            KwWhile,
            KwFor,
            KwIn,
            KwWhen,
            KwNull,
            KwTrue,
            KwFalse,
            KwThis,
            KwAs,
            IntLiteral,
            FloatLiteral,
            CharLiteral,
            StringLiteral,
            Ident,
            Error,
            Eof,
        }
    };
}

pub(crate) use for_each_token_kind;
