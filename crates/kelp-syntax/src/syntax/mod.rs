//! Syntax tree types for the kelp surface language.
//!
//! This module provides the `SyntaxKind` enum that covers both tokens and
//! composite nodes, plus the `rowan` language glue used when a light tree is
//! converted into a full lossless CST.

use crate::lexer::TokenKind;
use crate::token_kinds::for_each_token_kind;

macro_rules! define_syntax_kind {
    ($($token:ident),* $(,)?) => {
        /// All syntax node and token kinds.
        ///
        /// This enum includes both token kinds (from the lexer) and composite
        /// node kinds (produced by the parser). Error nodes reuse `Error`.
        // Variants mirror lexer/token names; documenting each would be noisy.
        #[allow(missing_docs)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum SyntaxKind {
            // =========================================================================
            // TOKEN KINDS (mirrors TokenKind)
            // =========================================================================
            $($token,)*

            // COMPOSITE NODE KINDS (produced by parser)
            // =========================================================================
            /// Root node of a source file
            SourceFile,

            /// Root node of a script fragment
            Script,

            /// A package directive: `package a.b`
            PackageDirective,

            /// The imports of a file or script
            ImportList,

            /// An import directive: `import a.b.C`, `import a.b.*`
            ImportDirective,

            /// An import alias: `as Name`
            ImportAlias,

            /// A dotted name in package and import directives: `a.b.c`
            QualifiedName,

            /// Modifiers before a declaration: `private inline`
            ModifierList,

            /// A function declaration: `fun name(params): Type { ... }`
            Function,

            /// A property declaration: `val name: Type = initializer`
            Property,

            /// A class or interface declaration: `class Name(params) : Super { ... }`
            Class,

            /// An object declaration: `object Name : Super { ... }`
            ObjectDeclaration,

            /// A primary constructor parameter list
            PrimaryConstructor,

            /// Supertypes after `:` in a class header
            SuperTypeList,

            /// A single supertype, optionally with constructor arguments
            SuperTypeEntry,

            /// A class body: `{ members }`
            ClassBody,

            /// Parameter list in a declaration: `(a: Int, b: String)`
            ValueParameterList,

            /// Single parameter
            ValueParameter,

            /// A type reference
            TypeRef,

            /// A (possibly qualified) named type: `a.b.C<T>`
            UserType,

            /// A nullable type: `T?`
            NullableType,

            /// Type arguments: `<A, B>`
            TypeArgumentList,

            /// A declared name (identifier)
            Name,

            /// A block of statements: `{ ... }`
            Block,

            /// If expression: `if (cond) a else b`
            IfExpr,

            /// Parenthesised condition of `if`/`while`
            Condition,

            /// Then branch of an `if`
            ThenBranch,

            /// Else branch of an `if`
            ElseBranch,

            /// When expression: `when (x) { ... }`
            WhenExpr,

            /// A `when` entry: `cond, cond -> body` or `else -> body`
            WhenEntry,

            /// A single `when` condition
            WhenCondition,

            /// While loop: `while (cond) body`
            WhileExpr,

            /// For loop: `for (x in xs) body`
            ForExpr,

            /// The loop variable of a `for`
            LoopParameter,

            /// The iterated expression of a `for`
            LoopRange,

            /// The body of a loop
            LoopBody,

            /// Return expression: `return`, `return@label value`
            ReturnExpr,

            /// Break expression: `break`, `break@label`
            BreakExpr,

            /// Continue expression: `continue`, `continue@label`
            ContinueExpr,

            /// A label reference glued to a jump: `@label`
            LabelRef,

            /// Binary expression: `a + b`, `a = b`
            BinaryExpr,

            /// Prefix expression: `-x`, `!x`, `++x`
            PrefixExpr,

            /// Postfix expression: `x++`, `x!!`
            PostfixExpr,

            /// Parenthesized expression: `(expr)`
            ParenExpr,

            /// Call: `f(args)`, `f<T>(args)`, `f { lambda }`
            CallExpr,

            /// Argument list in a call
            ValueArgumentList,

            /// Single argument (may be named: `name = value`)
            ValueArgument,

            /// Index expression: `a[i]`
            IndexExpr,

            /// Member access: `a.b`
            DotQualifiedExpr,

            /// Safe member access: `a?.b`
            SafeAccessExpr,

            /// Name reference (variable, function, type segment)
            NameRef,

            /// Literal value
            Literal,

            /// This reference: `this`
            ThisExpr,

            /// Lambda literal: `{ a, b -> body }`
            LambdaExpr,
        }
    };
}

for_each_token_kind!(define_syntax_kind);

impl SyntaxKind {
    /// Returns `true` if this is a trivia kind.
    #[must_use]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::LineComment | Self::BlockComment
        )
    }

    /// Returns `true` if this is a token kind (not a composite node).
    #[must_use]
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::Eof as u16)
    }

    /// Returns `true` if this is a composite node kind.
    #[must_use]
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns `true` for the two compilation-unit roots.
    #[must_use]
    pub fn is_root(self) -> bool {
        matches!(self, Self::SourceFile | Self::Script)
    }
}

macro_rules! map_token_kinds {
    ($($name:ident),* $(,)?) => {
        impl From<TokenKind> for SyntaxKind {
            fn from(kind: TokenKind) -> Self {
                match kind {
                    $(TokenKind::$name => SyntaxKind::$name,)*
                }
            }
        }
    };
}

for_each_token_kind!(map_token_kinds);

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// The `rowan` language type for kelp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KelpLanguage {}

macro_rules! define_syntax_kinds {
    ($($token:ident),* $(,)?) => {
        const SYNTAX_KINDS: &[SyntaxKind] = &[
            $(SyntaxKind::$token,)*
            SyntaxKind::SourceFile,
            SyntaxKind::Script,
            SyntaxKind::PackageDirective,
            SyntaxKind::ImportList,
            SyntaxKind::ImportDirective,
            SyntaxKind::ImportAlias,
            SyntaxKind::QualifiedName,
            SyntaxKind::ModifierList,
            SyntaxKind::Function,
            SyntaxKind::Property,
            SyntaxKind::Class,
            SyntaxKind::ObjectDeclaration,
            SyntaxKind::PrimaryConstructor,
            SyntaxKind::SuperTypeList,
            SyntaxKind::SuperTypeEntry,
            SyntaxKind::ClassBody,
            SyntaxKind::ValueParameterList,
            SyntaxKind::ValueParameter,
            SyntaxKind::TypeRef,
            SyntaxKind::UserType,
            SyntaxKind::NullableType,
            SyntaxKind::TypeArgumentList,
            SyntaxKind::Name,
            SyntaxKind::Block,
            SyntaxKind::IfExpr,
            SyntaxKind::Condition,
            SyntaxKind::ThenBranch,
            SyntaxKind::ElseBranch,
            SyntaxKind::WhenExpr,
            SyntaxKind::WhenEntry,
            SyntaxKind::WhenCondition,
            SyntaxKind::WhileExpr,
            SyntaxKind::ForExpr,
            SyntaxKind::LoopParameter,
            SyntaxKind::LoopRange,
            SyntaxKind::LoopBody,
            SyntaxKind::ReturnExpr,
            SyntaxKind::BreakExpr,
            SyntaxKind::ContinueExpr,
            SyntaxKind::LabelRef,
            SyntaxKind::BinaryExpr,
            SyntaxKind::PrefixExpr,
            SyntaxKind::PostfixExpr,
            SyntaxKind::ParenExpr,
            SyntaxKind::CallExpr,
            SyntaxKind::ValueArgumentList,
            SyntaxKind::ValueArgument,
            SyntaxKind::IndexExpr,
            SyntaxKind::DotQualifiedExpr,
            SyntaxKind::SafeAccessExpr,
            SyntaxKind::NameRef,
            SyntaxKind::Literal,
            SyntaxKind::ThisExpr,
            SyntaxKind::LambdaExpr,
        ];
    };
}

for_each_token_kind!(define_syntax_kinds);

impl rowan::Language for KelpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SYNTAX_KINDS
            .get(raw.0 as usize)
            .copied()
            .unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// A syntax node in the full kelp CST.
pub type SyntaxNode = rowan::SyntaxNode<KelpLanguage>;

/// A syntax token in the full kelp CST.
pub type SyntaxToken = rowan::SyntaxToken<KelpLanguage>;

/// A syntax element (either node or token) in the full kelp CST.
pub type SyntaxElement = rowan::SyntaxElement<KelpLanguage>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn test_token_kind_to_syntax_kind() {
        assert_eq!(SyntaxKind::from(TokenKind::KwFun), SyntaxKind::KwFun);
        assert_eq!(SyntaxKind::from(TokenKind::Ident), SyntaxKind::Ident);
        assert_eq!(SyntaxKind::from(TokenKind::Eof), SyntaxKind::Eof);
    }

    #[test]
    fn test_discriminants_line_up() {
        assert_eq!(TokenKind::Eof as u16, SyntaxKind::Eof as u16);
        assert_eq!(TokenKind::SafeAccess as u16, SyntaxKind::SafeAccess as u16);
    }

    #[test]
    fn test_raw_round_trip_for_every_kind() {
        for (raw, kind) in SYNTAX_KINDS.iter().enumerate() {
            assert_eq!(*kind as usize, raw);
            assert_eq!(KelpLanguage::kind_from_raw(KelpLanguage::kind_to_raw(*kind)), *kind);
        }
    }

    #[test]
    fn test_is_token_vs_node() {
        assert!(SyntaxKind::Ident.is_token());
        assert!(SyntaxKind::KwIf.is_token());
        assert!(!SyntaxKind::IfExpr.is_token());
        assert!(SyntaxKind::Function.is_node());
        assert!(SyntaxKind::Script.is_root());
        assert!(!SyntaxKind::Block.is_root());
    }
}
