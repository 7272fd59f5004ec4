//! Declaration parsing.
//!
//! Supported constructs:
//! - `package a.b.c`
//! - `import a.b.C`, `import a.b.*`, `import a.b.C as D`
//! - `fun name(params): Type { ... }` and `fun name(params) = expr`
//! - `val`/`var` properties with optional type and initializer
//! - `class`/`interface` with primary constructor, supertypes and body
//! - `object Name : Super { ... }`
//!
//! Modifiers are soft keywords: an identifier only counts as a modifier when
//! it is followed by a declaration keyword or another modifier.

use crate::lexer::TokenKind;
use crate::syntax::SyntaxKind;

use super::super::{Marker, Parser};

const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "open",
    "abstract",
    "override",
    "final",
    "data",
    "inline",
    "suspend",
    "const",
    "lateinit",
];

impl Parser<'_, '_> {
    /// Parse `package a.b.c` if present.
    pub(crate) fn parse_package_directive(&mut self) {
        if !self.at(TokenKind::KwPackage) {
            return;
        }
        let m = self.start();
        self.bump(); // package
        self.parse_qualified_name(false);
        m.complete(self, SyntaxKind::PackageDirective);
    }

    /// Parse consecutive import directives into an `ImportList`.
    pub(crate) fn parse_import_list(&mut self) {
        if !self.at(TokenKind::KwImport) {
            return;
        }
        let m = self.start();
        while self.at(TokenKind::KwImport) {
            self.parse_import_directive();
        }
        m.complete(self, SyntaxKind::ImportList);
    }

    fn parse_import_directive(&mut self) {
        let m = self.start();
        self.bump(); // import

        if self.at(TokenKind::Ident) {
            let star = self.parse_qualified_name(true);
            if !star && self.at(TokenKind::KwAs) {
                let alias = self.start();
                self.bump();
                self.expect(TokenKind::Ident, "an alias name");
                alias.complete(self, SyntaxKind::ImportAlias);
            }
        } else {
            self.error("expecting a qualified name");
        }

        m.complete(self, SyntaxKind::ImportDirective);
    }

    /// Parse `a.b.c`, optionally ending in `.*`. Returns `true` for a star
    /// import.
    fn parse_qualified_name(&mut self, allow_star: bool) -> bool {
        let m = self.start();
        self.expect(TokenKind::Ident, "a name");

        let mut star = false;
        while self.at(TokenKind::Dot) {
            match self.nth(1) {
                TokenKind::Ident => {
                    self.bump();
                    self.bump();
                }
                TokenKind::Star if allow_star => {
                    self.bump();
                    self.bump();
                    star = true;
                    break;
                }
                _ => {
                    self.bump();
                    self.error("expecting a name");
                    break;
                }
            }
        }

        m.complete(self, SyntaxKind::QualifiedName);
        star
    }

    /// Parse one declaration of a file.
    pub(crate) fn parse_top_level_declaration(&mut self) {
        if self.eat(TokenKind::Semicolon) {
            return;
        }
        if self.at_declaration_start() {
            self.parse_declaration();
            return;
        }
        self.err_recover("expecting a top level declaration", |p| {
            p.at_declaration_start()
        });
    }

    /// Returns `true` if the current token starts a declaration.
    pub(crate) fn at_declaration_start(&self) -> bool {
        self.current().is_declaration_keyword() || self.at_modifier()
    }

    fn at_modifier(&self) -> bool {
        self.is_modifier(0)
            && (self.nth(1).is_declaration_keyword() || self.is_modifier(1))
    }

    fn is_modifier(&self, n: usize) -> bool {
        self.nth(n) == TokenKind::Ident && MODIFIERS.contains(&self.nth_text(n))
    }

    /// Parse a declaration with its modifiers.
    pub(crate) fn parse_declaration(&mut self) {
        let m = self.start();

        if self.at_modifier() {
            let modifiers = self.start();
            while self.at_modifier() {
                self.bump();
            }
            modifiers.complete(self, SyntaxKind::ModifierList);
        }

        match self.current() {
            TokenKind::KwFun => self.parse_function(m),
            TokenKind::KwVal | TokenKind::KwVar => self.parse_property(m),
            TokenKind::KwClass | TokenKind::KwInterface => self.parse_class(m),
            TokenKind::KwObject => self.parse_object(m),
            _ => {
                m.error(self, "expecting a declaration");
            }
        }
    }

    fn parse_function(&mut self, m: Marker) {
        self.bump(); // fun
        self.parse_name();

        if self.at(TokenKind::LParen) {
            self.parse_value_parameter_list();
        } else {
            self.error("expecting '('");
        }

        if self.eat(TokenKind::Colon) {
            self.parse_type_ref();
        }

        if self.at(TokenKind::LBrace) {
            self.parse_block();
        } else if self.eat(TokenKind::Eq) {
            self.parse_expression();
        }

        m.complete(self, SyntaxKind::Function);
    }

    fn parse_property(&mut self, m: Marker) {
        self.bump(); // val | var
        self.parse_name();

        if self.eat(TokenKind::Colon) {
            self.parse_type_ref();
        }
        if self.eat(TokenKind::Eq) {
            self.parse_expression();
        }

        m.complete(self, SyntaxKind::Property);
    }

    fn parse_class(&mut self, m: Marker) {
        self.bump(); // class | interface
        self.parse_name();

        if self.at(TokenKind::LParen) {
            let ctor = self.start();
            self.parse_value_parameter_list();
            ctor.complete(self, SyntaxKind::PrimaryConstructor);
        }
        if self.eat(TokenKind::Colon) {
            self.parse_super_type_list();
        }
        if self.at(TokenKind::LBrace) {
            self.parse_class_body();
        }

        m.complete(self, SyntaxKind::Class);
    }

    fn parse_object(&mut self, m: Marker) {
        self.bump(); // object
        self.parse_name();

        if self.eat(TokenKind::Colon) {
            self.parse_super_type_list();
        }
        if self.at(TokenKind::LBrace) {
            self.parse_class_body();
        }

        m.complete(self, SyntaxKind::ObjectDeclaration);
    }

    fn parse_super_type_list(&mut self) {
        let m = self.start();
        loop {
            let entry = self.start();
            self.parse_type_ref();
            if self.at(TokenKind::LParen) && !self.newline_before() {
                self.parse_value_argument_list();
            }
            entry.complete(self, SyntaxKind::SuperTypeEntry);

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        m.complete(self, SyntaxKind::SuperTypeList);
    }

    fn parse_class_body(&mut self) {
        let m = self.start();
        self.bump(); // {
        self.enable_newlines();

        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.at(TokenKind::RBrace) || self.at_end() {
                break;
            }
            if self.at_declaration_start() {
                self.parse_declaration();
            } else {
                self.err_recover("expecting member declaration", |p| {
                    p.at_declaration_start()
                        || p.at(TokenKind::RBrace)
                        || p.at(TokenKind::Semicolon)
                });
            }
        }

        self.restore_newlines();
        self.expect(TokenKind::RBrace, "'}'");
        m.complete(self, SyntaxKind::ClassBody);
    }

    /// Parse a declared name.
    pub(crate) fn parse_name(&mut self) {
        if self.at(TokenKind::Ident) {
            let m = self.start();
            self.bump();
            m.complete(self, SyntaxKind::Name);
        } else {
            self.error("expecting a name");
        }
    }

    /// Parse `(a: Int, b: String = "")`. An unterminated list is wrapped in
    /// an error node.
    pub(crate) fn parse_value_parameter_list(&mut self) {
        let m = self.start();
        self.bump(); // (
        self.disable_newlines();

        loop {
            if self.at(TokenKind::RParen) || self.at_end() {
                break;
            }
            if self.at_any(&[TokenKind::Ident, TokenKind::KwVal, TokenKind::KwVar]) {
                self.parse_value_parameter();
            } else if self.at_parameter_recovery() {
                break;
            } else {
                self.err_and_bump("expecting a parameter");
                continue;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        self.restore_newlines();
        if self.eat(TokenKind::RParen) {
            m.complete(self, SyntaxKind::ValueParameterList);
        } else {
            let list = m.complete(self, SyntaxKind::ValueParameterList);
            list.precede(self).error(self, "expecting ')'");
        }
    }

    fn at_parameter_recovery(&self) -> bool {
        matches!(
            self.current(),
            TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Semicolon
                | TokenKind::KwFun
                | TokenKind::KwClass
                | TokenKind::KwInterface
                | TokenKind::KwObject
        )
    }

    fn parse_value_parameter(&mut self) {
        let m = self.start();
        if self.at(TokenKind::KwVal) || self.at(TokenKind::KwVar) {
            self.bump();
        }
        self.parse_name();
        if self.eat(TokenKind::Colon) {
            self.parse_type_ref();
        } else {
            self.error("expecting ':'");
        }
        if self.eat(TokenKind::Eq) {
            self.parse_expression();
        }
        m.complete(self, SyntaxKind::ValueParameter);
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse_file, parse_script};
    use crate::syntax::SyntaxKind;
    use crate::tree::{LightElement, TreeHandle};

    fn node_kinds(tree: &TreeHandle) -> Vec<SyntaxKind> {
        tree.descendants(tree.root())
            .filter_map(LightElement::into_node)
            .map(|node| tree.kind(node))
            .collect()
    }

    #[test]
    fn test_package_and_imports() {
        let tree = parse_file("package a.b\nimport a.b.C\nimport a.*\nimport x.Y as Z\n");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        let kinds = node_kinds(&tree);
        assert_eq!(
            kinds
                .iter()
                .filter(|&&k| k == SyntaxKind::ImportDirective)
                .count(),
            3
        );
        assert!(kinds.contains(&SyntaxKind::PackageDirective));
        assert!(kinds.contains(&SyntaxKind::ImportAlias));
    }

    #[test]
    fn test_modifiers_are_soft_keywords() {
        let tree = parse_file("private inline fun f() {}");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        let function = tree.child_nodes(tree.root()).next().unwrap();
        let modifiers = tree.child_nodes(function).next().unwrap();
        assert_eq!(tree.kind(modifiers), SyntaxKind::ModifierList);
        assert_eq!(tree.text(modifiers), "private inline");

        let tree = parse_script("open = 1");
        assert!(!node_kinds(&tree).contains(&SyntaxKind::ModifierList));
    }

    #[test]
    fn test_class_with_constructor_supertypes_and_body() {
        let tree = parse_file(
            "data class Point(val x: Int, val y: Int) : Shape(), Comparable<Point> {\n    override fun area(): Double = 0.0\n}\n",
        );
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        let kinds = node_kinds(&tree);
        for expected in [
            SyntaxKind::Class,
            SyntaxKind::PrimaryConstructor,
            SyntaxKind::SuperTypeList,
            SyntaxKind::SuperTypeEntry,
            SyntaxKind::TypeArgumentList,
            SyntaxKind::ClassBody,
            SyntaxKind::Function,
        ] {
            assert!(kinds.contains(&expected), "missing {expected:?}");
        }
    }

    #[test]
    fn test_object_and_interface() {
        let tree = parse_file("interface Shape { fun area(): Double }\nobject Origin : Shape {}\n");
        assert!(!tree.has_errors(), "{:?}", tree.errors());
        let kinds: Vec<_> = tree
            .child_nodes(tree.root())
            .map(|node| tree.kind(node))
            .collect();
        assert_eq!(kinds, vec![SyntaxKind::Class, SyntaxKind::ObjectDeclaration]);
    }

    #[test]
    fn test_garbage_between_declarations_is_one_error() {
        let tree = parse_file("val a = 1\n) ) )\nval b = 2\n");
        let errors = tree.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "expecting a top level declaration");
        let properties = tree
            .child_nodes(tree.root())
            .filter(|&node| tree.kind(node) == SyntaxKind::Property)
            .count();
        assert_eq!(properties, 2);
    }
}
