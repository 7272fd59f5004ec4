//! Conversion of a light tree into a full `rowan` tree.
//!
//! Leading trivia is re-lexed and emitted as separate trivia tokens in front
//! of the token that owns it, so the resulting CST is lossless.

use super::{TreeEvent, TreeHandle};
use crate::lexer::lex_with_text;
use crate::syntax::{SyntaxKind, SyntaxNode};

impl TreeHandle {
    /// Builds a `rowan` green tree equivalent to this light tree.
    #[must_use]
    pub fn to_green(&self) -> rowan::GreenNode {
        let mut builder = rowan::GreenNodeBuilder::new();
        for event in &self.events {
            match *event {
                TreeEvent::Start { kind, .. } => builder.start_node(kind.into()),
                TreeEvent::Token { kind, token } => {
                    let token = &self.tokens[token as usize];
                    let trivia = &self.text[token.trivia_range()];
                    for (piece, text) in lex_with_text(trivia) {
                        builder.token(SyntaxKind::from(piece.kind).into(), text);
                    }
                    if !token.range.is_empty() {
                        builder.token(kind.into(), &self.text[token.range]);
                    }
                }
                TreeEvent::Finish => builder.finish_node(),
            }
        }
        builder.finish()
    }

    /// Returns the root of a red `rowan` tree built from [`to_green`](Self::to_green).
    #[must_use]
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.to_green())
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse_file, parse_script};
    use crate::syntax::SyntaxKind;

    #[test]
    fn test_green_tree_is_lossless() {
        let text = "// lead\nfun f(a: Int) {\n  /* c */ return a\n}\n";
        let tree = parse_file(text);
        let syntax = tree.syntax();
        assert_eq!(syntax.text().to_string(), text);
        assert_eq!(syntax.kind(), SyntaxKind::SourceFile);
    }

    #[test]
    fn test_green_tree_keeps_trivia_tokens() {
        let tree = parse_script("a /* c */ + b");
        let syntax = tree.syntax();
        let kinds: Vec<_> = syntax
            .descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .map(|token| token.kind())
            .collect();
        assert!(kinds.contains(&SyntaxKind::BlockComment));
        assert!(kinds.contains(&SyntaxKind::Whitespace));
    }

    #[test]
    fn test_green_nodes_match_light_nodes() {
        let tree = parse_file("class A(val x: Int) : B() { fun g() = x }");
        let light: Vec<_> = tree
            .descendants(tree.root())
            .filter_map(|element| element.into_node())
            .map(|node| (tree.kind(node), tree.text_range(node)))
            .collect();
        let red: Vec<_> = tree
            .syntax()
            .descendants()
            .skip(1)
            .map(|node| (node.kind(), node.text_range()))
            .collect();
        let light_kinds: Vec<_> = light.iter().map(|(kind, _)| *kind).collect();
        let red_kinds: Vec<_> = red.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(light_kinds, red_kinds);
    }
}
