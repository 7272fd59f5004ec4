//! Shared helpers for parser tests.
#![allow(dead_code, unused_imports)]

pub use kelp_syntax::{
    parse_file, parse_script, LightElement, NodeRef, SyntaxKind, TokenRef, TreeHandle,
};
use text_size::TextRange;

/// A program touching most of the grammar.
pub const SAMPLE: &str = r#"package demo.shapes

import kotlin.math.sqrt
import demo.util.*

/* Shapes with
   an area. */
interface Shape {
    fun area(): Double
}

data class Circle(val radius: Double) : Shape {
    override fun area(): Double = 3.14 * radius * radius
}

object Registry {
    private var shapes: List<Shape>? = null
}

fun describe(shape: Shape, verbose: Boolean = false): String {
    val area = shape.area()
    if (verbose && area > 10.0) {
        return "large"
    } else if (area in 1.0..10.0) return "medium"
    val label = when (shape) {
        is_circle(shape) -> "circle"
        else -> "other"
    }
    for (i in 0..3) {
        if (i % 2 == 0) continue
        println(i)
    }
    val total = listOf<Int>(1, 2, 3).map { x -> x * 2 }.sum()
    var n = total ?: 0
    n++
    while (n > 0) n -= 1
    return label + sqrt(area)?.toString()!!
}
"#;

/// Formats a file parse for snapshot testing.
pub fn snapshot_parse(source: &str) -> String {
    format_tree(&parse_file(source))
}

/// Formats a script parse for snapshot testing.
pub fn snapshot_script(source: &str) -> String {
    format_tree(&parse_script(source))
}

fn format_tree(tree: &TreeHandle) -> String {
    let mut output = tree.debug_dump();
    if tree.has_errors() {
        output.push_str("---\nErrors:\n");
        for err in tree.errors() {
            output.push_str(&format!("  - {err}\n"));
        }
    }
    output
}

/// Kinds and ranges of all token leaves, in order.
pub fn token_leaves(tree: &TreeHandle) -> Vec<(SyntaxKind, TextRange)> {
    tree.tokens(tree.root())
        .map(|token| (tree.token_kind(token), tree.token_range(token)))
        .collect()
}

/// Concatenates the full text (leading trivia included) of every token leaf.
pub fn reconstruct(tree: &TreeHandle) -> String {
    tree.tokens(tree.root())
        .map(|token| tree.token_full_text(token))
        .collect()
}

/// Compact structural rendering: `Kind(child child ...)`, tokens as text.
pub fn shape(tree: &TreeHandle, node: NodeRef) -> String {
    let children: Vec<String> = tree
        .children(node)
        .map(|child| match child {
            LightElement::Node(node) => shape(tree, node),
            LightElement::Token(token) => tree.token_text(token).to_string(),
        })
        .collect();
    format!("{:?}({})", tree.kind(node), children.join(" "))
}

/// All nodes of the given kind, in preorder.
pub fn find_nodes(tree: &TreeHandle, kind: SyntaxKind) -> Vec<NodeRef> {
    tree.descendants(tree.root())
        .filter_map(LightElement::into_node)
        .filter(|&node| tree.kind(node) == kind)
        .collect()
}

/// Every node of the tree, root included.
pub fn all_nodes(tree: &TreeHandle) -> Vec<NodeRef> {
    std::iter::once(tree.root())
        .chain(tree.descendants(tree.root()).filter_map(LightElement::into_node))
        .collect()
}
