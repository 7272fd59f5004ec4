#![no_main]

use kelp_syntax::{parse_file, parse_script, LightElement, TreeHandle};
use libfuzzer_sys::fuzz_target;

const MAX_SOURCE_BYTES: usize = 4096;

fn decode_source(bytes: &[u8]) -> String {
    let capped = &bytes[..bytes.len().min(MAX_SOURCE_BYTES)];
    String::from_utf8_lossy(capped).into_owned()
}

fn check_tree(tree: &TreeHandle, source: &str) {
    let text: String = tree
        .tokens(tree.root())
        .map(|token| tree.token_full_text(token))
        .collect();
    assert_eq!(text, source, "token leaves must reproduce the input");
    assert!(tree.marker_stats().is_balanced());

    for element in tree.descendants(tree.root()) {
        if let LightElement::Node(node) = element {
            assert!(tree.full_range(tree.root()).contains_range(tree.full_range(node)));
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let source = decode_source(data);
    check_tree(&parse_file(&source), &source);
    check_tree(&parse_script(&source), &source);
});
