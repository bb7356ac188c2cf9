//! Property-based tests for the node tree
//!
//! 1. Roundtrip property: write -> read reproduces element/text trees
//! 2. `*` selects exactly the immediate children, in order

use proptest::prelude::*;
use simplexml::{Document, Node};

fn arb_tag() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

/// Text without leading/trailing whitespace or newlines, so it survives the
/// trim on read and is written as plain text
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9&<>\"']([a-zA-Z0-9 &<>\"']{0,10}[a-zA-Z0-9&<>\"'])?"
}

fn arb_attributes() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_tag(), "[a-zA-Z0-9 <>&\"']{0,8}"), 0..3)
}

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = (arb_tag(), arb_attributes(), prop::option::of(arb_text())).prop_map(
        |(tag, attrs, value)| {
            let mut node = Node::with_tag(tag);
            for (k, v) in attrs {
                node.set_attribute(k, v);
            }
            if let Some(value) = value {
                node.set_value(value);
            }
            node
        },
    );

    leaf.prop_recursive(4, 32, 4, |inner| {
        (arb_tag(), arb_attributes(), prop::collection::vec(inner, 1..4)).prop_map(
            |(tag, attrs, children)| {
                let mut node = Node::with_tag(tag);
                for (k, v) in attrs {
                    node.set_attribute(k, v);
                }
                for child in children {
                    node.push_child(child);
                }
                node
            },
        )
    })
}

proptest! {
    #[test]
    fn roundtrip_preserves_tree(node in arb_node()) {
        let doc = Document::with_root(node);
        let xml = doc.to_xml_string();
        prop_assert!(xml.is_ok());
        let xml = xml.unwrap_or_default();

        let parsed = simplexml::from_str(&xml);
        prop_assert!(parsed.is_ok(), "failed to read back: {}", xml);
        if let Ok(parsed) = parsed {
            prop_assert_eq!(parsed.root(), doc.root());
        }
    }

    #[test]
    fn wildcard_selects_immediate_children(node in arb_node()) {
        let selected = node.children_by_path("*");
        prop_assert_eq!(selected.len(), node.children().len());
        for (found, child) in selected.iter().zip(node.children()) {
            prop_assert!(std::ptr::eq(*found, child));
        }
    }
}
