#![allow(clippy::panic)]

use simplexml::{AttributeValue, Document, Node, ABSENT_ATTRIBUTE};

fn values(nodes: &[&Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|n| n.value())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_add_child_then_find() {
    let mut root = Node::with_tag("root");
    root.add_child_with_value("name", "value");
    let found = root.first_child_by_tag_name("name");
    assert_eq!(found.and_then(Node::value), Some("value"));
}

#[test]
fn test_first_child_missing() {
    let root = Node::with_tag("root");
    assert!(root.first_child_by_tag_name("nothing").is_none());
    assert!(root.children_by_tag_name("nothing").is_empty());
    assert!(root.children_recursive_by_tag_name("nothing").is_empty());
}

#[test]
fn test_shallow_vs_recursive_lookup() {
    let mut root = Node::with_tag("root");
    let a = root.add_child_with_value("item", "a");
    a.add_child_with_value("item", "a.1").add_child_with_value("item", "a.1.1");
    root.add_child("wrapper").add_child_with_value("item", "w.1");
    root.add_child_with_value("item", "b");

    assert_eq!(values(&root.children_by_tag_name("item")), vec!["a", "b"]);
    assert_eq!(
        values(&root.children_recursive_by_tag_name("item")),
        vec!["a", "a.1", "a.1.1", "w.1", "b"]
    );
}

#[test]
fn test_attribute_lookup_tolerates_missing() {
    let mut root = Node::with_tag("root");
    root.add_child("entry");
    root.add_child_with_value("entry", "hit").set_attribute("key", "k1");

    let hit = root.first_child_by_tag_and_attribute("entry", "key", "k1");
    assert_eq!(hit.and_then(Node::value), Some("hit"));
    assert!(root
        .first_child_by_tag_and_attribute("entry", "key", "k2")
        .is_none());
}

#[test]
fn test_attribute_typed_values() {
    let mut node = Node::with_tag("n");
    node.set_attribute("int", 10);
    node.set_attribute("bool", false);
    node.set_attribute("text", String::from("hi"));

    assert_eq!(node.attribute("int"), Some(&AttributeValue::Integer(10)));
    assert_eq!(node.attribute_string("bool"), "false");
    assert_eq!(node.attribute_string("nope"), ABSENT_ATTRIBUTE);
}

#[test]
fn test_remove_true_once() {
    let mut root = Node::with_tag("root");
    root.add_child_with_value("a", "1");
    root.add_child_with_value("b", "2");

    let Some(target) = root.first_child_by_tag_name("a").cloned() else {
        panic!("child a missing");
    };
    assert!(root.remove(&target));
    assert!(!root.remove(&target));
    assert_eq!(root.children().len(), 1);
    assert_eq!(root.children().first().and_then(Node::tag), Some("b"));
}

#[test]
fn test_copy_clone_is_independent() {
    let mut source = Node::with_tag("source");
    source.set_attribute("shared", "original");
    source.add_child("inner").set_attribute("depth", 1);

    let mut target = Node::with_tag("target");
    let clone = target.copy(&source);
    clone.set_attribute("shared", "clone");
    if let Some(inner) = clone.first_child_by_tag_name_mut("inner") {
        inner.set_attribute("depth", 2);
    }

    assert_eq!(source.attribute_string("shared"), "original");
    assert_eq!(
        source
            .first_child_by_tag_name("inner")
            .map(|n| n.attribute_string("depth")),
        Some("1".to_string())
    );

    source.set_attribute("shared", "changed-again");
    let clone = target.first_child_by_tag_name("source");
    assert_eq!(
        clone.map(|n| n.attribute_string("shared")),
        Some("clone".to_string())
    );
}

#[test]
fn test_push_child_transfers_node() {
    let mut built = Node::with_tag("prebuilt");
    built.add_child("leaf");

    let mut doc = Document::with_tag("root");
    doc.push_child(built);
    doc.add_child("after");

    let tags: Vec<_> = doc.children().iter().filter_map(Node::tag).collect();
    assert_eq!(tags, vec!["prebuilt", "after"]);
}

#[test]
fn test_push_child_returns_appended_node() {
    let mut doc = Document::with_tag("root");
    doc.add_child("first");
    doc.push_child(Node::with_tag("second")).set_value("v");

    assert_eq!(doc.children().len(), 2);
    let second = doc.first_child_by_tag_name("second");
    assert_eq!(second.and_then(Node::value), Some("v"));
    let first = doc.first_child_by_tag_name("first");
    assert_eq!(first.and_then(Node::value), None);
}

#[test]
fn test_children_mut_edits_in_place() {
    let mut root = Node::with_tag("root");
    root.add_child("a");
    root.add_child("b");
    for child in root.children_mut() {
        child.set_value("set");
    }
    assert!(root.children().iter().all(|c| c.value() == Some("set")));
}
