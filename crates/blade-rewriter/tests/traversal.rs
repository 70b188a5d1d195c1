//! Traversal-order tests: pre-order walking, skip/stop control, and
//! cursor relocation around mutations.

use std::cell::RefCell;
use std::rc::Rc;

use blade_parser::{parse, NodeKind};
use blade_rewriter::{Path, Rewriter};
use pretty_assertions::assert_eq;

fn label(path: &Path<'_>) -> String {
    match path.kind() {
        NodeKind::Text(text) => format!("text({})", text),
        kind => path
            .tag_name()
            .unwrap_or_else(|| kind.name().to_string()),
    }
}

fn record_visits(
    source: &str,
    mut act: impl FnMut(&mut Path<'_>) + 'static,
) -> (Vec<String>, String) {
    let visits = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&visits);
    let doc = Rewriter::new()
        .with_visitor(move |path: &mut Path<'_>| {
            log.borrow_mut().push(label(path));
            act(path);
        })
        .rewrite(parse(source).document);
    let out = doc.render();
    let visits = visits.borrow().clone();
    (visits, out)
}

#[test]
fn test_preorder_visit_order() {
    let (visits, out) = record_visits("<ul><li>a</li><li>b</li></ul><p>c</p>", |_| {});
    assert_eq!(
        visits,
        vec!["ul", "li", "text(a)", "li", "text(b)", "p", "text(c)"]
    );
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul><p>c</p>");
}

#[test]
fn test_blocks_and_branches_are_visited() {
    let (visits, _) = record_visits("@if($a)x@else y@endif", |_| {});
    assert_eq!(
        visits,
        vec![
            "directive block",
            "directive",
            "text(x)",
            "directive",
            "text( y)",
            "directive",
        ]
    );
}

#[test]
fn test_skip_children() {
    let (visits, _) = record_visits("<ul><li>a</li><li>b</li></ul><p>c</p>", |path| {
        if path.tag_name().as_deref() == Some("li") {
            path.skip_children();
        }
    });
    assert_eq!(visits, vec!["ul", "li", "li", "p", "text(c)"]);
}

#[test]
fn test_stop_traversal() {
    let mut count = 0;
    let (visits, _) = record_visits("<i>1</i><i>2</i><i>3</i>", move |path| {
        if path.tag_name().as_deref() == Some("i") {
            count += 1;
            if count == 2 {
                path.stop_traversal();
            }
        }
    });
    // Stopping during the second <i> visits neither its text nor the third.
    assert_eq!(visits, vec!["i", "text(1)", "i"]);
}

#[test]
fn test_removal_relocates_to_next_sibling() {
    let (visits, out) = record_visits("<p>a</p><p>b</p><p>c</p>", |path| {
        let doc = path.doc();
        let is_b = doc
            .children(path.node())
            .first()
            .and_then(|&c| doc.as_text(c))
            == Some("b");
        if is_b {
            path.remove().unwrap();
        }
    });
    assert_eq!(out, "<p>a</p><p>c</p>");
    // The removed node's subtree is not entered; the next sibling still is.
    assert_eq!(visits, vec!["p", "text(a)", "p", "p", "text(c)"]);
}

#[test]
fn test_inserted_after_nodes_are_visited() {
    let (visits, out) = record_visits("<p>a</p>", |path| {
        if matches!(path.kind(), NodeKind::Text(t) if t == "a") {
            path.insert_after("x").unwrap();
        }
    });
    assert_eq!(out, "<p>ax</p>");
    assert_eq!(visits, vec!["p", "text(a)", "text(x)"]);
}

#[test]
fn test_replacement_is_not_revisited() {
    let (visits, out) = record_visits("<p>{{ $a }}b</p>", |path| {
        if matches!(path.kind(), NodeKind::Echo(_)) {
            path.replace_with("z").unwrap();
        }
    });
    assert_eq!(out, "<p>zb</p>");
    // The replacement is passed over; the original next sibling is not.
    assert_eq!(visits, vec!["p", "echo", "text(b)"]);
}

#[test]
fn test_removed_node_not_offered_to_later_visitors() {
    let first_saw = Rc::new(RefCell::new(Vec::new()));
    let second_saw = Rc::new(RefCell::new(Vec::new()));
    let first_log = Rc::clone(&first_saw);
    let second_log = Rc::clone(&second_saw);

    let doc = Rewriter::new()
        .with_visitor(move |path: &mut Path<'_>| {
            first_log.borrow_mut().push(label(path));
            if path.tag_name().as_deref() == Some("span") {
                path.remove().unwrap();
            }
        })
        .with_visitor(move |path: &mut Path<'_>| {
            second_log.borrow_mut().push(label(path));
        })
        .rewrite(parse("<div><span>x</span><em>y</em></div>").document);

    assert_eq!(doc.render(), "<div><em>y</em></div>");
    assert_eq!(
        *first_saw.borrow(),
        vec!["div", "span", "em", "text(y)"]
    );
    // The second visitor is never offered the node the first one removed.
    assert_eq!(*second_saw.borrow(), vec!["div", "em", "text(y)"]);
}
