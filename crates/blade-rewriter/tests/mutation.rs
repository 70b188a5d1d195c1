//! End-to-end mutation tests: parse, rewrite, render.

use blade_parser::{parse, NodeKind};
use blade_rewriter::{ElementSpec, NodeSpec, Path, Rewriter};
use pretty_assertions::assert_eq;

fn rewrite(source: &str, visitor: impl FnMut(&mut Path<'_>) + 'static) -> String {
    let result = parse(source);
    assert!(
        result.errors.is_empty(),
        "fixture should parse cleanly: {:?}",
        result.errors
    );
    Rewriter::new()
        .with_visitor(visitor)
        .rewrite(result.document)
        .render()
}

#[test]
fn test_remove_element_inside_block() {
    let out = rewrite("@if($show)<span>x</span>@endif", |path| {
        if path.tag_name().as_deref() == Some("span") {
            path.remove().unwrap();
        }
    });
    assert_eq!(out, "@if($show)@endif");
}

#[test]
fn test_wrap_element_inside_block() {
    let out = rewrite("@if($show)<span>x</span>@endif", |path| {
        if path.tag_name().as_deref() == Some("span") {
            path.wrap_with(ElementSpec::new("div").class("wrapper")).unwrap();
        }
    });
    assert_eq!(
        out,
        "@if($show)<div class=\"wrapper\"><span>x</span></div>@endif"
    );
}

#[test]
fn test_replace_echo_with_text() {
    let out = rewrite("<p>{{ $msg }}</p>", |path| {
        if matches!(path.kind(), NodeKind::Echo(_)) {
            path.replace_with("static").unwrap();
        }
    });
    assert_eq!(out, "<p>static</p>");
}

#[test]
fn test_surround_echo() {
    let out = rewrite("<p>{{ $a }}</p>", |path| {
        if matches!(path.kind(), NodeKind::Echo(_)) {
            path.surround_with("[", NodeSpec::Echo(" $a ".into()), "]")
                .unwrap();
        }
    });
    assert_eq!(out, "<p>[{{ $a }}]</p>");
}

#[test]
fn test_unwrap_at_root() {
    let out = rewrite("<div id=\"w\"><em>a</em>b</div>", |path| {
        if path.tag_name().as_deref() == Some("div") {
            path.unwrap().unwrap();
        }
    });
    assert_eq!(out, "<em>a</em>b");
}

#[test]
fn test_rename_tag() {
    let out = rewrite("<b>bold</b> and <b>more</b>", |path| {
        if path.tag_name().as_deref() == Some("b") {
            path.rename_tag("strong").unwrap();
        }
    });
    assert_eq!(out, "<strong>bold</strong> and <strong>more</strong>");
}

#[test]
fn test_set_attribute_on_void_element() {
    let out = rewrite("<img src=\"a.png\">", |path| {
        if path.tag_name().as_deref() == Some("img") {
            path.set_attribute("alt", Some("cover")).unwrap();
        }
    });
    assert_eq!(out, "<img src=\"a.png\" alt=\"cover\">");
}

#[test]
fn test_remove_attribute() {
    let out = rewrite("<input type=\"text\" disabled>", |path| {
        if path.tag_name().as_deref() == Some("input") {
            assert!(path.remove_attribute("disabled").unwrap());
            assert!(!path.remove_attribute("missing").unwrap());
        }
    });
    assert_eq!(out, "<input type=\"text\">");
}

#[test]
fn test_add_class_merges_and_dedupes() {
    let out = rewrite("<p class=\"a b\">x</p>", |path| {
        if path.tag_name().as_deref() == Some("p") {
            path.add_class("b").unwrap();
            path.add_class("c").unwrap();
        }
    });
    assert_eq!(out, "<p class=\"a b c\">x</p>");
}

#[test]
fn test_add_class_creates_attribute() {
    let out = rewrite("<p>x</p>", |path| {
        if path.tag_name().as_deref() == Some("p") {
            path.add_class("note").unwrap();
        }
    });
    assert_eq!(out, "<p class=\"note\">x</p>");
}

#[test]
fn test_remove_class_drops_empty_attribute() {
    let out = rewrite("<p class=\"a b\">x</p>", |path| {
        if path.tag_name().as_deref() == Some("p") {
            path.remove_class("a").unwrap();
            path.remove_class("b").unwrap();
        }
    });
    assert_eq!(out, "<p>x</p>");
}

#[test]
fn test_append_child_to_element() {
    let out = rewrite("<ul><li>a</li></ul>", |path| {
        if path.tag_name().as_deref() == Some("ul") {
            path.append_child(ElementSpec::new("li").child("b")).unwrap();
        }
    });
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn test_replace_children_of_branch() {
    let out = rewrite("@if($x) old body @endif", |path| {
        if let NodeKind::Directive(d) = path.kind() {
            if d.lowered_name() == "if" {
                path.replace_children(vec![NodeSpec::Text("new".into())]).unwrap();
            }
        }
    });
    assert_eq!(out, "@if($x)new@endif");
}

#[test]
fn test_insert_before_and_after() {
    let out = rewrite("<hr>", |path| {
        if path.tag_name().as_deref() == Some("hr") {
            path.insert_before(NodeSpec::Comment(" above ".into())).unwrap();
            path.insert_after(NodeSpec::PhpTag(" log(); ".into())).unwrap();
        }
    });
    assert_eq!(out, "<!-- above --><hr><?php log(); ?>");
}

#[test]
fn test_mutation_on_wrong_kind_fails_cleanly() {
    let out = rewrite("plain text", |path| {
        if matches!(path.kind(), NodeKind::Text(_)) {
            assert!(path.set_attribute("x", Some("1")).is_err());
            assert!(path.add_class("x").is_err());
            assert!(path.rename_tag("p").is_err());
            assert!(path.append_child("y").is_err());
        }
    });
    // A failed mutation leaves the tree untouched.
    assert_eq!(out, "plain text");
}

#[test]
fn test_untouched_siblings_keep_exact_bytes() {
    let source = "<p   data-a = \"1\" >x</p><p>y</p>";
    let result = parse(source);
    let mut seen_first = false;
    let out = Rewriter::new()
        .with_visitor(move |path: &mut Path<'_>| {
            if path.tag_name().as_deref() == Some("p") {
                if seen_first {
                    path.add_class("late").unwrap();
                }
                seen_first = true;
            }
        })
        .rewrite(result.document)
        .render();
    assert_eq!(out, "<p   data-a = \"1\" >x</p><p class=\"late\">y</p>");
}

#[test]
fn test_sequential_passes_compose() {
    let result = parse("<b>x</b>");
    let doc = Rewriter::new()
        .with_visitor(|path: &mut Path<'_>| {
            if path.tag_name().as_deref() == Some("b") {
                path.rename_tag("strong").unwrap();
            }
        })
        .rewrite(result.document);
    let doc = Rewriter::new()
        .with_visitor(|path: &mut Path<'_>| {
            if path.tag_name().as_deref() == Some("strong") {
                path.add_class("loud").unwrap();
            }
        })
        .rewrite(doc);
    assert_eq!(doc.render(), "<strong class=\"loud\">x</strong>");
}
