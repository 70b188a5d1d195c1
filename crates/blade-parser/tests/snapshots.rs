//! Snapshot tests over a compact tree dump.

use std::fmt::Write as _;

use blade_parser::{parse, Document, NodeId, NodeKind};

fn dump(doc: &Document) -> String {
    let mut out = String::new();
    for &root in doc.roots() {
        dump_node(doc, root, 0, &mut out);
    }
    out
}

fn dump_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match doc.kind(id) {
        NodeKind::Text(text) => writeln!(out, "{indent}text {text:?}"),
        NodeKind::Echo(echo) => writeln!(out, "{indent}echo {:?}", echo.render()),
        NodeKind::Directive(directive) => writeln!(
            out,
            "{indent}directive {:?} {:?}",
            directive.render_head(),
            directive.role
        ),
        NodeKind::DirectiveBlock => writeln!(out, "{indent}directive block"),
        NodeKind::Element(element) => {
            let attrs: Vec<String> = element
                .attributes
                .iter()
                .map(|attr| attr.name_text())
                .collect();
            if attrs.is_empty() {
                writeln!(out, "{indent}element {:?}", element.tag_text())
            } else {
                writeln!(
                    out,
                    "{indent}element {:?} attrs=[{}]",
                    element.tag_text(),
                    attrs.join(", ")
                )
            }
        }
        NodeKind::Comment(comment) => writeln!(out, "{indent}comment {:?}", comment.content),
        NodeKind::BladeComment(comment) => {
            writeln!(out, "{indent}blade comment {:?}", comment.content)
        }
        NodeKind::PhpTag(php) => writeln!(out, "{indent}php tag {:?}", php.content),
        NodeKind::PhpBlock(php) => writeln!(out, "{indent}php block {:?}", php.content),
        NodeKind::Verbatim(verbatim) => writeln!(out, "{indent}verbatim {:?}", verbatim.content),
        other => writeln!(out, "{indent}{}", other.name()),
    }
    .expect("writing to string cannot fail");
    for &child in doc.children(id) {
        dump_node(doc, child, depth + 1, out);
    }
}

fn parse_snapshot(name: &str, source: &str) {
    let result = parse(source);
    let output = format!(
        "Source:\n{}\n\nErrors: {:?}\n\nTree:\n{}",
        source,
        result.errors,
        dump(&result.document)
    );
    insta::assert_snapshot!(name, output);
}

#[test]
fn test_if_else_block() {
    parse_snapshot("if_else_block", "@if($a)<b>x</b>@else y @endif");
}

#[test]
fn test_component_attributes() {
    parse_snapshot(
        "component_attributes",
        "<x-alert :type=\"$t\" {...props} disabled/>",
    );
}

#[test]
fn test_mixed_php_regions() {
    parse_snapshot("mixed_php_regions", "<?= $x ?>{{-- note --}}@php($y = 1)");
}

#[test]
fn test_echoes_and_text() {
    parse_snapshot("echoes_and_text", "Hello {{ $name }}, raw {!! $html !!}!");
}
