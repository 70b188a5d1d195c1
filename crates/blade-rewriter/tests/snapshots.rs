//! Snapshot tests showing a whole rewrite pass against its input.

use blade_parser::parse;
use blade_rewriter::{Path, Rewriter};

fn rewrite_snapshot(name: &str, source: &str, rewriter: &mut Rewriter) {
    let result = parse(source);
    assert!(
        result.errors.is_empty(),
        "fixture should parse cleanly: {:?}",
        result.errors
    );
    let output = format!(
        "Source:\n{}\n\nRewritten:\n{}",
        source,
        rewriter.rewrite(result.document).render()
    );
    insta::assert_snapshot!(name, output);
}

#[test]
fn test_decorate_panel() {
    let source = "<div class=\"panel\">\n    @if($user)\n        <span class=\"name\">{{ $user->name }}</span>\n    @endif\n    <img src=\"logo.png\">\n</div>\n";
    let mut rewriter = Rewriter::new()
        .with_visitor(|path: &mut Path<'_>| {
            if path.tag_name().as_deref() == Some("span") {
                path.add_class("font-bold").unwrap();
            }
        })
        .with_visitor(|path: &mut Path<'_>| {
            if path.tag_name().as_deref() == Some("img") {
                path.set_attribute("alt", Some("logo")).unwrap();
            }
        });
    rewrite_snapshot("decorate_panel", source, &mut rewriter);
}
