//! Lossless round-trip tests: rendering an unmutated tree must reproduce
//! the source byte-for-byte, for well-formed and malformed input alike.

use blade_parser::parse;
use pretty_assertions::assert_eq;

fn assert_round_trip(source: &str) {
    let result = parse(source);
    assert_eq!(result.document.render(), source, "render(parse(s)) != s");
}

#[test]
fn test_plain_markup() {
    assert_round_trip("<div class=\"m-4\">\n  <p>hello</p>\n</div>\n");
    assert_round_trip("no markup at all, just text\n");
    assert_round_trip("");
}

#[test]
fn test_echo_flavors() {
    assert_round_trip("{{ $name }}");
    assert_round_trip("{!! $html !!}");
    assert_round_trip("{{{ $legacy }}}");
    assert_round_trip("{{$tight}}");
    assert_round_trip("a {{ $x }} b {!! $y !!} c");
}

#[test]
fn test_directive_blocks() {
    assert_round_trip("@if($a) one @elseif($b) two @else three @endif");
    assert_round_trip("@foreach($items as $item)\n  {{ $item }}\n@endforeach");
    assert_round_trip("@section('content')\n  body\n@stop");
    assert_round_trip("@unless($done) pending @endunless");
}

#[test]
fn test_directive_argument_edge_cases() {
    // Parens inside strings must not close the argument list.
    assert_round_trip("@if(in_array($x, [')', '((']))yes@endif");
    assert_round_trip("@lang('messages.welcome')");
    // Whitespace between name and arguments is preserved.
    assert_round_trip("@if ($x) y @endif");
}

#[test]
fn test_escapes() {
    assert_round_trip("@@if literal");
    assert_round_trip("@{{ not an echo }}");
    assert_round_trip("@{!! raw !!}");
    assert_round_trip("email@example.com");
}

#[test]
fn test_php_regions() {
    assert_round_trip("<?php echo strtoupper('x'); ?>");
    assert_round_trip("<?= $total ?>");
    assert_round_trip("@php\n  $x = 1;\n@endphp");
    assert_round_trip("@php($x = 1)");
    assert_round_trip("@verbatim {{ literal }} @endverbatim");
}

#[test]
fn test_lexical_opacity() {
    // Template delimiters inside PHP strings, comments and heredocs are
    // plain payload.
    assert_round_trip("{{ '}}' }}");
    assert_round_trip("{{ $a /* }} */ }}");
    assert_round_trip("@php\n$s = <<<EOT\n@endphp }} ?>\nEOT;\n@endphp");
    assert_round_trip("<?php // hidden ?> close\n$x = 1; ?>");
}

#[test]
fn test_comments_and_declarations() {
    assert_round_trip("{{-- todo: remove --}}");
    assert_round_trip("<!-- plain comment -->");
    assert_round_trip("<!--[if lt IE 9]><script></script><![endif]-->");
    assert_round_trip("<![CDATA[ raw < bytes ]]>");
    assert_round_trip("<!DOCTYPE html>");
    assert_round_trip("<?xml version=\"1.0\"?>");
    assert_round_trip("<!bogus>");
}

#[test]
fn test_attributes() {
    assert_round_trip("<input type=\"text\"   value='a'  disabled>");
    assert_round_trip("<a href=/plain/path>x</a>");
    assert_round_trip("<x-alert :type=\"$type\" ::class=\"{ danger: true }\"/>");
    assert_round_trip("<p class=\"a {{ $b }} c\">t</p>");
    assert_round_trip("<div @if($admin) data-admin @endif>x</div>");
}

#[test]
fn test_jsx_attribute_forms() {
    assert_round_trip("<Widget {count} {...props} value={x + 1}>ok</Widget>");
    assert_round_trip("<Item handler=({ fire })/>");
}

#[test]
fn test_composite_names() {
    assert_round_trip("<{{ $tag }} class=\"x\">body</{{ $tag }}>");
    assert_round_trip("<h{{ $level }}>title</h{{ $level }}>");
}

#[test]
fn test_rawtext_regions() {
    assert_round_trip("<script>if (a < b) { run(); }</script>");
    assert_round_trip("<style>p { color: {{ $c }}; }</style>");
    assert_round_trip("<script>var s = \"</div>\";</script>");
    assert_round_trip("<script src=\"x.js\"></script>after");
}

#[test]
fn test_malformed_input_still_round_trips() {
    assert_round_trip("{{ $unterminated");
    assert_round_trip("{{ a {{ $inner }}");
    assert_round_trip("<div <span>");
    assert_round_trip("<div class=\"open");
    assert_round_trip("</nothing>");
    assert_round_trip("<ul><li>one<li>two</ul>");
    assert_round_trip("<!-- unterminated");
    assert_round_trip("{{-- unterminated");
    assert_round_trip("<?php $x = 1;");
    assert_round_trip("@php $x = 1;");
    assert_round_trip("@verbatim {{ x }}");
    assert_round_trip("@if($x) never closed");
    assert_round_trip("<p>deep<b>nesting");
}

#[test]
fn test_case_insensitive_closers() {
    assert_round_trip("<DIV>x</div>");
    assert_round_trip("<script>x</SCRIPT>");
}

#[test]
fn test_larger_mixed_document() {
    let source = concat!(
        "<!DOCTYPE html>\n",
        "<html lang=\"en\">\n",
        "<head>\n",
        "  <title>{{ $title }}</title>\n",
        "  <style>body { margin: 0; }</style>\n",
        "</head>\n",
        "<body>\n",
        "@section('main')\n",
        "  @foreach($users as $user)\n",
        "    <p class=\"row {{ $loop->odd ? 'odd' : 'even' }}\">\n",
        "      {{ $user->name }} @if($user->admin)<b>admin</b>@endif\n",
        "    </p>\n",
        "  @endforeach\n",
        "@endsection\n",
        "{{-- rendered by the layout --}}\n",
        "<script>\n",
        "  let raw = \"</p>\";\n",
        "  if (x < 3) { go(); }\n",
        "</script>\n",
        "</body>\n",
        "</html>\n",
    );
    assert_round_trip(source);
}
