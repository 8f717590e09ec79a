use streammark::{Options, to_html, to_html_with_options};

fn html(input: &str) -> String {
    to_html(input).unwrap()
}

#[test]
fn paragraph_wraps_plain_text() {
    assert_eq!(html("Hello, world."), "<p>Hello, world.</p>");
}

#[test]
fn newline_in_paragraph_is_a_space() {
    assert_eq!(html("a\nb"), "<p>a b</p>");
}

#[test]
fn blank_line_separates_paragraphs() {
    assert_eq!(html("a\n\nb"), "<p>a </p><p>b</p>");
}

#[test]
fn whitespace_only_line_is_blank() {
    assert_eq!(html("a\n   \nb"), "<p>a </p><p>b</p>");
}

#[test]
fn leading_indentation_is_not_emitted() {
    assert_eq!(html("   text"), "<p>text</p>");
    assert_eq!(html("\ttext"), "<p>text</p>");
}

#[test]
fn heading_with_id() {
    assert_eq!(html("# Title\n"), "<h1 id=\"1\">Title</h1>");
}

#[test]
fn heading_closed_at_end_of_stream() {
    assert_eq!(html("## Sub"), "<h2 id=\"1\">Sub</h2>");
}

#[test]
fn heading_level_six() {
    assert_eq!(html("###### six\n"), "<h6 id=\"1\">six</h6>");
}

#[test]
fn seven_hashes_are_text() {
    assert_eq!(html("####### x"), "<p>####### x</p>");
}

#[test]
fn hash_without_space_is_text() {
    assert_eq!(html("#x"), "<p>#x</p>");
}

#[test]
fn hash_mid_line_is_text() {
    assert_eq!(html("a # b"), "<p>a # b</p>");
    assert_eq!(html("C# rocks"), "<p>C# rocks</p>");
}

#[test]
fn heading_ids_increase() {
    assert_eq!(
        html("# a\n## b\n### c\n"),
        "<h1 id=\"1\">a</h1><h2 id=\"2\">b</h2><h3 id=\"3\">c</h3>"
    );
}

#[test]
fn heading_ids_can_be_disabled() {
    let options = Options {
        heading_ids: false,
        ..Options::default()
    };
    assert_eq!(
        to_html_with_options("# a\n## b\n", options).unwrap(),
        "<h1>a</h1><h2>b</h2>"
    );
}

#[test]
fn heading_closes_paragraph() {
    assert_eq!(html("para\n# H\n"), "<p>para </p><h1 id=\"1\">H</h1>");
}

#[test]
fn unordered_list() {
    assert_eq!(html("* a\n* b\n"), "<ul><li>a </li><li>b </li></ul>");
    assert_eq!(html("- a\n- b"), "<ul><li>a </li><li>b</li></ul>");
    assert_eq!(html("+ a"), "<ul><li>a</li></ul>");
}

#[test]
fn different_bullet_starts_new_list() {
    assert_eq!(
        html("- a\n+ b"),
        "<ul><li>a </li></ul><ul><li>b</li></ul>"
    );
}

#[test]
fn indented_item_continues_list() {
    assert_eq!(html("- a\n  - b"), "<ul><li>a </li><li>b</li></ul>");
}

#[test]
fn blank_line_closes_list() {
    assert_eq!(html("* a\n\nb"), "<ul><li>a </li></ul><p>b</p>");
}

#[test]
fn list_closes_paragraph() {
    assert_eq!(html("a\n* b"), "<p>a </p><ul><li>b</li></ul>");
}

#[test]
fn thematic_break_between_paragraphs() {
    assert_eq!(html("a\n\n---\n\nb"), "<p>a </p><hr><p>b</p>");
}

#[test]
fn thematic_break_at_end_of_stream() {
    assert_eq!(html("---"), "<hr>");
}

#[test]
fn wrong_dash_counts_are_text() {
    assert_eq!(html("--"), "<p>--</p>");
    assert_eq!(html("----\n"), "<p>---- </p>");
}

#[test]
fn blockquote() {
    assert_eq!(html("> quote\n"), "<blockquote>quote </blockquote>");
}

#[test]
fn blockquote_lines_join() {
    assert_eq!(
        html("> a\nb\n\nc"),
        "<blockquote>a b </blockquote><p>c</p>"
    );
}

#[test]
fn fenced_code_block() {
    assert_eq!(html("```\ncode\n```"), "<pre><code>\ncode\n</code></pre>");
}

#[test]
fn fence_line_tail_is_code() {
    assert_eq!(
        html("```python\nprint(1)\n```"),
        "<pre><code>python\nprint(1)\n</code></pre>"
    );
}

#[test]
fn code_block_closes_on_matching_fence() {
    assert_eq!(
        html("````\na\n````\nb"),
        "<pre><code>\na\n</code></pre><p>b</p>"
    );
}

#[test]
fn shorter_fence_starts_new_code_block() {
    assert_eq!(
        html("````\na\n```\nb\n````"),
        concat!(
            "<pre><code>\na\n</code></pre>",
            "<pre><code>\nb\n</code></pre>",
            "<pre><code></code></pre>",
        )
    );
}

#[test]
fn longer_fence_does_not_close_code_block() {
    assert_eq!(
        html("```\na\n````\nb\n```"),
        "<pre><code>\na\n</code></pre><pre><code>\nb\n</code></pre><pre><code></code></pre>"
    );
}

#[test]
fn fenced_code_keeps_markup_literal() {
    assert_eq!(
        html("```\n*a* <b>\n\n# no\n```\n"),
        "<pre><code>\n*a* &lt;b&gt;\n\n# no\n</code></pre>"
    );
}

#[test]
fn single_backtick_in_code_block_is_text() {
    assert_eq!(html("```\na`b\n```"), "<pre><code>\na`b\n</code></pre>");
}

#[test]
fn unclosed_code_block_closed_at_flush() {
    assert_eq!(html("```\nx"), "<pre><code>\nx</code></pre>");
}

#[test]
fn code_block_closes_paragraph() {
    assert_eq!(
        html("a\n```\nb\n```"),
        "<p>a </p><pre><code>\nb\n</code></pre>"
    );
}

#[test]
fn ordered_list_syntax_is_text() {
    assert_eq!(html("1. a"), "<p>1. a</p>");
}
