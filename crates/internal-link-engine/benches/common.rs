// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2

/// One paragraph holding a link of `pieces` text nodes, alternating bold so
/// the nodes never merge, between two plain words.
#[allow(dead_code)]
pub fn generate_fragmented_link(pieces: usize) -> String {
    let mut content = String::from(r#"<p>before<internallink internallinkid="bench">"#);
    for piece in 0..pieces {
        if piece % 2 == 0 {
            content.push_str("plain ");
        } else {
            content.push_str("<strong>bold</strong> ");
        }
    }
    content.push_str("</internallink>after</p>");
    content
}

/// `blocks` paragraphs, each with a short link.
#[allow(dead_code)]
pub fn generate_linked_paragraphs(blocks: usize) -> String {
    (0..blocks)
        .map(|block| {
            format!(r#"<p>Paragraph {block} <internallink internallinkid="{block}">target</internallink> text</p>"#)
        })
        .collect()
}
