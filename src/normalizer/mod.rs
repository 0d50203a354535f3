//! HTML-to-text normalization for fetched pages.
//!
//! Rendered HTML is reduced to plain readable text without an HTML parser:
//! script/style/noscript blocks are dropped wholesale, block-level closers
//! become newlines, table cells become " | " separators so pricing tables
//! stay readable as rows, and the leftovers are stripped and decoded.

use html_escape::decode_html_entities;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct Normalizer {
    drop_blocks: Regex,
    heading_close: Regex,
    block_close: Regex,
    line_break: Regex,
    cell_close: Regex,
    any_tag: Regex,
    h_whitespace: Regex,
    newline_padding: Regex,
    newline_runs: Regex,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            drop_blocks: Regex::new(
                r"(?is)<(script|style|noscript)[^>]*>.*?</(script|style|noscript)>",
            )
            .expect("invalid drop-blocks pattern"),
            heading_close: Regex::new(r"(?i)</h[1-6]>").expect("invalid heading pattern"),
            block_close: Regex::new(r"(?i)</(?:p|div|li|tr)>").expect("invalid block pattern"),
            line_break: Regex::new(r"(?i)<br\s*/?>").expect("invalid br pattern"),
            cell_close: Regex::new(r"(?i)</t[dh]>").expect("invalid cell pattern"),
            any_tag: Regex::new(r"<[^>]+>").expect("invalid tag pattern"),
            h_whitespace: Regex::new(r"[^\S\n]+").expect("invalid whitespace pattern"),
            newline_padding: Regex::new(r"[^\S\n]*\n[^\S\n]*").expect("invalid padding pattern"),
            newline_runs: Regex::new(r"\n{3,}").expect("invalid newline-run pattern"),
        }
    }

    /// Reduce raw HTML to plain text. Total: always returns a string,
    /// possibly empty.
    pub fn html_to_text(&self, html: &str) -> String {
        let text = self.drop_blocks.replace_all(html, "");

        let text = self.heading_close.replace_all(&text, "\n\n");
        let text = self.block_close.replace_all(&text, "\n");
        let text = self.line_break.replace_all(&text, "\n");
        let text = self.cell_close.replace_all(&text, " | ");

        let text = self.any_tag.replace_all(&text, " ");

        // html-escape covers the character references it knows; the named
        // entities it does not decode are handled up front.
        let text = text
            .replace("&nbsp;", " ")
            .replace("&mdash;", "\u{2014}")
            .replace("&ndash;", "\u{2013}");
        let text = decode_html_entities(&text).to_string();

        let text = self.h_whitespace.replace_all(&text, " ");
        let text = self.newline_padding.replace_all(&text, "\n");
        let text = self.newline_runs.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}
