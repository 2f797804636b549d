//! Marketplace HTML to chat-markdown cleanup.
//!
//! Buyer message bodies may carry a small HTML subset (`<br>`, `<b>`); chat
//! surfaces render markdown. Only the tags the marketplace actually emits
//! are handled.

/// Convert marketplace HTML fragments to chat markdown and trim.
#[must_use]
pub fn sanitize_text(text: &str) -> String {
    text.replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("<b>", "**")
        .replace("</b>", "**")
        .trim()
        .to_string()
}
