//! Page Rendering
//!
//! Pure functions from message records to markup strings. Nothing here
//! performs I/O; the refresh cycle commits the output to the shared view
//! and the HTTP layer serves it.
//!
//! Every user-controlled string (author, content, error messages, raw
//! timestamps) passes through [`escape_html`] before insertion. That is
//! the one security invariant of this crate.

use crate::manifest::{parse_timestamp, Message};

/// Escape a string for safe insertion into HTML text or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format a timestamp for display ("Jan 5, 2026, 12:30 PM").
///
/// Falls back to the raw string unchanged when no supported format parses.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        None => raw.to_string(),
    }
}

/// Markup for one message card
fn render_card(message: &Message) -> String {
    let date_line = match message.timestamp.as_deref() {
        Some(ts) => format!(
            r#"<span class="message-date">{}</span>"#,
            escape_html(&format_timestamp(ts))
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="message-card">
    <div class="message-content">{content}</div>
    <div class="message-footer">
        <span class="message-author">{author}</span>
        {date_line}
    </div>
</div>
"#,
        content = escape_html(&message.content),
        author = escape_html(&message.author),
        date_line = date_line,
    )
}

/// Markup for the message list; an empty list renders the empty state
pub fn render_messages(messages: &[Message]) -> String {
    if messages.is_empty() {
        return render_empty();
    }

    messages.iter().map(render_card).collect()
}

/// Markup shown when the manifest holds no messages
pub fn render_empty() -> String {
    r#"<div class="empty-state">
    <h2>No messages yet!</h2>
    <p>Be the first to contribute by adding your message file to the messages folder.</p>
</div>
"#
    .to_string()
}

/// Markup shown when a load cycle fails
pub fn render_error(error_message: &str) -> String {
    format!(
        r#"<div class="error-state">
    <h2>Error loading messages</h2>
    <p>{}</p>
    <p>Make sure the manifest.json file exists in the messages folder.</p>
</div>
"#,
        escape_html(error_message)
    )
}

/// Full page shell wrapping the container markup.
///
/// `loading` toggles the loading indicator, shown only before the first
/// cycle commits.
pub fn render_page(container: &str, loading: bool) -> String {
    let loading_class = if loading { "loading show" } else { "loading" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Guestbook</title>
    <style>
        body {{ font-family: system-ui, sans-serif; max-width: 720px; margin: 0 auto; padding: 1rem; }}
        .loading {{ display: none; color: #666; }}
        .loading.show {{ display: block; }}
        .message-card {{ border: 1px solid #ddd; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }}
        .message-footer {{ margin-top: 0.5rem; color: #666; font-size: 0.875rem; display: flex; justify-content: space-between; }}
        .empty-state, .error-state {{ text-align: center; color: #666; padding: 2rem 0; }}
        .error-state h2 {{ color: #b00020; }}
    </style>
</head>
<body>
    <h1>Guestbook</h1>
    <div id="loading" class="{loading_class}">Loading messages...</div>
    <div id="messagesContainer">{container}</div>
</body>
</html>
"#,
        loading_class = loading_class,
        container = container,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{Manifest, RawMessage};

    fn message(author: &str, content: &str, timestamp: Option<&str>) -> Message {
        Message {
            author: author.to_string(),
            content: content.to_string(),
            timestamp: timestamp.map(|s| s.to_string()),
            filename: "test.json".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("it's"), "it&#39;s");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_cards_escape_author_and_content() {
        let html = render_messages(&[message(
            "<b>Eve</b>",
            "<img src=x onerror=alert(1)>",
            None,
        )]);
        assert!(!html.contains("<b>Eve</b>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;b&gt;Eve&lt;/b&gt;"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    }

    #[test]
    fn test_defaulted_records_render_placeholders() {
        let manifest = Manifest {
            messages: vec![RawMessage::default()],
        };
        let messages = crate::manifest::normalize(&manifest);
        let html = render_messages(&messages);
        assert!(html.contains("Anonymous"));
        assert!(html.contains("No message provided"));
    }

    #[test]
    fn test_format_timestamp_display() {
        assert_eq!(
            format_timestamp("2026-01-05T14:30:00Z"),
            "Jan 5, 2026, 02:30 PM"
        );
    }

    #[test]
    fn test_format_timestamp_fallback_is_raw() {
        assert_eq!(format_timestamp("soonish"), "soonish");
    }

    #[test]
    fn test_card_shows_formatted_date() {
        let html = render_messages(&[message("Ada", "hi", Some("2026-01-05T14:30:00Z"))]);
        assert!(html.contains("Jan 5, 2026, 02:30 PM"));
    }

    #[test]
    fn test_empty_list_renders_empty_state() {
        let html = render_messages(&[]);
        assert!(html.contains("No messages yet!"));
        assert_eq!(html, render_empty());
    }

    #[test]
    fn test_error_state_escapes_message() {
        let html = render_error("bad <thing> & worse");
        assert!(html.contains("bad &lt;thing&gt; &amp; worse"));
        assert!(!html.contains("<thing>"));
        assert!(html.contains("Error loading messages"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let messages = vec![message("Ada", "hi", Some("2026-01-05T14:30:00Z"))];
        assert_eq!(render_messages(&messages), render_messages(&messages));
    }

    #[test]
    fn test_page_shell_contains_container_and_indicator() {
        let page = render_page("<p>body</p>", true);
        assert!(page.contains(r#"id="messagesContainer""#));
        assert!(page.contains("<p>body</p>"));
        assert!(page.contains("loading show"));

        let page = render_page("", false);
        assert!(!page.contains("loading show"));
    }
}
