//! HTML rendering for the form service.
//!
//! Pages are small enough to build as strings. Every value that did not come
//! from this module goes through [`Escaped`] before it reaches the output.

use core::fmt::{self, Display, Write};

use formbook_core::Entry;

/// Display adapter that HTML-escapes the wrapped text.
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a str);

impl Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(idx) = rest.find(['&', '<', '>', '"', '\'']) {
            f.write_str(&rest[..idx])?;
            let replacement = match rest.as_bytes()[idx] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                b'"' => "&quot;",
                _ => "&#39;",
            };
            f.write_str(replacement)?;
            rest = &rest[idx + 1..];
        }
        f.write_str(rest)
    }
}

pub fn escape(text: &str) -> String {
    Escaped(text).to_string()
}

/// A full HTML document: escaped title, trusted body markup.
#[derive(Debug, Clone)]
pub struct Page {
    title: String,
    body: String,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
        }
    }

    /// Append trusted markup.
    pub fn markup(mut self, markup: &str) -> Self {
        self.body.push_str(markup);
        self.body.push('\n');
        self
    }

    pub fn heading(self) -> Self {
        let heading = format!("<h1>{}</h1>", Escaped(&self.title));
        self.markup(&heading)
    }

    pub fn link(self, href: &str, text: &str) -> Self {
        let link = format!("<a href=\"{}\">{}</a>", Escaped(href), Escaped(text));
        self.markup(&link)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html>")?;
        writeln!(f, "<head><title>{}</title></head>", Escaped(&self.title))?;
        writeln!(f, "<body>")?;
        f.write_str(&self.body)?;
        writeln!(f, "</body>")?;
        write!(f, "</html>")
    }
}

const SUBMIT_FORM: &str = r#"<form action="/submit" method="POST">
  <input name="name" placeholder="Your name" />
  <button type="submit">Submit</button>
</form>"#;

/// The submission form with a link to the listing.
pub fn form_page() -> String {
    Page::new("Sample Form")
        .heading()
        .markup(SUBMIT_FORM)
        .link("/entries", "View entries")
        .render()
}

/// One list item per entry, in the order given.
pub fn entry_items(entries: &[Entry]) -> String {
    let mut items = String::new();
    for entry in entries {
        // Writing into a String cannot fail.
        let _ = write!(
            items,
            "<li>{} ({})</li>",
            Escaped(&entry.name),
            entry.created_at_iso()
        );
    }
    items
}

/// The listing page. Callers pass entries already ordered newest first.
pub fn entries_page(entries: &[Entry]) -> String {
    let list = format!("<ul>{}</ul>", entry_items(entries));
    Page::new("Entries")
        .heading()
        .markup(&list)
        .link("/", "Go back")
        .render()
}

/// Generic failure page; never carries error detail.
pub fn error_page(code: u16, reason: &str) -> String {
    Page::new(format!("{code} {reason}"))
        .heading()
        .link("/", "Go back")
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use formbook_core::EntryId;
    use proptest::prelude::*;

    fn entry(id: i64, name: &str) -> Entry {
        Entry {
            id: EntryId::new(id).unwrap(),
            name: name.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 7, 1, 15, 25, 3).unwrap(),
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape("Zoë"), "Zoë");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn form_page_posts_name_to_submit() {
        let page = form_page();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Sample Form</title>"));
        assert!(page.contains(r#"<form action="/submit" method="POST">"#));
        assert!(page.contains(r#"<input name="name""#));
        assert!(page.contains(r#"<a href="/entries">View entries</a>"#));
    }

    #[test]
    fn entries_page_lists_items_in_given_order() {
        let page = entries_page(&[entry(2, "Carol"), entry(1, "Bob")]);
        assert!(page.contains(
            "<ul><li>Carol (2025-07-01T15:25:03.000Z)</li><li>Bob (2025-07-01T15:25:03.000Z)</li></ul>"
        ));
        assert!(page.contains(r#"<a href="/">Go back</a>"#));
    }

    #[test]
    fn empty_listing_renders_empty_list() {
        assert!(entries_page(&[]).contains("<ul></ul>"));
    }

    #[test]
    fn entry_names_are_escaped() {
        let page = entries_page(&[entry(1, "<b>bold</b>")]);
        assert!(page.contains("<li>&lt;b&gt;bold&lt;/b&gt; ("));
        assert!(!page.contains("<b>bold</b>"));
    }

    #[test]
    fn error_page_is_generic() {
        let page = error_page(500, "Internal Server Error");
        assert!(page.contains("<h1>500 Internal Server Error</h1>"));
    }

    proptest! {
        /// Property: escaped text never contains a raw markup character.
        #[test]
        fn escaped_output_has_no_markup_characters(text in ".*") {
            let out = escape(&text);
            prop_assert!(!out.contains(['<', '>', '"', '\'']));
            // Every '&' in the output starts an entity.
            for (idx, _) in out.match_indices('&') {
                let tail = &out[idx..];
                prop_assert!(
                    ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"].iter().any(|e| tail.starts_with(e))
                );
            }
        }

        /// Property: text without markup characters passes through unchanged.
        #[test]
        fn plain_text_is_unchanged(text in "[^&<>\"']*") {
            prop_assert_eq!(escape(&text), text);
        }
    }
}
