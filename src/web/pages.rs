//! HTML rendering
//!
//! The viewer's only server-rendered page is the session list; everything
//! else is JSON or stored artifacts.

use crate::results::Identifier;

pub(crate) fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render the session list page.
pub(crate) fn index_page(title: &str, stylesheet: Option<&str>, ids: &[Identifier]) -> String {
    let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    if let Some(stylesheet) = stylesheet {
        page.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{}\">\n",
            html_escape(stylesheet)
        ));
    }
    page.push_str("</head>\n<body>\n");
    page.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));

    if ids.is_empty() {
        page.push_str("<p>No analysis sessions found.</p>\n");
    } else {
        page.push_str("<ul class=\"sessions\">\n");
        for id in ids {
            page.push_str(&format!(
                "<li><a href=\"/{}/\">{}</a></li>\n",
                html_escape(id.value()),
                html_escape(&id.to_string())
            ));
        }
        page.push_str("</ul>\n");
    }

    page.push_str("</body>\n</html>\n");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn session(root: &Path, folder: &str, label: &str) -> Identifier {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("dirmeta.json"),
            format!(
                r#"{{"year": 2025, "month": 6, "day": 1,
                    "hour": 12, "minute": 0, "second": 0, "label": "{label}"}}"#
            ),
        )
        .unwrap();
        Identifier::from_dir(&dir).unwrap()
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            html_escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn empty_listing_has_a_notice() {
        let page = index_page("Viewer", None, &[]);
        assert!(page.contains("<title>Viewer</title>"));
        assert!(page.contains("No analysis sessions found."));
        assert!(!page.contains("<link"));
    }

    #[test]
    fn sessions_render_as_links() {
        let root = tempfile::tempdir().unwrap();
        let id = session(root.path(), "run1", "my run");
        let page = index_page("Viewer", Some("site.css"), &[id]);
        assert!(page.contains("<link rel=\"stylesheet\" href=\"site.css\">"));
        assert!(page.contains("<a href=\"/run1/\">my run (2025-06-01 12:00:00)</a>"));
    }

    #[test]
    fn titles_are_escaped() {
        let page = index_page("<script>", None, &[]);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }
}
