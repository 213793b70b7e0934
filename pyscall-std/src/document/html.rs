//! Markup-rendering document.

use pyscall_core::{Document, Element, Placement};
use std::{
    fmt::Write,
    sync::{Mutex, PoisonError},
};

/// A document that renders appended elements to HTML.
///
/// Useful for emitting the injected tags into a static page instead of
/// mutating a live one.
#[derive(Debug, Default)]
pub struct HtmlDocument {
    head: Mutex<Vec<String>>,
    body: Mutex<Vec<String>>,
}

impl HtmlDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup appended to the head, one element per line.
    pub fn render_head(&self) -> String {
        self.head
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .join("\n")
    }

    /// Markup appended to the body, one element per line.
    pub fn render_body(&self) -> String {
        self.body
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .join("\n")
    }

    /// A complete page wrapping the head and body markup.
    pub fn render(&self) -> String {
        let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
        let head = self.render_head();
        if !head.is_empty() {
            let _ = writeln!(page, "{head}");
        }
        page.push_str("</head>\n<body>\n");
        let body = self.render_body();
        if !body.is_empty() {
            let _ = writeln!(page, "{body}");
        }
        page.push_str("</body>\n</html>\n");
        page
    }
}

impl Document for HtmlDocument {
    fn append(&self, placement: Placement, element: Element) {
        let markup = render_element(&element);
        let target = match placement {
            Placement::Head => &self.head,
            Placement::Body => &self.body,
        };
        target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(markup);
    }
}

fn render_element(element: &Element) -> String {
    match element {
        Element::ExternalScript { src, kind, config } => format!(
            r#"<script type="{}" src="{}" config="{}"></script>"#,
            kind,
            escape_attr(src),
            escape_attr(config)
        ),
        Element::InlineScript { code, kind, config } => format!(
            r#"<script type="{}" config="{}">{}</script>"#,
            kind,
            escape_attr(config),
            escape_script(code)
        ),
        Element::ModuleScript { src } => {
            format!(r#"<script type="module" src="{}"></script>"#, escape_attr(src))
        }
        Element::Stylesheet { href } => {
            format!(r#"<link rel="stylesheet" href="{}">"#, escape_attr(href))
        }
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

// Script bodies are raw text and the tokenizer matches `</script` in any
// case. Only the slash of such a sequence is escaped; everything else,
// including the tag's own casing, is kept.
fn escape_script(code: &str) -> String {
    const TAG: &[u8] = b"script";
    let bytes = code.as_bytes();
    let mut out = String::with_capacity(code.len());
    let mut copied = 0;
    let mut from = 0;
    while let Some(offset) = code[from..].find("</") {
        let at = from + offset;
        let name = &bytes[at + 2..];
        if name.len() >= TAG.len() && name[..TAG.len()].eq_ignore_ascii_case(TAG) {
            out.push_str(&code[copied..=at]);
            out.push('\\');
            copied = at + 1;
        }
        from = at + 2;
    }
    out.push_str(&code[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyscall_core::ResourceKind;

    #[test]
    fn test_external_script_markup() {
        let document = HtmlDocument::new();
        document.append(
            Placement::Head,
            Element::ExternalScript {
                src: "/assets/cb.py?m=1".to_string(),
                kind: ResourceKind::Mpy,
                config: r#"{"a":"<b>"}"#.to_string(),
            },
        );
        assert_eq!(
            document.render_head(),
            r#"<script type="mpy" src="/assets/cb.py?m=1" config="{&quot;a&quot;:&quot;&lt;b&gt;&quot;}"></script>"#
        );
    }

    #[test]
    fn test_inline_script_body_is_not_attribute_escaped() {
        let document = HtmlDocument::new();
        document.append(
            Placement::Body,
            Element::InlineScript {
                code: "x = \"</script>\" if a < b else 1".to_string(),
                kind: ResourceKind::Py,
                config: "{}".to_string(),
            },
        );
        assert_eq!(
            document.render_body(),
            r#"<script type="py" config="{}">x = "<\/script>" if a < b else 1</script>"#
        );
    }

    #[test]
    fn test_closing_tag_escaped_in_any_case() {
        let document = HtmlDocument::new();
        document.append(
            Placement::Body,
            Element::InlineScript {
                code: "x = '</SCRIPT><img src=x onerror=alert(1)>'\ny = '</ScRiPt>'".to_string(),
                kind: ResourceKind::Mpy,
                config: "{}".to_string(),
            },
        );
        let markup = document.render_body();

        assert_eq!(
            markup,
            "<script type=\"mpy\" config=\"{}\">x = '<\\/SCRIPT><img src=x onerror=alert(1)>'\n\
             y = '<\\/ScRiPt>'</script>"
        );
        // Only the element's own closing tag remains.
        let lowered = markup.to_ascii_lowercase();
        assert_eq!(lowered.matches("</script").count(), 1);
        assert!(lowered.ends_with("</script>"));
    }

    #[test]
    fn test_non_script_closing_tags_untouched() {
        assert_eq!(escape_script("a </b> </scrip"), "a </b> </scrip");
        assert_eq!(escape_script("</script"), "<\\/script");
    }

    #[test]
    fn test_full_page_layout() {
        let document = HtmlDocument::new();
        document.append(
            Placement::Head,
            Element::Stylesheet {
                href: "core.css".to_string(),
            },
        );
        let page = document.render();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<head>\n<link rel=\"stylesheet\" href=\"core.css\">\n</head>"));
        assert!(page.contains("<body>\n</body>"));
    }
}
