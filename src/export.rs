//! Export of formatted pages as Markdown and HTML documents
//!
//! Markdown-to-HTML rendering is supplied by the caller through
//! [`MarkdownRenderer`]; this module only assembles the documents.

use crate::format::PAGE_SEPARATOR;
use crate::pages::PagedContent;

pub const MARKDOWN_FILE_NAME: &str = "formatted_text.md";
pub const MARKDOWN_MIME: &str = "text/markdown;charset=utf-8";
pub const HTML_FILE_NAME: &str = "formatted_text.html";
pub const HTML_MIME: &str = "text/html;charset=utf-8";
pub const DOCX_FILE_NAME: &str = "formatted_document.docx";

const HTML_PAGE_BREAK: &str = "<hr style=\"page-break-after: always; border-top: 1px solid #ccc;\">";
const CLIPBOARD_PAGE_BREAK: &str = "<hr style=\"page-break-after: always; border: none;\">";
const DOCX_PAGE_BREAK: &str = "<br page-break-before=\"always\" />";

const HTML_STYLE: &str = "body{font-family: sans-serif; line-height: 1.6;} table{border-collapse: collapse; width: 100%;} th, td{border: 1px solid #ddd; padding: 8px;} th{background-color: #f2f2f2;}";

/// Markdown to HTML conversion
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, markdown: &str) -> String {
        self(markdown)
    }
}

/// All pages as one Markdown document with `## Page N` headings
pub fn to_markdown_document(formatted: &PagedContent) -> Option<String> {
    let document = formatted
        .iter()
        .map(|(page, markdown)| format!("## Page {}\n\n{}", page, markdown))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);
    non_blank(document)
}

/// A standalone HTML document with one `<h2>Page N</h2>` section per page
pub fn to_html_document(
    formatted: &PagedContent,
    renderer: &dyn MarkdownRenderer,
) -> Option<String> {
    let body = formatted
        .iter()
        .map(|(page, markdown)| format!("<h2>Page {}</h2>\n{}", page, renderer.render(markdown)))
        .collect::<Vec<_>>()
        .join(HTML_PAGE_BREAK);
    let body = non_blank(body)?;

    Some(format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>Formatted PDF Content</title><style>{}</style></head><body>{}</body></html>",
        HTML_STYLE, body
    ))
}

/// Rendered pages as an HTML fragment for the clipboard
pub fn to_clipboard_html(
    formatted: &PagedContent,
    renderer: &dyn MarkdownRenderer,
) -> Option<String> {
    let html = formatted
        .iter()
        .map(|(_, markdown)| renderer.render(markdown))
        .collect::<Vec<_>>()
        .join(CLIPBOARD_PAGE_BREAK);
    non_blank(html)
}

/// The HTML handed to a DOCX assembler
pub fn to_docx_source_html(
    formatted: &PagedContent,
    renderer: &dyn MarkdownRenderer,
) -> Option<String> {
    if formatted.is_empty() {
        return None;
    }
    let body = formatted
        .iter()
        .map(|(page, markdown)| format!("<h2>Page {}</h2>\n{}", page, renderer.render(markdown)))
        .collect::<Vec<_>>()
        .join(DOCX_PAGE_BREAK);

    Some(format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>Formatted Document</title></head><body>{}</body></html>",
        body
    ))
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(markdown: &str) -> String {
        format!("<p>{}</p>", markdown)
    }

    fn pages(entries: &[(u32, &str)]) -> PagedContent {
        PagedContent::from_pages(entries.iter().map(|&(p, t)| (p, t.to_string())))
    }

    #[test]
    fn test_markdown_document() {
        assert_eq!(to_markdown_document(&PagedContent::new()), None);
        let md = to_markdown_document(&pages(&[(3, "three"), (1, "one")])).unwrap();
        assert_eq!(md, "## Page 1\n\none\n\n---\n\n## Page 3\n\nthree");
    }

    #[test]
    fn test_html_document() {
        assert_eq!(to_html_document(&PagedContent::new(), &paragraph), None);
        let html = to_html_document(&pages(&[(1, "a"), (2, "b")]), &paragraph).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Formatted PDF Content</title>"));
        assert!(html.contains(&format!(
            "<h2>Page 1</h2>\n<p>a</p>{}<h2>Page 2</h2>\n<p>b</p>",
            HTML_PAGE_BREAK
        )));
    }

    #[test]
    fn test_clipboard_html() {
        let html = to_clipboard_html(&pages(&[(1, "a"), (2, "b")]), &paragraph).unwrap();
        assert_eq!(html, format!("<p>a</p>{}<p>b</p>", CLIPBOARD_PAGE_BREAK));
        assert_eq!(to_clipboard_html(&pages(&[(1, "")]), &|_: &str| String::new()), None);
    }

    #[test]
    fn test_docx_source_html() {
        assert_eq!(to_docx_source_html(&PagedContent::new(), &paragraph), None);
        let html = to_docx_source_html(&pages(&[(1, "a"), (2, "b")]), &paragraph).unwrap();
        assert!(html.contains("<title>Formatted Document</title>"));
        assert!(html.contains(DOCX_PAGE_BREAK));
    }
}
