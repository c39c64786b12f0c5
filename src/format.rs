//! Seam to the generative text service that turns raw page text into Markdown
//!
//! The service itself lives outside this crate; implement [`PageFormatter`]
//! for whatever client is available. This module owns the prompts and the
//! per-page fallback policy.

use crate::pages::PagedContent;

use log::{debug, warn};

pub const FORMAT_SYSTEM_INSTRUCTION: &str = "You are a professional document formatter. Your goal is to make the provided text clear and readable using Markdown. Identify key sections, lists, and tables and format them accordingly.";

pub const REFORMAT_SYSTEM_INSTRUCTION: &str = "You are a professional document formatter. Your goal is to make the provided text clear and readable using Markdown. Only re-format the provided text; do not add extra commentary.";

pub const SUMMARY_SYSTEM_INSTRUCTION: &str = "You are an expert academic and professional summarizer. Your goal is to create a brief, accurate, and highly readable summary of the provided text.";

/// Separator placed between pages when they are concatenated
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// A single request to the text generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRequest {
    pub system_instruction: &'static str,
    pub prompt: String,
}

impl FormatRequest {
    /// Structure a whole page of raw text
    pub fn page(text: &str) -> Self {
        Self {
            system_instruction: FORMAT_SYSTEM_INSTRUCTION,
            prompt: format!(
                "Format the following raw text into a well-structured document. Do not remove any content. Use markdown to create appropriate headings, subheadings, bullet points, and numbered lists. Where data appears to be structured (e.g., in columns or rows), format it into a markdown table with headers. Text to format:\n\n{}",
                text
            ),
        }
    }

    /// Re-format a user selection without adding or removing content
    pub fn selection(text: &str) -> Self {
        Self {
            system_instruction: REFORMAT_SYSTEM_INSTRUCTION,
            prompt: format!(
                "Reformat the following text. Look for ways to present data in tables or lists to make it more organized and clear. Do not add or remove any content. Text to re-format:\n\n{}",
                text
            ),
        }
    }

    /// Summarize the concatenated formatted document
    pub fn summary(document: &str) -> Self {
        Self {
            system_instruction: SUMMARY_SYSTEM_INSTRUCTION,
            prompt: format!(
                "Please provide a concise summary of the following document content. Focus on the key points, main conclusions, and any important data presented. The summary should be well-structured, easy to read, and capture the essence of the document.\n\nDOCUMENT CONTENT:\n\n{}",
                document
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("text generation service unavailable")]
    Unavailable,
    #[error("text generation request failed: {0}")]
    Request(String),
}

/// A text generation client. `Ok(None)` means the service answered with no text.
pub trait PageFormatter {
    fn format(&self, request: &FormatRequest) -> Result<Option<String>, FormatError>;
}

/// Result of formatting a set of pages
#[derive(Debug, Clone, Default)]
pub struct FormatReport {
    pub content: PagedContent,
    /// Pages whose request failed and fell back to the original text
    pub failed_pages: Vec<u32>,
    /// Pages where the service returned nothing
    pub empty_pages: Vec<u32>,
}

/// Format every extracted page in order, falling back to the raw text per page
pub fn format_pages(extracted: &PagedContent, formatter: &dyn PageFormatter) -> FormatReport {
    let mut report = FormatReport::default();
    let total = extracted.len();

    for (index, (page, text)) in extracted.iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        debug!("formatting page {} ({}/{})", page, index + 1, total);

        let formatted = match formatter.format(&FormatRequest::page(text)) {
            Ok(Some(markdown)) if !markdown.trim().is_empty() => markdown,
            Ok(_) => {
                warn!("no formatted text returned for page {}", page);
                report.empty_pages.push(page);
                format!(
                    "*AI failed to provide a format for this page. Original text:*\n\n{}",
                    text
                )
            }
            Err(e) => {
                warn!("formatting page {} failed: {}", page, e);
                report.failed_pages.push(page);
                format!("*Error formatting this page. Original text:*\n\n{}", text)
            }
        };
        report.content.insert(page, formatted);
    }

    report
}

/// Reformat a selection; `None` for a blank selection or an empty answer
pub fn reformat_selection(
    selection: &str,
    formatter: &dyn PageFormatter,
) -> Result<Option<String>, FormatError> {
    let selection = selection.trim();
    if selection.is_empty() {
        return Ok(None);
    }
    Ok(formatter
        .format(&FormatRequest::selection(selection))?
        .filter(|text| !text.trim().is_empty()))
}

/// All formatted pages in order, `None` when there is nothing to summarize
pub fn summary_source(formatted: &PagedContent) -> Option<String> {
    let joined = formatted
        .iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);
    if joined.trim().is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Summarize the formatted pages; `None` when there is nothing to summarize
pub fn summarize(
    formatted: &PagedContent,
    formatter: &dyn PageFormatter,
) -> Result<Option<String>, FormatError> {
    let Some(document) = summary_source(formatted) else {
        return Ok(None);
    };
    Ok(formatter
        .format(&FormatRequest::summary(&document))?
        .filter(|text| !text.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Uppercases pages, fails on pages containing "boom", answers nothing for "empty"
    struct Shouty;

    impl PageFormatter for Shouty {
        fn format(&self, request: &FormatRequest) -> Result<Option<String>, FormatError> {
            let body = request.prompt.rsplit("\n\n").next().unwrap_or_default();
            if body.contains("boom") {
                return Err(FormatError::Request("500".to_string()));
            }
            if body.contains("empty") {
                return Ok(None);
            }
            Ok(Some(format!("# {}", body.to_uppercase())))
        }
    }

    fn pages(entries: &[(u32, &str)]) -> PagedContent {
        PagedContent::from_pages(entries.iter().map(|&(p, t)| (p, t.to_string())))
    }

    #[test]
    fn test_format_pages_with_fallbacks() {
        let extracted = pages(&[(1, "hello"), (2, "boom"), (3, "empty"), (4, "")]);
        let report = format_pages(&extracted, &Shouty);

        assert_eq!(report.content.get(1), Some("# HELLO"));
        assert_eq!(
            report.content.get(2),
            Some("*Error formatting this page. Original text:*\n\nboom")
        );
        assert!(report.content.get(3).unwrap().starts_with("*AI failed"));
        assert_eq!(report.content.get(4), None);
        assert_eq!(report.failed_pages, vec![2]);
        assert_eq!(report.empty_pages, vec![3]);
        assert_eq!(report.content.current_page(), Some(1));
    }

    #[test]
    fn test_prompts_carry_text() {
        let request = FormatRequest::page("raw words");
        assert_eq!(request.system_instruction, FORMAT_SYSTEM_INSTRUCTION);
        assert!(request.prompt.ends_with("Text to format:\n\nraw words"));
        assert!(FormatRequest::summary("doc").prompt.ends_with("DOCUMENT CONTENT:\n\ndoc"));
    }

    #[test]
    fn test_summary_source() {
        assert_eq!(summary_source(&PagedContent::new()), None);
        assert_eq!(summary_source(&pages(&[(1, "  ")])), None);
        assert_eq!(
            summary_source(&pages(&[(2, "b"), (1, "a")])).as_deref(),
            Some("a\n\n---\n\nb")
        );
    }

    #[test]
    fn test_reformat_and_summarize() {
        assert_eq!(reformat_selection("   ", &Shouty).unwrap(), None);
        assert_eq!(
            reformat_selection(" some text ", &Shouty).unwrap().as_deref(),
            Some("# SOME TEXT")
        );
        assert!(reformat_selection("boom", &Shouty).is_err());
        assert_eq!(summarize(&PagedContent::new(), &Shouty).unwrap(), None);
        assert!(summarize(&pages(&[(1, "page")]), &Shouty).unwrap().is_some());
    }
}
