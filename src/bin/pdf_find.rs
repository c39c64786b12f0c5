//! CLI tool for finding and highlighting text in PDF pages

use pdf_workbench::{extract_pages, search_pages, Highlighter, PageHits};
use std::env;
use std::fs;
use std::process;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <pdf_file> <query> [--pages 1,3-5] [--html out.html]", args[0]);
        eprintln!("       {} <pdf_file> <query> [--pages 1,3-5] --json", args[0]);
        eprintln!();
        eprintln!("Extracts the selected pages (all by default) and highlights every");
        eprintln!("case-insensitive occurrence of the query.");
        process::exit(1);
    }

    let pdf_path = &args[1];
    let query = &args[2];
    let json_output = args.iter().any(|a| a == "--json");
    let selection = flag_value(&args, "--pages").unwrap_or_default();
    let html_file = flag_value(&args, "--html");

    let start = Instant::now();

    let content = match extract_pages(pdf_path, &selection) {
        Ok(content) => content,
        Err(e) => {
            if json_output {
                println!(r#"{{"error":"{}"}}"#, json_escape(&e.to_string()));
            } else {
                eprintln!("Error: {}", e);
            }
            process::exit(1);
        }
    };

    let hits = search_pages(&content, query, &Highlighter::default());
    let total: usize = hits.iter().map(|h| h.matches).sum();
    let elapsed = start.elapsed();

    if let Some(output) = &html_file {
        if let Err(e) = write_html(&hits, query, output) {
            if json_output {
                println!(
                    r#"{{"error":"{}"}}"#,
                    json_escape(&format!("failed to write {}: {}", output, e))
                );
            } else {
                eprintln!("Error: failed to write {}: {}", output, e);
            }
            process::exit(1);
        }
    }

    if json_output {
        let pages = hits
            .iter()
            .map(|h| {
                format!(
                    r#"{{"page":{},"matches":{},"html":"{}"}}"#,
                    h.page,
                    h.matches,
                    json_escape(&h.html())
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        println!(
            r#"{{"query":"{}","pages_searched":{},"total_matches":{},"processing_time_ms":{},"html_file":{},"pages":[{}]}}"#,
            json_escape(query),
            hits.len(),
            total,
            elapsed.as_millis(),
            html_file
                .as_ref()
                .map(|f| format!("\"{}\"", json_escape(f)))
                .unwrap_or_else(|| "null".to_string()),
            pages
        );
    } else {
        println!("PDF Find Results");
        println!("================");
        println!("File: {}", pdf_path);
        println!("Query: {:?}", query);
        println!();
        for h in &hits {
            println!("Page {}: {} match(es)", h.page, h.matches);
        }
        println!();
        println!("Total matches: {}", total);
        println!("Processing time: {}ms", elapsed.as_millis());

        if let Some(output) = &html_file {
            println!();
            println!("Highlighted pages written to: {}", output);
        }
    }

    // Nothing matched: distinct exit code in every output mode
    if total == 0 {
        process::exit(2);
    }
}

fn write_html(hits: &[PageHits], query: &str, output: &str) -> std::io::Result<()> {
    let body = hits
        .iter()
        .filter(|h| h.matches > 0)
        .map(|h| format!("<h2>Page {}</h2>\n{}", h.page, h.html()))
        .collect::<Vec<_>>()
        .join("\n");
    let html = format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>Matches for {}</title><style>.highlight{{background-color: #fde047;}}</style></head><body>{}</body></html>",
        html_title(query),
        body
    );
    fs::write(output, html)
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn json_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c < '\u{20}' => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }
    escaped
}

fn html_title(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
