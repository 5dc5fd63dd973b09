use crate::error::{AnalyticsError, Result};
use crate::models::{DocumentFormat, ExtractedContent, StoredDocument};
use docx_rs::{read_docx, DocumentChild, InsertChild, ParagraphChild, Run, RunChild};
use lopdf::Document;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

// Empty pages are kept so page order survives.
pub fn extract_page_texts(path: &Path) -> Result<Vec<PageText>> {
    let filename = display_name(path);
    let document = Document::load(path).map_err(|error| AnalyticsError::parse(&filename, error))?;

    let mut pages = Vec::new();
    for (page_no, _page_id) in document.get_pages() {
        let text = document
            .extract_text(&[page_no])
            .map_err(|error| AnalyticsError::parse(&filename, error))?;

        pages.push(PageText {
            number: page_no,
            text,
        });
    }

    if pages.is_empty() {
        return Err(AnalyticsError::parse(filename, "pdf has no pages"));
    }

    Ok(pages)
}

pub fn extract_paragraphs(path: &Path) -> Result<Vec<String>> {
    let filename = display_name(path);
    let bytes = fs::read(path).map_err(|error| AnalyticsError::parse(&filename, error))?;
    let docx = read_docx(&bytes).map_err(|error| AnalyticsError::parse(&filename, error))?;

    let paragraphs = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => {
                let mut text = String::new();
                push_paragraph_text(&paragraph.children, &mut text);
                Some(text)
            }
            _ => None,
        })
        .collect::<Vec<_>>();

    if paragraphs.is_empty() {
        return Err(AnalyticsError::parse(filename, "docx has no paragraphs"));
    }

    Ok(paragraphs)
}

// Hyperlinks and tracked insertions wrap runs that belong to the paragraph text.
fn push_paragraph_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, text),
            ParagraphChild::Hyperlink(link) => push_paragraph_text(&link.children, text),
            ParagraphChild::Insert(insert) => {
                for insert_child in &insert.children {
                    if let InsertChild::Run(run) = insert_child {
                        push_run_text(run, text);
                    }
                }
            }
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, text: &mut String) {
    for run_child in &run.children {
        match run_child {
            RunChild::Text(value) => text.push_str(&value.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

pub fn extract_content(document: &StoredDocument) -> Result<ExtractedContent> {
    let content = match document.format {
        DocumentFormat::Pdf => {
            let pages = extract_page_texts(&document.path)?;
            ExtractedContent {
                title: first_line(&pages[0].text),
                full_text: join_lines(pages.iter().map(|page| page.text.as_str())),
            }
        }
        DocumentFormat::Docx => {
            let paragraphs = extract_paragraphs(&document.path)?;
            ExtractedContent {
                title: paragraphs[0].trim().to_string(),
                full_text: join_lines(paragraphs.iter().map(String::as_str)),
            }
        }
        DocumentFormat::Other => ExtractedContent {
            title: document.filename.clone(),
            full_text: String::new(),
        },
    };

    tracing::debug!(
        filename = %document.filename,
        format = document.format.as_str(),
        chars = content.full_text.len(),
        "extracted document"
    );

    Ok(content)
}

pub fn extract_title(document: &StoredDocument) -> Result<String> {
    extract_content(document).map(|content| content.title)
}

pub fn extract_full_text(document: &StoredDocument) -> Result<String> {
    extract_content(document).map(|content| content.full_text)
}

fn first_line(text: &str) -> String {
    text.split('\n').next().unwrap_or_default().trim().to_string()
}

fn join_lines<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<Vec<_>>().join("\n")
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}
