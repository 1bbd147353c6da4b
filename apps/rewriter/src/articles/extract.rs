//! HTML → title + body text.

use scraper::{ElementRef, Html, Selector};

/// Paragraphs with fewer words than this are navigation crumbs, captions, etc.
const MIN_PARAGRAPH_WORDS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedArticle {
    pub title: String,
    pub text: String,
}

/// Extracts the title and paragraph text of an HTML document.
///
/// Title: `og:title`, then `<title>`, then the first `<h1>`.
/// Text: paragraphs of the first `<article>` if it has any, else every `<p>`
/// in the document, joined by blank lines.
pub fn extract_article(html: &str) -> ExtractedArticle {
    let document = Html::parse_document(html);

    ExtractedArticle {
        title: extract_title(&document),
        text: extract_text(&document),
    }
}

fn extract_title(document: &Html) -> String {
    if let Some(title) = select_first(document, r#"meta[property="og:title"]"#)
        .and_then(|meta| meta.value().attr("content"))
        .map(collapse_whitespace)
        .filter(|t| !t.is_empty())
    {
        return title;
    }

    ["title", "h1"]
        .iter()
        .filter_map(|css| select_first(document, css))
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

fn extract_text(document: &Html) -> String {
    let Ok(paragraph) = Selector::parse("p") else {
        return String::new();
    };

    if let Some(article) = select_first(document, "article") {
        let text = join_paragraphs(article.select(&paragraph));
        if !text.is_empty() {
            return text;
        }
    }

    join_paragraphs(document.select(&paragraph))
}

fn join_paragraphs<'a>(paragraphs: impl Iterator<Item = ElementRef<'a>>) -> String {
    paragraphs
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|p| p.split_whitespace().count() >= MIN_PARAGRAPH_WORDS)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn select_first<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    document.select(&selector).next()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
