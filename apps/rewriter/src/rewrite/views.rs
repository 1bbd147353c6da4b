//! HTML page for the interactive tool.

use askama::Template;
use markdown::{to_html_with_options, Options as MarkdownOptions};

use crate::rewrite::RewriteResult;

/// Values echoed back into the form inputs.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub url1: String,
    pub url2: String,
    pub keywords: String,
}

/// What the output region shows.
#[derive(Debug, Default)]
pub enum Output {
    #[default]
    Empty,
    Rewritten(RewriteResult),
    Message(String),
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Article Rewriter</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/css/bootstrap.min.css" rel="stylesheet">
  </head>
  <body>
    <main class="container-fluid py-4">
      <h2>📰 Article Rewriter</h2>
      <form method="post" action="/rewrite">
        <input class="form-control mb-2" type="text" name="url1" placeholder="Enter URL to first article" value="{{ form.url1 }}">
        <input class="form-control mb-2" type="text" name="url2" placeholder="Enter URL to second article" value="{{ form.url2 }}">
        <textarea class="form-control mb-2" name="keywords" placeholder="Optional: Enter keywords, comma-separated">{{ form.keywords }}</textarea>
        <button class="btn btn-primary mb-3" type="submit">Rewrite Article</button>
      </form>

      <div id="output" style="white-space: pre-line">
      {% match output %}
      {% when Output::Rewritten with (result) %}
        <h4>📘 First Article</h4>
        <p>🔗 Title: {{ result.article1.title }}</p>
        <p>🗝 Keywords: {{ result.article1.keywords.join(", ") }}</p>
        <p>📝 Content:
{{ result.article1.text }}</p>
        <hr>
        <h4>📙 Second Article</h4>
        <p>🔗 Title: {{ result.article2.title }}</p>
        <p>🗝 Keywords: {{ result.article2.keywords.join(", ") }}</p>
        <p>📝 Content:
{{ result.article2.text }}</p>
        <hr>
        <h4>✍️ Rewritten Article</h4>
        <div class="rewritten" style="white-space: normal">{{ result.rewritten_text|gfm|safe }}</div>
        <hr>
        <h4>📌 Keywords Used in Rewrite</h4>
        <p>{{ result.keywords_used.join(", ") }}</p>
      {% when Output::Message with (message) %}
        <p class="error">{{ message }}</p>
      {% when Output::Empty %}
      {% endmatch %}
      </div>
    </main>
  </body>
</html>
"#,
    ext = "html"
)]
pub struct RewritePage {
    pub form: FormValues,
    pub output: Output,
}

fn markdown_options() -> MarkdownOptions {
    let mut options = MarkdownOptions::gfm();
    // Input is already escaped; the only raw HTML left is our own <mark>.
    options.compile.allow_dangerous_html = true;
    options
}

/// Renders highlighted rewrite text as Markdown, keeping its `<mark>` tags.
pub fn render_markdown(highlighted: &str) -> String {
    to_html_with_options(highlighted, &markdown_options())
        .unwrap_or_else(|_| highlighted.to_string())
}

mod filters {
    pub fn gfm<T: std::fmt::Display>(s: T) -> ::askama::Result<String> {
        Ok(super::render_markdown(&s.to_string()))
    }
}
