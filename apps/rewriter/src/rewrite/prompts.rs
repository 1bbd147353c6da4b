// Prompt text for the rewrite call.

/// Rewrite prompt template. Replace `{keywords}` and `{article}` before sending.
pub const REWRITE_PROMPT_TEMPLATE: &str = "
Rewrite the following article using the words: {keywords}.
Keep the original meaning and context of the article.
Article:
{article}
";

/// Fills the rewrite template. Keywords are joined with `", "`.
pub fn build_rewrite_prompt(keywords: &[String], article_text: &str) -> String {
    REWRITE_PROMPT_TEMPLATE
        .replace("{keywords}", &keywords.join(", "))
        .replace("{article}", article_text)
}
