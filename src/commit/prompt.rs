//! Prompt construction for commit message generation.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::analysis::analyze_changed_files;

static REPEATED_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("valid regex"));

/// Collapse runs of two or more spaces into one.
pub fn collapse_spaces(text: &str) -> String {
    REPEATED_SPACES.replace_all(text, " ").into_owned()
}

const DIFF_SOURCE: &str = "git --no-pager diff -U25 --cached --stat --line-prefix '$ ' -- ':!package-lock.json' ':!composer.lock'";

const MERGE_RULES: &str = r#"
Commit Message Rules:
1. Use the imperative mood ("Add" instead of "Adds" or "Added").
2. Start with a capital letter.
3. Do not end with a period.
4. Summarize the change, not the reason for it.
5. Keep it concise, max 50 characters.
6. Make it clear and descriptive.
7. English only.
8. Single-line format.
9. Do NOT try to format it like code / include ``` in the message.

Example: git commit -m "Add login feature"

Combine the following messages into one commit message:
"#;

/// Build the single-shot commit prompt for `diff`.
///
/// The template is classified, assembled and space-collapsed first; the diff
/// itself is appended verbatim at the very end.
pub fn build_commit_prompt(diff: &str, previous: &[String], hint: Option<&str>) -> String {
    let analysis = analyze_changed_files(diff);
    let prefix = analysis.conventional_prefix();

    let context_info = format!(
        r#"
      Change Analysis:
      - File types affected: {file_types}
      - Change type detected: {change_types}
      - Suggested conventional prefix: {prefix}
    "#,
        file_types = analysis.file_types_label(),
        change_types = analysis.change_types_label(),
    );

    let rules = format!(
        r#"
      Commit Message Rules:
      1. Use the imperative mood ("Add" instead of "Adds" or "Added").
      2. Start with a capital letter.
      3. Do not end with a period.
      4. Focus on the "what" and "why", not the "how".
      5. Keep it concise, max 50 characters.
      6. Make it clear and descriptive.
      7. English only.
      8. Use "and" if the commit does multiple things.
      9. Do NOT try to format it like code; Do not include ``` in the message.
      10. Use conventional commit format: {prefix}: message (DO NOT include scope in parentheses, only use the type prefix)
      11. Never include scope information like (dist,src) or (auth) in the commit message

      Example answer: git commit -m "feat: Add API endpoint for user login and registration form"
    "#
    );

    let additional_info = r#"
      In the diff, + indicates an added line, - indicates a removed line.
      Respond only in this format: git commit -m "Commit message". Lowercase commands only.
    "#;

    let hint_info = hint
        .filter(|h| !h.trim().is_empty())
        .map(|h| {
            format!(
                r#"
      The user provided this hint for the commit message. Please incorporate it into your message: "{h}"
        "#
            )
        })
        .unwrap_or_default();

    let template = format!(
        r#"
      The diff comes from this command: {DIFF_SOURCE}
      Each line starts with $ .
      ----
      {context_info}
      ----
      {rules}
      ----
      {additional_info}
      ----
      {hint_info}
      ----
      Here are the previous commit messages for consistency:
      {previous}
      ----
      Diff is:
    "#,
        previous = previous.join("\n"),
    );

    let mut prompt = collapse_spaces(&template);
    prompt.push_str(diff);
    prompt
}

/// Build the prompt that combines partial commit messages into one.
pub fn build_merge_prompt(partials: &str) -> String {
    format!("{MERGE_RULES}\n\n{partials}")
}
