//! Result formatters

use super::markup::{markup_to_line, markup_to_text};
use stackgate_domain::{AggregateResult, Comment, OutputFormat};
use tracing::warn;

/// Rendered in place of an empty result list, in every format
pub const NO_RESULTS: &str = "No results found.";

/// Trait for rendering aggregate results
pub trait OutputFormatter {
    /// Render a non-empty result list
    fn format_results(&self, results: &[AggregateResult]) -> String;

    /// Render a result list, substituting [`NO_RESULTS`] when it is empty
    fn format(&self, results: &[AggregateResult]) -> String {
        if results.is_empty() {
            return NO_RESULTS.to_string();
        }
        self.format_results(results)
    }
}

/// Pretty-printed JSON mirroring the result tree
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_results(&self, results: &[AggregateResult]) -> String {
        serde_json::to_string_pretty(results).unwrap_or_else(|e| {
            warn!("Failed to serialize results: {}", e);
            error_json(&e.to_string())
        })
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Readable Markdown with post markup stripped
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    fn push_comments(markdown: &mut String, heading: &str, comments: &[Comment]) {
        if comments.is_empty() {
            return;
        }
        markdown.push_str(heading);
        markdown.push_str("\n\n");
        for comment in comments {
            markdown.push_str(&format!(
                "- {} *(Score: {})*\n",
                markup_to_line(&comment.body),
                comment.score
            ));
        }
        markdown.push('\n');
    }

    fn format_one(markdown: &mut String, result: &AggregateResult) {
        let question = &result.question;
        markdown.push_str(&format!("# {}\n\n", markup_to_line(&question.title)));
        markdown.push_str(&format!(
            "**Score:** {} | **Answers:** {}\n\n",
            question.score, question.answer_count
        ));
        markdown.push_str(&format!(
            "## Question\n\n{}\n\n",
            markup_to_text(&question.body)
        ));

        if let Some(comments) = &result.comments {
            Self::push_comments(markdown, "### Question Comments", &comments.question);
        }

        markdown.push_str("## Answers\n\n");
        let accepted = result.accepted_answer().map(|a| a.answer_id);
        for answer in &result.answers {
            let marker = if accepted == Some(answer.answer_id) {
                "✓ "
            } else {
                ""
            };
            markdown.push_str(&format!("### {}Answer (Score: {})\n\n", marker, answer.score));
            markdown.push_str(&markup_to_text(&answer.body));
            markdown.push_str("\n\n");

            if let Some(comments) = &result.comments {
                Self::push_comments(
                    markdown,
                    "#### Answer Comments",
                    comments.for_answer(answer.answer_id),
                );
            }
        }

        markdown.push_str(&format!(
            "---\n\n[View on Stack Overflow]({})\n\n",
            question.link
        ));
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_results(&self, results: &[AggregateResult]) -> String {
        let mut markdown = String::new();
        for result in results {
            Self::format_one(&mut markdown, result);
        }
        markdown.truncate(markdown.trim_end().len());
        markdown
    }
}

/// Render `results` in the requested format
pub fn format_response(results: &[AggregateResult], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => JsonFormatter.format(results),
        OutputFormat::Markdown => MarkdownFormatter.format(results),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stackgate_domain::{Answer, CommentBundle, Question};
    use std::collections::BTreeMap;

    fn comment(id: u64, post_id: u64, body: &str, score: i64) -> Comment {
        Comment {
            comment_id: id,
            post_id,
            score,
            body: body.to_string(),
            ..Default::default()
        }
    }

    fn sample(with_comments: bool) -> AggregateResult {
        let question = Question {
            question_id: 1,
            title: "How do I &quot;borrow&quot; twice?".to_string(),
            body: "<p>It fails with <code>E0499</code>.</p>".to_string(),
            score: 12,
            answer_count: 2,
            accepted_answer_id: Some(20),
            link: "https://stackoverflow.com/q/1".to_string(),
            ..Default::default()
        };
        let answers = vec![
            Answer {
                answer_id: 20,
                question_id: 1,
                score: 30,
                is_accepted: true,
                body: "<p>Use a scope.</p>".to_string(),
                ..Default::default()
            },
            Answer {
                answer_id: 21,
                question_id: 1,
                score: -1,
                body: "<p>Clone it.</p>".to_string(),
                ..Default::default()
            },
        ];
        let comments = with_comments.then(|| {
            let mut by_answer = BTreeMap::new();
            by_answer.insert(20, vec![comment(200, 20, "Works, <b>thanks</b>", 3)]);
            by_answer.insert(21, Vec::new());
            CommentBundle::new(vec![comment(100, 1, "Which edition?", 0)], by_answer)
        });
        AggregateResult::new(question, answers, comments)
    }

    #[test]
    fn test_empty_results_in_both_formats() {
        assert_eq!(format_response(&[], OutputFormat::Markdown), NO_RESULTS);
        assert_eq!(format_response(&[], OutputFormat::Json), NO_RESULTS);
    }

    #[test]
    fn test_markdown_without_comments() {
        let output = format_response(&[sample(false)], OutputFormat::Markdown);
        let expected = "\
# How do I \"borrow\" twice?

**Score:** 12 | **Answers:** 2

## Question

It fails with `E0499`.

## Answers

### ✓ Answer (Score: 30)

Use a scope.

### Answer (Score: -1)

Clone it.

---

[View on Stack Overflow](https://stackoverflow.com/q/1)";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_markdown_with_comments() {
        let output = format_response(&[sample(true)], OutputFormat::Markdown);
        let expected = "\
# How do I \"borrow\" twice?

**Score:** 12 | **Answers:** 2

## Question

It fails with `E0499`.

### Question Comments

- Which edition? *(Score: 0)*

## Answers

### ✓ Answer (Score: 30)

Use a scope.

#### Answer Comments

- Works, thanks *(Score: 3)*

### Answer (Score: -1)

Clone it.

---

[View on Stack Overflow](https://stackoverflow.com/q/1)";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_markdown_separates_results() {
        let output = MarkdownFormatter.format(&[sample(false), sample(false)]);
        assert_eq!(output.matches("[View on Stack Overflow]").count(), 2);
        assert!(output.contains("(https://stackoverflow.com/q/1)\n\n# How do I"));
    }

    #[test]
    fn test_json_mirrors_result_tree() {
        let output = format_response(&[sample(true)], OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let first = &value[0];
        assert_eq!(first["question"]["question_id"], 1);
        assert_eq!(
            first["question"]["title"],
            "How do I &quot;borrow&quot; twice?"
        );
        assert_eq!(first["answers"][0]["is_accepted"], true);
        assert_eq!(first["comments"]["question"][0]["comment_id"], 100);
        assert_eq!(first["comments"]["answers"]["20"][0]["score"], 3);
        assert!(output.contains("\n  "));
    }

    #[test]
    fn test_json_without_comments_is_null() {
        let output = JsonFormatter.format(&[sample(false)]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value[0]["comments"].is_null());
    }

    #[test]
    fn test_error_json_escapes_message() {
        let rendered = error_json("key must be a string: \"owner\"\n");
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["error"], "key must be a string: \"owner\"\n");
    }
}
