//! Fenced code block handling.

use crate::detector::{detect, needs_detection, CodeLanguage};

const FENCE: &str = "```";

/// Opening fence info for a line, if the line opens or closes a fence.
pub(crate) fn fence_tag(line: &str) -> Option<&str> {
    line.trim_start().strip_prefix(FENCE).map(str::trim)
}

/// Whether a line closes an open fence.
pub(crate) fn is_fence_close(line: &str) -> bool {
    line.trim() == FENCE
}

/// Rewrite the opening line of every fence whose language tag is missing or
/// the generic `js` placeholder, using the detector on the fence body.
///
/// `default_language` is only used for fences with a blank body, where the
/// detector has nothing to look at. Fences with any other tag are left
/// alone, as is all text outside fences.
pub fn normalize_fences(text: &str, default_language: Option<CodeLanguage>) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<OpenFence> = None;

    for line in text.lines() {
        match open.take() {
            None => {
                if let Some(tag) = fence_tag(line) {
                    open = Some(OpenFence {
                        line_index: out.len(),
                        indent: leading_whitespace(line).to_string(),
                        needs_detection: needs_detection(tag),
                        body: Vec::new(),
                    });
                }
                out.push(line.to_string());
            }
            Some(mut fence) => {
                if is_fence_close(line) {
                    fence.close(&mut out, default_language);
                } else {
                    fence.body.push(line.to_string());
                    open = Some(fence);
                }
                out.push(line.to_string());
            }
        }
    }

    // An unclosed fence runs to the end of the text.
    if let Some(fence) = open {
        fence.close(&mut out, default_language);
    }

    let mut result = out.join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }
    result
}

struct OpenFence {
    line_index: usize,
    indent: String,
    needs_detection: bool,
    body: Vec<String>,
}

impl OpenFence {
    fn close(self, out: &mut [String], default_language: Option<CodeLanguage>) {
        if !self.needs_detection {
            return;
        }

        let body = self.body.join("\n");
        let language = match default_language {
            Some(language) if body.trim().is_empty() => language,
            _ => detect(&body),
        };
        out[self.line_index] = format!("{}{}{}", self.indent, FENCE, language.as_tag());
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn untagged_html_fence_gets_html() {
        let input = "Look:\n```\n<div>x</div>\n```\ndone";
        assert_eq!(
            normalize_fences(input, None),
            "Look:\n```html\n<div>x</div>\n```\ndone"
        );
    }

    #[test]
    fn generic_js_fence_is_reclassified() {
        let input = "```js\n<p>hi</p>\n```";
        assert_eq!(normalize_fences(input, None), "```html\n<p>hi</p>\n```");

        let input = "```JS\nconst a = 1;\n```";
        assert_eq!(normalize_fences(input, None), "```javascript\nconst a = 1;\n```");
    }

    #[test]
    fn explicit_tags_are_kept() {
        let input = "```jsx\n<App />\n```\n```python\nprint(1)\n```";
        assert_eq!(normalize_fences(input, None), input);
    }

    #[test]
    fn blank_fence_uses_default_language() {
        let input = "```\n\n```";
        assert_eq!(
            normalize_fences(input, Some(CodeLanguage::Html)),
            "```html\n\n```"
        );
        assert_eq!(normalize_fences(input, None), "```javascript\n\n```");
    }

    #[test]
    fn default_language_does_not_override_detection() {
        let input = "```\nlet x = 2;\n```";
        assert_eq!(
            normalize_fences(input, Some(CodeLanguage::Html)),
            "```javascript\nlet x = 2;\n```"
        );
    }

    #[test]
    fn indentation_and_trailing_newline_preserved() {
        let input = "  ```\n  <b>x</b>\n  ```\n";
        assert_eq!(normalize_fences(input, None), "  ```html\n  <b>x</b>\n  ```\n");
    }

    #[test]
    fn unclosed_fence_is_normalized() {
        let input = "```\nfoo();";
        assert_eq!(normalize_fences(input, None), "```javascript\nfoo();");
    }

    #[test]
    fn text_without_fences_is_untouched() {
        let input = "plain <b>text</b>\n\nmore";
        assert_eq!(normalize_fences(input, None), input);
    }

    #[test]
    fn normalization_is_stable() {
        let input = "```\n<i>a</i>\n```\n```js\nx()\n```";
        let once = normalize_fences(input, None);
        assert_eq!(normalize_fences(&once, None), once);
    }
}
