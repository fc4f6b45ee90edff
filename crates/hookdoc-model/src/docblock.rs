//! Docblock parsing.
//!
//! Turns raw `/** ... */` text into the structured shape the document
//! model carries: a short description (single line, newlines collapsed),
//! a long description (remaining paragraphs), and an ordered tag list.
//! Version tags (`@since`, `@deprecated`) put the version in `content`
//! and keep any trailing prose as the tag's `description`.

use serde::Serialize;

/// Structured documentation for one entity. Every documentable entity
/// owns exactly one, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Docblock {
    pub description: String,
    pub long_description: String,
    pub tags: Vec<DocTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocTag {
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tags whose first token is a type expression.
const TYPED_TAGS: [&str; 7] = [
    "param",
    "return",
    "var",
    "type",
    "property",
    "global",
    "throws",
];

/// Tags that may carry a `$variable` after the type.
const VARIABLE_TAGS: [&str; 4] = ["param", "var", "global", "property"];

/// Tags whose content is a version number.
const VERSION_TAGS: [&str; 2] = ["since", "deprecated"];

impl Docblock {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.long_description.is_empty() && self.tags.is_empty()
    }

    /// Parse raw docblock text. Accepts the full `/** ... */` block as it
    /// appears in the source.
    pub fn parse(raw: &str) -> Docblock {
        let lines = normalize(raw);

        let mut free_text: Vec<&str> = Vec::new();
        let mut tag_lines: Vec<String> = Vec::new();

        for line in &lines {
            if line.starts_with('@') {
                tag_lines.push(line.clone());
            } else if let Some(last) = tag_lines.last_mut() {
                // Continuation of the previous tag.
                if !line.is_empty() {
                    last.push(' ');
                    last.push_str(line);
                }
            } else {
                free_text.push(line);
            }
        }

        let mut paragraphs: Vec<String> = Vec::new();
        let mut current = String::new();
        for line in free_text {
            if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(std::mem::take(&mut current));
                }
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current);
        }

        let mut paragraphs = paragraphs.into_iter();
        let description = paragraphs.next().unwrap_or_default();
        let long_description = paragraphs.collect::<Vec<_>>().join("\n\n");

        Docblock {
            description,
            long_description,
            tags: tag_lines.iter().map(|line| parse_tag(line)).collect(),
        }
    }
}

/// Strip the comment delimiters and the leading `*` gutter, yielding
/// trimmed content lines.
fn normalize(raw: &str) -> Vec<String> {
    let mut inner = raw.trim();
    inner = inner.strip_prefix("/**").unwrap_or(inner);
    inner = inner.strip_suffix("*/").unwrap_or(inner);

    inner
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim().to_string())
        .skip_while(|line| line.is_empty())
        .collect()
}

fn parse_tag(line: &str) -> DocTag {
    let body = line.trim_start_matches('@');
    let (name, rest) = match body.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (body, ""),
    };

    let mut tag = DocTag {
        name: name.to_string(),
        ..DocTag::default()
    };

    let mut remainder = rest;

    if TYPED_TAGS.contains(&name) {
        if let Some((types, after)) = split_token(remainder) {
            if !types.starts_with('$') {
                tag.types = types.split('|').map(str::to_string).collect();
                remainder = after;
            }
        }
        if VARIABLE_TAGS.contains(&name) {
            if let Some((token, after)) = split_token(remainder) {
                if token.starts_with('$') {
                    tag.variable = Some(token.to_string());
                    remainder = after;
                }
            }
        }
        tag.content = remainder.to_string();
        return tag;
    }

    if name == "link" {
        if let Some((url, after)) = split_token(remainder) {
            tag.link = Some(url.to_string());
            tag.content = if after.is_empty() {
                url.to_string()
            } else {
                after.to_string()
            };
        }
        return tag;
    }

    if name == "see" {
        if let Some((target, after)) = split_token(remainder) {
            tag.refers = Some(target.to_string());
            tag.content = after.to_string();
        }
        return tag;
    }

    if VERSION_TAGS.contains(&name) {
        if let Some((version, after)) = split_token(remainder) {
            if version.starts_with(|c: char| c.is_ascii_digit()) {
                tag.content = version.to_string();
                if !after.is_empty() {
                    tag.description = Some(after.to_string());
                }
                return tag;
            }
        }
        tag.content = remainder.to_string();
        return tag;
    }

    tag.content = remainder.to_string();
    tag
}

fn split_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text.split_once(char::is_whitespace) {
        Some((token, rest)) => Some((token, rest.trim())),
        None => Some((text, "")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_docblock() {
        let doc = Docblock::default();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_short_description_only() {
        let doc = Docblock::parse("/** Fires my action. */");
        assert_eq!(doc.description, "Fires my action.");
        assert_eq!(doc.long_description, "");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_multiline_short_description_collapses() {
        let doc = Docblock::parse("/**\n * Fires when the post\n * is saved.\n */");
        assert_eq!(doc.description, "Fires when the post is saved.");
    }

    #[test]
    fn test_long_description_paragraphs() {
        let doc = Docblock::parse(concat!(
            "/**\n",
            " * Short line.\n",
            " *\n",
            " * First long paragraph.\n",
            " *\n",
            " * Second long paragraph.\n",
            " */",
        ));
        assert_eq!(doc.description, "Short line.");
        assert_eq!(
            doc.long_description,
            "First long paragraph.\n\nSecond long paragraph."
        );
    }

    #[test]
    fn test_param_tag() {
        let doc = Docblock::parse(concat!(
            "/**\n",
            " * Filters the title.\n",
            " *\n",
            " * @param string|null $title The post title.\n",
            " */",
        ));
        let tag = &doc.tags[0];
        assert_eq!(tag.name, "param");
        assert_eq!(tag.types, vec!["string".to_string(), "null".to_string()]);
        assert_eq!(tag.variable.as_deref(), Some("$title"));
        assert_eq!(tag.content, "The post title.");
    }

    #[test]
    fn test_since_tag_splits_version_and_prose() {
        let doc = Docblock::parse("/**\n * Doc.\n *\n * @since 2.5.0 Added the `$post` parameter.\n */");
        let tag = &doc.tags[0];
        assert_eq!(tag.name, "since");
        assert_eq!(tag.content, "2.5.0");
        assert_eq!(tag.description.as_deref(), Some("Added the `$post` parameter."));
    }

    #[test]
    fn test_since_tag_without_version() {
        let doc = Docblock::parse("/**\n * Doc.\n *\n * @since MU\n */");
        let tag = &doc.tags[0];
        assert_eq!(tag.content, "MU");
        assert_eq!(tag.description, None);
    }

    #[test]
    fn test_see_and_link_tags() {
        let doc = Docblock::parse(concat!(
            "/**\n",
            " * Doc.\n",
            " *\n",
            " * @see wp_insert_post()\n",
            " * @link https://example.com/docs More info.\n",
            " */",
        ));
        assert_eq!(doc.tags[0].refers.as_deref(), Some("wp_insert_post()"));
        assert_eq!(doc.tags[1].link.as_deref(), Some("https://example.com/docs"));
        assert_eq!(doc.tags[1].content, "More info.");
    }

    #[test]
    fn test_tag_continuation_lines() {
        let doc = Docblock::parse(concat!(
            "/**\n",
            " * Doc.\n",
            " *\n",
            " * @param string $name A name that needs\n",
            " *                     two lines to describe.\n",
            " */",
        ));
        assert_eq!(
            doc.tags[0].content,
            "A name that needs two lines to describe."
        );
    }
}
