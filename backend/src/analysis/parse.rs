//! Turns the model's free-form reply into `{name, description}`.
//!
//! Models are asked for JSON but regularly answer with prose, fenced JSON or
//! JSON surrounded by commentary. Parsing degrades in three stages and never
//! fails:
//!
//! 1. strict JSON object (optionally inside a single Markdown code fence)
//! 2. regex extraction of `"name"` / `"description"` string fields
//! 3. the raw trimmed text
//!
//! Stage 2 is best-effort. It understands backslash escapes inside the quoted
//! value but does not attempt to parse nested structures.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use shared::{AnalysisResult, PLACEHOLDER_DESCRIPTION};

lazy_static! {
    static ref RE_FENCED: Regex = Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*\n(.*?)\n?```$").unwrap();
    static ref RE_NAME: Regex = Regex::new(r#""name"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap();
    static ref RE_DESCRIPTION: Regex =
        Regex::new(r#""description"\s*:\s*"((?:[^"\\]|\\.)*)""#).unwrap();
}

/// Which stage produced the answer, with whatever that stage found.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedAnalysis {
    /// The reply decoded as a JSON object. Absent or empty fields are `None`.
    Structured {
        name: Option<String>,
        description: Option<String>,
    },
    /// At least one field was pulled out of otherwise invalid JSON.
    Extracted {
        name: Option<String>,
        description: Option<String>,
        raw: String,
    },
    /// Nothing recognisable, only the text itself.
    RawText(String),
}

impl ParsedAnalysis {
    pub fn parse(text: &str) -> Self {
        let raw = text.trim();

        if let Some(parsed) = parse_json_object(raw) {
            return parsed;
        }

        let name = capture_field(&RE_NAME, raw);
        let description = capture_field(&RE_DESCRIPTION, raw);
        if name.is_some() || description.is_some() {
            return ParsedAnalysis::Extracted {
                name,
                description,
                raw: raw.to_string(),
            };
        }

        ParsedAnalysis::RawText(raw.to_string())
    }

    pub fn stage(&self) -> &'static str {
        match self {
            ParsedAnalysis::Structured { .. } => "structured",
            ParsedAnalysis::Extracted { .. } => "extracted",
            ParsedAnalysis::RawText(_) => "raw-text",
        }
    }

    /// Fills the gaps with placeholders. An empty description never leaves here.
    pub fn into_result(self, placeholder_name: &str) -> AnalysisResult {
        let (name, description) = match self {
            ParsedAnalysis::Structured { name, description } => (
                name.unwrap_or_else(|| placeholder_name.to_string()),
                description.unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string()),
            ),
            ParsedAnalysis::Extracted {
                name,
                description,
                raw,
            } => (
                name.unwrap_or_else(|| placeholder_name.to_string()),
                description.unwrap_or(raw),
            ),
            ParsedAnalysis::RawText(raw) => (placeholder_name.to_string(), raw),
        };

        let description = if description.trim().is_empty() {
            PLACEHOLDER_DESCRIPTION.to_string()
        } else {
            description
        };

        AnalysisResult::Structured { name, description }
    }
}

fn parse_json_object(raw: &str) -> Option<ParsedAnalysis> {
    let candidate = RE_FENCED
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(raw);

    let value: Value = serde_json::from_str(candidate).ok()?;
    let object = value.as_object()?;

    let field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    Some(ParsedAnalysis::Structured {
        name: field("name"),
        description: field("description"),
    })
}

fn capture_field(re: &Regex, raw: &str) -> Option<String> {
    let captured = re.captures(raw)?.get(1)?.as_str();
    // Decode escapes the way JSON would; keep the literal text if that fails.
    let value = serde_json::from_str::<String>(&format!("\"{}\"", captured))
        .unwrap_or_else(|_| captured.to_string());
    (!value.trim().is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "Unnamed Object";

    fn structured(name: &str, description: &str) -> AnalysisResult {
        AnalysisResult::Structured {
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn valid_json_is_returned_unchanged() {
        let text = r#"{"name": "Coffee Mug", "description": "A white ceramic mug on a desk."}"#;
        let parsed = ParsedAnalysis::parse(text);
        assert_eq!(parsed.stage(), "structured");
        assert_eq!(
            parsed.into_result(PLACEHOLDER),
            structured("Coffee Mug", "A white ceramic mug on a desk.")
        );
    }

    #[test]
    fn padded_json_fields_keep_their_whitespace() {
        let text = r#"{"name": " Desk Lamp ", "description": "A brass lamp.\n"}"#;
        assert_eq!(
            ParsedAnalysis::parse(text).into_result(PLACEHOLDER),
            structured(" Desk Lamp ", "A brass lamp.\n")
        );
    }

    #[test]
    fn whitespace_only_json_fields_get_placeholders() {
        let text = r#"{"name": "   ", "description": "\t"}"#;
        assert_eq!(
            ParsedAnalysis::parse(text).into_result(PLACEHOLDER),
            structured("Unnamed Object", "No description provided")
        );
    }

    #[test]
    fn fenced_json_is_decoded_strictly() {
        let text = "```json\n{\"name\": \"Bicycle\", \"description\": \"A red road bike.\"}\n```";
        let parsed = ParsedAnalysis::parse(text);
        assert_eq!(
            parsed,
            ParsedAnalysis::Structured {
                name: Some("Bicycle".into()),
                description: Some("A red road bike.".into()),
            }
        );
    }

    #[test]
    fn plain_text_becomes_placeholder_and_trimmed_text() {
        let text = "  This is a photo of a sunset over the ocean.\n";
        let parsed = ParsedAnalysis::parse(text);
        assert_eq!(parsed.stage(), "raw-text");
        assert_eq!(
            parsed.into_result(PLACEHOLDER),
            structured("Unnamed Object", "This is a photo of a sunset over the ocean.")
        );
    }

    #[test]
    fn extracted_name_without_description_falls_back_to_raw_text() {
        let text = r#"Sure! Here it is: {"name": "Teapot", "description": 42"#;
        let parsed = ParsedAnalysis::parse(text);
        assert_eq!(parsed.stage(), "extracted");
        assert_eq!(parsed.into_result(PLACEHOLDER), structured("Teapot", text));
    }

    #[test]
    fn extracted_description_without_name_gets_placeholder_name() {
        let text = r#"Here you go: {"name": null, "description": "A folded paper crane"} hope it helps"#;
        let parsed = ParsedAnalysis::parse(text);
        assert_eq!(parsed.stage(), "extracted");
        assert_eq!(
            parsed.into_result(PLACEHOLDER),
            structured("Unnamed Object", "A folded paper crane")
        );
    }

    #[test]
    fn extracted_values_are_not_trimmed() {
        let text = r#"{"name": " Kettle ", "description": "Steel kettle " trailing"#;
        assert_eq!(
            ParsedAnalysis::parse(text).into_result(PLACEHOLDER),
            structured(" Kettle ", "Steel kettle ")
        );
    }

    #[test]
    fn extraction_finds_both_fields_in_surrounding_prose() {
        let text = r#"Result -> {"name": "Cat", "description": "A tabby cat asleep",} (trailing comma)"#;
        assert_eq!(
            ParsedAnalysis::parse(text).into_result(PLACEHOLDER),
            structured("Cat", "A tabby cat asleep")
        );
    }

    #[test]
    fn extraction_handles_escaped_quotes() {
        let text = r#"Answer: {"name": "The \"Big\" Clock", "description": "Tower clock"} done"#;
        assert_eq!(
            ParsedAnalysis::parse(text).into_result(PLACEHOLDER),
            structured(r#"The "Big" Clock"#, "Tower clock")
        );
    }

    #[test]
    fn json_missing_fields_gets_placeholders() {
        let parsed = ParsedAnalysis::parse(r#"{"name": "Lamp"}"#);
        assert_eq!(
            parsed.into_result(PLACEHOLDER),
            structured("Lamp", "No description provided")
        );

        let parsed = ParsedAnalysis::parse(r#"{"description": "", "name": 7}"#);
        assert_eq!(
            parsed.into_result(PLACEHOLDER),
            structured("Unnamed Object", "No description provided")
        );
    }

    #[test]
    fn non_object_json_falls_through_to_raw_text() {
        let parsed = ParsedAnalysis::parse(r#""just a string""#);
        assert_eq!(parsed, ParsedAnalysis::RawText(r#""just a string""#.into()));
    }

    #[test]
    fn empty_reply_never_yields_empty_description() {
        assert_eq!(
            ParsedAnalysis::parse("   ").into_result(PLACEHOLDER),
            structured("Unnamed Object", "No description provided")
        );
    }

    #[test]
    fn configured_placeholder_is_used() {
        assert_eq!(
            ParsedAnalysis::parse("a blurry shape").into_result("Mystery"),
            structured("Mystery", "a blurry shape")
        );
    }
}
