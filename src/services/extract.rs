//! Pulls structured data out of free-form model replies.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not find a JSON object in the response")]
    NoJson,
    #[error("malformed JSON: {source}")]
    Malformed {
        fragment: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid question format: {0}")]
    InvalidQuestion(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub document: Value,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionPayload {
    question: Option<String>,
    #[serde(default)]
    options: Vec<String>,
}

fn object_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid object pattern"))
}

fn trailing_comma_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("valid comma pattern"))
}

fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// The span from the first `{` to the last `}`.
pub fn json_object(text: &str) -> Option<&str> {
    object_pattern().find(strip_fences(text)).map(|m| m.as_str())
}

pub fn remove_trailing_commas(json: &str) -> String {
    trailing_comma_pattern().replace_all(json, "$1").into_owned()
}

fn parse_object(text: &str) -> Result<Value, ParseError> {
    let fragment = json_object(text).ok_or(ParseError::NoJson)?;
    serde_json::from_str(&remove_trailing_commas(fragment)).map_err(|source| {
        ParseError::Malformed {
            fragment: fragment.to_string(),
            source,
        }
    })
}

/// Splits `LABEL: {json} MESSAGE: text` replies. Either section may be absent;
/// without a label the JSON object is searched for anywhere in the reply.
pub fn parse_document(text: &str, label: Option<&str>) -> Result<ParsedDocument, ParseError> {
    let (body, message) = match text.split_once("MESSAGE:") {
        Some((body, message)) => {
            let message = message.trim();
            (body, (!message.is_empty()).then(|| message.to_string()))
        }
        None => (text, None),
    };

    let body = match label {
        Some(label) => body.replacen(&format!("{}:", label), "", 1),
        None => body.to_string(),
    };

    Ok(ParsedDocument {
        document: parse_object(&body)?,
        message,
    })
}

pub fn parse_question(text: &str) -> Result<Question, ParseError> {
    let value = parse_object(text)?;
    let payload: QuestionPayload =
        serde_json::from_value(value).map_err(|_| ParseError::InvalidQuestion("unexpected shape"))?;

    let question = payload
        .question
        .map(|question| question.trim().to_string())
        .filter(|question| !question.is_empty())
        .ok_or(ParseError::InvalidQuestion("missing question"))?;

    let options: Vec<String> = payload
        .options
        .into_iter()
        .map(|option| option.trim().to_string())
        .filter(|option| !option.is_empty())
        .collect();
    if options.len() < 3 {
        return Err(ParseError::InvalidQuestion("fewer than 3 options"));
    }

    Ok(Question { question, options })
}

pub fn format_options(question: &Question) -> String {
    let numbered = question
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| format!("{}. {}", index + 1, option))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}\n\n{}\n\nPlease respond with just the number (1-{}) of your choice.",
        question.question,
        numbered,
        question.options.len()
    )
}

/// Maps a numbered reply onto the offered option; anything else passes through.
pub fn resolve_choice(reply: &str, options: &[String]) -> String {
    match reply.trim().parse::<usize>() {
        Ok(choice) if (1..=options.len()).contains(&choice) => options[choice - 1].clone(),
        _ => reply.to_string(),
    }
}
