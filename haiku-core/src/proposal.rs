//! Haiku proposals and the proposal handler
//!
//! A proposal arrives as tool-call arguments from the agent layer. Nothing in
//! here fails: missing lines, misaligned translations and unknown images are
//! all normalized so the conversation can keep going.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::catalog::{ImageCatalog, ImageChoice};

/// Number of lines in a well-formed haiku
pub const HAIKU_LINES: usize = 3;

/// Arguments of a `generateHaiku` call, possibly still streaming in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HaikuProposal {
    /// An array of three lines of the haiku in Japanese (5-7-5 syllables)
    #[serde(
        default,
        rename = "japanese",
        alias = "japaneseLines",
        deserialize_with = "lenient_lines",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Vec<String>")]
    pub japanese_lines: Option<Vec<String>>,

    /// An array of three lines of the haiku in English translation
    #[serde(
        default,
        rename = "english",
        alias = "englishLines",
        deserialize_with = "lenient_lines",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Vec<String>")]
    pub english_lines: Option<Vec<String>>,

    /// Choose the most appropriate image filename from the available options based on the haiku content
    #[serde(
        default,
        rename = "selectedImage",
        alias = "selectedImageId",
        alias = "image",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "String")]
    pub selected_image_id: Option<String>,
}

impl HaikuProposal {
    /// Create a complete proposal
    pub fn new<J, E, S>(japanese: J, english: E, selected_image_id: impl Into<String>) -> Self
    where
        J: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            japanese_lines: Some(japanese.into_iter().map(Into::into).collect()),
            english_lines: Some(english.into_iter().map(Into::into).collect()),
            selected_image_id: Some(selected_image_id.into()),
        }
    }

    /// Decode complete tool-call arguments.
    ///
    /// Falls back to [`from_partial`](Self::from_partial) when the text is not
    /// valid JSON, and to an empty proposal when even that fails.
    pub fn from_arguments(arguments: &str) -> Self {
        match serde_json::from_str::<HaikuProposal>(arguments) {
            Ok(proposal) => proposal,
            Err(e) => {
                debug!("Arguments are not a complete proposal ({}), trying partial decode", e);
                Self::from_partial(arguments).unwrap_or_default()
            }
        }
    }

    /// Decode a streaming fragment of tool-call arguments.
    ///
    /// Returns `None` when the fragment cannot be closed into a JSON object
    /// yet (e.g. it stops inside a key).
    pub fn from_partial(fragment: &str) -> Option<Self> {
        let closed = close_partial_json(fragment);
        serde_json::from_str(&closed).ok()
    }

    /// Merge a newer snapshot: fields it carries replace ours, the rest stay.
    pub fn merge(&mut self, newer: HaikuProposal) {
        if newer.japanese_lines.is_some() {
            self.japanese_lines = newer.japanese_lines;
        }
        if newer.english_lines.is_some() {
            self.english_lines = newer.english_lines;
        }
        if newer.selected_image_id.is_some() {
            self.selected_image_id = newer.selected_image_id;
        }
    }
}

/// A validated proposal, ready for review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    /// Japanese lines, verbatim
    pub japanese_lines: Vec<String>,
    /// English lines, aligned index by index with `japanese_lines`
    pub english_lines: Vec<String>,
    /// Catalog image to display
    pub image_id: String,
}

impl ProposalRecord {
    /// Pairs of (Japanese, English) lines
    pub fn verses(&self) -> impl Iterator<Item = (&str, &str)> {
        self.japanese_lines
            .iter()
            .zip(self.english_lines.iter())
            .map(|(ja, en)| (ja.as_str(), en.as_str()))
    }

    /// Empty proposals render nothing and cannot be reviewed
    pub fn is_renderable(&self) -> bool {
        !self.japanese_lines.is_empty()
    }
}

/// Result of handling a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalOutcome {
    /// Message returned to the conversation transcript
    pub confirmation: String,
    /// Record to render for review
    pub record: ProposalRecord,
    /// Whether the first catalog image replaced the requested one
    pub image_fallback: bool,
}

/// Validate a proposal against the catalog.
///
/// Pure apart from logging. Translations are aligned to the Japanese lines:
/// missing ones become empty strings and surplus ones are dropped.
pub fn handle_proposal(proposal: &HaikuProposal, catalog: &ImageCatalog) -> ProposalOutcome {
    let japanese_lines = proposal.japanese_lines.clone().unwrap_or_default();
    let mut english_lines = proposal.english_lines.clone().unwrap_or_default();

    if english_lines.len() != japanese_lines.len() {
        warn!(
            japanese = japanese_lines.len(),
            english = english_lines.len(),
            "Haiku translation is misaligned, padding with empty lines"
        );
        english_lines.resize(japanese_lines.len(), String::new());
    }
    if japanese_lines.len() != HAIKU_LINES {
        debug!(lines = japanese_lines.len(), "Haiku does not have three lines");
    }

    let choice = catalog.resolve(proposal.selected_image_id.as_deref());
    if let ImageChoice::Fallback(image) = choice {
        warn!(
            requested = proposal.selected_image_id.as_deref().unwrap_or("<none>"),
            fallback = image,
            "Selected image is not in the catalog, using fallback"
        );
    }

    ProposalOutcome {
        confirmation: format!("Generated haiku with selected image: {}", choice.id()),
        record: ProposalRecord {
            japanese_lines,
            english_lines,
            image_id: choice.id().to_string(),
        },
        image_fallback: choice.is_fallback(),
    }
}

/// Close an unfinished JSON text so it can be decoded.
///
/// Terminates an open string, drops a dangling `,`, turns a dangling `:` into
/// `: null`, then closes every open array and object. The result is not
/// guaranteed to be valid JSON (a fragment cut inside a key or a literal
/// stays invalid).
pub fn close_partial_json(fragment: &str) -> String {
    let mut closers = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in fragment.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                closers.pop();
            }
            _ => {}
        }
    }

    let mut closed = fragment.trim_end().to_string();
    if in_string {
        if escaped {
            closed.pop();
        }
        closed.push('"');
    } else if closed.ends_with(',') {
        closed.pop();
    } else if closed.ends_with(':') {
        closed.push_str(" null");
    }

    while let Some(closer) = closers.pop() {
        closed.push(closer);
    }
    closed
}

fn lenient_lines<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(items.into_iter().map(line_text).collect()),
        Some(Value::String(text)) => Some(text.lines().map(str::to_string).collect()),
        Some(other) => {
            debug!("Ignoring non-line value in proposal: {}", other);
            None
        }
        None => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}

fn line_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
