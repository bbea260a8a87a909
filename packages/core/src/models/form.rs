//! Event Form Field Parsing
//!
//! Posted event fields are interpreted by a single generic parser driven by a
//! declarative spec table. The table doubles as the allow-list: posted keys
//! with no spec entry are dropped silently.
//!
//! List-shaped fields (`agenda`, `tags`) accept either a JSON-encoded array
//! of strings or a comma-separated string. Any other encoding normalizes to
//! an empty sequence rather than a hard failure.

use std::collections::HashMap;

/// How a posted field value is coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed text
    Text,
    /// Ordered sequence of text items (JSON array or comma-separated)
    List,
}

/// One entry of the allow-list table
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Allow-listed event fields, in wire order
pub const EVENT_FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec { name: "title", kind: FieldKind::Text },
    FieldSpec { name: "description", kind: FieldKind::Text },
    FieldSpec { name: "overview", kind: FieldKind::Text },
    FieldSpec { name: "image", kind: FieldKind::Text },
    FieldSpec { name: "venue", kind: FieldKind::Text },
    FieldSpec { name: "location", kind: FieldKind::Text },
    FieldSpec { name: "date", kind: FieldKind::Text },
    FieldSpec { name: "time", kind: FieldKind::Text },
    FieldSpec { name: "mode", kind: FieldKind::Text },
    FieldSpec { name: "audience", kind: FieldKind::Text },
    FieldSpec { name: "agenda", kind: FieldKind::List },
    FieldSpec { name: "organizer", kind: FieldKind::Text },
    FieldSpec { name: "tags", kind: FieldKind::List },
];

/// Parsed, allow-listed event fields
///
/// Absent fields keep their defaults (empty string / empty vec). Required-ness
/// of `title` and `description` is checked by the service layer, not here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

impl EventFields {
    fn text_slot(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "title" => Some(&mut self.title),
            "description" => Some(&mut self.description),
            "overview" => Some(&mut self.overview),
            "image" => Some(&mut self.image),
            "venue" => Some(&mut self.venue),
            "location" => Some(&mut self.location),
            "date" => Some(&mut self.date),
            "time" => Some(&mut self.time),
            "mode" => Some(&mut self.mode),
            "audience" => Some(&mut self.audience),
            "organizer" => Some(&mut self.organizer),
            _ => None,
        }
    }

    fn list_slot(&mut self, name: &str) -> Option<&mut Vec<String>> {
        match name {
            "agenda" => Some(&mut self.agenda),
            "tags" => Some(&mut self.tags),
            _ => None,
        }
    }
}

/// Interpret the spec table over a posted field map
///
/// Unrecognized keys in `form` are ignored; fields absent from `form` keep
/// their defaults.
pub fn parse_event_fields(form: &HashMap<String, String>) -> EventFields {
    let mut fields = EventFields::default();

    for spec in EVENT_FIELD_SPECS {
        let Some(raw) = form.get(spec.name) else {
            continue;
        };

        match spec.kind {
            FieldKind::Text => {
                if let Some(slot) = fields.text_slot(spec.name) {
                    *slot = raw.trim().to_string();
                }
            }
            FieldKind::List => {
                if let Some(slot) = fields.list_slot(spec.name) {
                    *slot = parse_list_field(raw);
                }
            }
        }
    }

    fields
}

/// Normalize a list-shaped field value
///
/// - JSON array: string items kept in order, non-string items dropped
/// - other valid JSON (number, object, `null`, ...): empty sequence
/// - anything else: comma-separated, items trimmed, empties dropped
pub fn parse_list_field(value: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(value) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Ok(_) => Vec::new(),
        Err(_) => value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
    }
}
