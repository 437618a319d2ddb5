//! Turns raw model output into recipe candidates.
//!
//! Models routinely wrap JSON in markdown fences even when told not to, so the
//! text is unwrapped before parsing. Parsing itself is strict: anything that is
//! not valid JSON after unwrapping is rejected, and a batch is only accepted when
//! every element carries the required fields.

use serde_json::{Map, Value};

use crate::models::{Difficulty, Ingredient, RecipeCandidate};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Column widths of `recipes.title` and `recipes.cuisine_type`
const MAX_TITLE_CHARS: usize = 255;
const MAX_CUISINE_CHARS: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected a JSON array or object, got {0}")]
    UnexpectedShape(&'static str),

    #[error("Recipe {index} is missing a non-empty `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("Recipe {index} has an invalid `{field}`")]
    InvalidField { index: usize, field: &'static str },
}

/// Parses a raw completion into candidates, all or nothing
pub fn normalize(raw: &str) -> Result<Vec<RecipeCandidate>, SchemaError> {
    let cleaned = strip_fences(raw);
    let parsed: Value = serde_json::from_str(cleaned)?;

    let elements = match parsed {
        Value::Array(elements) => elements,
        object @ Value::Object(_) => vec![object],
        other => return Err(SchemaError::UnexpectedShape(kind(&other))),
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| candidate_from_value(index, element))
        .collect()
}

/// Removes markdown code fences around a payload
pub fn strip_fences(raw: &str) -> &str {
    let text = raw.trim();

    let text = if starts_with_json_fence(text) {
        strip_closing_fence(&text[JSON_FENCE.len()..])
    } else if let Some(rest) = text.strip_prefix(FENCE) {
        strip_closing_fence(rest)
    } else {
        text
    };

    text.trim_matches('`').trim()
}

fn starts_with_json_fence(text: &str) -> bool {
    text.get(..JSON_FENCE.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(JSON_FENCE))
}

fn strip_closing_fence(text: &str) -> &str {
    let text = text.trim();
    text.strip_suffix(FENCE).unwrap_or(text).trim()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn candidate_from_value(index: usize, value: Value) -> Result<RecipeCandidate, SchemaError> {
    let Value::Object(object) = value else {
        return Err(SchemaError::InvalidField {
            index,
            field: "recipe",
        });
    };

    let title = non_empty_string(object.get("title"))
        .map(|title| capped(title, MAX_TITLE_CHARS))
        .ok_or(SchemaError::MissingField {
            index,
            field: "title",
        })?;
    let instructions = instructions(index, &object)?;
    let ingredients = ingredients(index, &object)?;

    Ok(RecipeCandidate {
        title,
        description: non_empty_string(object.get("description")).unwrap_or_default(),
        ingredients,
        instructions,
        prep_time: minutes(object.get("prep_time")),
        cook_time: minutes(object.get("cook_time")),
        servings: minutes(object.get("servings")).max(1),
        difficulty: object
            .get("difficulty")
            .and_then(Value::as_str)
            .and_then(Difficulty::parse)
            .unwrap_or_default(),
        cuisine_type: non_empty_string(object.get("cuisine_type"))
            .map(|cuisine| capped(cuisine, MAX_CUISINE_CHARS)),
    })
}

fn instructions(index: usize, object: &Map<String, Value>) -> Result<Vec<String>, SchemaError> {
    let steps = object
        .get("instructions")
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingField {
            index,
            field: "instructions",
        })?;

    let mut instructions = Vec::with_capacity(steps.len());
    for step in steps {
        let Value::String(text) = step else {
            return Err(SchemaError::InvalidField {
                index,
                field: "instructions",
            });
        };
        let text = text.trim();
        if !text.is_empty() {
            instructions.push(text.to_string());
        }
    }

    if instructions.is_empty() {
        return Err(SchemaError::MissingField {
            index,
            field: "instructions",
        });
    }

    Ok(instructions)
}

fn ingredients(index: usize, object: &Map<String, Value>) -> Result<Vec<Ingredient>, SchemaError> {
    let entries = object
        .get("ingredients")
        .and_then(Value::as_array)
        .filter(|entries| !entries.is_empty())
        .ok_or(SchemaError::MissingField {
            index,
            field: "ingredients",
        })?;

    entries
        .iter()
        .map(|entry| ingredient(entry).ok_or(SchemaError::InvalidField {
            index,
            field: "ingredients",
        }))
        .collect()
}

/// Accepts `{name, amount, unit}` objects as well as bare ingredient strings
fn ingredient(entry: &Value) -> Option<Ingredient> {
    match entry {
        Value::String(_) => Some(Ingredient {
            name: non_empty_string(Some(entry))?,
            amount: String::new(),
            unit: None,
        }),
        Value::Object(fields) => Some(Ingredient {
            name: non_empty_string(fields.get("name"))?,
            amount: match fields.get("amount") {
                Some(Value::Number(n)) => n.to_string(),
                other => non_empty_string(other).unwrap_or_default(),
            },
            unit: non_empty_string(fields.get("unit")),
        }),
        _ => None,
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn capped(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].trim_end().to_string(),
        None => text,
    }
}

/// Whole non-negative number from a JSON number or a string like "15 minutes"
fn minutes(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|v| v.min(u64::from(u32::MAX)) as u32)
            .or_else(|| {
                n.as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .map(|v| v.round().min(f64::from(u32::MAX)) as u32)
            })
            .unwrap_or(0),
        Some(Value::String(s)) => s
            .trim()
            .chars()
            .map_while(|c| c.to_digit(10))
            .fold(0u32, |total, digit| {
                total.saturating_mul(10).saturating_add(digit)
            }),
        _ => 0,
    }
}
