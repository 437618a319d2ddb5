use serde::{Deserialize, Serialize};

use super::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiceLevel {
    Mild,
    Medium,
    Hot,
}

impl SpiceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpiceLevel::Mild => "mild",
            SpiceLevel::Medium => "medium",
            SpiceLevel::Hot => "hot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingTime {
    Quick,
    Medium,
    Long,
}

impl CookingTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookingTime::Quick => "quick",
            CookingTime::Medium => "medium",
            CookingTime::Long => "long",
        }
    }
}

/// Optional constraints on what gets generated
///
/// Every field is independent. A missing field means "no constraint", never a
/// default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceBundle {
    #[serde(default)]
    pub dietary_restrictions: Option<Vec<String>>,
    #[serde(default)]
    pub preferred_cuisines: Option<Vec<String>>,
    #[serde(default)]
    pub spice_level: Option<SpiceLevel>,
    #[serde(default)]
    pub cooking_time_preference: Option<CookingTime>,
}

/// Body of `POST /api/recipes/generate`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub preferences: Option<PreferenceBundle>,
    #[serde(default)]
    pub allow_additional_ingredients: bool,
}

impl GenerationRequest {
    pub fn new<I, S>(ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            preferences: None,
            allow_additional_ingredients: false,
        }
    }

    pub fn with_preferences(mut self, preferences: PreferenceBundle) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn allowing_additional_ingredients(mut self, allow: bool) -> Self {
        self.allow_additional_ingredients = allow;
        self
    }

    /// Ingredient names with surrounding whitespace removed and blanks dropped
    pub fn cleaned_ingredients(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Response of `POST /api/recipes/generate`
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub recipes: Vec<Recipe>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
