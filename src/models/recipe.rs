use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How hard a recipe is to cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parses a difficulty label, ignoring case and surrounding whitespace
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A single line of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Free-form quantity, e.g. "2" or "to taste"
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit: unit.map(str::to_string),
        }
    }
}

/// A recipe-shaped record before identity, ownership and timestamp are assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub cuisine_type: Option<String>,
}

/// A generated recipe attributed to an owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    /// Authenticated user id or generated guest id
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    /// Minutes
    pub prep_time: u32,
    /// Minutes
    pub cook_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    /// Stamps a candidate with a fresh id, its owner and the creation time
    pub fn from_candidate(candidate: RecipeCandidate, owner_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: owner_id.to_string(),
            title: candidate.title,
            description: candidate.description,
            ingredients: candidate.ingredients,
            instructions: candidate.instructions,
            prep_time: candidate.prep_time,
            cook_time: candidate.cook_time,
            servings: candidate.servings,
            difficulty: candidate.difficulty,
            cuisine_type: candidate.cuisine_type,
            liked: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> RecipeCandidate {
        RecipeCandidate {
            title: "Omelette".to_string(),
            description: "Fluffy eggs".to_string(),
            ingredients: vec![Ingredient::new("egg", "2", None)],
            instructions: vec!["Whisk".to_string(), "Fry".to_string()],
            prep_time: 5,
            cook_time: 5,
            servings: 1,
            difficulty: Difficulty::Easy,
            cuisine_type: Some("french".to_string()),
        }
    }

    #[test]
    fn test_difficulty_parse_ignores_case() {
        assert_eq!(Difficulty::parse(" HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("impossible"), None);
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, r#""medium""#);
    }

    #[test]
    fn test_ingredient_without_unit_omits_field() {
        let json = serde_json::to_value(Ingredient::new("salt", "to taste", None)).unwrap();
        assert_eq!(json, serde_json::json!({"name": "salt", "amount": "to taste"}));
    }

    #[test]
    fn test_from_candidate_assigns_metadata() {
        let recipe = Recipe::from_candidate(candidate(), "user-1");
        assert_eq!(recipe.user_id, "user-1");
        assert!(!recipe.liked);
        assert_eq!(recipe.title, "Omelette");
        assert_eq!(recipe.instructions.len(), 2);
    }

    #[test]
    fn test_from_candidate_ids_are_unique() {
        let a = Recipe::from_candidate(candidate(), "user-1");
        let b = Recipe::from_candidate(candidate(), "user-1");
        assert_ne!(a.id, b.id);
    }
}
