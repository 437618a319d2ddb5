//! Renders a generation request into the instruction text sent to the model.

use crate::models::{GenerationRequest, PreferenceBundle};

/// Marker the model must attach to ingredients it adds on its own
pub const ADDITIONAL_MARKER: &str = "ADDITIONAL NEEDED";

const SYSTEM_INSTRUCTION: &str = "You are a professional chef and recipe creator. \
Always respond with a valid JSON array of recipe objects. Be precise with measurements \
and realistic with cooking times. Return ONLY the JSON array: no markdown, no code \
fences, no backticks, no additional text.";

const OUTPUT_CONTRACT: &str = r#"Please provide 3-5 complete recipes that can be made with these ingredients.

Format your response as a JSON array with exactly this structure:
[
  {
    "title": "Recipe Name",
    "description": "One or two sentence description",
    "ingredients": [
      {"name": "ingredient name", "amount": "quantity", "unit": "measurement unit"}
    ],
    "instructions": ["Step 1", "Step 2", "Step 3"],
    "prep_time": 10,
    "cook_time": 20,
    "servings": 2,
    "difficulty": "easy|medium|hard",
    "cuisine_type": "cuisine name"
  }
]

prep_time and cook_time are whole minutes. servings is a whole number.

IMPORTANT: Return ONLY the JSON array. Do not add any text before or after it and do not wrap it in a code block or backticks.

Guidelines:
- Be realistic about quantities and measurements
- Give clear, actionable cooking steps
- Do not invent ingredients that were not provided
- Make sure every recipe is actually cookable with the given ingredients"#;

/// Instruction payload for one generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePrompt {
    pub system: String,
    pub user: String,
}

/// Builds the prompt for a request. Pure and deterministic.
pub fn build(request: &GenerationRequest) -> RecipePrompt {
    let ingredients = request.cleaned_ingredients().join(", ");

    let mut user = String::from(
        "Act as a professional chef who only suggests recipes using the ingredients at hand \
         unless given permission to include others.\n\n",
    );
    user.push_str(&format!("Available ingredients: {}\n\n", ingredients));
    user.push_str(&ingredient_policy(request.allow_additional_ingredients));
    user.push('\n');

    let preferences = preference_lines(request.preferences.as_ref());
    if !preferences.is_empty() {
        user.push_str("\nUser preferences:\n");
        for line in preferences {
            user.push_str(&line);
            user.push('\n');
        }
    }

    user.push('\n');
    user.push_str(OUTPUT_CONTRACT);

    RecipePrompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        user,
    }
}

fn ingredient_policy(allow_additional: bool) -> String {
    if allow_additional {
        format!(
            "You may add essential ingredients that are not listed if absolutely necessary, \
             but you must clearly flag each one by appending \"{}\" to its name.",
            ADDITIONAL_MARKER
        )
    } else {
        "You must use ONLY these ingredients. Do not suggest any additional ingredients."
            .to_string()
    }
}

/// One labeled line per constraint that is actually present
fn preference_lines(preferences: Option<&PreferenceBundle>) -> Vec<String> {
    let Some(preferences) = preferences else {
        return Vec::new();
    };

    let mut lines = Vec::new();

    if let Some(restrictions) = non_empty(&preferences.dietary_restrictions) {
        lines.push(format!("- Dietary restrictions: {}", restrictions.join(", ")));
    }
    if let Some(cuisines) = non_empty(&preferences.preferred_cuisines) {
        lines.push(format!("- Preferred cuisines: {}", cuisines.join(", ")));
    }
    if let Some(spice) = preferences.spice_level {
        lines.push(format!("- Spice level: {}", spice.as_str()));
    }
    if let Some(time) = preferences.cooking_time_preference {
        lines.push(format!("- Cooking time preference: {}", time.as_str()));
    }

    lines
}

fn non_empty(values: &Option<Vec<String>>) -> Option<&[String]> {
    values.as_deref().filter(|values| !values.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CookingTime, SpiceLevel};

    #[test]
    fn test_lists_ingredients_comma_joined() {
        let prompt = build(&GenerationRequest::new(["chicken", "rice", "garlic"]));
        assert!(prompt
            .user
            .contains("Available ingredients: chicken, rice, garlic"));
    }

    #[test]
    fn test_strict_policy_when_additional_not_allowed() {
        let prompt = build(&GenerationRequest::new(["egg"]));
        assert!(prompt.user.contains("use ONLY these ingredients"));
        assert!(!prompt.user.contains(ADDITIONAL_MARKER));
    }

    #[test]
    fn test_flagging_policy_when_additional_allowed() {
        let prompt =
            build(&GenerationRequest::new(["egg"]).allowing_additional_ingredients(true));
        assert!(prompt.user.contains(ADDITIONAL_MARKER));
        assert!(!prompt.user.contains("use ONLY these ingredients"));
    }

    #[test]
    fn test_no_preference_section_without_preferences() {
        let prompt = build(&GenerationRequest::new(["egg"]));
        assert!(!prompt.user.contains("User preferences"));
        assert!(!prompt.user.contains("Spice level"));
    }

    #[test]
    fn test_only_present_preferences_are_rendered() {
        let request = GenerationRequest::new(["tofu"]).with_preferences(PreferenceBundle {
            dietary_restrictions: Some(vec!["vegan".to_string(), "gluten-free".to_string()]),
            preferred_cuisines: Some(Vec::new()),
            spice_level: Some(SpiceLevel::Hot),
            cooking_time_preference: None,
        });
        let prompt = build(&request);

        assert!(prompt
            .user
            .contains("- Dietary restrictions: vegan, gluten-free"));
        assert!(prompt.user.contains("- Spice level: hot"));
        assert!(!prompt.user.contains("Preferred cuisines"));
        assert!(!prompt.user.contains("Cooking time preference"));
    }

    #[test]
    fn test_cooking_time_line() {
        let request = GenerationRequest::new(["tofu"]).with_preferences(PreferenceBundle {
            cooking_time_preference: Some(CookingTime::Quick),
            ..Default::default()
        });
        assert!(build(&request)
            .user
            .contains("- Cooking time preference: quick"));
    }

    #[test]
    fn test_output_contract_names_every_field() {
        let prompt = build(&GenerationRequest::new(["egg"]));
        for field in [
            "\"title\"",
            "\"description\"",
            "\"ingredients\"",
            "\"name\"",
            "\"amount\"",
            "\"unit\"",
            "\"instructions\"",
            "\"prep_time\"",
            "\"cook_time\"",
            "\"servings\"",
            "\"difficulty\"",
            "\"cuisine_type\"",
        ] {
            assert!(prompt.user.contains(field), "missing {}", field);
        }
        assert!(prompt.user.contains("Return ONLY the JSON array"));
        assert!(prompt.system.contains("no code fences"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let request = GenerationRequest::new(["egg", "milk"]).with_preferences(PreferenceBundle {
            preferred_cuisines: Some(vec!["french".to_string()]),
            ..Default::default()
        });
        assert_eq!(build(&request), build(&request));
    }
}
