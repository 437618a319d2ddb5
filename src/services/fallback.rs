//! Deterministic recipes built from the supplied ingredients.
//!
//! Used whenever the generation backend is unavailable or returns something
//! unusable. The output is a degraded but cookable substitute.

use crate::models::{Difficulty, GenerationRequest, Ingredient, RecipeCandidate};

const STIR_FRY_INGREDIENTS: usize = 4;
const SOUP_INGREDIENTS: usize = 3;

const STIR_FRY_STEPS: [&str; 5] = [
    "Heat oil in a large pan over medium-high heat",
    "Add your main ingredients and cook for 5-7 minutes",
    "Season with salt and any available spices",
    "Stir-fry until ingredients are tender and well combined",
    "Serve hot and enjoy!",
];

const SOUP_STEPS: [&str; 5] = [
    "Bring water or broth to a boil in a large pot",
    "Add your ingredients starting with the longest-cooking items",
    "Simmer for 20-25 minutes until everything is tender",
    "Season to taste with salt, pepper, or available herbs",
    "Serve hot with crusty bread if available",
];

/// Builds one stir-fry, plus a soup when more than one ingredient was given
pub fn generate(request: &GenerationRequest) -> Vec<RecipeCandidate> {
    let ingredients = request.cleaned_ingredients();

    let mut candidates = vec![stir_fry(&ingredients)];
    if ingredients.len() > 1 {
        candidates.push(soup(&ingredients));
    }

    candidates
}

fn stir_fry(ingredients: &[String]) -> RecipeCandidate {
    let main = ingredients.first().map_or("Ingredient", String::as_str);

    let mut lines = placeholder_lines(ingredients, STIR_FRY_INGREDIENTS);
    lines.push(Ingredient::new("oil", "2", Some("tbsp")));
    lines.push(Ingredient::new("salt", "1", Some("tsp")));

    RecipeCandidate {
        title: format!("Quick {} Stir-Fry", main),
        description: "A simple and delicious stir-fry that brings out the best flavors of \
                      your available ingredients."
            .to_string(),
        ingredients: lines,
        instructions: steps(&STIR_FRY_STEPS),
        prep_time: 10,
        cook_time: 15,
        servings: 2,
        difficulty: Difficulty::Easy,
        cuisine_type: Some("fusion".to_string()),
    }
}

fn soup(ingredients: &[String]) -> RecipeCandidate {
    let first = ingredients.first().map_or("Mixed", String::as_str);
    let second = ingredients.get(1).map_or("Vegetable", String::as_str);

    let mut lines = placeholder_lines(ingredients, SOUP_INGREDIENTS);
    lines.push(Ingredient::new("water or broth", "4", Some("cups")));
    lines.push(Ingredient::new("seasoning", "to taste", None));

    RecipeCandidate {
        title: format!("{} and {} Soup", first, second),
        description: "A comforting, hearty soup that makes the most of your pantry ingredients."
            .to_string(),
        ingredients: lines,
        instructions: steps(&SOUP_STEPS),
        prep_time: 15,
        cook_time: 25,
        servings: 4,
        difficulty: Difficulty::Easy,
        cuisine_type: Some("comfort food".to_string()),
    }
}

fn placeholder_lines(ingredients: &[String], take: usize) -> Vec<Ingredient> {
    ingredients
        .iter()
        .take(take)
        .map(|name| Ingredient::new(name.as_str(), "1", Some("cup")))
        .collect()
}

fn steps(steps: &[&str]) -> Vec<String> {
    steps.iter().map(|step| step.to_string()).collect()
}
