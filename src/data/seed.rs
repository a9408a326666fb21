//! The ingredient catalog every fresh database starts with.

use tracing::info;

use crate::data::{IngredientRepository, RepositoryError};
use crate::model::{Ingredient, IngredientType};

pub fn catalog() -> Vec<Ingredient> {
    use IngredientType::*;

    vec![
        Ingredient::new("FLTO", "Flour Tortilla", Wrap),
        Ingredient::new("COTO", "Corn Tortilla", Wrap),
        Ingredient::new("GRBF", "Ground Beef", Protein),
        Ingredient::new("CARN", "Carnitas", Protein),
        Ingredient::new("TMTO", "Diced Tomatoes", Veggies),
        Ingredient::new("LETC", "Lettuce", Veggies),
        Ingredient::new("CHED", "Cheddar", Cheese),
        Ingredient::new("JACK", "Monterrey Jack", Cheese),
        Ingredient::new("SLSA", "Salsa", Sauce),
        Ingredient::new("SRCR", "Sour Cream", Sauce),
    ]
}

/// Upserts the whole [`catalog`]. Safe to run on every startup.
pub async fn seed_ingredients(repo: &dyn IngredientRepository) -> Result<usize, RepositoryError> {
    let ingredients = catalog();
    let count = ingredients.len();
    for ingredient in ingredients {
        repo.save(ingredient).await?;
    }
    info!(count, "Ingredients seeded");
    Ok(count)
}
