use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Ingredient;
use crate::validation::ValidationErrors;

/// Minimum number of characters in a taco name.
pub const MIN_TACO_NAME_LEN: usize = 5;

/// A positional reference from a [`Taco`] to an [`Ingredient`] by id.
///
/// The position is the index in [`Taco::ingredients`]; it is written to the
/// `Ingredient_Ref.position` column when the order is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRef {
    pub ingredient_id: String,
}

impl IngredientRef {
    pub fn new(ingredient_id: impl Into<String>) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
        }
    }
}

impl From<&Ingredient> for IngredientRef {
    fn from(ingredient: &Ingredient) -> Self {
        Self::new(ingredient.id.clone())
    }
}

/// A named bundle of ingredient references.
///
/// `id` stays `None` until the owning order is saved. `created_at` is set
/// when the taco is built and stamped again at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taco {
    pub id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub ingredients: Vec<IngredientRef>,
}

impl Taco {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            created_at: Utc::now(),
            name: name.into(),
            ingredients: Vec::new(),
        }
    }

    pub fn add_ingredient(&mut self, ingredient: &Ingredient) {
        self.ingredients.push(IngredientRef::from(ingredient));
    }

    /// Checks the name length and that at least one ingredient was chosen.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.name.chars().count() >= MIN_TACO_NAME_LEN,
            "name",
            "Name must be at least 5 characters long",
        );
        errors.check(
            !self.ingredients.is_empty(),
            "ingredients",
            "You must choose at least 1 ingredient",
        );
        errors.into_result()
    }
}

/// A taco as submitted from the design form: ingredient ids are still raw
/// tokens that have to be resolved against the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacoDesign {
    pub name: String,
    pub ingredients: Vec<String>,
}
