use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// An ingredient available for taco assembly.
///
/// Ingredients are seeded once at startup and are read-only afterwards. Tacos do
/// not copy them; they hold an [`IngredientRef`](crate::model::IngredientRef)
/// carrying only the [`id`](Ingredient::id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: IngredientType,
}

impl Ingredient {
    /// Creates a new Ingredient.
    ///
    /// # Arguments
    /// * `id` - Stable business key (e.g. `"FLTO"`)
    /// * `name` - Display name
    /// * `kind` - Category used to group the design form
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: IngredientType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Category of an [`Ingredient`].
///
/// Stored in the database as the upper-case variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IngredientType {
    Wrap,
    Protein,
    Veggies,
    Cheese,
    Sauce,
}

impl IngredientType {
    /// Every category, in the order the design form lists them.
    pub const ALL: [IngredientType; 5] = [
        IngredientType::Wrap,
        IngredientType::Protein,
        IngredientType::Veggies,
        IngredientType::Cheese,
        IngredientType::Sauce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientType::Wrap => "WRAP",
            IngredientType::Protein => "PROTEIN",
            IngredientType::Veggies => "VEGGIES",
            IngredientType::Cheese => "CHEESE",
            IngredientType::Sauce => "SAUCE",
        }
    }
}

impl Display for IngredientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored category name matches no variant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown ingredient type: {0}")]
pub struct UnknownIngredientType(pub String);

impl FromStr for IngredientType {
    type Err = UnknownIngredientType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IngredientType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownIngredientType(s.to_string()))
    }
}

/// Ingredients partitioned by category for the design form.
///
/// One field per [`IngredientType`]; each list keeps the order in which the
/// repository returned the ingredients.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngredientGroups {
    pub wrap: Vec<Ingredient>,
    pub protein: Vec<Ingredient>,
    pub veggies: Vec<Ingredient>,
    pub cheese: Vec<Ingredient>,
    pub sauce: Vec<Ingredient>,
}

impl IngredientGroups {
    pub fn group(ingredients: impl IntoIterator<Item = Ingredient>) -> Self {
        let mut groups = Self::default();
        for ingredient in ingredients {
            groups.bucket_mut(ingredient.kind).push(ingredient);
        }
        groups
    }

    pub fn get(&self, kind: IngredientType) -> &[Ingredient] {
        match kind {
            IngredientType::Wrap => &self.wrap,
            IngredientType::Protein => &self.protein,
            IngredientType::Veggies => &self.veggies,
            IngredientType::Cheese => &self.cheese,
            IngredientType::Sauce => &self.sauce,
        }
    }

    fn bucket_mut(&mut self, kind: IngredientType) -> &mut Vec<Ingredient> {
        match kind {
            IngredientType::Wrap => &mut self.wrap,
            IngredientType::Protein => &mut self.protein,
            IngredientType::Veggies => &mut self.veggies,
            IngredientType::Cheese => &mut self.cheese,
            IngredientType::Sauce => &mut self.sauce,
        }
    }

    /// Total number of grouped ingredients.
    pub fn len(&self) -> usize {
        IngredientType::ALL.iter().map(|kind| self.get(*kind).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
