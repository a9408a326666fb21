use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use tracing::{debug, instrument};

use crate::data::RepositoryError;
use crate::model::Ingredient;

/// Read access to the ingredient catalog, plus the upsert used for seeding.
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Every ingredient, in storage order.
    async fn find_all(&self) -> Result<Vec<Ingredient>, RepositoryError>;

    /// The ingredient with `id`, or `None`. An unknown id is not an error.
    async fn find_by_id(&self, id: &str) -> Result<Option<Ingredient>, RepositoryError>;

    /// Inserts the ingredient or overwrites the row with the same id.
    async fn save(&self, ingredient: Ingredient) -> Result<Ingredient, RepositoryError>;
}

#[derive(FromRow)]
struct IngredientRow {
    id: String,
    name: String,
    kind: String,
}

impl TryFrom<IngredientRow> for Ingredient {
    type Error = RepositoryError;

    fn try_from(row: IngredientRow) -> Result<Self, Self::Error> {
        Ok(Ingredient::new(row.id, row.name, row.kind.parse()?))
    }
}

/// [`IngredientRepository`] over the `Ingredient` table.
#[derive(Clone)]
pub struct SqliteIngredientRepository {
    pool: SqlitePool,
}

impl SqliteIngredientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IngredientRepository for SqliteIngredientRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Ingredient>, RepositoryError> {
        let rows: Vec<IngredientRow> =
            sqlx::query_as("SELECT id, name, type AS kind FROM Ingredient ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;
        debug!(count = rows.len(), "Loaded ingredients");
        rows.into_iter().map(Ingredient::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Ingredient>, RepositoryError> {
        let row: Option<IngredientRow> =
            sqlx::query_as("SELECT id, name, type AS kind FROM Ingredient WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        debug!(found = row.is_some(), "Lookup");
        row.map(Ingredient::try_from).transpose()
    }

    #[instrument(skip(self), fields(id = %ingredient.id))]
    async fn save(&self, ingredient: Ingredient) -> Result<Ingredient, RepositoryError> {
        sqlx::query(
            "INSERT INTO Ingredient (id, name, type) VALUES (?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET name = excluded.name, type = excluded.type",
        )
        .bind(&ingredient.id)
        .bind(&ingredient.name)
        .bind(ingredient.kind.as_str())
        .execute(&self.pool)
        .await?;
        Ok(ingredient)
    }
}
