//! # Order Persistence
//!
//! A placed order is written as three levels of rows:
//!
//! 1. one `Taco_Order` row, whose generated id becomes `order.id`;
//! 2. one `Taco` row per taco with `order_id` and `order_position`;
//! 3. one `Ingredient_Ref` row per ingredient with `taco_id` and `position`.
//!
//! Ids flow top-down: each level needs the key generated by the level above.
//! [`insert_order_graph`] performs the inserts on a connection it is handed
//! and returns every assigned key as a [`PlacedOrder`].
//! [`SqliteOrderRepository::save`] runs it inside one transaction and only
//! writes the keys back into the caller's [`TacoOrder`] after commit, so a
//! failure at any level leaves neither rows nor half-assigned ids behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::FromRow;
use tracing::{debug, info, instrument, warn};

use crate::data::RepositoryError;
use crate::model::{IngredientRef, Taco, TacoOrder};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists `order` with its tacos and ingredient references.
    ///
    /// On success `order.id`, `order.placed_at` and every `taco.id` /
    /// `taco.created_at` are set. On failure `order` is left untouched.
    async fn save(&self, order: &mut TacoOrder) -> Result<(), RepositoryError>;

    /// Loads a placed order, tacos and ingredients in their original order.
    async fn find_by_id(&self, id: i64) -> Result<Option<TacoOrder>, RepositoryError>;
}

/// Keys and timestamps assigned by one [`insert_order_graph`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    pub id: i64,
    pub placed_at: DateTime<Utc>,
    /// One entry per taco, in order position.
    pub tacos: Vec<PlacedTaco>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTaco {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

impl PlacedOrder {
    /// Writes the assigned keys and timestamps back into `order`.
    pub fn apply_to(&self, order: &mut TacoOrder) {
        order.id = Some(self.id);
        order.placed_at = Some(self.placed_at);
        for (taco, placed) in order.tacos.iter_mut().zip(&self.tacos) {
            taco.id = Some(placed.id);
            taco.created_at = placed.created_at;
        }
    }
}

/// Inserts `order` and everything it owns on `conn`, stamping `now`.
///
/// Callers own the transaction boundary; this function never commits.
pub async fn insert_order_graph(
    conn: &mut SqliteConnection,
    order: &TacoOrder,
    now: DateTime<Utc>,
) -> Result<PlacedOrder, sqlx::Error> {
    let order_id = sqlx::query(
        "INSERT INTO Taco_Order \
         (delivery_name, delivery_street, delivery_city, delivery_state, delivery_zip, \
          cc_number, cc_expiration, cc_cvv, placed_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.delivery_name)
    .bind(&order.delivery_street)
    .bind(&order.delivery_city)
    .bind(&order.delivery_state)
    .bind(&order.delivery_zip)
    .bind(&order.cc_number)
    .bind(&order.cc_expiration)
    .bind(&order.cc_cvv)
    .bind(now)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    debug!(order_id, tacos = order.tacos.len(), "Inserted order row");

    let mut tacos = Vec::with_capacity(order.tacos.len());
    for (position, taco) in order.tacos.iter().enumerate() {
        let taco_id = insert_taco(conn, order_id, position as i64, taco, now).await?;
        tacos.push(PlacedTaco {
            id: taco_id,
            created_at: now,
        });
    }

    Ok(PlacedOrder {
        id: order_id,
        placed_at: now,
        tacos,
    })
}

async fn insert_taco(
    conn: &mut SqliteConnection,
    order_id: i64,
    order_position: i64,
    taco: &Taco,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let taco_id = sqlx::query(
        "INSERT INTO Taco (name, created_at, order_id, order_position) VALUES (?, ?, ?, ?)",
    )
    .bind(&taco.name)
    .bind(created_at)
    .bind(order_id)
    .bind(order_position)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    insert_ingredient_refs(conn, taco_id, &taco.ingredients).await?;
    debug!(taco_id, order_position, "Inserted taco");
    Ok(taco_id)
}

async fn insert_ingredient_refs(
    conn: &mut SqliteConnection,
    taco_id: i64,
    refs: &[IngredientRef],
) -> Result<(), sqlx::Error> {
    for (position, ingredient_ref) in refs.iter().enumerate() {
        sqlx::query("INSERT INTO Ingredient_Ref (ingredient_id, taco_id, position) VALUES (?, ?, ?)")
            .bind(&ingredient_ref.ingredient_id)
            .bind(taco_id)
            .bind(position as i64)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

#[derive(FromRow)]
struct OrderRow {
    id: i64,
    delivery_name: String,
    delivery_street: String,
    delivery_city: String,
    delivery_state: String,
    delivery_zip: String,
    cc_number: String,
    cc_expiration: String,
    cc_cvv: String,
    placed_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct TacoRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

/// [`OrderRepository`] over the `Taco_Order`, `Taco` and `Ingredient_Ref` tables.
#[derive(Clone)]
pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    #[instrument(skip(self, order), fields(tacos = order.tacos.len()))]
    async fn save(&self, order: &mut TacoOrder) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Dropping `tx` on the error path rolls back every level.
        let placed = match insert_order_graph(&mut *tx, order, Utc::now()).await {
            Ok(placed) => placed,
            Err(e) => {
                warn!(error = %e, "Order insert failed, rolling back");
                return Err(e.into());
            }
        };
        tx.commit().await?;

        placed.apply_to(order);
        info!(order_id = placed.id, tacos = placed.tacos.len(), "Order placed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<TacoOrder>, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT id, delivery_name, delivery_street, delivery_city, delivery_state, \
             delivery_zip, cc_number, cc_expiration, cc_cvv, placed_at \
             FROM Taco_Order WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!("Order not found");
            return Ok(None);
        };

        let taco_rows: Vec<TacoRow> = sqlx::query_as(
            "SELECT id, name, created_at FROM Taco WHERE order_id = ? ORDER BY order_position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut tacos = Vec::with_capacity(taco_rows.len());
        for taco_row in taco_rows {
            let ingredient_ids: Vec<String> = sqlx::query_scalar(
                "SELECT ingredient_id FROM Ingredient_Ref WHERE taco_id = ? ORDER BY position",
            )
            .bind(taco_row.id)
            .fetch_all(&self.pool)
            .await?;

            tacos.push(Taco {
                id: Some(taco_row.id),
                created_at: taco_row.created_at,
                name: taco_row.name,
                ingredients: ingredient_ids.into_iter().map(IngredientRef::new).collect(),
            });
        }

        Ok(Some(TacoOrder {
            id: Some(row.id),
            placed_at: Some(row.placed_at),
            delivery_name: row.delivery_name,
            delivery_street: row.delivery_street,
            delivery_city: row.delivery_city,
            delivery_state: row.delivery_state,
            delivery_zip: row.delivery_zip,
            cc_number: row.cc_number,
            cc_expiration: row.cc_expiration,
            cc_cvv: row.cc_cvv,
            tacos,
        }))
    }
}
