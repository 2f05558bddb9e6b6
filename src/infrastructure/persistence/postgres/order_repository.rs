use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::sales::{Order, OrderRepository, SalesError};

pub struct PostgresOrderRepository {
  pool: PgPool,
}

impl PostgresOrderRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, FromRow)]
struct OrderRow {
  id: Uuid,
  order_number: String,
  customer_name: String,
  subtotal: Decimal,
  discount_amount: Decimal,
  total_amount: Decimal,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
  fn from(row: OrderRow) -> Self {
    Order {
      id: row.id,
      order_number: row.order_number,
      customer_name: row.customer_name,
      subtotal: row.subtotal,
      discount_amount: row.discount_amount,
      total_amount: row.total_amount,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, SalesError> {
    let row = sqlx::query_as::<_, OrderRow>(
      r#"
            SELECT id, order_number, customer_name, subtotal, discount_amount,
                   total_amount, created_at, updated_at
            FROM orders
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }
}
