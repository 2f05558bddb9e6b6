use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::sales::{Invoice, InvoiceRepository, SalesError};

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: Uuid,
  order_id: Option<Uuid>,
  invoice_number: String,
  subtotal: Decimal,
  discount_amount: Decimal,
  total_amount: Decimal,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl From<InvoiceRow> for Invoice {
  fn from(row: InvoiceRow) -> Self {
    Invoice {
      id: row.id,
      order_id: row.order_id,
      invoice_number: row.invoice_number,
      subtotal: row.subtotal,
      discount_amount: row.discount_amount,
      total_amount: row.total_amount,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, SalesError> {
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, order_id, invoice_number, subtotal, discount_amount,
                   total_amount, created_at, updated_at
            FROM invoices
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(Into::into))
  }

  async fn find_by_order_id(&self, order_id: Uuid) -> Result<Vec<Invoice>, SalesError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(
      r#"
            SELECT id, order_id, invoice_number, subtotal, discount_amount,
                   total_amount, created_at, updated_at
            FROM invoices
            WHERE order_id = $1
            ORDER BY created_at ASC, invoice_number ASC
            "#,
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
  }
}
