use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::sales::{
  EditTarget, ReconciliationOutcome, ReconciliationPlan, ReconciliationStore, SalesError,
  StockLevel, StockPolicy, Totals,
};

/// Applies reconciliation plans inside a single PostgreSQL transaction.
///
/// Item rows are deleted and updated only while their quantity still equals
/// the session baseline. Stock is moved with relative updates so concurrent
/// sessions and storefront checkouts touching the same product serialize on
/// the row lock instead of overwriting each other.
pub struct PostgresReconciliationStore {
  pool: PgPool,
}

impl PostgresReconciliationStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn delete_item(
    tx: &mut Transaction<'_, Postgres>,
    order_id: Uuid,
    item_id: Uuid,
    baseline_quantity: i32,
  ) -> Result<(), SalesError> {
    let result = sqlx::query(
      r#"
            DELETE FROM order_items
            WHERE id = $1 AND order_id = $2 AND quantity = $3
            "#,
    )
    .bind(item_id)
    .bind(order_id)
    .bind(baseline_quantity)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
      return Err(SalesError::StaleLineItem(item_id));
    }
    Ok(())
  }

  async fn adjust_stock(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    deduct: i32,
    policy: StockPolicy,
  ) -> Result<i32, SalesError> {
    let allow_negative = policy == StockPolicy::AllowNegative;

    let stock: Option<i32> = sqlx::query_scalar(
      r#"
            UPDATE products
            SET stock_quantity = stock_quantity - $2, updated_at = NOW()
            WHERE id = $1 AND ($3 OR $2 <= 0 OR stock_quantity >= $2)
            RETURNING stock_quantity
            "#,
    )
    .bind(product_id)
    .bind(deduct)
    .bind(allow_negative)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(stock) = stock {
      return Ok(stock);
    }

    let available: Option<i32> =
      sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await?;

    match available {
      Some(available) => Err(SalesError::InsufficientStock {
        product_id,
        requested: deduct,
        available,
      }),
      None => Err(SalesError::ProductNotFound(product_id)),
    }
  }

  async fn write_totals(
    tx: &mut Transaction<'_, Postgres>,
    target: EditTarget,
    totals: &Totals,
  ) -> Result<(), SalesError> {
    match target {
      EditTarget::Order { order_id } => {
        let result = sqlx::query(
          r#"
                UPDATE orders
                SET subtotal = $2, discount_amount = $3, total_amount = $4, updated_at = NOW()
                WHERE id = $1
                "#,
        )
        .bind(order_id)
        .bind(totals.subtotal)
        .bind(totals.discount_total)
        .bind(totals.total)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
          return Err(SalesError::OrderNotFound(order_id));
        }

        let propagated = sqlx::query(
          r#"
                UPDATE invoices
                SET subtotal = $2, discount_amount = $3, total_amount = $4, updated_at = NOW()
                WHERE order_id = $1
                "#,
        )
        .bind(order_id)
        .bind(totals.subtotal)
        .bind(totals.discount_total)
        .bind(totals.total)
        .execute(&mut **tx)
        .await?;

        tracing::debug!(
          %order_id,
          invoices = propagated.rows_affected(),
          "Propagated order totals to linked invoices"
        );
      }
      EditTarget::Invoice { invoice_id, .. } => {
        let result = sqlx::query(
          r#"
                UPDATE invoices
                SET subtotal = $2, discount_amount = $3, total_amount = $4, updated_at = NOW()
                WHERE id = $1
                "#,
        )
        .bind(invoice_id)
        .bind(totals.subtotal)
        .bind(totals.discount_total)
        .bind(totals.total)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
          return Err(SalesError::InvoiceNotFound(invoice_id));
        }
      }
    }
    Ok(())
  }
}

#[async_trait]
impl ReconciliationStore for PostgresReconciliationStore {
  async fn apply(
    &self,
    plan: &ReconciliationPlan,
    policy: StockPolicy,
  ) -> Result<ReconciliationOutcome, SalesError> {
    // Dropping the transaction on any early return rolls it back.
    let mut tx = self.pool.begin().await?;

    for removal in &plan.removals {
      Self::delete_item(
        &mut tx,
        plan.order_id,
        removal.item_id,
        removal.baseline_quantity.value(),
      )
      .await?;
    }

    for item in &plan.additions {
      sqlx::query(
        r#"
            INSERT INTO order_items (id, order_id, product_id, product_name, product_sku,
                                     quantity, unit_price, total_price, size, color)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
      )
      .bind(item.id)
      .bind(plan.order_id)
      .bind(item.product_id)
      .bind(&item.product_name)
      .bind(&item.product_sku)
      .bind(item.quantity.value())
      .bind(item.unit_price.value())
      .bind(item.total_price)
      .bind(&item.size)
      .bind(&item.color)
      .execute(&mut *tx)
      .await?;
    }

    for change in &plan.changes {
      let result = sqlx::query(
        r#"
            UPDATE order_items
            SET quantity = $4, unit_price = $5, total_price = $6
            WHERE id = $1 AND order_id = $2 AND quantity = $3
            "#,
      )
      .bind(change.item_id)
      .bind(plan.order_id)
      .bind(change.baseline_quantity.value())
      .bind(change.quantity.value())
      .bind(change.unit_price.value())
      .bind(change.total_price)
      .execute(&mut *tx)
      .await?;

      if result.rows_affected() == 0 {
        return Err(SalesError::StaleLineItem(change.item_id));
      }
    }

    // One guarded update per product, on its net movement.
    let mut stock_levels = Vec::new();
    for adjustment in plan.stock_adjustments() {
      let stock =
        Self::adjust_stock(&mut tx, adjustment.product_id, adjustment.deduct, policy).await?;
      stock_levels.push(StockLevel {
        product_id: adjustment.product_id,
        stock_quantity: stock,
      });
    }

    Self::write_totals(&mut tx, plan.target, &plan.totals).await?;

    tx.commit().await?;

    Ok(ReconciliationOutcome {
      totals: plan.totals,
      stock_levels,
    })
  }
}
