use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::sales::{OrderItem, OrderItemRepository, Quantity, SalesError, UnitPrice};

pub struct PostgresOrderItemRepository {
  pool: PgPool,
}

impl PostgresOrderItemRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
  id: Uuid,
  order_id: Uuid,
  product_id: Option<Uuid>,
  product_name: String,
  product_sku: Option<String>,
  quantity: i32,
  unit_price: Decimal,
  total_price: Decimal,
  size: Option<String>,
  color: Option<String>,
}

impl TryFrom<OrderItemRow> for OrderItem {
  type Error = SalesError;

  fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
    Ok(OrderItem {
      id: row.id,
      order_id: row.order_id,
      product_id: row.product_id,
      product_name: row.product_name,
      product_sku: row.product_sku,
      quantity: Quantity::new(row.quantity)?,
      unit_price: UnitPrice::new(row.unit_price)?,
      total_price: row.total_price,
      size: row.size,
      color: row.color,
    })
  }
}

#[async_trait]
impl OrderItemRepository for PostgresOrderItemRepository {
  async fn find_by_order_id(&self, order_id: Uuid) -> Result<Vec<OrderItem>, SalesError> {
    let rows = sqlx::query_as::<_, OrderItemRow>(
      r#"
            SELECT id, order_id, product_id, product_name, product_sku,
                   quantity, unit_price, total_price, size, color
            FROM order_items
            WHERE order_id = $1
            ORDER BY line_no ASC
            "#,
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::catalog::Product;
  use crate::domain::sales::Order;
  use crate::infrastructure::persistence::postgres::test_support::{
    insert_item, insert_order, insert_product, order_item, setup_test_db,
  };
  use rust_decimal_macros::dec;

  #[tokio::test]
  async fn test_find_by_order_id_keeps_line_order() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresOrderItemRepository::new(pool.clone());

    let product = Product::new("Jamawar Shawl".to_string(), None, dec!(6000), None, 2).unwrap();
    insert_product(&pool, &product).await;
    let order = Order::new("NC-4300".to_string(), "Mahnoor Raza".to_string());
    insert_order(&pool, &order).await;

    let first = order_item(&order, Some(&product), 1, dec!(6000));
    let second = order_item(&order, None, 3, dec!(250.50));
    insert_item(&pool, &first).await;
    insert_item(&pool, &second).await;

    let items = repo.find_by_order_id(order.id).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, first.id);
    assert_eq!(items[0].product_id, Some(product.id));
    assert_eq!(items[1].quantity.value(), 3);
    assert_eq!(items[1].total_price, dec!(751.50));
    assert_eq!(items[1].product_id, None);

    assert!(repo.find_by_order_id(Uuid::new_v4()).await.unwrap().is_empty());
  }
}
