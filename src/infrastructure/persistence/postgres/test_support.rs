//! Shared database fixtures for the repository tests.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::ImageExt;
use testcontainers_modules::postgres::Postgres;
use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::domain::sales::{Invoice, Order, OrderItem, Quantity, UnitPrice};

pub async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
  let container = Postgres::default()
    .with_tag("16-alpine")
    .start()
    .await
    .expect("Failed to start postgres container");

  let host = container.get_host().await.expect("Failed to get host");
  let port = container
    .get_host_port_ipv4(5432)
    .await
    .expect("Failed to get port");
  let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

  let pool = PgPoolOptions::new()
    .max_connections(5)
    .connect(&database_url)
    .await
    .expect("Failed to connect to test database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  (pool, container)
}

pub async fn insert_product(pool: &PgPool, product: &Product) {
  sqlx::query(
    r#"
        INSERT INTO products (id, name, sku, price, discount_price, stock_quantity,
                              is_active, sizes, colors, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
  )
  .bind(product.id)
  .bind(&product.name)
  .bind(&product.sku)
  .bind(product.price)
  .bind(product.discount_price)
  .bind(product.stock_quantity)
  .bind(product.is_active)
  .bind(&product.sizes)
  .bind(&product.colors)
  .bind(product.created_at)
  .bind(product.updated_at)
  .execute(pool)
  .await
  .expect("Failed to insert product");
}

pub async fn insert_order(pool: &PgPool, order: &Order) {
  sqlx::query(
    r#"
        INSERT INTO orders (id, order_number, customer_name, subtotal, discount_amount,
                            total_amount, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
  )
  .bind(order.id)
  .bind(&order.order_number)
  .bind(&order.customer_name)
  .bind(order.subtotal)
  .bind(order.discount_amount)
  .bind(order.total_amount)
  .bind(order.created_at)
  .bind(order.updated_at)
  .execute(pool)
  .await
  .expect("Failed to insert order");
}

pub async fn insert_invoice(pool: &PgPool, invoice: &Invoice) {
  sqlx::query(
    r#"
        INSERT INTO invoices (id, order_id, invoice_number, subtotal, discount_amount,
                              total_amount, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
  )
  .bind(invoice.id)
  .bind(invoice.order_id)
  .bind(&invoice.invoice_number)
  .bind(invoice.subtotal)
  .bind(invoice.discount_amount)
  .bind(invoice.total_amount)
  .bind(invoice.created_at)
  .bind(invoice.updated_at)
  .execute(pool)
  .await
  .expect("Failed to insert invoice");
}

pub async fn insert_item(pool: &PgPool, item: &OrderItem) {
  sqlx::query(
    r#"
        INSERT INTO order_items (id, order_id, product_id, product_name, product_sku,
                                 quantity, unit_price, total_price, size, color)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
  )
  .bind(item.id)
  .bind(item.order_id)
  .bind(item.product_id)
  .bind(&item.product_name)
  .bind(&item.product_sku)
  .bind(item.quantity.value())
  .bind(item.unit_price.value())
  .bind(item.total_price)
  .bind(&item.size)
  .bind(&item.color)
  .execute(pool)
  .await
  .expect("Failed to insert order item");
}

pub fn order_item(
  order: &Order,
  product: Option<&Product>,
  quantity: i32,
  unit_price: Decimal,
) -> OrderItem {
  let quantity = Quantity::new(quantity).unwrap();
  let unit_price = UnitPrice::new(unit_price).unwrap();
  OrderItem {
    id: Uuid::new_v4(),
    order_id: order.id,
    product_id: product.map(|p| p.id),
    product_name: product
      .map(|p| p.name.clone())
      .unwrap_or_else(|| "Custom stitching".to_string()),
    product_sku: product.and_then(|p| p.sku.clone()),
    quantity,
    unit_price,
    total_price: unit_price.times(quantity),
    size: None,
    color: None,
  }
}

pub async fn stock_of(pool: &PgPool, product_id: Uuid) -> i32 {
  sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_one(pool)
    .await
    .expect("Failed to read stock")
}
