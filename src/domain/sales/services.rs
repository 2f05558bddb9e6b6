use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogReader, Product, ProductFilter};

use super::entities::{Invoice, Order, OrderItem};
use super::errors::SalesError;
use super::ports::{InvoiceRepository, OrderItemRepository, OrderRepository, ReconciliationStore};
use super::reconciliation::{ReconciliationOutcome, ReconciliationPlan, StockPolicy};
use super::session::EditSession;

/// Dependencies for creating an EditingService
pub struct EditingServiceDependencies {
  pub catalog: Arc<dyn CatalogReader>,
  pub order_repo: Arc<dyn OrderRepository>,
  pub invoice_repo: Arc<dyn InvoiceRepository>,
  pub order_item_repo: Arc<dyn OrderItemRepository>,
  pub reconciliation_store: Arc<dyn ReconciliationStore>,
  pub stock_policy: StockPolicy,
}

pub struct EditingService {
  catalog: Arc<dyn CatalogReader>,
  order_repo: Arc<dyn OrderRepository>,
  invoice_repo: Arc<dyn InvoiceRepository>,
  order_item_repo: Arc<dyn OrderItemRepository>,
  reconciliation_store: Arc<dyn ReconciliationStore>,
  stock_policy: StockPolicy,
}

impl EditingService {
  pub fn new(deps: EditingServiceDependencies) -> Self {
    Self {
      catalog: deps.catalog,
      order_repo: deps.order_repo,
      invoice_repo: deps.invoice_repo,
      order_item_repo: deps.order_item_repo,
      reconciliation_store: deps.reconciliation_store,
      stock_policy: deps.stock_policy,
    }
  }

  // Session lifecycle
  pub async fn open_order_session(&self, order_id: Uuid) -> Result<EditSession, SalesError> {
    let order = self.get_order(order_id).await?;
    let items = self.load_items(order_id).await?;

    tracing::info!(%order_id, items = items.len(), "Opened order edit session");
    Ok(EditSession::for_order(&order, &items))
  }

  pub async fn open_invoice_session(&self, invoice_id: Uuid) -> Result<EditSession, SalesError> {
    let invoice = self.get_invoice(invoice_id).await?;

    let items = match invoice.order_id {
      Some(order_id) => self.load_items(order_id).await?,
      None => {
        tracing::info!(%invoice_id, "Invoice has no linked order, opening read-only session");
        Vec::new()
      }
    };

    tracing::info!(%invoice_id, items = items.len(), "Opened invoice edit session");
    Ok(EditSession::for_invoice(&invoice, &items))
  }

  /// Writes a finished session back. Either everything in the session is
  /// applied or nothing is.
  pub async fn save(&self, session: &EditSession) -> Result<ReconciliationOutcome, SalesError> {
    let plan = ReconciliationPlan::from_session(session)?;

    tracing::info!(
      session_id = %session.id(),
      order_id = %plan.order_id,
      removals = plan.removals.len(),
      additions = plan.additions.len(),
      changes = plan.changes.len(),
      "Committing edit session"
    );

    let outcome = self
      .reconciliation_store
      .apply(&plan, self.stock_policy)
      .await
      .inspect_err(|e| {
        tracing::error!(session_id = %session.id(), error = %e, "Edit session commit failed");
      })?;

    for level in outcome.stock_levels.iter().filter(|l| l.stock_quantity < 0) {
      tracing::warn!(
        product_id = %level.product_id,
        stock = level.stock_quantity,
        "Product stock is negative after commit"
      );
    }

    Ok(outcome)
  }

  // Lookups
  pub async fn find_product(&self, product_id: Uuid) -> Result<Product, SalesError> {
    self
      .catalog
      .find_by_id(product_id)
      .await?
      .ok_or(SalesError::ProductNotFound(product_id))
  }

  pub async fn search_products(&self, filter: ProductFilter) -> Result<Vec<Product>, SalesError> {
    Ok(self.catalog.search(filter).await?)
  }

  pub async fn get_order(&self, order_id: Uuid) -> Result<Order, SalesError> {
    self
      .order_repo
      .find_by_id(order_id)
      .await?
      .ok_or(SalesError::OrderNotFound(order_id))
  }

  pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Invoice, SalesError> {
    self
      .invoice_repo
      .find_by_id(invoice_id)
      .await?
      .ok_or(SalesError::InvoiceNotFound(invoice_id))
  }

  pub async fn get_order_with_details(
    &self,
    order_id: Uuid,
  ) -> Result<(Order, Vec<OrderItem>, Vec<Invoice>), SalesError> {
    let order = self.get_order(order_id).await?;
    let items = self.order_item_repo.find_by_order_id(order_id).await?;
    let invoices = self.invoice_repo.find_by_order_id(order_id).await?;
    Ok((order, items, invoices))
  }

  pub async fn get_invoice_with_details(
    &self,
    invoice_id: Uuid,
  ) -> Result<(Invoice, Vec<OrderItem>), SalesError> {
    let invoice = self.get_invoice(invoice_id).await?;
    let items = match invoice.order_id {
      Some(order_id) => self.order_item_repo.find_by_order_id(order_id).await?,
      None => Vec::new(),
    };
    Ok((invoice, items))
  }

  // Helper methods
  async fn load_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, SalesError> {
    let items = self.order_item_repo.find_by_order_id(order_id).await?;
    if items.is_empty() {
      return Err(SalesError::NoLineItems(order_id));
    }
    Ok(items)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::sales::value_objects::{Quantity, UnitPrice};
  use crate::infrastructure::persistence::memory::InMemoryStore;
  use rust_decimal::Decimal;
  use rust_decimal_macros::dec;

  fn service(store: &Arc<InMemoryStore>, policy: StockPolicy) -> EditingService {
    EditingService::new(EditingServiceDependencies {
      catalog: store.clone(),
      order_repo: store.clone(),
      invoice_repo: store.clone(),
      order_item_repo: store.clone(),
      reconciliation_store: store.clone(),
      stock_policy: policy,
    })
  }

  fn product(store: &InMemoryStore, name: &str, price: Decimal, stock: i32) -> Product {
    let product = Product::new(name.to_string(), None, price, None, stock).unwrap();
    store.insert_product(product.clone());
    product
  }

  fn line(order: &Order, product: &Product, quantity: i32, unit_price: Decimal) -> OrderItem {
    let quantity = Quantity::new(quantity).unwrap();
    let unit_price = UnitPrice::new(unit_price).unwrap();
    OrderItem {
      id: Uuid::new_v4(),
      order_id: order.id,
      product_id: Some(product.id),
      product_name: product.name.clone(),
      product_sku: product.sku.clone(),
      quantity,
      unit_price,
      total_price: unit_price.times(quantity),
      size: None,
      color: None,
    }
  }

  fn order(store: &InMemoryStore, items: &[(&Product, i32, Decimal)]) -> Order {
    let mut order = Order::new("NC-3001".to_string(), "Hira Ahmed".to_string());
    let lines: Vec<OrderItem> = items
      .iter()
      .map(|(product, quantity, price)| line(&order, product, *quantity, *price))
      .collect();
    let subtotal: Decimal = lines.iter().map(|l| l.total_price).sum();
    order.subtotal = subtotal;
    order.total_amount = subtotal;
    store.insert_order(order.clone(), lines);
    order
  }

  #[tokio::test]
  async fn test_quantity_increase_scenario() {
    let store = Arc::new(InMemoryStore::new());
    let p = product(&store, "Lawn Suit", dec!(500), 10);
    let order = order(&store, &[(&p, 2, dec!(500))]);
    let service = service(&store, StockPolicy::AllowNegative);

    let mut session = service.open_order_session(order.id).await.unwrap();
    let line = session.set_quantity(0, 5).unwrap();
    assert_eq!(line.line_total, dec!(2500));

    let outcome = service.save(&session).await.unwrap();
    assert_eq!(outcome.totals.subtotal, dec!(2500));
    assert_eq!(outcome.totals.total, dec!(2500));
    assert_eq!(store.stock_of(p.id), Some(7));

    let saved = service.get_order(order.id).await.unwrap();
    assert_eq!(saved.subtotal, dec!(2500));
    assert_eq!(saved.total_amount, dec!(2500));
    let items = store.items_of(order.id);
    assert_eq!(items[0].quantity.value(), 5);
    assert_eq!(items[0].total_price, dec!(2500));
  }

  #[tokio::test]
  async fn test_invoice_remove_and_add_scenario() {
    let store = Arc::new(InMemoryStore::new());
    let q = product(&store, "Bridal Lehenga", dec!(700), 4);
    let kept = product(&store, "Khussa", dec!(1500), 9);
    let r = product(&store, "Embellished Clutch", dec!(800), 6);
    let order = order(&store, &[(&q, 3, dec!(700)), (&kept, 1, dec!(1500))]);
    let invoice = Invoice::new("INV-3001".to_string(), Some(order.id));
    store.insert_invoice(invoice.clone());
    let service = service(&store, StockPolicy::AllowNegative);

    let mut session = service.open_invoice_session(invoice.id).await.unwrap();
    session.remove_item(0).unwrap();
    let r_product = service.find_product(r.id).await.unwrap();
    session.add_item(&r_product).unwrap();

    let outcome = service.save(&session).await.unwrap();
    assert_eq!(store.stock_of(q.id), Some(7));
    assert_eq!(store.stock_of(r.id), Some(5));
    assert_eq!(store.stock_of(kept.id), Some(9));
    assert_eq!(outcome.totals.subtotal, dec!(2300));

    let saved = service.get_invoice(invoice.id).await.unwrap();
    assert_eq!(saved.subtotal, dec!(2300));
    assert_eq!(saved.total_amount, dec!(2300));
    assert_eq!(store.items_of(order.id).len(), 2);
  }

  #[tokio::test]
  async fn test_order_save_propagates_to_linked_invoice() {
    let store = Arc::new(InMemoryStore::new());
    let p = product(&store, "Pashmina", dec!(1200), 3);
    let order = order(&store, &[(&p, 1, dec!(1200))]);
    let invoice = Invoice::new("INV-3002".to_string(), Some(order.id));
    store.insert_invoice(invoice.clone());
    let service = service(&store, StockPolicy::AllowNegative);

    let mut session = service.open_order_session(order.id).await.unwrap();
    session.set_discount_percent(0, dec!(25)).unwrap();
    service.save(&session).await.unwrap();

    let saved = service.get_invoice(invoice.id).await.unwrap();
    assert_eq!(saved.subtotal, dec!(1200));
    assert_eq!(saved.discount_amount, dec!(300));
    assert_eq!(saved.total_amount, dec!(900));
    assert_eq!(store.stock_of(p.id), Some(3));
  }

  #[tokio::test]
  async fn test_negative_stock_allowed_by_default() {
    let store = Arc::new(InMemoryStore::new());
    let p = product(&store, "Sherwani", dec!(9000), 1);
    let order = order(&store, &[(&p, 1, dec!(9000))]);
    let service = service(&store, StockPolicy::AllowNegative);

    let mut session = service.open_order_session(order.id).await.unwrap();
    session.set_quantity(0, 4).unwrap();
    let outcome = service.save(&session).await.unwrap();
    assert_eq!(store.stock_of(p.id), Some(-2));
    assert_eq!(outcome.stock_levels[0].stock_quantity, -2);
  }

  #[tokio::test]
  async fn test_rejected_negative_stock_leaves_everything_untouched() {
    let store = Arc::new(InMemoryStore::new());
    let a = product(&store, "Kurta", dec!(2000), 10);
    let b = product(&store, "Waistcoat", dec!(3500), 1);
    let order = order(&store, &[(&a, 2, dec!(2000)), (&b, 1, dec!(3500))]);
    let service = service(&store, StockPolicy::RejectNegative);

    let mut session = service.open_order_session(order.id).await.unwrap();
    session.remove_item(0).unwrap();
    session.set_quantity(0, 5).unwrap();

    let err = service.save(&session).await.unwrap_err();
    assert!(matches!(
      err,
      SalesError::InsufficientStock {
        requested: 4,
        available: 1,
        ..
      }
    ));
    assert_eq!(store.stock_of(a.id), Some(10));
    assert_eq!(store.stock_of(b.id), Some(1));
    assert_eq!(store.items_of(order.id).len(), 2);
    assert_eq!(service.get_order(order.id).await.unwrap().total_amount, dec!(7500));
  }

  #[tokio::test]
  async fn test_stale_session_is_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let p = product(&store, "Abaya", dec!(3000), 10);
    let order = order(&store, &[(&p, 2, dec!(3000))]);
    let service = service(&store, StockPolicy::AllowNegative);

    let mut first = service.open_order_session(order.id).await.unwrap();
    let mut second = service.open_order_session(order.id).await.unwrap();
    first.set_quantity(0, 3).unwrap();
    service.save(&first).await.unwrap();
    assert_eq!(store.stock_of(p.id), Some(9));

    second.set_quantity(0, 6).unwrap();
    let err = service.save(&second).await.unwrap_err();
    assert!(matches!(err, SalesError::StaleLineItem(_)));
    assert_eq!(store.stock_of(p.id), Some(9));
  }

  #[tokio::test]
  async fn test_open_missing_order() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store, StockPolicy::AllowNegative);
    let id = Uuid::new_v4();
    assert!(matches!(
      service.open_order_session(id).await,
      Err(SalesError::OrderNotFound(missing)) if missing == id
    ));
  }

  #[tokio::test]
  async fn test_open_order_without_items() {
    let store = Arc::new(InMemoryStore::new());
    let order = order(&store, &[]);
    let service = service(&store, StockPolicy::AllowNegative);
    assert!(matches!(
      service.open_order_session(order.id).await,
      Err(SalesError::NoLineItems(_))
    ));
  }

  #[tokio::test]
  async fn test_unlinked_invoice_opens_read_only() {
    let store = Arc::new(InMemoryStore::new());
    let mut invoice = Invoice::new("INV-3003".to_string(), None);
    invoice.subtotal = dec!(1000);
    invoice.total_amount = dec!(1000);
    store.insert_invoice(invoice.clone());
    let service = service(&store, StockPolicy::AllowNegative);

    let session = service.open_invoice_session(invoice.id).await.unwrap();
    assert!(session.is_read_only());
    assert_eq!(session.totals().total, dec!(1000));
    assert!(matches!(
      service.save(&session).await,
      Err(SalesError::ReadOnlySession(_))
    ));
  }

  #[tokio::test]
  async fn test_missing_product() {
    let store = Arc::new(InMemoryStore::new());
    let service = service(&store, StockPolicy::AllowNegative);
    assert!(matches!(
      service.find_product(Uuid::new_v4()).await,
      Err(SalesError::ProductNotFound(_))
    ));
  }
}
