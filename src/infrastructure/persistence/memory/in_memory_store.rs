use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogReader, Product, ProductFilter};
use crate::domain::sales::{
  EditTarget, Invoice, InvoiceRepository, Order, OrderItem, OrderItemRepository, OrderRepository,
  ReconciliationOutcome, ReconciliationPlan, ReconciliationStore, SalesError, StockLevel,
  StockPolicy,
};

#[derive(Debug, Clone, Default)]
struct State {
  products: HashMap<Uuid, Product>,
  orders: HashMap<Uuid, Order>,
  invoices: HashMap<Uuid, Invoice>,
  /// Items per order, in insertion order.
  items: HashMap<Uuid, Vec<OrderItem>>,
}

/// In-memory catalog and sales store.
///
/// Intended for tests/dev. A plan is applied to a copy of the state which
/// replaces the live state only when every step succeeded.
#[derive(Debug, Default)]
pub struct InMemoryStore {
  state: RwLock<State>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert_product(&self, product: Product) {
    if let Ok(mut state) = self.state.write() {
      state.products.insert(product.id, product);
    }
  }

  pub fn insert_order(&self, order: Order, items: Vec<OrderItem>) {
    if let Ok(mut state) = self.state.write() {
      state.items.insert(order.id, items);
      state.orders.insert(order.id, order);
    }
  }

  pub fn insert_invoice(&self, invoice: Invoice) {
    if let Ok(mut state) = self.state.write() {
      state.invoices.insert(invoice.id, invoice);
    }
  }

  pub fn stock_of(&self, product_id: Uuid) -> Option<i32> {
    let state = self.state.read().ok()?;
    state.products.get(&product_id).map(|p| p.stock_quantity)
  }

  pub fn items_of(&self, order_id: Uuid) -> Vec<OrderItem> {
    self
      .state
      .read()
      .ok()
      .and_then(|state| state.items.get(&order_id).cloned())
      .unwrap_or_default()
  }

  fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, State>, SalesError> {
    self
      .state
      .read()
      .map_err(|_| SalesError::Repository("lock poisoned".to_string()))
  }
}

impl State {
  fn delete_item(
    &mut self,
    order_id: Uuid,
    item_id: Uuid,
    baseline: i32,
  ) -> Result<(), SalesError> {
    let items = self.items.entry(order_id).or_default();
    let position = items
      .iter()
      .position(|i| i.id == item_id && i.quantity.value() == baseline)
      .ok_or(SalesError::StaleLineItem(item_id))?;
    items.remove(position);
    Ok(())
  }

  fn adjust_stock(
    &mut self,
    product_id: Uuid,
    deduct: i32,
    policy: StockPolicy,
  ) -> Result<i32, SalesError> {
    let product = self
      .products
      .get_mut(&product_id)
      .ok_or(SalesError::ProductNotFound(product_id))?;

    let next = product.stock_quantity.checked_sub(deduct).ok_or_else(|| {
      SalesError::Repository(format!("Stock of product {} out of range", product_id))
    })?;
    if policy == StockPolicy::RejectNegative && deduct > 0 && next < 0 {
      return Err(SalesError::InsufficientStock {
        product_id,
        requested: deduct,
        available: product.stock_quantity,
      });
    }
    product.stock_quantity = next;
    product.updated_at = Utc::now();
    Ok(next)
  }

  fn apply(
    &mut self,
    plan: &ReconciliationPlan,
    policy: StockPolicy,
  ) -> Result<Vec<StockLevel>, SalesError> {
    for removal in &plan.removals {
      self.delete_item(
        plan.order_id,
        removal.item_id,
        removal.baseline_quantity.value(),
      )?;
    }

    let items = self.items.entry(plan.order_id).or_default();
    items.extend(plan.additions.iter().cloned());

    for change in &plan.changes {
      let item = items
        .iter_mut()
        .find(|i| i.id == change.item_id && i.quantity == change.baseline_quantity)
        .ok_or(SalesError::StaleLineItem(change.item_id))?;
      item.quantity = change.quantity;
      item.unit_price = change.unit_price;
      item.total_price = change.total_price;
    }

    let mut levels = Vec::new();
    for adjustment in plan.stock_adjustments() {
      let stock = self.adjust_stock(adjustment.product_id, adjustment.deduct, policy)?;
      levels.push(StockLevel {
        product_id: adjustment.product_id,
        stock_quantity: stock,
      });
    }

    match plan.target {
      EditTarget::Order { order_id } => {
        let order = self
          .orders
          .get_mut(&order_id)
          .ok_or(SalesError::OrderNotFound(order_id))?;
        order.apply_totals(&plan.totals);
        for invoice in self
          .invoices
          .values_mut()
          .filter(|i| i.order_id == Some(order_id))
        {
          invoice.apply_totals(&plan.totals);
        }
      }
      EditTarget::Invoice { invoice_id, .. } => {
        let invoice = self
          .invoices
          .get_mut(&invoice_id)
          .ok_or(SalesError::InvoiceNotFound(invoice_id))?;
        invoice.apply_totals(&plan.totals);
      }
    }

    Ok(levels)
  }
}

#[async_trait]
impl CatalogReader for InMemoryStore {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    let state = self
      .state
      .read()
      .map_err(|_| CatalogError::Repository("lock poisoned".to_string()))?;
    Ok(state.products.get(&id).cloned())
  }

  async fn get_stock(&self, id: Uuid) -> Result<i32, CatalogError> {
    CatalogReader::find_by_id(self, id)
      .await?
      .map(|p| p.stock_quantity)
      .ok_or(CatalogError::ProductNotFound(id))
  }

  async fn search(&self, filter: ProductFilter) -> Result<Vec<Product>, CatalogError> {
    let state = self
      .state
      .read()
      .map_err(|_| CatalogError::Repository("lock poisoned".to_string()))?;

    let mut products: Vec<Product> = state
      .products
      .values()
      .filter(|p| filter.matches(p))
      .cloned()
      .collect();
    products.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    if let Some(limit) = filter.limit {
      products.truncate(limit.max(0) as usize);
    }
    Ok(products)
  }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, SalesError> {
    Ok(self.read()?.orders.get(&id).cloned())
  }
}

#[async_trait]
impl InvoiceRepository for InMemoryStore {
  async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, SalesError> {
    Ok(self.read()?.invoices.get(&id).cloned())
  }

  async fn find_by_order_id(&self, order_id: Uuid) -> Result<Vec<Invoice>, SalesError> {
    let mut invoices: Vec<Invoice> = self
      .read()?
      .invoices
      .values()
      .filter(|i| i.order_id == Some(order_id))
      .cloned()
      .collect();
    invoices.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(invoices)
  }
}

#[async_trait]
impl OrderItemRepository for InMemoryStore {
  async fn find_by_order_id(&self, order_id: Uuid) -> Result<Vec<OrderItem>, SalesError> {
    Ok(self.read()?.items.get(&order_id).cloned().unwrap_or_default())
  }
}

#[async_trait]
impl ReconciliationStore for InMemoryStore {
  async fn apply(
    &self,
    plan: &ReconciliationPlan,
    policy: StockPolicy,
  ) -> Result<ReconciliationOutcome, SalesError> {
    let mut state = self
      .state
      .write()
      .map_err(|_| SalesError::Repository("lock poisoned".to_string()))?;

    let mut working = state.clone();
    let stock_levels = working.apply(plan, policy)?;
    *state = working;

    Ok(ReconciliationOutcome {
      totals: plan.totals,
      stock_levels,
    })
  }
}
