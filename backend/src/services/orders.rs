//! Sales order service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::{Order, OrderItem, OrderStatus};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Order service for CRUD and status transitions
#[derive(Clone)]
pub struct OrderService {
    state: AppState,
}

/// One requested order line; price defaults to the product's current
/// selling price
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i64,
    pub price: Option<Decimal>,
}

/// Input for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub customer_id: Option<Uuid>,
    /// Used when no customer reference is given (walk-in sale)
    pub customer_name: Option<String>,
    pub items: Vec<OrderItemInput>,
    pub date: Option<DateTime<Utc>>,
}

/// Input for editing a pending order
#[derive(Debug, Deserialize)]
pub struct UpdateOrderInput {
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub items: Option<Vec<OrderItemInput>>,
    pub date: Option<DateTime<Utc>>,
}

/// Input for a status change
#[derive(Debug, Deserialize)]
pub struct UpdateStatusInput {
    pub status: OrderStatus,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn list(&self) -> Vec<Order> {
        self.state.data.read().await.orders.clone()
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Order> {
        self.state
            .data
            .read()
            .await
            .order(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    /// Create an order: optimistic local insert, rolled back on store
    /// failure. The total is derived from the items and stored redundantly.
    pub async fn create(&self, input: CreateOrderInput) -> AppResult<Order> {
        let order = {
            let data = self.state.data.read().await;

            let customer_name = match input.customer_id {
                Some(customer_id) => data
                    .customer(customer_id)
                    .map(|c| c.name.clone())
                    .ok_or_else(|| AppError::NotFound("Customer".to_string()))?,
                None => input
                    .customer_name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| AppError::Validation {
                        field: "customer_name".to_string(),
                        message: "Customer name is required".to_string(),
                        message_vi: "Tên khách hàng không được để trống".to_string(),
                    })?,
            };

            let items = Self::build_items(&data, &input.items)?;
            let total_amount = Order::derive_total(&items);
            let now = Utc::now();

            Order {
                id: Uuid::new_v4(),
                customer_id: input.customer_id,
                customer_name,
                items,
                total_amount,
                status: OrderStatus::Pending,
                date: input.date.unwrap_or(now),
                created_at: now,
                updated_at: now,
            }
        };

        {
            let mut data = self.state.data.write().await;
            data.orders.insert(0, order.clone());
        }

        if let Err(err) = self.state.gateway.create_order(&order).await {
            let mut data = self.state.data.write().await;
            data.orders.retain(|o| o.id != order.id);
            return Err(err);
        }

        Ok(order)
    }

    /// Edit an order. Only pending orders can be edited; later states only
    /// move through the status endpoint.
    pub async fn update(&self, id: Uuid, input: UpdateOrderInput) -> AppResult<Order> {
        let updated = {
            let mut data = self.state.data.write().await;

            let current = data
                .order(id)
                .cloned()
                .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
            if current.status != OrderStatus::Pending {
                return Err(AppError::InvalidStateTransition(
                    "Only pending orders can be edited".to_string(),
                ));
            }

            let items = match &input.items {
                Some(items) => Self::build_items(&data, items)?,
                None => current.items.clone(),
            };
            let customer_name = match input.customer_id.or(current.customer_id) {
                Some(customer_id) => data
                    .customer(customer_id)
                    .map(|c| c.name.clone())
                    .unwrap_or(current.customer_name.clone()),
                None => input
                    .customer_name
                    .clone()
                    .unwrap_or(current.customer_name.clone()),
            };

            let order = data
                .orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
            order.customer_id = input.customer_id.or(order.customer_id);
            order.customer_name = customer_name;
            order.total_amount = Order::derive_total(&items);
            order.items = items;
            if let Some(date) = input.date {
                order.date = date;
            }
            order.updated_at = Utc::now();
            order.clone()
        };

        self.state.gateway.update_order(&updated).await?;
        Ok(updated)
    }

    /// Change an order's status: one forward step at a time, or cancellation
    /// from any non-terminal status
    pub async fn update_status(&self, id: Uuid, input: UpdateStatusInput) -> AppResult<Order> {
        let updated = {
            let mut data = self.state.data.write().await;
            let order = data
                .orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

            if !order.status.can_transition_to(input.status) {
                return Err(AppError::InvalidStateTransition(format!(
                    "Cannot move order from {} to {}",
                    order.status.as_str(),
                    input.status.as_str()
                )));
            }

            order.status = input.status;
            order.updated_at = Utc::now();
            order.clone()
        };

        self.state.gateway.update_order(&updated).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        {
            let mut data = self.state.data.write().await;
            let before = data.orders.len();
            data.orders.retain(|o| o.id != id);
            if data.orders.len() == before {
                return Err(AppError::NotFound("Order".to_string()));
            }
        }

        self.state.gateway.delete_order(id).await
    }

    /// Resolve requested lines against the catalog, snapshotting names and
    /// prices at sale time
    fn build_items(
        data: &crate::state::AppData,
        inputs: &[OrderItemInput],
    ) -> AppResult<Vec<OrderItem>> {
        if inputs.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Order must contain at least one item".to_string(),
                message_vi: "Đơn hàng phải có ít nhất một sản phẩm".to_string(),
            });
        }

        let mut items = Vec::with_capacity(inputs.len());
        for input in inputs {
            if input.quantity <= 0 {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Quantity must be positive".to_string(),
                    message_vi: "Số lượng phải lớn hơn 0".to_string(),
                });
            }
            let product = data
                .product(input.product_id)
                .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
            let price = input.price.unwrap_or(product.price);
            if price < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "price".to_string(),
                    message: "Price cannot be negative".to_string(),
                    message_vi: "Đơn giá không được âm".to_string(),
                });
            }
            items.push(OrderItem {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: input.quantity,
                price,
            });
        }
        Ok(items)
    }
}
