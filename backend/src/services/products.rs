//! Product catalog service

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use shared::{validate_price, validate_product_code, Product};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Product service for catalog CRUD
#[derive(Clone)]
pub struct ProductService {
    state: AppState,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub code: String,
    pub name: String,
    pub model: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub origin: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub catalog_url: Option<String>,
    pub price: Decimal,
    pub import_price: Option<Decimal>,
    pub stock: Option<i64>,
    pub batch_no: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// Input for updating a product; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub code: Option<String>,
    pub name: Option<String>,
    pub model: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub origin: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub catalog_url: Option<String>,
    pub price: Option<Decimal>,
    pub import_price: Option<Decimal>,
    pub batch_no: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// List products, optionally filtered by a case-insensitive name/code
    /// substring
    pub async fn list(&self, search: Option<String>) -> Vec<Product> {
        let data = self.state.data.read().await;
        match search.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => {
                let needle = s.to_lowercase();
                data.products
                    .iter()
                    .filter(|p| {
                        p.name.to_lowercase().contains(&needle)
                            || p.code.to_lowercase().contains(&needle)
                    })
                    .cloned()
                    .collect()
            }
            None => data.products.clone(),
        }
    }

    /// Get one product
    pub async fn get(&self, id: Uuid) -> AppResult<Product> {
        self.state
            .data
            .read()
            .await
            .product(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Create a product: optimistic local insert, rolled back if the store
    /// rejects it
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        validate_product_code(&input.code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
            message_vi: "Mã sản phẩm không hợp lệ".to_string(),
        })?;
        validate_price(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
            message_vi: "Giá bán không được âm".to_string(),
        })?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            code: input.code,
            name: input.name,
            model: input.model,
            unit: input.unit,
            category: input.category,
            origin: input.origin,
            description: input.description,
            image_url: input.image_url,
            catalog_url: input.catalog_url,
            price: input.price,
            import_price: input.import_price.unwrap_or(Decimal::ZERO),
            stock: input.stock.unwrap_or(0),
            batch_no: input.batch_no,
            expiry_date: input.expiry_date,
            created_at: now,
            updated_at: now,
        };

        {
            let mut data = self.state.data.write().await;
            if data.products.iter().any(|p| p.code == product.code) {
                return Err(AppError::DuplicateEntry("product code".to_string()));
            }
            data.products.insert(0, product.clone());
        }

        if let Err(err) = self.state.gateway.create_product(&product).await {
            // Compensating transform for the create flow: remove the
            // optimistic insert
            let mut data = self.state.data.write().await;
            data.products.retain(|p| p.id != product.id);
            return Err(err);
        }

        Ok(product)
    }

    /// Update a product. The optimistic local change is kept even if
    /// persistence fails; the error is surfaced to the caller.
    pub async fn update(&self, id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        let updated = {
            let mut data = self.state.data.write().await;

            if let Some(code) = &input.code {
                validate_product_code(code).map_err(|msg| AppError::Validation {
                    field: "code".to_string(),
                    message: msg.to_string(),
                    message_vi: "Mã sản phẩm không hợp lệ".to_string(),
                })?;
                if data.products.iter().any(|p| p.id != id && &p.code == code) {
                    return Err(AppError::DuplicateEntry("product code".to_string()));
                }
            }
            if let Some(price) = input.price {
                validate_price(price).map_err(|msg| AppError::Validation {
                    field: "price".to_string(),
                    message: msg.to_string(),
                    message_vi: "Giá bán không được âm".to_string(),
                })?;
            }

            let product = data
                .product_mut(id)
                .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            if let Some(code) = input.code {
                product.code = code;
            }
            if let Some(name) = input.name {
                product.name = name;
            }
            if input.model.is_some() {
                product.model = input.model;
            }
            if input.unit.is_some() {
                product.unit = input.unit;
            }
            if input.category.is_some() {
                product.category = input.category;
            }
            if input.origin.is_some() {
                product.origin = input.origin;
            }
            if input.description.is_some() {
                product.description = input.description;
            }
            if input.image_url.is_some() {
                product.image_url = input.image_url;
            }
            if input.catalog_url.is_some() {
                product.catalog_url = input.catalog_url;
            }
            if let Some(price) = input.price {
                product.price = price;
            }
            if let Some(import_price) = input.import_price {
                product.import_price = import_price;
            }
            if input.batch_no.is_some() {
                product.batch_no = input.batch_no;
            }
            if input.expiry_date.is_some() {
                product.expiry_date = input.expiry_date;
            }
            product.updated_at = Utc::now();
            product.clone()
        };

        self.state.gateway.update_product(&updated).await?;
        Ok(updated)
    }

    /// Delete a product. Logs referencing it are kept; reports fall back to
    /// the logged name snapshot.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        {
            let mut data = self.state.data.write().await;
            let before = data.products.len();
            data.products.retain(|p| p.id != id);
            if data.products.len() == before {
                return Err(AppError::NotFound("Product".to_string()));
            }
        }

        self.state.gateway.delete_product(id).await
    }
}
