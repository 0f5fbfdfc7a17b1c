//! Chat assistant service
//!
//! Assembles a short business snapshot (recent orders and current products)
//! as context and forwards the user's free-text question to the external
//! text-generation API.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::external::ai_assistant::AiAssistantClient;
use crate::state::AppState;

/// How much context the assistant sees
const CONTEXT_ORDERS: usize = 5;
const CONTEXT_PRODUCTS: usize = 10;

/// Assistant service
#[derive(Clone)]
pub struct AssistantService {
    state: AppState,
    client: Option<AiAssistantClient>,
}

/// Input for a chat turn
#[derive(Debug, Deserialize)]
pub struct ChatInput {
    pub message: String,
}

/// One generated reply
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

impl AssistantService {
    /// Create a new AssistantService instance
    pub fn new(state: AppState) -> Self {
        let client = AiAssistantClient::from_config(&state.config.assistant);
        Self { state, client }
    }

    /// Answer one chat turn with business context attached
    pub async fn chat(&self, input: ChatInput) -> AppResult<ChatResponse> {
        let client = self
            .client
            .as_ref()
            .ok_or(AppError::AssistantNotConfigured)?;

        if input.message.trim().is_empty() {
            return Err(AppError::Validation {
                field: "message".to_string(),
                message: "Message must not be empty".to_string(),
                message_vi: "Câu hỏi không được để trống".to_string(),
            });
        }

        let system = self.build_context().await;
        let reply = client.complete(&system, &input.message).await?;
        Ok(ChatResponse { reply })
    }

    /// Render recent orders and current products as plain-text context
    async fn build_context(&self) -> String {
        let data = self.state.data.read().await;

        let mut context = String::from(
            "You are an assistant for a small retail shop's sales and \
             inventory console. Answer briefly, in the user's language.\n\n\
             Current products:\n",
        );
        for product in data.products.iter().take(CONTEXT_PRODUCTS) {
            context.push_str(&format!(
                "- {} ({}): stock {}, price {}, import cost {}\n",
                product.name, product.code, product.stock, product.price, product.import_price
            ));
        }

        context.push_str("\nRecent orders:\n");
        for order in data.orders.iter().take(CONTEXT_ORDERS) {
            context.push_str(&format!(
                "- {} | {} | {} item(s) | total {} | {}\n",
                order.date.format("%Y-%m-%d"),
                order.customer_name,
                order.items.len(),
                order.total_amount,
                order.status.as_str()
            ));
        }

        context
    }
}
