use axum::Json;

use crate::models::{ChatRequest, ChatResponse};
use crate::tutor;

pub async fn tutor_chat_handler(Json(payload): Json<ChatRequest>) -> Json<ChatResponse> {
    Json(ChatResponse {
        message: tutor::reply(&payload.message),
    })
}
