// src/web/handlers.rs
use crate::agent::{self, tools};
use crate::web::types::*;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn chat_handler(
    request: Json<ChatRequest>,
    store: &State<SessionStore>,
) -> Result<Json<ChatReply>, Json<ErrorResponse>> {
    let message = request.message.trim().to_string();
    if message.is_empty() {
        return Err(Json(ErrorResponse::new(
            "Please enter a question about jobs.",
        )));
    }

    let agent = match agent::shared_agent().await {
        Ok(agent) => agent,
        Err(e) => {
            error!("Failed to build the job search agent: {e:#}");
            return Err(Json(ErrorResponse::new(format!("{e:#}"))));
        }
    };

    let (conversation_id, history) = store.open(request.conversation_id);
    info!(
        "Handling chat message for conversation {conversation_id} ({} prior turns)",
        history.len()
    );

    match agent.respond(&message, &history).await {
        Ok(reply) => {
            store.append_turn(conversation_id, &message, &reply);
            Ok(Json(ChatReply::new(reply, conversation_id)))
        }
        Err(e) => {
            error!("Chat request failed: {e:#}");
            Err(Json(ErrorResponse::new(format!("Warning: {e:#}"))))
        }
    }
}

pub async fn tools_handler() -> Json<ToolsResponse> {
    let tools = tools::catalogue()
        .into_iter()
        .map(|tool| ToolInfo {
            name: tool.function.name,
            description: tool.function.description,
        })
        .collect();

    Json(ToolsResponse {
        success: true,
        tools,
    })
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        service: "jobscout",
    })
}
