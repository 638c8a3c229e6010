// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::{Context, Result};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, post, routes, Request, Response, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

/// Generic CORS handler that returns Status::Ok for any OPTIONS request
#[rocket::options("/<_..>")]
pub async fn universal_options_handler() -> Status {
    Status::Ok
}

#[post("/chat", data = "<request>")]
pub async fn chat(
    request: Json<ChatRequest>,
    store: &State<SessionStore>,
) -> Result<Json<ChatReply>, Json<ErrorResponse>> {
    handlers::chat_handler(request, store).await
}

#[get("/tools")]
pub async fn tools() -> Json<ToolsResponse> {
    handlers::tools_handler().await
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    handlers::health_handler().await
}

#[catch(404)]
fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Resource not found"))
}

pub async fn start_web_server(port: u16) -> Result<()> {
    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    info!("Starting chat API on http://0.0.0.0:{port}");

    rocket::custom(figment)
        .manage(SessionStore::new())
        .attach(Cors)
        .mount("/", routes![chat, tools, health, universal_options_handler])
        .register("/", catchers![not_found])
        .launch()
        .await
        .context("Web server failed")?;

    Ok(())
}
