pub mod adzuna;
pub mod agent;
pub mod environment;
pub mod html_text;
pub mod jobboard;
pub mod types;
pub mod web;

pub use web::start_web_server;
