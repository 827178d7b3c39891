//! HTTP Layer - RESTful API
//!
//! AI 标注与壁纸记录的 JSON 接口

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{shutdown_signal, HttpServer, ServerConfig};
pub use state::AppState;
