//! HTTP API module
//!
//! This module provides the REST endpoints and the static dashboard.

pub mod dashboard;
pub mod docs;
pub mod handlers;

// API响应类型
pub mod response;

// API服务器状态
pub mod server;


// 重新导出路由配置函数
pub use handlers::configure_routes;

// 重新导出常用类型
pub use response::{ErrorDetail, PredictionResponse, RootResponse};
pub use server::ApiServerState;
