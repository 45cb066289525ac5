//! 静态仪表盘页面
//! 预测历史只保存在浏览器localStorage中，服务端不保存任何记录

use actix_web::{http::header::ContentType, HttpResponse};

/// Dashboard markup, embedded at compile time
pub const DASHBOARD_HTML: &str = include_str!("../../static/dashboard.html");

/// 仪表盘处理器
pub async fn dashboard() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(DASHBOARD_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FIELD_NAMES;

    #[test]
    fn test_form_posts_every_field() {
        assert!(DASHBOARD_HTML.contains("fetch('/predict'"));
        for field in FIELD_NAMES {
            assert!(
                DASHBOARD_HTML.contains(&format!("name=\"{}\"", field)),
                "missing input for {}",
                field
            );
        }
    }

    #[test]
    fn test_history_is_client_side() {
        assert!(DASHBOARD_HTML.contains("localStorage"));
    }
}
