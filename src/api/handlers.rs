//! API request handlers

use actix_web::{
    error::{InternalError, JsonPayloadError},
    web, HttpRequest, HttpResponse,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::{
    dashboard, docs,
    response::{PredictionResponse, RootResponse, ValidationErrorDetail},
    server::ApiServerState,
};
use crate::error::{Error, FieldError};
use crate::features::HealthInput;

/// 配置所有API路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(root))
        .route("/predict", web::post().to(predict))
        .route("/dashboard", web::get().to(dashboard::dashboard))
        .route("/docs", web::get().to(docs::docs));
}

/// 请求体解析配置：无法解析的JSON按校验错误(422)返回，超长请求体保持413
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    if matches!(
        err,
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. }
    ) {
        warn!("请求体过大: {}", err);
        return err.into();
    }
    warn!("无法解析请求体: {}", err);
    let detail = FieldError::body(format!("JSON decode error: {}", err), "json_invalid");
    InternalError::from_response(err, ValidationErrorDetail::response(vec![detail])).into()
}

/// 服务信息，与模型状态无关
async fn root() -> HttpResponse {
    HttpResponse::Ok().json(RootResponse::online())
}

/// 预测处理器
///
/// 校验失败时模型不会被调用。推理失败只影响当前请求。
pub async fn predict(
    state: web::Data<ApiServerState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, Error> {
    let input = HealthInput::from_json(&body).map_err(|err| {
        warn!("预测请求校验失败: {}", err);
        err
    })?;

    match state.classifier.assess(&input) {
        Ok(prediction) => {
            info!(
                "Prediction made: {} (code: {})",
                prediction.risk_level, prediction.risk_code
            );
            Ok(HttpResponse::Ok().json(PredictionResponse::from(prediction)))
        }
        Err(err) => {
            error!("Prediction error: {}", err);
            Err(err)
        }
    }
}
