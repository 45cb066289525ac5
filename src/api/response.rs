//! API响应模块
//! 定义各端点的响应结构以及错误到HTTP响应的映射

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::error::{Error, FieldError};
use crate::service::Prediction;

/// 预测成功响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// 风险代码 (0, 1, 2)
    pub risk_code: u8,
    /// 风险等级标签
    pub risk_level: String,
    /// 操作是否成功
    pub success: bool,
}

impl From<Prediction> for PredictionResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            risk_code: prediction.risk_code,
            risk_level: prediction.risk_level.label().to_string(),
            success: true,
        }
    }
}

/// 根路径响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub endpoints: Endpoints,
}

/// 端点列表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub dashboard: String,
    pub predict: String,
    pub docs: String,
}

impl RootResponse {
    pub fn online() -> Self {
        Self {
            message: "Health Risk Prediction API".to_string(),
            status: "online".to_string(),
            endpoints: Endpoints {
                dashboard: "/dashboard".to_string(),
                predict: "/predict (POST)".to_string(),
                docs: "/docs".to_string(),
            },
        }
    }
}

/// 推理失败响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// 校验失败响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub detail: Vec<FieldError>,
}

impl ValidationErrorDetail {
    pub fn response(errors: Vec<FieldError>) -> HttpResponse {
        HttpResponse::UnprocessableEntity().json(Self { detail: errors })
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Error::Validation(errors) => HttpResponse::build(self.status_code())
                .json(ValidationErrorDetail { detail: errors.clone() }),
            _ => HttpResponse::build(self.status_code()).json(ErrorDetail {
                detail: self.to_string(),
            }),
        }
    }
}
