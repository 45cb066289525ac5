//! API description document (OpenAPI 3)

use actix_web::HttpResponse;
use serde_json::{json, Map, Value};

use crate::features::{HealthInput, FIELD_NAMES};
use crate::risk::RISK_LABELS;

/// Build the OpenAPI document describing every route
pub fn openapi_document() -> Value {
    let properties: Map<String, Value> = FIELD_NAMES
        .iter()
        .map(|field| (field.to_string(), json!({ "type": "number", "title": field })))
        .collect();

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Health Risk Prediction API",
            "description": "MLOps deployment for health risk assessment",
            "version": crate::VERSION
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Root",
                    "responses": { "200": { "description": "Service status and endpoint list" } }
                }
            },
            "/predict": {
                "post": {
                    "summary": "Predict",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/HealthInput" }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Risk assessment",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/PredictionResponse" }
                                }
                            }
                        },
                        "422": { "description": "Validation Error" },
                        "500": { "description": "Prediction failed" }
                    }
                }
            },
            "/dashboard": {
                "get": {
                    "summary": "Dashboard",
                    "responses": {
                        "200": { "description": "Dashboard page", "content": { "text/html": {} } }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "HealthInput": {
                    "type": "object",
                    "title": "HealthInput",
                    "required": FIELD_NAMES,
                    "properties": properties,
                    "example": HealthInput::example()
                },
                "PredictionResponse": {
                    "type": "object",
                    "properties": {
                        "risk_code": { "type": "integer", "enum": [0, 1, 2] },
                        "risk_level": { "type": "string", "enum": RISK_LABELS },
                        "success": { "type": "boolean" }
                    }
                }
            }
        }
    })
}

/// API文档处理器
pub async fn docs() -> HttpResponse {
    HttpResponse::Ok().json(openapi_document())
}
