//! Reusable OpenAPI response types for consistent API documentation.
//!
//! Reference them from `#[utoipa::path]` as
//! `(status = 404, response = NotFoundResponse)`.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - business rule violation or field validation failure",
    content_type = "application/json",
    examples(
        ("RuleViolation" = (
            summary = "Entity rule rejected the input",
            value = json!({
                "code": 1012,
                "error": "BAD_REQUEST",
                "message": "email is invalid"
            })
        )),
        ("FieldValidation" = (
            summary = "Field length cap exceeded",
            value = json!({
                "code": 1001,
                "error": "VALIDATION_ERROR",
                "message": "Request validation failed",
                "details": {
                    "name": [{
                        "code": "length",
                        "message": null,
                        "params": {"max": 100, "value": "..."}
                    }]
                }
            })
        ))
    )
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "user '0192f0c8-6c1e-7b3a-9d4e-5f6a7b8c9d0e' not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Resource already exists",
    content_type = "application/json",
    example = json!({
        "code": 1008,
        "error": "CONFLICT",
        "message": "Resource already exists"
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/json",
    example = json!({
        "code": 1011,
        "error": "SERVICE_UNAVAILABLE",
        "message": "database: connection refused"
    })
)]
pub struct ServiceUnavailableResponse(pub ErrorResponse);
