use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use validator::{Validate, ValidationErrors};

/// JSON body that has passed its `validator` rules.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, axum::Json<Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(body) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let payload = json!({
                    "status": "error",
                    "message": rejection.body_text(),
                });
                // Unknown enum values and wrong types are client errors, not 422s.
                (StatusCode::BAD_REQUEST, axum::Json(payload))
            })?;

        body.validate().map_err(|errors| {
            let payload = json!({
                "status": "error",
                "message": format_validation_errors(&errors),
                "details": field_messages(&errors),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload))
        })?;

        Ok(Self(body))
    }
}

fn message_for(field: &str, error: &validator::ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| match error.code.as_ref() {
            "length" => "Invalid length".to_string(),
            "range" => "Value out of range".to_string(),
            _ => format!("Invalid {field}"),
        })
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            messages.push(format!("{field}: {}", message_for(&field, error)));
        }
    }

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.sort();
        messages.join("; ")
    }
}

fn field_messages(errors: &ValidationErrors) -> Value {
    let mut map = serde_json::Map::new();

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|error| message_for(&field, error))
            .collect();
        map.insert(field.to_string(), json!(messages));
    }

    Value::Object(map)
}
