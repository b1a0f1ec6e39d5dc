//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde_json::{Map, Value};

use super::error::ApiError;

/// Untyped JSON request body.
///
/// Field values are not checked here; handlers pick fields out and hand them
/// to the store as-is. A body sent without a JSON content type reads as `{}`,
/// so its fields are simply absent. Unparsable JSON is an [`ApiError::InvalidBody`].
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl JsonBody {
    /// Field value, `Null` when absent or when the body is not an object.
    pub fn field(&self, name: &str) -> Value {
        self.0.get(name).cloned().unwrap_or(Value::Null)
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => {
                Ok(Self(Value::Object(Map::new())))
            }
            Err(rejection) => Err(ApiError::InvalidBody(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<JsonBody, ApiError> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        JsonBody::from_request(builder.body(Body::from(body)).unwrap(), &()).await
    }

    #[tokio::test]
    async fn fields_keep_their_json_type() {
        let body = extract(Some("application/json"), r#"{"name": 123, "user_id": "1"}"#)
            .await
            .unwrap();
        assert_eq!(body.field("name"), json!(123));
        assert_eq!(body.field("user_id"), json!("1"));
        assert_eq!(body.field("email"), Value::Null);
    }

    #[tokio::test]
    async fn missing_content_type_reads_as_empty_object() {
        let body = extract(None, r#"{"name": "Ada"}"#).await.unwrap();
        assert_eq!(body.0, json!({}));
        assert_eq!(body.field("name"), Value::Null);
    }

    #[tokio::test]
    async fn non_object_body_has_no_fields() {
        let body = extract(Some("application/json"), "[1, 2]").await.unwrap();
        assert_eq!(body.field("title"), Value::Null);
    }

    #[tokio::test]
    async fn syntax_error_is_invalid_body() {
        let err = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
