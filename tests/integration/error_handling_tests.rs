//! Error handling integration tests
//!
//! Maps every error variant to its HTTP status and checks the JSON body.

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use shortener_rs::ShortenerError;

    // ===== Status codes =====

    #[test]
    fn test_client_errors() {
        assert_eq!(
            ShortenerError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ShortenerError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ShortenerError::gone("x").status_code(), StatusCode::GONE);
        assert_eq!(
            ShortenerError::crypto("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ShortenerError::forbidden("x").status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_queue_errors_are_unavailable() {
        assert_eq!(
            ShortenerError::QueueFull(100).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ShortenerError::QueueClosed.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ShortenerError::QueueFull(100).to_string(),
            "Deletion queue is full (capacity 100)"
        );
    }

    #[test]
    fn test_server_errors() {
        assert_eq!(
            ShortenerError::storage("db down").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ShortenerError::config("bad").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    // ===== Response bodies =====

    #[actix_web::test]
    async fn test_storage_details_are_hidden() {
        let response = ShortenerError::storage("password=hunter2").error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"]["code"], "STORAGE_ERROR");
        assert!(!body.windows(7).any(|w| w == b"hunter2"));
    }

    #[actix_web::test]
    async fn test_bad_request_message_is_kept() {
        let response = ShortenerError::bad_request("Malformed request body").error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(
            json["error"]["message"]
                .as_str()
                .unwrap()
                .contains("Malformed request body")
        );
        assert!(json["error"]["timestamp"].as_i64().unwrap() > 0);
    }
}
