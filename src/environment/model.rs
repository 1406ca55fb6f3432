use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::repository::Repository;
use super::transport::{Method, Request, Transport};
use super::types::{AuthInfo, CommentPost, Credentials, Offer, OfferDetail, OfferId, Review};
use crate::error::ApiError;

/// The client for the six cities backend.
///
/// Decorates every request with the persisted token and drops that token
/// when the backend answers 401.
#[derive(Clone)]
pub struct Model {
    transport: Arc<dyn Transport>,
    repository: Repository,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model").finish()
    }
}

impl Model {
    pub fn new(transport: Arc<dyn Transport>, repository: Repository) -> Self {
        Self {
            transport,
            repository,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::Get, path, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.request(Method::Post, path, Some(body)).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        log::trace!("{method:?} {path}");
        let request = Request {
            method,
            path: path.to_string(),
            body,
            token: self.repository.token(),
        };
        match self.transport.send(request).await {
            Err(e) if e.is_unauthorized() => {
                if let Err(e) = self.repository.clear_token() {
                    log::error!("Could not clear token: {e}");
                }
                Err(e)
            }
            other => other,
        }
    }

    pub async fn offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.get("/offers").await.decode("offers")
    }

    pub async fn offer(&self, id: &OfferId) -> Result<OfferDetail, ApiError> {
        self.get(&format!("/offers/{id}")).await.decode("offer")
    }

    pub async fn nearby_offers(&self, id: &OfferId) -> Result<Vec<Offer>, ApiError> {
        self.get(&format!("/offers/{id}/nearby"))
            .await
            .decode("nearby_offers")
    }

    pub async fn comments(&self, id: &OfferId) -> Result<Vec<Review>, ApiError> {
        self.get(&format!("/comments/{id}")).await.decode("comments")
    }

    pub async fn post_comment(&self, id: &OfferId, post: &CommentPost) -> Result<Review, ApiError> {
        let body = serde_json::to_value(post).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.post(&format!("/comments/{id}"), body)
            .await
            .decode("post_comment")
    }

    pub async fn set_favorite(&self, id: &OfferId, on: bool) -> Result<Offer, ApiError> {
        let status = u8::from(on);
        self.request(Method::Post, &format!("/favorite/{id}/{status}"), None)
            .await
            .decode("set_favorite")
    }

    pub async fn favorites(&self) -> Result<Vec<Offer>, ApiError> {
        self.get("/favorite").await.decode("favorites")
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthInfo, ApiError> {
        log::trace!("Login {}", credentials.email);
        let body =
            serde_json::to_value(credentials).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.post("/login", body).await.decode("login")
    }

    pub async fn check_session(&self) -> Result<AuthInfo, ApiError> {
        self.get("/login").await.decode("check_session")
    }
}

trait DecodeExt {
    fn decode<T: DeserializeOwned>(self, call: &'static str) -> Result<T, ApiError>;
}

impl DecodeExt for Result<Value, ApiError> {
    fn decode<T: DeserializeOwned>(self, call: &'static str) -> Result<T, ApiError> {
        let value = self?;
        serde_json::from_value(value).map_err(|e| {
            log::error!("{call}: {e:?}");
            ApiError::Decode(format!("{call}: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::transport::MockTransport;
    use crate::environment::types::{fixtures, SupportedCity};
    use serde_json::json;

    fn model() -> (Model, MockTransport, Repository) {
        let transport = MockTransport::new();
        let repository = Repository::in_memory();
        let model = Model::new(Arc::new(transport.clone()), repository.clone());
        (model, transport, repository)
    }

    #[tokio::test]
    async fn attaches_token_when_present() {
        let (model, transport, repository) = model();
        transport.respond(Method::Get, "/offers", Ok(json!([])));

        model.offers().await.unwrap();
        assert_eq!(transport.last_request().unwrap().token, None);

        repository.set_token("secret-token").unwrap();
        model.offers().await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().token.as_deref(),
            Some("secret-token")
        );
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_propagates() {
        let (model, transport, repository) = model();
        repository.set_token("expired").unwrap();
        transport.respond(
            Method::Get,
            "/login",
            Err(ApiError::Status {
                status: 401,
                body: None,
            }),
        );

        let result = model.check_session().await;
        assert!(matches!(result, Err(ref e) if e.is_unauthorized()));
        assert_eq!(repository.token(), None);
    }

    #[tokio::test]
    async fn other_failures_keep_token() {
        let (model, transport, repository) = model();
        repository.set_token("valid").unwrap();
        transport.respond(
            Method::Get,
            "/favorite",
            Err(ApiError::Status {
                status: 500,
                body: None,
            }),
        );

        assert!(model.favorites().await.is_err());
        assert_eq!(repository.token().as_deref(), Some("valid"));
    }

    #[tokio::test]
    async fn favorite_and_comment_requests_use_backend_paths() {
        let (model, transport, _) = model();
        let offer = fixtures::offer("7", SupportedCity::Paris);
        let review = fixtures::review("r1", "2024-05-08T14:13:56.569Z");
        transport.respond(
            Method::Post,
            "/favorite/7/1",
            Ok(serde_json::to_value(&offer).unwrap()),
        );
        transport.respond(
            Method::Post,
            "/comments/7",
            Ok(serde_json::to_value(&review).unwrap()),
        );

        let id = OfferId::from("7");
        assert_eq!(model.set_favorite(&id, true).await.unwrap(), offer);
        let posted = model
            .post_comment(&id, &CommentPost::new("x".repeat(60), 4))
            .await
            .unwrap();
        assert_eq!(posted, review);

        let body = transport.last_request().unwrap().body.unwrap();
        assert_eq!(body["rating"], json!(4));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (model, transport, _) = model();
        transport.respond(Method::Get, "/offers", Ok(json!({"not": "a list"})));
        assert!(matches!(model.offers().await, Err(ApiError::Decode(_))));
    }
}
