use api_types::{
    ErrorResponse, MessageResponse,
    auth::{
        AuthResponse, ForgotPassword, Login, ProfileUpdate, Register, ResetPassword, User,
        VerifyEmail,
    },
    lookup::ExchangeRates,
    summary::{SummaryQuery, SummaryResponse},
    transaction::{RowsQuery, Transaction, TransactionDraft, TransactionPage},
};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::{AppError, Result};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("server unreachable: {0}")]
    Transport(reqwest::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        // `Url::join` replaces the last segment unless the base ends with `/`.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| AppError::BaseUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    pub async fn login(&self, payload: &Login) -> ClientResult<AuthResponse> {
        let req = self.http.post(self.endpoint("login")?).json(payload);
        send_json(req).await
    }

    pub async fn register(&self, payload: &Register) -> ClientResult<AuthResponse> {
        let req = self.http.post(self.endpoint("register")?).json(payload);
        send_json(req).await
    }

    pub async fn logout(&self, token: &str) -> ClientResult<()> {
        let req = self.http.post(self.endpoint("logout")?).bearer_auth(token);
        send_empty(req).await
    }

    pub async fn update_profile(&self, token: &str, payload: &ProfileUpdate) -> ClientResult<User> {
        let req = self
            .http
            .put(self.endpoint("user")?)
            .bearer_auth(token)
            .json(payload);
        send_json(req).await
    }

    pub async fn forgot_password(&self, payload: &ForgotPassword) -> ClientResult<MessageResponse> {
        let req = self.http.post(self.endpoint("forgot-password")?).json(payload);
        send_json(req).await
    }

    pub async fn reset_password(&self, payload: &ResetPassword) -> ClientResult<MessageResponse> {
        let req = self.http.post(self.endpoint("reset-password")?).json(payload);
        send_json(req).await
    }

    /// Verification links may be opened before or after logging in.
    pub async fn verify_email(
        &self,
        token: Option<&str>,
        payload: &VerifyEmail,
    ) -> ClientResult<MessageResponse> {
        let mut req = self.http.post(self.endpoint("verify-email")?).json(payload);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        send_json(req).await
    }

    pub async fn transactions_list(
        &self,
        token: &str,
        query: &RowsQuery,
    ) -> ClientResult<TransactionPage> {
        let req = self
            .http
            .get(self.endpoint("transactions")?)
            .bearer_auth(token)
            .query(&query.query_pairs());
        send_json(req).await
    }

    pub async fn transactions_summary(
        &self,
        token: &str,
        query: &SummaryQuery,
    ) -> ClientResult<SummaryResponse> {
        let req = self
            .http
            .get(self.endpoint("transactions/summary")?)
            .bearer_auth(token)
            .query(&query.query_pairs());
        send_json(req).await
    }

    pub async fn transaction_create(
        &self,
        token: &str,
        payload: &TransactionDraft,
    ) -> ClientResult<Transaction> {
        let req = self
            .http
            .post(self.endpoint("transactions")?)
            .bearer_auth(token)
            .json(payload);
        send_json(req).await
    }

    pub async fn transaction_update(
        &self,
        token: &str,
        id: u64,
        payload: &TransactionDraft,
    ) -> ClientResult<Transaction> {
        let req = self
            .http
            .put(self.endpoint(&format!("transactions/{id}"))?)
            .bearer_auth(token)
            .json(payload);
        send_json(req).await
    }

    pub async fn transaction_delete(&self, token: &str, id: u64) -> ClientResult<()> {
        let req = self
            .http
            .delete(self.endpoint(&format!("transactions/{id}"))?)
            .bearer_auth(token);
        send_empty(req).await
    }

    pub async fn transaction_types(&self, token: &str) -> ClientResult<Vec<String>> {
        let req = self
            .http
            .get(self.endpoint("transactions/types")?)
            .bearer_auth(token);
        send_json(req).await
    }

    pub async fn currencies(&self, token: &str) -> ClientResult<Vec<String>> {
        let req = self.http.get(self.endpoint("currencies")?).bearer_auth(token);
        send_json(req).await
    }

    pub async fn exchange_rates(&self, token: &str) -> ClientResult<ExchangeRates> {
        let req = self
            .http
            .get(self.endpoint("exchange-rates")?)
            .bearer_auth(token);
        send_json(req).await
    }
}

async fn send(req: RequestBuilder) -> ClientResult<reqwest::Response> {
    let res = req
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(ClientError::Transport)?;

    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status();
    let body = res
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(ErrorResponse::into_message)
        .unwrap_or_else(|| "unknown error".to_string());

    tracing::debug!("request failed with {status}: {body}");

    let err = match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(body),
        422 => ClientError::Validation(body),
        _ => ClientError::Server(body),
    };
    Err(err)
}

async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> ClientResult<T> {
    send(req)
        .await?
        .json::<T>()
        .await
        .map_err(ClientError::Transport)
}

async fn send_empty(req: RequestBuilder) -> ClientResult<()> {
    send(req).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use api_types::transaction::{FilterParams, SortColumn, SortDirection, TransactionKind};
    use axum::{
        Json, Router,
        extract::{RawQuery, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
    };
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    #[derive(Clone, Default)]
    struct Seen {
        query: Arc<Mutex<Option<String>>>,
        auth: Arc<Mutex<Option<String>>>,
    }

    async fn list(
        State(seen): State<Seen>,
        headers: HeaderMap,
        RawQuery(query): RawQuery,
    ) -> Json<serde_json::Value> {
        *seen.query.lock().unwrap() = query;
        *seen.auth.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({
            "data": [{
                "id": 1,
                "kind": "expense",
                "type": "food",
                "amount": 12.5,
                "currency": "EUR",
                "resource": "CASH",
                "date": "2024-01-03",
                "description": null
            }],
            "total": 41,
            "current_page": 1
        }))
    }

    async fn summary() -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthenticated."})),
        )
    }

    async fn login() -> (StatusCode, Json<serde_json::Value>) {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"message": "The provided credentials are incorrect."})),
        )
    }

    async fn serve(seen: Seen) -> Client {
        let app = Router::new()
            .route("/api/transactions", get(list))
            .route("/api/transactions/summary", get(summary))
            .route("/api/login", post(login))
            .with_state(seen);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Client::new(&format!("http://{addr}/api")).unwrap()
    }

    #[tokio::test]
    async fn rows_request_sends_query_and_bearer() {
        let seen = Seen::default();
        let client = serve(seen.clone()).await;

        let query = RowsQuery {
            filters: FilterParams {
                kind: Some(TransactionKind::Expense),
                types: Some(vec!["food".to_string(), "rent".to_string()]),
                currencies: None,
                from: NaiveDate::from_ymd_opt(2024, 1, 1),
                to: None,
            },
            order_by: Some(SortColumn::Amount),
            order_dir: Some(SortDirection::Desc),
            page: 1,
            page_size: 25,
        };
        let page = client.transactions_list("secret", &query).await.unwrap();
        assert_eq!(page.total, 41);
        assert_eq!(page.data[0].tx_type, "food");

        let raw = seen.query.lock().unwrap().clone().unwrap();
        let pairs: Vec<(String, String)> = raw
            .split('&')
            .map(|kv| {
                let (k, v) = kv.split_once('=').unwrap();
                (k.replace("%5B%5D", "[]"), v.to_string())
            })
            .collect();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["kind", "types[]", "types[]", "from", "order_by", "order_dir", "page", "page_size"]
        );
        let values: HashMap<&str, &str> = pairs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(values["from"], "2024-01-01");
        assert_eq!(values["order_dir"], "desc");
        assert_eq!(
            seen.auth.lock().unwrap().as_deref(),
            Some("Bearer secret")
        );
    }

    #[tokio::test]
    async fn status_401_maps_to_unauthorized() {
        let client = serve(Seen::default()).await;
        let err = client
            .transactions_summary("expired", &SummaryQuery::default())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn status_422_carries_server_message() {
        let client = serve(Seen::default()).await;
        let err = client
            .login(&Login {
                email: "a@b.c".to_string(),
                password: "nope".to_string(),
            })
            .await
            .unwrap_err();
        assert!(
            matches!(err, ClientError::Validation(ref msg) if msg == "The provided credentials are incorrect.")
        );
    }

    #[tokio::test]
    async fn missing_route_maps_to_not_found() {
        let client = serve(Seen::default()).await;
        let err = client.currencies("t").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound));
    }

    #[test]
    fn base_url_without_trailing_slash_keeps_prefix() {
        let client = Client::new("http://localhost:8000/api").unwrap();
        assert_eq!(
            client.endpoint("transactions/summary").unwrap().as_str(),
            "http://localhost:8000/api/transactions/summary"
        );
    }
}
