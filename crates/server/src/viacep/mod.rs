//! `ViaCEP` postal code lookup client.
//!
//! `ViaCEP` (<https://viacep.com.br>) is a free public web service that
//! resolves a Brazilian CEP to its address:
//!
//! ```text
//! GET https://viacep.com.br/ws/37540000/json/
//! ```
//!
//! The client is only called on a cache miss; the customer service stores
//! whatever it returns so the same CEP is never fetched twice.

mod types;

pub use types::ViaCepAddress;

use std::sync::Arc;

use reqwest::header::ACCEPT;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use customer_registry_core::{Address, PostalCode};

use crate::config::ViaCepConfig;

/// Errors that can occur when interacting with `ViaCEP`.
#[derive(Debug, Error)]
pub enum ViaCepError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// `ViaCEP` returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response was JSON but not an address for the requested CEP.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),

    /// `ViaCEP` does not know this (well-formed) CEP.
    #[error("postal code not found: {0}")]
    NotFound(PostalCode),
}

/// Client for the `ViaCEP` web service.
#[derive(Clone)]
pub struct ViaCepClient {
    inner: Arc<ViaCepClientInner>,
}

struct ViaCepClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// Create a new `ViaCEP` client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ViaCepConfig) -> Result<Self, ViaCepError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ViaCepClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_owned(),
            }),
        })
    }

    fn endpoint(&self, postal_code: &PostalCode) -> String {
        format!("{}/{postal_code}/json/", self.inner.base_url)
    }

    /// Resolve a postal code to its address.
    ///
    /// # Errors
    ///
    /// Returns `ViaCepError::NotFound` if `ViaCEP` does not know the CEP, and
    /// the other variants if the service could not be reached or answered
    /// with something other than an address.
    #[instrument(skip(self), fields(postal_code = %postal_code))]
    pub async fn lookup(&self, postal_code: &PostalCode) -> Result<Address, ViaCepError> {
        let response = self
            .inner
            .client
            .get(self.endpoint(postal_code))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ViaCepError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let address = parse_address(&body, postal_code)?;
        debug!(city = %address.city, state = %address.state, "ViaCEP resolved postal code");

        Ok(address)
    }
}

/// Decode a `ViaCEP` body into an address for `requested`.
fn parse_address(body: &str, requested: &PostalCode) -> Result<Address, ViaCepError> {
    let value: Value = serde_json::from_str(body)?;

    // Unknown CEPs come back as 200 with {"erro": true} (or "true")
    if value.get("erro").is_some_and(is_error_flag) {
        return Err(ViaCepError::NotFound(requested.clone()));
    }

    let found: ViaCepAddress = serde_json::from_value(value)?;
    let echoed = PostalCode::parse(&found.cep).map_err(|e| {
        ViaCepError::UnexpectedPayload(format!("invalid cep '{}': {e}", found.cep))
    })?;
    if &echoed != requested {
        return Err(ViaCepError::UnexpectedPayload(format!(
            "asked for {requested}, got {echoed}"
        )));
    }

    Ok(found.into_address(echoed))
}

fn is_error_flag(value: &Value) -> bool {
    matches!(value, Value::Bool(true)) || value.as_str() == Some("true")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::{Router, extract::Path, http::StatusCode, routing::get};
    use url::Url;

    use super::*;

    const OURO_FINO: &str = r#"{
        "cep": "37540-000",
        "logradouro": "",
        "complemento": "",
        "unidade": "",
        "bairro": "",
        "localidade": "Ouro Fino",
        "uf": "MG",
        "estado": "Minas Gerais",
        "regiao": "Sudeste",
        "ibge": "3146206",
        "gia": "",
        "ddd": "35",
        "siafi": "4925"
    }"#;

    const PRACA_DA_SE: &str = r#"{
        "cep": "01001-000",
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "bairro": "Sé",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308",
        "gia": "1004",
        "ddd": "11",
        "siafi": "7107"
    }"#;

    fn cep(s: &str) -> PostalCode {
        PostalCode::parse(s).unwrap()
    }

    fn config(base_url: &str) -> ViaCepConfig {
        ViaCepConfig {
            base_url: Url::parse(base_url).unwrap(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Serve `router` on an ephemeral port and return its `/ws` root.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/ws")
    }

    #[test]
    fn test_parse_city_level_cep() {
        let address = parse_address(OURO_FINO, &cep("37540000")).unwrap();

        assert_eq!(address.postal_code, cep("37540000"));
        assert_eq!(address.city, "Ouro Fino");
        assert_eq!(address.state, "MG");
        assert_eq!(address.ibge_code, "3146206");
        assert_eq!(address.area_code, "35");
        assert_eq!(address.tax_system_code, "4925");
        assert_eq!(address.street, "");
    }

    #[test]
    fn test_parse_street_level_cep_without_unidade() {
        let address = parse_address(PRACA_DA_SE, &cep("01001000")).unwrap();

        assert_eq!(address.street, "Praça da Sé");
        assert_eq!(address.complement, "lado ímpar");
        assert_eq!(address.neighborhood, "Sé");
        assert_eq!(address.gia_code, "1004");
        assert_eq!(address.unit, "");
    }

    #[test]
    fn test_parse_erro_flag() {
        for body in [r#"{"erro": true}"#, r#"{"erro": "true"}"#] {
            let err = parse_address(body, &cep("99999999")).unwrap_err();
            assert!(matches!(err, ViaCepError::NotFound(ref code) if code.as_str() == "99999999"));
        }
    }

    #[test]
    fn test_parse_mismatched_cep() {
        let err = parse_address(OURO_FINO, &cep("01001000")).unwrap_err();
        assert!(matches!(err, ViaCepError::UnexpectedPayload(_)));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_address("<html>", &cep("01001000")),
            Err(ViaCepError::Parse(_))
        ));
        assert!(matches!(
            parse_address(r#"{"localidade": "X"}"#, &cep("01001000")),
            Err(ViaCepError::Parse(_))
        ));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = ViaCepClient::new(&config("https://viacep.com.br/ws/")).unwrap();
        assert_eq!(
            client.endpoint(&cep("37540000")),
            "https://viacep.com.br/ws/37540000/json/"
        );
    }

    #[tokio::test]
    async fn test_lookup_against_local_server() {
        let router = Router::new().route(
            "/ws/{cep}/json/",
            get(|Path(code): Path<String>| async move {
                if code == "37540000" {
                    (StatusCode::OK, OURO_FINO)
                } else {
                    (StatusCode::OK, r#"{"erro": true}"#)
                }
            }),
        );
        let client = ViaCepClient::new(&config(&serve(router).await)).unwrap();

        let address = client.lookup(&cep("37540000")).await.unwrap();
        assert_eq!(address.city, "Ouro Fino");

        let err = client.lookup(&cep("00000000")).await.unwrap_err();
        assert!(matches!(err, ViaCepError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lookup_server_error() {
        let router = Router::new().route(
            "/ws/{cep}/json/",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let client = ViaCepClient::new(&config(&serve(router).await)).unwrap();

        let err = client.lookup(&cep("37540000")).await.unwrap_err();
        assert!(matches!(
            err,
            ViaCepError::Api { status: 503, ref message } if message == "maintenance"
        ));
    }

    #[tokio::test]
    async fn test_lookup_unreachable() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ViaCepClient::new(&config(&format!("http://{addr}/ws"))).unwrap();
        let err = client.lookup(&cep("37540000")).await.unwrap_err();
        assert!(matches!(err, ViaCepError::Http(_)));
    }
}
