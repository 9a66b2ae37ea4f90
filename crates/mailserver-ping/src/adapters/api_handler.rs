//! # API Gateway Request Handler
//!
//! Shapes JSON-RPC requests into `PingQuery` calls and results back into JSON.
//! The transport itself belongs to the host.
//!
//! ## Supported Methods
//!
//! - `mailservers_ping` - probe enode URLs
//! - `mailservers_multiAddressPing` - probe multiaddrs
//!
//! Params are either the query object or a one-element array holding it:
//!
//! ```json
//! {"addresses": ["enode://...@10.0.0.1:30303"], "timeoutMs": 500}
//! ```

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::domain::Scheme;
use crate::ports::{PingApi, PingQuery};

pub const METHOD_PING: &str = "mailservers_ping";
pub const METHOD_MULTIADDRESS_PING: &str = "mailservers_multiAddressPing";

/// JSON-RPC error codes used by the handler.
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

/// API query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiQueryError {
    pub code: i32,
    pub message: String,
}

impl ApiQueryError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// API Gateway request handler.
pub struct ApiGatewayHandler<S> {
    service: S,
}

impl<S: PingApi> ApiGatewayHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Handle one request, honouring `cancel` for the in-flight batch.
    pub async fn handle(
        &self,
        method: &str,
        params: &Value,
        cancel: CancellationToken,
    ) -> Result<Value, ApiQueryError> {
        let scheme = match method {
            METHOD_PING => Scheme::Enode,
            METHOD_MULTIADDRESS_PING => Scheme::Multiaddr,
            _ => {
                return Err(ApiQueryError::new(
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", method),
                ))
            }
        };

        let query = parse_query(params)?;
        let results = self
            .service
            .ping_scheme(query, scheme, cancel)
            .await
            .map_err(|e| ApiQueryError::new(INTERNAL_ERROR, e.to_string()))?;

        serde_json::to_value(results).map_err(|e| ApiQueryError::new(INTERNAL_ERROR, e.to_string()))
    }
}

fn parse_query(params: &Value) -> Result<PingQuery, ApiQueryError> {
    let object = match params {
        Value::Array(items) if items.len() == 1 => &items[0],
        Value::Array(items) => {
            return Err(ApiQueryError::new(
                INVALID_PARAMS,
                format!("expected 1 positional param, got {}", items.len()),
            ))
        }
        other => other,
    };

    serde_json::from_value(object.clone())
        .map_err(|e| ApiQueryError::new(INVALID_PARAMS, format!("Invalid params: {}", e)))
}

/// Handle an API query routed to this subsystem.
pub async fn handle_api_query<S: PingApi>(
    handler: &ApiGatewayHandler<S>,
    method: &str,
    params: &Value,
) -> Result<Value, ApiQueryError> {
    handler
        .handle(method, params, CancellationToken::new())
        .await
}
