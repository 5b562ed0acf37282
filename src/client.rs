//! The `Fetcher` instance and the error/result assembler.

use std::sync::Arc;

use crate::config::{ErrorObserver, FetcherConfig, RequestConfig};
use crate::error::FetchError;
use crate::execution::transport::{
    HttpTransport, ReqwestTransport, TransportRequest, resolve_url,
};
use crate::execution::{headers, request, response};
use crate::types::{FetchData, FetchResponse, ResponseType};
use crate::validation::{ValidationOutcome, standard_validate};

/// A configured request executor.
///
/// Cheap to clone and safe to share across tasks: the configuration is
/// read-only after construction and the transport is shared behind an
/// `Arc`. Each call performs exactly one outbound request.
#[derive(Clone)]
pub struct Fetcher {
    config: Arc<FetcherConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl Fetcher {
    /// Create an instance backed by the default reqwest transport.
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            config: Arc::new(config),
            transport: Arc::new(ReqwestTransport::new()),
        }
    }

    /// Replace the transport (tests, custom client stacks).
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Execute one request.
    ///
    /// With the effective `throw_on_error` off (the default), failures come
    /// back as `Ok(FetchResponse::Failure { .. })` and the `Err` arm is
    /// never taken; with it on, the observers fire (instance first, then
    /// call) and the error is returned as `Err`. `InvalidArgument` is a
    /// programmer-error guard and is always `Err`, observers untouched.
    pub async fn fetch(&self, request: RequestConfig) -> Result<FetchResponse, FetchError> {
        let throw_on_error = request
            .throw_on_error
            .unwrap_or(self.config.throw_on_error);
        let call_observer = request.on_error_thrown.clone();

        match self.execute(request).await {
            Ok(success) => Ok(success),
            Err(error @ FetchError::InvalidArgument(_)) => Err(error),
            Err(error) => {
                if throw_on_error {
                    self.notify_observers(&call_observer, &error);
                    Err(error)
                } else {
                    Ok(FetchResponse::from(error))
                }
            }
        }
    }

    /// Both observers fire, instance-level first, exactly once each.
    fn notify_observers(&self, call_observer: &Option<ErrorObserver>, error: &FetchError) {
        if let Some(observer) = &self.config.on_error_thrown {
            observer(error);
        }
        if let Some(observer) = call_observer {
            observer(error);
        }
    }

    async fn execute(&self, config: RequestConfig) -> Result<FetchResponse, FetchError> {
        let RequestConfig {
            method,
            url,
            body,
            response_type,
            schema,
            headers: call_headers,
            header_merge_strategy,
            signal,
            transport_options,
            ..
        } = config;

        let encoded = request::resolve_body(&method, body)?;
        let method = request::parse_method(&method)?;
        let multipart = encoded.as_ref().is_some_and(|body| body.is_multipart());

        let merged = headers::merge_header_maps(
            &self.config.headers,
            call_headers.as_ref(),
            header_merge_strategy,
        );
        let header_map = headers::build_header_map(&merged, multipart);

        let url = resolve_url(&url, &self.config.base_url);
        tracing::debug!(%url, method = %method, "executing request");

        let raw = self
            .transport
            .send(TransportRequest {
                url,
                method,
                headers: header_map,
                body: encoded,
                options: transport_options,
                signal,
            })
            .await?;

        let response_headers = headers::headermap_to_hashmap(&raw.headers);

        if !(200..300).contains(&raw.status) {
            return Err(FetchError::Http {
                status_code: raw.status,
                headers: response_headers,
                data: response::decode_error_body(&raw.body),
            });
        }

        let mut data = response::decode_body(&raw.body, response_type)?;

        if let Some(schema) = schema {
            if let Some(input) = validation_input(&data) {
                match standard_validate(schema.as_ref(), &input).await {
                    ValidationOutcome::Success { data: validated } => {
                        data = validated_data(response_type, validated);
                    }
                    ValidationOutcome::Failure { issues } => {
                        return Err(FetchError::Validation {
                            status_code: raw.status,
                            headers: response_headers,
                            data,
                            issues,
                        });
                    }
                }
            }
        }

        Ok(FetchResponse::Success {
            status_code: raw.status,
            headers: response_headers,
            data,
        })
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(FetcherConfig::default())
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher").field("config", &self.config).finish()
    }
}

/// Validator input for the decoded body. Binary responses are never
/// validated; text responses validate as a JSON string value.
fn validation_input(data: &FetchData) -> Option<serde_json::Value> {
    match data {
        FetchData::Json(value) => Some(value.clone()),
        FetchData::Text(text) => Some(serde_json::Value::String(text.clone())),
        FetchData::Bytes(_) | FetchData::Null => None,
    }
}

/// Keep the declared shape when a validator hands back a transformed value.
fn validated_data(response_type: ResponseType, validated: serde_json::Value) -> FetchData {
    match (response_type, validated) {
        (ResponseType::Text, serde_json::Value::String(text)) => FetchData::Text(text),
        (_, value) => FetchData::Json(value),
    }
}
