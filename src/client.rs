//! Typed JSON client over the auth interceptor

use std::sync::Arc;

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::ClientConfig;
use crate::error::Result;
use crate::interceptor::AuthInterceptor;
use crate::transport::HttpRequest;

/// HTTP client with authentication support.
///
/// Every call goes through [`AuthInterceptor`], so credentials, refresh and
/// failure notices are handled uniformly. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ApiClient {
    interceptor: Arc<AuthInterceptor>,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, interceptor: Arc<AuthInterceptor>) -> Self {
        Self {
            interceptor,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn interceptor(&self) -> &Arc<AuthInterceptor> {
        &self.interceptor
    }

    pub async fn request<T, R>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&T>,
    ) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.config.endpoint_url(endpoint);
        let mut request = HttpRequest::new(method, url);
        if let Some(data) = payload {
            request = request.with_json(serde_json::to_value(data)?);
        }

        let response = self.interceptor.execute(request).await?;
        response.json()
    }

    pub async fn get<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        self.request::<(), R>(Method::GET, endpoint, None).await
    }

    pub async fn post<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(payload)).await
    }

    pub async fn put<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::PUT, endpoint, Some(payload)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        self.request::<(), serde_json::Value>(Method::DELETE, endpoint, None)
            .await
            .map(|_| ())
    }

    /// Fetch a binary resource such as an attachment
    pub async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>> {
        let request = HttpRequest::new(Method::GET, self.config.endpoint_url(endpoint));
        let response = self.interceptor.execute(request).await?;
        Ok(response.body)
    }
}
