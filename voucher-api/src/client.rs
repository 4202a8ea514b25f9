//! Reqwest-backed voucher repository.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use voucher_core::{
    HotelVoucher, HotelVoucherInput, HotelVoucherPatch, Page, Result, ServiceVoucher,
    ServiceVoucherInput, ServiceVoucherPatch, VoucherError, VoucherRepository,
};

use crate::auth::TokenProvider;
use crate::wire::{DetailEnvelope, Paginated};

const SERVICE_VOUCHERS: &str = "/operations/service-vouchers/";
const HOTEL_VOUCHERS: &str = "/operations/hotel-vouchers/";

/// HTTP client for the voucher backend.
pub struct ApiClient {
    base_url: String,
    http: Client,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Create a client against the given base URL. The token provider is
    /// injected; the client holds no ambient credential state of its own.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: Client::new(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Response> {
        let mut request = self.http.request(method.clone(), url);
        if let Some(token) = self.tokens.token() {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
            .send()
            .await
            .map_err(|e| VoucherError::Network(format!("request to {} failed: {}", url, e)))
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response> {
        let url = self.url(path);
        debug!(%method, %url, "sending API request");

        let response = self.send_once(&method, &url, body.as_ref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check_status(response).await;
        }

        // One refresh-and-retry per request before giving up
        warn!(%url, "request rejected with 401, refreshing credential");
        self.tokens.refresh().await?;
        let retry = self.send_once(&method, &url, body.as_ref()).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            return Err(VoucherError::Unauthorized);
        }
        Self::check_status(retry).await
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(VoucherError::NotFound(response.url().path().to_string()));
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "no response body".to_string());
        Err(VoucherError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response
            .text()
            .await
            .map_err(|e| VoucherError::Network(format!("failed to read response body: {}", e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, None).await?;
        Self::parse(response).await
    }

    async fn write_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let response = self.send(method, path, Some(body)).await?;
        Self::parse(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, None).await?;
        Ok(())
    }
}

#[async_trait]
impl VoucherRepository for ApiClient {
    async fn list_service_vouchers(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ServiceVoucher>> {
        let path = format!("{}?page={}&page_size={}", SERVICE_VOUCHERS, page, page_size);
        let envelope: Paginated<ServiceVoucher> = self.get_json(&path).await?;
        Ok(envelope.into())
    }

    async fn get_service_voucher(&self, id: u64) -> Result<ServiceVoucher> {
        let path = format!("{}{}/", SERVICE_VOUCHERS, id);
        let envelope: DetailEnvelope<ServiceVoucher> = self.get_json(&path).await?;
        Ok(envelope.into_inner())
    }

    async fn create_service_voucher(&self, input: &ServiceVoucherInput) -> Result<ServiceVoucher> {
        self.write_json(Method::POST, SERVICE_VOUCHERS, input).await
    }

    async fn update_service_voucher(
        &self,
        id: u64,
        patch: &ServiceVoucherPatch,
    ) -> Result<ServiceVoucher> {
        let path = format!("{}{}/", SERVICE_VOUCHERS, id);
        self.write_json(Method::PATCH, &path, patch).await
    }

    async fn delete_service_voucher(&self, id: u64) -> Result<()> {
        let path = format!("{}{}/", SERVICE_VOUCHERS, id);
        self.delete(&path).await
    }

    async fn list_hotel_vouchers(&self, page: u32, page_size: u32) -> Result<Page<HotelVoucher>> {
        let path = format!("{}?page={}&page_size={}", HOTEL_VOUCHERS, page, page_size);
        let envelope: Paginated<HotelVoucher> = self.get_json(&path).await?;
        Ok(envelope.into())
    }

    async fn get_hotel_voucher(&self, id: u64) -> Result<HotelVoucher> {
        let path = format!("{}{}/", HOTEL_VOUCHERS, id);
        let envelope: DetailEnvelope<HotelVoucher> = self.get_json(&path).await?;
        Ok(envelope.into_inner())
    }

    async fn create_hotel_voucher(&self, input: &HotelVoucherInput) -> Result<HotelVoucher> {
        self.write_json(Method::POST, HOTEL_VOUCHERS, input).await
    }

    async fn update_hotel_voucher(
        &self,
        id: u64,
        patch: &HotelVoucherPatch,
    ) -> Result<HotelVoucher> {
        let path = format!("{}{}/", HOTEL_VOUCHERS, id);
        self.write_json(Method::PATCH, &path, patch).await
    }

    async fn delete_hotel_voucher(&self, id: u64) -> Result<()> {
        let path = format!("{}{}/", HOTEL_VOUCHERS, id);
        self.delete(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Arc::new(StaticTokenProvider::new("t0ken")))
    }

    #[test]
    fn base_url_trailing_slashes_are_trimmed() {
        let client = client("https://api.example.com/");
        assert_eq!(
            client.url("/operations/service-vouchers/7/"),
            "https://api.example.com/operations/service-vouchers/7/"
        );
    }

    #[test]
    fn list_paths_carry_pagination() {
        let client = client("https://api.example.com");
        let path = format!("{}?page={}&page_size={}", SERVICE_VOUCHERS, 2, 25);
        assert_eq!(
            client.url(&path),
            "https://api.example.com/operations/service-vouchers/?page=2&page_size=25"
        );
    }
}
