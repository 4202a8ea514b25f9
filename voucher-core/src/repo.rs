//! Repository trait abstracting the voucher backend.
//!
//! The form and list engines talk to the backend only through this trait.
//! The HTTP implementation lives in `voucher-api`; tests substitute an
//! in-memory fake.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    HotelVoucher, HotelVoucherInput, HotelVoucherPatch, ServiceVoucher, ServiceVoucherInput,
    ServiceVoucherPatch,
};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Total item count across all pages
    pub total_count: u64,
}

/// Typed operations over the voucher backend.
///
/// Every write returns the server's canonical object; callers must replace
/// their local draft with it rather than assume the draft was accepted
/// verbatim.
#[async_trait]
pub trait VoucherRepository: Send + Sync {
    async fn list_service_vouchers(&self, page: u32, page_size: u32)
        -> Result<Page<ServiceVoucher>>;

    async fn get_service_voucher(&self, id: u64) -> Result<ServiceVoucher>;

    async fn create_service_voucher(&self, input: &ServiceVoucherInput) -> Result<ServiceVoucher>;

    async fn update_service_voucher(
        &self,
        id: u64,
        patch: &ServiceVoucherPatch,
    ) -> Result<ServiceVoucher>;

    async fn delete_service_voucher(&self, id: u64) -> Result<()>;

    async fn list_hotel_vouchers(&self, page: u32, page_size: u32) -> Result<Page<HotelVoucher>>;

    async fn get_hotel_voucher(&self, id: u64) -> Result<HotelVoucher>;

    async fn create_hotel_voucher(&self, input: &HotelVoucherInput) -> Result<HotelVoucher>;

    async fn update_hotel_voucher(
        &self,
        id: u64,
        patch: &HotelVoucherPatch,
    ) -> Result<HotelVoucher>;

    async fn delete_hotel_voucher(&self, id: u64) -> Result<()>;
}
