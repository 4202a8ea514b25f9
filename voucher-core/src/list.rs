//! List/filter engine for voucher listings.
//!
//! Loading delegates to the repository and caches the last fetched page;
//! filtering is a pure, client-side substring match over that cached page
//! only. Filtering never reaches the server, so it cannot see items beyond
//! the currently loaded page — a deliberate limitation carried over from
//! the listing screens this replaces.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::model::{HotelVoucher, ServiceVoucher};
use crate::repo::{Page, VoucherRepository};

/// Status of a voucher relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoucherStatus {
    Upcoming,
    Active,
    Completed,
}

impl VoucherStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VoucherStatus::Upcoming => "Upcoming",
            VoucherStatus::Active => "Active",
            VoucherStatus::Completed => "Completed",
        }
    }
}

/// Classify a travel window against `today`. Both boundary days count as
/// Active.
pub fn derive_status(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> VoucherStatus {
    if today < start {
        VoucherStatus::Upcoming
    } else if today > end {
        VoucherStatus::Completed
    } else {
        VoucherStatus::Active
    }
}

fn matches(query: &str, fields: &[&str]) -> bool {
    let needle = query.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// Case-insensitive substring filter over traveler name, reservation number
/// and hotel name.
pub fn filter_vouchers<'a>(items: &'a [ServiceVoucher], query: &str) -> Vec<&'a ServiceVoucher> {
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|v| {
            matches(
                query,
                &[&v.traveler.name, &v.reservation_number, &v.hotel_name],
            )
        })
        .collect()
}

/// Case-insensitive substring filter over guest name, hotel name and
/// confirmation number.
pub fn filter_hotel_vouchers<'a>(items: &'a [HotelVoucher], query: &str) -> Vec<&'a HotelVoucher> {
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|v| {
            matches(
                query,
                &[&v.guest_name, &v.hotel_name, &v.confirmation_number],
            )
        })
        .collect()
}

/// Paginated service voucher listing with a one-page cache.
#[derive(Default)]
pub struct VoucherList {
    page: Option<Page<ServiceVoucher>>,
}

impl VoucherList {
    pub fn new() -> Self {
        Self { page: None }
    }

    /// Fetch one page from the repository and cache it. The page is
    /// returned by value so callers can hold it while filtering the cache.
    pub async fn load(
        &mut self,
        repo: &dyn VoucherRepository,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ServiceVoucher>> {
        debug!(page, page_size, "loading service voucher page");
        let loaded = repo.list_service_vouchers(page, page_size).await?;
        self.page = Some(loaded.clone());
        Ok(loaded)
    }

    /// Last loaded page, if any.
    pub fn cached(&self) -> Option<&Page<ServiceVoucher>> {
        self.page.as_ref()
    }

    /// Filter the cached page's items.
    pub fn filter(&self, query: &str) -> Vec<&ServiceVoucher> {
        match &self.page {
            Some(page) => filter_vouchers(&page.items, query),
            None => Vec::new(),
        }
    }
}

/// Paginated hotel voucher listing with a one-page cache.
#[derive(Default)]
pub struct HotelVoucherList {
    page: Option<Page<HotelVoucher>>,
}

impl HotelVoucherList {
    pub fn new() -> Self {
        Self { page: None }
    }

    /// Fetch one page from the repository and cache it. The page is
    /// returned by value so callers can hold it while filtering the cache.
    pub async fn load(
        &mut self,
        repo: &dyn VoucherRepository,
        page: u32,
        page_size: u32,
    ) -> Result<Page<HotelVoucher>> {
        debug!(page, page_size, "loading hotel voucher page");
        let loaded = repo.list_hotel_vouchers(page, page_size).await?;
        self.page = Some(loaded.clone());
        Ok(loaded)
    }

    /// Last loaded page, if any.
    pub fn cached(&self) -> Option<&Page<HotelVoucher>> {
        self.page.as_ref()
    }

    /// Filter the cached page's items.
    pub fn filter(&self, query: &str) -> Vec<&HotelVoucher> {
        match &self.page {
            Some(page) => filter_hotel_vouchers(&page.items, query),
            None => Vec::new(),
        }
    }
}
