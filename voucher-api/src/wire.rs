//! Wire-schema envelope types.
//!
//! The backend wraps listings in a count/next/previous/results envelope and,
//! on one legacy API version, wraps detail responses in a keyed object.
//! Both shapes are normalized here so the client never leaks them.

use serde::Deserialize;

use voucher_core::Page;

/// Paginated listing envelope: `{ count, next, previous, results }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> From<Paginated<T>> for Page<T> {
    fn from(envelope: Paginated<T>) -> Self {
        Page {
            items: envelope.results,
            total_count: envelope.count,
        }
    }
}

/// Detail response that is either the bare object or a legacy keyed wrapper
/// (`{ "service_voucher": ... }` / `{ "hotel_voucher": ... }`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DetailEnvelope<T> {
    WrappedService { service_voucher: T },
    WrappedHotel { hotel_voucher: T },
    Bare(T),
}

impl<T> DetailEnvelope<T> {
    /// The payload, whichever shape carried it.
    pub fn into_inner(self) -> T {
        match self {
            DetailEnvelope::WrappedService { service_voucher } => service_voucher,
            DetailEnvelope::WrappedHotel { hotel_voucher } => hotel_voucher,
            DetailEnvelope::Bare(inner) => inner,
        }
    }
}
