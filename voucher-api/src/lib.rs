//! HTTP implementation of the voucher repository.
//!
//! This crate talks JSON over HTTPS to the voucher backend and implements
//! `voucher_core::VoucherRepository`. Credentials come from an injected
//! [`TokenProvider`] rather than any ambient global; a `401` response
//! triggers one refresh-and-retry before surfacing `Unauthorized`.

mod auth;
mod client;
mod wire;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use client::ApiClient;
pub use wire::{DetailEnvelope, Paginated};
