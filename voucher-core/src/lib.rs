//! Core types and logic for the voucher operations system.
//!
//! This crate provides the voucher entity model, the form state engine used
//! to build and edit voucher drafts, the list/filter engine, the printable
//! document renderer, and the repository trait that abstracts the backend
//! API. Network code lives in `voucher-api`.

mod error;
mod form;
mod list;
mod model;
mod render;
mod repo;

// Re-export core types
pub use error::{Result, VoucherError};
pub use form::{
    ActivityField, FieldPath, FormMode, FormState, HotelFieldPath, HotelVoucherForm, RoomField,
    ServiceVoucherForm,
};
pub use list::{
    derive_status, filter_hotel_vouchers, filter_vouchers, HotelVoucherList, VoucherList,
    VoucherStatus,
};
pub use model::{
    number_of_nights, renumber_days, total_rooms, ActivityType, HotelVoucher, HotelVoucherInput,
    HotelVoucherPatch, ItineraryActivity, ItineraryItem, MealPlan, RoomAllocation, RoomType,
    ServiceVoucher, ServiceVoucherInput, ServiceVoucherPatch, TransferType, Traveler,
};
pub use render::{
    build_document, build_export_filename, render_inclusions, render_itinerary_sorted,
    render_room_summary, DayBlock, VoucherDocument,
};
pub use repo::{Page, VoucherRepository};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
