//! Entity model for service and hotel vouchers.
//!
//! This module defines the aggregate shapes exchanged with the backend API
//! and the pure derivation helpers (display labels, room totals, night
//! counts, day renumbering) that the form state engine applies after every
//! mutation. Enum fields serialize as their backend codes (`"DBL"`,
//! `"TRANSFER"`, ...) and deserialize strictly: an unrecognized code is an
//! error, never a silent default.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::VoucherError;

/// Room category codes used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomType {
    Sgl,
    Dbl,
    Twn,
    Tpl,
}

impl RoomType {
    /// Wire code for this room type
    pub fn code(&self) -> &'static str {
        match self {
            RoomType::Sgl => "SGL",
            RoomType::Dbl => "DBL",
            RoomType::Twn => "TWN",
            RoomType::Tpl => "TPL",
        }
    }

    /// Human-readable label, matching the backend's choice list
    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Sgl => "Single",
            RoomType::Dbl => "Double",
            RoomType::Twn => "Twin",
            RoomType::Tpl => "Triple",
        }
    }
}

impl FromStr for RoomType {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SGL" => Ok(RoomType::Sgl),
            "DBL" => Ok(RoomType::Dbl),
            "TWN" => Ok(RoomType::Twn),
            "TPL" => Ok(RoomType::Tpl),
            other => Err(VoucherError::UnknownEnumValue {
                kind: "room type",
                value: other.to_string(),
            }),
        }
    }
}

/// Activity category codes for itinerary entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    Transfer,
    Tour,
    Checkin,
    Checkout,
    Meal,
    Free,
    Other,
}

impl ActivityType {
    /// Wire code for this activity type
    pub fn code(&self) -> &'static str {
        match self {
            ActivityType::Transfer => "TRANSFER",
            ActivityType::Tour => "TOUR",
            ActivityType::Checkin => "CHECKIN",
            ActivityType::Checkout => "CHECKOUT",
            ActivityType::Meal => "MEAL",
            ActivityType::Free => "FREE",
            ActivityType::Other => "OTHER",
        }
    }

    /// Human-readable label, matching the backend's choice list
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Transfer => "Transfer",
            ActivityType::Tour => "Tour/Activity",
            ActivityType::Checkin => "Hotel Check-in",
            ActivityType::Checkout => "Hotel Check-out",
            ActivityType::Meal => "Meal",
            ActivityType::Free => "Free Time",
            ActivityType::Other => "Other",
        }
    }
}

impl FromStr for ActivityType {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRANSFER" => Ok(ActivityType::Transfer),
            "TOUR" => Ok(ActivityType::Tour),
            "CHECKIN" => Ok(ActivityType::Checkin),
            "CHECKOUT" => Ok(ActivityType::Checkout),
            "MEAL" => Ok(ActivityType::Meal),
            "FREE" => Ok(ActivityType::Free),
            "OTHER" => Ok(ActivityType::Other),
            other => Err(VoucherError::UnknownEnumValue {
                kind: "activity type",
                value: other.to_string(),
            }),
        }
    }
}

/// Transfer arrangement codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    Private,
    Shared,
    Group,
}

impl TransferType {
    /// Wire code for this transfer type
    pub fn code(&self) -> &'static str {
        match self {
            TransferType::Private => "PRIVATE",
            TransferType::Shared => "SHARED",
            TransferType::Group => "GROUP",
        }
    }

    /// Human-readable label, matching the backend's choice list
    pub fn label(&self) -> &'static str {
        match self {
            TransferType::Private => "Private Transfer",
            TransferType::Shared => "Shared Transfer",
            TransferType::Group => "Group Transfer",
        }
    }
}

impl FromStr for TransferType {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRIVATE" => Ok(TransferType::Private),
            "SHARED" => Ok(TransferType::Shared),
            "GROUP" => Ok(TransferType::Group),
            other => Err(VoucherError::UnknownEnumValue {
                kind: "transfer type",
                value: other.to_string(),
            }),
        }
    }
}

/// Meal plan codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealPlan {
    Bb,
    Hb,
    Fb,
    Ai,
}

impl MealPlan {
    /// Wire code for this meal plan
    pub fn code(&self) -> &'static str {
        match self {
            MealPlan::Bb => "BB",
            MealPlan::Hb => "HB",
            MealPlan::Fb => "FB",
            MealPlan::Ai => "AI",
        }
    }

    /// Human-readable label, matching the backend's choice list
    pub fn label(&self) -> &'static str {
        match self {
            MealPlan::Bb => "Bed and Breakfast",
            MealPlan::Hb => "Half Board",
            MealPlan::Fb => "Full Board",
            MealPlan::Ai => "All Inclusive",
        }
    }
}

impl FromStr for MealPlan {
    type Err = VoucherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BB" => Ok(MealPlan::Bb),
            "HB" => Ok(MealPlan::Hb),
            "FB" => Ok(MealPlan::Fb),
            "AI" => Ok(MealPlan::Ai),
            other => Err(VoucherError::UnknownEnumValue {
                kind: "meal plan",
                value: other.to_string(),
            }),
        }
    }
}

// Wire representation for all four enums is the bare code string. Serde is
// routed through code()/FromStr so a malformed server value surfaces as an
// UnknownEnumValue message rather than defaulting.
macro_rules! impl_enum_serde {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = String::deserialize(deserializer)?;
                code.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_enum_serde!(RoomType);
impl_enum_serde!(ActivityType);
impl_enum_serde!(TransferType);
impl_enum_serde!(MealPlan);

/// The lead traveler attached to a service voucher.
///
/// Owned exclusively by its parent voucher; identity is assigned by the
/// server on first persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Traveler {
    /// Server-assigned identity (absent until persisted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Full name of the lead traveler
    pub name: String,

    /// Number of adults in the party (at least 1)
    pub num_adults: u32,

    /// Number of children in the party
    #[serde(default)]
    pub num_children: u32,

    /// Number of infants in the party
    #[serde(default)]
    pub num_infants: u32,

    /// Contact e-mail address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,

    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

impl Default for Traveler {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            num_adults: 1,
            num_children: 0,
            num_infants: 0,
            contact_email: None,
            contact_phone: None,
        }
    }
}

/// One room line on a service voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAllocation {
    /// Server-assigned identity (absent until persisted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Room category code
    pub room_type: RoomType,

    /// Display label derived from `room_type`; never edited directly
    #[serde(default)]
    pub room_type_display: String,

    /// Number of rooms of this type (at least 1)
    pub quantity: u32,

    /// Adults assigned to this room line
    #[serde(default)]
    pub num_adults: u32,

    /// Children assigned to this room line
    #[serde(default)]
    pub num_children: u32,

    /// Infants assigned to this room line
    #[serde(default)]
    pub num_infants: u32,
}

impl RoomAllocation {
    /// Create a room line of the given type with its display label in sync.
    pub fn new(room_type: RoomType, quantity: u32) -> Self {
        Self {
            id: None,
            room_type,
            room_type_display: room_type.label().to_string(),
            quantity,
            num_adults: 0,
            num_children: 0,
            num_infants: 0,
        }
    }

    /// Recompute the display label from the current room type.
    pub fn refresh_display(&mut self) {
        self.room_type_display = self.room_type.label().to_string();
    }
}

/// A single timed entry within an itinerary day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryActivity {
    /// Server-assigned identity (absent until persisted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Time of day as an `HH:MM` string, as carried on the wire
    pub time: String,

    /// Activity category code
    pub activity_type: ActivityType,

    /// Display label derived from `activity_type`; never edited directly
    #[serde(default)]
    pub activity_type_display: String,

    /// What happens at this point of the day
    pub description: String,

    /// Where it happens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Free-form operator notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ItineraryActivity {
    /// Recompute the display label from the current activity type.
    pub fn refresh_display(&mut self) {
        self.activity_type_display = self.activity_type.label().to_string();
    }
}

impl Default for ItineraryActivity {
    fn default() -> Self {
        Self {
            id: None,
            time: String::new(),
            activity_type: ActivityType::Other,
            activity_type_display: ActivityType::Other.label().to_string(),
            description: String::new(),
            location: None,
            notes: None,
        }
    }
}

/// One day of a voucher's itinerary.
///
/// `day` always equals the item's 1-based position within the voucher's
/// itinerary sequence; removals renumber the suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryItem {
    /// Server-assigned identity (absent until persisted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// 1-based day number within the itinerary
    pub day: u32,

    /// Calendar date of this day
    pub date: NaiveDate,

    /// Timed entries for the day; an empty day is a valid state
    #[serde(default)]
    pub activities: Vec<ItineraryActivity>,
}

/// A persisted service voucher as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceVoucher {
    /// Server-assigned identity
    pub id: u64,

    /// Lead traveler and party composition
    pub traveler: Traveler,

    /// Room lines, in entry order
    #[serde(default)]
    pub room_allocations: Vec<RoomAllocation>,

    /// Day-by-day itinerary
    #[serde(default)]
    pub itinerary_items: Vec<ItineraryItem>,

    /// First day of travel
    pub travel_start_date: NaiveDate,

    /// Last day of travel (never before the start date)
    pub travel_end_date: NaiveDate,

    /// Agency reservation reference; immutable after creation
    pub reservation_number: String,

    /// Name of the booked hotel
    pub hotel_name: String,

    /// Hotel-side confirmation reference
    #[serde(default)]
    pub hotel_confirmation_number: String,

    /// Transfer arrangement
    pub transfer_type: TransferType,

    /// Display label derived from `transfer_type`
    #[serde(default)]
    pub transfer_type_display: String,

    /// Meal plan
    pub meal_plan: MealPlan,

    /// Display label derived from `meal_plan`
    #[serde(default)]
    pub meal_plan_display: String,

    /// Package inclusions as sentence-separated free text
    #[serde(default)]
    pub inclusions: String,

    /// Arrival flight/transport details
    #[serde(default)]
    pub arrival_details: String,

    /// Departure flight/transport details
    #[serde(default)]
    pub departure_details: String,

    /// Where the party meets its transfer or guide
    #[serde(default)]
    pub meeting_point: String,

    /// Total room count across all allocations; server-derived
    #[serde(default)]
    pub total_rooms: u32,

    /// Server-side creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Server-side last-update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// A draft service voucher, as assembled by the form state engine before
/// the server has assigned identity or canonicalized fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceVoucherInput {
    /// Lead traveler and party composition
    pub traveler: Traveler,

    /// Room lines, in entry order
    pub room_allocations: Vec<RoomAllocation>,

    /// Day-by-day itinerary
    pub itinerary_items: Vec<ItineraryItem>,

    /// First day of travel
    pub travel_start_date: NaiveDate,

    /// Last day of travel
    pub travel_end_date: NaiveDate,

    /// Agency reservation reference
    pub reservation_number: String,

    /// Name of the booked hotel
    pub hotel_name: String,

    /// Hotel-side confirmation reference
    pub hotel_confirmation_number: String,

    /// Transfer arrangement
    pub transfer_type: TransferType,

    /// Meal plan
    pub meal_plan: MealPlan,

    /// Package inclusions as sentence-separated free text
    pub inclusions: String,

    /// Arrival flight/transport details
    pub arrival_details: String,

    /// Departure flight/transport details
    pub departure_details: String,

    /// Where the party meets its transfer or guide
    pub meeting_point: String,

    /// Advisory room total; the server recomputes and its copy wins
    pub total_rooms: u32,
}

impl ServiceVoucherInput {
    /// Empty draft with both travel dates set to the given day.
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            traveler: Traveler::default(),
            room_allocations: Vec::new(),
            itinerary_items: Vec::new(),
            travel_start_date: today,
            travel_end_date: today,
            reservation_number: String::new(),
            hotel_name: String::new(),
            hotel_confirmation_number: String::new(),
            transfer_type: TransferType::Private,
            meal_plan: MealPlan::Bb,
            inclusions: String::new(),
            arrival_details: String::new(),
            departure_details: String::new(),
            meeting_point: String::new(),
            total_rooms: 0,
        }
    }

    /// Draft initialized from a fetched voucher, with server-only fields
    /// stripped.
    pub fn from_voucher(voucher: &ServiceVoucher) -> Self {
        Self {
            traveler: voucher.traveler.clone(),
            room_allocations: voucher.room_allocations.clone(),
            itinerary_items: voucher.itinerary_items.clone(),
            travel_start_date: voucher.travel_start_date,
            travel_end_date: voucher.travel_end_date,
            reservation_number: voucher.reservation_number.clone(),
            hotel_name: voucher.hotel_name.clone(),
            hotel_confirmation_number: voucher.hotel_confirmation_number.clone(),
            transfer_type: voucher.transfer_type,
            meal_plan: voucher.meal_plan,
            inclusions: voucher.inclusions.clone(),
            arrival_details: voucher.arrival_details.clone(),
            departure_details: voucher.departure_details.clone(),
            meeting_point: voucher.meeting_point.clone(),
            total_rooms: voucher.total_rooms,
        }
    }
}

/// Sparse update body for `PATCH /operations/service-vouchers/{id}/`.
///
/// Unset fields are omitted from the wire body and retain their server-side
/// values. Creation-immutable fields (reservation number, traveler identity)
/// have no counterpart here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceVoucherPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traveler: Option<Traveler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_allocations: Option<Vec<RoomAllocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary_items: Option<Vec<ItineraryItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_confirmation_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_type: Option<TransferType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<MealPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rooms: Option<u32>,
}

/// A persisted hotel voucher; a flat record with no itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelVoucher {
    /// Server-assigned identity
    pub id: u64,

    /// Name of the guest the booking is held for
    pub guest_name: String,

    /// Name of the hotel
    pub hotel_name: String,

    /// Street address of the hotel
    #[serde(default)]
    pub hotel_address: String,

    /// Check-in date
    pub check_in_date: NaiveDate,

    /// Check-out date
    pub check_out_date: NaiveDate,

    /// Night count derived from the two dates; never edited directly
    #[serde(default)]
    pub number_of_nights: u32,

    /// Number of rooms booked (at least 1)
    pub number_of_rooms: u32,

    /// Free-text room category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,

    /// Hotel confirmation reference
    pub confirmation_number: String,

    /// Free-text booking status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A draft hotel voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelVoucherInput {
    pub guest_name: String,
    pub hotel_name: String,
    pub hotel_address: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    /// Derived from the two dates; recomputed whenever either moves
    pub number_of_nights: u32,
    pub number_of_rooms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    pub confirmation_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl HotelVoucherInput {
    /// Empty draft with both stay dates set to the given day.
    pub fn empty(today: NaiveDate) -> Self {
        Self {
            guest_name: String::new(),
            hotel_name: String::new(),
            hotel_address: String::new(),
            check_in_date: today,
            check_out_date: today,
            number_of_nights: 0,
            number_of_rooms: 1,
            room_type: None,
            confirmation_number: String::new(),
            status: None,
        }
    }

    /// Draft initialized from a fetched hotel voucher.
    pub fn from_voucher(voucher: &HotelVoucher) -> Self {
        Self {
            guest_name: voucher.guest_name.clone(),
            hotel_name: voucher.hotel_name.clone(),
            hotel_address: voucher.hotel_address.clone(),
            check_in_date: voucher.check_in_date,
            check_out_date: voucher.check_out_date,
            number_of_nights: voucher.number_of_nights,
            number_of_rooms: voucher.number_of_rooms,
            room_type: voucher.room_type.clone(),
            confirmation_number: voucher.confirmation_number.clone(),
            status: voucher.status.clone(),
        }
    }
}

/// Sparse update body for `PATCH /operations/hotel-vouchers/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HotelVoucherPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotel_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_nights: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_rooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Sum of `quantity` over all room lines.
pub fn total_rooms(rooms: &[RoomAllocation]) -> u32 {
    rooms.iter().map(|r| r.quantity).sum()
}

/// Whole nights between check-in and check-out.
///
/// A check-out on or before check-in counts as zero nights; the server
/// rejects such stays before they are ever persisted.
pub fn number_of_nights(check_in: NaiveDate, check_out: NaiveDate) -> u32 {
    (check_out - check_in).num_days().max(0) as u32
}

/// Restore the 1-based `day` numbering after an insertion or removal.
pub fn renumber_days(items: &mut [ItineraryItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.day = index as u32 + 1;
    }
}
