//! Form state engine for voucher drafts.
//!
//! A form owns one draft (create or edit mode) and is the single place
//! where derived fields are recomputed: every mutation re-derives display
//! labels, room totals, and day numbering before returning. Field edits go
//! through typed paths, so an invalid path is a compile-time error rather
//! than a runtime string match, and a value that fails coercion is rejected
//! without touching the draft.
//!
//! State machine: `Editing` until a successful `submit` (→ `Submitted`) or
//! a `cancel` (→ `Cancelled`); mutations outside `Editing` fail with
//! `InvalidState`.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Result, VoucherError};
use crate::model::{
    number_of_nights, renumber_days, total_rooms, HotelVoucher, HotelVoucherInput,
    HotelVoucherPatch, ItineraryActivity, ItineraryItem, RoomAllocation, RoomType, ServiceVoucher,
    ServiceVoucherInput, ServiceVoucherPatch,
};
use crate::repo::VoucherRepository;

/// Whether the form creates a new voucher or edits a persisted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    /// Editing the voucher with this server id
    Edit(u64),
}

/// Lifecycle state of a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitted,
    Cancelled,
}

impl FormState {
    fn name(&self) -> &'static str {
        match self {
            FormState::Editing => "editing",
            FormState::Submitted => "submitted",
            FormState::Cancelled => "cancelled",
        }
    }
}

/// Scalar fields of a service voucher draft addressable by `set_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    ReservationNumber,
    HotelName,
    HotelConfirmationNumber,
    TravelStartDate,
    TravelEndDate,
    TransferType,
    MealPlan,
    Inclusions,
    ArrivalDetails,
    DepartureDetails,
    MeetingPoint,
    TravelerName,
    TravelerNumAdults,
    TravelerNumChildren,
    TravelerNumInfants,
    TravelerContactEmail,
    TravelerContactPhone,
}

impl FieldPath {
    /// Fields the business treats as immutable once a voucher exists.
    fn locked_in_edit(&self) -> bool {
        matches!(
            self,
            FieldPath::ReservationNumber
                | FieldPath::TravelerName
                | FieldPath::TravelerNumAdults
                | FieldPath::TravelerNumInfants
        )
    }

    fn name(&self) -> &'static str {
        match self {
            FieldPath::ReservationNumber => "reservation_number",
            FieldPath::HotelName => "hotel_name",
            FieldPath::HotelConfirmationNumber => "hotel_confirmation_number",
            FieldPath::TravelStartDate => "travel_start_date",
            FieldPath::TravelEndDate => "travel_end_date",
            FieldPath::TransferType => "transfer_type",
            FieldPath::MealPlan => "meal_plan",
            FieldPath::Inclusions => "inclusions",
            FieldPath::ArrivalDetails => "arrival_details",
            FieldPath::DepartureDetails => "departure_details",
            FieldPath::MeetingPoint => "meeting_point",
            FieldPath::TravelerName => "traveler.name",
            FieldPath::TravelerNumAdults => "traveler.num_adults",
            FieldPath::TravelerNumChildren => "traveler.num_children",
            FieldPath::TravelerNumInfants => "traveler.num_infants",
            FieldPath::TravelerContactEmail => "traveler.contact_email",
            FieldPath::TravelerContactPhone => "traveler.contact_phone",
        }
    }
}

/// Editable fields of one room allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomField {
    RoomType,
    Quantity,
    NumAdults,
    NumChildren,
    NumInfants,
}

/// Editable fields of one itinerary activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityField {
    Time,
    ActivityType,
    Description,
    Location,
    Notes,
}

fn parse_count(field: &'static str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| VoucherError::InvalidFieldValue { field, value: value.to_string() })
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    value
        .trim()
        .parse::<NaiveDate>()
        .map_err(|_| VoucherError::InvalidFieldValue { field, value: value.to_string() })
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(VoucherError::IndexOutOfRange { index, len });
    }
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Form state engine for a service voucher draft.
pub struct ServiceVoucherForm {
    mode: FormMode,
    state: FormState,
    draft: ServiceVoucherInput,
}

impl ServiceVoucherForm {
    /// Start a create-mode form with an empty draft dated to `today`.
    pub fn create(today: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            state: FormState::Editing,
            draft: ServiceVoucherInput::empty(today),
        }
    }

    /// Start an edit-mode form from a fetched voucher, stripping the
    /// server-only fields into the form's mode.
    pub fn edit(voucher: &ServiceVoucher) -> Self {
        Self {
            mode: FormMode::Edit(voucher.id),
            state: FormState::Editing,
            draft: ServiceVoucherInput::from_voucher(voucher),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Current draft, with all derived fields up to date.
    pub fn draft(&self) -> &ServiceVoucherInput {
        &self.draft
    }

    fn ensure_editing(&self) -> Result<()> {
        match self.state {
            FormState::Editing => Ok(()),
            other => Err(VoucherError::InvalidState(other.name())),
        }
    }

    // All derivation funnels through here so no mutation path can forget a
    // derived field.
    fn recompute(&mut self) {
        self.draft.total_rooms = total_rooms(&self.draft.room_allocations);
        for room in &mut self.draft.room_allocations {
            room.refresh_display();
        }
        renumber_days(&mut self.draft.itinerary_items);
        for day in &mut self.draft.itinerary_items {
            for activity in &mut day.activities {
                activity.refresh_display();
            }
        }
    }

    /// Edit one scalar field of the draft.
    ///
    /// Values arrive as strings (form input) and are coerced per field;
    /// coercion failure rejects the edit without touching the draft.
    pub fn set_field(&mut self, path: FieldPath, value: &str) -> Result<()> {
        self.ensure_editing()?;
        if matches!(self.mode, FormMode::Edit(_)) && path.locked_in_edit() {
            return Err(VoucherError::Validation(format!(
                "{} is immutable after creation",
                path.name()
            )));
        }

        match path {
            FieldPath::ReservationNumber => self.draft.reservation_number = value.to_string(),
            FieldPath::HotelName => self.draft.hotel_name = value.to_string(),
            FieldPath::HotelConfirmationNumber => {
                self.draft.hotel_confirmation_number = value.to_string()
            }
            FieldPath::TravelStartDate => {
                self.draft.travel_start_date = parse_date(path.name(), value)?
            }
            FieldPath::TravelEndDate => self.draft.travel_end_date = parse_date(path.name(), value)?,
            FieldPath::TransferType => self.draft.transfer_type = value.parse()?,
            FieldPath::MealPlan => self.draft.meal_plan = value.parse()?,
            FieldPath::Inclusions => self.draft.inclusions = value.to_string(),
            FieldPath::ArrivalDetails => self.draft.arrival_details = value.to_string(),
            FieldPath::DepartureDetails => self.draft.departure_details = value.to_string(),
            FieldPath::MeetingPoint => self.draft.meeting_point = value.to_string(),
            FieldPath::TravelerName => self.draft.traveler.name = value.to_string(),
            FieldPath::TravelerNumAdults => {
                self.draft.traveler.num_adults = parse_count(path.name(), value)?
            }
            FieldPath::TravelerNumChildren => {
                self.draft.traveler.num_children = parse_count(path.name(), value)?
            }
            FieldPath::TravelerNumInfants => {
                self.draft.traveler.num_infants = parse_count(path.name(), value)?
            }
            FieldPath::TravelerContactEmail => self.draft.traveler.contact_email = optional(value),
            FieldPath::TravelerContactPhone => self.draft.traveler.contact_phone = optional(value),
        }

        self.recompute();
        Ok(())
    }

    /// Append a default room line (double, quantity 1).
    pub fn add_room_allocation(&mut self) -> Result<()> {
        self.ensure_editing()?;
        self.draft
            .room_allocations
            .push(RoomAllocation::new(RoomType::Dbl, 1));
        self.recompute();
        Ok(())
    }

    /// Edit one field of one room line.
    pub fn update_room_allocation(
        &mut self,
        index: usize,
        field: RoomField,
        value: &str,
    ) -> Result<()> {
        self.ensure_editing()?;
        check_index(index, self.draft.room_allocations.len())?;

        let room = &mut self.draft.room_allocations[index];
        match field {
            RoomField::RoomType => room.room_type = value.parse()?,
            RoomField::Quantity => room.quantity = parse_count("quantity", value)?,
            RoomField::NumAdults => room.num_adults = parse_count("num_adults", value)?,
            RoomField::NumChildren => room.num_children = parse_count("num_children", value)?,
            RoomField::NumInfants => room.num_infants = parse_count("num_infants", value)?,
        }

        self.recompute();
        Ok(())
    }

    /// Remove one room line.
    pub fn remove_room_allocation(&mut self, index: usize) -> Result<()> {
        self.ensure_editing()?;
        check_index(index, self.draft.room_allocations.len())?;
        self.draft.room_allocations.remove(index);
        self.recompute();
        Ok(())
    }

    /// Append a new itinerary day, numbered after the last and dated to the
    /// travel start date.
    pub fn add_itinerary_day(&mut self) -> Result<()> {
        self.ensure_editing()?;
        let day = self.draft.itinerary_items.len() as u32 + 1;
        self.draft.itinerary_items.push(ItineraryItem {
            id: None,
            day,
            date: self.draft.travel_start_date,
            activities: Vec::new(),
        });
        self.recompute();
        Ok(())
    }

    /// Remove one day; subsequent days are renumbered to keep `day` equal
    /// to position + 1.
    pub fn remove_itinerary_day(&mut self, index: usize) -> Result<()> {
        self.ensure_editing()?;
        check_index(index, self.draft.itinerary_items.len())?;
        self.draft.itinerary_items.remove(index);
        self.recompute();
        Ok(())
    }

    /// Append a default activity to one day.
    pub fn add_activity(&mut self, day_index: usize) -> Result<()> {
        self.ensure_editing()?;
        check_index(day_index, self.draft.itinerary_items.len())?;
        self.draft.itinerary_items[day_index]
            .activities
            .push(ItineraryActivity::default());
        self.recompute();
        Ok(())
    }

    /// Edit one field of one activity.
    pub fn update_activity(
        &mut self,
        day_index: usize,
        activity_index: usize,
        field: ActivityField,
        value: &str,
    ) -> Result<()> {
        self.ensure_editing()?;
        check_index(day_index, self.draft.itinerary_items.len())?;
        let day = &mut self.draft.itinerary_items[day_index];
        check_index(activity_index, day.activities.len())?;

        let activity = &mut day.activities[activity_index];
        match field {
            ActivityField::Time => activity.time = value.to_string(),
            ActivityField::ActivityType => activity.activity_type = value.parse()?,
            ActivityField::Description => activity.description = value.to_string(),
            ActivityField::Location => activity.location = optional(value),
            ActivityField::Notes => activity.notes = optional(value),
        }

        self.recompute();
        Ok(())
    }

    /// Remove one activity from one day.
    pub fn remove_activity(&mut self, day_index: usize, activity_index: usize) -> Result<()> {
        self.ensure_editing()?;
        check_index(day_index, self.draft.itinerary_items.len())?;
        let day = &mut self.draft.itinerary_items[day_index];
        check_index(activity_index, day.activities.len())?;
        day.activities.remove(activity_index);
        self.recompute();
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.draft.traveler.name.trim().is_empty() {
            return Err(VoucherError::Validation("traveler name is required".to_string()));
        }
        if self.draft.traveler.num_adults < 1 {
            return Err(VoucherError::Validation(
                "at least one adult traveler is required".to_string(),
            ));
        }
        if self.draft.reservation_number.trim().is_empty() {
            return Err(VoucherError::Validation("reservation number is required".to_string()));
        }
        if self.draft.travel_end_date < self.draft.travel_start_date {
            return Err(VoucherError::Validation(
                "travel end date must not be before the start date".to_string(),
            ));
        }
        if self.draft.room_allocations.is_empty() {
            return Err(VoucherError::Validation(
                "at least one room allocation is required".to_string(),
            ));
        }
        if self.draft.room_allocations.iter().any(|r| r.quantity < 1) {
            return Err(VoucherError::Validation(
                "every room allocation needs a quantity of at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and persist the draft.
    ///
    /// On success the form transitions to `Submitted` and the server's
    /// canonical voucher is returned; on any failure the form stays in
    /// `Editing` with the draft intact.
    pub async fn submit(&mut self, repo: &dyn VoucherRepository) -> Result<ServiceVoucher> {
        self.ensure_editing()?;
        self.validate()?;
        self.recompute();

        let result = match self.mode {
            FormMode::Create => {
                debug!(reservation = %self.draft.reservation_number, "creating service voucher");
                repo.create_service_voucher(&self.draft).await
            }
            FormMode::Edit(id) => {
                debug!(id, "updating service voucher");
                let patch = self.build_patch();
                repo.update_service_voucher(id, &patch).await
            }
        };

        let voucher = result?;
        // The server's copy is authoritative; the draft follows it so reads
        // after submission see canonical values, not the client's guess.
        self.draft = ServiceVoucherInput::from_voucher(&voucher);
        self.state = FormState::Submitted;
        Ok(voucher)
    }

    // Edit mode sends a sparse body; creation-immutable fields are left out
    // entirely so the server never sees them change.
    fn build_patch(&self) -> ServiceVoucherPatch {
        ServiceVoucherPatch {
            traveler: Some(self.draft.traveler.clone()),
            room_allocations: Some(self.draft.room_allocations.clone()),
            itinerary_items: Some(self.draft.itinerary_items.clone()),
            travel_start_date: Some(self.draft.travel_start_date),
            travel_end_date: Some(self.draft.travel_end_date),
            hotel_name: Some(self.draft.hotel_name.clone()),
            hotel_confirmation_number: Some(self.draft.hotel_confirmation_number.clone()),
            transfer_type: Some(self.draft.transfer_type),
            meal_plan: Some(self.draft.meal_plan),
            inclusions: Some(self.draft.inclusions.clone()),
            arrival_details: Some(self.draft.arrival_details.clone()),
            departure_details: Some(self.draft.departure_details.clone()),
            meeting_point: Some(self.draft.meeting_point.clone()),
            total_rooms: Some(self.draft.total_rooms),
        }
    }

    /// Discard the draft. Terminal; a second call reports `InvalidState`.
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_editing()?;
        self.state = FormState::Cancelled;
        Ok(())
    }
}

/// Scalar fields of a hotel voucher draft addressable by `set_field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelFieldPath {
    GuestName,
    HotelName,
    HotelAddress,
    CheckInDate,
    CheckOutDate,
    NumberOfRooms,
    RoomType,
    ConfirmationNumber,
    Status,
}

impl HotelFieldPath {
    fn name(&self) -> &'static str {
        match self {
            HotelFieldPath::GuestName => "guest_name",
            HotelFieldPath::HotelName => "hotel_name",
            HotelFieldPath::HotelAddress => "hotel_address",
            HotelFieldPath::CheckInDate => "check_in_date",
            HotelFieldPath::CheckOutDate => "check_out_date",
            HotelFieldPath::NumberOfRooms => "number_of_rooms",
            HotelFieldPath::RoomType => "room_type",
            HotelFieldPath::ConfirmationNumber => "confirmation_number",
            HotelFieldPath::Status => "status",
        }
    }
}

/// Form state engine for a hotel voucher draft.
///
/// Same lifecycle as [`ServiceVoucherForm`], with one derived field: the
/// night count follows the check-in/check-out dates.
pub struct HotelVoucherForm {
    mode: FormMode,
    state: FormState,
    draft: HotelVoucherInput,
}

impl HotelVoucherForm {
    /// Start a create-mode form with an empty draft dated to `today`.
    pub fn create(today: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            state: FormState::Editing,
            draft: HotelVoucherInput::empty(today),
        }
    }

    /// Start an edit-mode form from a fetched hotel voucher.
    pub fn edit(voucher: &HotelVoucher) -> Self {
        Self {
            mode: FormMode::Edit(voucher.id),
            state: FormState::Editing,
            draft: HotelVoucherInput::from_voucher(voucher),
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &HotelVoucherInput {
        &self.draft
    }

    fn ensure_editing(&self) -> Result<()> {
        match self.state {
            FormState::Editing => Ok(()),
            other => Err(VoucherError::InvalidState(other.name())),
        }
    }

    fn recompute(&mut self) {
        self.draft.number_of_nights =
            number_of_nights(self.draft.check_in_date, self.draft.check_out_date);
    }

    /// Edit one scalar field; moving either date recomputes the night count.
    pub fn set_field(&mut self, path: HotelFieldPath, value: &str) -> Result<()> {
        self.ensure_editing()?;

        match path {
            HotelFieldPath::GuestName => self.draft.guest_name = value.to_string(),
            HotelFieldPath::HotelName => self.draft.hotel_name = value.to_string(),
            HotelFieldPath::HotelAddress => self.draft.hotel_address = value.to_string(),
            HotelFieldPath::CheckInDate => {
                self.draft.check_in_date = parse_date(path.name(), value)?
            }
            HotelFieldPath::CheckOutDate => {
                self.draft.check_out_date = parse_date(path.name(), value)?
            }
            HotelFieldPath::NumberOfRooms => {
                self.draft.number_of_rooms = parse_count(path.name(), value)?
            }
            HotelFieldPath::RoomType => self.draft.room_type = optional(value),
            HotelFieldPath::ConfirmationNumber => {
                self.draft.confirmation_number = value.to_string()
            }
            HotelFieldPath::Status => self.draft.status = optional(value),
        }

        self.recompute();
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.draft.guest_name.trim().is_empty() {
            return Err(VoucherError::Validation("guest name is required".to_string()));
        }
        if self.draft.hotel_name.trim().is_empty() {
            return Err(VoucherError::Validation("hotel name is required".to_string()));
        }
        if self.draft.check_out_date < self.draft.check_in_date {
            return Err(VoucherError::Validation(
                "check-out date must not be before check-in".to_string(),
            ));
        }
        if self.draft.number_of_rooms < 1 {
            return Err(VoucherError::Validation(
                "at least one room is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate and persist the draft; same contract as
    /// [`ServiceVoucherForm::submit`].
    pub async fn submit(&mut self, repo: &dyn VoucherRepository) -> Result<HotelVoucher> {
        self.ensure_editing()?;
        self.validate()?;
        self.recompute();

        let result = match self.mode {
            FormMode::Create => {
                debug!(guest = %self.draft.guest_name, "creating hotel voucher");
                repo.create_hotel_voucher(&self.draft).await
            }
            FormMode::Edit(id) => {
                debug!(id, "updating hotel voucher");
                let patch = self.build_patch();
                repo.update_hotel_voucher(id, &patch).await
            }
        };

        let voucher = result?;
        // Same contract as the service form: the draft follows the server's
        // canonical copy on success.
        self.draft = HotelVoucherInput::from_voucher(&voucher);
        self.state = FormState::Submitted;
        Ok(voucher)
    }

    fn build_patch(&self) -> HotelVoucherPatch {
        HotelVoucherPatch {
            guest_name: Some(self.draft.guest_name.clone()),
            hotel_name: Some(self.draft.hotel_name.clone()),
            hotel_address: Some(self.draft.hotel_address.clone()),
            check_in_date: Some(self.draft.check_in_date),
            check_out_date: Some(self.draft.check_out_date),
            number_of_nights: Some(self.draft.number_of_nights),
            number_of_rooms: Some(self.draft.number_of_rooms),
            room_type: self.draft.room_type.clone(),
            confirmation_number: Some(self.draft.confirmation_number.clone()),
            status: self.draft.status.clone(),
        }
    }

    /// Discard the draft. Terminal; a second call reports `InvalidState`.
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_editing()?;
        self.state = FormState::Cancelled;
        Ok(())
    }
}
