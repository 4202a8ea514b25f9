//! End-to-end form engine tests against an in-memory repository fake.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use voucher_core::{
    derive_status, ActivityField, FieldPath, FormState, HotelFieldPath, HotelVoucher,
    HotelVoucherForm, HotelVoucherInput, HotelVoucherPatch, Page, Result, RoomField,
    ServiceVoucher, ServiceVoucherForm, ServiceVoucherInput, ServiceVoucherPatch, VoucherError,
    VoucherList, VoucherRepository, VoucherStatus,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// In-memory stand-in for the backend: assigns ids and recomputes the
/// server-derived fields the same way the real API does.
#[derive(Default)]
struct FakeRepo {
    vouchers: Mutex<HashMap<u64, ServiceVoucher>>,
    next_id: AtomicU64,
    write_calls: AtomicU64,
    fail_writes: AtomicBool,
}

impl FakeRepo {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    fn canonicalize(voucher: &mut ServiceVoucher) {
        voucher.total_rooms = voucher.room_allocations.iter().map(|r| r.quantity).sum();
        for room in &mut voucher.room_allocations {
            room.room_type_display = room.room_type.label().to_string();
        }
        voucher.transfer_type_display = voucher.transfer_type.label().to_string();
        voucher.meal_plan_display = voucher.meal_plan.label().to_string();
    }

    fn check_write(&self) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VoucherError::Server {
                status: 500,
                message: "internal error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl VoucherRepository for FakeRepo {
    async fn list_service_vouchers(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ServiceVoucher>> {
        let vouchers = self.vouchers.lock().unwrap();
        let mut items: Vec<_> = vouchers.values().cloned().collect();
        items.sort_by_key(|v| v.id);
        let start = ((page - 1) * page_size) as usize;
        let paged = items
            .iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(Page {
            items: paged,
            total_count: items.len() as u64,
        })
    }

    async fn get_service_voucher(&self, id: u64) -> Result<ServiceVoucher> {
        self.vouchers
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| VoucherError::NotFound(format!("service voucher {id}")))
    }

    async fn create_service_voucher(&self, input: &ServiceVoucherInput) -> Result<ServiceVoucher> {
        self.check_write()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut voucher = ServiceVoucher {
            id,
            traveler: input.traveler.clone(),
            room_allocations: input.room_allocations.clone(),
            itinerary_items: input.itinerary_items.clone(),
            travel_start_date: input.travel_start_date,
            travel_end_date: input.travel_end_date,
            reservation_number: input.reservation_number.clone(),
            hotel_name: input.hotel_name.clone(),
            hotel_confirmation_number: input.hotel_confirmation_number.clone(),
            transfer_type: input.transfer_type,
            transfer_type_display: String::new(),
            meal_plan: input.meal_plan,
            meal_plan_display: String::new(),
            inclusions: input.inclusions.clone(),
            arrival_details: input.arrival_details.clone(),
            departure_details: input.departure_details.clone(),
            meeting_point: input.meeting_point.clone(),
            total_rooms: 0,
            created_at: Some("2025-03-01T10:00:00Z".to_string()),
            updated_at: None,
        };
        Self::canonicalize(&mut voucher);
        self.vouchers.lock().unwrap().insert(id, voucher.clone());
        Ok(voucher)
    }

    async fn update_service_voucher(
        &self,
        id: u64,
        patch: &ServiceVoucherPatch,
    ) -> Result<ServiceVoucher> {
        self.check_write()?;
        let mut vouchers = self.vouchers.lock().unwrap();
        let voucher = vouchers
            .get_mut(&id)
            .ok_or_else(|| VoucherError::NotFound(format!("service voucher {id}")))?;
        if let Some(rooms) = &patch.room_allocations {
            voucher.room_allocations = rooms.clone();
        }
        if let Some(items) = &patch.itinerary_items {
            voucher.itinerary_items = items.clone();
        }
        if let Some(hotel_name) = &patch.hotel_name {
            voucher.hotel_name = hotel_name.clone();
        }
        if let Some(start) = patch.travel_start_date {
            voucher.travel_start_date = start;
        }
        if let Some(end) = patch.travel_end_date {
            voucher.travel_end_date = end;
        }
        Self::canonicalize(voucher);
        Ok(voucher.clone())
    }

    async fn delete_service_voucher(&self, id: u64) -> Result<()> {
        self.vouchers
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| VoucherError::NotFound(format!("service voucher {id}")))
    }

    async fn list_hotel_vouchers(&self, _page: u32, _page_size: u32) -> Result<Page<HotelVoucher>> {
        Ok(Page { items: vec![], total_count: 0 })
    }

    async fn get_hotel_voucher(&self, id: u64) -> Result<HotelVoucher> {
        Err(VoucherError::NotFound(format!("hotel voucher {id}")))
    }

    async fn create_hotel_voucher(&self, input: &HotelVoucherInput) -> Result<HotelVoucher> {
        self.check_write()?;
        Ok(HotelVoucher {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            guest_name: input.guest_name.clone(),
            hotel_name: input.hotel_name.clone(),
            hotel_address: input.hotel_address.clone(),
            check_in_date: input.check_in_date,
            check_out_date: input.check_out_date,
            number_of_nights: (input.check_out_date - input.check_in_date).num_days().max(0) as u32,
            number_of_rooms: input.number_of_rooms,
            room_type: input.room_type.clone(),
            confirmation_number: input.confirmation_number.clone(),
            status: Some("Confirmed".to_string()),
        })
    }

    async fn update_hotel_voucher(
        &self,
        id: u64,
        _patch: &HotelVoucherPatch,
    ) -> Result<HotelVoucher> {
        Err(VoucherError::NotFound(format!("hotel voucher {id}")))
    }

    async fn delete_hotel_voucher(&self, _id: u64) -> Result<()> {
        Ok(())
    }
}

fn filled_create_form() -> ServiceVoucherForm {
    let mut form = ServiceVoucherForm::create(date("2025-03-01"));
    form.set_field(FieldPath::TravelerName, "Jane Doe").unwrap();
    form.set_field(FieldPath::TravelerNumAdults, "2").unwrap();
    form.set_field(FieldPath::ReservationNumber, "RSV-1001").unwrap();
    form.set_field(FieldPath::HotelName, "Hotel Azure").unwrap();
    form.set_field(FieldPath::TravelEndDate, "2025-03-04").unwrap();
    form.add_room_allocation().unwrap();
    form
}

#[tokio::test]
async fn create_then_get_returns_the_canonical_object() {
    let repo = FakeRepo::new();
    let mut form = filled_create_form();

    let created = form.submit(&repo).await.unwrap();
    assert_eq!(form.state(), FormState::Submitted);
    assert!(created.id > 0);
    // Server-derived fields are filled in even though the draft never set them
    assert_eq!(created.transfer_type_display, "Private Transfer");
    assert_eq!(created.total_rooms, 1);

    let fetched = repo.get_service_voucher(created.id).await.unwrap();
    assert_eq!(fetched, created);

    // The draft now mirrors the canonical object, not the pre-submit guess
    assert_eq!(form.draft(), &ServiceVoucherInput::from_voucher(&created));
}

#[tokio::test]
async fn submitted_form_rejects_further_mutation() {
    let repo = FakeRepo::new();
    let mut form = filled_create_form();
    form.submit(&repo).await.unwrap();

    assert!(matches!(
        form.set_field(FieldPath::HotelName, "Other"),
        Err(VoucherError::InvalidState("submitted"))
    ));
    assert!(matches!(form.submit(&repo).await, Err(VoucherError::InvalidState("submitted"))));
}

#[tokio::test]
async fn invalid_date_order_blocks_submission_before_any_network_call() {
    let repo = FakeRepo::new();
    let mut form = filled_create_form();
    form.set_field(FieldPath::TravelStartDate, "2025-03-10").unwrap();

    let before = form.draft().clone();
    let err = form.submit(&repo).await.unwrap_err();
    assert!(matches!(err, VoucherError::Validation(_)));
    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(form.draft(), &before);
    assert_eq!(repo.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn zero_counts_block_submission_before_any_network_call() {
    let repo = FakeRepo::new();
    let mut form = filled_create_form();

    form.update_room_allocation(0, RoomField::Quantity, "0").unwrap();
    assert!(matches!(form.submit(&repo).await, Err(VoucherError::Validation(_))));

    form.update_room_allocation(0, RoomField::Quantity, "1").unwrap();
    form.set_field(FieldPath::TravelerNumAdults, "0").unwrap();
    assert!(matches!(form.submit(&repo).await, Err(VoucherError::Validation(_))));

    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(repo.write_calls.load(Ordering::SeqCst), 0);

    // Submits cleanly once both counts are back above zero
    form.set_field(FieldPath::TravelerNumAdults, "2").unwrap();
    let created = form.submit(&repo).await.unwrap();
    assert_eq!(created.total_rooms, 1);
    assert_eq!(created.traveler.num_adults, 2);
}

#[tokio::test]
async fn server_failure_keeps_the_draft_editable() {
    let repo = FakeRepo::new();
    repo.fail_writes.store(true, Ordering::SeqCst);
    let mut form = filled_create_form();

    let err = form.submit(&repo).await.unwrap_err();
    assert!(matches!(err, VoucherError::Server { status: 500, .. }));
    assert_eq!(form.state(), FormState::Editing);

    // Retry succeeds once the server recovers
    repo.fail_writes.store(false, Ordering::SeqCst);
    form.submit(&repo).await.unwrap();
    assert_eq!(form.state(), FormState::Submitted);
}

#[tokio::test]
async fn edit_scenario_recomputes_derived_fields() {
    let repo = FakeRepo::new();

    // Seed a voucher with two rooms and one empty itinerary day
    let mut form = filled_create_form();
    form.update_room_allocation(0, RoomField::Quantity, "1").unwrap();
    form.add_room_allocation().unwrap();
    form.update_room_allocation(1, RoomField::RoomType, "SGL").unwrap();
    form.update_room_allocation(1, RoomField::Quantity, "2").unwrap();
    form.add_itinerary_day().unwrap();
    let created = form.submit(&repo).await.unwrap();
    assert_eq!(created.total_rooms, 3);

    let mut edit = ServiceVoucherForm::edit(&created);
    edit.remove_room_allocation(0).unwrap();
    assert_eq!(edit.draft().total_rooms, 2);

    edit.add_activity(0).unwrap();
    let activity = &edit.draft().itinerary_items[0].activities[0];
    assert_eq!(activity.activity_type_display, "Other");
    assert_eq!(activity.time, "");

    edit.update_activity(0, 0, ActivityField::Description, "Free morning").unwrap();
    let updated = edit.submit(&repo).await.unwrap();
    assert_eq!(updated.total_rooms, 2);
    assert_eq!(updated.itinerary_items[0].activities.len(), 1);
}

fn filled_hotel_form() -> HotelVoucherForm {
    let mut form = HotelVoucherForm::create(date("2025-02-01"));
    form.set_field(HotelFieldPath::GuestName, "Jane Doe").unwrap();
    form.set_field(HotelFieldPath::HotelName, "Hotel Azure").unwrap();
    form.set_field(HotelFieldPath::CheckOutDate, "2025-02-04").unwrap();
    form.set_field(HotelFieldPath::ConfirmationNumber, "AZ-55").unwrap();
    form
}

#[tokio::test]
async fn hotel_form_submits_and_follows_the_canonical_copy() {
    let repo = FakeRepo::new();
    let mut form = filled_hotel_form();

    let created = form.submit(&repo).await.unwrap();
    assert_eq!(form.state(), FormState::Submitted);
    assert_eq!(created.number_of_nights, 3);

    // The server added a status; the draft picked it up along with the rest
    assert_eq!(form.draft().status.as_deref(), Some("Confirmed"));
    assert_eq!(form.draft().number_of_nights, 3);

    assert!(matches!(
        form.set_field(HotelFieldPath::GuestName, "Else"),
        Err(VoucherError::InvalidState("submitted"))
    ));
}

#[tokio::test]
async fn hotel_form_failure_keeps_editing_and_cancel_is_terminal() {
    let repo = FakeRepo::new();
    repo.fail_writes.store(true, Ordering::SeqCst);
    let mut form = filled_hotel_form();

    let err = form.submit(&repo).await.unwrap_err();
    assert!(matches!(err, VoucherError::Server { status: 500, .. }));
    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(form.draft().guest_name, "Jane Doe");

    form.cancel().unwrap();
    assert!(matches!(form.cancel(), Err(VoucherError::InvalidState("cancelled"))));
    assert!(matches!(
        form.submit(&repo).await,
        Err(VoucherError::InvalidState("cancelled"))
    ));
}

#[tokio::test]
async fn list_loads_cache_and_filters_client_side() {
    let repo = FakeRepo::new();
    for (name, reservation) in [("Jane Doe", "RSV-1001"), ("John Roe", "RSV-1002")] {
        let mut form = ServiceVoucherForm::create(date("2025-03-01"));
        form.set_field(FieldPath::TravelerName, name).unwrap();
        form.set_field(FieldPath::ReservationNumber, reservation).unwrap();
        form.set_field(FieldPath::HotelName, "Hotel Azure").unwrap();
        form.add_room_allocation().unwrap();
        form.submit(&repo).await.unwrap();
    }

    let mut list = VoucherList::new();
    let page = list.load(&repo, 1, 10).await.unwrap();
    assert_eq!(page.total_count, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(list.cached(), Some(&page));

    assert_eq!(list.filter("jane").len(), 1);
    assert_eq!(list.filter("rsv-100").len(), 2);
    assert_eq!(list.filter("azure").len(), 2);
    assert_eq!(list.filter("nothing").len(), 0);

    let start = page.items[0].travel_start_date;
    let end = page.items[0].travel_end_date;
    assert_eq!(derive_status(start, end, start), VoucherStatus::Active);
}
