//! Printable document rendering for service vouchers.
//!
//! Pure transforms from a finalized voucher into display-ready strings;
//! no network access, no mutation. The CLI's export command and any print
//! surface consume the assembled [`VoucherDocument`].

use crate::model::{ItineraryItem, RoomAllocation, ServiceVoucher};

/// One room line as printed, e.g. `"2x Double"`.
pub fn render_room_summary(rooms: &[RoomAllocation]) -> Vec<String> {
    rooms
        .iter()
        .map(|r| format!("{}x {}", r.quantity, r.room_type_display))
        .collect()
}

/// Split sentence-separated inclusions text into trimmed list entries.
pub fn render_inclusions(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Itinerary sorted by day number.
///
/// The form engine keeps days in position order already; sorting here guards
/// documents rendered from data that bypassed it.
pub fn render_itinerary_sorted(items: &[ItineraryItem]) -> Vec<ItineraryItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| item.day);
    sorted
}

/// File name for the exported document.
pub fn build_export_filename(voucher: &ServiceVoucher) -> String {
    format!("service-voucher-{}.pdf", voucher.reservation_number)
}

/// One itinerary day as printed.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBlock {
    /// Heading, e.g. `"Day 1 - 2025-03-01"`
    pub heading: String,

    /// One line per activity; empty for a day with no activities yet
    pub lines: Vec<String>,
}

/// A fully assembled printable voucher document.
#[derive(Debug, Clone, PartialEq)]
pub struct VoucherDocument {
    /// Document title
    pub title: String,

    /// Header block: reservation, traveler, hotel, dates, transfer, meals
    pub header_lines: Vec<String>,

    /// Room summary lines
    pub rooms: Vec<String>,

    /// Inclusions list entries
    pub inclusions: Vec<String>,

    /// Day-by-day itinerary blocks, in day order
    pub itinerary: Vec<DayBlock>,

    /// Suggested export file name
    pub filename: String,
}

fn activity_line(time: &str, label: &str, description: &str, location: Option<&str>) -> String {
    let mut line = String::new();
    if !time.is_empty() {
        line.push_str(time);
        line.push(' ');
    }
    line.push_str(label);
    if !description.is_empty() {
        line.push_str(": ");
        line.push_str(description);
    }
    if let Some(location) = location {
        line.push_str(" @ ");
        line.push_str(location);
    }
    line
}

/// Assemble the complete printable document for a voucher.
pub fn build_document(voucher: &ServiceVoucher) -> VoucherDocument {
    let header_lines = vec![
        format!("Reservation: {}", voucher.reservation_number),
        format!(
            "Traveler: {} ({} adults, {} children, {} infants)",
            voucher.traveler.name,
            voucher.traveler.num_adults,
            voucher.traveler.num_children,
            voucher.traveler.num_infants
        ),
        format!(
            "Hotel: {} (confirmation {})",
            voucher.hotel_name, voucher.hotel_confirmation_number
        ),
        format!(
            "Travel dates: {} to {}",
            voucher.travel_start_date, voucher.travel_end_date
        ),
        format!("Transfer: {}", voucher.transfer_type_display),
        format!("Meal plan: {}", voucher.meal_plan_display),
        format!("Total rooms: {}", voucher.total_rooms),
    ];

    let itinerary = render_itinerary_sorted(&voucher.itinerary_items)
        .into_iter()
        .map(|day| DayBlock {
            heading: format!("Day {} - {}", day.day, day.date),
            lines: day
                .activities
                .iter()
                .map(|a| {
                    activity_line(
                        &a.time,
                        &a.activity_type_display,
                        &a.description,
                        a.location.as_deref(),
                    )
                })
                .collect(),
        })
        .collect();

    VoucherDocument {
        title: format!("Service Voucher {}", voucher.reservation_number),
        header_lines,
        rooms: render_room_summary(&voucher.room_allocations),
        inclusions: render_inclusions(&voucher.inclusions),
        itinerary,
        filename: build_export_filename(voucher),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ActivityType, ItineraryActivity, MealPlan, RoomType, TransferType, Traveler,
    };
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn voucher() -> ServiceVoucher {
        ServiceVoucher {
            id: 9,
            traveler: Traveler {
                id: Some(2),
                name: "Jane Doe".to_string(),
                num_adults: 2,
                num_children: 1,
                num_infants: 0,
                contact_email: None,
                contact_phone: None,
            },
            room_allocations: vec![
                RoomAllocation::new(RoomType::Dbl, 2),
                RoomAllocation::new(RoomType::Sgl, 1),
            ],
            itinerary_items: vec![
                ItineraryItem {
                    id: None,
                    day: 2,
                    date: date("2025-03-02"),
                    activities: vec![],
                },
                ItineraryItem {
                    id: None,
                    day: 1,
                    date: date("2025-03-01"),
                    activities: vec![ItineraryActivity {
                        id: None,
                        time: "09:00".to_string(),
                        activity_type: ActivityType::Transfer,
                        activity_type_display: "Transfer".to_string(),
                        description: "Airport pickup".to_string(),
                        location: Some("Terminal 2".to_string()),
                        notes: None,
                    }],
                },
            ],
            travel_start_date: date("2025-03-01"),
            travel_end_date: date("2025-03-04"),
            reservation_number: "RSV-1001".to_string(),
            hotel_name: "Hotel Azure".to_string(),
            hotel_confirmation_number: "AZ-55".to_string(),
            transfer_type: TransferType::Private,
            transfer_type_display: "Private Transfer".to_string(),
            meal_plan: MealPlan::Bb,
            meal_plan_display: "Bed and Breakfast".to_string(),
            inclusions: "Breakfast. Airport transfer. City tour.".to_string(),
            arrival_details: String::new(),
            departure_details: String::new(),
            meeting_point: String::new(),
            total_rooms: 3,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn room_summary_lines() {
        let lines = render_room_summary(&voucher().room_allocations);
        assert_eq!(lines, vec!["2x Double", "1x Single"]);
    }

    #[test]
    fn inclusions_split_and_trim() {
        assert_eq!(render_inclusions("A. B. C."), vec!["A", "B", "C"]);
        assert_eq!(render_inclusions(""), Vec::<String>::new());
        assert_eq!(render_inclusions("  .  . "), Vec::<String>::new());
    }

    #[test]
    fn itinerary_is_sorted_by_day() {
        let sorted = render_itinerary_sorted(&voucher().itinerary_items);
        assert_eq!(sorted[0].day, 1);
        assert_eq!(sorted[1].day, 2);
    }

    #[test]
    fn export_filename_uses_reservation_number() {
        assert_eq!(build_export_filename(&voucher()), "service-voucher-RSV-1001.pdf");
    }

    #[test]
    fn document_is_deterministic() {
        let v = voucher();
        let first = build_document(&v);
        let second = build_document(&v);
        assert_eq!(first, second);

        assert_eq!(first.title, "Service Voucher RSV-1001");
        assert_eq!(first.itinerary[0].heading, "Day 1 - 2025-03-01");
        assert_eq!(first.itinerary[0].lines[0], "09:00 Transfer: Airport pickup @ Terminal 2");
        assert!(first.itinerary[1].lines.is_empty());
        assert_eq!(first.inclusions.len(), 3);
    }
}
