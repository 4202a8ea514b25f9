//! Command-line entry point for voucher operations.

mod args;
mod config;

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use voucher_api::{ApiClient, StaticTokenProvider};
use voucher_core::{
    build_document, build_export_filename, derive_status, filter_hotel_vouchers, filter_vouchers,
    HotelVoucherInput, ServiceVoucherInput, VoucherDocument, VoucherRepository,
};

use args::{Cli, Command, HotelCommand};
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let base_url = cli.base_url.clone().unwrap_or_else(|| config.base_url.clone());
    let token = config.token.clone().unwrap_or_default();
    debug!(%base_url, "starting voucher CLI");

    let client = ApiClient::new(base_url, Arc::new(StaticTokenProvider::new(token)));
    run(cli, &client).await
}

async fn run(cli: Cli, client: &ApiClient) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::List { page, page_size, query } => {
            let loaded = client.list_service_vouchers(page, page_size).await?;
            let query = query.unwrap_or_default();
            let items = filter_vouchers(&loaded.items, &query);
            if cli.raw {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }
            println!("{} voucher(s), {} total on server", items.len(), loaded.total_count);
            for voucher in items {
                let status =
                    derive_status(voucher.travel_start_date, voucher.travel_end_date, today);
                println!(
                    "#{:<5} {:<12} {:<24} {:<24} {} to {}  [{}]",
                    voucher.id,
                    voucher.reservation_number,
                    voucher.traveler.name,
                    voucher.hotel_name,
                    voucher.travel_start_date,
                    voucher.travel_end_date,
                    status.label()
                );
            }
        }

        Command::Show { id } => {
            let voucher = client.get_service_voucher(id).await?;
            if cli.raw {
                println!("{}", serde_json::to_string_pretty(&voucher)?);
                return Ok(());
            }
            print!("{}", document_text(&build_document(&voucher)));
        }

        Command::Export { id, out } => {
            let voucher = client.get_service_voucher(id).await?;
            let document = build_document(&voucher);
            let path = out.unwrap_or_else(|| build_export_filename(&voucher).into());
            fs::write(&path, document_text(&document))
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported voucher {} to {}", id, path.display());
        }

        Command::Create { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let draft: ServiceVoucherInput = serde_json::from_str(&content)
                .with_context(|| format!("invalid draft in {}", file.display()))?;
            let created = client.create_service_voucher(&draft).await?;
            println!("Created service voucher #{} ({})", created.id, created.reservation_number);
        }

        Command::Hotel { command } => run_hotel(command, cli.raw, client).await?,
    }

    Ok(())
}

async fn run_hotel(command: HotelCommand, raw: bool, client: &ApiClient) -> anyhow::Result<()> {
    match command {
        HotelCommand::List { page, page_size, query } => {
            let loaded = client.list_hotel_vouchers(page, page_size).await?;
            let query = query.unwrap_or_default();
            let items = filter_hotel_vouchers(&loaded.items, &query);
            if raw {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }
            println!("{} voucher(s), {} total on server", items.len(), loaded.total_count);
            for voucher in items {
                println!(
                    "#{:<5} {:<24} {:<24} {} to {} ({} nights, {} rooms)",
                    voucher.id,
                    voucher.guest_name,
                    voucher.hotel_name,
                    voucher.check_in_date,
                    voucher.check_out_date,
                    voucher.number_of_nights,
                    voucher.number_of_rooms
                );
            }
        }

        HotelCommand::Show { id } => {
            let voucher = client.get_hotel_voucher(id).await?;
            if raw {
                println!("{}", serde_json::to_string_pretty(&voucher)?);
                return Ok(());
            }
            println!("Hotel voucher #{}", voucher.id);
            println!("Guest:        {}", voucher.guest_name);
            println!("Hotel:        {} {}", voucher.hotel_name, voucher.hotel_address);
            println!("Stay:         {} to {} ({} nights)",
                voucher.check_in_date, voucher.check_out_date, voucher.number_of_nights);
            println!("Rooms:        {}", voucher.number_of_rooms);
            if let Some(room_type) = &voucher.room_type {
                println!("Room type:    {}", room_type);
            }
            println!("Confirmation: {}", voucher.confirmation_number);
            if let Some(status) = &voucher.status {
                println!("Status:       {}", status);
            }
        }

        HotelCommand::Create { file } => {
            let content = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let draft: HotelVoucherInput = serde_json::from_str(&content)
                .with_context(|| format!("invalid draft in {}", file.display()))?;
            let created = client.create_hotel_voucher(&draft).await?;
            println!("Created hotel voucher #{} for {}", created.id, created.guest_name);
        }

        HotelCommand::Delete { id } => {
            client.delete_hotel_voucher(id).await?;
            println!("Deleted hotel voucher #{}", id);
        }
    }

    Ok(())
}

fn document_text(document: &VoucherDocument) -> String {
    let mut text = String::new();
    text.push_str(&document.title);
    text.push('\n');
    text.push_str(&"=".repeat(document.title.len()));
    text.push('\n');
    for line in &document.header_lines {
        text.push_str(line);
        text.push('\n');
    }

    text.push_str("\nRooms\n");
    for line in &document.rooms {
        text.push_str("  - ");
        text.push_str(line);
        text.push('\n');
    }

    if !document.inclusions.is_empty() {
        text.push_str("\nInclusions\n");
        for line in &document.inclusions {
            text.push_str("  - ");
            text.push_str(line);
            text.push('\n');
        }
    }

    if !document.itinerary.is_empty() {
        text.push_str("\nItinerary\n");
        for day in &document.itinerary {
            text.push_str(&day.heading);
            text.push('\n');
            if day.lines.is_empty() {
                text.push_str("  (no activities yet)\n");
            }
            for line in &day.lines {
                text.push_str("  ");
                text.push_str(line);
                text.push('\n');
            }
        }
    }

    text
}
