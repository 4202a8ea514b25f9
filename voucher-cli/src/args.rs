//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Back-office tooling for service and hotel vouchers.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Override the configured API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Output raw JSON instead of formatted text
    #[arg(long, default_value_t = false)]
    pub raw: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List service vouchers
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        page_size: u32,

        /// Filter the fetched page by traveler, reservation or hotel
        #[arg(long)]
        query: Option<String>,
    },

    /// Show one service voucher as a printable document
    Show { id: u64 },

    /// Render one service voucher document to a file
    Export {
        id: u64,

        /// Target path; defaults to the voucher's export file name
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create a service voucher from a JSON draft file
    Create {
        /// Path to a JSON file holding the draft
        #[arg(long)]
        file: PathBuf,
    },

    /// Hotel voucher operations
    Hotel {
        #[command(subcommand)]
        command: HotelCommand,
    },
}

#[derive(Subcommand)]
pub enum HotelCommand {
    /// List hotel vouchers
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        page_size: u32,

        /// Filter the fetched page by guest, hotel or confirmation number
        #[arg(long)]
        query: Option<String>,
    },

    /// Show one hotel voucher
    Show { id: u64 },

    /// Create a hotel voucher from a JSON draft file
    Create {
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete a hotel voucher
    Delete { id: u64 },
}
