//! CLI module - Command-line interface for the booking API
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Booking API - accounts, sessions and bookings over HTTP
#[derive(Parser)]
#[command(name = "booking-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Override the listen port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create default config file
    Init,

    /// Print the effective configuration (secrets omitted)
    ShowConfig,
}

pub use commands::*;
