//! CLI module - Command-line interface for contec
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Contec - invoice/service reporting backend
#[derive(Parser)]
#[command(name = "contec")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web API
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Manage dashboard users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Show the report records table
    Records {
        /// Number of most recent rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user
    Add {
        username: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Grant admin rights
        #[arg(long)]
        admin: bool,
        /// Grant super admin rights
        #[arg(long)]
        superadmin: bool,
    },
    /// List all users
    #[command(alias = "ls")]
    List,
    /// Delete a user
    #[command(alias = "rm")]
    Delete { username: String },
    /// Set a new password
    Passwd {
        username: String,
        /// New password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Check a username/password pair
    Check {
        username: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

pub use commands::*;
