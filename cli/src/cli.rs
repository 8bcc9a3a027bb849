use catchbook_client_core::{date::parse_day, HistoryKey};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catchbook", version, about = "Daily catch ledger: sales, expenses and profit per day")]
pub struct Cli {
    /// Backend endpoint: the relay or the sheet script URL
    #[arg(long, env = "CATCHBOOK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CATCHBOOK_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Work on one day's lines
    #[command(subcommand)]
    Day(DayCommand),

    /// Edit saved days one record at a time, duplicates included
    #[command(subcommand)]
    History(HistoryCommand),

    /// Write every saved day as CSV
    Export {
        /// Output file (stdout by default)
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
    },

    /// Totals over every saved day
    Period,
}

/// Amounts are free text: anything but digits and '.' is dropped.
#[derive(Subcommand, Debug)]
pub enum DayCommand {
    /// Print the lines and totals of a day (today by default)
    Show {
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    AddSale {
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, allow_hyphen_values = true)]
        kg: String,
        #[arg(long, allow_hyphen_values = true)]
        price: String,
    },
    AddExpense {
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },
    UpdateSale {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        /// Line number as printed by `day show`
        #[arg(long)]
        line: usize,
        #[arg(long, allow_hyphen_values = true)]
        kg: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
    },
    UpdateExpense {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
    },
    RemoveSale {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        line: usize,
    },
    RemoveExpense {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
        #[arg(long)]
        line: usize,
    },
    /// Drop every line of the day; the saved record is deleted
    Clear {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Delete every saved record for the date
    Delete {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
}

/// KEY is a date, or `date#n` for the n-th record saved under that date.
#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List saved records, newest first
    List,
    AddSale {
        key: HistoryKey,
    },
    AddExpense {
        key: HistoryKey,
    },
    UpdateSale {
        key: HistoryKey,
        #[arg(long)]
        line: usize,
        #[arg(long, allow_hyphen_values = true)]
        kg: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
    },
    UpdateExpense {
        key: HistoryKey,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
    },
    RemoveSale {
        key: HistoryKey,
        #[arg(long)]
        line: usize,
    },
    RemoveExpense {
        key: HistoryKey,
        #[arg(long)]
        line: usize,
    },
    Delete {
        key: HistoryKey,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    parse_day(s).ok_or_else(|| format!("expected a date like 2024-05-01, got {:?}", s))
}
