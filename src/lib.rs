// fincalc - Core Library
// Exposes the calculators, formatting and journal for the CLI, API server, and tests

pub mod calculators;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod report;
pub mod request;
pub mod validation;
pub mod words;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use calculators::TaxRules;
pub use config::AppConfig;
pub use error::{CalcError, CalcResult};
pub use format::{format_currency, format_number, format_percent, format_rupees, round_to};
pub use history::{
    calculations_for, clear_history, count_calculations, open_journal, recent_calculations,
    record_calculation, setup_database, CalculationRecord,
};
pub use report::{Report, ReportLine};
pub use request::{CalculationOutcome, CalculationRequest, CalculationResult, CATALOG};
pub use validation::parse_amount;
pub use words::{number_to_words, rupees_in_words, WordStyle};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
