//! # crumbs-types
//!
//! Shared domain types for the payout workspace.
//!
//! Every monetary value is an exact integer count of mutez. Rates and
//! ratios are exact fixed-point or rational values; nothing in this crate
//! is ever a floating-point number.
//!
//! ## Modules
//!
//! - [`amount`] — `Mutez`, `Tez`, `Percentage` and `Fraction` arithmetic
//! - [`address`] — account addresses
//! - [`config`] — pre-validated payout configuration
//! - [`cycle`] — per-cycle stake and reward snapshot
//! - [`payment`] — payment records, notes and transfers
//! - [`report`] — the cycle report accumulator

pub mod address;
pub mod amount;
pub mod config;
pub mod cycle;
pub mod payment;
pub mod report;

pub use address::Address;
pub use amount::{Fraction, Mutez, Percentage, Tez};
pub use config::Config;
pub use cycle::{CycleData, CycleShare};
pub use payment::{Batch, DelegatorPayment, IncomeKind, NoteType, SimplePayment, Transfer};
pub use report::CycleReport;

/// Mutez per tez (1 tez = 1,000,000 mutez).
pub const MUTEZ_FACTOR: u128 = 1_000_000;

/// Default upper bound on transfers per operation group.
pub const MAX_BATCH_SIZE: usize = 200;

/// Reward cycle number.
pub type Cycle = u32;

/// Error types for amount arithmetic and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Arithmetic overflow.
    #[error("arithmetic overflow in amount calculation")]
    Overflow,

    /// Subtraction would produce a negative amount.
    #[error("amount underflow: {minuend} - {subtrahend}")]
    Underflow {
        /// Left-hand side.
        minuend: u128,
        /// Right-hand side.
        subtrahend: u128,
    },

    /// Denominator is zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Percentage string is malformed or above 100.
    #[error("invalid percentage: {0}")]
    InvalidPercentage(String),

    /// Amount string is malformed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Convenience result type for amount operations.
pub type Result<T> = std::result::Result<T, AmountError>;
