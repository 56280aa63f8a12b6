//! # verifactu
//!
//! VeriFactu invoice records for the Spanish tax agency (AEAT): record XML,
//! SHA-256 hash chaining, SOAP envelopes and QR verification payloads.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Chain state is not persisted: every call returns a [`ChainLink`] that the
//! caller passes as `prior` to the next one.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use rust_decimal_macros::dec;
//! use verifactu::core::*;
//! use verifactu::verifactu::{RecordOptions, create_invoice_record};
//!
//! let record = InvoiceRecordBuilder::new("TEST/100", NaiveDate::from_ymd_opt(2024, 3, 18).unwrap())
//!     .issuer(Party::new("99999990S", "Test Company S.L."))
//!     .description("Consulting services")
//!     .add_vat_line(VatLine::subject(dec!(100), dec!(21), dec!(21)))
//!     .totals(dec!(21), dec!(121))
//!     .build()
//!     .unwrap();
//! let software = SoftwareDescriptorBuilder::new("Test Software", "TEST_ID", "1.0.0")
//!     .developer("Test Developer", "B00000000")
//!     .installation_number("12345")
//!     .build()
//!     .unwrap();
//!
//! let options = RecordOptions::default()
//!     .generated_at(Utc.with_ymd_and_hms(2024, 3, 18, 12, 0, 0).unwrap());
//! let result = create_invoice_record(&record, &software, None, &options).unwrap();
//!
//! assert_eq!(
//!     result.fingerprint,
//!     "143C231C0DA1B08E53C44BEBB70CD2CF0983E78F88492E897ACA6B7FB49B2027"
//! );
//! assert!(result.qr_code.is_some());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Record types, code lists, field encoders, validation |
//! | `verifactu` (default) | Record assembly, hash chain, SOAP envelope, QR URL |
//! | `qr` (default) | SVG QR rendering via `qrcode` |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "verifactu")]
pub mod verifactu;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
