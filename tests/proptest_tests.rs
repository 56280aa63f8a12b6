//! Property-based tests for encoders and the hash chain.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "verifactu")]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use verifactu::core::format;
use verifactu::core::*;
use verifactu::verifactu::{
    Element, EncodedResult, PLACEHOLDER, QrEncoder, RecordOptions,
    create_invoice_record_with_encoder,
};

struct NoQr;

impl QrEncoder for NoQr {
    fn encode(&self, _url: &str) -> Result<String, VerifactuError> {
        Ok(String::new())
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 18, 12, 0, 0).unwrap()
}

fn software() -> SoftwareDescriptor {
    SoftwareDescriptorBuilder::new("Test Software", "TEST_ID", "1.0.0")
        .developer("Test Developer", "B00000000")
        .installation_number("12345")
        .build()
        .unwrap()
}

fn record(number: &str, base: Decimal, tax: Decimal) -> InvoiceRecord {
    InvoiceRecordBuilder::new(number, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap())
        .issuer(Party::new("99999990S", "Test Company S.L."))
        .description("Property test")
        .add_vat_line(VatLine::subject(base, dec!(21), tax))
        .totals(tax, base + tax)
        .build()
        .unwrap()
}

fn create(record: &InvoiceRecord, prior: Option<&ChainLink>, at: DateTime<Utc>) -> EncodedResult {
    create_invoice_record_with_encoder(
        record,
        &software(),
        prior,
        &RecordOptions::default().generated_at(at),
        &NoQr,
    )
    .unwrap()
}

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Amount with up to 4 decimals (-999999.9999 to 999999.9999).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-9_999_999_999i64..9_999_999_999i64, 0u32..=4).prop_map(|(units, scale)| Decimal::new(units, scale))
}

/// Positive two-decimal amount (0.01 to 99999.99).
fn arb_price() -> impl Strategy<Value = Decimal> {
    (1u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Serial numbers including characters that need escaping or URL encoding.
fn arb_serial() -> impl Strategy<Value = String> {
    "[A-Za-z0-9/&<>._-]{1,60}"
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn amounts_always_have_two_decimals(value in arb_amount()) {
        let text = format::amount(Some(value));
        let (_, decimals) = text.split_once('.').unwrap();
        prop_assert_eq!(decimals.len(), 2);
        let parsed: Decimal = text.parse().unwrap();
        prop_assert!((parsed - value).abs() <= dec!(0.005));
    }

    #[test]
    fn total_change_changes_fingerprint(base in arb_price(), tax in arb_price()) {
        let a = record("TEST/100", base, tax);
        let mut b = a.clone();
        b.total += dec!(0.01);
        prop_assert_ne!(
            create(&a, None, start()).fingerprint,
            create(&b, None, start()).fingerprint
        );
    }

    #[test]
    fn any_serial_survives_the_envelope(serial in arb_serial()) {
        let result = create(&record(&serial, dec!(100), dec!(21)), None, start());
        let xml = result.envelope_xml().unwrap();
        prop_assert!(!xml.contains(PLACEHOLDER));
        let tree = Element::parse(&xml).unwrap();
        prop_assert_eq!(tree.text_of("IDFactura/NumSerieFactura"), serial.as_str());
        prop_assert_eq!(&result.chain_link.number, &serial);
    }

    #[test]
    fn chained_records_link_to_their_predecessor(prices in prop::collection::vec(arb_price(), 1..=6)) {
        let mut prior: Option<ChainLink> = None;
        for (i, base) in prices.into_iter().enumerate() {
            let rec = record(&format!("TEST/{i:03}"), base, base * dec!(0.21));
            let at = start() + Duration::seconds(i as i64);
            let result = create(&rec, prior.as_ref(), at);
            let tree = Element::parse(&result.envelope_xml().unwrap()).unwrap();

            match &prior {
                None => prop_assert_eq!(tree.text_of("PrimerRegistro"), "S"),
                Some(link) => {
                    prop_assert!(tree.find("PrimerRegistro").is_none());
                    prop_assert_eq!(tree.text_of("RegistroAnterior/Huella"), link.fingerprint.as_str());
                }
            }
            prop_assert_eq!(result.fingerprint.len(), 64);
            prop_assert!(result.fingerprint.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
            prior = Some(result.chain_link);
        }
    }
}
