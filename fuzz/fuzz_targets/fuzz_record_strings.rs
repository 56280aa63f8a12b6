#![no_main]

use chrono::{NaiveDate, TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;
use verifactu::core::*;
use verifactu::verifactu::{Element, QrEncoder, RecordOptions, create_invoice_record_with_encoder};

struct NoQr;

impl QrEncoder for NoQr {
    fn encode(&self, _url: &str) -> Result<String, VerifactuError> {
        Ok(String::new())
    }
}

fuzz_target!(|input: (&str, &str, &str)| {
    let (number, name, description) = input;
    let date = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
    let record = InvoiceRecordBuilder::new(number, date)
        .issuer(Party::new("99999990S", name))
        .description(description)
        .add_vat_line(VatLine::subject(Decimal::new(100, 0), Decimal::new(21, 0), Decimal::new(21, 0)))
        .totals(Decimal::new(21, 0), Decimal::new(121, 0))
        .build_unchecked();
    let software = SoftwareDescriptorBuilder::new("Fuzz", "FZ", "1.0")
        .developer("Fuzz S.L.", "B00000000")
        .installation_number("1")
        .build()
        .unwrap();
    let options = RecordOptions::default().generated_at(Utc.with_ymd_and_hms(2024, 3, 18, 12, 0, 0).unwrap());

    // Whatever the strings, a successful result must parse back.
    if let Ok(result) = create_invoice_record_with_encoder(&record, &software, None, &options, &NoQr) {
        let xml = result.envelope_xml().unwrap();
        assert!(Element::parse(&xml).is_ok());
    }
});
