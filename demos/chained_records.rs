use chrono::NaiveDate;
use rust_decimal_macros::dec;
use verifactu::core::*;
use verifactu::verifactu::{RecordOptions, create_cancellation_record, create_invoice_record};

fn main() {
    tracing_subscriber::fmt().init();

    let issuer = Party::new("99999990S", "Test Company S.L.");
    let software = SoftwareDescriptorBuilder::new("Test Software", "TEST_ID", "1.0.0")
        .developer("Test Developer", "B00000000")
        .installation_number("12345")
        .build()
        .expect("software descriptor should be valid");
    let options = RecordOptions::default();
    let date = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();

    // Each result's chain link is the prior of the next record
    let mut prior: Option<ChainLink> = None;
    for n in 100..103 {
        let record = InvoiceRecordBuilder::new(format!("TEST/{n}"), date)
            .issuer(issuer.clone())
            .description(format!("Monthly service {n}"))
            .add_vat_line(VatLine::subject(dec!(100), dec!(21), dec!(21)))
            .totals(dec!(21), dec!(121))
            .build()
            .expect("record should be valid");

        let result = create_invoice_record(&record, &software, prior.as_ref(), &options)
            .expect("record should encode");
        println!(
            "{:<10} prior={:<16} huella={}",
            result.chain_link.number,
            prior.as_ref().map_or("(first)", |p| &p.fingerprint[..16]),
            result.fingerprint
        );
        prior = Some(result.chain_link);
    }

    // Cancel the first invoice; the cancellation joins the same chain
    let cancellation = CancellationRecord {
        issuer: issuer.clone(),
        id: InvoiceId::new("TEST/100", date),
        ..Default::default()
    };
    let result = create_cancellation_record(&cancellation, &software, prior.as_ref(), &options)
        .expect("cancellation should encode");
    println!(
        "{:<10} prior={:<16} huella={}",
        result.chain_link.number,
        prior.as_ref().map_or("(first)", |p| &p.fingerprint[..16]),
        result.fingerprint
    );
    assert!(result.qr_code.is_none());
}
