use chrono::NaiveDate;
use rust_decimal_macros::dec;
use verifactu::core::*;
use verifactu::verifactu::{Environment, RecordOptions, create_invoice_record};

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    // A complete invoice (F1) to a domestic customer, 21% IVA plus a 10% line
    let record = InvoiceRecordBuilder::new("2024/A-0001", NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
        .issuer(Party::new("B12345678", "Ferretería López S.L."))
        .recipient(Partner::Domestic {
            tax_id: "12345678Z".into(),
            name: "María García".into(),
        })
        .description("Herramientas y material de obra")
        .add_vat_line(VatLine::subject(dec!(200), dec!(21), dec!(42)))
        .add_vat_line(VatLine::subject(dec!(50), dec!(10), dec!(5)))
        .totals(dec!(47), dec!(297))
        .build()
        .expect("record should be valid");

    let software = SoftwareDescriptorBuilder::new("Facturación López", "FL", "1.0.0")
        .developer("Desarrollos Ejemplo S.L.", "B00000000")
        .installation_number("1")
        .build()
        .expect("software descriptor should be valid");

    let result = create_invoice_record(&record, &software, None, &RecordOptions::new(Environment::Testing))
        .expect("record should encode");

    println!("Invoice:     {}", record.id.number);
    println!("Fingerprint: {}", result.fingerprint);
    println!("Endpoint:    {}", result.endpoint);
    println!("Next prior:  {:?}", result.chain_link);
    println!(
        "QR payload:  {} bytes",
        result.qr_code.as_deref().map_or(0, str::len)
    );
    println!("---");
    println!("{}", result.envelope_xml().expect("envelope should decode"));
}
