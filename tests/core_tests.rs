use chrono::NaiveDate;
use rust_decimal_macros::dec;
use verifactu::core::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// --- Builders ---

#[test]
fn complete_invoice_builds() {
    let record = InvoiceRecordBuilder::new("2024/A-0001", date(2024, 6, 15))
        .issuer(Party::new("B12345678", "Ferretería López S.L."))
        .recipient(Partner::Domestic {
            tax_id: "12345678Z".into(),
            name: "María García".into(),
        })
        .description("Herramientas")
        .add_vat_line(VatLine::subject(dec!(200), dec!(21), dec!(42)))
        .add_vat_line(VatLine::subject(dec!(50), dec!(10), dec!(5)).surcharge(dec!(1.4), dec!(0.7)))
        .totals(dec!(47.7), dec!(297.7))
        .build()
        .unwrap();

    assert_eq!(record.kind, InvoiceKind::Complete);
    assert_eq!(record.vat_lines.len(), 2);
    assert_eq!(record.vat_lines[1].surcharge_amount, Some(dec!(0.7)));
    assert_eq!(record.recipient.as_ref().unwrap().name(), "María García");
    assert!(record.withheld_amount.is_none());
}

#[test]
fn builder_collects_all_errors() {
    let err = InvoiceRecordBuilder::new("", date(2024, 6, 15)).build().unwrap_err();
    let fields: Vec<_> = err
        .validation_errors()
        .iter()
        .map(|e| e.field.as_str())
        .collect();
    assert_eq!(
        fields,
        [
            "tax_amount",
            "total",
            "issuer.tax_id",
            "issuer.name",
            "id.number",
            "description",
            "vat_lines"
        ]
    );
    assert!(err.to_string().starts_with("validation failed: [CuotaTotal] tax_amount"));
}

#[test]
fn rectifying_builder() {
    let record = InvoiceRecordBuilder::new("R-2024-01", date(2024, 7, 1))
        .issuer(Party::new("B12345678", "Ferretería López S.L."))
        .description("Devolución parcial")
        .kind(InvoiceKind::RectifyingLegal)
        .credit_note(CreditNote {
            ids: vec![InvoiceId::new("2024/A-0001", date(2024, 6, 15))],
            style: CorrectionStyle::Substitution,
            base: Some(dec!(200)),
            tax: Some(dec!(42)),
        })
        .add_vat_line(VatLine::subject(dec!(180), dec!(21), dec!(37.8)))
        .totals(dec!(37.8), dec!(217.8))
        .replacement()
        .previous_rejection()
        .build()
        .unwrap();
    assert!(record.kind.is_rectifying());
    assert!(record.id.replacement);
    assert!(record.previous_rejection);
}

#[test]
fn third_party_builder_requires_party() {
    let builder = || {
        InvoiceRecordBuilder::new("T-1", date(2024, 6, 15))
            .issuer(Party::new("B12345678", "Ferretería López S.L."))
            .description("Honorarios")
            .add_vat_line(VatLine::untaxed(dec!(100), VatOperation::N1))
            .totals(dec!(0), dec!(100))
            .issued_by(IssuedBy::ThirdParty)
    };
    assert!(builder().build().is_err());
    assert!(
        builder()
            .third_party(Party::new("A1234567B", "Asesoría S.A."))
            .withheld_amount(dec!(15))
            .build()
            .is_ok()
    );
}

// --- Serde ---

#[test]
fn invoice_record_from_json() {
    let json = r#"{
        "issuer": { "tax_id": "99999990S", "name": "Test Company S.L." },
        "recipient": {
            "kind": "foreign",
            "name": "Dupont SARL",
            "country": "FR",
            "id_type": "02",
            "id": "FR12345678901"
        },
        "id": { "number": "TEST/100", "issue_date": "2024-03-18" },
        "kind": "F1",
        "description": { "text": "Consulting" },
        "vat_lines": [
            {
                "base": "100.00",
                "rate": "21",
                "amount": "21.00",
                "operation": "S1",
                "regime_key": "01"
            },
            {
                "base": "50",
                "operation": "E6",
                "regime_key": "01",
                "tax": "03"
            }
        ],
        "tax_amount": "21.00",
        "total": "171.00",
        "issued_by": "N"
    }"#;

    let record: InvoiceRecord = serde_json::from_str(json).unwrap();
    assert!(validate_invoice_record(&record).is_empty());
    assert_eq!(record.total, dec!(171));
    assert_eq!(record.issued_by, Some(IssuedBy::Issuer));
    assert_eq!(record.vat_lines[1].tax, Some(TaxType::Igic));
    assert!(record.vat_lines[1].operation.is_exempt());
    assert!(matches!(
        record.recipient,
        Some(Partner::Foreign { id_type: IdType::VatNumber, .. })
    ));
    assert!(!record.id.replacement);
}

#[test]
fn software_and_chain_link_serde() {
    let software = SoftwareDescriptorBuilder::new("Billing", "BL", "2.1.0")
        .developer("Dev S.L.", "B00000000")
        .installation_number("7")
        .usage(true, false, false)
        .build()
        .unwrap();
    let json = serde_json::to_string(&software).unwrap();
    let back: SoftwareDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(back, software);

    let link: ChainLink = serde_json::from_str(
        r#"{
            "issuer_tax_id": "99999990S",
            "number": "TEST/100",
            "issue_date": "2024-03-18",
            "fingerprint": "143C231C0DA1B08E53C44BEBB70CD2CF0983E78F88492E897ACA6B7FB49B2027"
        }"#,
    )
    .unwrap();
    assert_eq!(link.issue_date, date(2024, 3, 18));
}

#[test]
fn cancellation_from_json() {
    let record: CancellationRecord = serde_json::from_str(
        r#"{
            "issuer": { "tax_id": "99999990S", "name": "Test Company S.L." },
            "id": { "number": "TEST/100", "issue_date": "2024-03-18" },
            "issued_by": "D"
        }"#,
    )
    .unwrap();
    let errors = validate_cancellation_record(&record);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "third_party");
}

// --- Encoders ---

#[test]
fn encoders_never_truncate() {
    let long = "x".repeat(121);
    assert!(matches!(
        format::bounded(Some(&long), format::max_len::NAME),
        Err(FormatError::TooLong { max: 120, .. })
    ));
    assert_eq!(
        format::bounded(Some(&long[..120]), format::max_len::NAME)
            .unwrap()
            .len(),
        120
    );
}
