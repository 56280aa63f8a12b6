use super::codes::{InvoiceKind, IssuedBy};
use super::error::ValidationError;
use super::types::*;

/// Validate an invoice record before any XML is built.
/// Returns all validation errors found (not just the first).
///
/// Field shapes (NIF pattern, lengths) are checked later by the encoders;
/// this pass only rejects records that are structurally incomplete.
pub fn validate_invoice_record(record: &InvoiceRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_issuer(&record.issuer, "IDEmisorFactura", &mut errors);
    validate_id(&record.id, "NumSerieFactura", &mut errors);

    if record
        .description
        .as_ref()
        .is_none_or(|d| d.text.trim().is_empty())
    {
        errors.push(ValidationError::with_rule(
            "description",
            "operation description is required",
            "DescripcionOperacion",
        ));
    }

    if record.vat_lines.is_empty() {
        errors.push(ValidationError::with_rule(
            "vat_lines",
            "at least one VAT line is required",
            "Desglose",
        ));
    }

    for (i, line) in record.vat_lines.iter().enumerate() {
        if line.regime_key.trim().is_empty() {
            errors.push(ValidationError::with_rule(
                format!("vat_lines[{i}].regime_key"),
                "regime key must not be empty",
                "ClaveRegimen",
            ));
        }
    }

    if record.issued_by == Some(IssuedBy::ThirdParty) {
        match &record.third_party {
            None => errors.push(ValidationError::with_rule(
                "third_party",
                "records issued by a third party must identify it",
                "Tercero",
            )),
            Some(party) => validate_party(party, "third_party", "Tercero", &mut errors),
        }
    }

    if let Some(credit_note) = &record.credit_note {
        if !record.kind.is_rectifying() {
            errors.push(ValidationError::with_rule(
                "credit_note",
                format!(
                    "only rectifying invoices (R1-R5) can rectify others, got {}",
                    record.kind.code()
                ),
                "FacturasRectificadas",
            ));
        }
        for (i, id) in credit_note.ids.iter().enumerate() {
            validate_id(id, &format!("credit_note.ids[{i}]"), &mut errors);
        }
    }

    if !record.replaced_ids.is_empty() && record.kind != InvoiceKind::ReplacesSimplified {
        errors.push(ValidationError::with_rule(
            "replaced_ids",
            format!(
                "only F3 invoices can replace simplified invoices, got {}",
                record.kind.code()
            ),
            "FacturasSustituidas",
        ));
    }

    errors
}

/// Validate a cancellation record before any XML is built.
pub fn validate_cancellation_record(record: &CancellationRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_issuer(&record.issuer, "IDEmisorFacturaAnulada", &mut errors);
    validate_id(&record.id, "NumSerieFacturaAnulada", &mut errors);

    if matches!(
        record.issued_by,
        Some(IssuedBy::ThirdParty) | Some(IssuedBy::Recipient)
    ) {
        match &record.third_party {
            None => errors.push(ValidationError::with_rule(
                "third_party",
                "cancellations generated by a third party or the recipient must identify the generator",
                "Generador",
            )),
            Some(party) => validate_party(party, "third_party", "Generador", &mut errors),
        }
    }

    errors
}

/// All six identity fields of the software descriptor must be present.
pub fn validate_software(software: &SoftwareDescriptor) -> Vec<ValidationError> {
    let fields = [
        ("software.developer_name", &software.developer_name, "NombreRazon"),
        ("software.developer_tax_id", &software.developer_tax_id, "NIF"),
        ("software.name", &software.name, "NombreSistemaInformatico"),
        ("software.id", &software.id, "IdSistemaInformatico"),
        ("software.version", &software.version, "Version"),
        (
            "software.installation_number",
            &software.installation_number,
            "NumeroInstalacion",
        ),
    ];

    fields
        .into_iter()
        .filter(|(_, value, _)| value.trim().is_empty())
        .map(|(field, _, leaf)| ValidationError::with_rule(field, "must not be empty", leaf))
        .collect()
}

fn validate_issuer(issuer: &Party, leaf: &str, errors: &mut Vec<ValidationError>) {
    if issuer.tax_id.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "issuer.tax_id",
            "issuer tax ID is required",
            leaf,
        ));
    }
    if issuer.name.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "issuer.name",
            "issuer name is required",
            "NombreRazon",
        ));
    }
}

fn validate_id(id: &InvoiceId, leaf: &str, errors: &mut Vec<ValidationError>) {
    if id.number.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "id.number",
            "invoice serial number is required",
            leaf,
        ));
    }
}

fn validate_party(party: &Party, prefix: &str, leaf: &str, errors: &mut Vec<ValidationError>) {
    if party.tax_id.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.tax_id"),
            "tax ID is required",
            leaf,
        ));
    }
    if party.name.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.name"),
            "name is required",
            leaf,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CorrectionStyle, VatLine};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record() -> InvoiceRecord {
        InvoiceRecord {
            issuer: Party::new("99999990S", "Test Company S.L."),
            id: InvoiceId::new("TEST/100", NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()),
            description: Some(Description {
                text: "Consulting".into(),
                operation_date: None,
            }),
            vat_lines: vec![VatLine::subject(dec!(100), dec!(21), dec!(21))],
            tax_amount: dec!(21),
            total: dec!(121),
            ..Default::default()
        }
    }

    #[test]
    fn complete_record_passes() {
        assert!(validate_invoice_record(&record()).is_empty());
    }

    #[test]
    fn empty_record_reports_every_gap() {
        let errors = validate_invoice_record(&InvoiceRecord::default());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            ["issuer.tax_id", "issuer.name", "id.number", "description", "vat_lines"]
        );
    }

    #[test]
    fn blank_description_is_rejected() {
        let mut rec = record();
        rec.description = Some(Description {
            text: " ".into(),
            operation_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        });
        let errors = validate_invoice_record(&rec);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "description");
        assert_eq!(errors[0].rule.as_deref(), Some("DescripcionOperacion"));

        rec.description = None;
        assert_eq!(validate_invoice_record(&rec).len(), 1);
    }

    #[test]
    fn third_party_required_when_issued_by_third_party() {
        let mut rec = record();
        rec.issued_by = Some(IssuedBy::ThirdParty);
        let errors = validate_invoice_record(&rec);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("Tercero"));

        rec.third_party = Some(Party::new("B12345678", "Gestoría S.L."));
        assert!(validate_invoice_record(&rec).is_empty());
    }

    #[test]
    fn credit_note_requires_rectifying_kind() {
        let mut rec = record();
        rec.credit_note = Some(CreditNote {
            ids: vec![InvoiceId::new("TEST/001", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())],
            style: CorrectionStyle::Differences,
            base: None,
            tax: None,
        });
        assert_eq!(validate_invoice_record(&rec).len(), 1);

        rec.kind = InvoiceKind::RectifyingOther;
        assert!(validate_invoice_record(&rec).is_empty());
    }

    #[test]
    fn replaced_ids_require_f3() {
        let mut rec = record();
        rec.replaced_ids = vec![InvoiceId::new(
            "T-77",
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )];
        assert_eq!(validate_invoice_record(&rec).len(), 1);
        rec.kind = InvoiceKind::ReplacesSimplified;
        assert!(validate_invoice_record(&rec).is_empty());
    }

    #[test]
    fn empty_cancellation_fails() {
        let errors = validate_cancellation_record(&CancellationRecord::default());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn cancellation_by_recipient_needs_generator() {
        let rec = CancellationRecord {
            issuer: Party::new("99999990S", "Test Company S.L."),
            id: InvoiceId::new("TEST/100", NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()),
            issued_by: Some(IssuedBy::Recipient),
            third_party: None,
        };
        let errors = validate_cancellation_record(&rec);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule.as_deref(), Some("Generador"));
    }

    #[test]
    fn software_needs_all_identity_fields() {
        let errors = validate_software(&SoftwareDescriptor::default());
        assert_eq!(errors.len(), 6);

        let software = SoftwareDescriptor {
            developer_name: "Dev".into(),
            developer_tax_id: "B00000000".into(),
            name: "Billing".into(),
            id: "BL".into(),
            version: "1.0".into(),
            installation_number: " ".into(),
            ..Default::default()
        };
        let errors = validate_software(&software);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "software.installation_number");
    }
}
