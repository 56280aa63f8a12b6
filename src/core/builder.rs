use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::codes::*;
use super::error::{ValidationError, VerifactuError};
use super::types::*;
use super::validation;

/// Builder for invoice records.
///
/// ```
/// use verifactu::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let record = InvoiceRecordBuilder::new("TEST/100", NaiveDate::from_ymd_opt(2024, 3, 18).unwrap())
///     .issuer(Party::new("99999990S", "Test Company S.L."))
///     .recipient(Partner::Domestic { tax_id: "B00000000".into(), name: "ACME Inc.".into() })
///     .description("Consulting services")
///     .add_vat_line(VatLine::subject(dec!(100), dec!(21), dec!(21)))
///     .totals(dec!(21), dec!(121))
///     .build()
///     .unwrap();
///
/// assert_eq!(record.kind, InvoiceKind::Complete);
/// ```
pub struct InvoiceRecordBuilder {
    issuer: Option<Party>,
    recipient: Option<Partner>,
    id: InvoiceId,
    kind: InvoiceKind,
    credit_note: Option<CreditNote>,
    replaced_ids: Vec<InvoiceId>,
    description: Option<Description>,
    vat_lines: Vec<VatLine>,
    tax_amount: Option<Decimal>,
    total: Option<Decimal>,
    issued_by: Option<IssuedBy>,
    third_party: Option<Party>,
    previous_rejection: bool,
    withheld_amount: Option<Decimal>,
}

impl InvoiceRecordBuilder {
    pub fn new(number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self {
            issuer: None,
            recipient: None,
            id: InvoiceId::new(number, issue_date),
            kind: InvoiceKind::Complete,
            credit_note: None,
            replaced_ids: Vec::new(),
            description: None,
            vat_lines: Vec::new(),
            tax_amount: None,
            total: None,
            issued_by: None,
            third_party: None,
            previous_rejection: false,
            withheld_amount: None,
        }
    }

    pub fn issuer(mut self, issuer: Party) -> Self {
        self.issuer = Some(issuer);
        self
    }

    pub fn recipient(mut self, recipient: Partner) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn kind(mut self, kind: InvoiceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the record as a correction (subsanación) of an accepted one.
    pub fn replacement(mut self) -> Self {
        self.id.replacement = true;
        self
    }

    pub fn credit_note(mut self, credit_note: CreditNote) -> Self {
        self.credit_note = Some(credit_note);
        self
    }

    pub fn replaces(mut self, id: InvoiceId) -> Self {
        self.replaced_ids.push(id);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        let operation_date = self.description.take().and_then(|d| d.operation_date);
        self.description = Some(Description {
            text: text.into(),
            operation_date,
        });
        self
    }

    pub fn operation_date(mut self, date: NaiveDate) -> Self {
        let description = self.description.get_or_insert_with(Description::default);
        description.operation_date = Some(date);
        self
    }

    pub fn add_vat_line(mut self, line: VatLine) -> Self {
        self.vat_lines.push(line);
        self
    }

    /// Declared total tax (`CuotaTotal`) and grand total (`ImporteTotal`).
    pub fn totals(mut self, tax_amount: Decimal, total: Decimal) -> Self {
        self.tax_amount = Some(tax_amount);
        self.total = Some(total);
        self
    }

    pub fn issued_by(mut self, issued_by: IssuedBy) -> Self {
        self.issued_by = Some(issued_by);
        self
    }

    pub fn third_party(mut self, party: Party) -> Self {
        self.third_party = Some(party);
        self
    }

    pub fn previous_rejection(mut self) -> Self {
        self.previous_rejection = true;
        self
    }

    pub fn withheld_amount(mut self, amount: Decimal) -> Self {
        self.withheld_amount = Some(amount);
        self
    }

    /// Build the record and run validation.
    /// Returns all validation errors (not just the first).
    pub fn build(self) -> Result<InvoiceRecord, VerifactuError> {
        let mut errors = Vec::new();
        if self.tax_amount.is_none() {
            errors.push(ValidationError::with_rule(
                "tax_amount",
                "declared tax amount is required",
                "CuotaTotal",
            ));
        }
        if self.total.is_none() {
            errors.push(ValidationError::with_rule(
                "total",
                "declared total is required",
                "ImporteTotal",
            ));
        }

        let record = self.build_unchecked();
        errors.extend(validation::validate_invoice_record(&record));
        if !errors.is_empty() {
            return Err(VerifactuError::Validation(errors));
        }
        Ok(record)
    }

    /// Build without validation, for tests or data imported from elsewhere.
    pub fn build_unchecked(self) -> InvoiceRecord {
        InvoiceRecord {
            issuer: self.issuer.unwrap_or_default(),
            recipient: self.recipient,
            id: self.id,
            kind: self.kind,
            credit_note: self.credit_note,
            replaced_ids: self.replaced_ids,
            description: self.description,
            vat_lines: self.vat_lines,
            tax_amount: self.tax_amount.unwrap_or_default(),
            total: self.total.unwrap_or_default(),
            issued_by: self.issued_by,
            third_party: self.third_party,
            previous_rejection: self.previous_rejection,
            withheld_amount: self.withheld_amount,
        }
    }
}

/// Builder for the software descriptor.
pub struct SoftwareDescriptorBuilder {
    software: SoftwareDescriptor,
}

impl SoftwareDescriptorBuilder {
    pub fn new(name: impl Into<String>, id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            software: SoftwareDescriptor {
                name: name.into(),
                id: id.into(),
                version: version.into(),
                ..Default::default()
            },
        }
    }

    pub fn developer(mut self, name: impl Into<String>, tax_id: impl Into<String>) -> Self {
        self.software.developer_name = name.into();
        self.software.developer_tax_id = tax_id.into();
        self
    }

    pub fn installation_number(mut self, number: impl Into<String>) -> Self {
        self.software.installation_number = number.into();
        self
    }

    /// Usage flags: VeriFactu-only, multi-taxpayer capable, currently multi-taxpayer.
    pub fn usage(mut self, verifactu_only: bool, multi_taxpayer: bool, current_multi: bool) -> Self {
        self.software.verifactu_only = verifactu_only;
        self.software.multi_taxpayer = multi_taxpayer;
        self.software.current_multi_taxpayer = current_multi;
        self
    }

    pub fn build(self) -> Result<SoftwareDescriptor, VerifactuError> {
        let errors = validation::validate_software(&self.software);
        if !errors.is_empty() {
            return Err(VerifactuError::Validation(errors));
        }
        Ok(self.software)
    }
}
