//! Closed AEAT code lists used by VeriFactu records.

use serde::{Deserialize, Serialize};

/// L2: Invoice kind (`TipoFactura`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InvoiceKind {
    /// F1: Complete invoice.
    #[default]
    #[serde(rename = "F1")]
    Complete,
    /// F2: Simplified invoice (no recipient identified).
    #[serde(rename = "F2")]
    Simplified,
    /// F3: Invoice replacing previously issued simplified invoices.
    #[serde(rename = "F3")]
    ReplacesSimplified,
    /// R1: Rectifying invoice (art. 80.1, 80.2 and error in law).
    #[serde(rename = "R1")]
    RectifyingLegal,
    /// R2: Rectifying invoice (art. 80.3, insolvency).
    #[serde(rename = "R2")]
    RectifyingInsolvency,
    /// R3: Rectifying invoice (art. 80.4, bad debt).
    #[serde(rename = "R3")]
    RectifyingBadDebt,
    /// R4: Rectifying invoice (other causes).
    #[serde(rename = "R4")]
    RectifyingOther,
    /// R5: Rectifying simplified invoice.
    #[serde(rename = "R5")]
    RectifyingSimplified,
}

impl InvoiceKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Complete => "F1",
            Self::Simplified => "F2",
            Self::ReplacesSimplified => "F3",
            Self::RectifyingLegal => "R1",
            Self::RectifyingInsolvency => "R2",
            Self::RectifyingBadDebt => "R3",
            Self::RectifyingOther => "R4",
            Self::RectifyingSimplified => "R5",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "F1" => Some(Self::Complete),
            "F2" => Some(Self::Simplified),
            "F3" => Some(Self::ReplacesSimplified),
            "R1" => Some(Self::RectifyingLegal),
            "R2" => Some(Self::RectifyingInsolvency),
            "R3" => Some(Self::RectifyingBadDebt),
            "R4" => Some(Self::RectifyingOther),
            "R5" => Some(Self::RectifyingSimplified),
            _ => None,
        }
    }

    /// R1–R5.
    pub fn is_rectifying(&self) -> bool {
        self.code().starts_with('R')
    }
}

/// L6: How a rectifying invoice corrects the original (`TipoRectificativa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorrectionStyle {
    /// S: Replaces the rectified amounts entirely.
    #[serde(rename = "S")]
    Substitution,
    /// I: Carries only the differences.
    #[serde(rename = "I")]
    Differences,
}

impl CorrectionStyle {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Substitution => "S",
            Self::Differences => "I",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::Substitution),
            "I" => Some(Self::Differences),
            _ => None,
        }
    }
}

/// L9 / L10: Subjection or exemption of a breakdown line.
///
/// Subject lines carry rate and amount; not-subject and exempt lines carry
/// only the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatOperation {
    /// S1: Subject, not exempt, no reverse charge.
    S1,
    /// S2: Subject, not exempt, reverse charge.
    S2,
    /// N1: Not subject (articles 7, 14, others).
    N1,
    /// N2: Not subject due to location rules.
    N2,
    /// E1: Exempt under article 20.
    E1,
    /// E2: Exempt under article 21.
    E2,
    /// E3: Exempt under article 22.
    E3,
    /// E4: Exempt under articles 23 and 24.
    E4,
    /// E5: Exempt under article 25.
    E5,
    /// E6: Exempt for other reasons.
    E6,
}

impl VatOperation {
    pub fn code(&self) -> &'static str {
        match self {
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::N1 => "N1",
            Self::N2 => "N2",
            Self::E1 => "E1",
            Self::E2 => "E2",
            Self::E3 => "E3",
            Self::E4 => "E4",
            Self::E5 => "E5",
            Self::E6 => "E6",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S1" => Some(Self::S1),
            "S2" => Some(Self::S2),
            "N1" => Some(Self::N1),
            "N2" => Some(Self::N2),
            "E1" => Some(Self::E1),
            "E2" => Some(Self::E2),
            "E3" => Some(Self::E3),
            "E4" => Some(Self::E4),
            "E5" => Some(Self::E5),
            "E6" => Some(Self::E6),
            _ => None,
        }
    }

    pub fn is_subject(&self) -> bool {
        matches!(self, Self::S1 | Self::S2)
    }

    pub fn is_exempt(&self) -> bool {
        self.code().starts_with('E')
    }
}

/// L1: Tax the breakdown line refers to (`Impuesto`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaxType {
    /// 01: IVA.
    #[default]
    #[serde(rename = "01")]
    Iva,
    /// 02: IPSI (Ceuta and Melilla).
    #[serde(rename = "02")]
    Ipsi,
    /// 03: IGIC (Canary Islands).
    #[serde(rename = "03")]
    Igic,
    /// 05: Other.
    #[serde(rename = "05")]
    Other,
}

impl TaxType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Iva => "01",
            Self::Ipsi => "02",
            Self::Igic => "03",
            Self::Other => "05",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "01" => Some(Self::Iva),
            "02" => Some(Self::Ipsi),
            "03" => Some(Self::Igic),
            "05" => Some(Self::Other),
            _ => None,
        }
    }
}

/// L7: Identification document of a foreign partner (`IDType`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdType {
    /// 02: EU VAT number.
    #[serde(rename = "02")]
    VatNumber,
    /// 03: Passport.
    #[serde(rename = "03")]
    Passport,
    /// 04: Official identity document of the country of residence.
    #[serde(rename = "04")]
    OfficialDocument,
    /// 05: Certificate of residence.
    #[serde(rename = "05")]
    ResidenceCertificate,
    /// 06: Other supporting document.
    #[serde(rename = "06")]
    OtherDocument,
    /// 07: Not registered in the census.
    #[serde(rename = "07")]
    NotRegistered,
}

impl IdType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::VatNumber => "02",
            Self::Passport => "03",
            Self::OfficialDocument => "04",
            Self::ResidenceCertificate => "05",
            Self::OtherDocument => "06",
            Self::NotRegistered => "07",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "02" => Some(Self::VatNumber),
            "03" => Some(Self::Passport),
            "04" => Some(Self::OfficialDocument),
            "05" => Some(Self::ResidenceCertificate),
            "06" => Some(Self::OtherDocument),
            "07" => Some(Self::NotRegistered),
            _ => None,
        }
    }
}

/// Who physically issued the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuedBy {
    /// The invoice issuer itself.
    #[serde(rename = "N")]
    Issuer,
    /// A third party on behalf of the issuer.
    #[serde(rename = "T")]
    ThirdParty,
    /// The recipient (self-billing).
    #[serde(rename = "D")]
    Recipient,
}

impl IssuedBy {
    /// Code for `EmitidaPorTerceroODestinatario` in creation records.
    /// `Issuer` has no code there; the leaf is omitted.
    pub fn creation_code(&self) -> Option<&'static str> {
        match self {
            Self::Issuer => None,
            Self::ThirdParty => Some("T"),
            Self::Recipient => Some("D"),
        }
    }

    /// Code for `GeneradoPor` in cancellation records.
    pub fn cancellation_code(&self) -> &'static str {
        match self {
            Self::Issuer => "E",
            Self::ThirdParty => "T",
            Self::Recipient => "D",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_kind_roundtrip() {
        for code in ["F1", "F2", "F3", "R1", "R2", "R3", "R4", "R5"] {
            let kind = InvoiceKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(InvoiceKind::from_code("F4"), None);
    }

    #[test]
    fn rectifying_kinds() {
        assert!(!InvoiceKind::Complete.is_rectifying());
        assert!(!InvoiceKind::ReplacesSimplified.is_rectifying());
        assert!(InvoiceKind::RectifyingLegal.is_rectifying());
        assert!(InvoiceKind::RectifyingSimplified.is_rectifying());
    }

    #[test]
    fn vat_operation_classes() {
        assert!(VatOperation::S1.is_subject());
        assert!(VatOperation::S2.is_subject());
        assert!(!VatOperation::N1.is_subject());
        assert!(!VatOperation::N1.is_exempt());
        assert!(VatOperation::E6.is_exempt());
        assert_eq!(VatOperation::from_code("E3"), Some(VatOperation::E3));
        assert_eq!(VatOperation::from_code("S3"), None);
    }

    #[test]
    fn issued_by_codes() {
        assert_eq!(IssuedBy::Issuer.creation_code(), None);
        assert_eq!(IssuedBy::ThirdParty.creation_code(), Some("T"));
        assert_eq!(IssuedBy::Recipient.creation_code(), Some("D"));
        assert_eq!(IssuedBy::Issuer.cancellation_code(), "E");
    }

    #[test]
    fn tax_type_default_is_iva() {
        assert_eq!(TaxType::default().code(), "01");
        assert_eq!(TaxType::from_code("03"), Some(TaxType::Igic));
        assert_eq!(TaxType::from_code("04"), None);
    }

    #[test]
    fn id_type_roundtrip() {
        for code in ["02", "03", "04", "05", "06", "07"] {
            assert_eq!(IdType::from_code(code).unwrap().code(), code);
        }
        assert_eq!(CorrectionStyle::from_code("I"), Some(CorrectionStyle::Differences));
    }
}
