use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::codes::*;

/// `RegistroAlta`: an invoice to be reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// `IDEmisorFactura` / `NombreRazonEmisor`.
    pub issuer: Party,
    /// `Destinatarios`. `None` expresses a simplified invoice.
    #[serde(default)]
    pub recipient: Option<Partner>,
    /// `IDFactura`.
    pub id: InvoiceId,
    /// `TipoFactura`.
    #[serde(default)]
    pub kind: InvoiceKind,
    /// `FacturasRectificadas` / `TipoRectificativa` / `ImporteRectificacion`.
    #[serde(default)]
    pub credit_note: Option<CreditNote>,
    /// `FacturasSustituidas`: simplified invoices replaced by an F3 record.
    #[serde(default)]
    pub replaced_ids: Vec<InvoiceId>,
    /// `DescripcionOperacion` / `FechaOperacion`.
    #[serde(default)]
    pub description: Option<Description>,
    /// `Desglose`.
    pub vat_lines: Vec<VatLine>,
    /// `CuotaTotal`: declared total tax.
    pub tax_amount: Decimal,
    /// `ImporteTotal`: declared grand total.
    pub total: Decimal,
    /// `EmitidaPorTerceroODestinatario`.
    #[serde(default)]
    pub issued_by: Option<IssuedBy>,
    /// `Tercero`: required when issued by a third party.
    #[serde(default)]
    pub third_party: Option<Party>,
    /// `RechazoPrevio`: resubmission after the authority rejected the record.
    #[serde(default)]
    pub previous_rejection: bool,
    /// `RetencionSoportada`. Omitted when absent or zero.
    #[serde(default)]
    pub withheld_amount: Option<Decimal>,
}

/// `RegistroAnulacion`: cancellation of a previously reported invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancellationRecord {
    /// Issuer of the cancelled invoice.
    pub issuer: Party,
    /// Identification of the cancelled invoice.
    pub id: InvoiceId,
    /// `GeneradoPor`.
    #[serde(default)]
    pub issued_by: Option<IssuedBy>,
    /// `Generador`: required when generated by a third party or the recipient.
    #[serde(default)]
    pub third_party: Option<Party>,
}

/// Name plus Spanish tax identifier (NIF).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub tax_id: String,
    pub name: String,
}

impl Party {
    pub fn new(tax_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tax_id: tax_id.into(),
            name: name.into(),
        }
    }
}

/// Invoice recipient (`IDDestinatario`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Partner {
    /// Identified by a Spanish NIF.
    Domestic { tax_id: String, name: String },
    /// Identified by a foreign document (`IDOtro`).
    Foreign {
        name: String,
        /// ISO 3166-1 alpha-2 country code.
        country: String,
        id_type: IdType,
        id: String,
    },
}

impl Partner {
    pub fn name(&self) -> &str {
        match self {
            Self::Domestic { name, .. } | Self::Foreign { name, .. } => name,
        }
    }
}

/// `IDFactura`: serial number plus issue date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceId {
    /// `NumSerieFactura`.
    pub number: String,
    /// `FechaExpedicionFactura`.
    pub issue_date: NaiveDate,
    /// `Subsanacion`: this record corrects a previously accepted one.
    #[serde(default)]
    pub replacement: bool,
}

impl InvoiceId {
    pub fn new(number: impl Into<String>, issue_date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            issue_date,
            replacement: false,
        }
    }
}

/// Free-text description of the operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub text: String,
    /// Date the operation took place, if different from the issue date.
    #[serde(default)]
    pub operation_date: Option<NaiveDate>,
}

/// One `DetalleDesglose` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatLine {
    /// `BaseImponibleOimporteNoSujeto`.
    pub base: Decimal,
    /// `TipoImpositivo` (percent). Only written for subject lines.
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// `CuotaRepercutida`. Only written for subject lines.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// `TipoRecargoEquivalencia`.
    #[serde(default)]
    pub surcharge_rate: Option<Decimal>,
    /// `CuotaRecargoEquivalencia`.
    #[serde(default)]
    pub surcharge_amount: Option<Decimal>,
    /// `CalificacionOperacion` or `OperacionExenta`.
    pub operation: VatOperation,
    /// `ClaveRegimen`: two-digit regime key (e.g. "01" general regime).
    pub regime_key: String,
    /// `Impuesto`. Defaults to IVA.
    #[serde(default)]
    pub tax: Option<TaxType>,
    /// Line falls under a simplified VAT regime.
    /// Informational; the record schema has no leaf for it.
    #[serde(default)]
    pub simplified_regime: bool,
}

impl VatLine {
    /// Subject line (S1) under the general regime.
    pub fn subject(base: Decimal, rate: Decimal, amount: Decimal) -> Self {
        Self {
            base,
            rate: Some(rate),
            amount: Some(amount),
            surcharge_rate: None,
            surcharge_amount: None,
            operation: VatOperation::S1,
            regime_key: "01".into(),
            tax: None,
            simplified_regime: false,
        }
    }

    /// Exempt or not-subject line carrying only its base.
    pub fn untaxed(base: Decimal, operation: VatOperation) -> Self {
        Self {
            base,
            rate: None,
            amount: None,
            surcharge_rate: None,
            surcharge_amount: None,
            operation,
            regime_key: "01".into(),
            tax: None,
            simplified_regime: false,
        }
    }

    pub fn regime_key(mut self, key: impl Into<String>) -> Self {
        self.regime_key = key.into();
        self
    }

    pub fn operation(mut self, operation: VatOperation) -> Self {
        self.operation = operation;
        self
    }

    pub fn tax(mut self, tax: TaxType) -> Self {
        self.tax = Some(tax);
        self
    }

    pub fn surcharge(mut self, rate: Decimal, amount: Decimal) -> Self {
        self.surcharge_rate = Some(rate);
        self.surcharge_amount = Some(amount);
        self
    }

    pub fn simplified_regime(mut self, simplified: bool) -> Self {
        self.simplified_regime = simplified;
        self
    }
}

/// Invoices corrected by a rectifying record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNote {
    /// `FacturasRectificadas`.
    pub ids: Vec<InvoiceId>,
    /// `TipoRectificativa`.
    pub style: CorrectionStyle,
    /// `ImporteRectificacion/BaseRectificada` (substitution style only).
    #[serde(default)]
    pub base: Option<Decimal>,
    /// `ImporteRectificacion/CuotaRectificada` (substitution style only).
    #[serde(default)]
    pub tax: Option<Decimal>,
}

/// `SistemaInformatico`: the invoicing software producing the records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareDescriptor {
    /// `NombreRazon` of the developer.
    pub developer_name: String,
    /// `NIF` of the developer.
    pub developer_tax_id: String,
    /// `NombreSistemaInformatico`.
    pub name: String,
    /// `IdSistemaInformatico`.
    pub id: String,
    /// `Version`.
    pub version: String,
    /// `NumeroInstalacion`.
    pub installation_number: String,
    /// `TipoUsoPosibleSoloVerifactu`.
    pub verifactu_only: bool,
    /// `TipoUsoPosibleMultiOT`.
    pub multi_taxpayer: bool,
    /// `IndicadorMultiplesOT`.
    pub current_multi_taxpayer: bool,
}

/// Link to a record in the hash chain (`RegistroAnterior`).
///
/// Returned for the record just built; pass it as `prior` to the next call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub issuer_tax_id: String,
    pub number: String,
    pub issue_date: NaiveDate,
    /// 64-character hexadecimal SHA-256 fingerprint.
    pub fingerprint: String,
}
