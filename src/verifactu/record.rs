use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::qr::{QrEncoder, verification_url};
use super::{Environment, assemble, chain, envelope};
use crate::core::*;

/// Per-call settings for the record orchestrators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOptions {
    /// Identifier of the invoicing device. Reserved for device-bound installations.
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub environment: Environment,
    /// Pinned `FechaHoraHusoGenRegistro`; the current time when absent.
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl RecordOptions {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Default::default()
        }
    }

    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }
}

/// Output of a record orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedResult {
    /// QR image payload. Always present for invoices, absent for cancellations.
    pub qr_code: Option<String>,
    /// Link to pass as `prior` to the next record.
    pub chain_link: ChainLink,
    /// Base64 (standard alphabet, padded) of the SOAP envelope.
    pub envelope: String,
    pub wsdl: String,
    pub endpoint: String,
    pub fingerprint: String,
}

impl EncodedResult {
    fn new(
        qr_code: Option<String>,
        chain_link: ChainLink,
        xml: &str,
        environment: Environment,
    ) -> Self {
        Self {
            qr_code,
            fingerprint: chain_link.fingerprint.clone(),
            chain_link,
            envelope: STANDARD.encode(xml),
            wsdl: environment.wsdl_url().to_string(),
            endpoint: environment.endpoint_url().to_string(),
        }
    }

    /// The SOAP envelope as XML text.
    pub fn envelope_xml(&self) -> Result<String, VerifactuError> {
        let bytes = STANDARD
            .decode(&self.envelope)
            .map_err(|e| VerifactuError::Xml(format!("envelope is not base64: {e}")))?;
        String::from_utf8(bytes).map_err(|e| VerifactuError::Xml(format!("XML UTF-8 error: {e}")))
    }
}

/// Build, chain and wrap an invoice record (`RegistroAlta`), rendering the
/// QR code as SVG.
#[cfg(feature = "qr")]
pub fn create_invoice_record(
    record: &InvoiceRecord,
    software: &SoftwareDescriptor,
    prior: Option<&ChainLink>,
    options: &RecordOptions,
) -> Result<EncodedResult, VerifactuError> {
    create_invoice_record_with_encoder(
        record,
        software,
        prior,
        options,
        &super::qr::SvgQrEncoder::default(),
    )
}

/// Build, chain and wrap an invoice record (`RegistroAlta`).
///
/// Nothing is assembled unless `record` and `software` pass validation; the
/// first encoding error aborts the call.
pub fn create_invoice_record_with_encoder(
    record: &InvoiceRecord,
    software: &SoftwareDescriptor,
    prior: Option<&ChainLink>,
    options: &RecordOptions,
    encoder: &dyn QrEncoder,
) -> Result<EncodedResult, VerifactuError> {
    let mut errors = validate_invoice_record(record);
    errors.extend(validate_software(software));
    if !errors.is_empty() {
        warn!(number = %record.id.number, errors = errors.len(), "invoice record rejected");
        return Err(VerifactuError::Validation(errors));
    }

    let generated_at = options.generated_at.unwrap_or_else(Utc::now);
    debug!(device_id = ?options.device_id, %generated_at, "building invoice record");

    let mut tree = assemble::assemble_invoice(record, software, prior, generated_at)?;
    chain::seal(&mut tree)?;
    let qr_code = encoder.encode(&verification_url(&tree, options.environment))?;
    let chain_link = chain::chain_link(&tree)?;
    let xml = envelope::wrap_envelope(&tree, &record.issuer)?;

    info!(
        number = %chain_link.number,
        fingerprint = %chain_link.fingerprint,
        environment = ?options.environment,
        "invoice record created"
    );
    Ok(EncodedResult::new(
        Some(qr_code),
        chain_link,
        &xml,
        options.environment,
    ))
}

/// Build, chain and wrap a cancellation record (`RegistroAnulacion`).
/// Cancellations carry no QR code.
pub fn create_cancellation_record(
    record: &CancellationRecord,
    software: &SoftwareDescriptor,
    prior: Option<&ChainLink>,
    options: &RecordOptions,
) -> Result<EncodedResult, VerifactuError> {
    let mut errors = validate_cancellation_record(record);
    errors.extend(validate_software(software));
    if !errors.is_empty() {
        warn!(number = %record.id.number, errors = errors.len(), "cancellation record rejected");
        return Err(VerifactuError::Validation(errors));
    }

    let generated_at = options.generated_at.unwrap_or_else(Utc::now);
    debug!(device_id = ?options.device_id, %generated_at, "building cancellation record");

    let mut tree = assemble::assemble_cancellation(record, software, prior, generated_at)?;
    chain::seal(&mut tree)?;
    let chain_link = chain::chain_link(&tree)?;
    let xml = envelope::wrap_envelope(&tree, &record.issuer)?;

    info!(
        number = %chain_link.number,
        fingerprint = %chain_link.fingerprint,
        environment = ?options.environment,
        "cancellation record created"
    );
    Ok(EncodedResult::new(None, chain_link, &xml, options.environment))
}
