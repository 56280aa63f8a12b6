//! VeriFactu record generation: assembly, hash chaining, SOAP envelope and QR.
//!
//! Produces `RegistroAlta` (invoice) and `RegistroAnulacion` (cancellation)
//! records for the AEAT `SistemaFacturacion` web service.
//!
//! # Example
//!
//! ```no_run
//! use verifactu::core::*;
//! use verifactu::verifactu::{RecordOptions, create_invoice_record};
//!
//! let record: InvoiceRecord = todo!(); // build via InvoiceRecordBuilder
//! let software: SoftwareDescriptor = todo!();
//! let first = create_invoice_record(&record, &software, None, &RecordOptions::default()).unwrap();
//! let second = create_invoice_record(&record, &software, Some(&first.chain_link), &RecordOptions::default()).unwrap();
//! ```

mod assemble;
pub mod chain;
mod envelope;
mod qr;
mod record;
mod template;
mod tree;
pub(crate) mod xml_utils;

use serde::{Deserialize, Serialize};

pub use assemble::{assemble_cancellation, assemble_invoice};
pub use envelope::{PRUNED_LEAVES, wrap_envelope};
#[cfg(feature = "qr")]
pub use qr::SvgQrEncoder;
pub use qr::{QrEncoder, verification_url};
#[cfg(feature = "qr")]
pub use record::create_invoice_record;
pub use record::{
    EncodedResult, RecordOptions, create_cancellation_record, create_invoice_record_with_encoder,
};
pub use template::{PLACEHOLDER, cancellation_skeleton, invoice_skeleton};
pub use tree::Element;

/// Namespace URIs used by the SOAP envelope.
pub mod ns {
    pub const SOAP_ENVELOPE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
    /// `sum:` prefix.
    pub const SUMINISTRO_LR: &str = "https://www2.agenciatributaria.gob.es/static_files/common/internet/dep/aplicaciones/es/aeat/tike/cont/ws/SuministroLR.xsd";
    /// `sum1:` prefix, used by every record element.
    pub const SUMINISTRO_INFORMACION: &str = "https://www2.agenciatributaria.gob.es/static_files/common/internet/dep/aplicaciones/es/aeat/tike/cont/ws/SuministroInformacion.xsd";
}

/// AEAT environment a record is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Production,
    /// Pre-production (`prewww`) hosts.
    #[default]
    Testing,
}

impl Environment {
    pub fn from_testing_flag(is_testing: bool) -> Self {
        if is_testing {
            Self::Testing
        } else {
            Self::Production
        }
    }

    /// Service description of `SistemaFacturacion`.
    pub fn wsdl_url(&self) -> &'static str {
        match self {
            Self::Production => {
                "https://www1.agenciatributaria.gob.es/static_files/common/internet/dep/aplicaciones/es/aeat/tikeV1.0/cont/ws/SistemaFacturacion.wsdl"
            }
            Self::Testing => {
                "https://prewww1.aeat.es/static_files/common/internet/dep/aplicaciones/es/aeat/tikeV1.0/cont/ws/SistemaFacturacion.wsdl"
            }
        }
    }

    /// SOAP endpoint the envelope is posted to.
    pub fn endpoint_url(&self) -> &'static str {
        match self {
            Self::Production => {
                "https://www1.agenciatributaria.gob.es/wlpl/TIKE-CONT/ws/SistemaFacturacion/VerifactuSOAP"
            }
            Self::Testing => {
                "https://prewww1.aeat.es/wlpl/TIKE-CONT/ws/SistemaFacturacion/VerifactuSOAP"
            }
        }
    }

    /// Base of the QR verification URL.
    pub fn qr_base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://www2.agenciatributaria.gob.es/wlpl/TIKE-CONT/ValidarQR",
            Self::Testing => "https://prewww2.aeat.es/wlpl/TIKE-CONT/ValidarQR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testing_is_default() {
        assert_eq!(Environment::default(), Environment::Testing);
        assert_eq!(Environment::from_testing_flag(false), Environment::Production);
    }

    #[test]
    fn hosts_per_environment() {
        assert!(Environment::Testing.endpoint_url().starts_with("https://prewww1.aeat.es/"));
        assert!(Environment::Testing.wsdl_url().ends_with("SistemaFacturacion.wsdl"));
        assert!(
            Environment::Production
                .endpoint_url()
                .starts_with("https://www1.agenciatributaria.gob.es/")
        );
        assert!(Environment::Production.qr_base_url().ends_with("/ValidarQR"));
    }
}
