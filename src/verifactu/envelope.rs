use super::ns;
use super::tree::Element;
use super::xml_utils::XmlWriter;
use crate::core::format::{self, max_len};
use crate::core::{Party, VerifactuError};

/// Optional leaves that must be absent, not merely empty, in the submission.
pub const PRUNED_LEAVES: &[&str] = &[
    "TipoRectificativa",
    "FacturasRectificadas",
    "FacturasSustituidas",
    "ImporteRectificacion",
    "FechaOperacion",
    "OperacionExenta",
    "TipoRecargoEquivalencia",
    "CuotaRecargoEquivalencia",
    "EmitidaPorTerceroODestinatario",
    "Subsanacion",
    "RechazoPrevio",
    "TipoImpositivo",
    "CuotaRepercutida",
    "GeneradoPor",
];

/// Serialize a finalized record into the `RegFactuSistemaFacturacion` SOAP
/// envelope, with `issuer` as `ObligadoEmision`.
///
/// Envelope elements use the `soapenv:` and `sum:` prefixes; every record
/// element is written under `sum1:`.
pub fn wrap_envelope(tree: &Element, issuer: &Party) -> Result<String, VerifactuError> {
    let mut record = tree.clone();
    record.prune_empty(PRUNED_LEAVES);
    if let Some(path) = record.find_pending() {
        return Err(VerifactuError::Xml(format!("leaf {path} was never populated")));
    }

    let name = format::bounded(Some(&issuer.name), max_len::NAME)
        .map_err(|e| VerifactuError::format("ObligadoEmision/NombreRazon", e))?;
    let nif = format::tax_id(Some(&issuer.tax_id))
        .map_err(|e| VerifactuError::format("ObligadoEmision/NIF", e))?;

    let mut w = XmlWriter::new()?;
    w.start_element_with_attrs(
        "soapenv:Envelope",
        &[
            ("xmlns:soapenv", ns::SOAP_ENVELOPE),
            ("xmlns:sum", ns::SUMINISTRO_LR),
            ("xmlns:sum1", ns::SUMINISTRO_INFORMACION),
        ],
    )?;
    w.empty_element("soapenv:Header")?;
    w.start_element("soapenv:Body")?;
    w.start_element("sum:RegFactuSistemaFacturacion")?;

    w.start_element("sum:Cabecera")?;
    w.start_element("sum1:ObligadoEmision")?;
    w.text_element("sum1:NombreRazon", &name)?;
    w.text_element("sum1:NIF", &nif)?;
    w.end_element("sum1:ObligadoEmision")?;
    w.end_element("sum:Cabecera")?;

    let root = format!("sum:{}", record.name);
    w.start_element(&root)?;
    for child in &record.children {
        child.write_prefixed(&mut w, "sum1")?;
    }
    w.end_element(&root)?;

    w.end_element("sum:RegFactuSistemaFacturacion")?;
    w.end_element("soapenv:Body")?;
    w.end_element("soapenv:Envelope")?;
    w.into_string()
}
