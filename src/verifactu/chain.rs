//! Record fingerprint (`Huella`) and chain links.
//!
//! The fingerprint is the uppercase hex SHA-256 of a canonical
//! `Key=Value&...` string read from the populated record tree, so it always
//! agrees with the leaves that are actually transmitted.

use sha2::{Digest, Sha256};

use super::tree::Element;
use crate::core::format;
use crate::core::{ChainLink, VerifactuError};

/// Container of the previous record's link; its `Huella` is never the record's own.
const PRIOR_BLOCK: &str = "RegistroAnterior";

/// Canonical string hashed into the fingerprint.
///
/// Creation: `IDEmisorFactura=…&NumSerieFactura=…&FechaExpedicionFactura=…&TipoFactura=…&CuotaTotal=…&ImporteTotal=…&Huella=…&FechaHoraHusoGenRegistro=…`
///
/// Cancellation: `IDEmisorFacturaAnulada=…&NumSerieFacturaAnulada=…&FechaExpedicionFacturaAnulada=…&Huella=…&FechaHoraHusoGenRegistro=…`
///
/// `Huella` is the previous fingerprint, empty at the chain head.
pub fn canonical_string(tree: &Element) -> Result<String, VerifactuError> {
    let previous = tree.text_of("RegistroAnterior/Huella");
    let generated = tree.text_of("FechaHoraHusoGenRegistro");

    let pairs: Vec<(&str, &str)> = if is_cancellation(tree) {
        vec![
            (
                "IDEmisorFacturaAnulada",
                tree.text_of("IDFactura/IDEmisorFacturaAnulada"),
            ),
            (
                "NumSerieFacturaAnulada",
                tree.text_of("IDFactura/NumSerieFacturaAnulada"),
            ),
            (
                "FechaExpedicionFacturaAnulada",
                tree.text_of("IDFactura/FechaExpedicionFacturaAnulada"),
            ),
            ("Huella", previous),
            ("FechaHoraHusoGenRegistro", generated),
        ]
    } else if tree.find("RegistroAlta").is_some() {
        vec![
            ("IDEmisorFactura", tree.text_of("IDFactura/IDEmisorFactura")),
            ("NumSerieFactura", tree.text_of("IDFactura/NumSerieFactura")),
            (
                "FechaExpedicionFactura",
                tree.text_of("IDFactura/FechaExpedicionFactura"),
            ),
            ("TipoFactura", tree.text_of("TipoFactura")),
            ("CuotaTotal", tree.text_of("CuotaTotal")),
            ("ImporteTotal", tree.text_of("ImporteTotal")),
            ("Huella", previous),
            ("FechaHoraHusoGenRegistro", generated),
        ]
    } else {
        return Err(VerifactuError::Xml(format!(
            "{} holds neither RegistroAlta nor RegistroAnulacion",
            tree.name
        )));
    };

    Ok(pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&"))
}

/// Uppercase hex SHA-256 of `canonical`.
pub fn fingerprint(canonical: &str) -> String {
    hex::encode_upper(Sha256::digest(canonical.as_bytes()))
}

/// Compute the fingerprint and write it to the record's own `Huella`.
pub fn seal(tree: &mut Element) -> Result<String, VerifactuError> {
    let digest = fingerprint(&canonical_string(tree)?);
    let indices = record_fingerprint_path(tree)
        .ok_or_else(|| VerifactuError::Xml("record has no Huella element".into()))?;
    if let Some(leaf) = tree.at_mut(&indices) {
        leaf.fill(digest.as_str());
    }
    Ok(digest)
}

/// The record's own fingerprint, or `""` before [`seal`].
pub fn record_fingerprint(tree: &Element) -> &str {
    record_fingerprint_path(tree)
        .and_then(|indices| tree.at(&indices))
        .map(|leaf| leaf.text.as_str())
        .unwrap_or_default()
}

/// Link to pass as `prior` when building the next record of the chain.
pub fn chain_link(tree: &Element) -> Result<ChainLink, VerifactuError> {
    let suffix = if is_cancellation(tree) { "Anulada" } else { "" };
    let leaf = |name: &str| format!("IDFactura/{name}{suffix}");

    let date_leaf = leaf("FechaExpedicionFactura");
    let issue_date = format::parse_date(tree.text_of(&date_leaf))
        .map_err(|e| VerifactuError::format(date_leaf.as_str(), e))?;

    Ok(ChainLink {
        issuer_tax_id: tree.text_of(&leaf("IDEmisorFactura")).to_string(),
        number: tree.text_of(&leaf("NumSerieFactura")).to_string(),
        issue_date,
        fingerprint: record_fingerprint(tree).to_string(),
    })
}

fn record_fingerprint_path(tree: &Element) -> Option<Vec<usize>> {
    tree.locate_all("Huella")
        .into_iter()
        .find(|indices| !tree.ancestry(indices).contains(&PRIOR_BLOCK))
}

fn is_cancellation(tree: &Element) -> bool {
    tree.find("RegistroAnulacion").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifactu::template;

    const CREATION: &str = "IDEmisorFactura=99999990S&NumSerieFactura=TEST/100&FechaExpedicionFactura=18-03-2024&TipoFactura=F1&CuotaTotal=21.00&ImporteTotal=121.00&Huella=&FechaHoraHusoGenRegistro=2024-03-18T12:00:00.000Z";

    fn populated() -> Element {
        let mut tree = template::invoice_skeleton().unwrap();
        for (path, value) in [
            ("IDFactura/IDEmisorFactura", "99999990S"),
            ("IDFactura/NumSerieFactura", "TEST/100"),
            ("IDFactura/FechaExpedicionFactura", "18-03-2024"),
            ("TipoFactura", "F1"),
            ("CuotaTotal", "21.00"),
            ("ImporteTotal", "121.00"),
            ("FechaHoraHusoGenRegistro", "2024-03-18T12:00:00.000Z"),
        ] {
            tree.find_mut(path).unwrap().fill(value);
        }
        tree
    }

    #[test]
    fn golden_fingerprint() {
        assert_eq!(
            fingerprint(CREATION),
            "143C231C0DA1B08E53C44BEBB70CD2CF0983E78F88492E897ACA6B7FB49B2027"
        );
    }

    #[test]
    fn canonical_string_from_head_record() {
        let mut tree = populated();
        tree.remove_all("RegistroAnterior");
        assert_eq!(canonical_string(&tree).unwrap(), CREATION);
    }

    #[test]
    fn seal_writes_outer_huella_only() {
        let mut tree = populated();
        tree.find_mut("RegistroAnterior/Huella").unwrap().fill("ABCDEF");
        let digest = seal(&mut tree).unwrap();

        assert_eq!(digest.len(), 64);
        assert_eq!(tree.text_of("RegistroAnterior/Huella"), "ABCDEF");
        assert_eq!(record_fingerprint(&tree), digest);
        assert!(canonical_string(&tree).unwrap().contains("&Huella=ABCDEF&"));
    }

    #[test]
    fn chain_link_reads_finalized_tree() {
        let mut tree = populated();
        tree.remove_all("RegistroAnterior");
        let digest = seal(&mut tree).unwrap();
        let link = chain_link(&tree).unwrap();
        assert_eq!(link.issuer_tax_id, "99999990S");
        assert_eq!(link.number, "TEST/100");
        assert_eq!(link.issue_date.to_string(), "2024-03-18");
        assert_eq!(link.fingerprint, digest);
    }

    #[test]
    fn unknown_root_is_rejected() {
        let tree = Element::new("Other").with_child(Element::leaf("Huella", ""));
        assert!(canonical_string(&tree).is_err());
    }
}
