use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::template;
use super::tree::Element;
use crate::core::format::{self, max_len};
use crate::core::*;

type Encoded = Result<String, FormatError>;

/// Populate an invoice skeleton from `record`.
///
/// The returned tree is complete except for the record fingerprint
/// (outer `Huella`), which [`super::chain::seal`] writes.
pub fn assemble_invoice(
    record: &InvoiceRecord,
    software: &SoftwareDescriptor,
    prior: Option<&ChainLink>,
    generated_at: DateTime<Utc>,
) -> Result<Element, VerifactuError> {
    let mut tree = template::invoice_skeleton()?;
    let t = &mut tree;

    set(t, "IDFactura/IDEmisorFactura", format::tax_id(Some(&record.issuer.tax_id)))?;
    set(
        t,
        "IDFactura/NumSerieFactura",
        format::bounded(Some(&record.id.number), max_len::SERIAL),
    )?;
    set(
        t,
        "IDFactura/FechaExpedicionFactura",
        Ok(format::date(Some(record.id.issue_date))),
    )?;
    set(
        t,
        "NombreRazonEmisor",
        format::bounded(Some(&record.issuer.name), max_len::NAME),
    )?;
    set(t, "Subsanacion", Ok(format::flag(record.id.replacement.then_some(true))))?;
    set(
        t,
        "RechazoPrevio",
        Ok(format::flag(record.previous_rejection.then_some(true))),
    )?;
    set(t, "TipoFactura", Ok(record.kind.code().to_string()))?;
    write_corrections(t, record)?;

    let description = record.description.as_ref();
    set(
        t,
        "FechaOperacion",
        Ok(format::date(description.and_then(|d| d.operation_date))),
    )?;
    set(
        t,
        "DescripcionOperacion",
        format::bounded(description.map(|d| d.text.as_str()), max_len::DESCRIPTION),
    )?;
    set(
        t,
        "EmitidaPorTerceroODestinatario",
        Ok(record
            .issued_by
            .and_then(|by| by.creation_code())
            .unwrap_or_default()
            .to_string()),
    )?;

    match (record.issued_by, &record.third_party) {
        (Some(IssuedBy::ThirdParty), Some(party)) => write_party(t, "Tercero", party)?,
        _ => {
            t.remove("Tercero");
        }
    }

    write_recipient(t, record.recipient.as_ref())?;
    write_breakdown(t, &record.vat_lines)?;
    set(t, "CuotaTotal", Ok(format::amount(Some(record.tax_amount))))?;
    set(t, "ImporteTotal", Ok(format::amount(Some(record.total))))?;

    match record.withheld_amount.filter(|amount| !amount.is_zero()) {
        Some(amount) => set(t, "RetencionSoportada", Ok(format::amount(Some(amount))))?,
        None => t.remove_all("RetencionSoportada"),
    }

    write_prior(t, prior)?;
    write_software(t, software)?;
    set(t, "FechaHoraHusoGenRegistro", format::timestamp(Some(generated_at)))?;

    debug!(
        number = %record.id.number,
        kind = record.kind.code(),
        lines = record.vat_lines.len(),
        chained = prior.is_some(),
        "assembled invoice record"
    );
    Ok(tree)
}

/// Populate a cancellation skeleton from `record`.
pub fn assemble_cancellation(
    record: &CancellationRecord,
    software: &SoftwareDescriptor,
    prior: Option<&ChainLink>,
    generated_at: DateTime<Utc>,
) -> Result<Element, VerifactuError> {
    let mut tree = template::cancellation_skeleton()?;
    let t = &mut tree;

    set(
        t,
        "IDFactura/IDEmisorFacturaAnulada",
        format::tax_id(Some(&record.issuer.tax_id)),
    )?;
    set(
        t,
        "IDFactura/NumSerieFacturaAnulada",
        format::bounded(Some(&record.id.number), max_len::SERIAL),
    )?;
    set(
        t,
        "IDFactura/FechaExpedicionFacturaAnulada",
        Ok(format::date(Some(record.id.issue_date))),
    )?;
    set(
        t,
        "GeneradoPor",
        Ok(record
            .issued_by
            .map(|by| by.cancellation_code())
            .unwrap_or_default()
            .to_string()),
    )?;

    match (record.issued_by, &record.third_party) {
        (Some(IssuedBy::ThirdParty | IssuedBy::Recipient), Some(party)) => {
            write_party(t, "Generador", party)?
        }
        _ => {
            t.remove("Generador");
        }
    }

    write_prior(t, prior)?;
    write_software(t, software)?;
    set(t, "FechaHoraHusoGenRegistro", format::timestamp(Some(generated_at)))?;

    debug!(number = %record.id.number, chained = prior.is_some(), "assembled cancellation record");
    Ok(tree)
}

fn set(tree: &mut Element, path: &str, value: Encoded) -> Result<(), VerifactuError> {
    let text = value.map_err(|e| VerifactuError::format(path, e))?;
    container(tree, path)?.fill(text);
    Ok(())
}

fn container<'a>(tree: &'a mut Element, path: &str) -> Result<&'a mut Element, VerifactuError> {
    tree.find_mut(path)
        .ok_or_else(|| VerifactuError::Xml(format!("skeleton has no {path} element")))
}

/// Leaf of a freshly built block; `context` only labels errors.
fn leaf(context: &str, name: &str, value: Encoded) -> Result<Element, VerifactuError> {
    let text = value.map_err(|e| VerifactuError::format(format!("{context}/{name}"), e))?;
    Ok(Element::leaf(name, text))
}

fn write_party(tree: &mut Element, block: &str, party: &Party) -> Result<(), VerifactuError> {
    set(
        tree,
        &format!("{block}/NombreRazon"),
        format::bounded(Some(&party.name), max_len::NAME),
    )?;
    set(tree, &format!("{block}/NIF"), format::tax_id(Some(&party.tax_id)))
}

fn write_corrections(tree: &mut Element, record: &InvoiceRecord) -> Result<(), VerifactuError> {
    let style = match &record.credit_note {
        Some(note) => Some(note.style),
        None if record.kind.is_rectifying() => Some(CorrectionStyle::Differences),
        None => None,
    };
    set(
        tree,
        "TipoRectificativa",
        Ok(style.map(|s| s.code()).unwrap_or_default().to_string()),
    )?;

    let issuer = record.issuer.tax_id.as_str();
    if let Some(note) = &record.credit_note {
        let mut rectified = Vec::with_capacity(note.ids.len());
        for id in &note.ids {
            rectified.push(invoice_reference("IDFacturaRectificada", issuer, id)?);
        }
        container(tree, "FacturasRectificadas")?
            .children
            .extend(rectified);

        if note.style == CorrectionStyle::Substitution {
            let amounts = container(tree, "ImporteRectificacion")?;
            amounts.push(Element::leaf(
                "BaseRectificada",
                format::amount(Some(note.base.unwrap_or(Decimal::ZERO))),
            ));
            amounts.push(Element::leaf(
                "CuotaRectificada",
                format::amount(Some(note.tax.unwrap_or(Decimal::ZERO))),
            ));
        }
    }

    let mut replaced = Vec::with_capacity(record.replaced_ids.len());
    for id in &record.replaced_ids {
        replaced.push(invoice_reference("IDFacturaSustituida", issuer, id)?);
    }
    container(tree, "FacturasSustituidas")?
        .children
        .extend(replaced);
    Ok(())
}

fn invoice_reference(name: &str, issuer: &str, id: &InvoiceId) -> Result<Element, VerifactuError> {
    Ok(Element::new(name)
        .with_child(leaf(name, "IDEmisorFactura", format::tax_id(Some(issuer)))?)
        .with_child(leaf(
            name,
            "NumSerieFactura",
            format::bounded(Some(&id.number), max_len::SERIAL),
        )?)
        .with_child(Element::leaf(
            "FechaExpedicionFactura",
            format::date(Some(id.issue_date)),
        )))
}

/// One `IDDestinatario`, or no `Destinatarios` at all for simplified invoices.
fn write_recipient(tree: &mut Element, recipient: Option<&Partner>) -> Result<(), VerifactuError> {
    const BLOCK: &str = "IDDestinatario";
    let Some(partner) = recipient else {
        tree.remove("Destinatarios");
        return Ok(());
    };

    let mut block = Element::new(BLOCK).with_child(leaf(
        BLOCK,
        "NombreRazon",
        format::bounded(Some(partner.name()), max_len::NAME),
    )?);
    match partner {
        Partner::Domestic { tax_id, .. } => {
            block.push(leaf(BLOCK, "NIF", format::tax_id(Some(tax_id)))?);
        }
        Partner::Foreign {
            country,
            id_type,
            id,
            ..
        } => {
            block.push(
                Element::new("IDOtro")
                    .with_child(leaf("IDOtro", "CodigoPais", format::country(Some(country)))?)
                    .with_child(Element::leaf("IDType", id_type.code()))
                    .with_child(leaf(
                        "IDOtro",
                        "ID",
                        format::bounded(Some(id), max_len::FOREIGN_ID),
                    )?),
            );
        }
    }

    container(tree, "Destinatarios")?.push(block);
    Ok(())
}

fn write_breakdown(tree: &mut Element, lines: &[VatLine]) -> Result<(), VerifactuError> {
    let mut details = Vec::with_capacity(lines.len());
    for line in lines {
        details.push(breakdown_line(line)?);
    }
    container(tree, "Desglose")?.children.extend(details);
    Ok(())
}

/// `DetalleDesglose`. Rate, tax and surcharge leaves are only filled for
/// subject lines; the empty ones are pruned from the envelope.
fn breakdown_line(line: &VatLine) -> Result<Element, VerifactuError> {
    const BLOCK: &str = "DetalleDesglose";
    let subject = line.operation.is_subject();
    let taxed = |value: Option<Decimal>| if subject { value } else { None };
    let operation = if line.operation.is_exempt() {
        "OperacionExenta"
    } else {
        "CalificacionOperacion"
    };

    Ok(Element::new(BLOCK)
        .with_child(Element::leaf("Impuesto", line.tax.unwrap_or_default().code()))
        .with_child(leaf(
            BLOCK,
            "ClaveRegimen",
            format::regime_key(Some(&line.regime_key)),
        )?)
        .with_child(Element::leaf(operation, line.operation.code()))
        .with_child(Element::leaf("TipoImpositivo", format::amount(taxed(line.rate))))
        .with_child(Element::leaf(
            "BaseImponibleOimporteNoSujeto",
            format::amount(Some(line.base)),
        ))
        .with_child(Element::leaf("CuotaRepercutida", format::amount(taxed(line.amount))))
        .with_child(Element::leaf(
            "TipoRecargoEquivalencia",
            format::amount(taxed(line.surcharge_rate)),
        ))
        .with_child(Element::leaf(
            "CuotaRecargoEquivalencia",
            format::amount(taxed(line.surcharge_amount)),
        )))
}

/// Chain head keeps `PrimerRegistro`; otherwise `RegistroAnterior` carries the prior link.
fn write_prior(tree: &mut Element, prior: Option<&ChainLink>) -> Result<(), VerifactuError> {
    let Some(link) = prior else {
        tree.remove_all("RegistroAnterior");
        return Ok(());
    };

    tree.remove_all("PrimerRegistro");
    set(
        tree,
        "RegistroAnterior/IDEmisorFactura",
        format::tax_id(Some(&link.issuer_tax_id)),
    )?;
    set(
        tree,
        "RegistroAnterior/NumSerieFactura",
        format::bounded(Some(&link.number), max_len::SERIAL),
    )?;
    set(
        tree,
        "RegistroAnterior/FechaExpedicionFactura",
        Ok(format::date(Some(link.issue_date))),
    )?;
    set(
        tree,
        "RegistroAnterior/Huella",
        format::bounded(Some(&link.fingerprint), max_len::FINGERPRINT),
    )
}

fn write_software(tree: &mut Element, software: &SoftwareDescriptor) -> Result<(), VerifactuError> {
    let fields: [(&str, Encoded); 9] = [
        (
            "NombreRazon",
            format::bounded(Some(&software.developer_name), max_len::NAME),
        ),
        ("NIF", format::tax_id(Some(&software.developer_tax_id))),
        (
            "NombreSistemaInformatico",
            format::bounded(Some(&software.name), max_len::SOFTWARE_NAME),
        ),
        (
            "IdSistemaInformatico",
            format::bounded(Some(&software.id), max_len::SOFTWARE_ID),
        ),
        ("Version", format::bounded(Some(&software.version), max_len::VERSION)),
        (
            "NumeroInstalacion",
            format::bounded(Some(&software.installation_number), max_len::INSTALLATION),
        ),
        (
            "TipoUsoPosibleSoloVerifactu",
            Ok(format::flag(Some(software.verifactu_only))),
        ),
        (
            "TipoUsoPosibleMultiOT",
            Ok(format::flag(Some(software.multi_taxpayer))),
        ),
        (
            "IndicadorMultiplesOT",
            Ok(format::flag(Some(software.current_multi_taxpayer))),
        ),
    ];

    for (name, value) in fields {
        set(tree, &format!("SistemaInformatico/{name}"), value)?;
    }
    Ok(())
}
