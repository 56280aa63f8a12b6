//! Record skeletons. Every leaf the assembler must fill is written as
//! [`PLACEHOLDER`] in the source text and comes out of parsing as an empty
//! pending leaf; empty containers are filled or pruned later.

use super::tree::Element;
use crate::core::VerifactuError;

/// Marks, in the skeleton source, a leaf that has not been written yet.
pub const PLACEHOLDER: &str = "????";

const INVOICE_SKELETON: &str = r#"<RegistroFactura>
    <RegistroAlta>
        <IDVersion>1.0</IDVersion>
        <IDFactura>
            <IDEmisorFactura>????</IDEmisorFactura>
            <NumSerieFactura>????</NumSerieFactura>
            <FechaExpedicionFactura>????</FechaExpedicionFactura>
        </IDFactura>
        <NombreRazonEmisor>????</NombreRazonEmisor>
        <Subsanacion>????</Subsanacion>
        <RechazoPrevio>????</RechazoPrevio>
        <TipoFactura>????</TipoFactura>
        <TipoRectificativa>????</TipoRectificativa>
        <FacturasRectificadas/>
        <FacturasSustituidas/>
        <ImporteRectificacion/>
        <FechaOperacion>????</FechaOperacion>
        <DescripcionOperacion>????</DescripcionOperacion>
        <EmitidaPorTerceroODestinatario>????</EmitidaPorTerceroODestinatario>
        <Tercero>
            <NombreRazon>????</NombreRazon>
            <NIF>????</NIF>
        </Tercero>
        <Destinatarios/>
        <Desglose/>
        <CuotaTotal>????</CuotaTotal>
        <ImporteTotal>????</ImporteTotal>
        <RetencionSoportada>????</RetencionSoportada>
        <Encadenamiento>
            <PrimerRegistro>S</PrimerRegistro>
            <RegistroAnterior>
                <IDEmisorFactura>????</IDEmisorFactura>
                <NumSerieFactura>????</NumSerieFactura>
                <FechaExpedicionFactura>????</FechaExpedicionFactura>
                <Huella>????</Huella>
            </RegistroAnterior>
        </Encadenamiento>
        <SistemaInformatico>
            <NombreRazon>????</NombreRazon>
            <NIF>????</NIF>
            <NombreSistemaInformatico>????</NombreSistemaInformatico>
            <IdSistemaInformatico>????</IdSistemaInformatico>
            <Version>????</Version>
            <NumeroInstalacion>????</NumeroInstalacion>
            <TipoUsoPosibleSoloVerifactu>????</TipoUsoPosibleSoloVerifactu>
            <TipoUsoPosibleMultiOT>????</TipoUsoPosibleMultiOT>
            <IndicadorMultiplesOT>????</IndicadorMultiplesOT>
        </SistemaInformatico>
        <FechaHoraHusoGenRegistro>????</FechaHoraHusoGenRegistro>
        <TipoHuella>01</TipoHuella>
        <Huella>????</Huella>
    </RegistroAlta>
</RegistroFactura>"#;

const CANCELLATION_SKELETON: &str = r#"<RegistroFactura>
    <RegistroAnulacion>
        <IDVersion>1.0</IDVersion>
        <IDFactura>
            <IDEmisorFacturaAnulada>????</IDEmisorFacturaAnulada>
            <NumSerieFacturaAnulada>????</NumSerieFacturaAnulada>
            <FechaExpedicionFacturaAnulada>????</FechaExpedicionFacturaAnulada>
        </IDFactura>
        <GeneradoPor>????</GeneradoPor>
        <Generador>
            <NombreRazon>????</NombreRazon>
            <NIF>????</NIF>
        </Generador>
        <Encadenamiento>
            <PrimerRegistro>S</PrimerRegistro>
            <RegistroAnterior>
                <IDEmisorFactura>????</IDEmisorFactura>
                <NumSerieFactura>????</NumSerieFactura>
                <FechaExpedicionFactura>????</FechaExpedicionFactura>
                <Huella>????</Huella>
            </RegistroAnterior>
        </Encadenamiento>
        <SistemaInformatico>
            <NombreRazon>????</NombreRazon>
            <NIF>????</NIF>
            <NombreSistemaInformatico>????</NombreSistemaInformatico>
            <IdSistemaInformatico>????</IdSistemaInformatico>
            <Version>????</Version>
            <NumeroInstalacion>????</NumeroInstalacion>
            <TipoUsoPosibleSoloVerifactu>????</TipoUsoPosibleSoloVerifactu>
            <TipoUsoPosibleMultiOT>????</TipoUsoPosibleMultiOT>
            <IndicadorMultiplesOT>????</IndicadorMultiplesOT>
        </SistemaInformatico>
        <FechaHoraHusoGenRegistro>????</FechaHoraHusoGenRegistro>
        <TipoHuella>01</TipoHuella>
        <Huella>????</Huella>
    </RegistroAnulacion>
</RegistroFactura>"#;

/// Fresh `RegistroFactura/RegistroAlta` tree.
pub fn invoice_skeleton() -> Result<Element, VerifactuError> {
    skeleton(INVOICE_SKELETON)
}

/// Fresh `RegistroFactura/RegistroAnulacion` tree.
pub fn cancellation_skeleton() -> Result<Element, VerifactuError> {
    skeleton(CANCELLATION_SKELETON)
}

fn skeleton(source: &str) -> Result<Element, VerifactuError> {
    let mut tree = Element::parse(source)?;
    tree.mark_pending(PLACEHOLDER);
    Ok(tree)
}
