use thiserror::Error;

/// Errors that can occur while building a VeriFactu record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifactuError {
    /// The input record or software descriptor is incomplete.
    /// Raised before any XML is built.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// A field value violates its encoding constraints.
    #[error("invalid value for {leaf}: {source}")]
    Format {
        /// Record leaf being written (e.g. "IDFactura/IDEmisorFactura").
        leaf: String,
        #[source]
        source: FormatError,
    },

    /// XML template, tree or writer error.
    #[error("XML error: {0}")]
    Xml(String),

    /// QR rendering failed.
    #[error("QR encoding error: {0}")]
    Qr(String),
}

impl VerifactuError {
    /// Attach a leaf name to an encoder failure.
    pub fn format(leaf: impl Into<String>, source: FormatError) -> Self {
        Self::Format {
            leaf: leaf.into(),
            source,
        }
    }

    /// Validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A field encoder rejected its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FormatError {
    /// String longer than the leaf allows. Values are never truncated.
    #[error("'{value}' exceeds maximum length of {max}")]
    TooLong { max: usize, value: String },

    /// Not a Spanish tax identifier (NIF).
    #[error("'{value}' is not a valid NIF")]
    TaxId { value: String },

    /// Value outside a closed code list or fixed shape.
    #[error("'{value}' is not a valid {kind}")]
    Code { kind: &'static str, value: String },
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "issuer.tax_id").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Record leaf the field feeds, if any (e.g. "IDEmisorFactura").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a leaf reference.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error tied to a record leaf.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_all_errors() {
        let err = VerifactuError::Validation(vec![
            ValidationError::with_rule("issuer.tax_id", "must not be empty", "IDEmisorFactura"),
            ValidationError::new("vat_lines", "at least one VAT line is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: [IDEmisorFactura] issuer.tax_id: must not be empty; \
             vat_lines: at least one VAT line is required"
        );
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn format_error_names_leaf() {
        let err = VerifactuError::format(
            "NombreRazonEmisor",
            FormatError::TooLong {
                max: 3,
                value: "ACME".into(),
            },
        );
        assert_eq!(
            err.to_string(),
            "invalid value for NombreRazonEmisor: 'ACME' exceeds maximum length of 3"
        );
        assert!(err.validation_errors().is_empty());
    }
}
