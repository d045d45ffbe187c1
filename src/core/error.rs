use thiserror::Error;

/// Errors produced while parsing, staging or exporting invoices.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FakturaceError {
    /// The source document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// A date value matched none of the normalization strategies.
    #[error("invalid date in <{tag}>: {value:?}")]
    InvalidDate {
        /// Source tag the value was read from.
        tag: String,
        /// Raw text of the element.
        value: String,
    },

    /// An invoice carries neither an `ext:` nor a `key:` identifier.
    #[error("invoice has no ext:/key: identifier (kod {kod:?})")]
    MissingInvoiceKey {
        /// Document code, when the invoice has one.
        kod: Option<String>,
    },

    /// A failure scoped to one invoice, identified by its natural key.
    #[error("invoice {key}: {source}")]
    Invoice {
        /// Rendered `(ext_id, id)` natural key.
        key: String,
        #[source]
        source: Box<FakturaceError>,
    },

    /// Storage collaborator failure.
    #[cfg(feature = "store")]
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for FakturaceError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<config::ConfigError> for FakturaceError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl FakturaceError {
    /// Attach an invoice natural key to an error raised while handling it.
    pub fn for_invoice(self, key: impl Into<String>) -> Self {
        Self::Invoice {
            key: key.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any invoice context.
    pub fn root(&self) -> &FakturaceError {
        match self {
            Self::Invoice { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, FakturaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_context_names_key_and_tag() {
        let err = FakturaceError::InvalidDate {
            tag: "datSplat".into(),
            value: "soon".into(),
        }
        .for_invoice("(ext:FV-1, key:12)");
        let msg = err.to_string();
        assert!(msg.contains("(ext:FV-1, key:12)"));
        assert!(msg.contains("<datSplat>"));
        assert!(matches!(err.root(), FakturaceError::InvalidDate { .. }));
    }
}
