use thiserror::Error;

/// Problems with the compiled-in catalog. These are programming errors
/// and surface when the catalog is loaded, before any file is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("mutator registered as '{factory}' declares no identifiers")]
    MissingIdentifier { factory: String },

    #[error("identifier '{id}' is claimed by both '{first}' and '{second}'")]
    DuplicateIdentifier {
        id: String,
        first: String,
        second: String,
    },

    #[error("composite '{composite}' lists unknown member '{member}'")]
    UnknownMember { composite: String, member: String },

    #[error("composite '{composite}' requires a {parameter}")]
    MissingParameter {
        composite: String,
        parameter: &'static str,
    },

    #[error("unknown composite '{0}'")]
    UnknownComposite(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("empty language version")]
    Empty,

    #[error("invalid component '{component}' in language version '{version}'")]
    InvalidComponent { version: String, component: String },
}

/// Configuration errors raised while resolving a rule selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown mutator or composite identifier '{0}'")]
    UnknownIdentifier(String),

    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A mutator failed while rewriting. The file being processed is left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutatorError {
    #[error("mutator '{mutator}' failed: {message}")]
    Internal { mutator: String, message: String },
}

impl MutatorError {
    pub fn internal(mutator: impl Into<String>, message: impl Into<String>) -> Self {
        MutatorError::Internal {
            mutator: mutator.into(),
            message: message.into(),
        }
    }
}
