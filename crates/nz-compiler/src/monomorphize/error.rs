use thiserror::Error;

/// Internal inconsistencies found while monomorphizing.
///
/// The driver only monomorphizes programs that checked without
/// diagnostics, so these indicate a checker bug rather than a user error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonomorphizeError {
    #[error("type parameter left unsubstituted in an instantiation of '{fun}'")]
    UnresolvedTypeParameter { fun: String },

    #[error("instantiation of '{fun}' has no implementation for spec use {spec_use}, signature {signature}")]
    MissingSpecImpl {
        fun: String,
        spec_use: usize,
        signature: usize,
    },

    #[error("bogus type reached an instantiation of '{fun}'")]
    BogusType { fun: String },
}
