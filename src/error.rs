//! Error taxonomy shared by the recalculation stages.
//!
//! Missing measurements are never errors: they propagate as `None` through the
//! pipeline. Everything here is fatal for the call that returned it.

/// Errors that can occur while recalculating analyses
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    /// An oxide referenced by a dataset or method is absent from the reference
    /// table, or a method was configured with invalid parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A column required by the requested method is missing (or forbidden)
    #[error("Input error: {0}")]
    Input(String),

    /// Droop's two independently derived ratios disagree beyond tolerance
    #[error(
        "Consistency error in analysis {row} ('{id}'): S/T = {s_over_t} but X/N = {x_over_n}"
    )]
    Consistency {
        /// Row index of the offending analysis
        row: usize,
        /// Identifier of the offending analysis
        id: String,
        /// Cation ratio of the oxygen basis to the cation basis
        s_over_t: f64,
        /// Oxygen ratio of the oxygen basis to the cation basis
        x_over_n: f64,
    },

    /// The requested method exists in name only
    #[error("Not yet implemented: {0}")]
    NotYetImplemented(String),
}

impl CalcError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub(crate) fn not_yet_implemented(what: impl Into<String>) -> Self {
        Self::NotYetImplemented(what.into())
    }
}

/// Convenience alias for results of the recalculation stages
pub type CalcResult<T> = Result<T, CalcError>;
