//! Error types for form fields.

use std::fmt;

use genki_dom::DomError;

/// Result type alias for form field operations.
pub type FormResult<T> = std::result::Result<T, FormError>;

/// One of the three rendered regions of a select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// The always-visible surface showing the current choice.
    DisplaySurface,
    /// The collapsible list of entries.
    OptionList,
    /// The arrow indicator.
    Icon,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisplaySurface => write!(f, "display surface"),
            Self::OptionList => write!(f, "option list"),
            Self::Icon => write!(f, "icon"),
        }
    }
}

/// Errors that can occur while rendering or wiring a form field.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A select was rendered without any items.
    #[error("Select field '{name}' has no items, please check select element items")]
    EmptyOptions {
        /// The field's `name`.
        name: String,
    },

    /// A rendered region was not found in the document.
    #[error("Rendered {region} '{id}' not found in the document; insert the markup before activating")]
    RegionMissing {
        /// Which region is missing.
        region: Region,
        /// The element id that was looked up.
        id: String,
    },

    /// Document operation failed.
    #[error("Document error: {0}")]
    Dom(#[from] DomError),

    /// Field configuration could not be read.
    #[error("Invalid field configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl FormError {
    /// Create a missing-region error.
    pub fn region_missing(region: Region, id: impl Into<String>) -> Self {
        Self::RegionMissing {
            region,
            id: id.into(),
        }
    }
}
