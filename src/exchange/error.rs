use std::fmt;

use thiserror::Error;

/// Errors returned by an exchange lookup.
///
/// Every variant is terminal for the lookup that produced it; nothing is retried.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request could not be built or sent, or the body could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The lookup site redirected to its error page.
    #[error("could not locate address")]
    AddressNotFound,

    /// The result page did not have the expected shape.
    #[error("could not parse {0}")]
    Extraction(Field),

    /// A page layout identifier does not form a valid CSS selector.
    #[error("invalid page layout selector `{selector}`: {reason}")]
    InvalidLayout { selector: String, reason: String },
}

/// The stage or field of the result page that failed to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PrimaryFields,
    Exchange,
    Zone,
    Distance,
    CableLength,
    Speed,
    NbnAvailability,
    EquipmentProviders,
    ProviderName,
    ProviderStatus,
    ProviderEstimate,
    ProviderAvailability,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::PrimaryFields => "primary fields",
            Field::Exchange => "exchange",
            Field::Zone => "zone",
            Field::Distance => "distance",
            Field::CableLength => "cable length",
            Field::Speed => "speed",
            Field::NbnAvailability => "nbn availability",
            Field::EquipmentProviders => "equipment providers",
            Field::ProviderName => "equipment provider name",
            Field::ProviderStatus => "equipment provider status",
            Field::ProviderEstimate => "equipment provider estimate",
            Field::ProviderAvailability => "equipment provider availability",
        };
        f.write_str(name)
    }
}
