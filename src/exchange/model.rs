/// A provider of ADSL equipment at the exchange, one per row of the providers table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentProvider {
    pub name: String,
    pub status: String,
    /// free text as shown on the page, e.g. "Available now" or a date
    pub estimate: String,
    pub available: bool,
}

/// ADSL exchange information for an address
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeInfo {
    pub exchange: String,
    pub zone: u32,
    /// metres, as the crow flies
    pub distance: f64,
    /// metres
    pub cable_length: f64,
    pub estimated_speed: u32,
    pub nbn_available: bool,
    /// in the order the page lists them
    pub providers: Vec<EquipmentProvider>,
}

impl ExchangeInfo {
    pub fn available_providers(&self) -> impl Iterator<Item = &EquipmentProvider> {
        self.providers.iter().filter(|provider| provider.available)
    }
}
