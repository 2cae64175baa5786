//! Look up ADSL/ADSL2+ exchange information for an Australian address by
//! querying adsl2exchanges.com.au and scraping its result page.

pub mod exchange;
pub mod record;

pub use exchange::error::{Field, LookupError};
pub use exchange::model::{EquipmentProvider, ExchangeInfo};
pub use exchange::{lookup, ExchangeClient, LookupConfig, PageLayout};
