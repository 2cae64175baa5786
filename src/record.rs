use serde::Serialize;
use crate::exchange::model::{EquipmentProvider, ExchangeInfo};

/// One CSV row: the exchange details of an address plus one of its equipment providers
#[derive(Debug, Serialize)]
pub struct Record {
    address: String,
    exchange: String,
    zone: u32,
    distance: f64,
    cable_length: f64,
    estimated_speed: u32,
    #[serde(rename = "NBN")]
    pub nbn: YesOrNo,
    provider: Option<String>,
    status: Option<String>,
    estimate: Option<String>,
    pub available: Option<YesOrNo>,
}

impl Record {
    /// one record per provider, or a single record with empty provider columns if there are none
    pub fn from_lookup(address: &str, info: ExchangeInfo) -> Vec<Self> {
        let base = Self {
            address: address.to_string(),
            exchange: info.exchange,
            zone: info.zone,
            distance: info.distance,
            cable_length: info.cable_length,
            estimated_speed: info.estimated_speed,
            nbn: info.nbn_available.into(),
            provider: None,
            status: None,
            estimate: None,
            available: None,
        };

        if info.providers.is_empty() {
            return vec![base];
        }
        info.providers.into_iter()
            .map(|provider| base.with_provider(provider))
            .collect()
    }

    fn with_provider(&self, provider: EquipmentProvider) -> Self {
        Self {
            address: self.address.clone(),
            exchange: self.exchange.clone(),
            provider: Some(provider.name),
            status: Some(provider.status),
            estimate: Some(provider.estimate),
            available: Some(provider.available.into()),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[repr(u8)]
pub enum YesOrNo {
    N,
    Y,
}

impl From<bool> for YesOrNo {
    fn from(value: bool) -> Self {
        if value {
            YesOrNo::Y
        } else {
            YesOrNo::N
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(providers: Vec<EquipmentProvider>) -> ExchangeInfo {
        ExchangeInfo {
            exchange: "Homebush".to_string(),
            zone: 1,
            distance: 812.5,
            cable_length: 1015.6,
            estimated_speed: 17500,
            nbn_available: false,
            providers,
        }
    }

    fn to_csv(records: &[Record]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for record in records {
            wtr.serialize(record).unwrap();
        }
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn one_row_per_provider() {
        let records = Record::from_lookup("1 Test St", info(vec![
            EquipmentProvider {
                name: "Telstra".to_string(),
                status: "Active".to_string(),
                estimate: "Available now".to_string(),
                available: true,
            },
            EquipmentProvider {
                name: "iiNet".to_string(),
                status: "Planned".to_string(),
                estimate: "Q3 2015".to_string(),
                available: false,
            },
        ]));

        assert_eq!(
            to_csv(&records),
            "address,exchange,zone,distance,cable_length,estimated_speed,NBN,provider,status,estimate,available\n\
             1 Test St,Homebush,1,812.5,1015.6,17500,N,Telstra,Active,Available now,Y\n\
             1 Test St,Homebush,1,812.5,1015.6,17500,N,iiNet,Planned,Q3 2015,N\n"
        );
    }

    #[test]
    fn no_providers_still_yields_a_row() {
        let records = Record::from_lookup("1 Test St", info(Vec::new()));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].available, None);
        assert_eq!(records[0].nbn, YesOrNo::N);
    }
}
