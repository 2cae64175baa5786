use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::exchange::error::{Field, LookupError};
use crate::exchange::model::{EquipmentProvider, ExchangeInfo};

/// The summary sentence lives in a stylesheet `content:` property, not in the DOM,
/// so it is matched against the raw body.
static PRIMARY_FIELDS_REG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"content: "You are (?P<distance>[\d\.]+) m from (?P<exchange>.*?) as the crow flies\.<br>Estimated cable length of (?P<cablelength>[\d\.]+) m\.<br>Estimated speed of (?P<speed>[\d\.]+)<br>Zone (?P<zone>\d+)<br>""#).unwrap());

static PROVIDER_NAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td:nth-child(2)").unwrap());
static PROVIDER_STATUS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td:nth-child(3)").unwrap());
static PROVIDER_ESTIMATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td:nth-child(4)").unwrap());
static PROVIDER_AVAILABILITY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td:nth-child(5)").unwrap());

const NBN_AVAILABLE: &str = "YES";
const PROVIDER_AVAILABLE: &str = "Yes";

/// Element identifiers of the result page tables.
///
/// Both tables are addressed as `#<section> > #<table> > tbody`, which is how the
/// lookup site currently lays them out. Nothing here tolerates that layout changing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// section holding the single-cell NBN availability table
    pub nbn_section: String,
    /// section holding the equipment providers table
    pub providers_section: String,
    /// id shared by the table element inside each section
    pub table: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            nbn_section: "nbnenabled".to_string(),
            providers_section: "eproviders".to_string(),
            table: "sample".to_string(),
        }
    }
}

/// Compiled selectors for a [`PageLayout`]
#[derive(Debug, Clone)]
pub(crate) struct PageSelectors {
    nbn_cell: Selector,
    provider_rows: Selector,
}

impl PageSelectors {
    pub fn compile(layout: &PageLayout) -> Result<Self, LookupError> {
        Ok(
            Self {
                nbn_cell: Self::selector(format!("#{} > #{} > tbody > tr > td", layout.nbn_section, layout.table))?,
                provider_rows: Self::selector(format!("#{} > #{} > tbody > tr", layout.providers_section, layout.table))?,
            }
        )
    }

    fn selector(selector: String) -> Result<Selector, LookupError> {
        Selector::parse(&selector).map_err(|e| LookupError::InvalidLayout {
            reason: e.to_string(),
            selector: selector.clone(),
        })
    }
}

/// Fields pulled out of the summary sentence
#[derive(Debug)]
struct PrimaryFields {
    exchange: String,
    zone: u32,
    distance: f64,
    cable_length: f64,
    estimated_speed: u32,
}

impl PrimaryFields {
    fn parse_html(html: &str) -> Result<Self, LookupError> {
        let groups = capture_map(&PRIMARY_FIELDS_REG, html)
            .ok_or(LookupError::Extraction(Field::PrimaryFields))?;

        let exchange = groups.get("exchange")
            .filter(|exchange| !exchange.is_empty())
            .ok_or(LookupError::Extraction(Field::Exchange))?
            .to_string();

        Ok(
            Self {
                exchange,
                zone: parse_group(&groups, "zone", Field::Zone)?,
                distance: parse_group(&groups, "distance", Field::Distance)?,
                cable_length: parse_group(&groups, "cablelength", Field::CableLength)?,
                estimated_speed: parse_group(&groups, "speed", Field::Speed)?,
            }
        )
    }
}

/// Match `regex` once against `haystack`, keyed by capture group name.
///
/// Groups that did not participate in the match are left out.
fn capture_map<'r, 'h>(regex: &'r Regex, haystack: &'h str) -> Option<HashMap<&'r str, &'h str>> {
    let caps = regex.captures(haystack)?;
    Some(
        regex.capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name, m.as_str())))
            .collect()
    )
}

fn parse_group<T: FromStr>(groups: &HashMap<&str, &str>, name: &str, field: Field) -> Result<T, LookupError> {
    groups.get(name)
        .and_then(|value| value.parse().ok())
        .ok_or(LookupError::Extraction(field))
}

/// Text of the only element in `nodes`; zero or several elements is an error.
fn single_text<'a>(mut nodes: impl Iterator<Item = ElementRef<'a>>, field: Field) -> Result<String, LookupError> {
    match (nodes.next(), nodes.next()) {
        (Some(node), None) => Ok(node.text().collect::<String>()),
        _ => Err(LookupError::Extraction(field)),
    }
}

/// Lookup site result page, i.e. what `addresslookupstart.php` resolves to for a known address
#[derive(Debug)]
pub(crate) struct ResultPage {
    primary: PrimaryFields,
    nbn_available: bool,
    providers: Vec<EquipmentProvider>,
}

impl ResultPage {
    pub fn parse_html(html: &str, selectors: &PageSelectors) -> Result<Self, LookupError> {
        let primary = PrimaryFields::parse_html(html)?;

        let document = Html::parse_document(html);
        let nbn_available = Self::parse_nbn(&document, selectors)?;
        let providers = Self::parse_providers(&document, selectors)?;
        debug!("parsed result page for [{}] with [{}] providers", primary.exchange, providers.len());

        Ok(
            Self {
                primary,
                nbn_available,
                providers,
            }
        )
    }

    fn parse_nbn(document: &Html, selectors: &PageSelectors) -> Result<bool, LookupError> {
        let text = single_text(document.select(&selectors.nbn_cell), Field::NbnAvailability)?;
        Ok(text == NBN_AVAILABLE)
    }

    fn parse_providers(document: &Html, selectors: &PageSelectors) -> Result<Vec<EquipmentProvider>, LookupError> {
        let rows = document.select(&selectors.provider_rows).collect::<Vec<_>>();
        if rows.len() < 2 {
            return Err(LookupError::Extraction(Field::EquipmentProviders));
        }

        // data rows sit at odd indices, each followed by a spacer row
        rows.into_iter()
            .skip(1)
            .step_by(2)
            .map(Self::parse_provider_row)
            .collect()
    }

    fn parse_provider_row(row: ElementRef<'_>) -> Result<EquipmentProvider, LookupError> {
        Ok(
            EquipmentProvider {
                name: single_text(row.select(&PROVIDER_NAME_SELECTOR), Field::ProviderName)?,
                status: single_text(row.select(&PROVIDER_STATUS_SELECTOR), Field::ProviderStatus)?,
                estimate: single_text(row.select(&PROVIDER_ESTIMATE_SELECTOR), Field::ProviderEstimate)?,
                available: single_text(row.select(&PROVIDER_AVAILABILITY_SELECTOR), Field::ProviderAvailability)? == PROVIDER_AVAILABLE,
            }
        )
    }
}

impl From<ResultPage> for ExchangeInfo {
    fn from(page: ResultPage) -> Self {
        Self {
            exchange: page.primary.exchange,
            zone: page.primary.zone,
            distance: page.primary.distance,
            cable_length: page.primary.cable_length,
            estimated_speed: page.primary.estimated_speed,
            nbn_available: page.nbn_available,
            providers: page.providers,
        }
    }
}
