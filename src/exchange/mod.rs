use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Request};

use crate::exchange::error::LookupError;
use crate::exchange::model::ExchangeInfo;
use crate::exchange::page::{PageSelectors, ResultPage};

pub mod error;
pub mod model;
mod page;

pub use page::PageLayout;

const DEFAULT_ENDPOINT: &str = "http://www.adsl2exchanges.com.au/addresslookupstart.php";
const DEFAULT_ERROR_PATH: &str = "/error.php";
const DEFAULT_ADDRESS_FIELD: &str = "Address";
const UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

const ENDPOINT_ENV: &str = "ADSL_LOOKUP_URL";
const ERROR_PATH_ENV: &str = "ADSL_ERROR_PATH";

/// Where and how to query the lookup site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// form target of the address search
    pub endpoint: String,
    /// path the site redirects to when it cannot place the address
    pub error_path: String,
    /// name of the form field carrying the address
    pub address_field: String,
    pub layout: PageLayout,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            error_path: DEFAULT_ERROR_PATH.to_string(),
            address_field: DEFAULT_ADDRESS_FIELD.to_string(),
            layout: PageLayout::default(),
        }
    }
}

impl LookupConfig {
    /// defaults, with the endpoint and error path overridable from the environment
    ///
    /// `ADSL_LOOKUP_URL`, `ADSL_ERROR_PATH`
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        if let Ok(error_path) = std::env::var(ERROR_PATH_ENV) {
            config.error_path = error_path;
        }
        config
    }
}

/// A fetched response, reduced to what the classifier and parser need
struct FetchedPage {
    /// path of the final URL, after redirects
    path: String,
    body: String,
}

/// HTTP client for looking up ADSL exchange information by address.
///
/// Holds no per-lookup state, so one client can serve concurrent lookups.
pub struct ExchangeClient {
    client: Client,
    config: LookupConfig,
    selectors: PageSelectors,
}

impl ExchangeClient {
    pub fn new() -> Result<Self, LookupError> {
        Self::with_config(LookupConfig::default())
    }

    pub fn with_config(config: LookupConfig) -> Result<Self, LookupError> {
        Ok(
            Self {
                client: Client::builder()
                    .default_headers(Self::default_headers())
                    .build()?,
                selectors: PageSelectors::compile(&config.layout)?,
                config,
            }
        )
    }

    fn default_headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(USER_AGENT, HeaderValue::from_static(UA));
        map
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Look up the exchange serving `address`.
    ///
    /// The address is sent as given; the lookup site decides whether it exists.
    pub async fn lookup(&self, address: &str) -> Result<ExchangeInfo, LookupError> {
        let request = self.build_request(address)?;
        let page = self.fetch_page(request).await?;
        self.classify(&page)?;

        let info = ExchangeInfo::from(ResultPage::parse_html(&page.body, &self.selectors)?);
        info!("[{}] is served by [{}] exchange, zone [{}]", address, info.exchange, info.zone);
        Ok(info)
    }

    /// form-encoded POST of the address to the lookup endpoint
    pub fn build_request(&self, address: &str) -> Result<Request, LookupError> {
        let request = self.client
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&[(self.config.address_field.as_str(), address)])
            .build()?;
        Ok(request)
    }

    async fn fetch_page(&self, request: Request) -> Result<FetchedPage, LookupError> {
        debug!("posting address lookup to [{}]", request.url());
        let response = self.client.execute(request).await?;
        let path = response.url().path().to_string();
        debug!("lookup resolved to [{}] with status [{}]", response.url(), response.status());
        Ok(
            FetchedPage {
                path,
                body: response.text().await?,
            }
        )
    }

    /// the site signals an unknown address only by redirecting to its error page
    fn classify(&self, page: &FetchedPage) -> Result<(), LookupError> {
        if page.path == self.config.error_path {
            return Err(LookupError::AddressNotFound);
        }
        Ok(())
    }
}

/// Look up `address` with a default [`ExchangeClient`].
pub async fn lookup(address: &str) -> Result<ExchangeInfo, LookupError> {
    ExchangeClient::new()?.lookup(address).await
}
