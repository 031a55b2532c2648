//! NetLogger XML data service client
//!
//! Every call is one `GET` against the service base URL. Non-200 answers,
//! listings without servers and unusable arguments come back as
//! [`FetchOutcome::NoData`]; malformed XML, bad timestamps and transport
//! failures are [`NetLoggerError`]s.

use netlogger_common::{CheckinRecord, NetRecord};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::error::{NetLoggerError, Result};
use crate::parser::{parse_checkin_list, parse_net_list};

const ACTIVE_NETS_ENDPOINT: &str = "GetActiveNets.php";
const PAST_NETS_ENDPOINT: &str = "GetPastNets.php";

/// The two checkin roster endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinEndpoint {
    /// `GetCheckins.php`, roster of a net that is still open
    Active,
    /// `GetPastNetCheckins.php`, roster of a closed net (needs `NetID`)
    PastNet,
}

impl CheckinEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinEndpoint::Active => "GetCheckins.php",
            CheckinEndpoint::PastNet => "GetPastNetCheckins.php",
        }
    }
}

impl fmt::Display for CheckinEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckinEndpoint {
    type Err = NoDataReason;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "GetCheckins.php" => Ok(CheckinEndpoint::Active),
            "GetPastNetCheckins.php" => Ok(CheckinEndpoint::PastNet),
            other => Err(NoDataReason::UnknownEndpoint(other.to_string())),
        }
    }
}

/// Why a call produced no data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoDataReason {
    /// The service answered with something other than 200
    HttpStatus(u16),
    /// The net listing named no `ServerName`
    NoServers,
    /// Past-net checkins were requested without a net id
    MissingNetId,
    /// Not one of the checkin endpoints
    UnknownEndpoint(String),
    /// The service has no matching query
    Unsupported,
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::HttpStatus(code) => write!(f, "HTTP error code {}", code),
            NoDataReason::NoServers => write!(f, "no servers in response"),
            NoDataReason::MissingNetId => write!(f, "past net checkins need a net id"),
            NoDataReason::UnknownEndpoint(endpoint) => write!(f, "unknown endpoint {:?}", endpoint),
            NoDataReason::Unsupported => write!(f, "not supported by the NetLogger service"),
        }
    }
}

/// Result of a call that did not fail hard
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Data(T),
    NoData(NoDataReason),
}

impl<T> FetchOutcome<T> {
    /// Plain present/absent view
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Data(data) => Some(data),
            FetchOutcome::NoData(_) => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchOutcome::Data(data) => Some(data),
            FetchOutcome::NoData(_) => None,
        }
    }

    pub fn no_data_reason(&self) -> Option<&NoDataReason> {
        match self {
            FetchOutcome::Data(_) => None,
            FetchOutcome::NoData(reason) => Some(reason),
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, FetchOutcome::Data(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Data(data) => FetchOutcome::Data(f(data)),
            FetchOutcome::NoData(reason) => FetchOutcome::NoData(reason),
        }
    }
}

/// NetLogger client.
///
/// Keeps a cumulative log of every server name and net seen by
/// [`fetch_nets`](Self::fetch_nets) for the lifetime of the instance. The log
/// never feeds back into later calls: each call returns only its own nets.
pub struct NetLoggerClient {
    http: Client,
    base_url: String,
    servers: Vec<String>,
    nets: Vec<NetRecord>,
}

impl NetLoggerClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(NetLoggerError::ClientBuild)?;

        let mut base_url = config.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        debug!("NetLogger client for {} (user agent {})", base_url, config.user_agent);

        Ok(Self {
            http,
            base_url,
            servers: Vec::new(),
            nets: Vec::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every server name seen so far, in arrival order, duplicates included
    pub fn servers(&self) -> &[String] {
        &self.servers
    }

    /// Every net returned so far, in arrival order
    pub fn nets(&self) -> &[NetRecord] {
        &self.nets
    }

    /// Forget the cumulative server and net log
    pub fn reset_history(&mut self) {
        self.servers.clear();
        self.nets.clear();
    }

    async fn get_xml(&self, url: &str) -> Result<FetchOutcome<String>> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| NetLoggerError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            error!("NetLogger request to {} failed: HTTP error code {}", url, status.as_u16());
            return Ok(FetchOutcome::NoData(NoDataReason::HttpStatus(status.as_u16())));
        }

        let body = response
            .text()
            .await
            .map_err(|source| NetLoggerError::Transport {
                url: url.to_string(),
                source,
            })?;

        Ok(FetchOutcome::Data(body))
    }

    /// Fetch a net listing. `endpoint` is relative to the base URL and may
    /// carry its own query string.
    pub async fn fetch_nets(&mut self, endpoint: &str) -> Result<FetchOutcome<Vec<NetRecord>>> {
        let url = format!("{}{}", self.base_url, endpoint);

        let body = match self.get_xml(&url).await? {
            FetchOutcome::Data(body) => body,
            FetchOutcome::NoData(reason) => return Ok(FetchOutcome::NoData(reason)),
        };

        let Some(listing) = parse_net_list(&body)? else {
            warn!("NetLogger listing from {} names no servers", url);
            return Ok(FetchOutcome::NoData(NoDataReason::NoServers));
        };

        info!(
            "Fetched {} nets from {} servers ({})",
            listing.nets.len(),
            listing.servers.len(),
            endpoint
        );

        self.servers.extend(listing.servers);
        self.nets.extend(listing.nets.iter().cloned());

        Ok(FetchOutcome::Data(listing.nets))
    }

    /// Nets currently open on any server
    pub async fn get_active_nets(&mut self) -> Result<FetchOutcome<Vec<NetRecord>>> {
        self.fetch_nets(ACTIVE_NETS_ENDPOINT).await
    }

    /// Recently closed nets. `interval` is passed through untouched as the
    /// `Interval` query parameter; empty means the service default.
    pub async fn get_past_nets(&mut self, interval: Option<&str>) -> Result<FetchOutcome<Vec<NetRecord>>> {
        let endpoint = match interval {
            Some(interval) if !interval.is_empty() => {
                format!("{}?Interval={}", PAST_NETS_ENDPOINT, interval)
            }
            _ => PAST_NETS_ENDPOINT.to_string(),
        };
        self.fetch_nets(&endpoint).await
    }

    /// Build a checkin roster URL.
    ///
    /// Spaces in `net_name` become `%20`; nothing else is escaped.
    pub fn checkins_url(
        &self,
        endpoint: &str,
        server: &str,
        net_name: &str,
        net_id: Option<&str>,
    ) -> std::result::Result<String, NoDataReason> {
        let endpoint: CheckinEndpoint = endpoint.parse()?;
        let net_name = net_name.replace(' ', "%20");

        let mut url = format!(
            "{}{}?ServerName={}&NetName={}",
            self.base_url, endpoint, server, net_name
        );

        if endpoint == CheckinEndpoint::PastNet {
            match net_id {
                Some(id) if !id.is_empty() => {
                    url.push_str("&NetID=");
                    url.push_str(id);
                }
                _ => return Err(NoDataReason::MissingNetId),
            }
        }

        Ok(url)
    }

    /// Fetch the checkin roster of one net. Rows are returned verbatim and
    /// are not added to the cumulative log.
    pub async fn fetch_checkins(
        &self,
        endpoint: &str,
        server: &str,
        net_name: &str,
        net_id: Option<&str>,
    ) -> Result<FetchOutcome<Vec<CheckinRecord>>> {
        let url = match self.checkins_url(endpoint, server, net_name, net_id) {
            Ok(url) => url,
            Err(reason) => {
                error!("NetLogger checkins for {:?} on {} not requested: {}", net_name, server, reason);
                return Ok(FetchOutcome::NoData(reason));
            }
        };

        let body = match self.get_xml(&url).await? {
            FetchOutcome::Data(body) => body,
            FetchOutcome::NoData(reason) => return Ok(FetchOutcome::NoData(reason)),
        };

        let checkins = parse_checkin_list(&body)?;
        info!("Fetched {} checkins for {:?} on {}", checkins.len(), net_name, server);

        Ok(FetchOutcome::Data(checkins))
    }

    pub async fn get_active_net_checkins(
        &self,
        server: &str,
        net_name: &str,
    ) -> Result<FetchOutcome<Vec<CheckinRecord>>> {
        self.fetch_checkins(CheckinEndpoint::Active.as_str(), server, net_name, None)
            .await
    }

    pub async fn get_past_net_checkins(
        &self,
        server: &str,
        net_name: &str,
        net_id: &str,
    ) -> Result<FetchOutcome<Vec<CheckinRecord>>> {
        self.fetch_checkins(CheckinEndpoint::PastNet.as_str(), server, net_name, Some(net_id))
            .await
    }

    /// Checkins of a past net looked up by name alone. The service only
    /// serves past rosters by `NetID`, so this never issues a request; use
    /// [`get_past_net_checkins`](Self::get_past_net_checkins).
    pub fn get_past_checkins(&self, server: &str, net_name: &str) -> FetchOutcome<Vec<CheckinRecord>> {
        warn!("Past checkins by name requested for {:?} on {}: unsupported", net_name, server);
        FetchOutcome::NoData(NoDataReason::Unsupported)
    }
}
