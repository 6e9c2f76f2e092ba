use anyhow::{Context, Result};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::parsing::interpret_status_message;
use crate::registry::RoomDescriptor;
use crate::types::{Config, QueryError, RoomReading};

pub const FUNCTION_NAME: &str = "synjones.onecard.query.elec.roominfo";
pub const APP_ID: &str = "0030000000006001";

const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 12; SM-F926U Build/V417IR; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/101.0.4951.61 Safari/537.36 MMWEBID/2279 MicroMessenger/8.0.58.2841(0x28003A52) WeChat/arm64 Weixin NetType/WIFI Language/zh_CN ABI/arm64";
const ORIGIN: &str = "http://wxjdf.tiangong.edu.cn:9910";
const REFERER: &str = "http://wxjdf.tiangong.edu.cn:9910/web/common/checkEle.html";

/// Anything that can read one room's balance.
#[allow(async_fn_in_trait)]
pub trait BalanceSource {
    async fn query(&self, room: &RoomDescriptor) -> Result<RoomReading, QueryError>;
}

#[derive(Serialize)]
struct QueryEnvelope<'a> {
    query_elec_roominfo: RoomInfoQuery<'a>,
}

#[derive(Serialize)]
struct RoomInfoQuery<'a> {
    aid: &'a str,
    account: &'a str,
    room: RoomRef<'a>,
    floor: FloorRef<'a>,
    area: AreaRef<'a>,
    building: BuildingRef<'a>,
}

#[derive(Serialize)]
struct RoomRef<'a> {
    roomid: &'a str,
    room: &'a str,
}

#[derive(Serialize)]
struct FloorRef<'a> {
    floorid: &'a str,
    floor: &'a str,
}

#[derive(Serialize)]
struct AreaRef<'a> {
    area: &'a str,
    areaname: &'a str,
}

#[derive(Serialize)]
struct BuildingRef<'a> {
    buildingid: &'a str,
    building: &'a str,
}

/// Compact JSON sent as the `jsondata` form field.
pub fn build_query_envelope(room: &RoomDescriptor) -> String {
    let envelope = QueryEnvelope {
        query_elec_roominfo: RoomInfoQuery {
            aid: APP_ID,
            account: &room.account,
            room: RoomRef { roomid: &room.room_id, room: &room.room },
            floor: FloorRef { floorid: &room.floor_id, floor: &room.floor },
            area: AreaRef { area: &room.area, areaname: &room.area_name },
            building: BuildingRef { buildingid: &room.building_id, building: &room.building },
        },
    };
    // Only borrowed strings; serialization cannot fail.
    serde_json::to_string(&envelope).unwrap_or_default()
}

fn browser_headers(session_id: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
    );
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
    );
    headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));
    headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("JSESSIONID={}", session_id))
            .context("JSESSIONID contains characters not allowed in a header")?,
    );
    Ok(headers)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn transport_error(e: reqwest::Error) -> QueryError {
    if e.is_timeout() {
        QueryError::Timeout
    } else {
        QueryError::Transport(e.to_string())
    }
}

/// Client for the campus one-card electricity endpoint.
pub struct BillingClient {
    http: reqwest::Client,
    url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl BillingClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            url: cfg.billing_url.clone(),
            headers: browser_headers(&cfg.session_id)?,
            timeout: cfg.query_timeout,
        })
    }

    pub async fn query_room(&self, room: &RoomDescriptor) -> Result<RoomReading, QueryError> {
        info!("Querying {}", room.name);
        let jsondata = build_query_envelope(room);
        let form = [
            ("jsondata", jsondata.as_str()),
            ("funname", FUNCTION_NAME),
            ("json", "true"),
        ];

        let res = self
            .http
            .post(&self.url)
            .form(&form)
            .headers(self.headers.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;
        info!("Billing endpoint status: {}", res.status());

        let body = res.text().await.map_err(transport_error)?;
        let parsed: serde_json::Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                warn!("Billing response is not JSON ({}): {}", e, truncate(&body, 500));
                return Err(QueryError::MalformedResponse(truncate(&body, 100)));
            }
        };
        info!("Billing response: {}...", truncate(&parsed.to_string(), 200));

        let message = parsed
            .pointer("/query_elec_roominfo/errmsg")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        info!("Server message: {}", message);

        let balance = interpret_status_message(message)?;
        info!("{} remaining: {}", room.name, balance);
        Ok(RoomReading {
            room_name: room.name.clone(),
            balance,
            raw_message: message.to_string(),
        })
    }
}

impl BalanceSource for BillingClient {
    async fn query(&self, room: &RoomDescriptor) -> Result<RoomReading, QueryError> {
        self.query_room(room).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_rooms;

    #[test]
    fn test_query_envelope_shape() {
        let room = &default_rooms()[0];
        let json = build_query_envelope(room);
        assert!(!json.contains(' '));

        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let q = &v["query_elec_roominfo"];
        assert_eq!(q["aid"], APP_ID);
        assert_eq!(q["account"], "26577");
        assert_eq!(q["room"]["roomid"], "20161009111811827231");
        assert_eq!(q["room"]["room"], "1栋608");
        assert_eq!(q["floor"]["floorid"], "6");
        assert_eq!(q["floor"]["floor"], "6层");
        assert_eq!(q["area"]["area"], "天津工业大学");
        assert_eq!(q["area"]["areaname"], "天津工业大学");
        assert_eq!(q["building"]["buildingid"], "20161008184448464922");
        assert_eq!(q["building"]["building"], "西苑7号楼");
    }

    #[test]
    fn test_envelope_key_order() {
        let json = build_query_envelope(&default_rooms()[0]);
        let positions: Vec<usize> = ["\"aid\"", "\"account\"", "\"room\"", "\"floor\"", "\"area\"", "\"building\""]
            .iter()
            .map(|k| json.find(k).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_browser_headers_carry_session_cookie() {
        let headers = browser_headers("ABC123").unwrap();
        assert_eq!(headers[header::COOKIE], "JSESSIONID=ABC123");
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
        assert!(headers[header::USER_AGENT].to_str().unwrap().contains("MicroMessenger"));

        assert!(browser_headers("bad\nvalue").is_err());
    }
}
