//! Request construction for the ObjectServer REST API.
//!
//! URL shapes (base = configured URL without trailing slash):
//!
//! ```text
//! catalog  GET    {base}/catalog/columns?collist=ColumnName,DataType&filter=...
//! read     GET    {base}/{db}/{table}/?collist=a,b&filter=...
//! delete   DELETE {base}/{db}/{table}/?filter=...
//! insert   POST   {base}/{db}/{table}              + rowset body
//! update   PATCH  {base}/{db}/{table}?filter=...   + rowset body
//! ```

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONNECTION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderValue, Method, Request};
use omni_core::{OmniConfig, RequestDescriptor, TablePath, Verb};

use crate::error::{ClientError, ClientResult};

const USER_AGENT_VALUE: &str = concat!("omnilink/", env!("CARGO_PKG_VERSION"));

/// Base URL, credentials and timeout shared by every request.
#[derive(Clone)]
pub struct Endpoint {
    base: String,
    authorization: HeaderValue,
    timeout: Option<Duration>,
}

impl Endpoint {
    pub fn new(config: &OmniConfig) -> ClientResult<Self> {
        let parsed = url::Url::parse(&config.url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.url)))?;
        if !parsed.has_host() {
            return Err(ClientError::InvalidUrl(format!("{}: no host", config.url)));
        }

        let credentials = format!("{}:{}", config.user, config.password);
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        let mut authorization = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        authorization.set_sensitive(true);

        Ok(Self {
            base: config.url.trim_end_matches('/').to_string(),
            authorization,
            timeout: config.timeout(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Catalog query for the column names and type codes of `path`.
    pub fn catalog_request(&self, path: &TablePath) -> ClientResult<Request<Bytes>> {
        let filter = format!(
            "DatabaseName='{}' AND TableName='{}'",
            path.database(),
            path.table()
        );
        let url = format!(
            "{}/catalog/columns?collist=ColumnName,DataType&filter={}",
            self.base,
            escape(&filter)
        );
        self.build(Method::GET, &url, None)
    }

    /// The HTTP call for `request`. Insert/Update need an attached payload.
    pub fn request(&self, request: &RequestDescriptor) -> ClientResult<Request<Bytes>> {
        let table_url = format!(
            "{}/{}/{}",
            self.base,
            request.path.database(),
            request.path.table()
        );

        match request.verb {
            Verb::Read => {
                let collist = request
                    .projection
                    .iter()
                    // Plain identifiers pass through unchanged.
                    .map(|column| escape(column))
                    .collect::<Vec<_>>()
                    .join(",");
                let url = format!(
                    "{table_url}/?collist={collist}&filter={}",
                    escape(&request.filter)
                );
                self.build(Method::GET, &url, None)
            }
            Verb::Delete => {
                let url = format!("{table_url}/?filter={}", escape(&request.filter));
                self.build(Method::DELETE, &url, None)
            }
            Verb::Insert => {
                let body = self.payload_body(request)?;
                self.build(Method::POST, &table_url, Some(body))
            }
            Verb::Update => {
                let body = self.payload_body(request)?;
                let url = format!("{table_url}?filter={}", escape(&request.filter));
                self.build(Method::PATCH, &url, Some(body))
            }
        }
    }

    fn payload_body(&self, request: &RequestDescriptor) -> ClientResult<Bytes> {
        let payload = request.payload().ok_or_else(|| ClientError::MissingPayload {
            verb: request.verb,
            table: request.path.clone(),
        })?;
        let body = serde_json::to_vec(payload)
            .map_err(|e| ClientError::Protocol(format!("couldn't encode payload: {e}")))?;
        Ok(Bytes::from(body))
    }

    fn build(&self, method: Method, url: &str, body: Option<Bytes>) -> ClientResult<Request<Bytes>> {
        let mut builder = Request::builder()
            .method(method)
            .uri(url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONNECTION, "close")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE);
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        builder
            .body(body.unwrap_or_default())
            .map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))
    }
}

/// Query-string escaping: spaces become `+`, reserved bytes `%XX`.
pub fn escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use omni_core::{ColumnDescriptor, Row, RowSet, TypeTag, WritePayload};
    use serde_json::json;

    fn endpoint() -> Endpoint {
        let config = OmniConfig::new("http://omni:8080/objectserver/restapi/", "root", "pw")
            .with_timeout(Duration::from_secs(3));
        Endpoint::new(&config).unwrap()
    }

    fn alerts_status() -> TablePath {
        TablePath::parse("alerts/status").unwrap()
    }

    fn severity_payload() -> WritePayload {
        let mut row = Row::new();
        row.insert("Severity".to_string(), json!(5));
        WritePayload::from(RowSet {
            coldesc: vec![ColumnDescriptor {
                type_tag: TypeTag::Integer,
                name: "Severity".to_string(),
            }],
            rows: vec![row],
        })
    }

    #[test]
    fn escape_matches_query_encoding() {
        assert_eq!(escape("Severity > 5"), "Severity+%3E+5");
        assert_eq!(escape("Node='a' AND x=1"), "Node%3D%27a%27+AND+x%3D1");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn base_trailing_slash_trimmed() {
        let endpoint = endpoint();
        assert_eq!(endpoint.base(), "http://omni:8080/objectserver/restapi");
        assert_eq!(endpoint.timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn invalid_base_url_rejected() {
        let config = OmniConfig::new("not a url", "u", "p");
        assert!(matches!(Endpoint::new(&config), Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn catalog_request_shape() {
        let req = endpoint().catalog_request(&alerts_status()).unwrap();
        assert_eq!(req.method(), Method::GET);
        assert_eq!(
            req.uri().to_string(),
            "http://omni:8080/objectserver/restapi/catalog/columns\
             ?collist=ColumnName,DataType\
             &filter=DatabaseName%3D%27alerts%27+AND+TableName%3D%27status%27"
        );
        assert!(req.body().is_empty());
    }

    #[test]
    fn basic_auth_and_connection_close_on_every_request() {
        let req = endpoint().catalog_request(&alerts_status()).unwrap();
        // base64("root:pw")
        assert_eq!(req.headers()[AUTHORIZATION], "Basic cm9vdDpwdw==");
        assert_eq!(req.headers()[CONNECTION], "close");
    }

    #[test]
    fn read_request_shape() {
        let descriptor = RequestDescriptor::read(alerts_status())
            .projection(["Node", "Severity"])
            .filter("Severity > 3");
        let req = endpoint().request(&descriptor).unwrap();
        assert_eq!(req.method(), Method::GET);
        assert_eq!(
            req.uri().to_string(),
            "http://omni:8080/objectserver/restapi/alerts/status/?collist=Node,Severity&filter=Severity+%3E+3"
        );
        assert!(req.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn projection_names_join_verbatim_unless_unsafe() {
        let descriptor =
            RequestDescriptor::read(alerts_status()).projection(["Identifier", "Alert Key"]);
        let req = endpoint().request(&descriptor).unwrap();
        assert_eq!(
            req.uri().query(),
            Some("collist=Identifier,Alert+Key&filter=")
        );
    }

    #[test]
    fn delete_request_shape() {
        let descriptor = RequestDescriptor::delete(alerts_status(), "Node = 'x'");
        let req = endpoint().request(&descriptor).unwrap();
        assert_eq!(req.method(), Method::DELETE);
        assert_eq!(
            req.uri().to_string(),
            "http://omni:8080/objectserver/restapi/alerts/status/?filter=Node+%3D+%27x%27"
        );
        assert!(req.body().is_empty());
    }

    #[test]
    fn insert_request_shape() {
        let mut descriptor = RequestDescriptor::insert(alerts_status()).filter("ignored");
        descriptor.attach_payload(severity_payload());
        let req = endpoint().request(&descriptor).unwrap();

        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.uri().to_string(),
            "http://omni:8080/objectserver/restapi/alerts/status"
        );
        assert_eq!(req.headers()[CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_slice(req.body()).unwrap();
        assert_eq!(
            body,
            json!({"rowset": {"coldesc": [{"type": "integer", "name": "Severity"}], "rows": [{"Severity": 5}]}})
        );
    }

    #[test]
    fn update_request_shape() {
        let mut descriptor = RequestDescriptor::update(alerts_status(), "Serial = 10");
        descriptor.attach_payload(severity_payload());
        let req = endpoint().request(&descriptor).unwrap();

        assert_eq!(req.method(), Method::PATCH);
        assert_eq!(
            req.uri().to_string(),
            "http://omni:8080/objectserver/restapi/alerts/status?filter=Serial+%3D+10"
        );
        assert!(!req.body().is_empty());
    }

    #[test]
    fn write_without_payload_rejected() {
        let descriptor = RequestDescriptor::insert(alerts_status()).column("Severity", 1);
        let err = endpoint().request(&descriptor).unwrap_err();
        assert!(matches!(err, ClientError::MissingPayload { verb: Verb::Insert, .. }));
    }
}
