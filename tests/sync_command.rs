//! Discover and sync commands end to end against a mock remote service.

use adwords_sync::{discover, sync, Config, MessageWriter, SyncOptions};
use adwords_sync_http::HttpAdwordsApi;
use adwords_sync_source::Clock;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn soap(body: &str) -> String {
    format!(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body>{body}</soap:Body></soap:Envelope>"#
    )
}

fn config(server: &MockServer) -> Config {
    let document = json!({
        "start_date": "2017-06-01",
        "oauth_client_id": "id",
        "oauth_client_secret": "secret",
        "user_agent": "agent",
        "refresh_token": "refresh",
        "customer_ids": "123",
        "developer_token": "dev",
        "api_base_url": server.uri(),
        "oauth_base_url": server.uri()
    });
    Config::from_json_str(&document.to_string()).unwrap()
}

async fn mount_remote(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/o/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access",
            "expires_in": 3600
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/adwords/reportdownload/v201705/reportDefinition.xsd"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
                 <xsd:simpleType name="ReportDefinition.ReportType"><xsd:restriction base="xsd:string">
                   <xsd:enumeration value="AD_PERFORMANCE_REPORT"/>
                   <xsd:enumeration value="LABEL_REPORT"/>
                 </xsd:restriction></xsd:simpleType>
               </xsd:schema>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/adwords/cm/v201705/ReportDefinitionService"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap(
            r#"<getReportFieldsResponse>
                 <rval><fieldName>Date</fieldName><displayFieldName>Day</displayFieldName>
                   <xmlAttributeName>day</xmlAttributeName><fieldType>Date</fieldType>
                   <fieldBehavior>SEGMENT</fieldBehavior></rval>
                 <rval><fieldName>Clicks</fieldName><displayFieldName>Clicks</displayFieldName>
                   <xmlAttributeName>clicks</xmlAttributeName><fieldType>Long</fieldType>
                   <fieldBehavior>METRIC</fieldBehavior></rval>
               </getReportFieldsResponse>"#,
        )))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/adwords/reportdownload/v201705"))
        .and(header("clientCustomerId", "123"))
        .and(body_string_contains("20170601"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Day,Clicks\n2017-06-01,2\n"))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/adwords/reportdownload/v201705"))
        .and(header("clientCustomerId", "123"))
        .and(body_string_contains("20170602"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Day,Clicks\n2017-06-02,5\n"))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/adwords/cm/v201705/CampaignService"))
        .respond_with(ResponseTemplate::new(200).set_body_string(soap(
            r#"<getResponse><rval>
                 <totalNumEntries>1</totalNumEntries>
                 <entries><id>42</id><name>Spring</name></entries>
               </rval></getResponse>"#,
        )))
        .mount(server)
        .await;
}

fn write(dir: &Path, name: &str, value: &Value) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, value.to_string()).unwrap();
    path
}

fn selected_catalog() -> Value {
    json!({"streams": [
        {
            "stream": "AD_PERFORMANCE_REPORT",
            "tap_stream_id": "AD_PERFORMANCE_REPORT",
            "schema": {"type": "object", "selected": true,
                       "properties": {"clicks": {"selected": true}}}
        },
        {
            "stream": "campaigns",
            "tap_stream_id": "campaigns",
            "schema": {"type": "object", "selected": true,
                       "properties": {"name": {"selected": true}}}
        }
    ]})
}

fn messages(writer: Arc<MessageWriter<Vec<u8>>>) -> Vec<Value> {
    let writer = match Arc::try_unwrap(writer) {
        Ok(writer) => writer,
        Err(_) => panic!("message writer still shared"),
    };
    String::from_utf8(writer.into_inner().unwrap())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn of_type<'a>(messages: &'a [Value], kind: &str) -> Vec<&'a Value> {
    messages.iter().filter(|m| m["type"] == kind).collect()
}

#[tokio::test]
async fn discover_writes_catalog() {
    let server = MockServer::start().await;
    mount_remote(&server).await;
    let config = config(&server);
    let api = HttpAdwordsApi::new(config.http_config()).unwrap();

    let mut out = Vec::new();
    discover(&api, &config, &mut out).await.unwrap();

    let catalog: Value = serde_json::from_slice(&out).unwrap();
    let names: Vec<&str> = catalog["streams"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["stream"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["campaigns", "ad_groups", "ads", "accounts", "AD_PERFORMANCE_REPORT"]
    );
}

#[tokio::test]
async fn sync_resumes_from_seeded_state_and_emits_messages() {
    let server = MockServer::start().await;
    mount_remote(&server).await;
    let config = config(&server);
    let api = HttpAdwordsApi::new(config.http_config()).unwrap();

    let dir = TempDir::new().unwrap();
    let options = SyncOptions {
        catalog: write(dir.path(), "catalog.json", &selected_catalog()),
        state: Some(write(
            dir.path(),
            "state.json",
            &json!({"AD_PERFORMANCE_REPORT_123": "2017-06-01T00:00:00Z"}),
        )),
        state_file: None,
    };
    let writer = Arc::new(MessageWriter::new(Vec::new()));

    sync(
        &api,
        &config,
        &options,
        writer.clone(),
        Arc::new(FixedClock(day(2017, 6, 2))),
    )
    .await
    .unwrap();

    let messages = messages(writer);

    let schemas: Vec<&str> = of_type(&messages, "SCHEMA")
        .iter()
        .map(|m| m["stream"].as_str().unwrap())
        .collect();
    assert_eq!(schemas, vec!["AD_PERFORMANCE_REPORT", "campaigns"]);

    let records: Vec<&Value> = of_type(&messages, "RECORD")
        .into_iter()
        .map(|m| &m["record"])
        .collect();
    assert_eq!(
        records,
        vec![
            &json!({
                "day": "2017-06-01T00:00:00.000000Z",
                "clicks": 2,
                "customer_id": "123",
                "_sdc_id": 0
            }),
            &json!({
                "day": "2017-06-02T00:00:00.000000Z",
                "clicks": 5,
                "customer_id": "123",
                "_sdc_id": 0
            }),
            &json!({"id": 42, "name": "Spring", "customer_id": "123"}),
        ]
    );

    let last_state = of_type(&messages, "STATE").pop().unwrap().clone();
    assert_eq!(
        last_state["value"],
        json!({"AD_PERFORMANCE_REPORT_123": "2017-06-02T00:00:00Z"})
    );
}

#[tokio::test]
async fn sync_checkpoints_to_state_file() {
    let server = MockServer::start().await;
    mount_remote(&server).await;
    let config = config(&server);
    let api = HttpAdwordsApi::new(config.http_config()).unwrap();

    let dir = TempDir::new().unwrap();
    let state_file = dir.path().join("state").join("adwords.json");
    std::fs::create_dir_all(state_file.parent().unwrap()).unwrap();
    std::fs::write(
        &state_file,
        json!({"AD_PERFORMANCE_REPORT_123": "2017-06-01"}).to_string(),
    )
    .unwrap();

    let options = SyncOptions {
        catalog: write(dir.path(), "catalog.json", &selected_catalog()),
        state: None,
        state_file: Some(state_file.clone()),
    };
    let writer = Arc::new(MessageWriter::new(Vec::new()));

    sync(
        &api,
        &config,
        &options,
        writer.clone(),
        Arc::new(FixedClock(day(2017, 6, 2))),
    )
    .await
    .unwrap();

    let messages = messages(writer);
    assert!(of_type(&messages, "STATE").is_empty());

    let stored: Value = serde_json::from_str(&std::fs::read_to_string(&state_file).unwrap()).unwrap();
    assert_eq!(
        stored,
        json!({"AD_PERFORMANCE_REPORT_123": "2017-06-02T00:00:00Z"})
    );
}
