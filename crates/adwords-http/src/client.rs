use crate::config::HttpApiConfig;
use crate::oauth::TokenCache;
use crate::report_definition::{report_definition_xml, report_fields, report_types_from_xsd};
use crate::soap::{envelope, text_element, unwrap_response, RequestHeader};
use crate::xml::{flatten, Element};
use adwords_api::{AdwordsApi, EntityPage, EntitySelector, ReportFieldDescription, ReportRequest};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use std::time::Duration;
use tracing::debug;

/// Services that live under the account-management namespace.
const MCM_SERVICES: &[&str] = &["ManagedCustomerService"];

fn service_group(service: &str) -> &'static str {
    if MCM_SERVICES.contains(&service) {
        "mcm"
    } else {
        "cm"
    }
}

/// [`AdwordsApi`] over HTTP: SOAP for metadata and entity listings, form
/// POST for report downloads.
pub struct HttpAdwordsApi {
    config: HttpApiConfig,
    client: Client,
    tokens: TokenCache,
}

impl HttpAdwordsApi {
    pub fn new(config: HttpApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            config,
            client,
            tokens: TokenCache::default(),
        })
    }

    async fn bearer(&self) -> Result<String> {
        let token = self.tokens.access_token(&self.client, &self.config).await?;
        Ok(format!("Bearer {token}"))
    }

    /// Issue one SOAP operation and return its `{operation}Response` element.
    async fn call(
        &self,
        customer_id: &str,
        service: &str,
        operation: &str,
        body: &str,
    ) -> Result<Element> {
        let group = service_group(service);
        let request = envelope(
            &self.config.namespace(group),
            RequestHeader {
                client_customer_id: customer_id,
                developer_token: &self.config.developer_token,
                user_agent: &self.config.user_agent,
            },
            body,
        );

        debug!("Calling {service}.{operation} for customer {customer_id}");

        let response = self
            .client
            .post(self.config.service_url(group, service))
            .header(header::AUTHORIZATION, self.bearer().await?)
            .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", "")
            .body(request)
            .send()
            .await
            .with_context(|| format!("{service}.{operation} request failed"))?;

        // Faults arrive with a 500 status and a SOAP body.
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("failed to read {service}.{operation} response"))?;

        match unwrap_response(&text, operation) {
            Ok(element) => Ok(element),
            Err(e) if status.is_success() => Err(e),
            Err(e) => Err(e.context(format!("{service}.{operation} failed ({status})"))),
        }
    }
}

async fn success_text(response: Response, what: &str) -> Result<String> {
    let status = response.status();
    let text = response
        .text()
        .await
        .with_context(|| format!("failed to read {what} response"))?;
    if !status.is_success() {
        return Err(anyhow!("{what} failed ({status}): {text}"));
    }
    Ok(text)
}

#[async_trait]
impl AdwordsApi for HttpAdwordsApi {
    async fn list_report_types(&self) -> Result<Vec<String>> {
        let url = self.config.report_definition_xsd_url();
        debug!("Fetching report definition schema from {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("report definition schema request failed")?;
        let xsd = success_text(response, "report definition schema").await?;
        report_types_from_xsd(&xsd)
    }

    async fn describe_report_fields(
        &self,
        customer_id: &str,
        report_type: &str,
    ) -> Result<Vec<ReportFieldDescription>> {
        let body = format!(
            "<ns:getReportFields>{}</ns:getReportFields>",
            text_element("reportType", report_type)
        );
        let response = self
            .call(customer_id, "ReportDefinitionService", "getReportFields", &body)
            .await?;
        Ok(report_fields(&response))
    }

    async fn download_report(&self, customer_id: &str, request: &ReportRequest) -> Result<String> {
        let rdxml = report_definition_xml(&self.config.namespace("cm"), request);
        let options = &request.options;

        let response = self
            .client
            .post(self.config.report_download_url())
            .header(header::AUTHORIZATION, self.bearer().await?)
            .header("developerToken", &self.config.developer_token)
            .header("clientCustomerId", customer_id)
            .header("skipReportHeader", options.skip_report_header.to_string())
            .header("skipColumnHeader", options.skip_column_header.to_string())
            .header("skipReportSummary", options.skip_report_summary.to_string())
            .header(
                "includeZeroImpressions",
                options.include_zero_impressions.to_string(),
            )
            .form(&[("__rdxml", rdxml.as_str())])
            .send()
            .await
            .with_context(|| format!("{} download request failed", request.report_type))?;

        success_text(response, &format!("{} download", request.report_type)).await
    }

    async fn get_entities(
        &self,
        customer_id: &str,
        service: &str,
        selector: &EntitySelector,
    ) -> Result<EntityPage> {
        let fields: String = selector
            .fields
            .iter()
            .map(|f| text_element("fields", f))
            .collect();
        let body = format!(
            "<ns:get><ns:serviceSelector>{fields}<ns:paging>{}{}</ns:paging></ns:serviceSelector></ns:get>",
            text_element("startIndex", &selector.paging.start_index.to_string()),
            text_element("numberResults", &selector.paging.number_results.to_string()),
        );

        let response = self.call(customer_id, service, "get", &body).await?;
        let rval = response
            .child("rval")
            .ok_or_else(|| anyhow!("{service}.get response has no rval"))?;

        let total_num_entries = match rval.child_text("totalNumEntries") {
            Some(total) => total
                .parse::<u64>()
                .with_context(|| format!("invalid totalNumEntries {total:?}"))?,
            None => 0,
        };

        Ok(EntityPage {
            entries: rval.children_named("entries").map(flatten).collect(),
            total_num_entries,
        })
    }
}
