//! SOAP envelopes and response unwrapping.

use crate::xml::{escape, parse_document, Element};
use anyhow::{anyhow, Result};

const ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Values carried in every request's `RequestHeader`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestHeader<'a> {
    pub client_customer_id: &'a str,
    pub developer_token: &'a str,
    pub user_agent: &'a str,
}

/// Wrap `body` (already in the `ns:` prefix) in an envelope with the
/// request header.
pub(crate) fn envelope(namespace: &str, header: RequestHeader<'_>, body: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="{envelope_ns}" xmlns:ns="{ns}">"#,
            "<soapenv:Header><ns:RequestHeader>",
            "<ns:clientCustomerId>{customer}</ns:clientCustomerId>",
            "<ns:developerToken>{token}</ns:developerToken>",
            "<ns:userAgent>{agent}</ns:userAgent>",
            "</ns:RequestHeader></soapenv:Header>",
            "<soapenv:Body>{body}</soapenv:Body>",
            "</soapenv:Envelope>"
        ),
        envelope_ns = ENVELOPE_NS,
        ns = escape(namespace),
        customer = escape(header.client_customer_id),
        token = escape(header.developer_token),
        agent = escape(header.user_agent),
        body = body,
    )
}

/// `<ns:{name}>{escaped text}</ns:{name}>`
pub(crate) fn text_element(name: &str, text: &str) -> String {
    format!("<ns:{name}>{}</ns:{name}>", escape(text))
}

/// Parse a response envelope and return the `{operation}Response` element.
///
/// A `Fault` body becomes an error carrying its `faultstring`.
pub(crate) fn unwrap_response(xml: &str, operation: &str) -> Result<Element> {
    let root = parse_document(xml)?;
    let body = root
        .child("Body")
        .ok_or_else(|| anyhow!("SOAP response for {operation} has no Body"))?;

    if let Some(fault) = body.child("Fault") {
        let message = fault
            .child_text("faultstring")
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown fault");
        return Err(anyhow!("SOAP fault from {operation}: {message}"));
    }

    let expected = format!("{operation}Response");
    body.child(&expected)
        .cloned()
        .ok_or_else(|| anyhow!("SOAP response has no {expected} element"))
}
