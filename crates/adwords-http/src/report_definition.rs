//! Report metadata: the report type enumeration, field descriptions and the
//! report definition document sent with downloads.

use crate::xml::{escape, parse_document, Element};
use adwords_api::{ReportFieldDescription, ReportRequest};
use anyhow::{anyhow, Result};

const REPORT_TYPE_SIMPLE_TYPE: &str = "ReportDefinition.ReportType";

/// Values of the `ReportDefinition.ReportType` enumeration, in schema order.
pub(crate) fn report_types_from_xsd(xsd: &str) -> Result<Vec<String>> {
    let root = parse_document(xsd)?;
    let simple_type = root
        .find(&|e: &Element| {
            e.name == "simpleType" && e.attribute("name") == Some(REPORT_TYPE_SIMPLE_TYPE)
        })
        .ok_or_else(|| anyhow!("{REPORT_TYPE_SIMPLE_TYPE} not found in report definition schema"))?;

    let mut values = Vec::new();
    collect_enumeration(simple_type, &mut values);
    Ok(values)
}

fn collect_enumeration(element: &Element, values: &mut Vec<String>) {
    for child in &element.children {
        if child.name == "enumeration" {
            if let Some(value) = child.attribute("value") {
                values.push(value.to_string());
            }
        }
        collect_enumeration(child, values);
    }
}

/// Field descriptions from a `getReportFieldsResponse` element.
pub(crate) fn report_fields(response: &Element) -> Vec<ReportFieldDescription> {
    response
        .children_named("rval")
        .map(|rval| {
            let text = |name: &str| rval.child_text(name).unwrap_or_default().to_string();
            ReportFieldDescription {
                xml_attribute_name: text("xmlAttributeName"),
                field_name: text("fieldName"),
                display_field_name: text("displayFieldName"),
                field_behavior: text("fieldBehavior"),
                field_type: text("fieldType"),
                exclusive_fields: rval
                    .children_named("exclusiveFields")
                    .map(|e| e.text.clone())
                    .collect(),
            }
        })
        .collect()
}

/// The `__rdxml` form value for a download.
pub(crate) fn report_definition_xml(namespace: &str, request: &ReportRequest) -> String {
    let mut fields = String::new();
    for field in &request.fields {
        fields.push_str(&format!("<fields>{}</fields>", escape(field)));
    }
    let day = |d: chrono::NaiveDate| d.format("%Y%m%d").to_string();

    format!(
        concat!(
            r#"<reportDefinition xmlns="{ns}">"#,
            "<selector>{fields}<dateRange><min>{min}</min><max>{max}</max></dateRange></selector>",
            "<reportName>{name}</reportName>",
            "<reportType>{report_type}</reportType>",
            "<dateRangeType>CUSTOM_DATE</dateRangeType>",
            "<downloadFormat>{format}</downloadFormat>",
            "</reportDefinition>"
        ),
        ns = escape(namespace),
        fields = fields,
        min = day(request.date_range.min),
        max = day(request.date_range.max),
        name = escape(&format!("{} {}", request.report_type, day(request.date_range.min))),
        report_type = escape(&request.report_type),
        format = request.download_format.as_str(),
    )
}
