//! Report renderers
//!
//! Formatting only: every number in the report model is already derived,
//! so these functions round and arrange, nothing more. Degraded
//! categories are called out explicitly rather than omitted.

use crate::feature::Category;
use crate::geo;
use crate::rank::RankedFeature;
use crate::report::{CategoryResult, CategoryStatus, Report};
use serde::Serialize;
use serde_json::Value;

/// Section titles per category, in report order.
fn section_title(category: Category) -> &'static str {
    match category {
        Category::Pipelines => "NATURAL GAS PIPELINES",
        Category::Substations => "ELECTRIC SUBSTATIONS",
        Category::Broadband => "FIBER / BROADBAND",
        Category::Jurisdiction => "CITY LIMITS",
        Category::Attainment => "EPA ATTAINMENT",
    }
}

/// Renders the report as a human-readable Markdown document.
pub fn render_markdown(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "# Site Scout Report — {}\n\n",
        geo::format_dms(&report.query)
    ));
    out.push_str(&format!(
        "Coordinates: ({:.4}, {:.4})  \n",
        report.query.lat, report.query.lon
    ));
    out.push_str(&format!(
        "Generated: {}  \n",
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    out.push_str(&format!("Search radius: {:.0} km\n", report.radius_km));

    for (category, result) in &report.categories {
        out.push('\n');
        out.push_str(&format!(
            "## {} ({:.0} km radius)\n\n",
            section_title(*category),
            result.radius_km
        ));
        render_category(&mut out, *category, result);
    }

    out
}

fn render_category(out: &mut String, category: Category, result: &CategoryResult) {
    match result.status {
        CategoryStatus::SourceUnavailable | CategoryStatus::SourceError => {
            out.push_str("Data temporarily unavailable");
            if let Some(error) = &result.error {
                out.push_str(&format!(" ({})", error));
            }
            out.push('\n');
        }
        CategoryStatus::OkEmpty => {
            out.push_str(&empty_message(category));
            out.push('\n');
        }
        CategoryStatus::Ok => {
            for (index, feature) in result.features.iter().enumerate() {
                render_feature(out, category, index, feature);
            }
        }
    }
}

fn empty_message(category: Category) -> &'static str {
    match category {
        Category::Pipelines => "No pipelines found within radius",
        Category::Substations => "No substations found within radius",
        Category::Broadband => "No broadband availability data",
        Category::Jurisdiction => "No incorporated place within radius",
        Category::Attainment => "No attainment data",
    }
}

fn render_feature(out: &mut String, category: Category, index: usize, feature: &RankedFeature) {
    if category.is_containment() {
        out.push_str(&format!("**{}**\n", feature.name));
        if !feature.containing && feature.distance_km > 0.0 {
            out.push_str(&format!(
                "- Distance: {:.1} km ({:.1} mi) — {}\n",
                feature.distance_km, feature.distance_mi, feature.bearing_label
            ));
        }
    } else {
        out.push_str(&format!(
            "{}. **{}** — {:.1} km ({:.1} mi) {}\n",
            index + 1,
            feature.name,
            feature.distance_km,
            feature.distance_mi,
            feature.bearing_label
        ));
    }

    let mut keys: Vec<&String> = feature.attributes.keys().collect();
    keys.sort();
    for key in keys {
        out.push_str(&format!(
            "- {}: {}\n",
            key,
            render_value(&feature.attributes[key])
        ));
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Bool(true) => "yes".to_string(),
        Value::Bool(false) => "no".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// JSON envelope wrapping the report with a schema version marker.
#[derive(Serialize)]
struct JsonEnvelope<'a> {
    sitescout_version: &'static str,
    #[serde(flatten)]
    report: &'a Report,
}

/// Renders the report as pretty-printed JSON.
pub fn render_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonEnvelope {
        sitescout_version: crate::VERSION,
        report,
    })
}
