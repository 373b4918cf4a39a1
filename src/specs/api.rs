// src/specs/api.rs
//! Parser for the CDash `api/v1/index.php` endpoint.
//!
//! Only the slice of the response the pipeline needs is modelled:
//!
//! ```text
//! { "buildgroups": [ { "builds": [ { "buildname", "site", "buildstamp",
//!     "update": {"files"}, "configure": {"warnings","errors"},
//!     "compilation": {"errors","warnings"}, "test": {"notrun","fail","pass"} } ] } ] }
//! ```
//!
//! CDash is loose with types here: counts show up as numbers, numeric strings, or
//! `null` depending on version, and whole sections go missing for builds that never
//! reached that stage. Every field therefore deserializes leniently, with 0 or `""`
//! as the fallback.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::core::sanitize::extract_number;
use crate::record::{Counts, RawBuild};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiResponse {
    buildgroups: Vec<ApiGroup>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiGroup {
    builds: Vec<ApiBuild>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiBuild {
    #[serde(deserialize_with = "text")]
    buildname: String,
    #[serde(deserialize_with = "text")]
    site: String,
    #[serde(deserialize_with = "text")]
    buildstamp: String,
    #[serde(deserialize_with = "section")]
    update: Section,
    #[serde(deserialize_with = "section")]
    configure: Section,
    #[serde(deserialize_with = "section")]
    compilation: Section,
    #[serde(deserialize_with = "section")]
    test: Section,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Section {
    #[serde(deserialize_with = "count")]
    files: u64,
    #[serde(deserialize_with = "count")]
    warnings: u64,
    #[serde(deserialize_with = "count")]
    errors: u64,
    #[serde(deserialize_with = "count")]
    notrun: u64,
    #[serde(deserialize_with = "count")]
    fail: u64,
    #[serde(deserialize_with = "count")]
    pass: u64,
}

fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => extract_number(&s),
        _ => 0,
    })
}

fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => s!(),
    })
}

fn section<'de, D: Deserializer<'de>>(d: D) -> Result<Section, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => Section::default(),
    })
}

impl From<ApiBuild> for RawBuild {
    fn from(b: ApiBuild) -> Self {
        RawBuild {
            site: b.site,
            build_name: b.buildname,
            build_stamp: b.buildstamp,
            counts: Counts {
                update_files: b.update.files,
                configure_warnings: b.configure.warnings,
                configure_errors: b.configure.errors,
                build_errors: b.compilation.errors,
                build_warnings: b.compilation.warnings,
                test_not_run: b.test.notrun,
                test_failed: b.test.fail,
                test_passed: b.test.pass,
            },
        }
    }
}

/// Every build in every group, unfiltered. Malformed JSON yields an empty list.
pub fn parse_api(json_text: &str) -> Vec<RawBuild> {
    match serde_json::from_str::<ApiResponse>(json_text) {
        Ok(resp) => resp
            .buildgroups
            .into_iter()
            .flat_map(|g| g.builds)
            .map(RawBuild::from)
            .collect(),
        Err(e) => {
            tracing::debug!(error = %e, "API response is not the expected JSON");
            Vec::new()
        }
    }
}
