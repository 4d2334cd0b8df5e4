//! `geoip parse` — decode a captured lookup reply.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use geoip_core::{DecoderConfig, GeoIp};
use geoip_response::{ParseResult, ResponseParser};
use serde_json::json;
use tracing::info;

/// Run the `geoip parse` command. Returns whether the reply decoded
/// successfully.
pub fn parse(path: &str, format: &str, config: Option<&str>) -> Result<bool> {
    let config = match config {
        Some(config_path) => DecoderConfig::from_file(Path::new(config_path))
            .with_context(|| format!("failed to load config {config_path}"))?,
        None => DecoderConfig::default(),
    };

    let raw = read_input(path)?;
    let result = ResponseParser::new(config).parse::<GeoIp>(&raw);
    info!(
        status = result.status_code(),
        records = result.records().len(),
        "decoded {} bytes from {}",
        raw.len(),
        path
    );

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&to_json(&result))?);
        }
        _ => {
            print!("{}", format_text(&result));
        }
    }

    Ok(result.is_success())
}

fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut raw = Vec::new();
        std::io::stdin()
            .read_to_end(&mut raw)
            .context("failed to read reply from stdin")?;
        return Ok(raw);
    }
    std::fs::read(path).with_context(|| format!("failed to read {path}"))
}

/// Status line followed by one record per line, in wire format.
pub fn format_text(result: &ParseResult<GeoIp>) -> String {
    let mut out = format!("{} {}\n", result.status_code(), result.status_message());
    for record in result.records() {
        out.push_str(&format!("{record}\n"));
    }
    out
}

pub fn to_json(result: &ParseResult<GeoIp>) -> serde_json::Value {
    let headers: Option<serde_json::Map<String, serde_json::Value>> = result.header().map(|h| {
        h.fields()
            .map(|(name, value)| (name.to_string(), value.into()))
            .collect()
    });

    json!({
        "success": result.is_success(),
        "status_code": result.status_code(),
        "status_message": result.status_message(),
        "headers": headers,
        "error": result.error().map(ToString::to_string),
        "records": result.records(),
    })
}
