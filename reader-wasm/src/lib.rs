//! Bridge WASM <-> JavaScript trung lập framework.

use chrono::Utc;
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

use reader_core::{format_relative_time, parse_timestamp, ReaderConfig, ReaderError};

#[derive(Deserialize)]
struct JsReaderConfig {
    #[serde(default)]
    relative_tick_secs: Option<u32>,
    #[serde(default)]
    auto_refresh_secs: Option<u32>,
    #[serde(default)]
    max_entries_per_feed: Option<usize>,
    #[serde(default)]
    cache_ttl_secs: Option<u64>,
}

impl From<JsReaderConfig> for ReaderConfig {
    fn from(cfg: JsReaderConfig) -> Self {
        let mut base = ReaderConfig::default();
        if let Some(secs) = cfg.relative_tick_secs {
            base.relative_tick_secs = secs;
        }
        if let Some(secs) = cfg.auto_refresh_secs {
            base.auto_refresh_secs = secs;
        }
        if let Some(max) = cfg.max_entries_per_feed {
            base.max_entries_per_feed = max;
        }
        if let Some(secs) = cfg.cache_ttl_secs {
            base.cache_ttl_secs = secs;
        }
        base
    }
}

#[wasm_bindgen]
pub fn summarize_feed_xml(xml: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsReaderConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            ReaderConfig::from(cfg)
        }
        None => ReaderConfig::default(),
    };

    let snapshot = reader_feed::parse_feed(xml.as_bytes(), &cfg)
        .map_err(|err| JsValue::from_str(&format_reader_error(err)))?;

    to_value(&snapshot)
        .map_err(|err| JsValue::from_str(&format!("Không serialize snapshot: {err}")))
}

#[wasm_bindgen]
pub fn relative_time_label(timestamp: &str) -> Result<String, JsValue> {
    let at = parse_timestamp(timestamp)
        .ok_or_else(|| JsValue::from_str("Không đọc được timestamp"))?;
    Ok(format_relative_time(at, Utc::now()))
}

fn format_reader_error(err: ReaderError) -> String {
    format!("Reader error: {err}")
}
