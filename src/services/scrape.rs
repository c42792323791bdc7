// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTML extraction for the handful of pages the client reads.
//!
//! Everything here is pure and works on page text, so it can be tested
//! offline against captured snippets. Scanning is local to the tag or block
//! of interest; no full DOM is built.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("valid regex"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>/]+))"#)
        .expect("valid regex")
});

static PROFILE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\b[^>]*\bhref\s*=\s*["'](?:https?://[^/"']+)?/user/([^/"']+)/profile["']"#)
        .expect("valid regex")
});

static SUBTITLE_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div\b[^>]*\bclass\s*=\s*["']micro-text activitySubTitle["'][^>]*>(.*?)</div>"#)
        .expect("valid regex")
});

static ACTIVITY_TYPE_SELECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<select\b[^>]*\bname\s*=\s*["']activityType["'][^>]*>(.*?)</select>"#)
        .expect("valid regex")
});

static OPTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<option\b([^>]*)>(.*?)</option>").expect("valid regex"));

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"));

/// An `<option>` of the upload form's activity type selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityTypeOption {
    /// Value posted back with the form (e.g. "RUN")
    pub value: String,
    /// Label shown to the user (e.g. "Running")
    pub label: String,
}

impl ActivityTypeOption {
    /// Case-insensitive match against either the value or the label.
    pub fn matches(&self, requested: &str) -> bool {
        let requested = requested.trim();
        self.value.eq_ignore_ascii_case(requested) || self.label.eq_ignore_ascii_case(requested)
    }
}

/// Parse the attributes of a single tag. Names are lowercased.
fn tag_attributes(tag: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(tag)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}

/// Collect the name/value pairs of every `<input type="hidden">` on a page.
///
/// Inputs without a name are skipped; a missing value becomes "".
pub fn hidden_inputs(html: &str) -> HashMap<String, String> {
    INPUT_TAG
        .find_iter(html)
        .filter_map(|tag| {
            let mut attrs = tag_attributes(tag.as_str());
            let is_hidden = attrs
                .get("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden"));
            if !is_hidden {
                return None;
            }
            let name = attrs.remove("name")?;
            let value = attrs.remove("value").unwrap_or_default();
            Some((name, value))
        })
        .collect()
}

/// Username from the first `/user/<name>/profile` link on the home page.
pub fn profile_username(html: &str) -> Option<String> {
    PROFILE_LINK
        .captures(html)
        .map(|caps| caps[1].to_string())
        .filter(|name| !name.is_empty())
}

/// Date part of the activity page subtitle.
///
/// The subtitle reads like `Sat Jan 06 08:30:00 PST 2024 - Running`; only the
/// text before the first `-` is returned, whitespace-normalized.
pub fn activity_subtitle_date(html: &str) -> Option<String> {
    let inner = SUBTITLE_DIV.captures(html)?.get(1)?.as_str();
    let text = decode_entities(&ANY_TAG.replace_all(inner, " "));
    let date_part = text.split('-').next()?;
    let normalized = date_part.split_whitespace().collect::<Vec<_>>().join(" ");
    (!normalized.is_empty()).then_some(normalized)
}

/// Options of the `activityType` selector on the new-activity form.
pub fn activity_type_options(html: &str) -> Vec<ActivityTypeOption> {
    let Some(select) = ACTIVITY_TYPE_SELECT.captures(html).and_then(|c| c.get(1)) else {
        return Vec::new();
    };

    OPTION_TAG
        .captures_iter(select.as_str())
        .filter_map(|caps| {
            let attrs = tag_attributes(&caps[1]);
            let label = decode_entities(ANY_TAG.replace_all(&caps[2], "").trim());
            let value = attrs.get("value").cloned().unwrap_or_else(|| label.clone());
            (!value.is_empty()).then_some(ActivityTypeOption { value, label })
        })
        .collect()
}

/// Decode named and numeric character references.
fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
