//! Prometheus text exposition format helpers.
//!
//! Pure string transforms over the exposition file: label escaping and
//! serialization, sample-line identity, in-place replacement, and
//! HELP/TYPE header deduplication. No I/O happens here.
//!
//! A sample is identified by `<name>{<labels>}`; the value and anything
//! after it never participate in matching. Label order is part of the
//! identity, so callers supply labels as an ordered slice.

use std::fmt;

/// Metric kind as it appears in `# TYPE` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Escape a label value for the exposition format.
///
/// Backslash must be replaced first; the quote and newline escapes
/// introduce backslashes of their own.
pub fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Serialize the label set: `name="<job>"` first, then each caller label
/// as `key="value"`, comma-joined, in the order supplied.
pub fn build_label_string(job: &str, labels: &[(&str, &str)]) -> String {
    let mut out = format!("name=\"{}\"", escape_label_value(job));
    for (key, value) in labels {
        out.push(',');
        out.push_str(&escape_label_value(key));
        out.push_str("=\"");
        out.push_str(&escape_label_value(value));
        out.push('"');
    }
    out
}

/// Identity of one sample line: `<name>{<labels>}`, value excluded.
pub(crate) fn sample_key(name: &str, label_str: &str) -> String {
    format!("{name}{{{label_str}}}")
}

/// A complete sample line, without trailing newline.
pub(crate) fn sample_line(name: &str, label_str: &str, value: &str) -> String {
    format!("{name}{{{label_str}}} {value}")
}

/// True if `line` is the sample identified by `key`, whatever its value.
fn is_sample_for(line: &str, key: &str) -> bool {
    match line.strip_prefix(key) {
        Some(rest) => rest.is_empty() || rest.starts_with(' '),
        None => false,
    }
}

/// The current value of the sample identified by `key`, if present.
pub(crate) fn find_sample_value<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        line.strip_prefix(key)
            .filter(|rest| rest.is_empty() || rest.starts_with(' '))
            .map(str::trim)
    })
}

/// Upsert one sample line.
///
/// If a line for (`name`, `label_str`) exists it is replaced in place and
/// every other line keeps its position. Otherwise HELP and TYPE headers
/// are appended first, each only when no header for this metric name is
/// present yet, then the sample line goes at the end. The result is
/// always newline-terminated.
pub(crate) fn upsert_sample(
    content: &str,
    name: &str,
    label_str: &str,
    kind: MetricKind,
    value: &str,
    help: &str,
) -> String {
    let key = sample_key(name, label_str);
    let line = sample_line(name, label_str, value);

    if content.lines().any(|l| is_sample_for(l, &key)) {
        let mut out = String::with_capacity(content.len() + line.len());
        for existing in content.lines() {
            if is_sample_for(existing, &key) {
                out.push_str(&line);
            } else {
                out.push_str(existing);
            }
            out.push('\n');
        }
        return out;
    }

    let mut out = String::with_capacity(content.len() + line.len() + 64);
    for existing in content.lines() {
        out.push_str(existing);
        out.push('\n');
    }
    let help_prefix = format!("# HELP {name} ");
    if !content.lines().any(|l| l.starts_with(&help_prefix)) {
        out.push_str(&format!("# HELP {name} {help}\n"));
    }
    let type_prefix = format!("# TYPE {name} ");
    if !content.lines().any(|l| l.starts_with(&type_prefix)) {
        out.push_str(&format!("# TYPE {name} {kind}\n"));
    }
    out.push_str(&line);
    out.push('\n');
    out
}

/// Increment a numeric value string by one.
///
/// Values containing a decimal point are reformatted with exactly two
/// decimal places; integers stay integral. Anything unparseable resets to
/// `"1"` instead of propagating an error.
pub(crate) fn increment_value(current: &str) -> String {
    if current.contains('.') {
        if let Ok(v) = current.parse::<f64>() {
            return format!("{:.2}", v + 1.0);
        }
    } else if let Ok(v) = current.parse::<i64>() {
        return (v + 1).to_string();
    }
    "1".to_string()
}
