//! mackerel-agent plugin output.
//!
//! Values are written one per line as `name\tvalue\ttimestamp`. When the
//! agent asks for metadata the plugin prints its graph definitions instead,
//! prefixed by a `# mackerel-agent-plugin` marker line.

use crate::core::{MetricSnapshot, MetricUnit};
use crate::metrics::Catalog;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Environment variable the agent sets when requesting graph definitions
pub const PLUGIN_META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

const META_HEADER: &str = "# mackerel-agent-plugin";

/// Format reported values, one line per metric
pub fn format_lines(values: &MetricSnapshot) -> String {
    let mut out = String::new();
    for (name, entry) in values.iter() {
        out.push_str(&format!("{}\t{}\t{}\n", name, entry.value, entry.timestamp));
    }
    out
}

/// Write reported values to the agent
pub fn write_values<W: Write>(out: &mut W, values: &MetricSnapshot) -> io::Result<()> {
    out.write_all(format_lines(values).as_bytes())?;
    out.flush()
}

#[derive(Debug, Serialize)]
struct PluginMeta {
    graphs: BTreeMap<String, GraphMeta>,
}

#[derive(Debug, Serialize)]
struct GraphMeta {
    label: String,
    unit: MetricUnit,
    metrics: Vec<MetricMeta>,
}

#[derive(Debug, Serialize)]
struct MetricMeta {
    name: String,
    label: String,
    stacked: bool,
}

/// Graph definitions document, keyed by prefixed graph name
pub fn graph_definitions(catalog: &Catalog, prefix: &str) -> serde_json::Value {
    let label_prefix = capitalize(prefix);
    let graphs = catalog
        .graphs()
        .iter()
        .map(|graph| {
            let meta = GraphMeta {
                label: format!("{} {}", label_prefix, graph.label),
                unit: graph.unit,
                metrics: graph
                    .metrics
                    .iter()
                    .map(|m| MetricMeta {
                        name: m.name.clone(),
                        label: m.label.clone(),
                        stacked: false,
                    })
                    .collect(),
            };
            (format!("{}.{}", prefix, graph.key), meta)
        })
        .collect();

    serde_json::to_value(PluginMeta { graphs }).unwrap_or(serde_json::Value::Null)
}

/// Write the graph definitions answer to the agent
pub fn write_graph_definitions<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    prefix: &str,
) -> io::Result<()> {
    writeln!(out, "{}", META_HEADER)?;
    writeln!(out, "{}", graph_definitions(catalog, prefix))?;
    out.flush()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
