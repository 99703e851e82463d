use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
}

/// Node/edge payload shared by `/graph/data`, `/graph/functions` and
/// `/graph/function/{name}`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImpactBreakdown {
    #[serde(default)]
    pub direct_count: usize,
    #[serde(default)]
    pub indirect_count: usize,
    #[serde(default)]
    pub function_callers: usize,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BlastRadiusData {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub change_type: Option<String>,
    #[serde(default)]
    pub direct_dependents: Vec<String>,
    #[serde(default)]
    pub indirect_dependents: Vec<String>,
    #[serde(default)]
    pub total_affected: Option<usize>,
    #[serde(default)]
    pub functions_affected: Option<Value>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub impact_breakdown: Option<ImpactBreakdown>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffectedFunction {
    pub name: String,
    pub caller_count: usize,
}

impl BlastRadiusData {
    /// Reads `functions_affected` leniently: `(total_functions, functions)`.
    pub fn affected_functions(&self) -> (usize, Vec<AffectedFunction>) {
        let Some(value) = self.functions_affected.as_ref() else {
            return (0, Vec::new());
        };

        let functions = value
            .get("functions")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let name = entry.get("name").and_then(Value::as_str)?;
                        let caller_count = entry
                            .get("caller_count")
                            .and_then(Value::as_u64)
                            .unwrap_or(0) as usize;
                        Some(AffectedFunction {
                            name: name.to_owned(),
                            caller_count,
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let total = value
            .get("total_functions")
            .and_then(Value::as_u64)
            .map_or(functions.len(), |total| total as usize);

        (total, functions)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FunctionEntry {
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FunctionList {
    #[serde(default)]
    pub functions: Vec<FunctionEntry>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<Option<String>>,
}

/// One backend response, tagged by the view it feeds.
#[derive(Clone, Debug)]
pub enum GraphPayload {
    FileGraph(GraphData),
    FunctionGraph(GraphData),
    BlastRadius(BlastRadiusData),
}
