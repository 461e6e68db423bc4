use serde::Serialize;

/// Registration record for a tool: id, human description and JSON schema of its params.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDef {
    pub id: &'static str,
    pub description: &'static str,
    #[serde(rename = "parameters")]
    pub schema: schemars::Schema,
}
