use scholar_tools::ToolDef;
use serde::Serialize;

use crate::config::Config;

/// Built-in instruction for the hosting agent.
pub const DEFAULT_INSTRUCTION: &str = "\
You are an education assistant that answers questions from the student's uploaded study materials.
Help students understand academic concepts clearly and practically.
Call rag_tool with the student's question and answer strictly in this structure:

Education:
Providing personalized study guidance, answering curriculum questions, or generating practice exercises.

User Query:
The student's question, exactly as received.

Answer:
A clear, concise and accurate explanation based on the retrieved study documents.
Use examples or simple analogies where they help.
Cite source files inline as [source:<file_path>::<chunk_index>].

Study Plan:
3 to 5 short, practical steps for understanding the topic better.

Practice Problems:
2 or 3 questions (Q1, Q2, ...) with short answers (A1, A2, ...).

Citations:
[source:<file_path>::<chunk_index>] Short note about what was used from that source.

Important:
- Do NOT output JSON or metadata.
- Do NOT include tool IDs or raw tool responses.
- Respond only in plain text following this format.";

/// What a hosting agent runtime needs to register the study assistant.
#[derive(Debug, Clone, Serialize)]
pub struct AgentDescriptor {
    pub name: String,
    pub model: String,
    pub description: String,
    pub instruction: String,
    pub tools: Vec<ToolDef>,
}

impl AgentDescriptor {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            name: config.agent.name.clone(),
            model: config.agent.model.clone(),
            description: config.agent.description.clone(),
            instruction: config.agent_instruction().to_owned(),
            tools: vec![crate::tool::definition()],
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
