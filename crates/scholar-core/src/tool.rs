use std::sync::Arc;

use schemars::JsonSchema;
use scholar_llm::LlmProvider;
use scholar_tools::{ToolCall, ToolDef, ToolError, ToolExecutor, ToolOutput, deserialize_params};
use serde::Deserialize;

use crate::answer::AnswerGenerator;
use crate::error::PipelineError;

pub const RAG_TOOL_ID: &str = "rag_tool";

pub const RAG_TOOL_DESCRIPTION: &str =
    "Fetch relevant context and generate an answer using the RAG pipeline.";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RagToolParams {
    /// The student's question, in natural language.
    pub question: String,
}

#[must_use]
pub fn definition() -> ToolDef {
    ToolDef {
        id: RAG_TOOL_ID,
        description: RAG_TOOL_DESCRIPTION,
        schema: schemars::schema_for!(RagToolParams),
    }
}

/// Exposes the answer pipeline as a single-argument tool.
pub struct RagTool<C: LlmProvider, E: LlmProvider> {
    generator: Arc<AnswerGenerator<C, E>>,
}

impl<C: LlmProvider, E: LlmProvider> Clone for RagTool<C, E> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<C: LlmProvider, E: LlmProvider> RagTool<C, E> {
    #[must_use]
    pub fn new(generator: Arc<AnswerGenerator<C, E>>) -> Self {
        Self { generator }
    }

    /// Answer `question`; the empty string is passed through as is.
    ///
    /// # Errors
    ///
    /// Returns an error if retrieval or generation fails.
    pub async fn call(&self, question: &str) -> Result<String, PipelineError> {
        self.generator.answer(question).await
    }
}

impl<C: LlmProvider, E: LlmProvider> ToolExecutor for RagTool<C, E> {
    fn tool_definitions(&self) -> Vec<ToolDef> {
        vec![definition()]
    }

    async fn execute_tool_call(&self, call: &ToolCall) -> Result<Option<ToolOutput>, ToolError> {
        if call.tool_id != RAG_TOOL_ID {
            return Ok(None);
        }
        let params: RagToolParams = deserialize_params(&call.params)?;
        let answer = self
            .call(&params.question)
            .await
            .map_err(|e| ToolError::Execution(Box::new(e)))?;
        Ok(Some(ToolOutput {
            tool_name: RAG_TOOL_ID.to_owned(),
            summary: answer,
        }))
    }
}

#[cfg(test)]
mod tests {
    use scholar_llm::mock::MockProvider;
    use scholar_memory::InMemoryVectorStore;
    use serde_json::json;

    use super::*;
    use crate::index::CourseIndex;
    use crate::retriever::Retriever;

    fn tool(chat: MockProvider) -> RagTool<MockProvider, MockProvider> {
        let index = CourseIndex::new(Arc::new(InMemoryVectorStore::new()), "c");
        let generator = AnswerGenerator::new(chat, Retriever::new(index, MockProvider::default()), 4);
        RagTool::new(Arc::new(generator))
    }

    #[test]
    fn definition_has_question_parameter() {
        let def = definition();
        assert_eq!(def.id, "rag_tool");
        assert_eq!(def.description, RAG_TOOL_DESCRIPTION);
        let schema = serde_json::to_value(&def.schema).unwrap();
        assert_eq!(schema["properties"]["question"]["type"], "string");
        assert_eq!(schema["required"], json!(["question"]));
    }

    #[tokio::test]
    async fn call_returns_generated_text() {
        let tool = tool(MockProvider::with_responses(vec!["Education:\n...".into()]));
        assert_eq!(tool.call("What is DNA?").await.unwrap(), "Education:\n...");
    }

    #[tokio::test]
    async fn executes_matching_call() {
        let chat = MockProvider::default();
        let tool = tool(chat.clone());
        let call = ToolCall::new(RAG_TOOL_ID).with_param("question", json!(""));

        let output = tool.execute_tool_call(&call).await.unwrap().unwrap();
        assert_eq!(output.tool_name, "rag_tool");
        assert_eq!(output.summary, "mock response");
        assert_eq!(chat.seen_messages().len(), 1);
    }

    #[tokio::test]
    async fn ignores_other_tools() {
        let tool = tool(MockProvider::default());
        let call = ToolCall::new("web_search").with_param("question", json!("q"));
        assert!(tool.execute_tool_call(&call).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_question_is_invalid() {
        let tool = tool(MockProvider::default());
        let err = tool
            .execute_tool_call(&ToolCall::new(RAG_TOOL_ID))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams { .. }));

        let call = ToolCall::new(RAG_TOOL_ID).with_param("question", json!(42));
        assert!(matches!(
            tool.execute_tool_call(&call).await,
            Err(ToolError::InvalidParams { .. })
        ));
    }

    #[tokio::test]
    async fn generation_failure_is_execution_error() {
        let tool = tool(MockProvider::failing());
        let call = ToolCall::new(RAG_TOOL_ID).with_param("question", json!("q"));
        let err = tool.execute_tool_call(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::Execution(_)));
        assert!(err.to_string().starts_with("execution failed: LLM error"));
    }
}
