use std::path::Path;
use std::sync::Arc;

use scholar_core::config::{IndexBackend, IndexConfig};
use scholar_core::prompt::EMPTY_CONTEXT_NOTICE;
use scholar_core::tool::RAG_TOOL_ID;
use scholar_core::{AgentDescriptor, AnswerGenerator, Config, RagTool, Retriever, build_index};
use scholar_llm::any::AnyProvider;
use scholar_llm::mock::MockProvider;
use scholar_tools::{ToolCall, ToolError, ToolExecutor};

fn embedder() -> AnyProvider {
    AnyProvider::Mock(MockProvider::default().with_hashed_embeddings(128))
}

fn memory_index(source: &Path, extensions: &[&str]) -> IndexConfig {
    IndexConfig {
        source_dir: source.to_path_buf(),
        backend: IndexBackend::Memory,
        extensions: extensions.iter().map(|e| (*e).to_owned()).collect(),
        ..IndexConfig::default()
    }
}

async fn generator(
    config: &IndexConfig,
    chat: MockProvider,
) -> AnswerGenerator<AnyProvider, AnyProvider> {
    let embedder = embedder();
    let (index, _) = build_index(config, &embedder).await.unwrap();
    AnswerGenerator::new(AnyProvider::Mock(chat), Retriever::new(index, embedder), 4)
}

#[tokio::test]
async fn exact_chunk_text_ranks_first() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("cells.txt"),
        "Mitochondria are the powerhouse of the cell.",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("genetics.txt"),
        "DNA stores hereditary information in a double helix.",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("physics.txt"),
        "Newton's second law relates force, mass and acceleration.",
    )
    .unwrap();

    let embedder = embedder();
    let (index, report) = build_index(&memory_index(dir.path(), &["txt"]), &embedder)
        .await
        .unwrap();
    assert_eq!(report.chunks_created, 3);

    let retriever = Retriever::new(index, embedder);
    let chunks = retriever
        .retrieve("DNA stores hereditary information in a double helix.", 2)
        .await
        .unwrap();
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].source.ends_with("genetics.txt"));
    assert_eq!(chunks[0].chunk_index, 0);
    assert!(chunks[0].score >= chunks[1].score);
}

#[tokio::test]
async fn empty_directory_answers_with_notice() {
    let dir = tempfile::tempdir().unwrap();
    let chat = MockProvider::default();
    let generator = generator(&memory_index(dir.path(), &["pdf"]), chat.clone()).await;

    let answer = generator.answer("What is entropy?").await.unwrap();
    assert_eq!(answer, "mock response");

    let prompt = &chat.seen_messages()[0][0].content;
    assert!(prompt.contains(EMPTY_CONTEXT_NOTICE));
    assert!(prompt.contains("What is entropy?"));
}

#[tokio::test]
async fn sqlite_index_is_rebuilt_from_scratch() {
    let src = tempfile::tempdir().unwrap();
    let persist = tempfile::tempdir().unwrap();
    std::fs::write(src.path().join("a.md"), "# Enzymes\n\nEnzymes speed up reactions.").unwrap();

    let config = IndexConfig {
        source_dir: src.path().to_path_buf(),
        persist_dir: persist.path().join("index"),
        backend: IndexBackend::Sqlite,
        extensions: vec!["md".into()],
        ..IndexConfig::default()
    };
    let (_, first) = build_index(&config, &embedder()).await.unwrap();
    let (index, second) = build_index(&config, &embedder()).await.unwrap();
    assert_eq!(first.chunks_created, 1);
    assert_eq!(second.chunks_created, 1);
    assert_eq!(index.len().await.unwrap(), 1);
}

#[cfg(feature = "pdf")]
mod pdf {
    use scholar_memory::test_utils::{write_pdf, write_pdf_pages};

    use super::*;

    #[tokio::test]
    async fn pdf_question_prompt_carries_citation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("biology.pdf");
        write_pdf(&file, "Photosynthesis converts light into chemical energy.").unwrap();

        let chat = MockProvider::default();
        let generator = generator(&memory_index(dir.path(), &["pdf"]), chat.clone()).await;
        generator.answer("What is photosynthesis?").await.unwrap();

        let source = std::fs::canonicalize(&file).unwrap();
        let prompt = &chat.seen_messages()[0][0].content;
        assert!(prompt.contains(&format!("[source:{}::0]", source.display())));
        assert!(prompt.contains("Photosynthesis"));
        assert!(prompt.contains("chemical energy."));
        assert!(prompt.contains("What is photosynthesis?"));
    }

    #[tokio::test]
    async fn pdf_pages_keep_page_numbers_and_distinct_citations() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("cells.pdf");
        write_pdf_pages(
            &file,
            &["Mitochondria are the powerhouse of the cell.", "Ribosomes build proteins."],
        )
        .unwrap();

        let embedder = embedder();
        let (index, report) = build_index(&memory_index(dir.path(), &["pdf"]), &embedder)
            .await
            .unwrap();
        assert_eq!(report.files_seen, 1);
        assert_eq!(report.documents_loaded, 2);
        assert_eq!(report.chunks_created, 2);

        let retriever = Retriever::new(index, embedder);
        let chunks = retriever.retrieve("Ribosomes build proteins.", 2).await.unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.contains("Ribosomes"));
        assert_eq!(chunks[0].page, Some(2));
        assert_eq!(chunks[0].chunk_index, 1);
        assert_eq!(chunks[1].page, Some(1));
        assert_eq!(chunks[1].chunk_index, 0);
    }
}

#[tokio::test]
async fn tool_rejects_missing_question() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(&memory_index(dir.path(), &["txt"]), MockProvider::default()).await;
    let tool = RagTool::new(Arc::new(generator));

    let result = tool.execute_tool_call(&ToolCall::new(RAG_TOOL_ID)).await;
    assert!(matches!(result, Err(ToolError::InvalidParams { .. })));

    let call = ToolCall::new(RAG_TOOL_ID).with_param("question", serde_json::json!("What is a cell?"));
    let output = tool.execute_tool_call(&call).await.unwrap().unwrap();
    assert_eq!(output.to_string(), "mock response");
}

#[test]
fn agent_card_lists_rag_tool() {
    let json = AgentDescriptor::from_config(&Config::default()).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["name"], "rag_agent");
    assert_eq!(value["model"], "gemini-2.0-flash");
    assert_eq!(value["tools"][0]["id"], "rag_tool");
    assert!(value["instruction"].as_str().unwrap().contains("Citations:"));
}
