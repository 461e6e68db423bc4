use std::fmt::Write;

use crate::retriever::RetrievedChunk;

pub const PROMPT_TEMPLATE: &str = "\
You are an education assistant agent that answers user questions using retrieved study materials.
Use ONLY the context below to answer the student's question.

CONTEXT:
{context}

STUDENT QUESTION:
{question}

When giving your output, always follow this exact format:

Education:
Providing personalized study guidance, answering curriculum questions, or generating practice exercises.

User Query: <user question>

Answer:
<your clear and concise explanation based on the study materials>

Study Plan:
1. Step 1: ...
2. Step 2: ...
3. Step 3: ...

Practice Problems:
Q1. ...
A1. ...
Q2. ...
A2. ...

Citations:
[source:<file_path>::<chunk_index>] Short note about what was used from that source.

Cite every claim taken from the context inline as [source:<file_path>::<chunk_index>].
Do NOT include JSON, IDs, metadata, or tool call info. \
Only give plain text output exactly in this format.";

/// Rendered in place of the context when retrieval found nothing.
pub const EMPTY_CONTEXT_NOTICE: &str = "\
(No course material was retrieved for this question. Tell the student the uploaded \
materials do not cover it and do not invent citations.)";

const PLACEHOLDERS: [&str; 2] = ["{context}", "{question}"];

/// Render retrieved chunks as text blocks, each followed by its citation tag,
/// separated by blank lines, in retrieval order.
#[must_use]
pub fn format_context(chunks: &[RetrievedChunk]) -> String {
    if chunks.is_empty() {
        return EMPTY_CONTEXT_NOTICE.to_owned();
    }

    let mut out = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        let _ = write!(out, "{}\n{}", chunk.text, chunk.citation());
    }
    out
}

/// Build the final prompt. Pure: identical inputs give byte-identical output.
///
/// The question is inserted verbatim.
#[must_use]
pub fn assemble_prompt(chunks: &[RetrievedChunk], question: &str) -> String {
    render(PROMPT_TEMPLATE, &format_context(chunks), question)
}

/// Single left-to-right pass over the template; substituted text is never
/// rescanned, so braces inside the context or question are left alone.
fn render(template: &str, context: &str, question: &str) -> String {
    let mut out = String::with_capacity(template.len() + context.len() + question.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match PLACEHOLDERS.iter().find(|p| tail.starts_with(**p)) {
            Some(&"{context}") => {
                out.push_str(context);
                rest = &tail["{context}".len()..];
            }
            Some(&"{question}") => {
                out.push_str(question);
                rest = &tail["{question}".len()..];
            }
            _ => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
