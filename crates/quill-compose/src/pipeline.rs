//! End-to-end composition pipeline
//!
//! draft -> title extraction -> split -> selective rewrite -> finalize.
//! The output document is what the publishing orchestrator types into the
//! composer; nothing here touches the browser.

use crate::{draft, finalize::Finalizer, rewrite::RewriteEngine, split, title};
use quill_core::{ComposeConfig, Document, Result};
use quill_gen::{RetryPolicy, TextGenerator};
use std::sync::Arc;
use tracing::info;

/// Compose one publication-ready document for a topic and angle
pub async fn compose(
    generator: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
    config: ComposeConfig,
    topic: &str,
    pattern: &str,
) -> Result<Document> {
    info!(topic, pattern, "composing article");

    let raw = draft::generate_draft(generator.as_ref(), &retry, &config, topic, pattern).await?;
    let (doc_title, body) = title::extract_title(&raw);

    let mut split_doc = split::split(&body);
    let engine = RewriteEngine::new(generator.clone(), retry.clone(), config.clone());
    let rewritten = engine.rewrite_undersized(&mut split_doc).await;
    info!(sections = split_doc.sections.len(), rewritten, "rewrite pass done");

    let assembled = split::reassemble(&split_doc);

    let finalizer = Finalizer::new(generator, retry, config);
    let finalized = finalizer.finalize(&assembled).await;

    let mut document = Document::new(raw, doc_title);
    document.sections = split_doc.sections;
    document.tags = finalized.tag_line;
    document.final_text = finalized.text;
    Ok(document)
}
