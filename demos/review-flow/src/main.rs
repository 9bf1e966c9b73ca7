//! End-to-end walkthrough of a gift declaration's life: submission, a
//! request for information, an amendment, and the final decision.

use std::sync::Arc;

use anyhow::Result;
use giftgate::config::GiftgateConfig;
use giftgate::primitives::{Direction, GiftType, Principal, PrincipalId, ReviewDecision, Role};
use giftgate::store::{DeclarationDraft, DeclarationPatch, FileAuditLog, InMemoryStore};
use giftgate::workflow::{WorkflowEngine, compute_stats};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = GiftgateConfig::from_env()?;
    giftgate::telemetry::try_init(config.log_filter());

    info!("=== Giftgate: Review Flow ===");

    let store = Arc::new(InMemoryStore::new());
    let mut engine = WorkflowEngine::new(store);
    if let Some(path) = config.audit_log_path() {
        engine = engine.with_audit_log(Arc::new(FileAuditLog::open(path).await?));
    }

    let employee = Principal::new(PrincipalId::random());
    let officer = Principal::new(PrincipalId::random()).with_role(Role::Compliance);

    // An employee declares a received gift; creation submits directly.
    let draft = DeclarationDraft::builder(Direction::Received, GiftType::Physical)
        .description("Bottle of single malt")?
        .estimated_value(8_500)
        .gift_date(chrono::Utc::now().date_naive())
        .counterparty_name("A. Otieno")?
        .counterparty_org("Acme Supplies")?
        .counterparty_relationship("Supplier")?
        .justification("Contract renewal courtesy")?
        .build()?;
    let declaration = engine.create_declaration(&employee, draft).await?;
    info!(id = %declaration.id(), status = declaration.status().as_str(), "declared");

    // Compliance asks for more detail.
    let (declaration, review) = engine
        .record_review(
            &officer,
            declaration.id(),
            ReviewDecision::RequestInfo,
            Some("Please attach the invoice value".into()),
        )
        .await?;
    info!(
        status = declaration.status().as_str(),
        comment = review.comment().unwrap_or_default(),
        "information requested"
    );

    // The owner amends while the review is open.
    let patch = DeclarationPatch {
        estimated_value: Some(9_200),
        justification: Some("Contract renewal courtesy; invoice attached".into()),
        ..DeclarationPatch::default()
    };
    let declaration = engine
        .update_declaration(&employee, declaration.id(), patch)
        .await?;
    info!(revision = declaration.revision(), "amended");

    // And compliance closes the review.
    let (declaration, _) = engine
        .record_review(&officer, declaration.id(), ReviewDecision::Approved, None)
        .await?;
    info!(status = declaration.status().as_str(), "decided");

    let mine = engine.list_mine(&employee).await?;
    let stats = compute_stats(&mine);
    info!(
        total = stats.total,
        pending = stats.pending,
        approved = stats.approved,
        total_value = stats.total_value,
        "owner dashboard"
    );

    Ok(())
}
