//! End-to-end lifecycle coverage: submission, review, overrides, deletion,
//! and the projections, all through the engine's policy-gated surface.

use std::sync::Arc;

use chrono::NaiveDate;
use gift_primitives::{
    DeclarationStatus, Direction, GiftType, Principal, PrincipalId, ReviewDecision, Role,
};
use gift_store::{AuditKind, AuditLog, DeclarationDraft, FileAuditLog, InMemoryStore};
use gift_workflow::{WorkflowEngine, WorkflowError, compute_stats};
use uuid::Uuid;

fn employee() -> Principal {
    Principal::new(PrincipalId::random())
}

fn compliance() -> Principal {
    Principal::new(PrincipalId::random()).with_role(Role::Compliance)
}

fn admin() -> Principal {
    Principal::new(PrincipalId::random()).with_role(Role::Admin)
}

fn draft(description: &str, value: u64) -> DeclarationDraft {
    DeclarationDraft::builder(Direction::Received, GiftType::Physical)
        .description(description)
        .unwrap()
        .estimated_value(value)
        .gift_date(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap())
        .counterparty_name("J. Mwangi")
        .unwrap()
        .counterparty_org("Acme Supplies")
        .unwrap()
        .counterparty_relationship("Supplier")
        .unwrap()
        .justification("Year-end courtesy")
        .unwrap()
        .build()
        .unwrap()
}

fn engine() -> WorkflowEngine {
    WorkflowEngine::new(Arc::new(InMemoryStore::new()))
}

#[tokio::test]
async fn submit_and_approve() {
    let engine = engine();
    let owner = employee();
    let reviewer = compliance();

    let declaration = engine
        .create_declaration(&owner, draft("Bottle of wine", 4500))
        .await
        .unwrap();
    assert_eq!(declaration.status(), DeclarationStatus::Submitted);
    assert_eq!(declaration.owner(), owner.id());

    let (updated, review) = engine
        .record_review(
            &reviewer,
            declaration.id(),
            ReviewDecision::Approved,
            Some("within policy".into()),
        )
        .await
        .unwrap();
    assert_eq!(updated.status(), DeclarationStatus::Approved);
    assert_eq!(review.reviewer(), reviewer.id());
    assert_eq!(review.comment(), Some("within policy"));

    // The owner still sees the decided record and its review trail.
    let seen = engine.get_declaration(&owner, declaration.id()).await.unwrap();
    assert_eq!(seen.status(), DeclarationStatus::Approved);
    let reviews = engine.list_reviews_for(&owner, declaration.id()).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].decision(), ReviewDecision::Approved);
}

#[tokio::test]
async fn request_info_keeps_the_review_open() {
    let engine = engine();
    let owner = employee();
    let reviewer = compliance();

    let declaration = engine
        .create_declaration(&owner, draft("Conference dinner", 12_000))
        .await
        .unwrap();

    let (updated, _) = engine
        .record_review(
            &reviewer,
            declaration.id(),
            ReviewDecision::RequestInfo,
            Some("who attended?".into()),
        )
        .await
        .unwrap();
    assert_eq!(updated.status(), DeclarationStatus::UnderReview);

    // The owner may amend while the review is open.
    let patch = gift_store::DeclarationPatch {
        justification: Some("Dinner with two procurement leads".into()),
        ..gift_store::DeclarationPatch::default()
    };
    let amended = engine
        .update_declaration(&owner, declaration.id(), patch)
        .await
        .unwrap();
    assert_eq!(amended.revision(), 1);

    let (closed, _) = engine
        .record_review(&reviewer, declaration.id(), ReviewDecision::Rejected, None)
        .await
        .unwrap();
    assert_eq!(closed.status(), DeclarationStatus::Rejected);
}

#[tokio::test]
async fn decided_declarations_reject_further_reviews_and_edits() {
    let engine = engine();
    let owner = employee();
    let reviewer = compliance();

    let declaration = engine
        .create_declaration(&owner, draft("Gift hamper", 8_000))
        .await
        .unwrap();
    engine
        .record_review(&reviewer, declaration.id(), ReviewDecision::Approved, None)
        .await
        .unwrap();

    let err = engine
        .record_review(&reviewer, declaration.id(), ReviewDecision::Rejected, None)
        .await
        .expect_err("already decided");
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));

    let patch = gift_store::DeclarationPatch {
        estimated_value: Some(1),
        ..gift_store::DeclarationPatch::default()
    };
    let err = engine
        .update_declaration(&owner, declaration.id(), patch)
        .await
        .expect_err("terminal");
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
}

#[tokio::test]
async fn content_edits_are_owner_only() {
    let engine = engine();
    let owner = employee();
    let officer = compliance();
    let root = admin();
    let stranger = employee();

    let declaration = engine
        .create_declaration(&owner, draft("Notebook", 700))
        .await
        .unwrap();
    let patch = || gift_store::DeclarationPatch {
        description: Some("Leather notebook".into()),
        ..gift_store::DeclarationPatch::default()
    };

    // Compliance and Admin read everything, but content moves only through
    // the owner; their write path is the status override.
    for actor in [&officer, &root] {
        let err = engine
            .update_declaration(actor, declaration.id(), patch())
            .await
            .expect_err("not the owner");
        assert!(matches!(err, WorkflowError::Authorization { .. }));
    }

    // A stranger cannot even learn the record exists.
    let err = engine
        .update_declaration(&stranger, declaration.id(), patch())
        .await
        .expect_err("not visible");
    assert!(matches!(err, WorkflowError::NotFound { .. }));

    let updated = engine
        .update_declaration(&owner, declaration.id(), patch())
        .await
        .unwrap();
    assert_eq!(updated.description(), "Leather notebook");
}

#[tokio::test]
async fn reviewers_never_decide_their_own_declarations() {
    let engine = engine();
    // The owner also sits on the compliance team.
    let owner = compliance();

    let declaration = engine
        .create_declaration(&owner, draft("Whisky", 6_000))
        .await
        .unwrap();
    let err = engine
        .record_review(&owner, declaration.id(), ReviewDecision::Approved, None)
        .await
        .expect_err("self review");
    assert!(matches!(err, WorkflowError::Authorization { .. }));
}

#[tokio::test]
async fn strangers_see_nothing() {
    let engine = engine();
    let owner = employee();
    let stranger = employee();

    let declaration = engine
        .create_declaration(&owner, draft("Tickets", 3_000))
        .await
        .unwrap();

    // Absence and invisibility are indistinguishable.
    let err = engine
        .get_declaration(&stranger, declaration.id())
        .await
        .expect_err("not visible");
    assert!(matches!(err, WorkflowError::NotFound { .. }));

    let err = engine
        .list_reviews_for(&stranger, declaration.id())
        .await
        .expect_err("not visible");
    assert!(matches!(err, WorkflowError::NotFound { .. }));

    let err = engine
        .record_review(&stranger, declaration.id(), ReviewDecision::Approved, None)
        .await
        .expect_err("no review rights");
    assert!(matches!(err, WorkflowError::Authorization { .. }));

    let err = engine
        .list_pending_review(&stranger, 10)
        .await
        .expect_err("no queue access");
    assert!(matches!(err, WorkflowError::Authorization { .. }));
}

#[tokio::test]
async fn only_one_of_two_racing_reviews_lands() {
    let engine = engine();
    let owner = employee();
    let first = compliance();
    let second = compliance();

    let declaration = engine
        .create_declaration(&owner, draft("Artwork", 90_000))
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        engine.record_review(&first, declaration.id(), ReviewDecision::Approved, None),
        engine.record_review(&second, declaration.id(), ReviewDecision::Rejected, None),
    );

    // Exactly one decision commits; the loser observes either the stale
    // status at commit or the already-decided record at read.
    assert_eq!(a.is_ok() as usize + b.is_ok() as usize, 1);
    let loser = if a.is_err() { a } else { b };
    assert!(matches!(
        loser.expect_err("lost the race"),
        WorkflowError::ConcurrentModification { .. } | WorkflowError::InvalidTransition { .. }
    ));

    let settled = engine.get_declaration(&owner, declaration.id()).await.unwrap();
    assert!(settled.status().is_terminal());
    let reviews = engine.list_reviews_for(&owner, declaration.id()).await.unwrap();
    assert_eq!(reviews.len(), 1);
}

#[tokio::test]
async fn overrides_are_role_gated_and_audited() {
    let mut path = std::env::temp_dir();
    path.push(format!("giftgate-flow-{}.log", Uuid::new_v4()));
    let audit: Arc<FileAuditLog> = Arc::new(FileAuditLog::open(&path).await.unwrap());

    let engine =
        WorkflowEngine::new(Arc::new(InMemoryStore::new())).with_audit_log(Arc::clone(&audit) as Arc<dyn AuditLog>);
    let owner = employee();
    let officer = compliance();

    let declaration = engine
        .create_declaration(&owner, draft("Safari package", 250_000))
        .await
        .unwrap();

    // Owners cannot steer their own status.
    let err = engine
        .override_status(&owner, declaration.id(), DeclarationStatus::Approved)
        .await
        .expect_err("owner override");
    assert!(matches!(err, WorkflowError::Authorization { .. }));

    let escalated = engine
        .override_status(&officer, declaration.id(), DeclarationStatus::Escalated)
        .await
        .unwrap();
    assert_eq!(escalated.status(), DeclarationStatus::Escalated);

    // Escalated records sit outside the review flow until resolved.
    let err = engine
        .record_review(&officer, declaration.id(), ReviewDecision::Approved, None)
        .await
        .expect_err("escalated hold");
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));

    let resolved = engine
        .override_status(&officer, declaration.id(), DeclarationStatus::Rejected)
        .await
        .unwrap();
    assert_eq!(resolved.status(), DeclarationStatus::Rejected);

    // Draft is never a valid target, even out of a terminal status.
    let err = engine
        .override_status(&officer, declaration.id(), DeclarationStatus::Draft)
        .await
        .expect_err("draft target");
    assert!(matches!(err, WorkflowError::InvalidTransition { .. }));

    let trail = audit.tail(10).await.unwrap();
    assert_eq!(trail.len(), 2);
    assert!(trail.iter().all(|e| e.kind() == AuditKind::AdminOverride));
    assert_eq!(trail[0].actor(), officer.id());

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn deletion_is_admin_only_and_cascades() {
    let store = Arc::new(InMemoryStore::new());
    let engine = WorkflowEngine::new(Arc::clone(&store) as Arc<dyn gift_store::ComplianceStore>);
    let owner = employee();
    let reviewer = compliance();
    let root = admin();

    let declaration = engine
        .create_declaration(&owner, draft("Watch", 50_000))
        .await
        .unwrap();
    engine
        .record_review(
            &reviewer,
            declaration.id(),
            ReviewDecision::RequestInfo,
            None,
        )
        .await
        .unwrap();

    let err = engine
        .delete_declaration(&reviewer, declaration.id())
        .await
        .expect_err("compliance cannot delete");
    assert!(matches!(err, WorkflowError::Authorization { .. }));
    let err = engine
        .delete_declaration(&owner, declaration.id())
        .await
        .expect_err("owner cannot delete");
    assert!(matches!(err, WorkflowError::Authorization { .. }));

    engine.delete_declaration(&root, declaration.id()).await.unwrap();

    let err = engine
        .get_declaration(&root, declaration.id())
        .await
        .expect_err("gone");
    assert!(matches!(err, WorkflowError::NotFound { .. }));
    let stats = store.stats().await;
    assert_eq!(stats.declarations, 0);
    assert_eq!(stats.reviews, 0);
}

#[tokio::test]
async fn projections_partition_by_owner_and_status() {
    let engine = engine();
    let alice = employee();
    let bob = employee();
    let reviewer = compliance();

    let a1 = engine
        .create_declaration(&alice, draft("Pen set", 1_500))
        .await
        .unwrap();
    let _a2 = engine
        .create_declaration(&alice, draft("Lunch", 2_500))
        .await
        .unwrap();
    let b1 = engine
        .create_declaration(&bob, draft("Calendar", 500))
        .await
        .unwrap();

    engine
        .record_review(&reviewer, a1.id(), ReviewDecision::Approved, None)
        .await
        .unwrap();
    engine
        .record_review(&reviewer, b1.id(), ReviewDecision::RequestInfo, None)
        .await
        .unwrap();

    let mine = engine.list_mine(&alice).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|d| d.owner() == alice.id()));

    let stats = compute_stats(&mine);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.total_value, 4_000);

    // Approved records have left the queue; the oldest waiter leads.
    let pending = engine.list_pending_review(&reviewer, 10).await.unwrap();
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|d| !d.status().is_terminal()));

    let capped = engine.list_pending_review(&reviewer, 1).await.unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].id(), pending[0].id());
}
