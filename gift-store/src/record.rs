//! Declaration and review record types.

use chrono::{DateTime, NaiveDate, Utc};
use gift_primitives::{
    DeclarationId, DeclarationStatus, Direction, GiftType, PrincipalId, ReviewDecision, ReviewId,
};
use serde::{Deserialize, Serialize};

use crate::{StoreError, StoreResult};

fn validated(value: impl Into<String>, field: &'static str) -> StoreResult<String> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(StoreError::InvalidRecord(field));
    }
    Ok(value)
}

/// Validated input for a new declaration, before an owner or status exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationDraft {
    direction: Direction,
    gift_type: GiftType,
    description: String,
    estimated_value: u64,
    gift_date: NaiveDate,
    counterparty_name: String,
    counterparty_org: String,
    counterparty_relationship: String,
    justification: String,
}

impl DeclarationDraft {
    /// Creates a builder for a draft of the given direction and gift type.
    #[must_use]
    pub fn builder(direction: Direction, gift_type: GiftType) -> DeclarationDraftBuilder {
        DeclarationDraftBuilder {
            direction,
            gift_type,
            description: None,
            estimated_value: None,
            gift_date: None,
            counterparty_name: None,
            counterparty_org: None,
            counterparty_relationship: None,
            justification: None,
        }
    }
}

/// Builder assembling a [`DeclarationDraft`] with field-level validation.
#[derive(Debug)]
pub struct DeclarationDraftBuilder {
    direction: Direction,
    gift_type: GiftType,
    description: Option<String>,
    estimated_value: Option<u64>,
    gift_date: Option<NaiveDate>,
    counterparty_name: Option<String>,
    counterparty_org: Option<String>,
    counterparty_relationship: Option<String>,
    justification: Option<String>,
}

impl DeclarationDraftBuilder {
    /// Sets the gift description.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when the value is empty or
    /// whitespace.
    pub fn description(mut self, value: impl Into<String>) -> StoreResult<Self> {
        self.description = Some(validated(value, "description must not be empty")?);
        Ok(self)
    }

    /// Sets the estimated value in minor units of the ledger currency.
    #[must_use]
    pub fn estimated_value(mut self, value: u64) -> Self {
        self.estimated_value = Some(value);
        self
    }

    /// Sets the calendar date the gift changed hands.
    #[must_use]
    pub fn gift_date(mut self, value: NaiveDate) -> Self {
        self.gift_date = Some(value);
        self
    }

    /// Sets the counterparty's name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when the value is empty.
    pub fn counterparty_name(mut self, value: impl Into<String>) -> StoreResult<Self> {
        self.counterparty_name = Some(validated(value, "counterparty name must not be empty")?);
        Ok(self)
    }

    /// Sets the counterparty's organisation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when the value is empty.
    pub fn counterparty_org(mut self, value: impl Into<String>) -> StoreResult<Self> {
        self.counterparty_org = Some(validated(value, "counterparty org must not be empty")?);
        Ok(self)
    }

    /// Sets the relationship to the counterparty (supplier, client, ...).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when the value is empty.
    pub fn counterparty_relationship(mut self, value: impl Into<String>) -> StoreResult<Self> {
        self.counterparty_relationship = Some(validated(
            value,
            "counterparty relationship must not be empty",
        )?);
        Ok(self)
    }

    /// Sets the business justification for the gift.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when the value is empty.
    pub fn justification(mut self, value: impl Into<String>) -> StoreResult<Self> {
        self.justification = Some(validated(value, "justification must not be empty")?);
        Ok(self)
    }

    /// Finalises the builder.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when any required field is
    /// missing.
    pub fn build(self) -> StoreResult<DeclarationDraft> {
        Ok(DeclarationDraft {
            direction: self.direction,
            gift_type: self.gift_type,
            description: self
                .description
                .ok_or(StoreError::InvalidRecord("description is required"))?,
            estimated_value: self
                .estimated_value
                .ok_or(StoreError::InvalidRecord("estimated value is required"))?,
            gift_date: self
                .gift_date
                .ok_or(StoreError::InvalidRecord("gift date is required"))?,
            counterparty_name: self
                .counterparty_name
                .ok_or(StoreError::InvalidRecord("counterparty name is required"))?,
            counterparty_org: self
                .counterparty_org
                .ok_or(StoreError::InvalidRecord("counterparty org is required"))?,
            counterparty_relationship: self.counterparty_relationship.ok_or(
                StoreError::InvalidRecord("counterparty relationship is required"),
            )?,
            justification: self
                .justification
                .ok_or(StoreError::InvalidRecord("justification is required"))?,
        })
    }
}

/// A declared gift and its review status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    id: DeclarationId,
    owner: PrincipalId,
    direction: Direction,
    gift_type: GiftType,
    status: DeclarationStatus,
    description: String,
    estimated_value: u64,
    gift_date: NaiveDate,
    counterparty_name: String,
    counterparty_org: String,
    counterparty_relationship: String,
    justification: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

impl Declaration {
    /// Materialises a draft as a submitted declaration owned by `owner`.
    ///
    /// The creation path always submits directly; `Draft` remains
    /// representable for records migrated from elsewhere.
    #[must_use]
    pub fn from_draft(owner: PrincipalId, draft: DeclarationDraft) -> Self {
        let now = Utc::now();
        Self {
            id: DeclarationId::random(),
            owner,
            direction: draft.direction,
            gift_type: draft.gift_type,
            status: DeclarationStatus::Submitted,
            description: draft.description,
            estimated_value: draft.estimated_value,
            gift_date: draft.gift_date,
            counterparty_name: draft.counterparty_name,
            counterparty_org: draft.counterparty_org,
            counterparty_relationship: draft.counterparty_relationship,
            justification: draft.justification,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Returns the declaration identifier.
    #[must_use]
    pub const fn id(&self) -> DeclarationId {
        self.id
    }

    /// Returns the owning principal. Set once at creation, never changed.
    #[must_use]
    pub const fn owner(&self) -> PrincipalId {
        self.owner
    }

    /// Returns whether the gift was received or issued.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the gift classification.
    #[must_use]
    pub const fn gift_type(&self) -> GiftType {
        self.gift_type
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> DeclarationStatus {
        self.status
    }

    /// Returns the gift description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the estimated value in minor currency units.
    #[must_use]
    pub const fn estimated_value(&self) -> u64 {
        self.estimated_value
    }

    /// Returns the date the gift changed hands.
    #[must_use]
    pub const fn gift_date(&self) -> NaiveDate {
        self.gift_date
    }

    /// Returns the counterparty's name.
    #[must_use]
    pub fn counterparty_name(&self) -> &str {
        &self.counterparty_name
    }

    /// Returns the counterparty's organisation.
    #[must_use]
    pub fn counterparty_org(&self) -> &str {
        &self.counterparty_org
    }

    /// Returns the relationship to the counterparty.
    #[must_use]
    pub fn counterparty_relationship(&self) -> &str {
        &self.counterparty_relationship
    }

    /// Returns the business justification.
    #[must_use]
    pub fn justification(&self) -> &str {
        &self.justification
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic-concurrency revision counter.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies a content patch, validating each supplied field.
    ///
    /// Status and ownership are not patchable through this path by
    /// construction: the patch type carries neither.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when a supplied text field is
    /// empty or the patch contains nothing to apply.
    pub fn apply_patch(&mut self, patch: DeclarationPatch) -> StoreResult<()> {
        if patch.is_empty() {
            return Err(StoreError::InvalidRecord("patch contains no fields"));
        }
        if let Some(direction) = patch.direction {
            self.direction = direction;
        }
        if let Some(gift_type) = patch.gift_type {
            self.gift_type = gift_type;
        }
        if let Some(description) = patch.description {
            self.description = validated(description, "description must not be empty")?;
        }
        if let Some(estimated_value) = patch.estimated_value {
            self.estimated_value = estimated_value;
        }
        if let Some(gift_date) = patch.gift_date {
            self.gift_date = gift_date;
        }
        if let Some(name) = patch.counterparty_name {
            self.counterparty_name = validated(name, "counterparty name must not be empty")?;
        }
        if let Some(org) = patch.counterparty_org {
            self.counterparty_org = validated(org, "counterparty org must not be empty")?;
        }
        if let Some(relationship) = patch.counterparty_relationship {
            self.counterparty_relationship =
                validated(relationship, "counterparty relationship must not be empty")?;
        }
        if let Some(justification) = patch.justification {
            self.justification = validated(justification, "justification must not be empty")?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: DeclarationStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }
}

/// Partial update to a declaration's content fields.
///
/// Deliberately carries neither `status` nor `owner`: status moves only
/// through the workflow engine and ownership is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationPatch {
    /// New direction, when changing.
    pub direction: Option<Direction>,
    /// New gift classification, when changing.
    pub gift_type: Option<GiftType>,
    /// New description, when changing.
    pub description: Option<String>,
    /// New estimated value, when changing.
    pub estimated_value: Option<u64>,
    /// New gift date, when changing.
    pub gift_date: Option<NaiveDate>,
    /// New counterparty name, when changing.
    pub counterparty_name: Option<String>,
    /// New counterparty organisation, when changing.
    pub counterparty_org: Option<String>,
    /// New counterparty relationship, when changing.
    pub counterparty_relationship: Option<String>,
    /// New justification, when changing.
    pub justification: Option<String>,
}

impl DeclarationPatch {
    /// Returns `true` when the patch carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.direction.is_none()
            && self.gift_type.is_none()
            && self.description.is_none()
            && self.estimated_value.is_none()
            && self.gift_date.is_none()
            && self.counterparty_name.is_none()
            && self.counterparty_org.is_none()
            && self.counterparty_relationship.is_none()
            && self.justification.is_none()
    }
}

/// A recorded compliance decision against one declaration.
///
/// Reviews are immutable once created; there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    declaration_id: DeclarationId,
    decision: ReviewDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    reviewer: PrincipalId,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review bound to the given declaration and reviewer.
    #[must_use]
    pub fn new(
        declaration_id: DeclarationId,
        reviewer: PrincipalId,
        decision: ReviewDecision,
    ) -> Self {
        Self {
            id: ReviewId::random(),
            declaration_id,
            decision,
            comment: None,
            reviewer,
            created_at: Utc::now(),
        }
    }

    /// Attaches an optional comment; blank comments are dropped.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = if comment.trim().is_empty() {
            None
        } else {
            Some(comment)
        };
        self
    }

    /// Returns the review identifier.
    #[must_use]
    pub const fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the declaration this review is bound to.
    #[must_use]
    pub const fn declaration_id(&self) -> DeclarationId {
        self.declaration_id
    }

    /// Returns the recorded decision.
    #[must_use]
    pub const fn decision(&self) -> ReviewDecision {
        self.decision
    }

    /// Returns the optional reviewer comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns the principal that recorded the decision.
    #[must_use]
    pub const fn reviewer(&self) -> PrincipalId {
        self.reviewer
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 12).unwrap()
    }

    fn draft() -> DeclarationDraft {
        DeclarationDraft::builder(Direction::Received, GiftType::Physical)
            .description("Bottle of wine")
            .unwrap()
            .estimated_value(4500)
            .gift_date(date())
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

    #[test]
    fn builder_rejects_blank_fields() {
        let err = DeclarationDraft::builder(Direction::Received, GiftType::Cash)
            .description("  ")
            .expect_err("blank description");
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }

    #[test]
    fn builder_requires_all_fields() {
        let err = DeclarationDraft::builder(Direction::Issued, GiftType::InKind)
            .description("Dinner")
            .unwrap()
            .build()
            .expect_err("missing fields");
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }

    #[test]
    fn draft_materialises_as_submitted() {
        let owner = PrincipalId::random();
        let declaration = Declaration::from_draft(owner, draft());

        assert_eq!(declaration.owner(), owner);
        assert_eq!(declaration.status(), DeclarationStatus::Submitted);
        assert_eq!(declaration.estimated_value(), 4500);
        assert_eq!(declaration.revision(), 0);
        assert_eq!(declaration.description(), "Bottle of wine");
    }

    #[test]
    fn patch_updates_content_only() {
        let mut declaration = Declaration::from_draft(PrincipalId::random(), draft());
        let patch = DeclarationPatch {
            description: Some("Two bottles of wine".into()),
            estimated_value: Some(9000),
            ..DeclarationPatch::default()
        };

        declaration.apply_patch(patch).unwrap();
        assert_eq!(declaration.description(), "Two bottles of wine");
        assert_eq!(declaration.estimated_value(), 9000);
        assert_eq!(declaration.status(), DeclarationStatus::Submitted);
    }

    #[test]
    fn patch_rejects_blank_and_empty() {
        let mut declaration = Declaration::from_draft(PrincipalId::random(), draft());

        let err = declaration
            .apply_patch(DeclarationPatch::default())
            .expect_err("empty patch");
        assert!(matches!(err, StoreError::InvalidRecord(_)));

        let err = declaration
            .apply_patch(DeclarationPatch {
                justification: Some("   ".into()),
                ..DeclarationPatch::default()
            })
            .expect_err("blank justification");
        assert!(matches!(err, StoreError::InvalidRecord(_)));
    }

    #[test]
    fn review_drops_blank_comments() {
        let review = Review::new(
            DeclarationId::random(),
            PrincipalId::random(),
            ReviewDecision::Approved,
        )
        .with_comment("  ");
        assert_eq!(review.comment(), None);

        let review = Review::new(
            DeclarationId::random(),
            PrincipalId::random(),
            ReviewDecision::RequestInfo,
        )
        .with_comment("need a receipt");
        assert_eq!(review.comment(), Some("need a receipt"));
    }
}
