//! Member save and delete hooks.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::slug::{generate_slug, slugify};
use super::{
    CascadeOutcome, ForumDataStore, Member, MemberId, MemberStore, NotificationLevel,
    PROP_MEMBER_EMAIL, PROP_MEMBER_SLUG, UserNotifier,
};

/// Message shown to the user when a delete is vetoed.
const DELETE_BLOCKED_MESSAGE: &str = "Unable to delete member. Check the log for details.";

/// Outcome of processing a batch of saved members.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Members whose email and slug were written back.
    pub updated: Vec<MemberId>,
    /// Members whose schema has no email property.
    pub skipped: Vec<MemberId>,
    /// Members that failed; the rest of the batch was still processed.
    pub failed: Vec<MemberId>,
}

/// Verdict on a pending member deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteDecision {
    /// Dependent data was removed; the host may delete the members.
    Proceed,
    /// The whole delete operation must be cancelled.
    Cancelled {
        /// Member whose cascade failed, if one was reached.
        member: Option<MemberId>,
        reason: String,
    },
}

impl DeleteDecision {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Save and delete handlers for member records.
pub struct MemberLifecycleHooks {
    members: Arc<dyn MemberStore>,
    data: Arc<dyn ForumDataStore>,
    notifier: Arc<dyn UserNotifier>,
    /// Held from the slug lookup until the member is re-saved.
    slug_lock: Mutex<()>,
}

impl MemberLifecycleHooks {
    pub fn new(
        members: Arc<dyn MemberStore>,
        data: Arc<dyn ForumDataStore>,
        notifier: Arc<dyn UserNotifier>,
    ) -> Self {
        Self {
            members,
            data,
            notifier,
            slug_lock: Mutex::new(()),
        }
    }

    /// Normalize a batch of members that were just saved.
    ///
    /// For every member whose schema carries an email property: copy the
    /// canonical email into it, assign a collision-free slug, and re-save
    /// without raising events. A failure on one member is logged and does not
    /// stop the rest of the batch.
    pub async fn on_saved(&self, batch: &mut [Member]) -> SaveReport {
        let mut report = SaveReport::default();

        for member in batch.iter_mut() {
            if !member.has_property(PROP_MEMBER_EMAIL) {
                report.skipped.push(member.id);
                continue;
            }

            match self.normalize(member).await {
                Ok(()) => report.updated.push(member.id),
                Err(e) => {
                    warn!(member = %member.id, error = %e, "failed to normalize saved member");
                    report.failed.push(member.id);
                }
            }
        }

        debug!(
            updated = report.updated.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "member save batch processed"
        );

        report
    }

    async fn normalize(&self, member: &mut Member) -> Result<()> {
        let email = member.email.clone();
        member.set_property(PROP_MEMBER_EMAIL, email);

        let previous = member.slug().map(str::to_string);
        let candidate = slugify(&member.username);

        let _claim = self.slug_lock.lock().await;
        let similar = self
            .members
            .members_with_slug(&candidate)
            .await
            .context("failed to look up members with a similar slug")?;

        let taken = similar
            .iter()
            .filter(|(id, _)| *id != member.id)
            .map(|(_, slug)| slug.as_str());
        let slug = generate_slug(&candidate, taken, previous.as_deref());

        if previous.as_deref() != Some(slug.as_str()) {
            debug!(member = %member.id, slug = %slug, "assigning member slug");
        }
        member.set_property(PROP_MEMBER_SLUG, slug);

        self.members
            .save(member, false)
            .await
            .context("failed to re-save member")
    }

    /// Remove the forum data owned by members that are about to be deleted.
    ///
    /// The batch is processed in one unit of work. The first member whose data
    /// cannot be removed cancels the entire delete and rolls back everything
    /// staged so far. Unexpected faults also cancel: dependent data must never
    /// be orphaned.
    pub async fn on_deleting(&self, batch: &[Member]) -> DeleteDecision {
        if batch.is_empty() {
            return DeleteDecision::Proceed;
        }

        let mut uow = match self.data.begin().await {
            Ok(uow) => uow,
            Err(e) => {
                error!(error = %e, "failed to open unit of work for member delete");
                return self.cancel(None, format!("unable to open unit of work: {e}"));
            }
        };

        let mut blocked = None;
        for member in batch {
            match uow.delete_member_data(member.id).await {
                Ok(CascadeOutcome::Deleted) => {}
                Ok(CascadeOutcome::Blocked { reason }) => {
                    warn!(member = %member.id, reason = %reason, "member data cannot be deleted");
                    blocked = Some((member.id, reason));
                    break;
                }
                Err(e) => {
                    error!(member = %member.id, error = %e, "error attempting to delete member data");
                    blocked = Some((member.id, format!("unexpected error: {e}")));
                    break;
                }
            }
        }

        if let Some((member, reason)) = blocked {
            uow.rollback().await;
            return self.cancel(Some(member), reason);
        }

        if let Err(e) = uow.commit().await {
            error!(error = %e, "failed to commit member data deletion");
            return self.cancel(None, format!("commit failed: {e}"));
        }

        info!(members = batch.len(), "member forum data deleted");
        DeleteDecision::Proceed
    }

    fn cancel(&self, member: Option<MemberId>, reason: String) -> DeleteDecision {
        self.notifier
            .notify(NotificationLevel::Error, "Error", DELETE_BLOCKED_MESSAGE);
        DeleteDecision::Cancelled { member, reason }
    }
}
