use std::sync::Arc;

use configs::PetitionConfig;
use tracing::{debug, error, info, instrument, warn};

use super::domain::{Listing, SignatureForm, Submission};
use super::repository::SignatureRepository;
use super::{sanitize, validation};
use crate::errors::ServiceError;
use crate::pagination::{build_links, PageQuery, Pagination};

/// Petition business service independent of web framework.
///
/// Repository calls are the only suspension points; validation and both
/// sanitizing stages are synchronous.
pub struct PetitionService<R: SignatureRepository + ?Sized> {
    repo: Arc<R>,
    cfg: PetitionConfig,
    public_url: String,
}

impl<R: SignatureRepository + ?Sized> PetitionService<R> {
    pub fn new(repo: Arc<R>, cfg: PetitionConfig, public_url: impl Into<String>) -> Self {
        Self { repo, cfg, public_url: public_url.into() }
    }

    pub fn pagination(&self, query: &PageQuery) -> Pagination {
        Pagination::from_query(query, &self.cfg)
    }

    /// Count, fetch one page and build its navigation links.
    #[instrument(skip(self))]
    pub async fn listing(&self, page: Pagination) -> Result<Listing, ServiceError> {
        let counted = self.repo.count().await?;
        let signatures = self.repo.page(page.offset, page.limit).await?;
        let links = build_links(&self.public_url, page, signatures.len(), counted, self.cfg.cursor_step);
        debug!(counted, returned = signatures.len(), "listing_built");
        Ok(Listing { signatures, links, pagination: page, counted })
    }

    /// Run one submission through validate → filter → normalize → insert.
    ///
    /// Insert failures never escape: a duplicate or a storage fault both end in
    /// `Submission::AlreadySigned` after being logged. Only a failing read on
    /// the validation-error path returns `Err`.
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: SignatureForm) -> Result<Submission, ServiceError> {
        if let Err(errors) = validation::validate(&form) {
            debug!(errors = errors.len(), "submission_rejected");
            let listing = self.listing(Pagination::first(&self.cfg)).await?;
            return Ok(Submission::Rejected { form, errors, listing });
        }

        let filtered = sanitize::filter_form(&form);
        let new = sanitize::normalize(filtered);

        match self.repo.insert(new).await {
            Ok(created) => {
                info!(id = created.id, anonymous = created.anonymous, "signature_registered");
                Ok(Submission::Accepted(created))
            }
            Err(e @ ServiceError::Duplicate(_)) => {
                warn!(kind = e.kind(), "signature_insert_refused");
                Ok(Submission::AlreadySigned)
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "signature_insert_failed");
                Ok(Submission::AlreadySigned)
            }
        }
    }
}
