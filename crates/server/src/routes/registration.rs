use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use tracing::info;

use service::pagination::PageQuery;
use service::signature::domain::{SignatureForm, Submission, ALREADY_SIGNED_TEXT, ALREADY_SIGNED_TITLE};

use crate::{errors::AppError, state::ServerState, views::{self, IndexView}};

/// `GET /`: one page of signatures with a blank form.
///
/// A query string that does not deserialize (duplicate keys and the like)
/// counts as absent, so the listing falls back to the default page.
pub async fn index(
    State(state): State<ServerState>,
    query: Option<Query<PageQuery>>,
) -> Result<Html<String>, AppError> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let page = state.petition.pagination(&query);
    let listing = state.petition.listing(page).await?;
    Ok(views::index(&IndexView {
        errors: &[],
        form: &SignatureForm::default(),
        listing: &listing,
    }))
}

/// `POST /`: run the submission pipeline and pick the response for its outcome.
pub async fn register(
    State(state): State<ServerState>,
    Form(form): Form<SignatureForm>,
) -> Result<Response, AppError> {
    let response = match state.petition.submit(form).await? {
        Submission::Accepted(created) => {
            info!(id = created.id, "redirect_after_signing");
            Redirect::to("/").into_response()
        }
        Submission::Rejected { form, errors, listing } => views::index(&IndexView {
            errors: &errors,
            form: &form,
            listing: &listing,
        })
        .into_response(),
        Submission::AlreadySigned => views::error_page(ALREADY_SIGNED_TITLE, ALREADY_SIGNED_TEXT).into_response(),
    };
    Ok(response)
}
