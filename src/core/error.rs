use tracing::error;

use crate::{
    i18n::Lang,
    schema::common::{FailedEnvelope, FieldErrorResponse},
    validator::ValidationError,
};

/// Everything a controller action can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("email already registered")]
    Conflict,

    /// Refused with the given message key, e.g. invalid credentials.
    #[error("request rejected: {0}")]
    Rejected(&'static str),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ControllerError {
    /// Error of a `users` insert or update. The only unique key there is the
    /// email, so a unique violation is a `Conflict`.
    pub fn from_user_write(err: anyhow::Error) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict
        } else {
            Self::Unexpected(err)
        }
    }
}

/// SQLSTATE 23505 raised by the database.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|x| x.as_database_error())
        .is_some_and(|x| x.is_unique_violation())
}

impl From<sqlx::Error> for ControllerError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unexpected(err.into())
    }
}

/// Response enums able to carry the two failure statuses a controller uses.
pub trait FailureResponses: Sized {
    fn bad_request(body: FailedEnvelope) -> Self;
    fn not_found(body: FailedEnvelope) -> Self;
}

/// Build the failure response for a controller error.
///
/// `with_fields` puts the per-field validation errors into `data`.
/// Unexpected errors are logged with the route and action they came from.
pub fn render_failure<R: FailureResponses>(
    lang: &Lang<'_>,
    route: &str,
    action: &str,
    err: ControllerError,
    with_fields: bool,
) -> R {
    match err {
        ControllerError::Validation(err) => {
            let data = with_fields.then(|| FieldErrorResponse::from_validation(lang, &err));
            R::bad_request(lang.format(lang.validation_message(&err), lang.failed(), data))
        }
        ControllerError::NotFound(resource) => {
            R::not_found(lang.failure(lang.message_with("messages.errors.notFound", resource)))
        }
        ControllerError::Conflict => {
            R::bad_request(lang.failure(lang.message("messages.errors.exist")))
        }
        ControllerError::Rejected(key) => R::bad_request(lang.failure(lang.message(key))),
        ControllerError::Unexpected(err) => {
            error!("{} {}: {:?}", route, action, err);
            R::bad_request(lang.failure(lang.message("messages.errors.unexpected")))
        }
    }
}
