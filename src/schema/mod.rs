/// Implements `FailureResponses` for response enums that carry
/// `BadRequest(Json<FailedEnvelope>)` and `NotFound(Json<FailedEnvelope>)`.
macro_rules! impl_failure_responses {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::core::error::FailureResponses for $ty {
                fn bad_request(body: $crate::schema::common::FailedEnvelope) -> Self {
                    Self::BadRequest(poem_openapi::payload::Json(body))
                }

                fn not_found(body: $crate::schema::common::FailedEnvelope) -> Self {
                    Self::NotFound(poem_openapi::payload::Json(body))
                }
            }
        )+
    };
}

pub mod auth;
pub mod common;
pub mod role;
pub mod user;
