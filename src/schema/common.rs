use poem_openapi::{
    types::{ParseFromJSON, ToJSON},
    Object,
};
use serde::{Deserialize, Serialize};

use crate::{i18n::Lang, validator::ValidationError};

/// Body of every response behind the locale middleware.
#[derive(Object, Debug, Clone, PartialEq)]
pub struct Envelope<T: ParseFromJSON + ToJSON> {
    pub message: String,
    pub status: String,
    pub data: Option<T>,
}

/// One failed rule of one field, with its localized sentence.
#[derive(Object, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FieldErrorResponse {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl FieldErrorResponse {
    pub fn from_validation(lang: &Lang<'_>, err: &ValidationError) -> Vec<Self> {
        err.failures
            .iter()
            .map(|x| Self {
                field: x.field.to_string(),
                rule: x.rule.name().to_string(),
                message: lang.field_message(x),
            })
            .collect()
    }
}

pub type FailedEnvelope = Envelope<Vec<FieldErrorResponse>>;

#[derive(Object, Deserialize, Serialize, Debug)]
pub struct ServerStatusResponse {
    #[oai(rename = "SERVER")]
    #[serde(rename = "SERVER")]
    pub server: String,
}
