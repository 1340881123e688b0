use ::validator::Validate;
use serde_json::Value;

use super::{Fields, ValidationError, Validator};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RolePayload {
    pub name: String,
    pub active: bool,
    pub description: Option<String>,
}

#[derive(Validate)]
struct RoleRequest {
    #[validate(required, length(max = 255))]
    name: Option<String>,
    #[validate(required)]
    active: Option<bool>,
    description: Option<String>,
}

const ORDER: [&str; 3] = ["name", "active", "description"];

pub struct RoleValidator;

impl Validator for RoleValidator {
    type Output = RolePayload;

    fn validate(payload: &Value) -> Result<RolePayload, ValidationError> {
        let mut fields = Fields::new(payload);
        let req = RoleRequest {
            name: fields.string("name"),
            active: fields.boolean("active"),
            description: fields.string("description"),
        };
        fields.finish(&req, &ORDER)?;
        match (req.name, req.active) {
            (Some(name), Some(active)) => Ok(RolePayload {
                name,
                active,
                description: req.description,
            }),
            // finish() already reported the missing fields
            _ => Err(ValidationError { failures: vec![] }),
        }
    }
}
