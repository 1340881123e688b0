use ::validator::Validate;
use serde_json::Value;

use super::{Fields, ValidationError, Validator};

/// Also the `length(min)` of the password rules below.
pub const PASSWORD_MIN_LENGTH: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfilePayload {
    pub name: String,
    pub lastname: String,
    pub phone: String,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterPayload {
    pub role_id: i32,
    pub email: String,
    pub password: String,
    pub active: bool,
    pub profile: ProfilePayload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatePayload {
    pub role_id: i32,
    pub email: String,
    pub password: Option<String>,
    pub active: bool,
    pub profile: ProfilePayload,
}

/// Payload for `POST /users`.
pub struct RegisterValidator;

/// Payload for `PUT /users/:id`, password is optional.
pub struct UpdateValidator;

// Limits follow the `users` and `profiles` columns.
#[derive(Validate)]
struct RegisterRequest {
    #[validate(required)]
    role_id: Option<i32>,
    #[validate(required, email, length(max = 255))]
    email: Option<String>,
    #[validate(required, length(min = 6))]
    password: Option<String>,
    #[validate(required)]
    active: Option<bool>,
    #[validate(required, length(max = 255))]
    name: Option<String>,
    #[validate(required, length(max = 255))]
    lastname: Option<String>,
    #[validate(required, length(max = 50))]
    phone: Option<String>,
    #[validate(required)]
    address: Option<String>,
}

#[derive(Validate)]
struct UpdateRequest {
    #[validate(required)]
    role_id: Option<i32>,
    #[validate(required, email, length(max = 255))]
    email: Option<String>,
    #[validate(length(min = 6))]
    password: Option<String>,
    #[validate(required)]
    active: Option<bool>,
    #[validate(required, length(max = 255))]
    name: Option<String>,
    #[validate(required, length(max = 255))]
    lastname: Option<String>,
    #[validate(required, length(max = 50))]
    phone: Option<String>,
    #[validate(required)]
    address: Option<String>,
}

const ORDER: [&str; 8] = [
    "role_id", "email", "password", "active", "name", "lastname", "phone", "address",
];

struct UserFields {
    role_id: i32,
    email: String,
    password: Option<String>,
    active: bool,
    profile: ProfilePayload,
}

#[allow(clippy::too_many_arguments)]
fn collect(
    role_id: Option<i32>,
    email: Option<String>,
    password: Option<String>,
    active: Option<bool>,
    name: Option<String>,
    lastname: Option<String>,
    phone: Option<String>,
    address: Option<String>,
) -> Result<UserFields, ValidationError> {
    match (role_id, email, active, name, lastname, phone, address) {
        (
            Some(role_id),
            Some(email),
            Some(active),
            Some(name),
            Some(lastname),
            Some(phone),
            Some(address),
        ) => Ok(UserFields {
            role_id,
            email,
            password,
            active,
            profile: ProfilePayload {
                name,
                lastname,
                phone,
                address,
            },
        }),
        // finish() already reported the missing fields
        _ => Err(ValidationError { failures: vec![] }),
    }
}

impl Validator for RegisterValidator {
    type Output = RegisterPayload;

    fn validate(payload: &Value) -> Result<RegisterPayload, ValidationError> {
        let mut fields = Fields::new(payload);
        let req = RegisterRequest {
            role_id: fields.number("role_id"),
            email: fields.string("email"),
            password: fields.string("password"),
            active: fields.boolean("active"),
            name: fields.string("name"),
            lastname: fields.string("lastname"),
            phone: fields.string("phone"),
            address: fields.string("address"),
        };
        fields.finish(&req, &ORDER)?;
        let user = collect(
            req.role_id,
            req.email,
            req.password,
            req.active,
            req.name,
            req.lastname,
            req.phone,
            req.address,
        )?;
        match user.password {
            Some(password) => Ok(RegisterPayload {
                role_id: user.role_id,
                email: user.email,
                password,
                active: user.active,
                profile: user.profile,
            }),
            None => Err(ValidationError { failures: vec![] }),
        }
    }
}

impl Validator for UpdateValidator {
    type Output = UpdatePayload;

    fn validate(payload: &Value) -> Result<UpdatePayload, ValidationError> {
        let mut fields = Fields::new(payload);
        let req = UpdateRequest {
            role_id: fields.number("role_id"),
            email: fields.string("email"),
            password: fields.string("password"),
            active: fields.boolean("active"),
            name: fields.string("name"),
            lastname: fields.string("lastname"),
            phone: fields.string("phone"),
            address: fields.string("address"),
        };
        fields.finish(&req, &ORDER)?;
        let user = collect(
            req.role_id,
            req.email,
            req.password,
            req.active,
            req.name,
            req.lastname,
            req.phone,
            req.address,
        )?;
        Ok(UpdatePayload {
            role_id: user.role_id,
            email: user.email,
            password: user.password,
            active: user.active,
            profile: user.profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::validator::{FieldFailure, Rule};

    fn valid_payload() -> Value {
        json!({
            "role_id": 1,
            "email": "jane@mail.com",
            "password": "secret123",
            "active": true,
            "name": "Jane",
            "lastname": "Doe",
            "phone": "555-0101",
            "address": "Main street 1"
        })
    }

    #[test]
    fn register_accepts_valid_payload() {
        let res = RegisterValidator::validate(&valid_payload()).unwrap();
        assert_eq!(res.role_id, 1);
        assert_eq!(res.email, "jane@mail.com");
        assert_eq!(res.password, "secret123");
        assert_eq!(res.profile.lastname, "Doe");
    }

    #[test]
    fn register_requires_password() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("password");
        let err = RegisterValidator::validate(&payload).unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].field, "password");
        assert_eq!(err.failures[0].rule, Rule::Required);
    }

    #[test]
    fn update_allows_missing_password() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("password");
        let res = UpdateValidator::validate(&payload).unwrap();
        assert_eq!(res.password, None);
    }

    #[test]
    fn update_still_checks_password_length() {
        let mut payload = valid_payload();
        payload["password"] = json!("abc");
        let err = UpdateValidator::validate(&payload).unwrap_err();
        assert_eq!(err.failures[0].rule, Rule::MinLength(PASSWORD_MIN_LENGTH));
    }

    #[test]
    fn reports_fields_in_schema_order() {
        let payload = json!({"role_id": "x", "email": "bad", "active": true});
        let err = RegisterValidator::validate(&payload).unwrap_err();
        let fields: Vec<&str> = err.failures.iter().map(|x| x.field).collect();
        assert_eq!(
            fields,
            vec!["role_id", "email", "password", "name", "lastname", "phone", "address"]
        );
    }

    #[test]
    fn rejects_values_longer_than_their_columns() {
        let mut payload = valid_payload();
        payload["phone"] = json!("5".repeat(51));
        payload["lastname"] = json!("d".repeat(256));
        let err = RegisterValidator::validate(&payload).unwrap_err();
        assert_eq!(
            err.failures,
            vec![
                FieldFailure {
                    field: "lastname",
                    rule: Rule::MaxLength(255)
                },
                FieldFailure {
                    field: "phone",
                    rule: Rule::MaxLength(50)
                },
            ]
        );

        payload["phone"] = json!("5".repeat(50));
        payload["lastname"] = json!("d".repeat(255));
        assert!(UpdateValidator::validate(&payload).is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        let mut payload = valid_payload();
        payload["email"] = json!("jane.mail.com");
        let err = UpdateValidator::validate(&payload).unwrap_err();
        assert_eq!(
            err.failures,
            vec![FieldFailure {
                field: "email",
                rule: Rule::Email
            }]
        );
    }
}
