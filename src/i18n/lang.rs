use poem_openapi::types::{ParseFromJSON, ToJSON};

use crate::{
    schema::common::Envelope,
    validator::{FieldFailure, Rule, ValidationError},
};

use super::{catalog::Catalog, locale::Locale};

pub const SUCCESSFUL: &str = "messages.SUCCESSFUL";
pub const FAILED: &str = "messages.FAILED";

/// Message formatter bound to the locale resolved for one request.
#[derive(Clone, Debug)]
pub struct Lang<'a> {
    catalog: &'a Catalog,
    locale: Locale,
}

impl<'a> Lang<'a> {
    pub(super) fn new(catalog: &'a Catalog, locale: Locale) -> Self {
        Self { catalog, locale }
    }

    /// Plain lookup. An unknown key renders as the key itself.
    pub fn message(&self, key: &str) -> String {
        self.catalog
            .template(&self.locale, key)
            .unwrap_or(key)
            .to_string()
    }

    /// Lookup with `{item}` substituted. The item is localized through
    /// `resources.<item>` when the catalog knows it.
    pub fn message_with(&self, key: &str, item: &str) -> String {
        let item = self
            .catalog
            .template(&self.locale, &format!("resources.{}", item))
            .unwrap_or(item);
        capitalize(&self.message(key).replace("{item}", item))
    }

    pub fn successful(&self) -> String {
        self.message(SUCCESSFUL)
    }

    pub fn failed(&self) -> String {
        self.message(FAILED)
    }

    pub fn field_message(&self, failure: &FieldFailure) -> String {
        let field = self
            .catalog
            .template(&self.locale, &format!("fields.{}", failure.field))
            .unwrap_or(failure.field);
        let mut message = self
            .message(&format!("validation.{}", failure.rule.name()))
            .replace("{field}", field);
        match failure.rule {
            Rule::MinLength(min) => message = message.replace("{min}", &min.to_string()),
            Rule::MaxLength(max) => message = message.replace("{max}", &max.to_string()),
            _ => {}
        }
        message
    }

    /// Every failed field rendered as a sentence, in schema order.
    pub fn validation_message(&self, err: &ValidationError) -> String {
        if err.failures.is_empty() {
            return self.message("messages.errors.unexpected");
        }
        err.failures
            .iter()
            .map(|x| self.field_message(x))
            .collect::<Vec<String>>()
            .join(" ")
    }

    pub fn format<T: ParseFromJSON + ToJSON>(
        &self,
        message: String,
        status: String,
        data: Option<T>,
    ) -> Envelope<T> {
        Envelope {
            message,
            status,
            data,
        }
    }

    /// SUCCESSFUL envelope with a templated message.
    pub fn success<T: ParseFromJSON + ToJSON>(&self, key: &str, item: &str, data: T) -> Envelope<T> {
        self.format(self.message_with(key, item), self.successful(), Some(data))
    }

    /// FAILED envelope without data.
    pub fn failure<T: ParseFromJSON + ToJSON>(&self, message: String) -> Envelope<T> {
        self.format(message, self.failed(), None)
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
