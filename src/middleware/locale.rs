use std::sync::Arc;

use poem::{
    error::ReadBodyError,
    http::{header::ACCEPT_LANGUAGE, StatusCode},
    Endpoint, IntoResponse, Middleware, Request, Response, Result,
};
use poem_openapi::payload::Json;
use serde::Deserialize;
use tracing::debug;

use crate::{
    i18n::{resolve_locale, Catalog, Lang},
    schema::common::FailedEnvelope,
};

/// Largest JSON body read while looking for `lang`.
const LANG_BODY_LIMIT: usize = 64 * 1024;

#[derive(Deserialize, Default)]
struct LangField {
    lang: Option<String>,
}

/// Resolves the request locale before dispatch.
///
/// On success the `Locale` is put into the request extensions, so handlers can
/// take it as `Data<&Locale>`. Without a supported locale the request ends
/// with 400. Framework errors raised behind it (unmatched route, unreadable
/// body) are rendered as localized envelopes too.
#[derive(Clone)]
pub struct DetectUserLocale {
    catalog: Arc<Catalog>,
}

impl DetectUserLocale {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

impl<E: Endpoint> Middleware<E> for DetectUserLocale {
    type Output = DetectUserLocaleEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        DetectUserLocaleEndpoint {
            inner: ep,
            catalog: self.catalog.clone(),
        }
    }
}

pub struct DetectUserLocaleEndpoint<E> {
    inner: E,
    catalog: Arc<Catalog>,
}

impl<E: Endpoint> DetectUserLocaleEndpoint<E> {
    /// `lang` from the query string, else from a JSON body of at most
    /// `LANG_BODY_LIMIT` bytes. The body is put back so the handler can
    /// still read it.
    async fn explicit_lang(&self, req: &mut Request) -> Result<Option<String>> {
        if let Some(lang) = req.params::<LangField>().ok().and_then(|x| x.lang) {
            return Ok(Some(lang));
        }
        let is_json = req
            .content_type()
            .map(|x| x.contains("json"))
            .unwrap_or(false);
        if !is_json {
            return Ok(None);
        }
        let body = match req.take_body().into_bytes_limit(LANG_BODY_LIMIT).await {
            Ok(body) => body,
            // without a locale the request is rejected, the body is not needed
            Err(ReadBodyError::PayloadTooLarge) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let field = serde_json::from_slice::<LangField>(&body).unwrap_or_default();
        req.set_body(body);
        Ok(field.lang)
    }
}

impl<E: Endpoint> Endpoint for DetectUserLocaleEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        let accept_language = req
            .headers()
            .get(ACCEPT_LANGUAGE)
            .and_then(|x| x.to_str().ok())
            .map(str::to_string);
        let supported = self.catalog.supported_locales();
        let mut locale = resolve_locale(accept_language.as_deref(), None, supported);
        if locale.is_none() {
            let explicit = self.explicit_lang(&mut req).await?;
            locale = resolve_locale(None, explicit.as_deref(), supported);
        }

        let Some(locale) = locale else {
            debug!(
                "reject {} {}: no supported locale (accept-language: {:?})",
                req.method(),
                req.uri().path(),
                accept_language
            );
            let lang = self.catalog.default_lang();
            return Ok(envelope_response(
                &lang,
                "messages.errors.lang",
                StatusCode::BAD_REQUEST,
            ));
        };

        let lang = self.catalog.lang(locale.clone());
        req.extensions_mut().insert(locale);
        match self.inner.call(req).await {
            Ok(resp) => Ok(resp.into_response()),
            Err(err) if err.status() == StatusCode::NOT_FOUND => Ok(envelope_response(
                &lang,
                "messages.errors.route.notFound",
                StatusCode::NOT_FOUND,
            )),
            Err(err) => {
                debug!("request error: {}", err);
                Ok(envelope_response(
                    &lang,
                    "messages.errors.request",
                    err.status(),
                ))
            }
        }
    }
}

fn envelope_response(lang: &Lang<'_>, key: &str, status: StatusCode) -> Response {
    let body: FailedEnvelope = lang.failure(lang.message(key));
    Json(body).with_status(status).into_response()
}
