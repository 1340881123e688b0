//! Response localization.
//!
//! - `catalog`: immutable per-locale message tables, loaded once at startup
//! - `locale`: negotiation of the request locale from `Accept-Language` / `lang`
//! - `lang`: formatter bound to one resolved locale, builds response envelopes

mod catalog;
mod lang;
mod locale;

pub use catalog::Catalog;
pub use lang::Lang;
pub use locale::{negotiate_accept_language, resolve_locale, Locale};
