//! Custom request extractors.

mod language;
mod validated_form;

pub use language::CurrentLanguage;
pub(crate) use language::negotiated_language;
pub use validated_form::ValidatedForm;
