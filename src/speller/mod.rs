//! Spelling correction for encyclopedia queries.
//!
//! * [`SpellChecker`] — async trait over an external spell-checking service.
//! * [`YandexSpeller`] — Yandex Speller `checkText` JSON client.
//! * [`SpellCorrector`] — decides whether a query is already valid or which
//!   rewrite to try instead.
//! * [`SpellError`] — error variants for spell-check calls.

pub mod corrector;
pub mod yandex;

pub use corrector::{Correction, SpellChecker, SpellCorrector, SpellError, WordCheck};
pub use yandex::{Misspelling, YandexSpeller};
