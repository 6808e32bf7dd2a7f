/*!
 * AI-powered translation of chapter markup.
 *
 * The translation layer owns prompt construction, the bounded retry policy
 * and response extraction; the actual HTTP exchange lives behind the
 * provider trait in [`crate::providers`].
 */

pub mod core;

pub use self::core::{MAX_ATTEMPTS, TranslationClient};
