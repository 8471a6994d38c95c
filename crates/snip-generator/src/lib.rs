//! Short code generators.
//!
//! Generators are pure: they never talk to storage and do not promise
//! uniqueness. Collision handling belongs to the caller.

pub mod error;
pub mod random;
pub mod seq;

pub use error::GeneratorError;
pub use random::RandomGenerator;
pub use seq::SequenceGenerator;

use snip_core::ShortCode;

/// Trait for generating candidate short codes.
///
/// Implementations can vary from simple random generators to scripted
/// sequences used to exercise collision handling.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate code.
    fn generate(&self) -> ShortCode;
}

impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    fn generate(&self) -> ShortCode {
        (**self).generate()
    }
}
