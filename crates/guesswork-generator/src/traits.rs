//! The core `Generator` trait.

use guesswork_core::{Value, DEFAULT_ANY_DEPTH};
use rand_chacha::ChaCha8Rng;

/// Default recursion budget passed to top-level `generate` calls.
///
/// Only wildcard generators consume the budget; it exists to bound how deep
/// freshly sampled shapes may nest even when wildcards appear inside
/// explicit containers.
pub const DEFAULT_RECURSION_BUDGET: u32 = DEFAULT_ANY_DEPTH;

/// A value synthesizer bound to one type shape.
///
/// A generator is a pure function of the random source and the recursion
/// budget: it holds no mutable state across calls, so one instance is
/// constructed per parameter and reused for every attempt. Given well-formed
/// construction parameters (enforced by the checked constructors and the
/// factory), `generate` never fails.
///
/// # Determinism
///
/// All randomness is drawn from the caller-supplied [`ChaCha8Rng`], so runs
/// are reproducible by seeding the random source.
pub trait Generator: Send + Sync {
    /// Generate one value.
    ///
    /// `budget` bounds the nesting depth of any shape sampled on the fly;
    /// composite generators pass a decremented budget to their children.
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value;

    /// Canonical textual rendering of the shape this generator produces.
    ///
    /// Matches [`guesswork_core::TypeDescriptor::describe`] for generators
    /// built from a descriptor.
    fn describe(&self) -> String;
}

/// A boxed generator, the form composite generators hold children in.
pub type BoxedGenerator = Box<dyn Generator>;

impl Generator for BoxedGenerator {
    fn generate(&self, rng: &mut ChaCha8Rng, budget: u32) -> Value {
        self.as_ref().generate(rng, budget)
    }

    fn describe(&self) -> String {
        self.as_ref().describe()
    }
}
