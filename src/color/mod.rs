//! Color identity resolution across English, French and Arabic.

pub mod cache;
pub mod dictionary;
mod normalize;
mod resolver;

pub use cache::{EvictionPolicy, ResolutionCache};
pub use dictionary::BaseColor;
pub use normalize::normalize_phrase;
pub use resolver::{ColorResolver, ResolvedColor, DEFAULT_CACHE_CAPACITY};
