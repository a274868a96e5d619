//! Interfaces to the services the rule evaluator depends on but does not own:
//! background pixel sampling and banned-phrase matching.
pub mod matcher;
pub mod sampler;

pub use self::matcher::{LexicalMatcher, MatcherError, PhraseMatch, SemanticMatcher};
pub use self::sampler::{
    PixelSampler, RasterImage, RasterSampler, SampleCache, SamplerError, SolidBackground,
};
