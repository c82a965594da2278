pub mod ecdf;
pub mod markov;
pub mod mixture;
pub mod profile;

pub use ecdf::{build_ecdf, BucketKey, EcdfBucket, EcdfTable};
pub use markov::{ChainState, ErrorClass, TransitionTable};
pub use profile::{ErrorModel, ProfileBundle, ReadPlan};
