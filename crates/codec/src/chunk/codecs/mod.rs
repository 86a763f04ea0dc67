//! One codec per chunk type

mod basecalls;
mod clip;
mod comments;
mod confidence;
mod positions;
mod samples;

pub use basecalls::BasecallsChunk;
pub use clip::ClipChunk;
pub use comments::CommentsChunk;
pub use confidence::ConfidenceChunk;
pub use positions::PositionsChunk;
pub use samples::SamplesChunk;
