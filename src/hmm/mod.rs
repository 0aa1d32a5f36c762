pub mod baseline;
pub mod model;
pub mod tagger;
pub mod trainer;
pub mod trellis;
