mod moments;
mod centroid_extractor;

pub use self::{moments::*, centroid_extractor::*};
