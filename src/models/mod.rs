pub mod body_part;
pub mod garment;
pub mod look;
pub mod session;

pub use body_part::BodyPartCategory;
pub use garment::{AdjustmentChange, AdjustmentSet, Fabric, Fit, GarmentSlot};
pub use look::{EncodedImage, GenerationResult, IdentificationResult, ModelPhoto, VideoResult};
pub use session::{Activity, LookSession};
