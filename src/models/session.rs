use crate::error::ValidationError;
use crate::models::body_part::BodyPartCategory;
use crate::models::garment::{AdjustmentChange, AdjustmentSet, GarmentSlot};
use crate::models::look::{GenerationResult, ModelPhoto, VideoResult};
use std::collections::BTreeMap;

/// Long-running work that blocks other triggers while it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Image,
    Video,
}

/// Transient state of one styling session.
///
/// Any change to the model photo or the slot set clears the composite and the
/// video derived from it.
#[derive(Debug, Clone, Default)]
pub struct LookSession {
    model_photo: Option<ModelPhoto>,
    slots: BTreeMap<BodyPartCategory, GarmentSlot>,
    generation: Option<GenerationResult>,
    video: Option<VideoResult>,
    image_in_flight: bool,
    video_in_flight: bool,
}

impl LookSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_photo(&self) -> Option<&ModelPhoto> {
        self.model_photo.as_ref()
    }

    pub fn slots(&self) -> &BTreeMap<BodyPartCategory, GarmentSlot> {
        &self.slots
    }

    pub fn slot(&self, category: BodyPartCategory) -> Option<&GarmentSlot> {
        self.slots.get(&category)
    }

    pub fn generation(&self) -> Option<&GenerationResult> {
        self.generation.as_ref()
    }

    pub fn video(&self) -> Option<&VideoResult> {
        self.video.as_ref()
    }

    pub fn set_model_photo(&mut self, photo: ModelPhoto) {
        self.model_photo = Some(photo);
        self.clear_results();
    }

    /// Occupies the slot for the garment's category, replacing any previous one
    pub fn put_slot(&mut self, slot: GarmentSlot) -> Option<GarmentSlot> {
        let previous = self.slots.insert(slot.category, slot);
        self.clear_results();
        previous
    }

    /// Replaces the whole adjustment record of an occupied slot
    pub fn set_adjustments(
        &mut self,
        category: BodyPartCategory,
        adjustments: AdjustmentSet,
    ) -> Result<(), ValidationError> {
        adjustments.validate()?;
        let slot = self
            .slots
            .get_mut(&category)
            .ok_or(ValidationError::EmptySlot(category))?;
        if slot.adjustments != adjustments {
            slot.adjustments = adjustments;
            self.clear_results();
        }
        Ok(())
    }

    pub fn apply_change(
        &mut self,
        category: BodyPartCategory,
        change: AdjustmentChange,
    ) -> Result<(), ValidationError> {
        let next = self
            .slots
            .get(&category)
            .ok_or(ValidationError::EmptySlot(category))?
            .adjustments
            .with_change(change);
        self.set_adjustments(category, next)
    }

    /// Empties one slot; the others are left alone
    pub fn remove_slot(&mut self, category: BodyPartCategory) -> Option<GarmentSlot> {
        let removed = self.slots.remove(&category);
        if removed.is_some() {
            self.clear_results();
        }
        removed
    }

    pub fn is_busy(&self) -> bool {
        self.image_in_flight || self.video_in_flight
    }

    pub fn can_generate_look(&self) -> bool {
        self.model_photo.is_some() && !self.slots.is_empty() && !self.image_in_flight
    }

    pub fn can_generate_video(&self) -> bool {
        self.generation.is_some() && !self.is_busy()
    }

    /// Marks an activity as running. Images are blocked while an image is in
    /// flight; videos are blocked while anything is.
    pub fn begin(&mut self, activity: Activity) -> Result<(), ValidationError> {
        let blocked = match activity {
            Activity::Image => self.image_in_flight,
            Activity::Video => self.is_busy(),
        };
        if blocked {
            return Err(ValidationError::Busy);
        }
        match activity {
            Activity::Image => self.image_in_flight = true,
            Activity::Video => self.video_in_flight = true,
        }
        Ok(())
    }

    pub fn end(&mut self, activity: Activity) {
        match activity {
            Activity::Image => self.image_in_flight = false,
            Activity::Video => self.video_in_flight = false,
        }
    }

    /// Stores a new composite. The previous video no longer matches and is dropped.
    pub fn store_generation(&mut self, result: GenerationResult) {
        self.generation = Some(result);
        self.video = None;
    }

    /// Stores a video if it was made from the current composite
    pub fn store_video(&mut self, video: VideoResult) -> Result<(), ValidationError> {
        match &self.generation {
            Some(current) if current.id == video.source => {
                self.video = Some(video);
                Ok(())
            }
            _ => Err(ValidationError::StaleVideo),
        }
    }

    /// Takes over the person and composite produced by the lightning flow
    pub fn adopt_lightning(&mut self, person: ModelPhoto, composite: GenerationResult) {
        self.model_photo = Some(person);
        self.store_generation(composite);
    }

    /// Drops the composite and the video made from it
    pub fn clear_results(&mut self) {
        if self.generation.is_some() || self.video.is_some() {
            log::debug!("Look changed, dropping generated results");
        }
        self.generation = None;
        self.video = None;
    }
}
