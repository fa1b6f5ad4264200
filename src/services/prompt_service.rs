use crate::error::ValidationError;
use crate::i18n::{t, Phrase};
use crate::models::{AdjustmentSet, BodyPartCategory, GarmentSlot, ModelPhoto};
use gemini_client::Part;
use std::collections::BTreeMap;

/// Natural-language placement for one garment.
///
/// `"Place this item on the chest."`, then fit, fabric and notes clauses,
/// each only when set.
pub fn describe_slot(category: BodyPartCategory, adjustments: &AdjustmentSet) -> String {
    let mut text = format!("{} {}.", t(Phrase::PlaceItemOn), category.prompt_word());
    if let Some(fit) = adjustments.fit {
        text.push_str(&format!(" {} {}.", t(Phrase::FitPrompt), fit.prompt_word()));
    }
    if let Some(fabric) = adjustments.fabric {
        text.push_str(&format!(
            " {} {}.",
            t(Phrase::FabricPrompt),
            fabric.prompt_word()
        ));
    }
    if let Some(notes) = adjustments.notes() {
        text.push_str(&format!(" {} \"{}\".", t(Phrase::NotesPrompt), notes));
    }
    text
}

/// Builds the ordered parts of a look request:
/// model photo, styling instruction, then image + description per slot in
/// category order.
pub fn assemble(
    model_photo: Option<&ModelPhoto>,
    slots: &BTreeMap<BodyPartCategory, GarmentSlot>,
) -> Result<Vec<Part>, ValidationError> {
    let model_photo = model_photo.ok_or(ValidationError::NoModelPhoto)?;
    if slots.is_empty() {
        return Err(ValidationError::EmptyLook);
    }

    let mut parts = Vec::with_capacity(2 + slots.len() * 2);
    parts.push(Part::image(
        &model_photo.image.mime_type,
        &model_photo.image.bytes,
    ));
    parts.push(Part::text(t(Phrase::StylePrompt)));

    for category in BodyPartCategory::ALL {
        if let Some(slot) = slots.get(&category) {
            parts.push(Part::image(&slot.image.mime_type, &slot.image.bytes));
            parts.push(Part::text(describe_slot(category, &slot.adjustments)));
        }
    }

    log::debug!(
        "Assembled look prompt: {} garments, {} parts",
        slots.len(),
        parts.len()
    );
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EncodedImage, Fabric, Fit};
    use look_capture::Preview;

    fn model() -> ModelPhoto {
        ModelPhoto::new(EncodedImage::new(vec![0xAA], "image/jpeg"), None)
    }

    fn slot(category: BodyPartCategory, byte: u8) -> GarmentSlot {
        let preview = Preview {
            bytes: vec![],
            mime_type: "image/webp".to_string(),
            width: 1,
            height: 1,
        };
        GarmentSlot::new(category, EncodedImage::new(vec![byte], "image/png"), preview)
    }

    fn texts(parts: &[Part]) -> Vec<String> {
        parts.iter().filter_map(|p| p.text.clone()).collect()
    }

    #[test]
    fn test_fit_only_description() {
        let mut chest = slot(BodyPartCategory::Chest, 1);
        chest.adjustments.fit = Some(Fit::Regular);
        let slots = BTreeMap::from([(BodyPartCategory::Chest, chest)]);

        let parts = assemble(Some(&model()), &slots).unwrap();
        assert_eq!(parts.len(), 4);
        assert_eq!(
            parts[3].text.as_deref(),
            Some("Place this item on the chest. Make the fit regular.")
        );
    }

    #[test]
    fn test_all_clauses() {
        let adjustments = AdjustmentSet {
            fit: Some(Fit::Loose),
            fabric: Some(Fabric::Silk),
            notes: Some("  sleeves rolled up ".to_string()),
        };
        assert_eq!(
            describe_slot(BodyPartCategory::Shoulders, &adjustments),
            "Place this item on the shoulders. Make the fit loose. Render the fabric as silk. \
             Styling notes: \"sleeves rolled up\"."
        );
        assert_eq!(
            describe_slot(BodyPartCategory::Feet, &AdjustmentSet::default()),
            "Place this item on the feet."
        );
    }

    #[test]
    fn test_order_ignores_insertion_order() {
        let mut slots = BTreeMap::new();
        slots.insert(BodyPartCategory::Feet, slot(BodyPartCategory::Feet, 10));
        slots.insert(BodyPartCategory::Head, slot(BodyPartCategory::Head, 1));

        let parts = assemble(Some(&model()), &slots).unwrap();
        assert!(parts[0].has_inline_data());
        assert_eq!(parts[1].text.as_deref(), Some(t(Phrase::StylePrompt)));
        assert_eq!(parts[2].inline_data.as_ref().unwrap().decode().unwrap(), vec![1]);
        assert_eq!(
            parts[3].text.as_deref(),
            Some("Place this item on the head.")
        );
        assert_eq!(parts[4].inline_data.as_ref().unwrap().decode().unwrap(), vec![10]);
        assert_eq!(
            parts[5].text.as_deref(),
            Some("Place this item on the feet.")
        );

        let mut reversed = BTreeMap::new();
        reversed.insert(BodyPartCategory::Head, slot(BodyPartCategory::Head, 1));
        reversed.insert(BodyPartCategory::Feet, slot(BodyPartCategory::Feet, 10));
        assert_eq!(assemble(Some(&model()), &reversed).unwrap(), parts);
    }

    #[test]
    fn test_validation_precedes_work() {
        let slots = BTreeMap::from([(BodyPartCategory::Chest, slot(BodyPartCategory::Chest, 1))]);
        assert_eq!(
            assemble(None, &slots).unwrap_err(),
            ValidationError::NoModelPhoto
        );
        assert_eq!(
            assemble(Some(&model()), &BTreeMap::new()).unwrap_err(),
            ValidationError::EmptyLook
        );
        assert_eq!(
            assemble(None, &BTreeMap::new()).unwrap_err(),
            ValidationError::NoModelPhoto
        );
    }

    #[test]
    fn test_identical_slots_identical_text() {
        let slots = BTreeMap::from([
            (BodyPartCategory::Waist, slot(BodyPartCategory::Waist, 3)),
            (BodyPartCategory::Neck, slot(BodyPartCategory::Neck, 4)),
        ]);
        let a = texts(&assemble(Some(&model()), &slots).unwrap());
        let b = texts(&assemble(Some(&model()), &slots.clone()).unwrap());
        assert_eq!(a, b);
        assert_eq!(a[1], "Place this item on the neck.");
    }
}
