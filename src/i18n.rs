//! Phrase lookup for prompts, progress and error messages.
//!
//! English only: prompts sent to the models and messages shown to the user
//! share one locale, so there is no language selection.

/// Fixed phrases used in prompts, progress and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    StylePrompt,
    PlaceItemOn,
    FitPrompt,
    FabricPrompt,
    NotesPrompt,
    TheItemIs,
    IdentifyPrompt,
    VideoPrompt,
    VideoGenerated,
    ErrorNoModel,
    ErrorEmptyLook,
    ErrorNoGeneratedImage,
    ErrorImageGeneration,
    ErrorVideoGeneration,
    ErrorLightning,
    ErrorNoImageGenerated,
    ErrorIdentification,
    ErrorNoDownloadLink,
    ErrorDownloadVideo,
    ErrorApiKey,
    ErrorCamera,
    ErrorUpload,
    Cancelled,
}

pub fn t(phrase: Phrase) -> &'static str {
    match phrase {
        Phrase::StylePrompt => {
            "Create a photorealistic image of the person in the first image wearing the items \
             shown in the following images. Keep the person's face, body shape, pose and the \
             background unchanged."
        }
        Phrase::PlaceItemOn => "Place this item on the",
        Phrase::FitPrompt => "Make the fit",
        Phrase::FabricPrompt => "Render the fabric as",
        Phrase::NotesPrompt => "Styling notes:",
        Phrase::TheItemIs => "The item is",
        Phrase::IdentifyPrompt => {
            "Identify the product in this image. Return a short product name and the body part \
             it is worn on."
        }
        Phrase::VideoPrompt => {
            "The model walks a fashion runway wearing this outfit, turning slowly to show it from \
             every angle. Cinematic lighting, smooth camera movement."
        }
        Phrase::VideoGenerated => "Video generated!",
        Phrase::ErrorNoModel => "Please upload a model image first.",
        Phrase::ErrorEmptyLook => "Please add at least one product to generate a look.",
        Phrase::ErrorNoGeneratedImage => "Please generate an image first.",
        Phrase::ErrorImageGeneration => "Failed to generate image. Please try again.",
        Phrase::ErrorVideoGeneration => "Failed to generate video. Please try again.",
        Phrase::ErrorLightning => "Failed to generate look.",
        Phrase::ErrorNoImageGenerated => "The model did not return an image. Please try again.",
        Phrase::ErrorIdentification => "Could not identify the product. Please try again.",
        Phrase::ErrorNoDownloadLink => "Video generation finished without a download link.",
        Phrase::ErrorDownloadVideo => "Failed to download the generated video",
        Phrase::ErrorApiKey => "API Key error. Please re-select your API key.",
        Phrase::ErrorCamera => "Could not access camera. Please check permissions.",
        Phrase::ErrorUpload => "Could not read that image. Please try another photo.",
        Phrase::Cancelled => "Operation cancelled.",
    }
}
