//! Ordered, user-authored emotions and the frames captured into them.
//!
//! The model holds only names and captured frames. Views that present an emotion keep their own
//! mapping from [`EmotionHandle`] to whatever element they render.

use crate::{
    foundation::error::{RigError, RigResult},
    selection::PortraitSelection,
};

/// One pose of an emotion: the face and mouth layer paths, catalog-relative.
///
/// An empty string means "no layer" for that slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub face: String,
    pub mouth: String,
}

impl Frame {
    pub fn new(face: impl Into<String>, mouth: impl Into<String>) -> Self {
        Self {
            face: face.into(),
            mouth: mouth.into(),
        }
    }
}

/// Which of the two frames of an emotion to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameSlot {
    /// Eyes open, mouth closed. The rest pose.
    Closed,
    /// Eyes closed, mouth open.
    Open,
}

impl FrameSlot {
    pub fn index(self) -> usize {
        match self {
            FrameSlot::Closed => 0,
            FrameSlot::Open => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrameSlot::Closed => "Eye Open, Mouth Closed",
            FrameSlot::Open => "Eye Closed, Mouth Open",
        }
    }
}

impl TryFrom<usize> for FrameSlot {
    type Error = RigError;

    fn try_from(value: usize) -> RigResult<Self> {
        match value {
            0 => Ok(FrameSlot::Closed),
            1 => Ok(FrameSlot::Open),
            other => Err(RigError::validation(format!(
                "frame index must be 0 or 1, got {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Emotion {
    /// Raw display name as typed; sanitized only when a script is generated.
    pub name: String,
    pub frames: [Frame; 2],
    /// Catalog id of the character active at the most recent capture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_for: Option<String>,
}

impl Emotion {
    pub fn frame(&self, slot: FrameSlot) -> &Frame {
        &self.frames[slot.index()]
    }
}

/// Positional handle into an [`EmotionModel`].
///
/// Removal is stack-only, so a handle stays valid for as long as its emotion exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmotionHandle(pub usize);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmotionModel {
    emotions: Vec<Emotion>,
}

impl EmotionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_emotions(emotions: Vec<Emotion>) -> Self {
        Self { emotions }
    }

    /// Append an emotion named `undefined_<N>` (N = count before insertion) with two empty frames.
    pub fn add_emotion(&mut self) -> EmotionHandle {
        let handle = EmotionHandle(self.emotions.len());
        self.emotions.push(Emotion {
            name: format!("undefined_{}", handle.0),
            frames: [Frame::default(), Frame::default()],
            captured_for: None,
        });
        tracing::debug!(index = handle.0, "added emotion");
        handle
    }

    /// Overwrite one frame with a copy of the selection's face and mouth.
    ///
    /// Empty selections are legal and produce empty frame fields. `captured_for` only ever moves
    /// from one character to another, never back to `None`.
    pub fn capture_frame(
        &mut self,
        handle: EmotionHandle,
        slot: FrameSlot,
        selection: &PortraitSelection,
    ) -> RigResult<()> {
        let emotion = self.get_mut(handle)?;
        emotion.frames[slot.index()] = Frame {
            face: selection.face_path.clone(),
            mouth: selection.mouth_path.clone(),
        };
        // A capture with no active character keeps the last known owner.
        if let Some(id) = &selection.character_id {
            emotion.captured_for = Some(id.clone());
        }
        tracing::debug!(
            index = handle.0,
            frame = slot.index(),
            face = %selection.face_path,
            mouth = %selection.mouth_path,
            "captured frame"
        );
        Ok(())
    }

    /// Store the display name verbatim.
    pub fn rename_emotion(
        &mut self,
        handle: EmotionHandle,
        raw_name: impl Into<String>,
    ) -> RigResult<()> {
        self.get_mut(handle)?.name = raw_name.into();
        Ok(())
    }

    /// Pop the most recently added emotion. Returns `None` when the model is empty.
    pub fn remove_last(&mut self) -> Option<Emotion> {
        let popped = self.emotions.pop();
        if popped.is_none() {
            tracing::warn!("remove requested on an empty emotion list");
        }
        popped
    }

    pub fn get(&self, handle: EmotionHandle) -> RigResult<&Emotion> {
        self.emotions
            .get(handle.0)
            .ok_or_else(|| unknown_handle(handle, self.emotions.len()))
    }

    fn get_mut(&mut self, handle: EmotionHandle) -> RigResult<&mut Emotion> {
        let len = self.emotions.len();
        self.emotions
            .get_mut(handle.0)
            .ok_or_else(|| unknown_handle(handle, len))
    }

    pub fn clear(&mut self) {
        self.emotions.clear();
    }

    pub fn len(&self) -> usize {
        self.emotions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty()
    }

    /// Emotions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionHandle, &Emotion)> {
        self.emotions
            .iter()
            .enumerate()
            .map(|(i, e)| (EmotionHandle(i), e))
    }

    pub fn as_slice(&self) -> &[Emotion] {
        &self.emotions
    }
}

fn unknown_handle(handle: EmotionHandle, len: usize) -> RigError {
    RigError::validation(format!(
        "emotion index {} out of range ({len} emotions)",
        handle.0
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(face: &str, mouth: &str) -> PortraitSelection {
        PortraitSelection {
            face_path: face.to_string(),
            mouth_path: mouth.to_string(),
            ..PortraitSelection::default()
        }
    }

    #[test]
    fn add_uses_placeholder_names_and_empty_frames() {
        let mut model = EmotionModel::new();
        let a = model.add_emotion();
        let b = model.add_emotion();
        assert_eq!(model.get(a).unwrap().name, "undefined_0");
        assert_eq!(model.get(b).unwrap().name, "undefined_1");
        assert_eq!(model.get(b).unwrap().frames[1], Frame::default());
    }

    #[test]
    fn placeholder_index_reuses_count_after_pop() {
        let mut model = EmotionModel::new();
        model.add_emotion();
        model.add_emotion();
        model.remove_last();
        let h = model.add_emotion();
        assert_eq!(model.get(h).unwrap().name, "undefined_1");
    }

    #[test]
    fn capture_copies_selection() {
        let mut model = EmotionModel::new();
        let h = model.add_emotion();
        let mut sel = selection("a.png", "x.png");
        model.capture_frame(h, FrameSlot::Closed, &sel).unwrap();

        sel.face_path = "changed.png".to_string();
        sel.mouth_path.clear();

        let frame = model.get(h).unwrap().frame(FrameSlot::Closed);
        assert_eq!(frame, &Frame::new("a.png", "x.png"));
    }

    #[test]
    fn capture_of_empty_selection_is_legal() {
        let mut model = EmotionModel::new();
        let h = model.add_emotion();
        model
            .capture_frame(h, FrameSlot::Open, &PortraitSelection::default())
            .unwrap();
        assert_eq!(model.get(h).unwrap().frames[1], Frame::default());
    }

    #[test]
    fn capture_records_character() {
        let mut model = EmotionModel::new();
        let h = model.add_emotion();
        let sel = PortraitSelection {
            character_id: Some("100001_01".to_string()),
            ..selection("a.png", "")
        };
        model.capture_frame(h, FrameSlot::Closed, &sel).unwrap();
        assert_eq!(
            model.get(h).unwrap().captured_for.as_deref(),
            Some("100001_01")
        );
    }

    #[test]
    fn characterless_capture_keeps_previous_owner() {
        let mut model = EmotionModel::new();
        let h = model.add_emotion();
        let owned = PortraitSelection {
            character_id: Some("100001_01".to_string()),
            ..selection("a.png", "")
        };
        model.capture_frame(h, FrameSlot::Closed, &owned).unwrap();
        model
            .capture_frame(h, FrameSlot::Open, &PortraitSelection::default())
            .unwrap();
        assert_eq!(
            model.get(h).unwrap().captured_for.as_deref(),
            Some("100001_01")
        );
    }

    #[test]
    fn rename_keeps_raw_text() {
        let mut model = EmotionModel::new();
        let h = model.add_emotion();
        model.rename_emotion(h, "Happy (Soft)").unwrap();
        assert_eq!(model.get(h).unwrap().name, "Happy (Soft)");
    }

    #[test]
    fn unknown_handle_is_an_error() {
        let mut model = EmotionModel::new();
        assert!(model.rename_emotion(EmotionHandle(0), "x").is_err());
        assert!(
            model
                .capture_frame(EmotionHandle(3), FrameSlot::Closed, &PortraitSelection::default())
                .is_err()
        );
    }

    #[test]
    fn remove_last_is_stack_ordered() {
        let mut model = EmotionModel::new();
        for name in ["one", "two", "three"] {
            let h = model.add_emotion();
            model.rename_emotion(h, name).unwrap();
        }
        let removed = model.remove_last().unwrap();
        assert_eq!(removed.name, "three");
        let names: Vec<_> = model.iter().map(|(_, e)| e.name.as_str()).collect();
        assert_eq!(names, ["one", "two"]);
    }

    #[test]
    fn remove_last_on_empty_returns_none() {
        let mut model = EmotionModel::new();
        assert!(model.remove_last().is_none());
        assert!(model.is_empty());
    }

    #[test]
    fn frame_slot_from_index() {
        assert_eq!(FrameSlot::try_from(0).unwrap(), FrameSlot::Closed);
        assert_eq!(FrameSlot::try_from(1).unwrap(), FrameSlot::Open);
        assert!(FrameSlot::try_from(2).is_err());
    }
}
