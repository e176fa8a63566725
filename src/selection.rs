use crate::foundation::core::Offset;

/// Layers currently highlighted for the active character.
///
/// All paths are catalog-relative. Emotions copy `face_path`/`mouth_path` at capture time and never
/// alias this state.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PortraitSelection {
    /// Catalog id of the character the selection belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    pub base_path: String,
    /// Fixed per character; shared by every frame captured under it.
    pub offset: Offset,
    #[serde(default)]
    pub face_path: String,
    #[serde(default)]
    pub mouth_path: String,
}

impl PortraitSelection {
    /// Fresh selection for a character: base layer only, no face or mouth.
    pub fn for_character(
        character_id: impl Into<String>,
        base_path: impl Into<String>,
        offset: Offset,
    ) -> Self {
        Self {
            character_id: Some(character_id.into()),
            base_path: base_path.into(),
            offset,
            face_path: String::new(),
            mouth_path: String::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_face(&self) -> bool {
        !self.face_path.is_empty()
    }

    pub fn has_mouth(&self) -> bool {
        !self.mouth_path.is_empty()
    }
}
