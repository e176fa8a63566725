//! Authoring session: the active character, its selection, and the emotions captured under it.

use crate::{
    catalog::{Catalog, CatalogIndex, CatalogLayout, PartsManifest},
    compose::{Composer, Preview},
    emotion::{Emotion, EmotionHandle, EmotionModel, FrameSlot},
    foundation::error::{RigError, RigResult},
    project::{CharacterRef, ProjectFile},
    script::{ScriptConfig, ScriptTarget, generate_script, script_file_name},
    selection::PortraitSelection,
};

pub struct Session {
    locale: String,
    layout: CatalogLayout,
    index: Option<CatalogIndex>,
    character: Option<CharacterRef>,
    manifest: Option<PartsManifest>,
    selection: PortraitSelection,
    emotions: EmotionModel,
}

impl Session {
    pub fn new(locale: impl Into<String>, layout: CatalogLayout) -> Self {
        Self {
            locale: locale.into(),
            layout,
            index: None,
            character: None,
            manifest: None,
            selection: PortraitSelection::default(),
            emotions: EmotionModel::new(),
        }
    }

    /// Restore a session saved with [`Session::to_project`].
    pub fn from_project(
        project: ProjectFile,
        locale: impl Into<String>,
        layout: CatalogLayout,
    ) -> Self {
        Self {
            locale: locale.into(),
            layout,
            index: None,
            character: project.character,
            manifest: project.manifest,
            selection: project.selection,
            emotions: EmotionModel::from_emotions(project.emotions),
        }
    }

    pub fn to_project(&self) -> ProjectFile {
        ProjectFile {
            character: self.character.clone(),
            manifest: self.manifest.clone(),
            selection: self.selection.clone(),
            emotions: self.emotions.as_slice().to_vec(),
        }
    }

    /// Fetch and install the character index.
    ///
    /// On failure nothing is installed and the error is returned after being logged.
    pub fn load_catalog(&mut self, catalog: &dyn Catalog) -> RigResult<&CatalogIndex> {
        match catalog.index() {
            Ok(index) => {
                tracing::info!(characters = index.file_list.len(), "catalog loaded");
                Ok(self.index.insert(index))
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load catalog index");
                Err(e)
            }
        }
    }

    pub fn index(&self) -> Option<&CatalogIndex> {
        self.index.as_ref()
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Select a character by its catalog display name.
    ///
    /// Requires a loaded index (see [`Session::load_catalog`]); without one this is a validation
    /// error and the current selection is left alone.
    ///
    /// Returns `Ok(false)` and clears the selection when the name is not a catalog entry.
    /// Switching to a different character resets the selection and drops existing emotions, so
    /// one export never mixes offsets from two characters.
    pub fn select_character(
        &mut self,
        catalog: &dyn Catalog,
        display_name: &str,
    ) -> RigResult<bool> {
        let index = self
            .index
            .as_ref()
            .ok_or_else(|| RigError::validation("catalog not loaded"))?;
        let found = index
            .find_by_display_name(display_name, &self.locale)
            .map(str::to_string);
        let Some(id) = found else {
            tracing::warn!(name = %display_name, "no catalog entry with that name; selection cleared");
            self.clear_character();
            return Ok(false);
        };

        if self.manifest.is_some() && self.character_id() == Some(id.as_str()) {
            return Ok(true);
        }

        let manifest = catalog.manifest(&id).inspect_err(|e| {
            tracing::error!(character = %id, error = %e, "failed to load parts manifest");
        })?;

        let switching = self.character_id().is_some_and(|current| current != id)
            || self
                .emotions
                .iter()
                .any(|(_, e)| e.captured_for.as_deref().is_some_and(|c| c != id));
        if switching && !self.emotions.is_empty() {
            tracing::info!(
                dropped = self.emotions.len(),
                "character changed; clearing emotions"
            );
            self.emotions.clear();
        }

        self.selection =
            PortraitSelection::for_character(&id, self.layout.base_path(&id), manifest.offset);
        self.character = Some(CharacterRef {
            id,
            display_name: display_name.to_string(),
        });
        self.manifest = Some(manifest);
        Ok(true)
    }

    fn clear_character(&mut self) {
        self.character = None;
        self.manifest = None;
        self.selection.reset();
    }

    pub fn character(&self) -> Option<&CharacterRef> {
        self.character.as_ref()
    }

    pub fn character_id(&self) -> Option<&str> {
        self.character.as_ref().map(|c| c.id.as_str())
    }

    pub fn manifest(&self) -> Option<&PartsManifest> {
        self.manifest.as_ref()
    }

    pub fn selection(&self) -> &PortraitSelection {
        &self.selection
    }

    fn require_manifest(&self) -> RigResult<&PartsManifest> {
        self.manifest
            .as_ref()
            .ok_or_else(|| RigError::validation("no character selected"))
    }

    pub fn pick_face(&mut self, index: usize) -> RigResult<()> {
        let path = self.require_manifest()?.face(index)?.to_string();
        self.selection.face_path = path;
        Ok(())
    }

    pub fn pick_mouth(&mut self, index: usize) -> RigResult<()> {
        let path = self.require_manifest()?.mouth(index)?.to_string();
        self.selection.mouth_path = path;
        Ok(())
    }

    pub fn clear_face(&mut self) {
        self.selection.face_path.clear();
    }

    pub fn clear_mouth(&mut self) {
        self.selection.mouth_path.clear();
    }

    pub fn emotions(&self) -> &EmotionModel {
        &self.emotions
    }

    pub fn add_emotion(&mut self) -> EmotionHandle {
        self.emotions.add_emotion()
    }

    pub fn rename_emotion(&mut self, handle: EmotionHandle, name: &str) -> RigResult<()> {
        self.emotions.rename_emotion(handle, name)
    }

    /// Snapshot the current selection into one frame of an emotion.
    pub fn capture(&mut self, handle: EmotionHandle, slot: FrameSlot) -> RigResult<()> {
        self.emotions.capture_frame(handle, slot, &self.selection)
    }

    pub fn remove_last_emotion(&mut self) -> Option<Emotion> {
        self.emotions.remove_last()
    }

    pub fn compose_preview(
        &self,
        composer: &Composer,
        catalog: &dyn Catalog,
    ) -> RigResult<Option<Preview>> {
        composer.compose(catalog, &self.selection)
    }

    pub fn script_target(&self) -> RigResult<ScriptTarget> {
        let character = self
            .character
            .as_ref()
            .ok_or_else(|| RigError::validation("no character selected"))?;
        Ok(ScriptTarget {
            character_id: character.id.clone(),
            display_name: character.display_name.clone(),
            base_path: self.selection.base_path.clone(),
            offset: self.selection.offset,
        })
    }

    pub fn generate_script(&self, config: &ScriptConfig) -> RigResult<String> {
        Ok(generate_script(&self.emotions, &self.script_target()?, config))
    }

    pub fn script_file_name(&self) -> RigResult<String> {
        let target = self.script_target()?;
        Ok(script_file_name(&target.display_name))
    }
}
