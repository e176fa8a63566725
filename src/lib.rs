//! Layered character portraits and Ren'Py emotion scripts.
//!
//! A [`Session`] loads a character from a part [`Catalog`], lets the author pick face and mouth
//! layers, captures them into named emotions, and generates an image script in which each emotion
//! blinks and/or flaps its mouth when its two frames differ.
#![forbid(unsafe_code)]

mod foundation;

pub mod catalog;
pub mod compose;
pub mod config;
pub mod emotion;
pub mod project;
pub mod script;
pub mod selection;
pub mod session;

pub use crate::foundation::core::{Canvas, Offset};
pub use crate::foundation::error::{RigError, RigResult};
pub use crate::foundation::paths::{normalize_rel_path, resolve_url};

pub use crate::catalog::{
    Catalog, CatalogEntry, CatalogIndex, CatalogLayout, DirCatalog, HttpCatalog, PartsData,
    PartsManifest,
};
pub use crate::compose::{Composer, Preview};
pub use crate::config::RigConfig;
pub use crate::emotion::{Emotion, EmotionHandle, EmotionModel, Frame, FrameSlot};
pub use crate::project::{CharacterRef, ProjectFile};
pub use crate::script::{
    AnimationFlags, ScriptConfig, ScriptPlan, ScriptTarget, generate_script, plan_script,
    render_script, sanitize_token, script_file_name,
};
pub use crate::selection::PortraitSelection;
pub use crate::session::Session;
