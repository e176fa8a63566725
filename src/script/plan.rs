use crate::{
    emotion::{Emotion, EmotionHandle, EmotionModel, Frame},
    foundation::core::{Canvas, Offset},
    script::token::sanitize_token,
};

/// Eye hold durations offered to the engine as `choice:` branches, in seconds.
pub const EYE_HOLD_CHOICES: [f64; 3] = [4.5, 3.5, 1.5];
/// How long the closed-eye frame is shown per blink.
pub const BLINK_CLOSED_HOLD: f64 = 0.25;
/// Hold per mouth frame while speaking.
pub const LIP_FLAP_HOLD: f64 = 0.2;

/// Export-wide inputs: who the script is for and where its layers live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptTarget {
    /// Catalog key of the character (the asset-pack identifier).
    pub character_id: String,
    /// Human-readable character name as listed in the catalog.
    pub display_name: String,
    pub base_path: String,
    /// Shared by every emotion in the export.
    pub offset: Offset,
}

/// Formatting knobs that do not depend on the emotion model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptConfig {
    pub canvas: Canvas,
    /// Where the asset pack comes from, named in the header.
    pub origin: String,
    /// Folder of the engine project that must hold the asset pack.
    pub data_dir: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            origin: "https://github.com/sh0wer1ee/DLPortraits".to_string(),
            data_dir: "portrait_data".to_string(),
        }
    }
}

/// Whether an emotion needs animated sub-images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationFlags {
    pub blink: bool,
    pub lip_flap: bool,
}

impl AnimationFlags {
    /// A slot animates when the open frame differs from the closed one and is not empty.
    pub fn from_frames(frames: &[Frame; 2]) -> Self {
        let [closed, open] = frames;
        Self {
            blink: open.face != closed.face && !open.face.is_empty(),
            lip_flap: open.mouth != closed.mouth && !open.mouth.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptHeader {
    pub display_name: String,
    pub character_id: String,
    pub origin: String,
    pub data_dir: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FaceLayer {
    Literal(String),
    /// Reference to a generated eyes sub-image.
    Animated { image: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum MouthLayer {
    Literal(String),
    /// Animated mouth while `speaker` talks, `idle` otherwise.
    WhileSpeaking {
        speaker: String,
        image: String,
        idle: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompositeDecl {
    pub image: String,
    pub canvas: Canvas,
    pub base_path: String,
    pub offset: Offset,
    pub face: FaceLayer,
    pub mouth: MouthLayer,
}

/// Looping blink: rest face, randomized hold, closed face, short hold.
#[derive(Clone, Debug, PartialEq)]
pub struct EyesBlock {
    pub image: String,
    pub open_face: String,
    pub holds: Vec<f64>,
    pub closed_face: String,
    pub closed_hold: f64,
}

/// Two-frame mouth flap, open first.
#[derive(Clone, Debug, PartialEq)]
pub struct MouthBlock {
    pub image: String,
    pub open_mouth: String,
    pub closed_mouth: String,
    pub hold: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmotionSection {
    pub token: String,
    pub flags: AnimationFlags,
    pub composite: CompositeDecl,
    pub eyes: Option<EyesBlock>,
    pub mouth: Option<MouthBlock>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptPlan {
    pub character: String,
    pub header: ScriptHeader,
    pub sections: Vec<EmotionSection>,
    /// Emotions last captured under a different character than the one being exported.
    pub foreign_captures: Vec<EmotionHandle>,
}

/// Build the structured plan for an export. Section order follows model order.
pub fn plan_script(
    model: &EmotionModel,
    target: &ScriptTarget,
    config: &ScriptConfig,
) -> ScriptPlan {
    let mut character = sanitize_token(&target.display_name);
    if character.is_empty() {
        character = sanitize_token(&target.character_id);
    }

    let mut foreign_captures = Vec::new();
    let mut sections = Vec::with_capacity(model.len());
    for (handle, emotion) in model.iter() {
        if is_foreign_capture(emotion, target) {
            foreign_captures.push(handle);
        }
        let mut token = sanitize_token(&emotion.name);
        if token.is_empty() {
            token = format!("undefined_{}", handle.0);
            tracing::warn!(name = %emotion.name, %token, "emotion name has no usable characters");
        }
        sections.push(plan_section_as(emotion, &token, &character, target, config));
    }

    ScriptPlan {
        header: ScriptHeader {
            display_name: target.display_name.clone(),
            character_id: target.character_id.clone(),
            origin: config.origin.clone(),
            data_dir: config.data_dir.clone(),
        },
        character,
        sections,
        foreign_captures,
    }
}

pub fn plan_section(
    emotion: &Emotion,
    character: &str,
    target: &ScriptTarget,
    config: &ScriptConfig,
) -> EmotionSection {
    plan_section_as(emotion, &sanitize_token(&emotion.name), character, target, config)
}

fn plan_section_as(
    emotion: &Emotion,
    token: &str,
    character: &str,
    target: &ScriptTarget,
    config: &ScriptConfig,
) -> EmotionSection {
    let flags = AnimationFlags::from_frames(&emotion.frames);
    let [closed, open] = &emotion.frames;

    let eyes_image = format!("{character} eyes {token}");
    let mouth_image = format!("{character} mouth {token}");

    let face = if flags.blink {
        FaceLayer::Animated {
            image: eyes_image.clone(),
        }
    } else {
        FaceLayer::Literal(closed.face.clone())
    };
    let mouth = if flags.lip_flap {
        MouthLayer::WhileSpeaking {
            speaker: character.to_string(),
            image: mouth_image.clone(),
            idle: closed.mouth.clone(),
        }
    } else {
        MouthLayer::Literal(closed.mouth.clone())
    };

    let eyes = flags.blink.then(|| EyesBlock {
        image: eyes_image,
        open_face: closed.face.clone(),
        holds: EYE_HOLD_CHOICES.to_vec(),
        closed_face: open.face.clone(),
        closed_hold: BLINK_CLOSED_HOLD,
    });
    let mouth_block = flags.lip_flap.then(|| MouthBlock {
        image: mouth_image,
        open_mouth: open.mouth.clone(),
        closed_mouth: closed.mouth.clone(),
        hold: LIP_FLAP_HOLD,
    });

    EmotionSection {
        composite: CompositeDecl {
            image: format!("{character} {token}"),
            canvas: config.canvas,
            base_path: target.base_path.clone(),
            offset: target.offset,
            face,
            mouth,
        },
        token: token.to_string(),
        flags,
        eyes,
        mouth: mouth_block,
    }
}

fn is_foreign_capture(emotion: &Emotion, target: &ScriptTarget) -> bool {
    let Some(captured) = &emotion.captured_for else {
        return false;
    };
    if captured == &target.character_id {
        return false;
    }
    tracing::warn!(
        emotion = %emotion.name,
        captured_for = %captured,
        exporting = %target.character_id,
        "emotion was captured under another character; its layers use this export's offset"
    );
    true
}
