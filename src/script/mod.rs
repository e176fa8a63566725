//! Ren'Py image script generation.
//!
//! Generation is two-step: [`plan_script`] turns the emotion model into records (composite
//! declarations plus optional eyes/mouth animation blocks), and [`render_script`] formats them.

pub(crate) mod plan;
pub(crate) mod render;
pub(crate) mod token;

pub use plan::{
    AnimationFlags, BLINK_CLOSED_HOLD, CompositeDecl, EYE_HOLD_CHOICES, EmotionSection, EyesBlock,
    FaceLayer, LIP_FLAP_HOLD, MouthBlock, MouthLayer, ScriptConfig, ScriptHeader, ScriptPlan,
    ScriptTarget, plan_script,
};
pub use render::render_script;
pub use token::sanitize_token;

use crate::emotion::EmotionModel;

/// File extension of generated scripts.
pub const SCRIPT_EXTENSION: &str = "rpy";

/// Plan and render in one call.
pub fn generate_script(
    model: &EmotionModel,
    target: &ScriptTarget,
    config: &ScriptConfig,
) -> String {
    let plan = plan_script(model, target, config);
    tracing::info!(
        character = %plan.character,
        sections = plan.sections.len(),
        "generated script"
    );
    render_script(&plan)
}

/// `<character token>.rpy`.
pub fn script_file_name(display_name: &str) -> String {
    format!("{}.{SCRIPT_EXTENSION}", sanitize_token(display_name))
}
