use std::fmt;

use crate::script::plan::{
    CompositeDecl, EmotionSection, EyesBlock, FaceLayer, MouthBlock, MouthLayer, ScriptHeader,
    ScriptPlan,
};

/// Render a plan as Ren'Py source. Pure: the same plan always renders to the same bytes.
pub fn render_script(plan: &ScriptPlan) -> String {
    plan.to_string()
}

impl fmt::Display for ScriptPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        for section in &self.sections {
            writeln!(f)?;
            write!(f, "{section}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ScriptHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Character: {}", self.display_name)?;
        writeln!(
            f,
            "# Remember to include {dir}/{id} from {origin} in the {dir} folder in the Ren'Py project",
            dir = self.data_dir,
            id = self.character_id,
            origin = self.origin,
        )
    }
}

impl fmt::Display for EmotionSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.composite)?;
        if let Some(eyes) = &self.eyes {
            writeln!(f)?;
            write!(f, "{eyes}")?;
        }
        if let Some(mouth) = &self.mouth {
            writeln!(f)?;
            write!(f, "{mouth}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CompositeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offset = format!("({}, {})", self.offset.x, self.offset.y);
        writeln!(f, "image {} = Composite(", self.image)?;
        writeln!(f, "  ({}, {}),", self.canvas.width, self.canvas.height)?;
        writeln!(f, "  (0, 0), \"{}\",", self.base_path)?;
        let face = match &self.face {
            FaceLayer::Literal(path) => path,
            FaceLayer::Animated { image } => image,
        };
        writeln!(f, "  {offset}, \"{face}\",")?;
        match &self.mouth {
            MouthLayer::Literal(path) => writeln!(f, "  {offset}, \"{path}\"")?,
            MouthLayer::WhileSpeaking {
                speaker,
                image,
                idle,
            } => writeln!(
                f,
                "  {offset}, WhileSpeaking(\"{speaker}\", \"{image}\", \"{idle}\")"
            )?,
        }
        writeln!(f, ")")
    }
}

impl fmt::Display for EyesBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "image {}:", self.image)?;
        writeln!(f, "    \"{}\"", self.open_face)?;
        for hold in &self.holds {
            writeln!(f, "    choice:")?;
            writeln!(f, "        {}", seconds(*hold))?;
        }
        writeln!(f, "    \"{}\"", self.closed_face)?;
        writeln!(f, "    {}", seconds(self.closed_hold))?;
        writeln!(f, "    repeat")
    }
}

impl fmt::Display for MouthBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hold = seconds(self.hold);
        writeln!(f, "image {}:", self.image)?;
        writeln!(f, "    \"{}\"", self.open_mouth)?;
        writeln!(f, "    {hold}")?;
        writeln!(f, "    \"{}\"", self.closed_mouth)?;
        writeln!(f, "    {hold}")?;
        writeln!(f, "    repeat")
    }
}

/// ATL durations drop the leading zero: `0.25` renders as `.25`.
fn seconds(v: f64) -> String {
    let s = format!("{v}");
    match s.strip_prefix("0.") {
        Some(frac) => format!(".{frac}"),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::{EmotionModel, FrameSlot};
    use crate::foundation::core::Offset;
    use crate::script::plan::{ScriptConfig, ScriptTarget, plan_script};
    use crate::selection::PortraitSelection;

    fn target() -> ScriptTarget {
        ScriptTarget {
            character_id: "100001_01".to_string(),
            display_name: "Elisanne (Wedding)".to_string(),
            base_path: "portrait_output/100001_01/100001_01_base.png".to_string(),
            offset: Offset::new(300, 120),
        }
    }

    fn capture(model: &mut EmotionModel, name: &str, frames: [(&str, &str); 2]) {
        let h = model.add_emotion();
        model.rename_emotion(h, name).unwrap();
        for (slot, (face, mouth)) in [FrameSlot::Closed, FrameSlot::Open].into_iter().zip(frames) {
            let sel = PortraitSelection {
                face_path: face.to_string(),
                mouth_path: mouth.to_string(),
                ..PortraitSelection::default()
            };
            model.capture_frame(h, slot, &sel).unwrap();
        }
    }

    #[test]
    fn seconds_formatting() {
        assert_eq!(seconds(4.5), "4.5");
        assert_eq!(seconds(0.25), ".25");
        assert_eq!(seconds(0.2), ".2");
        assert_eq!(seconds(1.0), "1");
    }

    #[test]
    fn renders_full_script() {
        let mut model = EmotionModel::new();
        capture(&mut model, "Happy (Soft)", [("e0.png", "m0.png"), ("e1.png", "m1.png")]);
        capture(&mut model, "Still", [("e0.png", "m0.png"), ("", "")]);

        let plan = plan_script(&model, &target(), &ScriptConfig::default());
        let expected = r#"# Character: Elisanne (Wedding)
# Remember to include portrait_data/100001_01 from https://github.com/sh0wer1ee/DLPortraits in the portrait_data folder in the Ren'Py project

image elisanne_wedding happy_soft = Composite(
  (1024, 1024),
  (0, 0), "portrait_output/100001_01/100001_01_base.png",
  (300, 120), "elisanne_wedding eyes happy_soft",
  (300, 120), WhileSpeaking("elisanne_wedding", "elisanne_wedding mouth happy_soft", "m0.png")
)

image elisanne_wedding eyes happy_soft:
    "e0.png"
    choice:
        4.5
    choice:
        3.5
    choice:
        1.5
    "e1.png"
    .25
    repeat

image elisanne_wedding mouth happy_soft:
    "m1.png"
    .2
    "m0.png"
    .2
    repeat

image elisanne_wedding still = Composite(
  (1024, 1024),
  (0, 0), "portrait_output/100001_01/100001_01_base.png",
  (300, 120), "e0.png",
  (300, 120), "m0.png"
)
"#;
        assert_eq!(render_script(&plan), expected);
    }

    #[test]
    fn empty_paths_propagate_verbatim() {
        let mut model = EmotionModel::new();
        capture(&mut model, "Blank", [("", ""), ("", "")]);
        let out = render_script(&plan_script(&model, &target(), &ScriptConfig::default()));
        assert!(out.contains("  (300, 120), \"\",\n  (300, 120), \"\"\n)"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut model = EmotionModel::new();
        capture(&mut model, "Wink", [("a.png", "x.png"), ("b.png", "x.png")]);
        let cfg = ScriptConfig::default();
        let a = render_script(&plan_script(&model, &target(), &cfg));
        let b = render_script(&plan_script(&model, &target(), &cfg));
        assert_eq!(a, b);
    }
}
