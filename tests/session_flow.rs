mod support;

use portrait_rig::{
    AnimationFlags, Canvas, CatalogLayout, Composer, DirCatalog, FrameSlot, ScriptConfig,
    Session, plan_script, render_script, sanitize_token,
};

fn cleo_session(root: &std::path::Path) -> (Session, DirCatalog) {
    support::write_mirror(root);
    let catalog = DirCatalog::new(root, CatalogLayout::default());
    let mut session = Session::new("en_us", CatalogLayout::default());
    session.load_catalog(&catalog).unwrap();
    assert!(session.select_character(&catalog, "Cleo (Summer)").unwrap());
    (session, catalog)
}

#[test]
fn lip_flap_only_emotion() {
    let root = support::temp_dir("flow_lipflap");
    let (mut session, _) = cleo_session(&root);

    let h = session.add_emotion();
    session.rename_emotion(h, "Talk").unwrap();
    session.pick_face(0).unwrap();
    session.pick_mouth(0).unwrap();
    session.capture(h, FrameSlot::Closed).unwrap();
    session.pick_mouth(1).unwrap();
    session.capture(h, FrameSlot::Open).unwrap();

    let emotion = session.emotions().get(h).unwrap();
    assert_eq!(
        AnimationFlags::from_frames(&emotion.frames),
        AnimationFlags {
            blink: false,
            lip_flap: true
        }
    );

    let script = session.generate_script(&ScriptConfig::default()).unwrap();
    assert!(script.contains("  (4, 6), \"portrait_output/c1/face/0.png\",\n"));
    assert!(script.contains(
        "WhileSpeaking(\"cleo_summer\", \"cleo_summer mouth talk\", \"portrait_output/c1/mouth/0.png\")"
    ));
    assert!(script.contains("image cleo_summer mouth talk:\n    \"portrait_output/c1/mouth/1.png\"\n    .2\n"));
    assert!(!script.contains("eyes talk"));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn empty_open_face_is_static() {
    let root = support::temp_dir("flow_static");
    let (mut session, _) = cleo_session(&root);

    let h = session.add_emotion();
    session.pick_face(0).unwrap();
    session.pick_mouth(0).unwrap();
    session.capture(h, FrameSlot::Closed).unwrap();
    session.clear_face();
    session.capture(h, FrameSlot::Open).unwrap();

    let flags = AnimationFlags::from_frames(&session.emotions().get(h).unwrap().frames);
    assert_eq!(flags, AnimationFlags::default());

    let script = session.generate_script(&ScriptConfig::default()).unwrap();
    assert!(script.contains("image cleo_summer undefined_0 = Composite("));
    assert!(!script.contains("WhileSpeaking"));
    assert!(!script.contains("choice:"));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn remove_last_keeps_first_two_in_order() {
    let root = support::temp_dir("flow_remove");
    let (mut session, _) = cleo_session(&root);

    for name in ["Alpha", "Beta", "Gamma"] {
        let h = session.add_emotion();
        session.rename_emotion(h, name).unwrap();
    }
    let removed = session.remove_last_emotion().unwrap();
    assert_eq!(removed.name, "Gamma");

    let names: Vec<_> = session
        .emotions()
        .iter()
        .map(|(_, e)| e.name.clone())
        .collect();
    assert_eq!(names, ["Alpha", "Beta"]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn happy_soft_token() {
    assert_eq!(sanitize_token("Happy (Soft)"), "happy_soft");
}

#[test]
fn export_is_byte_identical_across_runs() {
    let root = support::temp_dir("flow_determinism");
    let (mut session, _) = cleo_session(&root);

    let h = session.add_emotion();
    session.rename_emotion(h, "Happy (Soft)").unwrap();
    session.pick_face(0).unwrap();
    session.pick_mouth(0).unwrap();
    session.capture(h, FrameSlot::Closed).unwrap();
    session.pick_face(1).unwrap();
    session.pick_mouth(1).unwrap();
    session.capture(h, FrameSlot::Open).unwrap();

    let config = ScriptConfig::default();
    let a = session.generate_script(&config).unwrap();
    let b = session.generate_script(&config).unwrap();
    assert_eq!(a, b);

    let target = session.script_target().unwrap();
    let plan = plan_script(session.emotions(), &target, &config);
    assert_eq!(render_script(&plan), a);
    let eyes = plan.sections[0].eyes.as_ref().unwrap();
    assert!(eyes.holds.iter().all(|h| [4.5, 3.5, 1.5].contains(h)));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn preview_composes_selected_layers() {
    let root = support::temp_dir("flow_preview");
    let (mut session, catalog) = cleo_session(&root);
    session.pick_face(0).unwrap();
    session.pick_mouth(0).unwrap();

    let composer = Composer::new(Canvas::new(32, 32).unwrap());
    let preview = session
        .compose_preview(&composer, &catalog)
        .unwrap()
        .unwrap();
    let surface = preview.surface();
    assert_eq!(surface.get_pixel(0, 0).0, [0, 0, 255, 255]);
    assert_eq!(surface.get_pixel(4, 6).0, [200, 0, 0, 255]);
    assert_eq!(surface.get_pixel(7, 7).0, [255, 255, 255, 255]);
    assert_eq!(surface.get_pixel(20, 20).0, [0, 0, 0, 0]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn localized_names_select_the_same_character() {
    let root = support::temp_dir("flow_locale");
    support::write_mirror(&root);
    let catalog = DirCatalog::new(&root, CatalogLayout::default());
    let mut session = Session::new("ja_jp", CatalogLayout::default());
    session.load_catalog(&catalog).unwrap();
    assert!(session.select_character(&catalog, "クレオ").unwrap());
    assert_eq!(session.character_id(), Some("c1"));
    assert!(!session.select_character(&catalog, "Cleo (Summer)").unwrap());

    std::fs::remove_dir_all(&root).ok();
}
