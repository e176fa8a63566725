use std::io::Cursor;
use std::path::{Path, PathBuf};

pub fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "portrait_rig_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn write_png(path: &Path, w: u32, h: u32, px: [u8; 4]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    std::fs::write(path, &buf).unwrap();
}

/// Local mirror with one character, `c1` ("Cleo (Summer)"), two faces and two mouths.
pub fn write_mirror(root: &Path) {
    let out = root.join("portrait_output");
    std::fs::create_dir_all(out.join("c1")).unwrap();
    std::fs::write(
        out.join("localizedDirData.json"),
        r#"{"fileList": {
            "c1": {"en_us": "Cleo (Summer)", "ja_jp": "クレオ"},
            "c2": {"en_us": "Dax"}
        }}"#,
    )
    .unwrap();
    std::fs::write(
        out.join("c1").join("data.json"),
        r#"{
            "partsData": {
                "faceParts": ["./portrait_output/c1/face/0.png", "./portrait_output/c1/face/1.png"],
                "mouthParts": ["./portrait_output/c1/mouth/0.png", "./portrait_output/c1/mouth/1.png"]
            },
            "offset": {"x": 4, "y": 6}
        }"#,
    )
    .unwrap();

    write_png(&out.join("c1").join("c1_base.png"), 16, 16, [0, 0, 255, 255]);
    write_png(&out.join("c1/face/0.png"), 4, 2, [255, 255, 255, 255]);
    write_png(&out.join("c1/face/1.png"), 4, 2, [10, 10, 10, 255]);
    write_png(&out.join("c1/mouth/0.png"), 2, 1, [200, 0, 0, 255]);
    write_png(&out.join("c1/mouth/1.png"), 2, 2, [120, 0, 0, 255]);
}
