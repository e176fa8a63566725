use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use portrait_rig::{
    AnimationFlags, Catalog, Composer, DirCatalog, EmotionHandle, FrameSlot, ProjectFile,
    RigConfig, Session, sanitize_token,
};

#[derive(Parser, Debug)]
#[command(name = "portrait-rig", version)]
struct Cli {
    /// Project state file, created on first write.
    #[arg(long, global = true, default_value = "portrait-rig.json")]
    project: PathBuf,

    /// Read the catalog from a local mirror directory instead of the site.
    #[arg(long, global = true)]
    catalog_dir: Option<PathBuf>,

    /// Config file to use instead of the global and project-local layers.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog characters.
    Characters(CharactersArgs),
    /// Select a character by display name. Switching characters clears emotions.
    Select(SelectArgs),
    /// List the face and mouth parts of the selected character.
    Parts,
    /// Change the highlighted face/mouth layers.
    Pick(PickArgs),
    /// Compose the current selection and write it as a PNG.
    Preview(PreviewArgs),
    /// Author emotions.
    #[command(subcommand)]
    Emotion(EmotionCommand),
    /// Generate the Ren'Py script.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct CharactersArgs {
    /// Only list names containing this text (case-insensitive).
    #[arg(long)]
    filter: Option<String>,
}

#[derive(Parser, Debug)]
struct SelectArgs {
    /// Display name exactly as listed by `characters`.
    name: String,
}

#[derive(Parser, Debug)]
struct PickArgs {
    /// Face part index.
    #[arg(long, conflicts_with = "no_face")]
    face: Option<usize>,

    /// Remove the face layer.
    #[arg(long)]
    no_face: bool,

    /// Mouth part index.
    #[arg(long, conflicts_with = "no_mouth")]
    mouth: Option<usize>,

    /// Remove the mouth layer.
    #[arg(long)]
    no_mouth: bool,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Subcommand, Debug)]
enum EmotionCommand {
    /// Append an emotion named `undefined_<n>`.
    Add,
    /// Remove the most recently added emotion.
    Remove,
    /// Set the display name of an emotion.
    Rename { index: usize, name: String },
    /// Copy the current selection into frame 0 (rest pose) or 1 (eyes closed / mouth open).
    Capture { index: usize, frame: usize },
    /// Show emotions in script order.
    List,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Output path. Defaults to `<character>.rpy` in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print the script instead of writing a file.
    #[arg(long, conflicts_with = "out")]
    stdout: bool,
}

struct App {
    config: RigConfig,
    catalog: Box<dyn Catalog>,
    project_path: PathBuf,
}

impl App {
    fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => RigConfig::load_from_file(path)?,
            None => RigConfig::load()?,
        };
        let catalog: Box<dyn Catalog> = match &cli.catalog_dir {
            Some(dir) => Box::new(DirCatalog::new(dir, config.layout.clone())),
            None => Box::new(config.http_catalog()),
        };
        Ok(Self {
            config,
            catalog,
            project_path: cli.project.clone(),
        })
    }

    fn session(&self) -> anyhow::Result<Session> {
        let project = ProjectFile::load_or_default(&self.project_path)?;
        Ok(Session::from_project(
            project,
            self.config.locale.clone(),
            self.config.layout.clone(),
        ))
    }

    fn save(&self, session: &Session) -> anyhow::Result<()> {
        session.to_project().save(&self.project_path)?;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("portrait_rig=info".parse()?))
        .init();

    let cli = Cli::parse();
    let app = App::new(&cli)?;
    match cli.cmd {
        Command::Characters(args) => cmd_characters(&app, args),
        Command::Select(args) => cmd_select(&app, args),
        Command::Parts => cmd_parts(&app),
        Command::Pick(args) => cmd_pick(&app, args),
        Command::Preview(args) => cmd_preview(&app, args),
        Command::Emotion(cmd) => cmd_emotion(&app, cmd),
        Command::Export(args) => cmd_export(&app, args),
    }
}

fn cmd_characters(app: &App, args: CharactersArgs) -> anyhow::Result<()> {
    let mut session = app.session()?;
    // An unreachable catalog lists nothing; the failure is already logged.
    let Ok(index) = session.load_catalog(app.catalog.as_ref()) else {
        return Ok(());
    };
    let needle = args.filter.map(|f| f.to_lowercase());
    for entry in index.entries(&app.config.locale) {
        if let Some(needle) = &needle {
            if !entry.display_name.to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }
        println!("{}\t{}", entry.id, entry.display_name);
    }
    Ok(())
}

fn cmd_select(app: &App, args: SelectArgs) -> anyhow::Result<()> {
    let mut session = app.session()?;
    session.load_catalog(app.catalog.as_ref())?;
    if session.select_character(app.catalog.as_ref(), &args.name)? {
        let sel = session.selection();
        eprintln!(
            "selected {} ({}), offset ({}, {})",
            args.name,
            session.character_id().unwrap_or_default(),
            sel.offset.x,
            sel.offset.y
        );
    } else {
        eprintln!("'{}' is not in the catalog; selection cleared", args.name);
    }
    app.save(&session)
}

fn cmd_parts(app: &App) -> anyhow::Result<()> {
    let session = app.session()?;
    let manifest = session
        .manifest()
        .context("no character selected; run `select` first")?;
    let sel = session.selection();
    for (kind, parts, current) in [
        ("face", &manifest.parts_data.face_parts, &sel.face_path),
        ("mouth", &manifest.parts_data.mouth_parts, &sel.mouth_path),
    ] {
        for (i, path) in parts.iter().enumerate() {
            let mark = if path == current { "*" } else { " " };
            println!("{mark} {kind}\t{i}\t{path}");
        }
    }
    Ok(())
}

fn cmd_pick(app: &App, args: PickArgs) -> anyhow::Result<()> {
    let mut session = app.session()?;
    if let Some(i) = args.face {
        session.pick_face(i)?;
    }
    if args.no_face {
        session.clear_face();
    }
    if let Some(i) = args.mouth {
        session.pick_mouth(i)?;
    }
    if args.no_mouth {
        session.clear_mouth();
    }
    app.save(&session)
}

fn cmd_preview(app: &App, args: PreviewArgs) -> anyhow::Result<()> {
    let session = app.session()?;
    let composer = Composer::new(app.config.script.canvas);
    let preview = session
        .compose_preview(&composer, app.catalog.as_ref())?
        .context("composer busy")?;
    write_output(&args.out, &preview.to_png_bytes()?)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_emotion(app: &App, cmd: EmotionCommand) -> anyhow::Result<()> {
    let mut session = app.session()?;
    match cmd {
        EmotionCommand::Add => {
            let h = session.add_emotion();
            eprintln!("added emotion {}", h.0);
        }
        EmotionCommand::Remove => match session.remove_last_emotion() {
            Some(e) => eprintln!("removed '{}'", e.name),
            None => anyhow::bail!("no emotions to remove"),
        },
        EmotionCommand::Rename { index, name } => {
            session.rename_emotion(EmotionHandle(index), &name)?;
        }
        EmotionCommand::Capture { index, frame } => {
            let slot = FrameSlot::try_from(frame)?;
            session.capture(EmotionHandle(index), slot)?;
            eprintln!("captured '{}' into emotion {index}", slot.label());
        }
        EmotionCommand::List => {
            for (h, e) in session.emotions().iter() {
                let flags = AnimationFlags::from_frames(&e.frames);
                println!(
                    "{}\t{}\t{}\tblink={}\tlipflap={}",
                    h.0,
                    e.name,
                    sanitize_token(&e.name),
                    flags.blink,
                    flags.lip_flap
                );
                for (i, f) in e.frames.iter().enumerate() {
                    println!("\tframe {i}: face='{}' mouth='{}'", f.face, f.mouth);
                }
            }
            return Ok(());
        }
    }
    app.save(&session)
}

fn cmd_export(app: &App, args: ExportArgs) -> anyhow::Result<()> {
    let session = app.session()?;
    let script = session.generate_script(&app.config.script)?;
    if args.stdout {
        print!("{script}");
        return Ok(());
    }
    let out = match args.out {
        Some(p) => p,
        None => PathBuf::from(session.script_file_name()?),
    };
    write_output(&out, script.as_bytes())?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
