use clap::Parser;
use cutio_timeline::{
    ClipRef, ClipSpec, EditorResult, EditorSession, EngineConfig, MediaKind, Project, SplitSuffix,
    TrackKind,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Runs a scripted editing session and prints the resulting timeline.
#[derive(Parser, Debug)]
#[command(name = "cutio-timeline", version)]
struct Args {
    /// Engine config (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the final timeline as a project file.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Reopen an existing project instead of starting empty.
    #[arg(long)]
    open: Option<PathBuf>,
}

fn main() -> EditorResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };

    let mut session = match &args.open {
        Some(path) => {
            Project::load_from_file(path, config.min_visible_duration)?.into_session(config)
        }
        None => EditorSession::new(config),
    };
    tracing::info!(tracks = session.timeline().tracks.len(), "Session ready");

    run_demo(&mut session);

    for track in &session.timeline().tracks {
        tracing::info!(
            track = %track.name,
            clips = track.clips.len(),
            muted = track.muted,
            gaps = session.gaps_in_track(track.id).len(),
            "Track"
        );
    }
    tracing::info!(
        total = session.total_duration(),
        display = session.display_duration(),
        undo_depth = session.history().undo_count(),
        "Timeline"
    );

    if let Some(path) = &args.save {
        Project::from_session("Untitled Project", &session).save_to_file(path)?;
        tracing::info!(path = %path.display(), "Project written");
    } else {
        println!("{}", serde_json::to_string_pretty(session.timeline())?);
    }
    Ok(())
}

/// A short edit: drop two shots, split and duplicate, pull the audio out,
/// then close the hole left by a deletion.
fn run_demo(session: &mut EditorSession) {
    let Some((video, intro)) = session.place_clip(ClipSpec::new(
        "intro.mp4",
        "Intro",
        MediaKind::Video,
        0.0,
        8.0,
    )) else {
        return;
    };
    let Some((_, outro)) = session.place_clip(ClipSpec::new(
        "outro.mp4",
        "Outro",
        MediaKind::Video,
        12.0,
        5.0,
    )) else {
        return;
    };

    if let Some(snapped) = session.snap_to_edge(video, 16.95, None, 0.1) {
        tracing::info!(snapped, "Snapped to clip edge");
    }

    let Some(second_half) = session.split_clip(video, intro, 3.0, SplitSuffix::Cut) else {
        return;
    };
    session.update_clip_trim(video, second_half, 0.5, -1.0);
    session.separate_audio(video, intro);
    session.freeze_frame(video, outro, 14.0);

    session.select_clip(video, second_half, false);
    session.delete_selected();
    session.close_gaps_in_track(video);

    if session.undo() && session.redo() {
        tracing::info!("Undo/redo round trip");
    }

    let music = session.add_track(TrackKind::Audio);
    let bed = ClipSpec::new("music.mp3", "Music bed", MediaKind::Audio, 0.0, 20.0);
    match session.try_add_clip_to_track(music, bed) {
        Ok(clip) => session.set_selected_clips([ClipRef::new(music, clip)]),
        Err(err) => tracing::warn!(%err, "Music bed refused"),
    }
    session.toggle_track_mute(music);
}
