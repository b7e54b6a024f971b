//! Walks the image list the way an operator would: skipping finished images,
//! resuming saved ones and following the action each session ends with.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use log::{error, info, warn};
use wingcut::{Action, LoopState, Session};

use crate::config::Config;
use crate::export::export_components;
use crate::image_io::load_canvas;
use crate::metadata::MetadataStore;
use crate::script::Script;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub visited: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

pub struct Navigator<'a> {
    config: &'a Config,
    metadata: MetadataStore,
    script: Option<Script>,
    revisit_done: bool,
}

impl<'a> Navigator<'a> {
    pub fn new(config: &'a Config, metadata: MetadataStore, script: Option<Script>, revisit_done: bool) -> Self {
        Self {
            config,
            metadata,
            script,
            revisit_done,
        }
    }

    pub fn run(&mut self, images: &[PathBuf]) -> anyhow::Result<RunSummary> {
        let mut summary = RunSummary::default();
        let max_visits = images.len() * 8;
        let mut index = 0usize;
        let mut direction = Direction::Forward;

        while index < images.len() {
            if summary.visited + summary.skipped >= max_visits {
                warn!("stopping after {max_visits} visits, sessions keep bouncing between images");
                break;
            }
            let image = &images[index];

            if !self.revisit_done && self.metadata.state_of(image) == Some(LoopState::Done) {
                info!("skipping finished {}", image.display());
                summary.skipped += 1;
                match step(index, direction) {
                    Some(next) => index = next,
                    None => break,
                }
                continue;
            }

            info!("({}/{}) process {}", index + 1, images.len(), image.display());
            summary.visited += 1;
            let mut session = match self.open_session(image) {
                Ok(session) => session,
                Err(err) => {
                    error!("{err:#}");
                    summary.failed += 1;
                    match step(index, direction) {
                        Some(next) => index = next,
                        None => break,
                    }
                    continue;
                }
            };

            if let Some(script) = &self.script {
                script.replay(&mut session, Instant::now());
            }

            let status = session.status();
            match status.action {
                Some(Action::Quit) => {
                    info!("quit without saving {}", image.display());
                    break;
                }
                Some(Action::Save) | None => {
                    self.save(&mut session, image)?;
                    summary.saved += 1;
                    if status.state == LoopState::Pause {
                        info!("paused at {}", image.display());
                        break;
                    }
                    direction = Direction::Forward;
                }
                Some(Action::Next | Action::Previous) => {
                    let answer = self.script.as_ref().is_some_and(|s| s.save_on_prompt);
                    if session.needs_save_prompt() && answer {
                        self.save(&mut session, image)?;
                        summary.saved += 1;
                    }
                    direction = if status.action == Some(Action::Next) {
                        Direction::Forward
                    } else {
                        Direction::Backward
                    };
                }
                Some(Action::NavNext) => direction = Direction::Forward,
                Some(Action::NavPrevious) => direction = Direction::Backward,
            }

            match step(index, direction) {
                Some(next) => index = next,
                None => break,
            }
        }

        Ok(summary)
    }

    fn open_session(&self, image: &Path) -> anyhow::Result<Session> {
        let canvas = load_canvas(image)?;
        let name = file_name(image);
        let mut session = Session::new(name.clone(), canvas, self.config.session.clone())
            .with_context(|| format!("cannot start a session on {}", image.display()))?;
        info!("mirror line x={}", session.store().mirror_line.x);

        if let Some(record) = self.metadata.load_record(image) {
            info!("rollback to last status ({})", record.state);
            if let Err(err) = session.restore(record, Instant::now()) {
                warn!("discarding stored record of {name}: {err}");
            }
        }
        Ok(session)
    }

    fn save(&mut self, session: &mut Session, image: &Path) -> anyhow::Result<()> {
        let record = session.to_record();
        self.metadata.save(image, &record)?;

        let stem = image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| record.name.clone());
        export_components(session, &self.config.output_dir, &stem)?;
        session.mark_saved();
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn step(index: usize, direction: Direction) -> Option<usize> {
    match direction {
        Direction::Forward => Some(index + 1),
        Direction::Backward => index.checked_sub(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_io::save_canvas;
    use wingcut::raster::{BLACK, WHITE};
    use wingcut::Canvas;

    fn write_specimen(path: &Path) {
        let mut canvas = Canvas::new_filled(600, 400, WHITE);
        canvas.fill_rect(100, 60, 230, 300, BLACK);
        canvas.fill_rect(370, 60, 500, 300, BLACK);
        canvas.fill_rect(280, 100, 320, 300, BLACK);
        save_canvas(&canvas, path).unwrap();
    }

    fn fixture(name: &str) -> (Config, PathBuf, Vec<PathBuf>) {
        let root = common::test_utils::test_output_path(name);
        let _ = std::fs::remove_dir_all(&root);
        let images: Vec<PathBuf> = ["a.png", "b.png"].iter().map(|n| root.join("images").join(n)).collect();
        for image in &images {
            write_specimen(image);
        }
        let config = Config {
            metadata_dir: root.join("metadata"),
            output_dir: root.join("output"),
            ..Config::default()
        };
        (config, root, images)
    }

    const DONE_SCRIPT: &str = r#"
default:
  - pointer: {kind: up, button: left, pos: [250, 200]}
  - drag: {button: left, from: [200, 50], to: [200, 150]}
  - key: space
"#;

    #[test]
    fn done_images_are_saved_then_skipped() {
        let (config, _root, images) = fixture("wingcut_cli_nav_done");
        let script: Script = serde_yml::from_str(DONE_SCRIPT).unwrap();

        let metadata = MetadataStore::open(&config.metadata_dir).unwrap();
        let summary = Navigator::new(&config, metadata, Some(script.clone()), false)
            .run(&images)
            .unwrap();
        assert_eq!(summary.saved, 2);
        assert!(config.output_dir.join("a_body.png").exists());
        assert!(config.output_dir.join("b_preview.png").exists());

        let metadata = MetadataStore::open(&config.metadata_dir).unwrap();
        assert_eq!(metadata.state_of(&images[0]), Some(LoopState::Done));
        let summary = Navigator::new(&config, metadata, Some(script), false)
            .run(&images)
            .unwrap();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.visited, 0);
    }

    #[test]
    fn pause_stops_the_run_and_resumes_later() {
        let (config, _root, images) = fixture("wingcut_cli_nav_pause");
        let pause: Script = serde_yml::from_str(
            "default:\n  - pointer: {kind: up, button: left, pos: [250, 200]}\n  - key: {char: q}\n",
        )
        .unwrap();

        let metadata = MetadataStore::open(&config.metadata_dir).unwrap();
        let summary = Navigator::new(&config, metadata, Some(pause), false)
            .run(&images)
            .unwrap();
        assert_eq!(summary.visited, 1);

        let metadata = MetadataStore::open(&config.metadata_dir).unwrap();
        assert_eq!(metadata.state_of(&images[0]), Some(LoopState::Pause));
        assert_eq!(metadata.state_of(&images[1]), None);
        assert_eq!(metadata.load_record(&images[0]).unwrap().mirror_shift, Some(50));

        // resumed session already has its body width, so Esc leaves it alone
        let quit: Script = serde_yml::from_str("default:\n  - key: escape\n").unwrap();
        let navigator = Navigator::new(&config, metadata, Some(quit), false);
        let session = navigator.open_session(&images[0]).unwrap();
        assert_eq!(session.store().mirror_shift, Some(50));
    }

    #[test]
    fn unreadable_images_are_counted_and_skipped() {
        let (config, root, mut images) = fixture("wingcut_cli_nav_broken");
        let broken = root.join("images").join("broken.png");
        std::fs::write(&broken, b"not a png").unwrap();
        images.insert(0, broken);

        let metadata = MetadataStore::open(&config.metadata_dir).unwrap();
        let summary = Navigator::new(&config, metadata, None, false).run(&images).unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.saved, 2);
    }
}
