use std::path::{Path, PathBuf};

use log::info;
use wingcut::Session;

use crate::image_io::save_canvas;

/// Writes `<stem>_<suffix>.png` for every carved component plus
/// `<stem>_preview.png`, returning the written paths.
pub fn export_components(session: &Session, dir: &Path, stem: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (kind, component) in session.components().iter() {
        let path = dir.join(format!("{stem}_{}.png", kind.file_suffix()));
        save_canvas(&component.pixels, &path)?;
        written.push(path);
    }

    let preview = dir.join(format!("{stem}_preview.png"));
    save_canvas(session.preview(), &preview)?;
    written.push(preview);

    info!("exported {} images for {stem}", written.len());
    Ok(written)
}
