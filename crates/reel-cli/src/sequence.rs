//! Loading still images from disk for `reel encode`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use reel_core::FrameBuffer;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Expand the inputs into an ordered list of image files. Directories
/// contribute their images sorted by file name.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)
                .with_context(|| format!("failed to read directory {}", input.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && is_image(p))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(input.clone());
        }
    }
    if files.is_empty() {
        bail!("no input images found");
    }
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn load_frame(path: &Path) -> Result<FrameBuffer> {
    let img = image::open(path).with_context(|| format!("failed to load {}", path.display()))?;
    Ok(FrameBuffer::from(img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::Color;

    fn write_png(path: &Path) {
        FrameBuffer::solid(3, 3, &Color::RED)
            .to_dynamic_image()
            .unwrap()
            .save(path)
            .unwrap();
    }

    #[test]
    fn test_directory_inputs_are_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("b.png"));
        write_png(&dir.path().join("a.png"));
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let files = collect_inputs(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_empty_input_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_inputs(&[dir.path().to_path_buf()]).is_err());
    }

    #[test]
    fn test_load_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.png");
        write_png(&path);
        let frame = load_frame(&path).unwrap();
        assert_eq!(frame.dimensions(), (3, 3));
        assert_eq!(frame.get_pixel(1, 1), Some([255, 0, 0, 255]));
    }
}
