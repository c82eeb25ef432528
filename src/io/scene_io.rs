use std::fs;
use std::path::{Path, PathBuf};

use crate::io::fsutil::{atomic_write, strip_bom};
use crate::model::scene::SceneDocument;

/// Error type for scene document I/O
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("could not read scene {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse scene {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write scene {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load a scene document from disk
pub fn read_scene(path: &Path) -> Result<SceneDocument, SceneError> {
    let text = fs::read_to_string(path).map_err(|e| SceneError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(strip_bom(&text)).map_err(|e| SceneError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Save a scene document atomically
pub fn write_scene(path: &Path, doc: &SceneDocument) -> Result<(), SceneError> {
    let mut content = serde_json::to_string_pretty(doc).map_err(|e| SceneError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    content.push('\n');
    atomic_write(path, content.as_bytes()).map_err(|e| SceneError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::scene::{Container, Element, SceneItem};
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("project.scene.json");
        let doc = SceneDocument {
            items: vec![
                SceneItem::Container(
                    Container::new("Scene1")
                        .with_element(Element::text("Title", "Hello"))
                        .with_element(Element::expression("Clock", "1", "time"))
                        .with_element(Element::plain("Shape").locked()),
                ),
                SceneItem::Asset {
                    name: "logo.png".into(),
                },
            ],
        };
        write_scene(&path, &doc).unwrap();
        assert_eq!(read_scene(&path).unwrap(), doc);
    }

    #[test]
    fn parse_error_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "{ items: ").unwrap();
        let err = read_scene(&path).unwrap_err();
        assert!(matches!(err, SceneError::ParseError { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
