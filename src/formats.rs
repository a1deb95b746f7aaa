use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

/// Legacy containers we know how to hand to ffmpeg.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "MKV", "AVI", "MPG", "WMV", "MOV", "M4V", "3GP", "MPEG", "MPE", "OGM", "FLV", "DIVX", "VOB",
    "QT",
];

pub const OUTPUT_EXTENSION: &str = "MP4";

// What follows the last `.` of the file name, compared case-insensitively.
// A name without a dot has no extension, so `output_path` always has one to
// replace for accepted files.
static SUPPORTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\.(?:{})$",
        SUPPORTED_EXTENSIONS.join("|")
    ))
    .expect("extension pattern is valid")
});

pub fn supported_input_format(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| SUPPORTED.is_match(&name.to_string_lossy()))
}

/// `dir/a.b.mov` becomes `dir/a.b.MP4`. Only the last segment of the file
/// name is replaced.
pub fn output_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name.as_str(),
    };
    input.with_file_name(format!("{stem}.{OUTPUT_EXTENSION}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_supported_extension_in_any_case() {
        for ext in SUPPORTED_EXTENSIONS {
            let upper = format!("clip.{ext}");
            let lower = format!("clip.{}", ext.to_lowercase());
            assert!(supported_input_format(Path::new(&upper)), "{upper}");
            assert!(supported_input_format(Path::new(&lower)), "{lower}");
        }
        assert!(supported_input_format(Path::new("clip.Mov")));
        assert!(supported_input_format(Path::new("/media/2004/holiday.clip.DivX")));
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["clip.txt", "clip.mp4", "clip.MP4", "clip.mov.txt", "clip.mpegx", "clip.xqt"] {
            assert!(!supported_input_format(Path::new(name)), "{name}");
        }
        assert!(!supported_input_format(Path::new("dir.mov/readme")));
        assert!(!supported_input_format(Path::new("media/mov")));
    }

    #[test]
    fn bare_extension_name_is_not_a_video() {
        assert!(!supported_input_format(Path::new("mov")));
        assert!(!supported_input_format(Path::new("MOV")));
        assert!(!supported_input_format(Path::new("media/2004/vob")));
    }

    #[test]
    fn accepted_names_always_lose_their_extension() {
        for name in ["clip.mov", ".mov", "a.b.QT", "media/x.y/clip.Divx"] {
            let input = Path::new(name);
            assert!(supported_input_format(input), "{name}");
            let output = output_path(input);
            assert!(output.to_string_lossy().ends_with(".MP4"), "{name}");
            assert_eq!(output.parent(), input.parent());
        }
        assert_eq!(output_path(Path::new(".mov")), PathBuf::from(".MP4"));
    }

    #[test]
    fn output_replaces_final_extension_only() {
        assert_eq!(output_path(Path::new("a.b.MOV")), PathBuf::from("a.b.MP4"));
        assert_eq!(output_path(Path::new("clip.mov")), PathBuf::from("clip.MP4"));
        assert_eq!(
            output_path(Path::new("/media/2004/clip.3gp")),
            PathBuf::from("/media/2004/clip.MP4")
        );
        assert_eq!(
            output_path(Path::new("old.dir/clip.vob")),
            PathBuf::from("old.dir/clip.MP4")
        );
    }
}
