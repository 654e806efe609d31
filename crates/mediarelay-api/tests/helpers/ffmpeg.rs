use std::path::{Path, PathBuf};

/// Behaviour of the stand-in ffmpeg script.
#[derive(Debug, Clone, Copy)]
pub enum FakeFfmpeg {
    /// Copy the `-i` input to the last argument.
    Copy,
    /// Print to stderr and exit 1.
    Fail,
}

/// Write an executable shell script standing in for ffmpeg and return its path.
pub fn write_fake_ffmpeg(dir: &Path, behaviour: FakeFfmpeg) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let body = match behaviour {
        FakeFfmpeg::Copy => {
            r#"#!/bin/sh
input=""
prev=""
last=""
for arg in "$@"; do
  if [ "$prev" = "-i" ]; then input="$arg"; fi
  prev="$arg"
  last="$arg"
done
cat "$input" > "$last"
"#
        }
        FakeFfmpeg::Fail => {
            r#"#!/bin/sh
echo "Invalid data found when processing input" >&2
exit 1
"#
        }
    };

    let path = dir.join("ffmpeg");
    std::fs::write(&path, body).expect("Failed to write fake ffmpeg");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark fake ffmpeg executable");
    path
}
