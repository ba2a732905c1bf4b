//! External tone-mapping collaborator.
//!
//! Wide-gamut/HDR sources are converted to plain sRGB by an external color
//! management tool (macOS `sips` by default) before the compositor ever sees
//! pixel data. The call is synchronous; a non-zero exit is fatal and carries
//! the tool's diagnostic output. No retries.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToneMapError {
    #[error("failed to launch `{tool}`: {source}")]
    Launch {
        tool: String,
        source: std::io::Error,
    },
    #[error("`{tool}` exited with status {status}: {stderr}")]
    Failed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Tone-map `src` into `dst` through `tool`, matching `profile`.
///
/// The destination must exist as a standard-RGB raster afterwards; the caller
/// treats it as the pipeline's source image.
pub fn tone_map(tool: &str, profile: &Path, src: &Path, dst: &Path) -> Result<(), ToneMapError> {
    let output = Command::new(tool)
        .arg("--matchTo")
        .arg(profile)
        .arg(src)
        .arg("--out")
        .arg(dst)
        .output()
        .map_err(|source| ToneMapError::Launch { tool: tool.into(), source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostic = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        } else {
            stderr.trim().to_string()
        };
        return Err(ToneMapError::Failed {
            tool: tool.into(),
            status: output.status,
            stderr: diagnostic,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tool_reports_launch_error() {
        let err = tone_map(
            "cardstock-no-such-tool",
            Path::new("/profile.icc"),
            Path::new("/src.png"),
            Path::new("/dst.png"),
        )
        .unwrap_err();
        assert!(matches!(err, ToneMapError::Launch { .. }));
    }

    #[test]
    fn nonzero_exit_carries_diagnostics() {
        // `false` is POSIX-guaranteed to exit non-zero and prints nothing;
        // the error must still identify the tool and status.
        let err = tone_map(
            "false",
            Path::new("/profile.icc"),
            Path::new("/src.png"),
            Path::new("/dst.png"),
        )
        .unwrap_err();
        match err {
            ToneMapError::Failed { tool, status, .. } => {
                assert_eq!(tool, "false");
                assert!(!status.success());
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
