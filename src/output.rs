//! CLI output formatting for pipeline runs.
//!
//! One header line per run with the geometry that matters, then indented
//! context lines for the stages that did something. Formatting is separated
//! from printing so tests can assert on the rendered lines.

use crate::pipeline::RunSummary;

/// Render the run summary as display lines.
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Saved {} ({}x{}px @ {} dpi)",
        summary.output.display(),
        summary.canvas.0,
        summary.canvas.1,
        summary.dpi
    ));
    lines.push(format!(
        "    Source: {} ({}x{}px{})",
        summary.input.display(),
        summary.source.0,
        summary.source.1,
        if summary.tonemapped { ", tone-mapped to sRGB" } else { "" }
    ));
    lines.push(format!(
        "    Crop: {}x{}px at ({}, {}), border {}px",
        summary.crop.width(),
        summary.crop.height(),
        summary.crop.x0,
        summary.crop.y0,
        summary.margin_px
    ));
    if summary.shadow_applied {
        lines.push("    Shadow: applied".to_string());
    }
    if let Some(caption) = &summary.caption {
        let sizing = if caption.degraded {
            " (did not fit, emitted at minimum)"
        } else if caption.auto_fitted {
            " (auto-fit)"
        } else {
            ""
        };
        lines.push(format!(
            "    Caption: {} line(s) at {}pt{} via {}",
            caption.lines,
            caption.size,
            sizing,
            caption.font_path.display()
        ));
    }
    if !summary.finalize.dpi_tagged {
        lines.push("    Warning: resolution tags could not be written".to_string());
    }
    if !summary.finalize.icc_embedded {
        lines.push("    Note: no ICC profile embedded".to_string());
    }
    lines
}

/// Print the summary for one completed run.
pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::CropRegion;
    use crate::finalize::FinalizeReport;
    use std::path::PathBuf;

    fn summary() -> RunSummary {
        RunSummary {
            input: PathBuf::from("boxwork.png"),
            output: PathBuf::from("postcard.tif"),
            source: (3000, 4000),
            crop: CropRegion { x0: 167, y0: 0, x1: 2833, y1: 4000 },
            canvas: (2726, 4060),
            margin_px: 30,
            dpi: 300,
            tonemapped: true,
            shadow_applied: true,
            caption: None,
            finalize: FinalizeReport { icc_embedded: true, dpi_tagged: true },
        }
    }

    #[test]
    fn header_carries_size_and_dpi() {
        let lines = format_run_summary(&summary());
        assert_eq!(lines[0], "Saved postcard.tif (2726x4060px @ 300 dpi)");
        assert!(lines.iter().any(|l| l.contains("tone-mapped")));
        assert!(lines.iter().any(|l| l.contains("Shadow: applied")));
    }

    #[test]
    fn degraded_caption_is_called_out() {
        let mut s = summary();
        s.caption = Some(crate::caption::CaptionReport {
            size: 6,
            auto_fitted: true,
            degraded: true,
            font_path: PathBuf::from("/fonts/a.ttf"),
            lines: 2,
        });
        let lines = format_run_summary(&s);
        assert!(lines.iter().any(|l| l.contains("did not fit")));
    }

    #[test]
    fn missing_metadata_downgrades_to_warnings() {
        let mut s = summary();
        s.finalize = FinalizeReport { icc_embedded: false, dpi_tagged: false };
        let lines = format_run_summary(&s);
        assert!(lines.iter().any(|l| l.contains("resolution tags")));
        assert!(lines.iter().any(|l| l.contains("ICC")));
    }
}
