use anyhow::Result;
use tracing::debug;

use crate::clipboard::ClipboardSink;

/// Provider of the currently rendered caption segment texts, in document
/// order. The real implementation reads a player page; tests inject a fake.
pub trait CaptionSource {
    fn segments(&self) -> Result<Vec<String>>;
}

/// Result of one copy invocation, kept so the caller can report what landed
/// on the clipboard.
#[derive(Debug, Clone)]
pub struct CopyOutcome {
    pub transcript: String,
    pub segment_count: usize,
}

/// Join caption segments with a single ASCII space, preserving order.
///
/// N segments produce exactly N-1 separators; an empty slice produces the
/// empty string. Whitespace inside a segment is never touched.
pub fn combine(segments: &[String]) -> String {
    segments.join(" ")
}

/// Extract the current captions from `source` and place the combined
/// transcript on `sink`, overwriting whatever was there.
///
/// An empty match set is not an error: the empty transcript is still written.
/// A clipboard failure propagates to the caller so success is never reported
/// blindly.
pub fn copy_captions(
    source: &dyn CaptionSource,
    sink: &mut dyn ClipboardSink,
) -> Result<CopyOutcome> {
    let segments = source.segments()?;
    let transcript = combine(&segments);

    debug!(
        segment_count = segments.len(),
        transcript_len = transcript.len(),
        "writing transcript to clipboard"
    );

    sink.write_text(&transcript)?;

    Ok(CopyOutcome {
        transcript,
        segment_count: segments.len(),
    })
}
