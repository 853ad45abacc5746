//! Rendering boundary
//!
//! The crate does no drawing. A renderer receives one [`FrameSnapshot`] per
//! presented frame and turns it into pixels, text or a recording.

use std::io::{self, Write};

use crate::sim::snapshot::FrameSnapshot;

/// Consumer of per-frame snapshots
pub trait Renderer {
    fn present(&mut self, frame: &FrameSnapshot) -> io::Result<()>;
}

/// Writes each snapshot as a single line of JSON
pub struct JsonLinesRenderer<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, frames: 0 }
    }

    /// Frames written so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn present(&mut self, frame: &FrameSnapshot) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, frame)?;
        self.out.write_all(b"\n")?;
        self.frames += 1;
        Ok(())
    }
}
