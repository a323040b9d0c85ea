// Camera frame sources feeding the detection loop
// Real camera backends live outside this crate and implement `FrameSource`

use crate::models::capture::{PixelFormat, RawFrame};
use crate::models::pose::PoseResult;

/// Supplies frames to the detection feed
pub trait FrameSource: Send {
    /// Grab the next frame, or `None` when no new frame is available yet
    fn grab(&mut self) -> PoseResult<Option<RawFrame>>;
}

/// Repeats one blank frame with a fresh timestamp. Paired with the replay
/// landmarker, which ignores pixel data.
pub struct StillFrameSource {
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl StillFrameSource {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }
}

impl Default for StillFrameSource {
    fn default() -> Self {
        Self::new(640, 480, PixelFormat::BGR8)
    }
}

impl FrameSource for StillFrameSource {
    fn grab(&mut self) -> PoseResult<Option<RawFrame>> {
        Ok(Some(RawFrame::blank(self.width, self.height, self.format)))
    }
}
