// Data structures for camera frames handed to the hand landmarker

/// A captured camera frame
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub timestamp: i64,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl RawFrame {
    /// Solid black frame of the given size
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp_millis(),
            width,
            height,
            data: vec![0u8; format.frame_len(width, height)],
            format,
        }
    }
}

/// Pixel format of captured frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    RGB8,
    BGR8,
    RGBA8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::RGB8 | PixelFormat::BGR8 => 3,
            PixelFormat::RGBA8 => 4,
        }
    }

    /// Buffer size of a `width` x `height` frame
    pub fn frame_len(&self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_size() {
        let frame = RawFrame::blank(4, 3, PixelFormat::BGR8);
        assert_eq!(frame.data.len(), 4 * 3 * 3);
        assert!(frame.data.iter().all(|b| *b == 0));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_frame_len_does_not_wrap() {
        // 70000^2 overflows u32
        assert_eq!(PixelFormat::RGBA8.frame_len(70_000, 70_000), 19_600_000_000);
    }
}
