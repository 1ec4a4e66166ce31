//! Annex-B access unit inspection for H.264 and H.265 streams.

use image::PixelFormat;

const H264_NAL_IDR: u8 = 5;
const H265_NAL_IRAP_FIRST: u8 = 16;
const H265_NAL_IRAP_LAST: u8 = 21;

/// Iterate over the NAL unit payloads of an Annex-B byte stream. Both
/// 3-byte and 4-byte start codes are accepted; bytes before the first start
/// code are ignored.
pub fn nal_units(data: &[u8]) -> NalUnits<'_> {
    NalUnits {
        data,
        position: find_start_code(data, 0),
    }
}

pub struct NalUnits<'a> {
    data: &'a [u8],
    position: Option<(usize, usize)>,
}

impl<'a> Iterator for NalUnits<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let (_, payload) = self.position?;
        let next = find_start_code(self.data, payload);
        let end = match next {
            Some((start, _)) => start,
            None => self.data.len(),
        };
        self.position = next;
        Some(&self.data[payload..end])
    }
}

// returns (start code offset, payload offset)
fn find_start_code(data: &[u8], from: usize) -> Option<(usize, usize)> {
    let mut i = from;
    while i + 3 <= data.len() {
        if data[i] == 0 && data[i + 1] == 0 {
            if data[i + 2] == 1 {
                return Some((i, i + 3));
            }
            if data[i + 2] == 0 && data.get(i + 3) == Some(&1) {
                return Some((i, i + 4));
            }
        }
        i += 1;
    }
    None
}

pub fn h264_nal_type(nal: &[u8]) -> Option<u8> {
    nal.first().map(|header| header & 0x1F)
}

pub fn h265_nal_type(nal: &[u8]) -> Option<u8> {
    nal.first().map(|header| (header >> 1) & 0x3F)
}

/// Does this access unit start a decodable sequence?
///
/// Always true for formats without inter-frame prediction.
pub fn is_keyframe(format: PixelFormat, data: &[u8]) -> bool {
    match format {
        PixelFormat::H264 => nal_units(data)
            .filter_map(h264_nal_type)
            .any(|nal_type| nal_type == H264_NAL_IDR),
        PixelFormat::H265 => nal_units(data)
            .filter_map(h265_nal_type)
            .any(|nal_type| (H265_NAL_IRAP_FIRST..=H265_NAL_IRAP_LAST).contains(&nal_type)),
        _ => true,
    }
}

/// Holds back a compressed stream until its first keyframe.
#[derive(Debug, Clone)]
pub struct KeyframeGate {
    enabled: bool,
    seen: bool,
}

impl KeyframeGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            seen: false,
        }
    }

    /// Returns whether an access unit may pass. Once a keyframe has been
    /// seen every later unit passes.
    pub fn admit(&mut self, format: PixelFormat, data: &[u8]) -> bool {
        if !self.enabled || self.seen || !format.is_video_codec() {
            return true;
        }
        self.seen = is_keyframe(format, data);
        self.seen
    }

    pub fn has_seen_keyframe(&self) -> bool {
        self.seen
    }

    pub fn reset(&mut self) {
        self.seen = false;
    }
}
