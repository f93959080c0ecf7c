// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Animation metadata attached to decoded animated images. Pure data; no
//! container parsing happens here.

/// Frame encoding variant of an animated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Lossless,
    Lossy,
}

/// RGBA background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Format-independent animation descriptor, as produced by a generic
/// container parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationInfo {
    /// Number of times the animation repeats; 0 means forever.
    pub loop_count: u16,
    /// Canvas color behind and between frames.
    pub background_color: Rgba,
}

/// Animation metadata carried by a decoded image. Clones are fully
/// independent: every field is a plain value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationMetadata {
    /// Encoding variant of the frames, when known.
    pub format: Option<FrameFormat>,
    /// Number of times the animation repeats; 0 means forever.
    pub loop_count: u16,
    /// Canvas color behind and between frames.
    pub background_color: Rgba,
}

impl Default for AnimationMetadata {
    fn default() -> Self {
        AnimationMetadata {
            format: None,
            loop_count: 1,
            background_color: Rgba::default(),
        }
    }
}

impl AnimationMetadata {
    /// Derives metadata from a generic descriptor. Frames reconstructed
    /// through this path are always losslessly coded, so the format tag
    /// is fixed accordingly.
    pub fn from_info(info: &AnimationInfo) -> AnimationMetadata {
        AnimationMetadata {
            format: Some(FrameFormat::Lossless),
            loop_count: info.loop_count,
            background_color: info.background_color,
        }
    }
}
