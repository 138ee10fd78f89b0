// SPDX-License-Identifier: MPL-2.0
//! YUV 4:2:0 to RGB conversion for viewfinder frames.

use crate::error::{Error, Result};

/// Expected byte length of a planar YUV 4:2:0 (I420) frame.
#[must_use]
pub fn yuv420_frame_len(width: u32, height: u32) -> usize {
    let (w, h) = (width as usize, height as usize);
    w * h + 2 * (w.div_ceil(2) * h.div_ceil(2))
}

/// Converts a planar I420 frame to packed RGB24 (BT.601, limited range).
///
/// Extra trailing bytes are ignored (some drivers pad their buffers).
///
/// # Errors
///
/// Returns [`Error::InvalidFrame`] when `raw` is shorter than the frame.
pub fn yuv420_to_rgb(raw: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let expected = yuv420_frame_len(width, height);
    if raw.len() < expected {
        return Err(Error::InvalidFrame {
            expected,
            actual: raw.len(),
        });
    }

    let (w, h) = (width as usize, height as usize);
    let chroma_w = w.div_ceil(2);
    let chroma_len = chroma_w * h.div_ceil(2);
    let (luma, rest) = raw.split_at(w * h);
    let (u_plane, v_plane) = rest.split_at(chroma_len);

    let mut rgb = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            let c = i32::from(luma[y * w + x]) - 16;
            let chroma_index = (y / 2) * chroma_w + x / 2;
            let d = i32::from(u_plane[chroma_index]) - 128;
            let e = i32::from(v_plane[chroma_index]) - 128;

            rgb.push(clamp((298 * c + 409 * e + 128) >> 8));
            rgb.push(clamp((298 * c - 100 * d - 208 * e + 128) >> 8));
            rgb.push(clamp((298 * c + 516 * d + 128) >> 8));
        }
    }
    Ok(rgb)
}

fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}
