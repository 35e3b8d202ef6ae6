//! Adaptive-delta compression of animation samples.
//!
//! Samples are stored as an initial value followed by blocks of 16 quantized deltas. Each block
//! carries a `block_index` into [`DeltaScaleTable`] that scales its deltas. Quaternion channels
//! store one block stream per component.

use crate::chunk::array_size;
use crate::{ChannelType, ChannelValue, ChunkReader, ChunkWriter, Error};
use std::sync::LazyLock;

/// Samples covered by one delta block.
pub const DELTA_BLOCK_SAMPLES: usize = 16;

/// The 256 scale multipliers selectable by a block's `block_index`.
///
/// Entries `0..16` are `10^(i - 8)`; entries `16..256` follow `1 - sin(90° * i / 240)`.
#[derive(Clone, Debug)]
pub struct DeltaScaleTable {
    entries: [f32; 256],
}

static DELTA_SCALE_TABLE: LazyLock<DeltaScaleTable> = LazyLock::new(DeltaScaleTable::build);

/// Shared, lazily built scale table.
pub fn delta_scale_table() -> &'static DeltaScaleTable {
    &DELTA_SCALE_TABLE
}

impl DeltaScaleTable {
    fn build() -> Self {
        let mut entries = [0.0f32; 256];
        for (i, entry) in entries.iter_mut().take(16).enumerate() {
            *entry = 10f64.powi(i as i32 - 8) as f32;
        }
        for i in 0..240 {
            let angle = (90.0f64 * i as f64 / 240.0).to_radians();
            entries[16 + i] = (1.0 - angle.sin()) as f32;
        }
        Self { entries }
    }

    pub fn get(&self, block_index: u8) -> f32 {
        self.entries[block_index as usize]
    }

    pub fn as_slice(&self) -> &[f32; 256] {
        &self.entries
    }
}

/// Width of one quantized delta.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitWidth {
    Four,
    Eight,
}

impl BitWidth {
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Packed delta bytes per block.
    pub fn block_bytes(self) -> usize {
        self.bits() as usize * 2
    }

    /// Multiplier applied on top of the channel scale.
    pub fn scale_factor(self) -> f32 {
        match self {
            Self::Four => 1.0,
            Self::Eight => 1.0 / 16.0,
        }
    }

    fn delta_range(self) -> (f32, f32) {
        match self {
            Self::Four => (-8.0, 7.0),
            Self::Eight => (-128.0, 127.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveDeltaBlock {
    /// Component this block drives; implied by position on the wire.
    pub vector_index: u8,
    pub block_index: u8,
    /// Raw packed deltas, `bit_width.block_bytes()` long.
    pub delta_bytes: Vec<i8>,
}

impl AdaptiveDeltaBlock {
    pub fn deltas(&self, width: BitWidth) -> [i8; DELTA_BLOCK_SAMPLES] {
        unpack_deltas(&self.delta_bytes, width)
    }

    fn size(width: BitWidth) -> u32 {
        1 + width.block_bytes() as u32
    }
}

/// Expands packed block bytes into 16 signed deltas.
///
/// Four-bit blocks hold two nibbles per byte, low nibble first; nibbles `>= 8` are negative.
pub fn unpack_deltas(bytes: &[i8], width: BitWidth) -> [i8; DELTA_BLOCK_SAMPLES] {
    let mut out = [0i8; DELTA_BLOCK_SAMPLES];
    match width {
        BitWidth::Four => {
            for (i, &byte) in bytes.iter().take(DELTA_BLOCK_SAMPLES / 2).enumerate() {
                let byte = byte as u8;
                out[i * 2] = sign_extend_nibble(byte & 0x0F);
                out[i * 2 + 1] = sign_extend_nibble(byte >> 4);
            }
        }
        BitWidth::Eight => {
            for (slot, &byte) in out.iter_mut().zip(bytes) {
                *slot = byte;
            }
        }
    }
    out
}

fn sign_extend_nibble(nibble: u8) -> i8 {
    if nibble >= 8 {
        nibble as i8 - 16
    } else {
        nibble as i8
    }
}

/// Inverse of [`unpack_deltas`]. Four-bit deltas must lie in `-8..=7`.
pub fn pack_deltas(deltas: &[i8; DELTA_BLOCK_SAMPLES], width: BitWidth) -> Vec<i8> {
    match width {
        BitWidth::Four => deltas
            .chunks_exact(2)
            .map(|pair| ((pair[0] as u8 & 0x0F) | ((pair[1] as u8 & 0x0F) << 4)) as i8)
            .collect(),
        BitWidth::Eight => deltas.to_vec(),
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveDeltaData {
    pub initial_value: ChannelValue,
    pub bit_width: BitWidth,
    /// Runs of `vector_len` blocks, one run per 16-sample window.
    pub blocks: Vec<AdaptiveDeltaBlock>,
}

impl AdaptiveDeltaData {
    /// Number of blocks needed for `num_samples` samples.
    pub fn block_count(num_samples: usize, vector_len: usize) -> usize {
        num_samples.div_ceil(DELTA_BLOCK_SAMPLES) * vector_len
    }

    pub fn vector_len(&self) -> usize {
        self.initial_value.vector_len()
    }

    pub fn size(&self) -> u32 {
        let blocks = array_size(self.blocks.len(), AdaptiveDeltaBlock::size(self.bit_width));
        self.initial_value.size().saturating_add(blocks)
    }

    pub(crate) fn read(
        reader: &mut ChunkReader<'_>,
        num_samples: usize,
        channel_type: ChannelType,
        bit_width: BitWidth,
    ) -> Result<Self, Error> {
        let initial_value = channel_type.read_value(reader)?;
        let vector_len = channel_type.vector_len() as usize;
        let windows = Self::block_count(num_samples, 1);
        let count = reader.check_count(
            windows.saturating_mul(vector_len),
            AdaptiveDeltaBlock::size(bit_width) as usize,
        )?;
        let mut blocks = Vec::with_capacity(count);
        for _ in 0..windows {
            for vector_index in 0..vector_len {
                let block_index = reader.read_u8()?;
                let delta_bytes = reader
                    .read_bytes(bit_width.block_bytes())?
                    .iter()
                    .map(|&b| b as i8)
                    .collect();
                blocks.push(AdaptiveDeltaBlock {
                    vector_index: vector_index as u8,
                    block_index,
                    delta_bytes,
                });
            }
        }
        Ok(Self {
            initial_value,
            bit_width,
            blocks,
        })
    }

    pub(crate) fn write(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        self.initial_value.write(writer);
        let expected = self.bit_width.block_bytes();
        for block in &self.blocks {
            if block.delta_bytes.len() != expected {
                return Err(Error::invalid_value(format!(
                    "delta block holds {} bytes, expected {expected} for {}-bit deltas",
                    block.delta_bytes.len(),
                    self.bit_width.bits()
                )));
            }
            writer.write_u8(block.block_index);
            for &b in &block.delta_bytes {
                writer.write_i8(b);
            }
        }
        Ok(())
    }

    /// Reconstructs `num_samples` values.
    ///
    /// Scalar channels add each scaled delta to the previous sample. Quaternion channels keep a
    /// block stream per component: block `vector_index` updates scalar-first component
    /// `(vector_index + 1) % 4` and carries the other three forward from the previous sample.
    pub fn decode(&self, num_samples: usize, scale: f32) -> Vec<ChannelValue> {
        if num_samples == 0 {
            return Vec::new();
        }
        let table = delta_scale_table();
        let vector_len = self.vector_len();
        let scale_factor = self.bit_width.scale_factor();

        let mut out = vec![self.initial_value; num_samples];
        let mut written = vec![false; num_samples];
        written[0] = true;

        for (i, block) in self.blocks.iter().enumerate() {
            let delta_scale = scale * scale_factor * table.get(block.block_index);
            let deltas = block.deltas(self.bit_width);
            for (j, &delta) in deltas.iter().enumerate() {
                let target = (i / vector_len) * DELTA_BLOCK_SAMPLES + j + 1;
                if target >= num_samples {
                    break;
                }
                let previous = out[target - 1];
                out[target] = match previous {
                    ChannelValue::Scalar(v) => ChannelValue::Scalar(v + delta_scale * delta as f32),
                    ChannelValue::Rotation(prev) => {
                        let mut q = match out[target] {
                            ChannelValue::Rotation(q) if written[target] => q,
                            _ => prev,
                        };
                        let component = (block.vector_index as usize + 1) % 4;
                        *q.component_mut(component) =
                            prev.component(component) + delta_scale * delta as f32;
                        ChannelValue::Rotation(q)
                    }
                };
                written[target] = true;
            }
        }

        // Samples with no covering block hold the last decoded value.
        for t in 1..num_samples {
            if !written[t] {
                out[t] = out[t - 1];
            }
        }
        out
    }

    /// Compresses `values` and returns the channel scale together with the block data.
    ///
    /// The scale maps the largest step between consecutive samples onto the largest
    /// representable delta. Every block then picks the table entry with the smallest squared
    /// reconstruction error, quantizing against already reconstructed values so that error does
    /// not accumulate across the channel.
    pub fn encode(values: &[ChannelValue], bit_width: BitWidth) -> Result<(f32, Self), Error> {
        let Some(&initial_value) = values.first() else {
            return Err(Error::invalid_value("cannot compress an empty channel"));
        };
        let vector_len = initial_value.vector_len();
        if values.iter().any(|v| v.vector_len() != vector_len) {
            return Err(Error::invalid_value(
                "adaptive-delta channel mixes scalar and rotation samples",
            ));
        }

        let component = |t: usize, c: usize| -> f32 {
            match values[t] {
                ChannelValue::Scalar(v) => v,
                ChannelValue::Rotation(q) => q.component((c + 1) % 4),
            }
        };

        let mut max_step = 0.0f32;
        for t in 1..values.len() {
            for c in 0..vector_len {
                max_step = max_step.max((component(t, c) - component(t - 1, c)).abs());
            }
        }
        let (_, max_delta) = bit_width.delta_range();
        let scale = if max_step.is_finite() && max_step > 0.0 {
            max_step / (max_delta * bit_width.scale_factor())
        } else {
            0.0
        };

        let num_samples = values.len();
        let windows = Self::block_count(num_samples, 1);
        let mut reconstructed: Vec<f32> = (0..vector_len).map(|c| component(0, c)).collect();
        let mut blocks = Vec::with_capacity(windows * vector_len);

        for window in 0..windows {
            for (c, start) in reconstructed.iter_mut().enumerate() {
                let targets: Vec<f32> = (0..DELTA_BLOCK_SAMPLES)
                    .map(|j| window * DELTA_BLOCK_SAMPLES + j + 1)
                    .take_while(|&t| t < num_samples)
                    .map(|t| component(t, c))
                    .collect();
                let (block_index, deltas, end) = fit_block(*start, &targets, scale, bit_width);
                *start = end;
                blocks.push(AdaptiveDeltaBlock {
                    vector_index: c as u8,
                    block_index,
                    delta_bytes: pack_deltas(&deltas, bit_width),
                });
            }
        }

        Ok((
            scale,
            Self {
                initial_value,
                bit_width,
                blocks,
            },
        ))
    }
}

/// Neutral table entry (multiplier 1.0) used when every delta is zero.
const UNIT_BLOCK_INDEX: u8 = 16;

/// Picks the table entry that best reproduces `targets` starting from `start`.
///
/// Returns the entry, the quantized deltas and the last reconstructed value.
fn fit_block(
    start: f32,
    targets: &[f32],
    scale: f32,
    bit_width: BitWidth,
) -> (u8, [i8; DELTA_BLOCK_SAMPLES], f32) {
    let table = delta_scale_table();
    let mut best: Option<(f32, u8, [i8; DELTA_BLOCK_SAMPLES], f32)> = None;

    if scale > 0.0 {
        for index in 0..=255u8 {
            let step = scale * bit_width.scale_factor() * table.get(index);
            if !step.is_finite() || step <= 0.0 {
                continue;
            }
            let (deltas, end, error) = quantize(start, targets, step, bit_width);
            if best.as_ref().is_none_or(|(best_error, ..)| error < *best_error) {
                best = Some((error, index, deltas, end));
            }
        }
    }

    match best {
        Some((_, index, deltas, end)) => (index, deltas, end),
        None => (UNIT_BLOCK_INDEX, [0; DELTA_BLOCK_SAMPLES], start),
    }
}

fn quantize(
    start: f32,
    targets: &[f32],
    step: f32,
    bit_width: BitWidth,
) -> ([i8; DELTA_BLOCK_SAMPLES], f32, f32) {
    let (min, max) = bit_width.delta_range();
    let mut deltas = [0i8; DELTA_BLOCK_SAMPLES];
    let mut previous = start;
    let mut error = 0.0f32;
    for (slot, &target) in deltas.iter_mut().zip(targets) {
        let q = ((target - previous) / step).round().clamp(min, max);
        *slot = q as i8;
        previous += step * q;
        let diff = target - previous;
        error += diff * diff;
    }
    (deltas, previous, error)
}
