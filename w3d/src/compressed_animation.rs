//! Compressed animation: sparse time-coded keys, adaptive-delta streams and motion channels.

use crate::chunk::{Chunk, ChunkHeader, array_size, children_size, read_chunks, sum_sizes, tags};
use crate::channel::{join_time_code, split_time_code};
use crate::delta::{AdaptiveDeltaData, BitWidth, DELTA_BLOCK_SAMPLES};
use crate::version::COMPRESSED_ANIMATION_VERSION;
use crate::{BitChannelType, ChannelType, ChannelValue, ChunkReader, ChunkWriter, Error, Version};

/// Payload layout of every `COMPRESSED_ANIMATION_CHANNEL` in an animation.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimationFlavor {
    #[default]
    TimeCoded,
    AdaptiveDelta4,
    AdaptiveDelta8,
}

impl AnimationFlavor {
    pub fn from_raw(value: u32, offset: usize) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::TimeCoded),
            1 => Ok(Self::AdaptiveDelta4),
            2 => Ok(Self::AdaptiveDelta8),
            _ => Err(Error::InvalidDiscriminant {
                field: "animation flavor",
                value,
                offset,
            }),
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            Self::TimeCoded => 0,
            Self::AdaptiveDelta4 => 1,
            Self::AdaptiveDelta8 => 2,
        }
    }

    pub fn bit_width(self) -> Option<BitWidth> {
        match self {
            Self::TimeCoded => None,
            Self::AdaptiveDelta4 => Some(BitWidth::Four),
            Self::AdaptiveDelta8 => Some(BitWidth::Eight),
        }
    }

    pub fn from_bit_width(width: Option<BitWidth>) -> Self {
        match width {
            None => Self::TimeCoded,
            Some(BitWidth::Four) => Self::AdaptiveDelta4,
            Some(BitWidth::Eight) => Self::AdaptiveDelta8,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressedAnimationHeader {
    pub version: Version,
    pub name: String,
    pub hierarchy_name: String,
    pub num_frames: u32,
    pub frame_rate: u16,
    pub flavor: AnimationFlavor,
}

impl Default for CompressedAnimationHeader {
    fn default() -> Self {
        Self {
            version: COMPRESSED_ANIMATION_VERSION,
            name: String::new(),
            hierarchy_name: String::new(),
            num_frames: 0,
            frame_rate: 30,
            flavor: AnimationFlavor::TimeCoded,
        }
    }
}

impl Chunk for CompressedAnimationHeader {
    fn body_size(&self) -> u32 {
        44
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        let version = Version::read(reader)?;
        let name = reader.read_name()?;
        let hierarchy_name = reader.read_name()?;
        let num_frames = reader.read_u32()?;
        let frame_rate = reader.read_u16()?;
        let flavor_offset = reader.position();
        let flavor = AnimationFlavor::from_raw(reader.read_u16()? as u32, flavor_offset)?;
        Ok(Self {
            version,
            name,
            hierarchy_name,
            num_frames,
            frame_rate,
            flavor,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        self.version.write(writer);
        writer.write_name(&self.name);
        writer.write_name(&self.hierarchy_name);
        writer.write_u32(self.num_frames);
        writer.write_u16(self.frame_rate);
        writer.write_u16(self.flavor.to_raw());
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeCodedKey {
    pub time_code: u32,
    pub value: ChannelValue,
    /// Hold the value until the next key instead of interpolating.
    pub non_interpolated: bool,
}

/// Sparse channel storing only keyed frames.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeCodedAnimationChannel {
    pub channel_type: ChannelType,
    pub pivot: u16,
    pub keys: Vec<TimeCodedKey>,
}

impl Chunk for TimeCodedAnimationChannel {
    fn body_size(&self) -> u32 {
        array_size(self.keys.len(), 4 + self.channel_type.value_size()).saturating_add(8)
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        let num_time_codes = reader.read_u32()?;
        let pivot = reader.read_u16()?;
        let vector_len = reader.read_u8()?;
        let type_offset = reader.position();
        let channel_type = ChannelType::from_raw(reader.read_u8()? as u32, type_offset)?;
        channel_type.check_vector_len(vector_len as u32)?;

        let key_size = 4 + channel_type.value_size() as usize;
        let mut keys = Vec::with_capacity(reader.check_count(num_time_codes as usize, key_size)?);
        for _ in 0..num_time_codes {
            let (time_code, non_interpolated) = split_time_code(reader.read_u32()?);
            keys.push(TimeCodedKey {
                time_code,
                value: channel_type.read_value(reader)?,
                non_interpolated,
            });
        }
        Ok(Self {
            channel_type,
            pivot,
            keys,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_u32(self.keys.len() as u32);
        writer.write_u16(self.pivot);
        writer.write_u8(self.channel_type.vector_len());
        writer.write_u8(self.channel_type.to_raw());
        for key in &self.keys {
            self.channel_type.check_value(&key.value)?;
            writer.write_u32(join_time_code(key.time_code, key.non_interpolated));
            key.value.write(writer);
        }
        Ok(())
    }
}

/// Channel whose samples are packed as adaptive-delta blocks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveDeltaAnimationChannel {
    pub num_time_codes: u32,
    pub channel_type: ChannelType,
    pub pivot: u16,
    pub scale: f32,
    pub data: AdaptiveDeltaData,
}

const ADAPTIVE_DELTA_PADDING: u32 = 3;

impl AdaptiveDeltaAnimationChannel {
    /// Compresses dense per-frame samples.
    pub fn from_samples(
        channel_type: ChannelType,
        pivot: u16,
        samples: &[ChannelValue],
        bit_width: BitWidth,
    ) -> Result<Self, Error> {
        for sample in samples {
            channel_type.check_value(sample)?;
        }
        let (scale, data) = AdaptiveDeltaData::encode(samples, bit_width)?;
        Ok(Self {
            num_time_codes: samples.len() as u32,
            channel_type,
            pivot,
            scale,
            data,
        })
    }

    /// Decompresses to one value per frame.
    pub fn samples(&self) -> Vec<ChannelValue> {
        self.data.decode(self.num_time_codes as usize, self.scale)
    }

    pub(crate) fn read_with_width(
        reader: &mut ChunkReader<'_>,
        bit_width: BitWidth,
    ) -> Result<Self, Error> {
        let num_time_codes = reader.read_u32()?;
        let pivot = reader.read_u16()?;
        let vector_len = reader.read_u8()?;
        let type_offset = reader.position();
        let channel_type = ChannelType::from_raw(reader.read_u8()? as u32, type_offset)?;
        channel_type.check_vector_len(vector_len as u32)?;
        let scale = reader.read_f32()?;
        let data =
            AdaptiveDeltaData::read(reader, num_time_codes as usize, channel_type, bit_width)?;
        reader.read_bytes(ADAPTIVE_DELTA_PADDING as usize)?;
        Ok(Self {
            num_time_codes,
            channel_type,
            pivot,
            scale,
            data,
        })
    }
}

/// Works out the delta width of a standalone adaptive-delta body from its declared size.
fn infer_bit_width(reader: &ChunkReader<'_>, header: &ChunkHeader) -> Result<BitWidth, Error> {
    let mut peek = reader.clone();
    let num_time_codes = u64::from(peek.read_u32()?);
    let _pivot = peek.read_u16()?;
    let vector_len = u64::from(peek.read_u8()?);
    let blocks = num_time_codes.div_ceil(DELTA_BLOCK_SAMPLES as u64) * vector_len;
    let fixed = 12 + vector_len * 4 + u64::from(ADAPTIVE_DELTA_PADDING);
    [BitWidth::Four, BitWidth::Eight]
        .into_iter()
        .find(|w| fixed + blocks * (1 + w.block_bytes() as u64) == u64::from(header.size))
        .ok_or_else(|| {
            Error::invalid_value(format!(
                "adaptive-delta body of {} bytes matches neither 4- nor 8-bit deltas",
                header.size
            ))
        })
}

impl Chunk for AdaptiveDeltaAnimationChannel {
    fn body_size(&self) -> u32 {
        sum_sizes([12, self.data.size(), ADAPTIVE_DELTA_PADDING])
    }

    /// The delta width is not stored in the channel itself; standalone bodies derive it from
    /// the declared size. Inside an animation the header's flavor decides.
    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        let bit_width = infer_bit_width(reader, header)?;
        Self::read_with_width(reader, bit_width)
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        self.channel_type.check_value(&self.data.initial_value)?;
        let expected = AdaptiveDeltaData::block_count(
            self.num_time_codes as usize,
            self.channel_type.vector_len() as usize,
        );
        if self.data.blocks.len() != expected {
            return Err(Error::invalid_value(format!(
                "{} samples need {expected} delta blocks, channel holds {}",
                self.num_time_codes,
                self.data.blocks.len()
            )));
        }
        writer.write_u32(self.num_time_codes);
        writer.write_u16(self.pivot);
        writer.write_u8(self.channel_type.vector_len());
        writer.write_u8(self.channel_type.to_raw());
        writer.write_f32(self.scale);
        self.data.write(writer)?;
        writer.write_zeros(ADAPTIVE_DELTA_PADDING as usize);
        Ok(())
    }
}

/// The two layouts a `COMPRESSED_ANIMATION_CHANNEL` chunk can take.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressedAnimationChannel {
    TimeCoded(TimeCodedAnimationChannel),
    AdaptiveDelta(AdaptiveDeltaAnimationChannel),
}

impl CompressedAnimationChannel {
    pub fn pivot(&self) -> u16 {
        match self {
            Self::TimeCoded(c) => c.pivot,
            Self::AdaptiveDelta(c) => c.pivot,
        }
    }

    pub fn channel_type(&self) -> ChannelType {
        match self {
            Self::TimeCoded(c) => c.channel_type,
            Self::AdaptiveDelta(c) => c.channel_type,
        }
    }

    fn flavor(&self) -> AnimationFlavor {
        match self {
            Self::TimeCoded(_) => AnimationFlavor::TimeCoded,
            Self::AdaptiveDelta(c) => AnimationFlavor::from_bit_width(Some(c.data.bit_width)),
        }
    }

    fn read_with_flavor(
        reader: &mut ChunkReader<'_>,
        header: &ChunkHeader,
        flavor: AnimationFlavor,
    ) -> Result<Self, Error> {
        match flavor.bit_width() {
            None => Ok(Self::TimeCoded(TimeCodedAnimationChannel::read_body(
                reader, header,
            )?)),
            Some(width) => Ok(Self::AdaptiveDelta(
                AdaptiveDeltaAnimationChannel::read_with_width(reader, width)?,
            )),
        }
    }
}

impl Chunk for CompressedAnimationChannel {
    fn body_size(&self) -> u32 {
        match self {
            Self::TimeCoded(c) => c.body_size(),
            Self::AdaptiveDelta(c) => c.body_size(),
        }
    }

    /// Without a header to consult, a body is taken as adaptive-delta when its size fits that
    /// layout and as time-coded otherwise.
    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        match infer_bit_width(reader, header) {
            Ok(width) => Ok(Self::AdaptiveDelta(
                AdaptiveDeltaAnimationChannel::read_with_width(reader, width)?,
            )),
            Err(_) => Ok(Self::TimeCoded(TimeCodedAnimationChannel::read_body(
                reader, header,
            )?)),
        }
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        match self {
            Self::TimeCoded(c) => c.write_body(writer),
            Self::AdaptiveDelta(c) => c.write_body(writer),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeCodedBitKey {
    pub time_code: u32,
    pub value: bool,
}

/// Sparse boolean channel; bit 31 of each time code carries the value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeCodedBitChannel {
    pub channel_type: BitChannelType,
    pub pivot: u16,
    /// Value used for frames before the first key.
    pub default_value: bool,
    pub keys: Vec<TimeCodedBitKey>,
}

impl TimeCodedBitChannel {
    /// Value in effect at `frame`: the latest key at or before it, else the default.
    pub fn value_at(&self, frame: u32) -> bool {
        self.keys
            .iter()
            .take_while(|k| k.time_code <= frame)
            .last()
            .map_or(self.default_value, |k| k.value)
    }
}

impl Chunk for TimeCodedBitChannel {
    fn body_size(&self) -> u32 {
        array_size(self.keys.len(), 4).saturating_add(8)
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        let num_time_codes = reader.read_u32()?;
        let pivot = reader.read_u16()?;
        let type_offset = reader.position();
        let channel_type = BitChannelType::from_raw(reader.read_u8()? as u32, type_offset)?;
        let default_value = reader.read_u8()? != 0;
        let mut keys = Vec::with_capacity(reader.check_count(num_time_codes as usize, 4)?);
        for _ in 0..num_time_codes {
            let (time_code, value) = split_time_code(reader.read_u32()?);
            keys.push(TimeCodedBitKey { time_code, value });
        }
        Ok(Self {
            channel_type,
            pivot,
            default_value,
            keys,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_u32(self.keys.len() as u32);
        writer.write_u16(self.pivot);
        writer.write_u8(self.channel_type.to_raw());
        writer.write_u8(self.default_value as u8);
        for key in &self.keys {
            writer.write_u32(join_time_code(key.time_code, key.value));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionKey {
    pub time_code: u16,
    pub value: ChannelValue,
}

/// Payload of a motion channel, selected by its `delta_type`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionChannelData {
    TimeCoded(Vec<MotionKey>),
    AdaptiveDelta { scale: f32, data: AdaptiveDeltaData },
}

impl MotionChannelData {
    fn delta_type(&self) -> u8 {
        match self {
            Self::TimeCoded(_) => 0,
            Self::AdaptiveDelta { data, .. } => match data.bit_width {
                BitWidth::Four => 1,
                BitWidth::Eight => 2,
            },
        }
    }
}

fn motion_count(len: usize) -> Result<u16, Error> {
    u16::try_from(len).map_err(|_| {
        Error::invalid_value(format!(
            "motion channels hold at most {} keys or samples, got {len}",
            u16::MAX
        ))
    })
}

/// Per-pivot channel carrying its own layout discriminant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionChannel {
    pub channel_type: ChannelType,
    pub pivot: u16,
    /// Key count for time-coded payloads, sample count for adaptive-delta payloads.
    pub num_time_codes: u16,
    pub data: MotionChannelData,
}

impl MotionChannel {
    pub fn time_coded(
        channel_type: ChannelType,
        pivot: u16,
        keys: Vec<MotionKey>,
    ) -> Result<Self, Error> {
        Ok(Self {
            channel_type,
            pivot,
            num_time_codes: motion_count(keys.len())?,
            data: MotionChannelData::TimeCoded(keys),
        })
    }

    pub fn adaptive_delta(
        channel_type: ChannelType,
        pivot: u16,
        samples: &[ChannelValue],
        bit_width: BitWidth,
    ) -> Result<Self, Error> {
        for sample in samples {
            channel_type.check_value(sample)?;
        }
        let num_time_codes = motion_count(samples.len())?;
        let (scale, data) = AdaptiveDeltaData::encode(samples, bit_width)?;
        Ok(Self {
            channel_type,
            pivot,
            num_time_codes,
            data: MotionChannelData::AdaptiveDelta { scale, data },
        })
    }

    /// Decompressed per-frame samples, or `None` for time-coded payloads.
    pub fn samples(&self) -> Option<Vec<ChannelValue>> {
        match &self.data {
            MotionChannelData::TimeCoded(_) => None,
            MotionChannelData::AdaptiveDelta { scale, data } => {
                Some(data.decode(self.num_time_codes as usize, *scale))
            }
        }
    }

    fn payload_size(&self) -> u32 {
        match &self.data {
            MotionChannelData::TimeCoded(keys) => {
                let pad = if keys.len() % 2 == 1 { 2 } else { 0 };
                sum_sizes([
                    array_size(keys.len(), 2),
                    pad,
                    array_size(keys.len(), self.channel_type.value_size()),
                ])
            }
            MotionChannelData::AdaptiveDelta { data, .. } => data.size().saturating_add(4),
        }
    }
}

impl Chunk for MotionChannel {
    fn body_size(&self) -> u32 {
        self.payload_size().saturating_add(8)
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        let _zero = reader.read_u8()?;
        let delta_offset = reader.position();
        let delta_type = reader.read_u8()?;
        let vector_len = reader.read_u8()?;
        let type_offset = reader.position();
        let channel_type = ChannelType::from_raw(reader.read_u8()? as u32, type_offset)?;
        channel_type.check_vector_len(vector_len as u32)?;
        let num_time_codes = reader.read_u16()?;
        let pivot = reader.read_u16()?;

        let data = match delta_type {
            0 => {
                let key_size = 2 + channel_type.value_size() as usize;
                let n = reader.check_count(num_time_codes as usize, key_size)?;
                let mut time_codes = Vec::with_capacity(n);
                for _ in 0..n {
                    time_codes.push(reader.read_u16()?);
                }
                if n % 2 == 1 {
                    let _align = reader.read_u16()?;
                }
                let mut keys = Vec::with_capacity(n);
                for time_code in time_codes {
                    keys.push(MotionKey {
                        time_code,
                        value: channel_type.read_value(reader)?,
                    });
                }
                MotionChannelData::TimeCoded(keys)
            }
            1 | 2 => {
                let width = if delta_type == 1 {
                    BitWidth::Four
                } else {
                    BitWidth::Eight
                };
                let scale = reader.read_f32()?;
                let data =
                    AdaptiveDeltaData::read(reader, num_time_codes as usize, channel_type, width)?;
                MotionChannelData::AdaptiveDelta { scale, data }
            }
            other => {
                return Err(Error::InvalidDiscriminant {
                    field: "motion channel delta type",
                    value: other as u32,
                    offset: delta_offset,
                });
            }
        };

        Ok(Self {
            channel_type,
            pivot,
            num_time_codes,
            data,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_u8(0);
        writer.write_u8(self.data.delta_type());
        writer.write_u8(self.channel_type.vector_len());
        writer.write_u8(self.channel_type.to_raw());
        writer.write_u16(self.num_time_codes);
        writer.write_u16(self.pivot);
        match &self.data {
            MotionChannelData::TimeCoded(keys) => {
                if keys.len() != self.num_time_codes as usize {
                    return Err(Error::invalid_value(format!(
                        "motion channel declares {} keys but holds {}",
                        self.num_time_codes,
                        keys.len()
                    )));
                }
                for key in keys {
                    writer.write_u16(key.time_code);
                }
                if keys.len() % 2 == 1 {
                    writer.write_u16(0);
                }
                for key in keys {
                    self.channel_type.check_value(&key.value)?;
                    key.value.write(writer);
                }
            }
            MotionChannelData::AdaptiveDelta { scale, data } => {
                self.channel_type.check_value(&data.initial_value)?;
                writer.write_f32(*scale);
                data.write(writer)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressedAnimation {
    pub header: CompressedAnimationHeader,
    pub channels: Vec<CompressedAnimationChannel>,
    pub bit_channels: Vec<TimeCodedBitChannel>,
    pub motion_channels: Vec<MotionChannel>,
}

impl Chunk for CompressedAnimation {
    const HAS_CHILDREN: bool = true;

    fn body_size(&self) -> u32 {
        sum_sizes([
            self.header.serialized_size(true),
            children_size(&self.channels),
            children_size(&self.bit_channels),
            children_size(&self.motion_channels),
        ])
    }

    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        let mut anim_header: Option<CompressedAnimationHeader> = None;
        let mut channels: Vec<CompressedAnimationChannel> = Vec::new();
        let mut bit_channels: Vec<TimeCodedBitChannel> = Vec::new();
        let mut motion_channels: Vec<MotionChannel> = Vec::new();
        read_chunks(reader, header.body_end, |reader, child| {
            match child.tag {
                tags::COMPRESSED_ANIMATION_HEADER => anim_header = Some(reader.read_chunk(child)?),
                tags::COMPRESSED_ANIMATION_CHANNEL => {
                    let flavor = anim_header
                        .as_ref()
                        .map(|h| h.flavor)
                        .ok_or(Error::MissingChunk {
                            container: tags::COMPRESSED_ANIMATION,
                            tag: tags::COMPRESSED_ANIMATION_HEADER,
                        })?;
                    channels.push(CompressedAnimationChannel::read_with_flavor(
                        reader, child, flavor,
                    )?);
                }
                tags::COMPRESSED_BIT_CHANNEL => bit_channels.push(reader.read_chunk(child)?),
                tags::COMPRESSED_ANIMATION_MOTION_CHANNEL => {
                    motion_channels.push(reader.read_chunk(child)?)
                }
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(Self {
            header: anim_header.ok_or(Error::MissingChunk {
                container: tags::COMPRESSED_ANIMATION,
                tag: tags::COMPRESSED_ANIMATION_HEADER,
            })?,
            channels,
            bit_channels,
            motion_channels,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_chunk(tags::COMPRESSED_ANIMATION_HEADER, &self.header)?;
        for channel in &self.channels {
            if channel.flavor() != self.header.flavor {
                return Err(Error::invalid_value(format!(
                    "{:?} channel for pivot {} does not match animation flavor {:?}",
                    channel.flavor(),
                    channel.pivot(),
                    self.header.flavor
                )));
            }
            writer.write_chunk(tags::COMPRESSED_ANIMATION_CHANNEL, channel)?;
        }
        for channel in &self.bit_channels {
            writer.write_chunk(tags::COMPRESSED_BIT_CHANNEL, channel)?;
        }
        for channel in &self.motion_channels {
            writer.write_chunk(tags::COMPRESSED_ANIMATION_MOTION_CHANNEL, channel)?;
        }
        Ok(())
    }
}
