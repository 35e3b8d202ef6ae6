//! Uncompressed animation: dense per-frame channels.

use crate::chunk::{Chunk, ChunkHeader, array_size, children_size, read_chunks, sum_sizes, tags};
use crate::version::ANIMATION_VERSION;
use crate::{BitChannelType, ChannelType, ChannelValue, ChunkReader, ChunkWriter, Error, Version};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationHeader {
    pub version: Version,
    pub name: String,
    pub hierarchy_name: String,
    pub num_frames: u32,
    pub frame_rate: u32,
}

impl Default for AnimationHeader {
    fn default() -> Self {
        Self {
            version: ANIMATION_VERSION,
            name: String::new(),
            hierarchy_name: String::new(),
            num_frames: 0,
            frame_rate: 30,
        }
    }
}

impl Chunk for AnimationHeader {
    fn body_size(&self) -> u32 {
        44
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        Ok(Self {
            version: Version::read(reader)?,
            name: reader.read_name()?,
            hierarchy_name: reader.read_name()?,
            num_frames: reader.read_u32()?,
            frame_rate: reader.read_u32()?,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        self.version.write(writer);
        writer.write_name(&self.name);
        writer.write_name(&self.hierarchy_name);
        writer.write_u32(self.num_frames);
        writer.write_u32(self.frame_rate);
        Ok(())
    }
}

/// Dense channel holding one value per frame over `first_frame..=last_frame`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationChannel {
    pub first_frame: u16,
    pub last_frame: u16,
    pub channel_type: ChannelType,
    /// Pivot index; 0 is the root transform.
    pub pivot: u16,
    pub data: Vec<ChannelValue>,
}

impl AnimationChannel {
    /// Builds a channel covering `data.len()` frames from `first_frame`.
    ///
    /// Fails when the last frame does not fit a `u16`, and for empty data at frame 0.
    pub fn new(
        first_frame: u16,
        channel_type: ChannelType,
        pivot: u16,
        data: Vec<ChannelValue>,
    ) -> Result<Self, Error> {
        let last_frame = (first_frame as usize + data.len())
            .checked_sub(1)
            .and_then(|last| u16::try_from(last).ok())
            .ok_or_else(|| {
                Error::invalid_value(format!(
                    "{} values from frame {first_frame} do not fit the u16 frame range",
                    data.len()
                ))
            })?;
        Ok(Self {
            first_frame,
            last_frame,
            channel_type,
            pivot,
            data,
        })
    }

    pub fn frame_count(&self) -> usize {
        if self.last_frame < self.first_frame {
            0
        } else {
            (self.last_frame - self.first_frame) as usize + 1
        }
    }

    /// Value at an absolute frame, if the channel covers it.
    pub fn value_at(&self, frame: u16) -> Option<&ChannelValue> {
        frame
            .checked_sub(self.first_frame)
            .and_then(|i| self.data.get(i as usize))
    }
}

impl Chunk for AnimationChannel {
    fn body_size(&self) -> u32 {
        array_size(self.data.len(), self.channel_type.value_size()).saturating_add(12)
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        let first_frame = reader.read_u16()?;
        let last_frame = reader.read_u16()?;
        let vector_len = reader.read_u16()?;
        let type_offset = reader.position();
        let channel_type = ChannelType::from_raw(reader.read_u16()? as u32, type_offset)?;
        channel_type.check_vector_len(vector_len as u32)?;
        let pivot = reader.read_u16()?;
        let _pad = reader.read_u16()?;

        let mut channel = Self {
            first_frame,
            last_frame,
            channel_type,
            pivot,
            data: Vec::new(),
        };
        let count = reader.check_count(
            channel.frame_count(),
            channel_type.value_size() as usize,
        )?;
        channel.data.reserve(count);
        for _ in 0..count {
            channel.data.push(channel_type.read_value(reader)?);
        }
        Ok(channel)
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        if self.data.len() != self.frame_count() {
            return Err(Error::invalid_value(format!(
                "channel covers frames {}..={} but holds {} values",
                self.first_frame,
                self.last_frame,
                self.data.len()
            )));
        }
        writer.write_u16(self.first_frame);
        writer.write_u16(self.last_frame);
        writer.write_u16(self.channel_type.vector_len() as u16);
        writer.write_u16(self.channel_type.to_raw() as u16);
        writer.write_u16(self.pivot);
        writer.write_u16(0);
        for value in &self.data {
            self.channel_type.check_value(value)?;
            value.write(writer);
        }
        Ok(())
    }
}

/// Dense boolean channel, one bit per frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationBitChannel {
    pub first_frame: u16,
    pub last_frame: u16,
    pub channel_type: BitChannelType,
    pub pivot: u16,
    /// Value for frames outside `first_frame..=last_frame`.
    pub default_value: bool,
    pub data: Vec<bool>,
}

impl AnimationBitChannel {
    pub fn frame_count(&self) -> usize {
        if self.last_frame < self.first_frame {
            0
        } else {
            (self.last_frame - self.first_frame) as usize + 1
        }
    }

    pub fn value_at(&self, frame: u16) -> bool {
        frame
            .checked_sub(self.first_frame)
            .and_then(|i| self.data.get(i as usize).copied())
            .unwrap_or(self.default_value)
    }
}

impl Chunk for AnimationBitChannel {
    fn body_size(&self) -> u32 {
        array_size(self.data.len().div_ceil(8), 1).saturating_add(9)
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        let first_frame = reader.read_u16()?;
        let last_frame = reader.read_u16()?;
        let type_offset = reader.position();
        let channel_type = BitChannelType::from_raw(reader.read_u16()? as u32, type_offset)?;
        let pivot = reader.read_u16()?;
        let default_value = reader.read_u8()? != 0;

        let mut channel = Self {
            first_frame,
            last_frame,
            channel_type,
            pivot,
            default_value,
            data: Vec::new(),
        };
        let count = channel.frame_count();
        let packed = reader.read_bytes(count.div_ceil(8))?;
        channel.data = (0..count)
            .map(|i| packed[i / 8] & (1 << (i % 8)) != 0)
            .collect();
        Ok(channel)
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        if self.data.len() != self.frame_count() {
            return Err(Error::invalid_value(format!(
                "bit channel covers frames {}..={} but holds {} values",
                self.first_frame,
                self.last_frame,
                self.data.len()
            )));
        }
        writer.write_u16(self.first_frame);
        writer.write_u16(self.last_frame);
        writer.write_u16(self.channel_type.to_raw() as u16);
        writer.write_u16(self.pivot);
        writer.write_u8(self.default_value as u8);
        for bits in self.data.chunks(8) {
            let byte = bits
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << i));
            writer.write_u8(byte);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    pub header: AnimationHeader,
    pub channels: Vec<AnimationChannel>,
    pub bit_channels: Vec<AnimationBitChannel>,
}

impl Chunk for Animation {
    const HAS_CHILDREN: bool = true;

    fn body_size(&self) -> u32 {
        sum_sizes([
            self.header.serialized_size(true),
            children_size(&self.channels),
            children_size(&self.bit_channels),
        ])
    }

    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        let mut anim_header: Option<AnimationHeader> = None;
        let mut channels: Vec<AnimationChannel> = Vec::new();
        let mut bit_channels: Vec<AnimationBitChannel> = Vec::new();
        read_chunks(reader, header.body_end, |reader, child| {
            match child.tag {
                tags::ANIMATION_HEADER => anim_header = Some(reader.read_chunk(child)?),
                tags::ANIMATION_CHANNEL => channels.push(reader.read_chunk(child)?),
                tags::BIT_CHANNEL => bit_channels.push(reader.read_chunk(child)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(Self {
            header: anim_header.ok_or(Error::MissingChunk {
                container: tags::ANIMATION,
                tag: tags::ANIMATION_HEADER,
            })?,
            channels,
            bit_channels,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_chunk(tags::ANIMATION_HEADER, &self.header)?;
        for channel in &self.channels {
            writer.write_chunk(tags::ANIMATION_CHANNEL, channel)?;
        }
        for channel in &self.bit_channels {
            writer.write_chunk(tags::BIT_CHANNEL, channel)?;
        }
        Ok(())
    }
}
