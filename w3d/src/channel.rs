//! Pieces shared by every animation channel layout.

use crate::{ChunkReader, ChunkWriter, Error, Quaternion};

/// Bit 31 of a sparse time code: the key holds its value until the next key (step).
pub const NON_INTERPOLATED_FLAG: u32 = 0x8000_0000;
const TIME_CODE_MASK: u32 = !NON_INTERPOLATED_FLAG;

/// Which pivot component an animation channel drives.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelType {
    X,
    Y,
    Z,
    XRotation,
    YRotation,
    ZRotation,
    Quaternion,
}

impl ChannelType {
    pub fn from_raw(value: u32, offset: usize) -> Result<Self, Error> {
        Ok(match value {
            0 => Self::X,
            1 => Self::Y,
            2 => Self::Z,
            3 => Self::XRotation,
            4 => Self::YRotation,
            5 => Self::ZRotation,
            6 => Self::Quaternion,
            _ => {
                return Err(Error::InvalidDiscriminant {
                    field: "channel type",
                    value,
                    offset,
                });
            }
        })
    }

    pub fn to_raw(self) -> u8 {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
            Self::XRotation => 3,
            Self::YRotation => 4,
            Self::ZRotation => 5,
            Self::Quaternion => 6,
        }
    }

    /// Number of `f32` components per sample.
    pub fn vector_len(self) -> u8 {
        match self {
            Self::Quaternion => 4,
            _ => 1,
        }
    }

    /// Serialized size of one sample value.
    pub fn value_size(self) -> u32 {
        self.vector_len() as u32 * 4
    }

    /// Fails when a stored vector length disagrees with the component type.
    pub(crate) fn check_vector_len(self, stored: u32) -> Result<(), Error> {
        if stored != self.vector_len() as u32 {
            return Err(Error::invalid_value(format!(
                "{self:?} channel stores vector length {stored}, expected {}",
                self.vector_len()
            )));
        }
        Ok(())
    }

    pub(crate) fn read_value(self, reader: &mut ChunkReader<'_>) -> Result<ChannelValue, Error> {
        Ok(match self {
            Self::Quaternion => ChannelValue::Rotation(reader.read_quaternion()?),
            _ => ChannelValue::Scalar(reader.read_f32()?),
        })
    }

    /// Fails when `value` does not have the shape this channel type stores.
    pub(crate) fn check_value(self, value: &ChannelValue) -> Result<(), Error> {
        let fits = match value {
            ChannelValue::Rotation(_) => self == Self::Quaternion,
            ChannelValue::Scalar(_) => self != Self::Quaternion,
        };
        if !fits {
            return Err(Error::invalid_value(format!(
                "{value:?} cannot be stored in a {self:?} channel"
            )));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BitChannelType {
    Visibility,
    TimeCodedVisibility,
}

impl BitChannelType {
    pub fn from_raw(value: u32, offset: usize) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Visibility),
            1 => Ok(Self::TimeCodedVisibility),
            _ => Err(Error::InvalidDiscriminant {
                field: "bit channel type",
                value,
                offset,
            }),
        }
    }

    pub fn to_raw(self) -> u8 {
        match self {
            Self::Visibility => 0,
            Self::TimeCodedVisibility => 1,
        }
    }
}

/// One animation sample.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelValue {
    Scalar(f32),
    Rotation(Quaternion),
}

impl ChannelValue {
    pub fn vector_len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Rotation(_) => 4,
        }
    }

    pub fn size(&self) -> u32 {
        self.vector_len() as u32 * 4
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Rotation(_) => None,
        }
    }

    pub fn as_rotation(&self) -> Option<Quaternion> {
        match self {
            Self::Scalar(_) => None,
            Self::Rotation(q) => Some(*q),
        }
    }

    pub(crate) fn write(&self, writer: &mut ChunkWriter) {
        match self {
            Self::Scalar(v) => writer.write_f32(*v),
            Self::Rotation(q) => writer.write_quaternion(*q),
        }
    }
}

/// Splits a sparse time code into `(time, non_interpolated)`.
pub fn split_time_code(raw: u32) -> (u32, bool) {
    (raw & TIME_CODE_MASK, raw & NON_INTERPOLATED_FLAG != 0)
}

/// Inverse of [`split_time_code`]. `time` must fit in 31 bits.
pub fn join_time_code(time: u32, non_interpolated: bool) -> u32 {
    let flag = if non_interpolated {
        NON_INTERPOLATED_FLAG
    } else {
        0
    };
    (time & TIME_CODE_MASK) | flag
}
