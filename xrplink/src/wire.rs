// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use core::fmt;
use std::error::Error;

/// One tagged entry of a bridge datagram. Command entries (motors, servos)
/// travel towards the robot, report entries (sensors) travel back, but the
/// encoding is the same in both directions so a single type covers the whole
/// wire format.
///
/// An entry is laid out as `[len][tag][payload]` where `len` counts the tag
/// byte plus the payload and all multi-byte payload fields are big-endian.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Entry {
    /// A digital pin, such as the user button or onboard LED.
    Dio { channel: u8, value: bool },

    /// An analog reading, unit depends on what is wired to the channel.
    Analog { channel: u8, value: f32 },

    /// A PWM motor command, value in [-1, 1].
    Motor { channel: u8, value: f32 },

    /// A servo command, value in [0, 1] over the servo's travel.
    Servo { channel: u8, value: f32 },

    /// The onboard gyro: rates then angles, x/y/z, in degrees.
    Gyro { rates: [f32; 3], angles: [f32; 3] },

    /// The built-in accelerometer, x/y/z in g.
    Accel { axes: [f32; 3] },

    /// A quadrature encoder's running count.
    Encoder { channel: u8, count: i32 },
}

impl Entry {
    pub const TAG_DIO: u8 = 0x10;
    pub const TAG_ANALOG: u8 = 0x11;
    pub const TAG_MOTOR: u8 = 0x12;
    pub const TAG_SERVO: u8 = 0x13;
    pub const TAG_GYRO: u8 = 0x15;
    pub const TAG_ACCEL: u8 = 0x16;
    pub const TAG_ENCODER: u8 = 0x18;

    /// Gets the wire tag identifying this entry's kind.
    #[must_use]
    pub fn tag(&self) -> u8 {
        match self {
            Self::Dio { .. } => Self::TAG_DIO,
            Self::Analog { .. } => Self::TAG_ANALOG,
            Self::Motor { .. } => Self::TAG_MOTOR,
            Self::Servo { .. } => Self::TAG_SERVO,
            Self::Gyro { .. } => Self::TAG_GYRO,
            Self::Accel { .. } => Self::TAG_ACCEL,
            Self::Encoder { .. } => Self::TAG_ENCODER,
        }
    }

    /// Appends this entry, length prefix included, to the given buffer.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let start = buf.len();
        buf.push(0u8);
        buf.push(self.tag());

        match self {
            Self::Dio { channel, value } => {
                buf.push(*channel);
                buf.push(*value as u8);
            }

            Self::Analog { channel, value }
            | Self::Motor { channel, value }
            | Self::Servo { channel, value } => {
                buf.push(*channel);
                buf.extend_from_slice(&value.to_be_bytes());
            }

            Self::Gyro { rates, angles } => {
                for v in rates.iter().chain(angles.iter()) {
                    buf.extend_from_slice(&v.to_be_bytes());
                }
            }

            Self::Accel { axes } => {
                for v in axes {
                    buf.extend_from_slice(&v.to_be_bytes());
                }
            }

            Self::Encoder { channel, count } => {
                buf.push(*channel);
                buf.extend_from_slice(&count.to_be_bytes());
            }
        }

        buf[start] = (buf.len() - start - 1) as u8;
    }

    /// Decodes a single entry's payload given its tag. Returns an error for
    /// unknown tags and payloads of the wrong size.
    pub fn decode(tag: u8, payload: &[u8]) -> ExtractionResult<Self> {
        match tag {
            Self::TAG_DIO if payload.len() == 2 => Ok(Self::Dio {
                channel: payload[0],
                value: payload[1] != 0,
            }),

            Self::TAG_ANALOG if payload.len() == 5 => Ok(Self::Analog {
                channel: payload[0],
                value: read_f32(payload, 1)?,
            }),

            Self::TAG_MOTOR if payload.len() == 5 => Ok(Self::Motor {
                channel: payload[0],
                value: read_f32(payload, 1)?,
            }),

            Self::TAG_SERVO if payload.len() == 5 => Ok(Self::Servo {
                channel: payload[0],
                value: read_f32(payload, 1)?,
            }),

            Self::TAG_GYRO if payload.len() == 24 => Ok(Self::Gyro {
                rates: [
                    read_f32(payload, 0)?,
                    read_f32(payload, 4)?,
                    read_f32(payload, 8)?,
                ],
                angles: [
                    read_f32(payload, 12)?,
                    read_f32(payload, 16)?,
                    read_f32(payload, 20)?,
                ],
            }),

            Self::TAG_ACCEL if payload.len() == 12 => Ok(Self::Accel {
                axes: [
                    read_f32(payload, 0)?,
                    read_f32(payload, 4)?,
                    read_f32(payload, 8)?,
                ],
            }),

            Self::TAG_ENCODER if payload.len() == 5 => Ok(Self::Encoder {
                channel: payload[0],
                count: i32::from_be_bytes(
                    payload[1..5].try_into().map_err(|_| ExtractionError)?,
                ),
            }),

            _ => Err(ExtractionError),
        }
    }
}

/// Assembles a complete bridge datagram: a big-endian sequence number
/// followed by every given entry.
#[must_use]
pub fn encode_packet(seq: u16, entries: &[Entry]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + entries.len() * 8);
    buf.extend_from_slice(&seq.to_be_bytes());

    for e in entries {
        e.encode(&mut buf);
    }

    buf
}

/// Parses a bridge datagram into its sequence number and entries. Entries
/// with an unknown tag or a malformed payload are skipped, since their length
/// prefix still delimits them, but a zero or out-of-bounds length makes the
/// rest of the datagram unreadable and is an error.
pub fn decode_packet(datagram: &[u8]) -> ExtractionResult<(u16, Vec<Entry>)> {
    if datagram.len() < 2 {
        return Err(ExtractionError);
    }

    let seq = u16::from_be_bytes([datagram[0], datagram[1]]);
    let mut entries = Vec::new();
    let mut at = 2;

    while at < datagram.len() {
        let len = datagram[at] as usize;

        if len == 0 || at + 1 + len > datagram.len() {
            return Err(ExtractionError);
        }

        let tag = datagram[at + 1];

        if let Ok(e) = Entry::decode(tag, &datagram[at + 2..at + 1 + len]) {
            entries.push(e);
        }

        at += 1 + len;
    }

    Ok((seq, entries))
}

/// True if `seq` should replace `last` as the most recent sequence number.
/// Sequence numbers wrap at `u16::MAX`, so "newer" means within the half
/// range ahead of `last`; anything else is a delayed or duplicated datagram
/// and should be dropped rather than rewinding sensor state.
#[must_use]
pub fn seq_newer(seq: u16, last: u16) -> bool {
    seq != last && seq.wrapping_sub(last) < 0x8000u16
}

fn read_f32(payload: &[u8], at: usize) -> ExtractionResult<f32> {
    Ok(f32::from_be_bytes(
        payload
            .get(at..at + 4)
            .ok_or(ExtractionError)?
            .try_into()
            .map_err(|_| ExtractionError)?,
    ))
}

/// Result from extracting an `Entry` from a datagram.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Error from extracting an `Entry` from a datagram.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionError;

impl Error for ExtractionError {}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error extracting entry from bridge datagram")
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_packet, encode_packet, seq_newer, Entry};

    #[test]
    fn packet_survives_the_wire() {
        let entries = [
            Entry::Motor {
                channel: 0,
                value: 0.5f32,
            },
            Entry::Encoder {
                channel: 1,
                count: -585,
            },
            Entry::Gyro {
                rates: [0f32, 0f32, 12.5f32],
                angles: [0f32, 0f32, 90f32],
            },
            Entry::Dio {
                channel: 0,
                value: true,
            },
        ];

        let (seq, decoded) = decode_packet(&encode_packet(42, &entries)).unwrap();

        assert_eq!(seq, 42);
        assert_eq!(decoded.as_slice(), entries.as_slice());
    }

    #[test]
    fn unknown_entries_are_skipped() {
        let mut datagram = encode_packet(
            7,
            &[Entry::Analog {
                channel: 2,
                value: 0.3f32,
            }],
        );

        // An entry with a tag this program never uses, then a valid one.
        datagram.extend_from_slice(&[2, 0x7f, 0xff]);
        Entry::Accel {
            axes: [0f32, 0f32, 1f32],
        }
        .encode(&mut datagram);

        let (_, decoded) = decode_packet(&datagram).unwrap();

        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn truncated_datagrams_error() {
        let mut datagram = encode_packet(
            1,
            &[Entry::Motor {
                channel: 1,
                value: 1f32,
            }],
        );

        datagram.pop();

        assert!(decode_packet(&datagram).is_err());
        assert!(decode_packet(&[0u8]).is_err());
    }

    #[test]
    fn sequence_freshness() {
        assert!(seq_newer(2, 1));
        assert!(seq_newer(1, u16::MAX));
        assert!(!seq_newer(1, 1));
        assert!(!seq_newer(1, 2));
        assert!(!seq_newer(u16::MAX, 1));
    }
}
