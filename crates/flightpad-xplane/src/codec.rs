//! X-Plane UDP frame encoding and decoding.
//!
//! X-Plane's legacy UDP interface frames every message as a 5-byte ASCII
//! header followed by a fixed or bounded binary body. This module is a
//! pure codec with no I/O: encoders take typed arguments and return the
//! exact datagram bytes, the decoder takes a received datagram and returns
//! a recognized [`Frame`] or `None`. Decoding never panics on short or
//! garbled input -- broadcast UDP routinely carries noise, and rejecting
//! it is normal operation, not an error.
//!
//! # Frame layouts
//!
//! ```text
//! DATA\0  + i32 index + 8 x f32              41 bytes, indexed values
//! DREF0   + f32 value + name + NUL, padded   509 bytes, named-value write
//! CMND\0  + command + NUL                    variable, command trigger
//! DREQ\0  + i32 index                        9 bytes, value request
//! PING\0                                     5 bytes, liveness probe
//! BECN\0  + 4 IP bytes + u16 port (BE)       >= 11 bytes, discovery beacon
//! ```
//!
//! All multi-byte numeric fields are little-endian (native x86 float/int
//! layout, which is what the simulator emits) except the beacon port,
//! which is big-endian.

use std::net::Ipv4Addr;

/// UDP port the simulator listens on for control frames.
pub const COMMAND_PORT: u16 = 49000;

/// Number of f32 slots in every DATA frame.
pub const DATA_SLOTS: usize = 8;

/// Total length of a DATA frame: header(5) + index(4) + 8 x f32(32).
pub const DATA_FRAME_LEN: usize = 41;

/// Total length of a DREF frame, regardless of name length.
pub const DREF_FRAME_LEN: usize = 509;

/// Maximum bytes of dataref name (including its NUL) kept in a DREF frame.
pub const DREF_NAME_MAX: usize = 500;

/// Minimum length of a valid discovery beacon: header(5) + IP(4) + port(2).
pub const BEACON_MIN_LEN: usize = 11;

/// DATA index for the joystick pitch/roll/yaw group (first three slots).
pub const INDEX_AXES: i32 = 8;

/// DATA index for thrust reversers (one slot per engine).
pub const INDEX_REVERSERS: i32 = 12;

/// DATA index for the trim/flap/speedbrake group.
///
/// Slot 1 carries the flap handle request, slot 3 the speedbrake handle.
pub const INDEX_TRIM_FLAP_SPEEDBRAKE: i32 = 13;

/// DATA index for wheel brakes.
pub const INDEX_BRAKES: i32 = 14;

/// DATA index for throttle (duplicated across the first four engines).
pub const INDEX_THROTTLE: i32 = 25;

const HDR_DATA: &[u8; 5] = b"DATA\0";
const HDR_DREF: &[u8; 5] = b"DREF0";
const HDR_CMND: &[u8; 5] = b"CMND\0";
const HDR_DREQ: &[u8; 5] = b"DREQ\0";
const HDR_PING: &[u8; 5] = b"PING\0";

/// A decoded protocol frame.
///
/// Frames are ephemeral: constructed, sent or parsed, and discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Indexed value group (`DATA`), always eight slots.
    Data {
        /// Which value group the slots address.
        index: i32,
        /// The eight value slots; unsupplied slots decode as 0.0.
        values: [f32; DATA_SLOTS],
    },
    /// Named-value write (`DREF0`).
    Dref {
        /// Value to store into the dataref.
        value: f32,
        /// Dataref name, without the wire NUL.
        name: String,
    },
    /// Command trigger (`CMND`).
    Cmnd {
        /// Command path, without the wire NUL.
        name: String,
    },
    /// Request for an indexed value group (`DREQ`).
    Dreq {
        /// Which value group is requested.
        index: i32,
    },
    /// Liveness probe (`PING`).
    Ping,
    /// Discovery beacon (`BECN`) with the advertised endpoint embedded in
    /// the payload.
    Beacon {
        /// Advertised IPv4 address (raw payload bytes, dotted-quad).
        ip: Ipv4Addr,
        /// Advertised command port (big-endian on the wire).
        port: u16,
    },
}

// ---------------------------------------------------------------------------
// Encoders
// ---------------------------------------------------------------------------

/// Encode a DATA frame for the given value-group index.
///
/// The frame always carries exactly [`DATA_SLOTS`] f32 slots: callers may
/// supply fewer values and the remainder is zero-padded; extra values past
/// eight are dropped. The result is always [`DATA_FRAME_LEN`] bytes.
pub fn encode_data(index: i32, values: &[f32]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(DATA_FRAME_LEN);
    frame.extend_from_slice(HDR_DATA);
    frame.extend_from_slice(&index.to_le_bytes());
    for slot in 0..DATA_SLOTS {
        let v = values.get(slot).copied().unwrap_or(0.0);
        frame.extend_from_slice(&v.to_le_bytes());
    }
    frame
}

/// Encode a DREF named-value write.
///
/// The NUL-terminated name is truncated to [`DREF_NAME_MAX`] bytes and the
/// frame is zero-padded so the result is always [`DREF_FRAME_LEN`] bytes,
/// whatever the name length.
pub fn encode_dref(value: f32, dataref: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(DREF_FRAME_LEN);
    frame.extend_from_slice(HDR_DREF);
    frame.extend_from_slice(&value.to_le_bytes());

    let mut name = dataref.as_bytes().to_vec();
    name.push(0);
    name.truncate(DREF_NAME_MAX);
    frame.extend_from_slice(&name);

    frame.resize(DREF_FRAME_LEN, 0);
    frame
}

/// Encode a CMND command trigger.
pub fn encode_cmnd(command: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HDR_CMND.len() + command.len() + 1);
    frame.extend_from_slice(HDR_CMND);
    frame.extend_from_slice(command.as_bytes());
    frame.push(0);
    frame
}

/// Encode a DREQ request for an indexed value group.
pub fn encode_dreq(index: i32) -> Vec<u8> {
    let mut frame = Vec::with_capacity(9);
    frame.extend_from_slice(HDR_DREQ);
    frame.extend_from_slice(&index.to_le_bytes());
    frame
}

/// Encode a PING liveness probe.
pub fn encode_ping() -> Vec<u8> {
    HDR_PING.to_vec()
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Decode a received datagram into a [`Frame`].
///
/// Returns `None` for anything unrecognized: short buffers, unknown
/// headers, truncated bodies, or non-UTF-8 names. This is the normal path
/// for broadcast noise and must stay panic-free.
pub fn decode(buf: &[u8]) -> Option<Frame> {
    if buf.len() < 5 {
        return None;
    }
    let header: &[u8; 5] = buf[..5].try_into().ok()?;
    let body = &buf[5..];

    match header {
        b"DATA\0" => decode_data(body),
        b"DREF0" => decode_dref(body),
        b"CMND\0" => decode_nul_string(body).map(|name| Frame::Cmnd { name }),
        b"DREQ\0" => {
            let index = i32::from_le_bytes(body.get(..4)?.try_into().ok()?);
            Some(Frame::Dreq { index })
        }
        b"PING\0" => Some(Frame::Ping),
        b"BECN\0" => decode_beacon(body),
        _ => None,
    }
}

fn decode_data(body: &[u8]) -> Option<Frame> {
    if body.len() < DATA_FRAME_LEN - 5 {
        return None;
    }
    let index = i32::from_le_bytes(body[..4].try_into().ok()?);
    let mut values = [0.0f32; DATA_SLOTS];
    for (slot, value) in values.iter_mut().enumerate() {
        let at = 4 + slot * 4;
        *value = f32::from_le_bytes(body[at..at + 4].try_into().ok()?);
    }
    Some(Frame::Data { index, values })
}

fn decode_dref(body: &[u8]) -> Option<Frame> {
    if body.len() < 4 {
        return None;
    }
    let value = f32::from_le_bytes(body[..4].try_into().ok()?);
    let name = decode_nul_string(&body[4..])?;
    Some(Frame::Dref { value, name })
}

fn decode_beacon(body: &[u8]) -> Option<Frame> {
    if body.len() < BEACON_MIN_LEN - 5 {
        return None;
    }
    let ip = Ipv4Addr::new(body[0], body[1], body[2], body[3]);
    let port = u16::from_be_bytes([body[4], body[5]]);
    Some(Frame::Beacon { ip, port })
}

/// Read a NUL-terminated UTF-8 string; without a NUL the whole body is the
/// string (some simulator builds omit the terminator on CMND echoes).
fn decode_nul_string(body: &[u8]) -> Option<String> {
    let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
    std::str::from_utf8(&body[..end]).ok().map(str::to_owned)
}
