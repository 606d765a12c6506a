use crate::prelude::{FrameError, FrameResult};
use crate::sensor::reading::{Reading, Resolution, Target, Zone, MAX_TARGETS_PER_ZONE};
use std::str::FromStr;

/// Field separator of the wire record.
pub const RECORD_DELIMITER: char = ';';

const HEADER_TOKENS: usize = 3;
const ZONE_TOKENS: usize = 3;
const TARGET_TOKENS: usize = 5;

/// Number of tokens a frame with the given shape occupies.
pub fn frame_token_count(zones: usize, targets_per_zone: usize) -> usize {
    HEADER_TOKENS + zones * (ZONE_TOKENS + targets_per_zone * TARGET_TOKENS)
}

/// Sequential reader over the token list; every field consumes one token.
struct TokenCursor<'a, S> {
    tokens: &'a [S],
    position: usize,
    expected: usize,
}

impl<'a, S: AsRef<str>> TokenCursor<'a, S> {
    fn new(tokens: &'a [S]) -> Self {
        Self {
            tokens,
            position: 0,
            expected: HEADER_TOKENS,
        }
    }

    fn next<T: FromStr>(&mut self, field: &'static str) -> FrameResult<T> {
        let token = self
            .tokens
            .get(self.position)
            .ok_or(FrameError::TruncatedFrame {
                expected: self.expected.max(self.position + 1),
                actual: self.tokens.len(),
            })?
            .as_ref();
        let value = token.parse::<T>().map_err(|_| FrameError::MalformedToken {
            index: self.position,
            field,
            token: token.to_string(),
        })?;
        self.position += 1;
        Ok(value)
    }
}

/// Decodes one frame from its positional token list.
pub fn decode_tokens<S: AsRef<str>>(tokens: &[S]) -> FrameResult<Reading> {
    let mut cursor = TokenCursor::new(tokens);

    let resolution = Resolution::try_from(cursor.next::<i64>("resolution")?)?;
    let targets_per_zone: u8 = cursor.next("targets_per_zone")?;
    if targets_per_zone == 0 || targets_per_zone > MAX_TARGETS_PER_ZONE {
        return Err(FrameError::InvalidTargetsPerZone(targets_per_zone.into()));
    }
    let silicon_temp_degc: i16 = cursor.next("silicon_temp_degc")?;
    cursor.expected = frame_token_count(resolution.zone_count(), targets_per_zone.into());

    let mut zones = Vec::with_capacity(resolution.zone_count());
    for _ in 0..resolution.zone_count() {
        let ambient_per_spad = cursor.next("ambient_per_spad")?;
        let target_count = cursor.next("target_count")?;
        let spads_enabled = cursor.next("spads_enabled")?;

        let mut targets = Vec::with_capacity(targets_per_zone.into());
        for _ in 0..targets_per_zone {
            targets.push(Target {
                signal_per_spad: cursor.next("signal_per_spad")?,
                range_sigma_mm: cursor.next("range_sigma_mm")?,
                distance_mm: cursor.next("distance_mm")?,
                reflectance: cursor.next("reflectance")?,
                status: cursor.next("status")?,
            });
        }

        zones.push(Zone {
            ambient_per_spad,
            target_count,
            spads_enabled,
            targets,
        });
    }

    Reading::new(resolution, targets_per_zone, silicon_temp_degc, zones)
}

/// Inverse of [`decode_tokens`].
pub fn encode_tokens(reading: &Reading) -> Vec<String> {
    let mut tokens = Vec::with_capacity(frame_token_count(
        reading.zones.len(),
        reading.targets_per_zone.into(),
    ));
    tokens.push(u32::from(reading.resolution).to_string());
    tokens.push(reading.targets_per_zone.to_string());
    tokens.push(reading.silicon_temp_degc.to_string());
    for zone in &reading.zones {
        tokens.push(zone.ambient_per_spad.to_string());
        tokens.push(zone.target_count.to_string());
        tokens.push(zone.spads_enabled.to_string());
        for target in &zone.targets {
            tokens.push(target.signal_per_spad.to_string());
            tokens.push(target.range_sigma_mm.to_string());
            tokens.push(target.distance_mm.to_string());
            tokens.push(target.reflectance.to_string());
            tokens.push(target.status.to_string());
        }
    }
    tokens
}

/// Parses one wire record. All whitespace is stripped before splitting, so
/// `"64; 1;"` and `"64;1;"` are equivalent.
pub fn parse_record(line: &str) -> FrameResult<Reading> {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let tokens: Vec<&str> = compact.split(RECORD_DELIMITER).collect();
    decode_tokens(&tokens)
}

pub fn encode_record(reading: &Reading) -> String {
    encode_tokens(reading).join(&RECORD_DELIMITER.to_string())
}
