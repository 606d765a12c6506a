pub mod codec;
pub mod log;
pub mod reading;

pub use codec::{decode_tokens, encode_record, encode_tokens, parse_record};
pub use log::{timestamped_log_path, ReadingLog};
pub use reading::{Reading, Resolution, Target, Zone};
