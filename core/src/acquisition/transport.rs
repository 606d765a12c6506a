use crate::prelude::{AcquisitionError, AcquisitionResult};
use serialport::{ClearBuffer, SerialPort};
use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::time::Duration;

/// Newline-delimited record stream.
pub trait RecordSource: Send {
    /// Returns the next complete record, or `None` when nothing complete has
    /// arrived yet. Must not block longer than the transport's read timeout.
    fn poll_record(&mut self) -> io::Result<Option<String>>;
}

/// Splits any byte stream into lines, keeping partial lines across polls.
pub struct LineSource<R: Read> {
    reader: BufReader<R>,
    pending: Vec<u8>,
}

impl<R: Read> LineSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            pending: Vec::new(),
        }
    }

    fn take_pending(&mut self) -> Option<String> {
        let line = String::from_utf8_lossy(&self.pending)
            .trim_end_matches(&['\r', '\n'][..])
            .to_string();
        self.pending.clear();
        (!line.trim().is_empty()).then_some(line)
    }
}

impl<R: Read + Send> RecordSource for LineSource<R> {
    fn poll_record(&mut self) -> io::Result<Option<String>> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            // a full line, or the unterminated tail once the stream ends
            Ok(_) => Ok(self.take_pending()),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

/// Opens the serial transport and discards anything buffered before we
/// attached, so the first record read starts on a fresh line.
pub fn open_serial(
    address: &str,
    baud_rate: u32,
    read_timeout: Duration,
) -> AcquisitionResult<LineSource<Box<dyn SerialPort>>> {
    let unavailable = |source: serialport::Error| AcquisitionError::TransportUnavailable {
        address: address.to_string(),
        source,
    };
    let port = serialport::new(address, baud_rate)
        .timeout(read_timeout)
        .open()
        .map_err(unavailable)?;
    port.clear(ClearBuffer::Input).map_err(unavailable)?;
    Ok(LineSource::new(port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Yields scripted chunks, timing out between them like a serial port.
    struct ChunkedReader {
        chunks: VecDeque<io::Result<Vec<u8>>>,
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.chunks.pop_front() {
                Some(Ok(chunk)) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                Some(Err(err)) => Err(err),
                None => Err(io::Error::new(ErrorKind::TimedOut, "idle")),
            }
        }
    }

    #[test]
    fn reads_one_record_per_poll() {
        let mut source = LineSource::new(Cursor::new(b"1;2;3\r\n4;5;6\n".to_vec()));
        assert_eq!(source.poll_record().unwrap().as_deref(), Some("1;2;3"));
        assert_eq!(source.poll_record().unwrap().as_deref(), Some("4;5;6"));
        assert_eq!(source.poll_record().unwrap(), None);
    }

    #[test]
    fn partial_lines_survive_timeouts() {
        let mut source = LineSource::new(ChunkedReader {
            chunks: VecDeque::from(vec![
                Ok(b"64;1;".to_vec()),
                Err(io::Error::new(ErrorKind::TimedOut, "timeout")),
                Ok(b"30\n".to_vec()),
            ]),
        });
        assert_eq!(source.poll_record().unwrap(), None);
        assert_eq!(source.poll_record().unwrap().as_deref(), Some("64;1;30"));
        assert_eq!(source.poll_record().unwrap(), None);
    }

    #[test]
    fn unterminated_tail_is_flushed_at_end_of_stream() {
        let mut source = LineSource::new(Cursor::new(b"\n7;8".to_vec()));
        assert_eq!(source.poll_record().unwrap(), None);
        assert_eq!(source.poll_record().unwrap().as_deref(), Some("7;8"));
    }

    #[test]
    fn hard_errors_propagate() {
        let mut source = LineSource::new(ChunkedReader {
            chunks: VecDeque::from(vec![Err(io::Error::new(
                ErrorKind::BrokenPipe,
                "unplugged",
            ))]),
        });
        assert!(source.poll_record().is_err());
    }

    #[test]
    fn missing_port_is_reported() {
        let result = open_serial("/dev/does-not-exist-tof", 115_200, Duration::from_millis(10));
        assert!(matches!(
            result,
            Err(AcquisitionError::TransportUnavailable { .. })
        ));
    }
}
