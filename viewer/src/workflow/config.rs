use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tofcore::SessionConfig;

use crate::gui_bridge::bridge::default_bind_address;

/// Session plus the address of the frame bridge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub session: SessionConfig,
    #[serde(default = "default_bind_address")]
    pub bind: SocketAddr,
}

/// Source selection as given on the command line.
#[derive(Clone, Debug, Default)]
pub struct SourceArgs {
    pub live: bool,
    pub replay: bool,
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub output: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub frequency: Option<u32>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(args: SourceArgs) -> anyhow::Result<Self> {
        let session = if args.live {
            let Some(port) = args.port else {
                bail!("serial port must be given with -p <port> for --live");
            };
            let Some(baud) = args.baud else {
                bail!("baud rate must be given with -b <baud> for --live");
            };
            if args.output.is_none() {
                log::info!("no -o given, output goes to log_<date>_<time>.json");
            }
            SessionConfig::live(port, baud, args.output)
        } else if args.replay {
            let Some(input) = args.input else {
                bail!("input file must be given with -i <path> for --replay");
            };
            let frequency = args.frequency.unwrap_or_else(|| {
                log::info!("playback frequency defaulted to 5 Hz, set with -f <hz>");
                5
            });
            SessionConfig::replay(input, frequency)
        } else {
            bail!("no source selected, use --live or --replay (see --help)");
        };

        Ok(Self {
            session,
            bind: default_bind_address(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tofcore::session::SourceConfig;

    #[test]
    fn config_from_args_builds_replay_session() {
        let cfg = WorkflowConfig::from_args(SourceArgs {
            replay: true,
            input: Some(PathBuf::from("capture.json")),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cfg.session, SessionConfig::replay("capture.json", 5));
        assert_eq!(cfg.bind, default_bind_address());
    }

    #[test]
    fn live_requires_port_and_baud() {
        let missing_baud = SourceArgs {
            live: true,
            port: Some("/dev/ttyACM0".into()),
            ..Default::default()
        };
        assert!(WorkflowConfig::from_args(missing_baud.clone()).is_err());

        let cfg = WorkflowConfig::from_args(SourceArgs {
            baud: Some(460_800),
            ..missing_baud
        })
        .unwrap();
        assert!(matches!(
            cfg.session.source,
            SourceConfig::Live {
                transport_rate: 460_800,
                output_log_path: None,
                ..
            }
        ));
        assert!(WorkflowConfig::from_args(SourceArgs::default()).is_err());
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"session:\n  source:\n    mode: live\n    transport_address: /dev/ttyUSB0\n    transport_rate: 115200\n  render_hz: 30\n  filter:\n    valid_statuses: [5]\nbind: 0.0.0.0:9100\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.session.render_hz, 30);
        assert_eq!(cfg.session.filter.valid_statuses, vec![5]);
        assert_eq!(cfg.bind.port(), 9100);
        assert!(cfg.session.validate().is_ok());
    }
}
