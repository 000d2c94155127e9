use crate::{
    convert::{Converter, MalformedPeers},
    convert_manifests, render,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::{
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[clap(
    name = "calico-policy-converter",
    version,
    about = "Converts Kubernetes network intent into Calico resources"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "calico=info,warn",
        env = "CALICO_POLICY_CONVERTER_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    /// Output format, `json` or `yaml`.
    #[clap(long, short = 'o', default_value = "yaml")]
    output: OutputFormat,

    /// Treats network policy peers that cannot be converted as unrestricted instead of failing
    /// the policy.
    ///
    /// This widens the converted policies.
    #[clap(long)]
    tolerate_malformed_peers: bool,

    /// Manifests to convert. Reads from stdin when none are given or for `-`.
    files: Vec<PathBuf>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

// === impl Args ===

impl Args {
    #[inline]
    pub fn parse_and_run() -> Result<()> {
        Self::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            output,
            tolerate_malformed_peers,
            files,
        } = self;

        log_format.try_init(log_level)?;

        let converter = Converter::new().with_malformed_peers(if tolerate_malformed_peers {
            MalformedPeers::Unrestricted
        } else {
            MalformedPeers::Reject
        });

        let inputs = if files.is_empty() {
            vec![PathBuf::from("-")]
        } else {
            files
        };

        let mut documents = Vec::new();
        for path in &inputs {
            let manifests = read_input(path)?;
            let converted = convert_manifests(&converter, &manifests)
                .with_context(|| format!("failed to convert {}", path.display()))?;
            debug!(path = %path.display(), resources = converted.len(), "Converted input");
            documents.extend(converted);
        }
        info!(resources = documents.len(), "Converted manifests");

        let rendered = render(&documents, output)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

// === impl OutputFormat ===

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            s => bail!("invalid output format: {}", s),
        }
    }
}
