use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use helix_core::{AntibodySequence, ChainRestriction, Scheme, Species};
use helix_formats::fasta;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::ProviderError;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// One numbering run: a sequence under one scheme, with optional hints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberingRequest {
    pub sequence: String,
    pub scheme: Scheme,
    pub species: Option<Species>,
    pub restriction: Option<ChainRestriction>,
}

impl NumberingRequest {
    pub fn new(sequence: impl Into<String>, scheme: Scheme) -> Self {
        Self {
            sequence: sequence.into(),
            scheme,
            species: None,
            restriction: None,
        }
    }

    pub fn with_species(mut self, species: Option<Species>) -> Self {
        self.species = species;
        self
    }

    pub fn with_restriction(mut self, restriction: Option<ChainRestriction>) -> Self {
        self.restriction = restriction;
        self
    }

    /// `key=value` pairs identifying this request in the result cache.
    pub fn cache_args(&self) -> Vec<(&'static str, String)> {
        let mut args = vec![
            ("seq", self.sequence.clone()),
            ("scheme", self.scheme.as_tool_arg().to_string()),
        ];
        if let Some(species) = self.species {
            args.push(("species", species.as_tool_arg().to_string()));
        }
        if let Some(restriction) = self.restriction {
            args.push(("chain_type", restriction.as_tool_arg().to_string()));
        }
        args
    }
}

/// Something that turns a request into raw numbering-tool output text.
pub trait NumberingProvider {
    fn number(&self, request: &NumberingRequest) -> Result<String, ProviderError>;

    /// Version string of the underlying tool, when it can be determined.
    fn tool_version(&self) -> Option<String> {
        None
    }

    /// Where the tool came from (image, URL), recorded alongside results.
    fn tool_source(&self) -> Option<String> {
        None
    }
}

impl<P: NumberingProvider + ?Sized> NumberingProvider for &P {
    fn number(&self, request: &NumberingRequest) -> Result<String, ProviderError> {
        (**self).number(request)
    }

    fn tool_version(&self) -> Option<String> {
        (**self).tool_version()
    }

    fn tool_source(&self) -> Option<String> {
        (**self).tool_source()
    }
}

/// Runs an external command per request.
///
/// The query is written to a temporary FASTA file and the command is invoked
/// as `<command...> -i <file> --scheme=<scheme> [--use_species=..] [--restrict=..]`,
/// with stdout taken as the numbering output.
#[derive(Debug)]
pub struct CommandProvider {
    command: Vec<String>,
    timeout: Duration,
    version_command: Option<Vec<String>>,
    source: Option<String>,
    version: OnceLock<Option<String>>,
}

impl CommandProvider {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            timeout: Duration::from_secs(60),
            version_command: None,
            source: None,
            version: OnceLock::new(),
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut provider = Self::new(config.command.clone())
            .with_timeout(Duration::from_secs(config.timeout_secs));
        provider.version_command = config.version_command.clone();
        provider.source = config.source.clone();
        provider
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_version_command(mut self, command: Vec<String>) -> Self {
        self.version_command = Some(command);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Tool arguments for a request whose query lives at `input`.
    pub fn tool_args(request: &NumberingRequest, input: &str) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            input.to_string(),
            format!("--scheme={}", request.scheme.as_tool_arg()),
        ];
        if let Some(species) = request.species {
            args.push(format!("--use_species={}", species.as_tool_arg()));
        }
        if let Some(restriction) = request.restriction {
            args.push(format!("--restrict={}", restriction.as_tool_arg()));
        }
        args
    }

    fn run(&self, command: &[String], extra: &[String]) -> Result<String, ProviderError> {
        let Some((program, base_args)) = command.split_first() else {
            return Err(ProviderError::Spawn {
                command: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            });
        };

        tracing::debug!(program = %program, args = ?extra, "running numbering tool");
        let mut child = Command::new(program)
            .args(base_args)
            .args(extra)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProviderError::Spawn {
                command: command.join(" "),
                source,
            })?;

        // Drain both pipes while polling so a chatty child cannot block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child)?;
        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;

        if !status.success() {
            return Err(ProviderError::NonZeroExit {
                status: status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        if stdout.trim().is_empty() {
            return Err(ProviderError::EmptyOutput);
        }
        Ok(stdout)
    }

    fn wait(&self, child: &mut Child) -> Result<std::process::ExitStatus, ProviderError> {
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if started.elapsed() >= self.timeout {
                tracing::warn!(timeout = ?self.timeout, "numbering tool timed out, killing it");
                // The child may exit between try_wait and kill.
                let _ = child.kill();
                let _ = child.wait();
                return Err(ProviderError::Timeout(self.timeout));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl NumberingProvider for CommandProvider {
    fn number(&self, request: &NumberingRequest) -> Result<String, ProviderError> {
        let query = AntibodySequence::new("query", request.sequence.as_str());
        let mut input = tempfile::Builder::new()
            .prefix("helix-query-")
            .suffix(".fasta")
            .tempfile()?;
        input.write_all(fasta::serialize(std::slice::from_ref(&query)).as_bytes())?;
        input.flush()?;

        let path = input.path().to_string_lossy().into_owned();
        self.run(&self.command, &Self::tool_args(request, &path))
    }

    fn tool_version(&self) -> Option<String> {
        self.version
            .get_or_init(|| {
                let command = self.version_command.as_ref()?;
                match self.run(command, &[]) {
                    Ok(out) => Some(out.trim().to_string()),
                    Err(e) => {
                        tracing::warn!(error = %e, "could not determine numbering tool version");
                        None
                    }
                }
            })
            .clone()
    }

    fn tool_source(&self) -> Option<String> {
        self.source.clone()
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_string(&mut buf)?;
        }
        Ok(buf)
    })
}

fn collect(handle: JoinHandle<std::io::Result<String>>) -> Result<String, ProviderError> {
    handle
        .join()
        .map_err(|_| ProviderError::Io(std::io::Error::other("pipe reader panicked")))?
        .map_err(ProviderError::from)
}
