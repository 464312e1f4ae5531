//! Line-by-line driver: read, trim, validate, dedup, write, tally.

use crate::config::Config;
use crate::store::{DedupStore, StoreError};
use crate::tally::ErrorTally;
use crate::{ErrorKind, ValidationResult, validate};
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Fatal errors. Rejected candidates are never errors; they are tallied.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed opening input file '{}': {source}", path.display())]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed opening output file '{}': {source}", path.display())]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed reading line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: io::Error,
    },
    #[error("Failed writing output: {source}")]
    Write {
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineOutcome {
    /// Empty after trimming trailing whitespace; not validated
    Blank,
    /// Valid and new, written to the output
    Written,
    /// Valid but already written
    Duplicate,
    /// Failed validation
    Rejected(ErrorKind),
}

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Every line read, blank lines included
    pub records_read: u64,
    pub records_written: u64,
    pub duplicates: u64,
    pub blank_lines: u64,
    pub errors: ErrorTally,
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n\n")?;
        writeln!(f, "Processing Stats")?;
        writeln!(f, "----------------")?;
        writeln!(f, "Records read          : {:>8}\n", self.records_read)?;
        writeln!(f, "Dates written to file : {:>8}\n", self.records_written)?;
        writeln!(f, "Duplicate dates       : {:>8}\n", self.duplicates)?;
        for (kind, count) in self.errors.iter() {
            writeln!(f, "   {:<17.17}  : {count:>8}", kind.label())?;
        }
        write!(f, "\n\n")
    }
}

enum ReadLine {
    Complete,
    Overlong,
}

/// Reads one line into `buf`, at most `max_len` bytes of content.
///
/// Bytes past the bound are scanned through the newline. If they are all
/// whitespace the line is `Complete` with the kept prefix, since trimming
/// would drop them anyway; otherwise it is `Overlong`. Either way the next
/// call starts on the next line. `None` at EOF.
fn read_bounded_line<R: BufRead>(
    reader: &mut R,
    max_len: usize,
    buf: &mut Vec<u8>,
) -> io::Result<Option<ReadLine>> {
    buf.clear();
    let limit = u64::try_from(max_len).map_or(u64::MAX, |len| len.saturating_add(1));
    let read = reader.by_ref().take(limit).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') || buf.len() <= max_len {
        return Ok(Some(ReadLine::Complete));
    }

    let mut overlong = buf.drain(max_len..).any(|byte| !byte.is_ascii_whitespace());
    overlong |= skip_rest_of_line(reader)?;
    if overlong {
        Ok(Some(ReadLine::Overlong))
    } else {
        Ok(Some(ReadLine::Complete))
    }
}

/// Consumes through the next newline, returning true if any
/// non-whitespace byte was skipped.
fn skip_rest_of_line<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    let mut content = false;
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            return Ok(content);
        }
        let (used, done) = chunk
            .iter()
            .position(|byte| *byte == b'\n')
            .map_or((chunk.len(), false), |at| (at + 1, true));
        content |= chunk[..used].iter().any(|byte| !byte.is_ascii_whitespace());
        reader.consume(used);
        if done {
            return Ok(content);
        }
    }
}

/// Owns the dedup store and counters for a single run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    store: DedupStore,
    stats: RunStats,
    max_line_len: usize,
}

impl Pipeline {
    pub fn new(max_line_len: usize) -> Self {
        Self {
            store: DedupStore::new(),
            stats: RunStats::default(),
            max_line_len,
        }
    }

    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub const fn store(&self) -> &DedupStore {
        &self.store
    }

    #[allow(clippy::missing_const_for_fn)]
    pub fn into_stats(self) -> RunStats {
        self.stats
    }

    /// Handles one raw line; trailing whitespace is trimmed here.
    ///
    /// # Errors
    /// Returns `PipelineError::Write` if the output rejects the date, or
    /// `PipelineError::Store` if the store cannot grow.
    pub fn process_line<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
    ) -> Result<LineOutcome, PipelineError> {
        self.stats.records_read += 1;
        let line_no = self.stats.records_read;

        let candidate = line.trim_end();
        if candidate.is_empty() {
            self.stats.blank_lines += 1;
            return Ok(LineOutcome::Blank);
        }

        let outcome = match validate(candidate) {
            ValidationResult::Invalid(kind) => {
                debug!(line = line_no, %kind, "rejected");
                self.stats.errors.record(kind);
                LineOutcome::Rejected(kind)
            }
            ValidationResult::Valid if self.store.contains(candidate) => {
                debug!(line = line_no, date = candidate, "duplicate");
                self.stats.duplicates += 1;
                LineOutcome::Duplicate
            }
            ValidationResult::Valid => {
                self.store.insert(candidate)?;
                writeln!(out, "{candidate}").map_err(|source| PipelineError::Write { source })?;
                self.stats.records_written += 1;
                LineOutcome::Written
            }
        };
        Ok(outcome)
    }

    /// Counts a line that exceeded the length bound.
    pub fn reject_overlong(&mut self) -> LineOutcome {
        self.stats.records_read += 1;
        warn!(
            line = self.stats.records_read,
            max_line_len = self.max_line_len,
            "line exceeds length bound"
        );
        self.stats.errors.record(ErrorKind::InvalidLength);
        LineOutcome::Rejected(ErrorKind::InvalidLength)
    }

    /// Processes every line of `reader`, then flushes `writer`.
    ///
    /// # Errors
    /// Returns the first fatal `PipelineError`; counters keep what was
    /// processed before it.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut reader: R,
        mut writer: W,
    ) -> Result<(), PipelineError> {
        let mut buf = Vec::with_capacity(self.max_line_len.saturating_add(1));
        loop {
            let line = self.stats.records_read + 1;
            let read = read_bounded_line(&mut reader, self.max_line_len, &mut buf)
                .map_err(|source| PipelineError::Read { line, source })?;
            match read {
                None => break,
                Some(ReadLine::Overlong) => {
                    self.reject_overlong();
                }
                Some(ReadLine::Complete) => {
                    let text = String::from_utf8_lossy(&buf);
                    self.process_line(&text, &mut writer)?;
                }
            }
        }
        writer
            .flush()
            .map_err(|source| PipelineError::Write { source })
    }
}

/// Runs the configured input file through a fresh pipeline into the
/// configured output file.
///
/// # Errors
/// Returns `PipelineError` if either file cannot be opened or a read,
/// write or store operation fails.
pub fn run_files(config: &Config) -> Result<RunStats, PipelineError> {
    let input = File::open(&config.input).map_err(|source| PipelineError::OpenInput {
        path: config.input.clone(),
        source,
    })?;
    let output = File::create(&config.output).map_err(|source| PipelineError::OpenOutput {
        path: config.output.clone(),
        source,
    })?;

    info!(
        input = %config.input.display(),
        output = %config.output.display(),
        max_line_len = config.max_line_len,
        "processing"
    );

    let mut pipeline = Pipeline::new(config.max_line_len);
    pipeline.run(BufReader::new(input), BufWriter::new(output))?;
    let stats = pipeline.into_stats();

    info!(
        read = stats.records_read,
        written = stats.records_written,
        duplicates = stats.duplicates,
        rejected = stats.errors.total(),
        "done"
    );
    Ok(stats)
}
