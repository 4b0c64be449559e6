//! Reader for the word2vec text format.
//!
//! The first line declares `<vocab_size> <dimensionality>`; every following
//! line is `<key> <c0> <c1> ... <c{D-1}>` separated by single spaces. The
//! reader is a lazy iterator of [`RawRecord`]s and stops after the declared
//! number of lines (or the configured limit, whichever is smaller). Running
//! out of input before that is an error.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use embstore_types::embedding::RawRecord;
use embstore_types::error::ParseError;

/// Streaming word2vec text reader over any `BufRead`.
pub struct Word2VecReader<R: BufRead> {
    reader: R,
    vocab_size: usize,
    dimension: usize,
    expected: usize,
    read: usize,
    buf: Vec<u8>,
    done: bool,
}

impl Word2VecReader<BufReader<File>> {
    /// Open a word2vec text file and read its header.
    pub fn open(path: &Path) -> Result<Self, ParseError> {
        let file =
            File::open(path).map_err(|e| ParseError::Io(format!("{}: {e}", path.display())))?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> Word2VecReader<R> {
    /// Wrap `reader` and consume the header line.
    pub fn new(mut reader: R) -> Result<Self, ParseError> {
        let mut header = String::new();
        let n = reader
            .read_line(&mut header)
            .map_err(|e| ParseError::Io(e.to_string()))?;
        if n == 0 {
            return Err(ParseError::Header("empty input".to_string()));
        }

        let (vocab_size, dimension) = parse_header(&header)?;
        tracing::debug!(vocab_size, dimension, "read word2vec header");

        Ok(Self {
            reader,
            vocab_size,
            dimension,
            expected: vocab_size,
            read: 0,
            buf: Vec::new(),
            done: false,
        })
    }

    /// Read at most `limit` data lines.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.expected = match limit {
            Some(limit) => self.vocab_size.min(limit),
            None => self.vocab_size,
        };
        self
    }

    /// Vocabulary size declared by the header.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Dimensionality declared by the header.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of data lines this reader will yield.
    pub fn expected_records(&self) -> usize {
        self.expected
    }

    fn read_record(&mut self) -> Result<RawRecord, ParseError> {
        let line_no = self.read + 1;

        self.buf.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(|e| ParseError::Io(e.to_string()))?;
        if n == 0 {
            return Err(ParseError::UnexpectedEof {
                expected: self.expected,
                read: self.read,
            });
        }

        let text = std::str::from_utf8(&self.buf)
            .map_err(|_| ParseError::Encoding { line: line_no })?;
        let record = parse_line(text.trim_end(), line_no, self.dimension)?;

        self.read += 1;
        Ok(record)
    }
}

impl<R: BufRead> Iterator for Word2VecReader<R> {
    type Item = Result<RawRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.read >= self.expected {
            return None;
        }

        let result = self.read_record();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

fn parse_header(header: &str) -> Result<(usize, usize), ParseError> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    let [vocab, dim] = fields.as_slice() else {
        return Err(ParseError::Header(format!(
            "expected '<vocab_size> <dimensionality>', got '{}'",
            header.trim()
        )));
    };

    let vocab_size = vocab
        .parse::<usize>()
        .map_err(|_| ParseError::Header(format!("invalid vocabulary size '{vocab}'")))?;
    let dimension = dim
        .parse::<usize>()
        .map_err(|_| ParseError::Header(format!("invalid dimensionality '{dim}'")))?;
    if dimension == 0 {
        return Err(ParseError::Header("dimensionality must be positive".to_string()));
    }

    Ok((vocab_size, dimension))
}

fn parse_line(line: &str, line_no: usize, dimension: usize) -> Result<RawRecord, ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();
    if parts.len() != dimension + 1 {
        return Err(ParseError::FieldCount {
            line: line_no,
            expected: dimension + 1,
            actual: parts.len(),
        });
    }

    let vector = parts[1..]
        .iter()
        .map(|token| match token.parse::<f32>() {
            // NaN and infinities parse but cannot be stored as REAL NOT NULL.
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(ParseError::InvalidNumber {
                line: line_no,
                token: (*token).to_string(),
            }),
        })
        .collect::<Result<Vec<f32>, ParseError>>()?;

    Ok(RawRecord {
        line: line_no,
        key: parts[0].to_string(),
        vector,
    })
}
