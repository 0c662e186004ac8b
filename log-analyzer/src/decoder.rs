use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use flate2::read::MultiGzDecoder;

use crate::{
    error::{AnalyzerError, AnalyzerResult},
    models::LocatedLog,
};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Forward-only line reader over a located log. Gzip is decoded on the fly
/// and invalid UTF-8 is replaced rather than rejected. The file handle is
/// released when the decoder is dropped.
pub struct LineDecoder {
    path: PathBuf,
    reader: Box<dyn BufRead + Send>,
    buf: Vec<u8>,
    done: bool,
}

impl LineDecoder {
    pub fn open(log: &LocatedLog) -> AnalyzerResult<Self> {
        let file = File::open(&log.path).map_err(|e| AnalyzerError::io(&log.path, e))?;
        let reader: Box<dyn BufRead + Send> = if log.compressed {
            Box::new(BufReader::with_capacity(
                READ_BUFFER_SIZE,
                MultiGzDecoder::new(file),
            ))
        } else {
            Box::new(BufReader::with_capacity(READ_BUFFER_SIZE, file))
        };
        Ok(Self {
            path: log.path.clone(),
            reader,
            buf: Vec::new(),
            done: false,
        })
    }
}

impl Iterator for LineDecoder {
    type Item = AnalyzerResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => {
                self.done = true;
                Some(Err(AnalyzerError::io(&self.path, e)))
            }
        }
    }
}
