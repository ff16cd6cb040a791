// blocks.rs - Streaming tokenizer for the bracketed block text format
//
//   # comment (only as the first thing on a line)
//   $[1,2,3,model]
//
// Whitespace is insignificant everywhere, so parameters cannot contain it.
// Characters outside a block that are not a known delimiter are skipped.

use thiserror::Error;
use walkmap::WalkmapError;

pub const COMMENT_DELIMITER: char = '#';
pub const PARAMETER_DELIMITER: char = ',';
pub const BLOCK_OPEN: char = '[';
pub const BLOCK_CLOSE: char = ']';

#[derive(Debug, Error, PartialEq)]
pub enum BlockError {
    #[error("line {line}: expected '[' after '{kind}', found '{found}'")]
    MissingOpen { line: usize, kind: char, found: char },

    #[error("line {line}: '{kind}' block is never closed")]
    Unterminated { line: usize, kind: char },

    #[error("line {line}: parameter {index} of '{kind}' block is not a valid number: '{value}'")]
    BadNumber { line: usize, kind: char, index: usize, value: String },

    #[error("line {line}: '{kind}' block needs at least {expected} parameters, found {found}")]
    MissingParameters { line: usize, kind: char, expected: usize, found: usize },

    #[error(transparent)]
    Walkmap(#[from] WalkmapError),
}

/// One `kind[param,param,...]` block
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub kind: char,
    pub params: Vec<String>,
    /// Line the block starts on, 1-based
    pub line: usize,
}

impl Block {
    pub fn require(&self, expected: usize) -> Result<(), BlockError> {
        if self.params.len() < expected {
            return Err(BlockError::MissingParameters {
                line: self.line,
                kind: self.kind,
                expected,
                found: self.params.len(),
            });
        }
        Ok(())
    }

    /// Parse parameter `index` as `T`. The parameter must exist.
    pub fn number<T: std::str::FromStr>(&self, index: usize) -> Result<T, BlockError> {
        self.require(index + 1)?;
        let value = &self.params[index];
        value.parse().map_err(|_| BlockError::BadNumber {
            line: self.line,
            kind: self.kind,
            index,
            value: value.clone(),
        })
    }

    pub fn float(&self, index: usize) -> Result<f32, BlockError> {
        self.number(index)
    }

    /// Parameters `start..start + N` as floats
    pub fn floats<const N: usize>(&self, start: usize) -> Result<[f32; N], BlockError> {
        let mut values = [0.0; N];
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.float(start + i)?;
        }
        Ok(values)
    }

    /// Parameter `index` as text, if present and non-empty
    pub fn text(&self, index: usize) -> Option<&str> {
        self.params
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Split `input` into blocks whose delimiter is one of `kinds`
pub fn parse_blocks(input: &str, kinds: &[char]) -> Result<Vec<Block>, BlockError> {
    let mut blocks = Vec::new();

    let mut line = 1;
    let mut line_start = true;
    let mut in_comment = false;

    // Delimiter seen, waiting for BLOCK_OPEN
    let mut opening: Option<(char, usize)> = None;
    let mut current: Option<Block> = None;
    let mut param = String::new();

    for ch in input.chars() {
        if ch == '\n' {
            line += 1;
            line_start = true;
            in_comment = false;
            continue;
        }
        if in_comment || ch.is_whitespace() {
            continue;
        }
        if line_start && ch == COMMENT_DELIMITER {
            in_comment = true;
            continue;
        }
        line_start = false;

        if let Some(block) = current.as_mut() {
            match ch {
                PARAMETER_DELIMITER => block.params.push(std::mem::take(&mut param)),
                BLOCK_CLOSE => {
                    if !param.is_empty() || !block.params.is_empty() {
                        block.params.push(std::mem::take(&mut param));
                    }
                    blocks.extend(current.take());
                }
                _ => param.push(ch),
            }
        } else if let Some((kind, start)) = opening.take() {
            if ch != BLOCK_OPEN {
                return Err(BlockError::MissingOpen { line, kind, found: ch });
            }
            current = Some(Block {
                kind,
                params: Vec::new(),
                line: start,
            });
        } else if kinds.contains(&ch) {
            opening = Some((ch, line));
        }
    }

    if let Some((kind, line)) = opening.or(current.map(|b| (b.kind, b.line))) {
        return Err(BlockError::Unterminated { line, kind });
    }

    Ok(blocks)
}
