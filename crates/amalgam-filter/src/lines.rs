//! Line splitting that keeps terminators attached.

/// Iterator over the lines of a byte buffer.
///
/// A line ends at `\n`, at `\r\n`, or at a lone `\r`. Each yielded slice
/// includes its terminator bytes. A final line without a terminator is
/// yielded as-is, so joining the yielded slices reproduces the input exactly.
#[derive(Debug, Clone)]
pub struct SplitLines<'a> {
    rest: &'a [u8],
}

/// Split `bytes` into lines, terminators included.
pub fn split_lines(bytes: &[u8]) -> SplitLines<'_> {
    SplitLines { rest: bytes }
}

impl<'a> Iterator for SplitLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let end = match self.rest.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(pos) if self.rest[pos] == b'\r' && self.rest.get(pos + 1) == Some(&b'\n') => pos + 2,
            Some(pos) => pos + 1,
            None => self.rest.len(),
        };

        let (line, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(line)
    }
}
