use std::fmt;

/// A byte offset into the source text.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct SrcLoc(usize);

impl SrcLoc {
    /// Zero-based `(line, column)` of this location within `code`.
    pub fn in_context(&self, code: &str) -> (usize, usize) {
        let mut pos = self.0;
        for (i, line) in code.split('\n').enumerate() {
            if pos < line.len() + 1 {
                return (i, pos);
            }
            pos -= line.len() + 1;
        }
        (code.split('\n').count(), 0)
    }
}

impl fmt::Debug for SrcLoc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<usize> for SrcLoc {
    fn from(pos: usize) -> Self {
        Self(pos)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
pub enum SrcRegion {
    None,
    Range(SrcLoc, SrcLoc),
}

impl SrcRegion {
    pub fn none() -> Self {
        SrcRegion::None
    }

    /// The empty region sitting at `loc`, used for end-of-input.
    pub fn at(loc: SrcLoc) -> Self {
        SrcRegion::Range(loc, loc)
    }

    pub fn range(from: SrcLoc, until: SrcLoc) -> Self {
        if from.0 <= until.0 {
            SrcRegion::Range(from, until)
        } else {
            SrcRegion::None
        }
    }

    pub fn start(&self) -> Option<SrcLoc> {
        match self {
            SrcRegion::Range(from, _) => Some(*from),
            SrcRegion::None => None,
        }
    }

    pub fn in_context(&self, code: &str) -> Option<((usize, usize), (usize, usize))> {
        match self {
            SrcRegion::Range(from, until) => Some((from.in_context(code), until.in_context(code))),
            SrcRegion::None => None,
        }
    }
}

impl fmt::Debug for SrcRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SrcRegion::None => write!(f, "<none>"),
            SrcRegion::Range(from, to) => write!(f, "{:?}:{:?}", from, to),
        }
    }
}

impl From<(usize, usize)> for SrcRegion {
    fn from((from, to): (usize, usize)) -> Self {
        SrcRegion::range(SrcLoc::from(from), SrcLoc::from(to))
    }
}
