// Positional phone tags and word-boundary categories

use std::fmt;

/// Role of a phone within one pronunciation.
///
/// A single-phone pronunciation uses [`Singleton`](PositionTag::Singleton).
/// Longer ones use [`Begin`](PositionTag::Begin) for the first phone,
/// [`End`](PositionTag::End) for the last and [`Internal`](PositionTag::Internal)
/// for everything in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionTag {
    Begin,
    End,
    Singleton,
    Internal,
}

impl PositionTag {
    /// Tags in symbol-table order. Every phone gets its variants allocated in
    /// this order.
    pub const ALL: [PositionTag; 4] = [
        PositionTag::Begin,
        PositionTag::End,
        PositionTag::Singleton,
        PositionTag::Internal,
    ];

    /// Suffix appended to the phone name, e.g. `_B`.
    pub fn suffix(self) -> &'static str {
        match self {
            PositionTag::Begin => "_B",
            PositionTag::End => "_E",
            PositionTag::Singleton => "_S",
            PositionTag::Internal => "_I",
        }
    }

    /// Tag for position `index` in a pronunciation of length `len`.
    ///
    /// `len` must be at least 1 and `index < len`.
    pub fn for_position(index: usize, len: usize) -> PositionTag {
        debug_assert!(index < len);
        if len == 1 {
            PositionTag::Singleton
        } else if index == 0 {
            PositionTag::Begin
        } else if index + 1 == len {
            PositionTag::End
        } else {
            PositionTag::Internal
        }
    }

    /// Decorate `phone` with this tag.
    pub fn apply(self, phone: &str) -> String {
        let mut tagged = String::with_capacity(phone.len() + 2);
        tagged.push_str(phone);
        tagged.push_str(self.suffix());
        tagged
    }

    /// The word-boundary category that downstream alignment tools expect for
    /// phones carrying this tag.
    pub fn boundary(self) -> WordBoundary {
        match self {
            PositionTag::Begin => WordBoundary::Begin,
            PositionTag::End => WordBoundary::End,
            PositionTag::Singleton => WordBoundary::Singleton,
            PositionTag::Internal => WordBoundary::Internal,
        }
    }
}

/// Word-boundary category of a phone symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordBoundary {
    /// Undecorated silence phone; not part of any word.
    Nonword,
    Begin,
    End,
    Singleton,
    Internal,
}

impl WordBoundary {
    pub fn as_str(self) -> &'static str {
        match self {
            WordBoundary::Nonword => "nonword",
            WordBoundary::Begin => "begin",
            WordBoundary::End => "end",
            WordBoundary::Singleton => "singleton",
            WordBoundary::Internal => "internal",
        }
    }
}

impl fmt::Display for WordBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
