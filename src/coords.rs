//! Coordinate structure used to reference specific locations within parser input

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A [Coords] represents a single location within the parser input
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Coords {
    /// The absolute byte offset
    pub absolute: usize,
    /// The row position, starting at zero
    pub line: usize,
    /// The column position (in chars), starting at zero
    pub column: usize,
}

impl Coords {
    /// Work out the line and column of a byte `offset` within `input`. Offsets beyond the end of
    /// the input are clamped to the end.
    pub fn locate(input: &str, offset: usize) -> Self {
        let mut offset = offset.min(input.len());
        while !input.is_char_boundary(offset) {
            offset -= 1;
        }
        let preceding = &input[..offset];
        let line = preceding.matches('\n').count();
        let line_start = preceding.rfind('\n').map_or(0, |nl| nl + 1);
        Coords {
            absolute: offset,
            line,
            column: preceding[line_start..].chars().count(),
        }
    }
}

impl Display for Coords {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[abs: {}, line: {}, column: {}]",
            self.absolute, self.line, self.column
        )
    }
}

impl Default for Coords {
    /// The default set of coordinates are positioned at the start of the first row
    fn default() -> Self {
        Coords {
            absolute: 0,
            line: 0,
            column: 0,
        }
    }
}

impl Eq for Coords {}

impl PartialOrd<Self> for Coords {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coords {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute.cmp(&other.absolute)
    }
}

#[cfg(test)]
mod tests {
    use super::Coords;

    #[test]
    fn should_locate_the_start_of_input() {
        assert_eq!(Coords::locate("{}", 0), Coords::default())
    }

    #[test]
    fn should_count_lines_and_columns() {
        let coords = Coords::locate("{\n  \"a\" : 1\n}", 6);
        assert_eq!(coords.absolute, 6);
        assert_eq!(coords.line, 1);
        assert_eq!(coords.column, 4);
    }

    #[test]
    fn should_count_columns_in_chars() {
        let input = "\"é\" x";
        let coords = Coords::locate(input, input.find('x').unwrap());
        assert_eq!(coords.column, 4);
    }

    #[test]
    fn should_clamp_offsets_past_the_end() {
        let coords = Coords::locate("[1]", 99);
        assert_eq!(coords.absolute, 3);
        assert_eq!(coords.column, 3);
    }

    #[test]
    fn should_order_by_absolute_position() {
        let input = "[1,\n2]";
        assert!(Coords::locate(input, 1) < Coords::locate(input, 4));
    }
}
