//! Choosing the number of clusters from the distortion curve

use crate::error::LogClusterError;
use crate::model::DistortionCurve;
use crate::viz::render_elbow_chart;
use std::io::{BufRead, Write};

/// Prompt shown before reading k
pub const PROMPT: &str = "Enter the optimal number of clusters (k): ";

/// Decides k after seeing the distortion curve
pub trait KSelector {
    fn select(&mut self, curve: &DistortionCurve) -> crate::Result<usize>;
}

/// A k decided up front, e.g. from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedK(pub usize);

impl KSelector for FixedK {
    fn select(&mut self, _curve: &DistortionCurve) -> crate::Result<usize> {
        Ok(self.0)
    }
}

/// Shows the elbow chart and asks a human for k
///
/// Reads a single line; anything but a positive integer fails with
/// `InvalidSelection`, there is no second attempt.
pub struct InteractiveSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> KSelector for InteractiveSelector<R, W> {
    fn select(&mut self, curve: &DistortionCurve) -> crate::Result<usize> {
        render_elbow_chart(curve, &mut self.output)?;
        write!(self.output, "{}", PROMPT)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        parse_selection(&line)
    }
}

/// Parse a human-entered k
pub fn parse_selection(raw: &str) -> crate::Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(k) if k > 0 => Ok(k),
        _ => Err(LogClusterError::InvalidSelection(raw.trim().to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn curve() -> DistortionCurve {
        DistortionCurve {
            points: vec![(1, 4.0), (2, 1.5), (3, 0.5)],
        }
    }

    fn selection_error(raw: &str) -> Option<LogClusterError> {
        parse_selection(raw)
            .unwrap_err()
            .downcast_ref::<LogClusterError>()
            .cloned()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("3\n").unwrap(), 3);
        assert_eq!(parse_selection("  12 ").unwrap(), 12);

        for raw in ["0", "-2", "two", "2.5", ""] {
            assert_eq!(
                selection_error(raw),
                Some(LogClusterError::InvalidSelection(raw.to_string()))
            );
        }
    }

    #[test]
    fn test_interactive_shows_chart_then_prompt() {
        let mut selector = InteractiveSelector::new(Cursor::new("2\n"), Vec::new());
        assert_eq!(selector.select(&curve()).unwrap(), 2);

        let shown = String::from_utf8(selector.into_output()).unwrap();
        assert!(shown.contains("Elbow Method for Optimal k"));
        assert!(shown.ends_with(PROMPT));
    }

    #[test]
    fn test_interactive_end_of_input() {
        let mut selector = InteractiveSelector::new(Cursor::new(""), Vec::new());
        let err = selector.select(&curve()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LogClusterError>(),
            Some(LogClusterError::InvalidSelection(_))
        ));
    }

    #[test]
    fn test_fixed_k() {
        assert_eq!(FixedK(5).select(&curve()).unwrap(), 5);
    }
}
