use crate::error::{InputError, PercolationError};
use crate::percolation::Percolation;

/// A grid size followed by the sites to open, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Script {
    pub n: i64,
    pub sites: Vec<(i64, i64)>,
}

/// Parse whitespace-separated integers: `N` then `row col` pairs.
/// Line breaks carry no meaning.
pub fn parse_script(text: &str) -> Result<Script, InputError> {
    let mut values = text.split_whitespace().enumerate().map(|(index, token)| {
        token.parse::<i64>().map_err(|_| InputError::InvalidInteger {
            index,
            token: token.to_string(),
        })
    });

    let n = values.next().ok_or(InputError::Empty)??;
    let mut sites = Vec::new();
    while let Some(row) = values.next() {
        let row = row?;
        let col = values
            .next()
            .ok_or(InputError::DanglingCoordinate { row })??;
        sites.push((row, col));
    }
    Ok(Script { n, sites })
}

impl Script {
    /// Build the grid and open every site in order.
    pub fn replay(&self) -> Result<Percolation, PercolationError> {
        let mut perc = Percolation::new(self.n)?;
        for &(row, col) in &self.sites {
            perc.open(row, col)?;
        }
        Ok(perc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_across_lines() {
        let s = parse_script("3\n0 1\n 1 1\n2\n1\n").unwrap();
        assert_eq!(s.n, 3);
        assert_eq!(s.sites, vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn size_only_is_valid() {
        let s = parse_script("  10 ").unwrap();
        assert_eq!(s.n, 10);
        assert!(s.sites.is_empty());
    }

    #[test]
    fn reports_errors() {
        assert_eq!(parse_script(" \n"), Err(InputError::Empty));
        assert_eq!(
            parse_script("3 0 x"),
            Err(InputError::InvalidInteger {
                index: 2,
                token: "x".into()
            })
        );
        assert_eq!(
            parse_script("3 0 0 2"),
            Err(InputError::DanglingCoordinate { row: 2 })
        );
    }

    #[test]
    fn replay_opens_in_order() {
        let perc = parse_script("3 0 1 1 1 2 1").unwrap().replay().unwrap();
        assert_eq!(perc.number_of_open_sites(), 3);
        assert!(perc.percolates());
    }

    #[test]
    fn replay_surfaces_bad_sites() {
        let err = parse_script("2 0 0 0 2").unwrap().replay().unwrap_err();
        assert_eq!(err, PercolationError::OutOfBounds { row: 0, col: 2, n: 2 });
    }
}
