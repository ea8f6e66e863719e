use percolation::input::parse_script;
use percolation::{Percolation, PercolationError, SiteState};
use rstest::rstest;

fn snapshot(p: &Percolation) -> (usize, bool, Vec<SiteState>) {
    (
        p.number_of_open_sites(),
        p.percolates(),
        p.sites().map(|(_, _, s)| s).collect(),
    )
}

#[rstest]
#[case("1\n0 0\n", 1, true)]
#[case("2\n0 0\n1 1\n", 2, false)]
#[case("2\n0 0\n0 1\n1 0\n1 1\n", 4, true)]
#[case("3\n2 0\n2 1\n2 2\n1 0\n", 4, false)]
#[case("3\n0 2\n1 2\n1 1\n1 0\n2 0\n", 5, true)]
fn scripted_runs(#[case] script: &str, #[case] open: usize, #[case] percolates: bool) {
    let perc = parse_script(script).unwrap().replay().unwrap();
    assert_eq!(perc.number_of_open_sites(), open);
    assert_eq!(perc.percolates(), percolates);
}

#[test]
fn serpentine_path_fills_in_order() {
    // Snake through a 5x5 grid; every opened site is full as soon as it is opened
    let n = 5;
    let mut p = Percolation::new(n).unwrap();
    let mut path = Vec::new();
    for r in 0..n {
        if r % 4 == 0 {
            for c in 0..n {
                path.push((r, c));
            }
        } else if r % 4 == 2 {
            for c in (0..n).rev() {
                path.push((r, c));
            }
        } else {
            path.push((r, if r % 4 == 1 { n - 1 } else { 0 }));
        }
    }
    for &(r, c) in &path {
        p.open(r, c).unwrap();
        assert!(p.is_full(r, c).unwrap(), "({r}, {c}) should be full");
    }
    assert!(p.percolates());
    assert_eq!(p.number_of_open_sites(), path.len());
}

#[test]
fn reopening_every_site_changes_nothing() {
    let sites = [(0, 1), (1, 1), (1, 2), (3, 2), (3, 3), (2, 2)];
    let mut p = Percolation::new(4).unwrap();
    for &(r, c) in &sites {
        p.open(r, c).unwrap();
    }
    let before = snapshot(&p);
    for &(r, c) in &sites {
        p.open(r, c).unwrap();
    }
    assert_eq!(snapshot(&p), before);
}

#[test]
fn isolated_bottom_cluster_never_fills() {
    let mut p = Percolation::new(4).unwrap();
    // Percolating column 0
    for r in 0..4 {
        p.open(r, 0).unwrap();
    }
    // Cluster hanging off the bottom row only
    for &(r, c) in &[(3, 2), (3, 3), (2, 3), (1, 3)] {
        p.open(r, c).unwrap();
    }
    assert!(p.percolates());
    for &(r, c) in &[(3, 2), (3, 3), (2, 3), (1, 3)] {
        assert!(p.is_open(r, c).unwrap());
        assert!(!p.is_full(r, c).unwrap(), "({r}, {c}) backwashed");
    }

    // Bridging to the top makes the cluster full
    p.open(0, 3).unwrap();
    assert!(p.is_full(3, 2).unwrap());
}

#[rstest]
#[case(-1, 0)]
#[case(4, 0)]
#[case(0, 4)]
fn bounds_errors_are_distinct_from_size_errors(#[case] row: i64, #[case] col: i64) {
    let mut p = Percolation::new(4).unwrap();
    let err = p.open(row, col).unwrap_err();
    assert!(matches!(err, PercolationError::OutOfBounds { .. }));
    assert!(!matches!(err, PercolationError::InvalidSize { .. }));
    assert_eq!(p.number_of_open_sites(), 0);
}
