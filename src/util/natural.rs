//! Natural string comparison for filename and title ordering.
//!
//! Plain code-point comparison puts `file10` before `file2`, which reads wrong
//! in upload listings. Natural comparison treats embedded digit runs as numbers
//! so `file2` sorts before `file10`. Non-digit characters still compare by code
//! point.

use std::cmp::Ordering;

/// Compares two strings, ordering embedded digit runs by numeric value.
///
/// Digit runs of arbitrary length are supported; runs are compared without
/// parsing into an integer so inputs longer than any machine word cannot
/// overflow. Runs that differ only in leading zeros compare equal and the
/// comparison continues with the remaining text.
///
/// # Arguments
/// - `a` - Left-hand string
/// - `b` - Right-hand string
///
/// # Returns
/// - `Ordering` - Natural ordering of `a` relative to `b`
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();

    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let run_a = take_digit_run(&mut ca);
                    let run_b = take_digit_run(&mut cb);

                    let ordering = compare_digit_runs(&run_a, &run_b);
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                } else {
                    let ordering = x.cmp(&y);
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                    ca.next();
                    cb.next();
                }
            }
        }
    }
}

/// Consumes and returns the contiguous run of ASCII digits at the iterator head.
fn take_digit_run(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compares two digit runs by numeric value.
///
/// Leading zeros are ignored; after that, a longer run is always the larger
/// number and equal-length runs compare lexicographically.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');

    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
