use super::layout::ExistingPartition;
use super::DesiredPartition;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Comparison {
    Converged,
    /// First position after the anchor where the layouts diverge.
    MismatchAt(usize),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct MissingAnchor;

/// Positional comparison of `existing` (anchor first) against `desired`.
/// Sizes within `delta` bytes of each other count as equal.
pub fn compare(
    existing: &[ExistingPartition],
    desired: &[DesiredPartition],
    delta: u64,
) -> Result<Comparison, MissingAnchor> {
    let tail = match existing.split_first() {
        Some((anchor, tail)) if anchor.number == 1 => tail,
        _ => return Err(MissingAnchor),
    };

    let mut index = 0;
    loop {
        match (tail.get(index), desired.get(index)) {
            (None, None) => return Ok(Comparison::Converged),
            (Some(e), Some(d)) if within_delta(e.size, d.size, delta) => index += 1,
            _ => return Ok(Comparison::MismatchAt(index)),
        }
    }
}

#[inline]
fn within_delta(a: u64, b: u64, delta: u64) -> bool {
    let diff = if a > b { a - b } else { b - a };
    diff <= delta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(sizes: &[u64]) -> Vec<ExistingPartition> {
        let mut start = 1;
        sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let p = ExistingPartition {
                    number: i as u32 + 1,
                    start,
                    end: start + size,
                    size,
                    fs_type: "ext4".to_owned(),
                };
                start += size;
                p
            })
            .collect()
    }

    fn desired(sizes: &[u64]) -> Vec<DesiredPartition> {
        sizes.iter().map(|&size| DesiredPartition::new(size)).collect()
    }

    #[test]
    fn test_compare() {
        crate::tests_init();

        macro_rules! test {
            ([$($e:expr),*], [$($d:expr),*], $delta:expr, $expect:expr) => {{
                assert_eq!(
                    compare(&existing(&[$($e),*]), &desired(&[$($d),*]), $delta),
                    Ok($expect)
                );
            }};
        }

        test!([32], [], 0, Comparison::Converged);
        test!([32, 32], [32], 0, Comparison::Converged);
        test!([32], [32, 64], 0, Comparison::MismatchAt(0));
        test!([32, 32, 32], [32], 0, Comparison::MismatchAt(1));
        test!([32, 15, 32, 32, 8], [16, 16, 32], 1, Comparison::MismatchAt(1));
        test!([32, 32, 64], [32, 65], 0, Comparison::MismatchAt(1));
        test!([32, 32, 64], [32, 63], 1, Comparison::Converged);
    }

    #[test]
    fn test_delta_is_inclusive() {
        crate::tests_init();

        let e = existing(&[32, 100]);
        assert_eq!(compare(&e, &desired(&[110]), 10), Ok(Comparison::Converged));
        assert_eq!(compare(&e, &desired(&[90]), 10), Ok(Comparison::Converged));
        assert_eq!(
            compare(&e, &desired(&[111]), 10),
            Ok(Comparison::MismatchAt(0))
        );
        assert_eq!(
            compare(&e, &desired(&[89]), 10),
            Ok(Comparison::MismatchAt(0))
        );
    }

    #[test]
    fn test_missing_anchor() {
        crate::tests_init();

        assert_eq!(compare(&[], &desired(&[32]), 0), Err(MissingAnchor));

        let mut e = existing(&[32, 32]);
        e.remove(0);
        assert_eq!(compare(&e, &desired(&[32]), 0), Err(MissingAnchor));
    }
}
