use std::fmt;
use std::ops::{Add, Sub};

/// Half-open range `[start, end)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Region<T>
where
    T: Add<Output = T> + Sub<Output = T> + Ord + Copy,
{
    start: T,
    end: T,
}

impl<T> Region<T>
where
    T: Add<Output = T> + Sub<Output = T> + Ord + Copy,
{
    pub fn new(start: T, end: T) -> Self {
        assert!(end >= start);
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> T {
        self.start
    }

    #[inline]
    pub fn end(&self) -> T {
        self.end
    }

    #[inline]
    pub fn size(&self) -> T {
        self.end - self.start
    }
}

#[cfg(test)]
impl<T> Region<T>
where
    T: Add<Output = T> + Sub<Output = T> + Ord + Copy,
{
    pub(crate) fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `self` begins exactly where `other` ends.
    pub(crate) fn follows(&self, other: &Self) -> bool {
        self.start == other.end
    }
}

impl<T> fmt::Display for Region<T>
where
    T: Add<Output = T> + Sub<Output = T> + Ord + Copy + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{} - {}}}", self.start, self.end)
    }
}

#[cfg(test)]
#[test]
fn test_region_overlap() {
    macro_rules! test {
        (false, $r0:expr, $r1:expr) => {{
            assert!(!$r0.overlaps(&$r1));
            assert!(!$r1.overlaps(&$r0));
        }};
        (true, $r0:expr, $r1:expr) => {{
            assert!($r0.overlaps(&$r1));
            assert!($r1.overlaps(&$r0));
        }};
    }

    test!(false, Region::new(0, 4), Region::new(8, 20));
    test!(false, Region::new(1, 33), Region::new(33, 65));
    test!(true, Region::new(1, 33), Region::new(32, 65));
    test!(true, Region::new(8, 524), Region::new(4, 22));
}

#[cfg(test)]
#[test]
fn test_region_size_and_follows() {
    crate::tests_init();

    let a = Region::new(33u64, 65);
    let b = Region::new(a.end(), 129);

    assert_eq!(a.size(), 32);
    assert_eq!(b.size(), 64);
    assert!(b.follows(&a));
    assert!(!a.follows(&b));
    assert_eq!(format!("{}", b), "{65 - 129}");
}
