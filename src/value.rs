/// Bit width of the FIFO data path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataWidth(u32);

impl DataWidth {
    pub const MAX: u32 = 16;

    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Number of distinct data values, `2^W`.
    pub fn domain_size(&self) -> u64 {
        1u64 << self.0
    }

    pub fn mask(&self) -> u32 {
        (self.domain_size() - 1) as u32
    }

    pub fn is_valid(&self) -> bool {
        self.0 > 0 && self.0 <= Self::MAX
    }
}

impl std::fmt::Display for DataWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} bit", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_and_mask() {
        let w = DataWidth::new(4);
        assert_eq!(w.domain_size(), 16);
        assert_eq!(w.mask(), 0xf);
        assert_eq!(DataWidth::new(16).mask(), 0xffff);
    }

    #[test]
    fn validity_bounds() {
        assert!(!DataWidth::new(0).is_valid());
        assert!(DataWidth::new(1).is_valid());
        assert!(DataWidth::new(16).is_valid());
        assert!(!DataWidth::new(17).is_valid());
    }
}
