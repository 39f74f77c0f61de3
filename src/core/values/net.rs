use serde::Serialize;

/// Widest net the store can hold
pub const MAX_WIDTH: u32 = 64;

/// All-ones mask for `width` bits
pub fn mask(width: u32) -> u64 {
    if width >= MAX_WIDTH {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Read `width` bits of `value` starting at `offset`
pub fn extract(value: u64, offset: u32, width: u32) -> u64 {
    if offset >= MAX_WIDTH {
        return 0;
    }
    (value >> offset) & mask(width)
}

/// Replace exactly `width` bits of `target` at `offset` with `bits`,
/// leaving every other bit untouched
pub fn insert(target: u64, offset: u32, width: u32, bits: u64) -> u64 {
    if offset >= MAX_WIDTH {
        return target;
    }
    let field = mask(width) << offset;
    (target & !field) | ((bits << offset) & field)
}

/// Shared storage cell for a connected group of endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Net {
    pub(crate) width: u32,
    pub(crate) value: u64,
}

impl Net {
    /// Create a zero-valued net
    pub fn new(width: u32) -> Self {
        Self { width, value: 0 }
    }

    /// Create a net holding `value`, truncated to `width`
    pub fn with_value(width: u32, value: u64) -> Self {
        Self {
            width,
            value: value & mask(width),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Check if `value` is representable in this net
    pub fn fits(&self, value: u64) -> bool {
        value & !mask(self.width) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_edges() {
        assert_eq!(mask(1), 1);
        assert_eq!(mask(8), 0xff);
        assert_eq!(mask(63), u64::MAX >> 1);
        assert_eq!(mask(64), u64::MAX);
    }

    #[test]
    fn test_insert_replaces_only_field() {
        // clearing a set bit must work, unlike an OR-merge
        assert_eq!(insert(0b1111, 1, 1, 0), 0b1101);
        assert_eq!(insert(0b0000, 2, 2, 0b11), 0b1100);
        assert_eq!(insert(0xff00, 4, 8, 0xab), 0xfab0);
        // bits beyond the field width are discarded
        assert_eq!(insert(0, 0, 4, 0xff), 0xf);
    }

    #[test]
    fn test_extract() {
        assert_eq!(extract(0b1011_0000, 4, 4), 0b1011);
        assert_eq!(extract(u64::MAX, 0, 64), u64::MAX);
        assert_eq!(extract(u64::MAX, 63, 1), 1);
    }

    #[test]
    fn test_net_with_value_truncates() {
        let net = Net::with_value(4, 0x1f);
        assert_eq!(net.value(), 0xf);
        assert!(net.fits(0xf));
        assert!(!net.fits(0x10));
    }
}
