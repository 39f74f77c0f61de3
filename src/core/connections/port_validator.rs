use crate::core::components::design::Design;
use crate::core::errors::{SimResult, StructuralError};
use crate::core::types::Endpoint;
use crate::core::values::{mask, MAX_WIDTH};

/// Width and value checks applied before anything touches the store
pub struct PortValidator;

impl PortValidator {
    /// Validate that a declared width is representable
    pub fn validate_width(width: u32) -> SimResult<()> {
        if width == 0 || width > MAX_WIDTH {
            return Err(StructuralError::InvalidWidth { width }.into());
        }
        Ok(())
    }

    /// Validate that a constant fits the endpoint it drives
    pub fn validate_constant(value: u64, width: u32) -> SimResult<()> {
        Self::validate_width(width)?;
        if value & !mask(width) != 0 {
            return Err(StructuralError::ConstantOverflow { value, width }.into());
        }
        Ok(())
    }

    /// Validate that two endpoints can share storage
    pub fn validate_widths(design: &Design, left: Endpoint, right: Endpoint) -> SimResult<u32> {
        let left_width = design.width_of(left)?;
        let right_width = design.width_of(right)?;
        if left_width != right_width {
            return Err(StructuralError::WidthMismatch {
                left: design.describe(left),
                left_width,
                right: design.describe(right),
                right_width,
            }
            .into());
        }
        Ok(left_width)
    }
}
