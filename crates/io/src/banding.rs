use quotemerge_recon::model::SourceBlock;

/// Light blue fill for even-numbered source blocks.
pub const BAND_LIGHT: u32 = 0xBDD7EE;
/// Darker blue fill for odd-numbered source blocks.
pub const BAND_DARK: u32 = 0x5B9BD5;

/// Alternating background fill per contiguous source block.
///
/// Row indices are data rows (0 = first row below the header).
#[derive(Debug, Clone, PartialEq)]
pub struct Banding {
    /// `(start, rows, color)` per block, ascending by start.
    bands: Vec<(usize, usize, u32)>,
}

impl Banding {
    pub fn from_blocks(blocks: &[SourceBlock]) -> Self {
        Self::with_colors(blocks, [BAND_LIGHT, BAND_DARK])
    }

    pub fn with_colors(blocks: &[SourceBlock], colors: [u32; 2]) -> Self {
        let bands = blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (block.start, block.rows, colors[i % 2]))
            .collect();
        Self { bands }
    }

    /// Fill color for data row `row`, if it falls inside a block.
    pub fn color_for_row(&self, row: usize) -> Option<u32> {
        let idx = self.bands.partition_point(|(start, _, _)| *start <= row);
        let (start, rows, color) = *self.bands.get(idx.checked_sub(1)?)?;
        (row < start + rows).then_some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotemerge_recon::MappingStrategy;

    fn block(source: &str, start: usize, rows: usize) -> SourceBlock {
        SourceBlock {
            source: source.into(),
            start,
            rows,
            strategy: MappingStrategy::Positional,
        }
    }

    #[test]
    fn colors_alternate_per_block() {
        let banding = Banding::from_blocks(&[block("a", 0, 2), block("b", 2, 1), block("c", 3, 2)]);

        assert_eq!(banding.color_for_row(0), Some(BAND_LIGHT));
        assert_eq!(banding.color_for_row(1), Some(BAND_LIGHT));
        assert_eq!(banding.color_for_row(2), Some(BAND_DARK));
        assert_eq!(banding.color_for_row(3), Some(BAND_LIGHT));
        assert_eq!(banding.color_for_row(4), Some(BAND_LIGHT));
        assert_eq!(banding.color_for_row(5), None);
    }

    #[test]
    fn no_blocks_no_color() {
        let banding = Banding::from_blocks(&[]);
        assert_eq!(banding.color_for_row(0), None);
    }
}
