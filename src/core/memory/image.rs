use crate::core::components::module::Model;
use crate::core::errors::SimResult;
use crate::core::execution::simulation_engine::Simulator;
use crate::core::memory::errors::ImageError;
use crate::core::types::Endpoint;
use log::debug;
use std::str::FromStr;

/// Contiguous run of bytes starting at `addr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub addr: u64,
    pub label: Option<String>,
    pub data: Vec<u8>,
}

impl Section {
    pub fn new(addr: u64, data: Vec<u8>) -> Self {
        Self {
            addr,
            label: None,
            data,
        }
    }

    /// True if `addr` falls inside this section
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.addr && addr - self.addr < self.data.len() as u64
    }
}

/// Byte-addressed memory contents made of independent sections
///
/// Used to initialize memories before the first cycle. Bytes no section
/// covers read as zero; where sections overlap the later one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseMemoryImage {
    sections: Vec<Section>,
}

impl SparseMemoryImage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Total number of bytes across all sections
    pub fn byte_count(&self) -> usize {
        self.sections.iter().map(|section| section.data.len()).sum()
    }

    /// Parse VMH text
    ///
    /// A line `@<hex addr>` (optionally followed by `// label`) opens a
    /// section; the first token of every other non-blank line is one hex
    /// byte appended to it. Anything after `//` is a comment.
    pub fn parse_vmh(text: &str) -> Result<Self, ImageError> {
        let mut image = Self::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let (content, comment) = match raw.find("//") {
                Some(at) => (&raw[..at], Some(raw[at + 2..].trim())),
                None => (raw, None),
            };
            let Some(token) = content.split_whitespace().next() else {
                continue;
            };

            if let Some(addr) = token.strip_prefix('@') {
                let addr = u64::from_str_radix(addr, 16).map_err(|_| ImageError::Parse {
                    line,
                    message: format!("invalid address '{}'", addr),
                })?;
                image.add_section(Section {
                    addr,
                    label: comment.filter(|c| !c.is_empty()).map(str::to_string),
                    data: Vec::new(),
                });
                continue;
            }

            let byte = u8::from_str_radix(token, 16).map_err(|_| ImageError::Parse {
                line,
                message: format!("invalid byte '{}'", token),
            })?;
            match image.sections.last_mut() {
                Some(section) => section.data.push(byte),
                None => {
                    return Err(ImageError::Parse {
                        line,
                        message: "data before the first '@' address".to_string(),
                    })
                }
            }
        }
        debug!(
            "parsed VMH image: {} sections, {} bytes",
            image.num_sections(),
            image.byte_count()
        );
        Ok(image)
    }

    /// Byte stored at `addr`, zero when uncovered
    pub fn byte_at(&self, addr: u64) -> u8 {
        self.sections
            .iter()
            .rev()
            .find(|section| section.contains(addr))
            .map_or(0, |section| section.data[(addr - section.addr) as usize])
    }

    /// Little-endian word of `bytes` bytes starting at `addr`
    ///
    /// Bytes past the end of the address space read as zero.
    pub fn read_word(&self, addr: u64, bytes: usize) -> Result<u64, ImageError> {
        if bytes == 0 || bytes > 8 {
            return Err(ImageError::InvalidWordSize { bytes });
        }
        Ok((0..bytes).fold(0u64, |word, i| {
            let byte = addr.checked_add(i as u64).map_or(0, |at| self.byte_at(at));
            word | (u64::from(byte) << (8 * i))
        }))
    }

    /// Preload consecutive little-endian words starting at `base`
    ///
    /// Each endpoint receives as many bytes as its width covers, so mixed
    /// widths are allowed as long as each is a whole number of bytes.
    pub fn load_into<M, E>(
        &self,
        sim: &mut Simulator<M>,
        words: &[E],
        base: u64,
    ) -> SimResult<()>
    where
        M: Model,
        E: Into<Endpoint> + Copy,
    {
        let mut addr = base;
        for word in words {
            let endpoint: Endpoint = (*word).into();
            let width = sim.design().width_of(endpoint)?;
            if width % 8 != 0 {
                return Err(ImageError::UnalignedWidth { width }.into());
            }
            let bytes = (width / 8) as usize;
            sim.preload(endpoint, self.read_word(addr, bytes)?)?;
            addr = addr.saturating_add(bytes as u64);
        }
        debug!("loaded {} words from {:#x}", words.len(), base);
        Ok(())
    }
}

impl FromStr for SparseMemoryImage {
    type Err = ImageError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse_vmh(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VMH: &str = "\
@400 // .text
  13 // addi
  00
  ab

@1000 // .data
  ff
";

    #[test]
    fn test_parse_sections_and_labels() {
        let image = SparseMemoryImage::parse_vmh(VMH).unwrap();
        assert_eq!(image.num_sections(), 2);
        assert_eq!(image.sections()[0].addr, 0x400);
        assert_eq!(image.sections()[0].label.as_deref(), Some(".text"));
        assert_eq!(image.sections()[0].data, vec![0x13, 0x00, 0xab]);
        assert_eq!(image.sections()[1].data, vec![0xff]);
        assert_eq!(image.byte_count(), 4);
    }

    #[test]
    fn test_byte_and_word_reads() {
        let image: SparseMemoryImage = VMH.parse().unwrap();
        assert_eq!(image.byte_at(0x402), 0xab);
        assert_eq!(image.byte_at(0x403), 0);
        assert_eq!(image.read_word(0x400, 4).unwrap(), 0x00ab_0013);
        assert_eq!(image.read_word(0x1000, 2).unwrap(), 0x00ff);
        assert!(matches!(
            image.read_word(0x400, 9),
            Err(ImageError::InvalidWordSize { bytes: 9 })
        ));
    }

    #[test]
    fn test_word_at_top_of_address_space() {
        let top = Section::new(u64::MAX - 1, vec![0xaa, 0xbb]);
        let image = SparseMemoryImage::from_sections(vec![top]);
        assert_eq!(image.byte_at(u64::MAX), 0xbb);
        assert_eq!(image.read_word(u64::MAX - 1, 4).unwrap(), 0xbbaa);
        assert_eq!(image.read_word(u64::MAX, 8).unwrap(), 0xbb);
    }

    #[test]
    fn test_later_section_wins_on_overlap() {
        let mut image = SparseMemoryImage::from_sections(vec![Section::new(0, vec![1, 2, 3])]);
        image.add_section(Section::new(1, vec![9]));
        assert_eq!(image.byte_at(0), 1);
        assert_eq!(image.byte_at(1), 9);
        assert_eq!(image.byte_at(2), 3);
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = SparseMemoryImage::parse_vmh("@10\n00\nzz\n").unwrap_err();
        assert_eq!(
            err,
            ImageError::Parse {
                line: 3,
                message: "invalid byte 'zz'".to_string()
            }
        );

        let err = SparseMemoryImage::parse_vmh("\n12\n").unwrap_err();
        assert!(matches!(err, ImageError::Parse { line: 2, .. }));

        let err = SparseMemoryImage::parse_vmh("@xyz\n").unwrap_err();
        assert!(matches!(err, ImageError::Parse { line: 1, .. }));
    }
}
