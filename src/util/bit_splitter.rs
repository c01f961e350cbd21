/// A structure for easily splitting an instruction word
/// into the fields used by the different opcodes.
///
/// ```text
///  15   12 11    8 7     4 3     0
/// +-------+-------+-------+-------+
/// |  op   |   x   |   y   |   n   |
/// +-------+-------+-------+-------+
///                 |      nn       |
///         |          nnn          |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u8, u8);

impl BitSplitter {
    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter((value >> 8) as u8, (value & 0x00FF) as u8)
    }

    /// Left-shift the first u8-component 8 bits,
    /// then take bitwise or with the second component
    /// in order to store the components in a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.0 as u16) << 8) | self.1 as u16
    }

    /// The four nibbles, most significant first.
    pub fn as_four_u8(&self) -> (u8, u8, u8, u8) {
        (self.op(), self.x(), self.y(), self.n())
    }

    /// Instruction family, bits 15-12.
    pub fn op(&self) -> u8 {
        self.0 >> 4
    }

    /// First register operand, bits 11-8.
    pub fn x(&self) -> u8 {
        self.0 & 0x0F
    }

    /// Second register operand, bits 7-4.
    pub fn y(&self) -> u8 {
        self.1 >> 4
    }

    /// 4-bit immediate, bits 3-0.
    pub fn n(&self) -> u8 {
        self.1 & 0x0F
    }

    /// 8-bit immediate, bits 7-0.
    pub fn nn(&self) -> u8 {
        self.1
    }

    /// 12-bit address, bits 11-0.
    pub fn nnn(&self) -> u16 {
        self.as_u16() & 0x0FFF
    }
}
