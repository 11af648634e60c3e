use crate::value::DataWidth;

/// Pins of the FIFO under test, as seen from the testbench.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pin {
    IData,
    IWr,
    IRd,
    IClkWr,
    IClkRd,
    IRstWr,
    IRstRd,
    OData,
    OFull,
    OEmpty,
    OOverflow,
    OUnderflow,
    FRdDone,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Pin {
    pub const COUNT: usize = 13;

    pub const ALL: [Pin; Pin::COUNT] = [
        Pin::IData,
        Pin::IWr,
        Pin::IRd,
        Pin::IClkWr,
        Pin::IClkRd,
        Pin::IRstWr,
        Pin::IRstRd,
        Pin::OData,
        Pin::OFull,
        Pin::OEmpty,
        Pin::OOverflow,
        Pin::OUnderflow,
        Pin::FRdDone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pin::IData => "i_data",
            Pin::IWr => "i_wr",
            Pin::IRd => "i_rd",
            Pin::IClkWr => "i_clk_wr",
            Pin::IClkRd => "i_clk_rd",
            Pin::IRstWr => "i_rst_wr",
            Pin::IRstRd => "i_rst_rd",
            Pin::OData => "o_data",
            Pin::OFull => "o_full",
            Pin::OEmpty => "o_empty",
            Pin::OOverflow => "o_overflow",
            Pin::OUnderflow => "o_underflow",
            Pin::FRdDone => "f_rd_done",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Pin::IData
            | Pin::IWr
            | Pin::IRd
            | Pin::IClkWr
            | Pin::IClkRd
            | Pin::IRstWr
            | Pin::IRstRd => Direction::Input,
            _ => Direction::Output,
        }
    }

    pub fn is_modifiable(&self) -> bool {
        self.direction() == Direction::Input
    }

    /// Bit width of the pin for a FIFO of the given data width.
    pub fn size(&self, width: DataWidth) -> u32 {
        match self {
            Pin::IData | Pin::OData => width.bits(),
            _ => 1,
        }
    }

    /// Mask covering every bit of the pin.
    pub fn mask(&self, width: DataWidth) -> u32 {
        match self.size(width) {
            32 => u32::MAX,
            size => (1u32 << size) - 1,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }
}
