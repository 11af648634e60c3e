//! Waveform capture.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::TbError;
use crate::signal::Pin;
use crate::sim_if::SimIf;
use crate::TbResult;

/// Receives the DUT pin state once per step.
pub trait TraceSink {
    fn dump(&mut self, step: u64, dut: &dyn SimIf) -> TbResult<()>;
    /// Flushes and closes the sink. Called on every exit path.
    fn close(&mut self) -> TbResult<()>;
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn dump(&mut self, _step: u64, _dut: &dyn SimIf) -> TbResult<()> {
        Ok(())
    }
    fn close(&mut self) -> TbResult<()> {
        Ok(())
    }
}

/// Value change dump of every FIFO pin.
pub struct VcdTrace {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    last_values: [Option<u32>; Pin::COUNT],
    header_written: bool,
}

impl VcdTrace {
    pub fn create<P: AsRef<Path>>(path: P) -> TbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| TbError::io(&path, e))?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            last_values: [None; Pin::COUNT],
            header_written: false,
        })
    }

    fn id(pin: Pin) -> char {
        (b'!' + pin.index() as u8) as char
    }

    fn write_header(w: &mut BufWriter<File>, dut: &dyn SimIf) -> std::io::Result<()> {
        writeln!(w, "$version")?;
        writeln!(w, "  fifocov")?;
        writeln!(w, "$end")?;
        writeln!(w, "$timescale 1ns $end")?;
        writeln!(w, "$scope module TOP $end")?;
        for pin in Pin::ALL {
            writeln!(
                w,
                "$var wire {} {} {} $end",
                pin.size(dut.width()),
                Self::id(pin),
                pin.name()
            )?;
        }
        writeln!(w, "$upscope $end")?;
        writeln!(w, "$enddefinitions $end")?;
        Ok(())
    }

    fn write_changes(
        w: &mut BufWriter<File>,
        last_values: &mut [Option<u32>; Pin::COUNT],
        step: u64,
        dut: &dyn SimIf,
    ) -> std::io::Result<()> {
        writeln!(w, "#{}", step)?;
        for pin in Pin::ALL {
            let value = dut.get_value(pin);
            if last_values[pin.index()] == Some(value) {
                continue;
            }
            last_values[pin.index()] = Some(value);
            let size = pin.size(dut.width());
            if size == 1 {
                writeln!(w, "{}{}", value & 1, Self::id(pin))?;
            } else {
                writeln!(w, "b{:0width$b} {}", value, Self::id(pin), width = size as usize)?;
            }
        }
        Ok(())
    }
}

impl TraceSink for VcdTrace {
    fn dump(&mut self, step: u64, dut: &dyn SimIf) -> TbResult<()> {
        let Some(w) = self.writer.as_mut() else {
            return Ok(());
        };
        if !self.header_written {
            Self::write_header(w, dut).map_err(|e| TbError::io(&self.path, e))?;
            self.header_written = true;
        }
        Self::write_changes(w, &mut self.last_values, step, dut)
            .map_err(|e| TbError::io(&self.path, e))
    }

    fn close(&mut self) -> TbResult<()> {
        if let Some(mut w) = self.writer.take() {
            w.flush().map_err(|e| TbError::io(&self.path, e))?;
        }
        Ok(())
    }
}
