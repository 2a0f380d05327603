use crate::core::event::Transition;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A transition-log sink. Implementations write their header on
/// construction; `transition` appends one row.
pub trait TraceWrite {
    fn transition(&mut self, t: &Transition) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

/// Tick-engine format: space-separated rows with mixed-case state
/// names, `Time PID OldState NewState` header.
pub struct SpacedTrace<W: Write> {
    out: W,
}

impl SpacedTrace<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> SpacedTrace<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "Time PID OldState NewState")?;
        Ok(Self { out })
    }
}

impl<W: Write> TraceWrite for SpacedTrace<W> {
    fn transition(&mut self, t: &Transition) -> io::Result<()> {
        writeln!(
            self.out,
            "{} {} {} {}",
            t.at,
            t.pid,
            t.from.mixed_name(),
            t.to.mixed_name()
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Event-skip format: CSV rows with upper-case state names,
/// `Time of transition,PID,Old State,New State` header.
pub struct CsvTrace<W: Write> {
    out: W,
}

impl<W: Write> CsvTrace<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "Time of transition,PID,Old State,New State")?;
        Ok(Self { out })
    }
}

impl<W: Write> TraceWrite for CsvTrace<W> {
    fn transition(&mut self, t: &Transition) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{}",
            t.at,
            t.pid,
            t.from.upper_name(),
            t.to.upper_name()
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
